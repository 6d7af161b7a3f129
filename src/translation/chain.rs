//! 提供者链
//!
//! 按顺序尝试每个提供者，每次尝试受超时限制，第一个成功的结果即为最终结果。

use std::sync::Arc;
use std::time::Duration;

use super::provider::TranslationProvider;
use crate::error::{helpers, WordSaverResult};

/// 链中某个提供者的成功结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcome {
    pub text: String,
    pub provider: String,
    /// 是否由链中第一个提供者给出
    pub primary: bool,
    pub cacheable: bool,
}

/// 有序的提供者列表
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn TranslationProvider>>,
    timeout: Duration,
}

impl ProviderChain {
    pub fn new(timeout: Duration) -> Self {
        Self {
            providers: Vec::new(),
            timeout,
        }
    }

    /// 追加提供者（按追加顺序尝试）
    pub fn with_provider(mut self, provider: Arc<dyn TranslationProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// 依次尝试可重试的失败，全部失败时返回最后一个错误；
    /// 不可重试的错误（如输入无效）直接返回
    pub async fn translate(&self, word: &str) -> WordSaverResult<ProviderOutcome> {
        let mut last_error = helpers::provider_unavailable("没有可用的翻译服务");

        for (index, provider) in self.providers.iter().enumerate() {
            match attempt_with_timeout(provider.as_ref(), word, self.timeout).await {
                Ok(text) => {
                    tracing::debug!("{} 翻译成功: {}", provider.name(), word);
                    return Ok(ProviderOutcome {
                        text,
                        provider: provider.name().to_string(),
                        primary: index == 0,
                        cacheable: provider.is_cacheable(),
                    });
                }
                Err(e) => {
                    metrics::counter!("wordsaver_provider_failures_total").increment(1);
                    if !e.is_retryable() {
                        tracing::error!("{} 翻译失败且不可重试: {}", provider.name(), e);
                        return Err(e);
                    }
                    tracing::warn!("{} 翻译失败，尝试下一个服务: {}", provider.name(), e);
                    last_error = e;
                }
            }
        }

        tracing::error!("所有翻译服务均失败: {}", word);
        Err(helpers::provider_unavailable(format!(
            "所有翻译服务均不可用: {}",
            last_error.message()
        )))
    }
}

/// 带超时的单次尝试；空结果视为失败
pub async fn attempt_with_timeout(
    provider: &dyn TranslationProvider,
    word: &str,
    timeout: Duration,
) -> WordSaverResult<String> {
    let text = tokio::time::timeout(timeout, provider.attempt(word)).await??;

    if text.trim().is_empty() {
        return Err(helpers::provider_unavailable(format!(
            "{} 返回了空结果",
            provider.name()
        )));
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordSaverError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        name: &'static str,
        reply: Option<&'static str>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(name: &'static str, reply: &'static str) -> Arc<Self> {
            Arc::new(Self { name, reply: Some(reply), delay: Duration::ZERO, calls: AtomicUsize::new(0) })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self { name, reply: None, delay: Duration::ZERO, calls: AtomicUsize::new(0) })
        }

        fn slow(name: &'static str, delay: Duration) -> Arc<Self> {
            Arc::new(Self { name, reply: Some("late"), delay, calls: AtomicUsize::new(0) })
        }
    }

    #[async_trait]
    impl TranslationProvider for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        async fn attempt(&self, _word: &str) -> WordSaverResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply
                .map(str::to_string)
                .ok_or_else(|| WordSaverError::ProviderUnavailable(format!("{} down", self.name)))
        }
    }

    #[tokio::test]
    async fn test_first_success_wins() {
        let first = Scripted::ok("first", "一");
        let second = Scripted::ok("second", "二");
        let chain = ProviderChain::new(Duration::from_secs(1))
            .with_provider(first.clone())
            .with_provider(second.clone());

        let outcome = chain.translate("one").await.unwrap();
        assert_eq!(outcome.text, "一");
        assert!(outcome.primary);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_falls_back_in_order() {
        let chain = ProviderChain::new(Duration::from_secs(1))
            .with_provider(Scripted::failing("first"))
            .with_provider(Scripted::ok("second", "二"));

        let outcome = chain.translate("two").await.unwrap();
        assert_eq!(outcome.provider, "second");
        assert!(!outcome.primary);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let chain = ProviderChain::new(Duration::from_millis(20))
            .with_provider(Scripted::slow("slow", Duration::from_millis(500)))
            .with_provider(Scripted::ok("fast", "快"));

        let outcome = chain.translate("fast").await.unwrap();
        assert_eq!(outcome.text, "快");
    }

    #[tokio::test]
    async fn test_all_failing_is_provider_unavailable() {
        let chain = ProviderChain::new(Duration::from_secs(1))
            .with_provider(Scripted::failing("a"))
            .with_provider(Scripted::failing("b"));

        assert!(matches!(
            chain.translate("x").await,
            Err(WordSaverError::ProviderUnavailable(_))
        ));
        assert!(matches!(
            ProviderChain::new(Duration::from_secs(1)).translate("x").await,
            Err(WordSaverError::ProviderUnavailable(_))
        ));
    }

    struct Rejecting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TranslationProvider for Rejecting {
        fn name(&self) -> &str {
            "rejecting"
        }

        async fn attempt(&self, word: &str) -> WordSaverResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(WordSaverError::InvalidArgument(format!("无法翻译: {}", word)))
        }
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_the_chain() {
        let rejecting = Arc::new(Rejecting { calls: AtomicUsize::new(0) });
        let fallback = Scripted::ok("fallback", "备用");
        let chain = ProviderChain::new(Duration::from_secs(1))
            .with_provider(rejecting.clone())
            .with_provider(fallback.clone());

        let result = chain.translate("bad").await;
        assert!(matches!(result, Err(WordSaverError::InvalidArgument(_))));
        assert_eq!(rejecting.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }
}
