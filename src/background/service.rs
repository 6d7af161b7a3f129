//! 后台服务
//!
//! 持有缓存、翻译器和持久化存储，处理扩展发来的消息。
//! 所有修改持久化记录的操作都在写锁内完成“读取 → 合并 → 写回”。

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex as AsyncMutex;

use super::messages::{Request, Response};
use crate::cache::{lock, CacheStats, DictionaryCache, TranslationCache};
use crate::config::WordSaverConfig;
use crate::error::{helpers, WordSaverError, WordSaverResult};
use crate::learning::{self, should_send_reminder, Difficulty, LearningStats, MemoryCurve, ReminderSettings, WeeklyStats};
use crate::store::{self, KeyValueStore};
use crate::translation::{TranslationContext, Translator};
use crate::words::{self, DueWord, SaveOutcome, WordRecord, WordSource};

/// 学习统计视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningOverview {
    pub stats: LearningStats,
    pub accuracy: u32,
    pub weekly: WeeklyStats,
}

/// 提醒检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderCheck {
    pub should_remind: bool,
    pub due_count: usize,
}

/// 后台服务
pub struct BackgroundService {
    store: Arc<dyn KeyValueStore>,
    translator: Translator,
    translation_cache: Arc<Mutex<TranslationCache>>,
    dictionary_cache: Arc<Mutex<DictionaryCache>>,
    curve: MemoryCurve,
    write_lock: AsyncMutex<()>,
}

impl BackgroundService {
    /// 创建后台服务；缓存需与翻译器共享同一实例
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        translator: Translator,
        translation_cache: Arc<Mutex<TranslationCache>>,
        dictionary_cache: Arc<Mutex<DictionaryCache>>,
    ) -> Self {
        Self {
            store,
            translator,
            translation_cache,
            dictionary_cache,
            curve: MemoryCurve::new(),
            write_lock: AsyncMutex::new(()),
        }
    }

    /// 按配置创建缓存与标准翻译链
    pub fn from_config(config: &WordSaverConfig, store: Arc<dyn KeyValueStore>) -> WordSaverResult<Self> {
        let translation_cache = Arc::new(Mutex::new(TranslationCache::with_config(&config.translation_cache())?));
        let dictionary_cache = Arc::new(Mutex::new(DictionaryCache::with_config(&config.dictionary_cache())?));
        let translator = Translator::from_config(config, translation_cache.clone(), dictionary_cache.clone())?;

        Ok(Self::new(store, translator, translation_cache, dictionary_cache))
    }

    pub fn translation_cache(&self) -> Arc<Mutex<TranslationCache>> {
        self.translation_cache.clone()
    }

    pub fn dictionary_cache(&self) -> Arc<Mutex<DictionaryCache>> {
        self.dictionary_cache.clone()
    }

    // ========================================================================
    // 消息分发
    // ========================================================================

    /// 处理一条消息；错误转换为响应，不向调用方传播
    pub async fn handle(&self, request: Request) -> Response {
        let action = request.action();
        tracing::debug!("收到请求: {}", action);

        let response = match request {
            Request::GetTranslation { word, context, page_title } => self
                .get_translation(&word, &context, &page_title)
                .await
                .map(|translation| Response::Translation {
                    success: true,
                    translation,
                }),
            Request::SaveWord { word, translation, source } => self
                .save_word(&word, translation.as_deref(), source)
                .await
                .map(|exists| Response::Saved { success: true, exists }),
            Request::DeleteWord { word } => self.delete_word(&word).await.map(|_| Response::done()),
            Request::ReviewWord { word, difficulty } => self
                .review_word(&word, &difficulty)
                .await
                .map(|next_review| Response::Reviewed {
                    success: true,
                    next_review,
                }),
            Request::ExportWordList => self
                .export_word_list()
                .await
                .map(|csv| Response::Exported { success: true, csv }),
            Request::ImportWordList { csv_data } => {
                return match csv_data.filter(|csv| !csv.trim().is_empty()) {
                    None => Response::rejected("未提供数据"),
                    Some(csv) => match self.import_word_list(&csv).await {
                        Ok(count) => Response::Imported { success: true, count },
                        Err(e @ WordSaverError::StorageFailure(_)) => failure_response(action, e),
                        Err(e) => {
                            tracing::warn!("导入失败: {}", e);
                            Response::rejected(e.message())
                        }
                    },
                };
            }
            Request::PerformSearch { search_term } => self
                .search(&search_term)
                .await
                .map(|results| Response::SearchResults { success: true, results }),
            Request::GetDueWords => self
                .due_words()
                .await
                .map(|words| Response::DueWords { success: true, words }),
            Request::GetLearningStats => self.learning_overview().await.map(|overview| Response::LearningStats {
                success: true,
                stats: overview.stats,
                accuracy: overview.accuracy,
                weekly: overview.weekly,
            }),
            Request::GetCacheStats => {
                let (translation, dictionary) = self.cache_stats();
                Ok(Response::CacheStats {
                    success: true,
                    translation,
                    dictionary,
                })
            }
            Request::GetReminderSettings => self
                .reminder_settings()
                .await
                .map(|settings| Response::ReminderSettings { success: true, settings }),
            Request::SetReminderSettings { settings } => self
                .set_reminder_settings(&settings)
                .await
                .map(|_| Response::done()),
            Request::CheckReminder => self.check_reminder().await.map(|check| Response::ReminderCheck {
                success: true,
                should_remind: check.should_remind,
                due_count: check.due_count,
            }),
            Request::Ping => {
                tracing::debug!("收到ping请求");
                Ok(Response::pong())
            }
        };

        response.unwrap_or_else(|e| failure_response(action, e))
    }

    // ========================================================================
    // 翻译
    // ========================================================================

    /// 翻译单词（先查缓存），结果按语境装饰
    pub async fn get_translation(
        &self,
        word: &str,
        context: &TranslationContext,
        page_title: &str,
    ) -> WordSaverResult<String> {
        self.translator.translate(word, context, page_title).await
    }

    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        let translation = lock(&self.translation_cache).stats();
        let dictionary = lock(&self.dictionary_cache).stats();
        tracing::debug!(
            "缓存命中率: 翻译 {}, 词典 {}",
            translation.hit_rate_display(),
            dictionary.hit_rate_display()
        );
        (translation, dictionary)
    }

    // ========================================================================
    // 单词本
    // ========================================================================

    /// 保存单词，返回此前是否已存在
    pub async fn save_word(&self, word: &str, translation: Option<&str>, source: WordSource) -> WordSaverResult<bool> {
        let _guard = self.write_lock.lock().await;

        let mut book = store::load_word_book(self.store.as_ref()).await?;
        let outcome = book.save(word, translation, source, Utc::now())?;
        store::save_word_book(self.store.as_ref(), &book).await?;

        let exists = outcome == SaveOutcome::Updated;
        tracing::info!("单词已保存: {} (已存在: {})", word.trim(), exists);
        Ok(exists)
    }

    /// 删除单词及其缓存
    pub async fn delete_word(&self, word: &str) -> WordSaverResult<()> {
        let word = words::record::validate_word(word)?;
        let _guard = self.write_lock.lock().await;

        let mut book = store::load_word_book(self.store.as_ref()).await?;
        let removed = book
            .remove(word)
            .ok_or_else(|| WordSaverError::NotFound(format!("单词不存在: {}", word)))?;

        self.translator.evict(word)?;
        store::save_word_book(self.store.as_ref(), &book).await?;

        tracing::info!("单词已删除: {}", removed.word);
        Ok(())
    }

    /// 提交复习结果，返回下次复习时间
    pub async fn review_word(&self, word: &str, difficulty: &str) -> WordSaverResult<DateTime<Utc>> {
        let word = words::record::validate_word(word)?;
        let difficulty: Difficulty = difficulty.parse()?;
        let now = Utc::now();
        let _guard = self.write_lock.lock().await;

        let mut book = store::load_word_book(self.store.as_ref()).await?;
        let record = book
            .find_mut(word)
            .ok_or_else(|| WordSaverError::NotFound(format!("单词不存在: {}", word)))?;
        let next_review = self.curve.apply_review(record, difficulty, now);
        store::save_word_book(self.store.as_ref(), &book).await?;

        let mut stats = store::load_learning_stats(self.store.as_ref()).await?;
        stats.record_review_at(difficulty.is_correct(), now);
        store::save_learning_stats(self.store.as_ref(), &stats).await?;

        metrics::counter!("wordsaver_reviews_total").increment(1);
        tracing::info!("单词已复习: {} ({}), 下次复习 {}", word, difficulty, next_review);
        Ok(next_review)
    }

    pub async fn export_word_list(&self) -> WordSaverResult<String> {
        let book = store::load_word_book(self.store.as_ref()).await?;
        tracing::info!("导出 {} 个单词", book.len());
        Ok(words::export_csv(&book))
    }

    /// 导入 CSV，返回新增单词数
    pub async fn import_word_list(&self, csv: &str) -> WordSaverResult<usize> {
        let rows = words::parse_import(csv)?;
        let _guard = self.write_lock.lock().await;

        let mut book = store::load_word_book(self.store.as_ref()).await?;
        let count = words::import_rows(&mut book, rows, Utc::now())?;
        store::save_word_book(self.store.as_ref(), &book).await?;

        tracing::info!("导入完成，新增 {} 个单词", count);
        Ok(count)
    }

    pub async fn search(&self, term: &str) -> WordSaverResult<Vec<WordRecord>> {
        let book = store::load_word_book(self.store.as_ref()).await?;
        Ok(book.search(term))
    }

    // ========================================================================
    // 复习与统计
    // ========================================================================

    pub async fn due_words(&self) -> WordSaverResult<Vec<DueWord>> {
        let book = store::load_word_book(self.store.as_ref()).await?;
        Ok(book.due_words(&self.curve, Utc::now()))
    }

    pub async fn learning_overview(&self) -> WordSaverResult<LearningOverview> {
        let stats = store::load_learning_stats(self.store.as_ref()).await?;
        let accuracy = stats.accuracy();
        let weekly = stats.weekly_stats(learning::stats::today());

        Ok(LearningOverview { stats, accuracy, weekly })
    }

    pub async fn reminder_settings(&self) -> WordSaverResult<ReminderSettings> {
        store::load_reminder_settings(self.store.as_ref()).await
    }

    pub async fn set_reminder_settings(&self, settings: &ReminderSettings) -> WordSaverResult<()> {
        settings.validate()?;
        let _guard = self.write_lock.lock().await;
        store::save_reminder_settings(self.store.as_ref(), settings).await?;

        tracing::info!("提醒设置已更新: 启用={}, 时间={}", settings.enabled, settings.time);
        Ok(())
    }

    /// 检查是否需要提醒；需要时记录今天已提醒
    pub async fn check_reminder(&self) -> WordSaverResult<ReminderCheck> {
        let settings = self.reminder_settings().await?;
        let due_count = self.due_words().await?.len();
        let today = learning::stats::today();

        let _guard = self.write_lock.lock().await;
        let last = store::load_last_reminder(self.store.as_ref()).await?;
        let should_remind = should_send_reminder(&settings, due_count, last, today);

        if should_remind {
            store::save_last_reminder(self.store.as_ref(), today).await?;
            tracing::info!("发送复习提醒: {} 个单词待复习", due_count);
        }

        Ok(ReminderCheck { should_remind, due_count })
    }
}

/// 错误到响应的映射：NotFound 为 `{success: false}`，其余为 `{error}`
fn failure_response(action: &str, error: WordSaverError) -> Response {
    helpers::log_error(&error.clone().with_context(action));

    match error {
        WordSaverError::NotFound(message) => Response::rejected(message),
        other => Response::failure(other.message()),
    }
}
