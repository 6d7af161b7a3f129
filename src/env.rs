//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，所有变量都以 `WORDSAVER_` 为前缀。

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅在变量被显式设置时返回值，用于覆盖文件配置
    fn get_if_set() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "WORDSAVER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!("Invalid log level '{}'. Use: trace, debug, info, warn, error", value),
                }),
            }
        }
    }
}

/// 翻译相关环境变量
pub mod translation {
    use super::*;

    /// 目标语言
    pub struct TargetLang;
    impl EnvVar<String> for TargetLang {
        const NAME: &'static str = "WORDSAVER_TARGET_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Target language code (e.g. zh-CN)";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("zh-CN".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang(value, Self::NAME)
        }
    }

    /// 源语言
    pub struct SourceLang;
    impl EnvVar<String> for SourceLang {
        const NAME: &'static str = "WORDSAVER_SOURCE_LANG";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Source language code";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("en".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            parse_lang(value, Self::NAME)
        }
    }

    /// 翻译服务超时
    pub struct ProviderTimeout;
    impl EnvVar<Duration> for ProviderTimeout {
        const NAME: &'static str = "WORDSAVER_PROVIDER_TIMEOUT_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_millis(5000));
        const DESCRIPTION: &'static str = "Per-provider translation timeout in milliseconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            let millis = parse_positive_usize(value, Self::NAME, 100, 60_000)?;
            Ok(Duration::from_millis(millis as u64))
        }
    }

    /// 是否附加英文释义
    pub struct EnrichDefinition;
    impl EnvVar<bool> for EnrichDefinition {
        const NAME: &'static str = "WORDSAVER_ENRICH_DEFINITION";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Append English dictionary definitions to translations";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 缓存相关环境变量
pub mod cache {
    use super::*;

    /// 翻译缓存容量
    pub struct TranslationSize;
    impl EnvVar<usize> for TranslationSize {
        const NAME: &'static str = "WORDSAVER_TRANSLATION_CACHE_SIZE";
        const DEFAULT: Option<usize> = Some(500);
        const DESCRIPTION: &'static str = "Translation cache capacity (number of entries)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100_000)
        }
    }

    /// 翻译缓存TTL
    pub struct TranslationTtl;
    impl EnvVar<Duration> for TranslationTtl {
        const NAME: &'static str = "WORDSAVER_TRANSLATION_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(7 * 24 * 60 * 60));
        const DESCRIPTION: &'static str = "Translation cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_ttl_secs(value, Self::NAME)
        }
    }

    /// 词典缓存容量
    pub struct DictionarySize;
    impl EnvVar<usize> for DictionarySize {
        const NAME: &'static str = "WORDSAVER_DICTIONARY_CACHE_SIZE";
        const DEFAULT: Option<usize> = Some(300);
        const DESCRIPTION: &'static str = "Dictionary cache capacity (number of entries)";

        fn parse(value: &str) -> EnvResult<usize> {
            parse_positive_usize(value, Self::NAME, 1, 100_000)
        }
    }

    /// 词典缓存TTL
    pub struct DictionaryTtl;
    impl EnvVar<Duration> for DictionaryTtl {
        const NAME: &'static str = "WORDSAVER_DICTIONARY_CACHE_TTL";
        const DEFAULT: Option<Duration> = Some(Duration::from_secs(30 * 24 * 60 * 60));
        const DESCRIPTION: &'static str = "Dictionary cache TTL in seconds";

        fn parse(value: &str) -> EnvResult<Duration> {
            parse_ttl_secs(value, Self::NAME)
        }
    }
}

/// 存储相关环境变量
pub mod storage {
    use super::*;

    /// 数据文件路径
    pub struct DataFile;
    impl EnvVar<String> for DataFile {
        const NAME: &'static str = "WORDSAVER_DATA_FILE";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the JSON storage file";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("~/.wordsaver/storage.json".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path cannot be empty".to_string(),
                });
            }
            Ok(path.to_string())
        }
    }
}

/// Web服务器相关环境变量
pub mod web {
    use super::*;

    /// 绑定地址
    pub struct BindAddress;
    impl EnvVar<String> for BindAddress {
        const NAME: &'static str = "WORDSAVER_BIND_ADDRESS";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Web server bind address";

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("127.0.0.1".to_string()),
            }
        }

        fn parse(value: &str) -> EnvResult<String> {
            let addr = value.trim();
            if addr.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Address cannot be empty".to_string(),
                });
            }
            Ok(addr.to_string())
        }
    }

    /// 端口
    pub struct Port;
    impl EnvVar<u16> for Port {
        const NAME: &'static str = "WORDSAVER_PORT";
        const DEFAULT: Option<u16> = Some(7081);
        const DESCRIPTION: &'static str = "Web server port";

        fn parse(value: &str) -> EnvResult<u16> {
            let port: u16 = value.parse().map_err(|_| EnvError {
                variable: Self::NAME.to_string(),
                message: "Must be a valid port number (1-65535)".to_string(),
            })?;
            if port == 0 {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Port cannot be 0".to_string(),
                });
            }
            Ok(port)
        }
    }
}

fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled", value),
        }),
    }
}

fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num: usize = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

fn parse_ttl_secs(value: &str, var_name: &str) -> EnvResult<Duration> {
    let seconds: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid number of seconds".to_string(),
    })?;
    if seconds == 0 {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: "TTL must be greater than 0".to_string(),
        });
    }
    Ok(Duration::from_secs(seconds))
}

fn parse_lang(value: &str, var_name: &str) -> EnvResult<String> {
    let lang = value.trim();
    let valid = !lang.is_empty()
        && lang.len() <= 10
        && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid language code '{}'", value),
        });
    }
    Ok(lang.to_string())
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: \"info\")\n",
        core::LogLevel::NAME, core::LogLevel::DESCRIPTION));

    docs.push_str("\n## Translation Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: \"zh-CN\")\n",
        translation::TargetLang::NAME, translation::TargetLang::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: \"en\")\n",
        translation::SourceLang::NAME, translation::SourceLang::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        translation::ProviderTimeout::NAME, translation::ProviderTimeout::DESCRIPTION, translation::ProviderTimeout::DEFAULT));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        translation::EnrichDefinition::NAME, translation::EnrichDefinition::DESCRIPTION, translation::EnrichDefinition::DEFAULT));

    docs.push_str("\n## Cache Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        cache::TranslationSize::NAME, cache::TranslationSize::DESCRIPTION, cache::TranslationSize::DEFAULT));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        cache::TranslationTtl::NAME, cache::TranslationTtl::DESCRIPTION, cache::TranslationTtl::DEFAULT));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        cache::DictionarySize::NAME, cache::DictionarySize::DESCRIPTION, cache::DictionarySize::DEFAULT));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        cache::DictionaryTtl::NAME, cache::DictionaryTtl::DESCRIPTION, cache::DictionaryTtl::DEFAULT));

    docs.push_str("\n## Storage Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: \"~/.wordsaver/storage.json\")\n",
        storage::DataFile::NAME, storage::DataFile::DESCRIPTION));

    docs.push_str("\n## Web Server Configuration\n\n");
    docs.push_str(&format!("- `{}`: {} (default: \"127.0.0.1\")\n",
        web::BindAddress::NAME, web::BindAddress::DESCRIPTION));
    docs.push_str(&format!("- `{}`: {} (default: {:?})\n",
        web::Port::NAME, web::Port::DESCRIPTION, web::Port::DEFAULT));

    docs
}
