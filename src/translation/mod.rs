//! 翻译模块
//!
//! - **provider**: 翻译服务提供者（Google 翻译、英文词典、静态链接）
//! - **chain**: 按顺序回退的提供者链
//! - **context**: 语境装饰
//! - **translator**: 缓存 + 提供者链 + 释义补充的完整流水线

pub mod chain;
pub mod context;
pub mod provider;
pub mod translator;

pub use chain::{ProviderChain, ProviderOutcome};
pub use context::{decorate, PageType, TranslationContext};
pub use provider::{DictionaryApiProvider, GoogleTranslateProvider, StaticLinkProvider, TranslationProvider};
pub use translator::{Translator, TranslatorOptions};
