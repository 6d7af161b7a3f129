//! 单词本模块
//!
//! - **record**: 单词记录与来源
//! - **book**: 保存、删除、搜索、待复习列表
//! - **csv**: CSV 导入导出

pub mod book;
pub mod csv;
pub mod record;

pub use book::{DueWord, SaveOutcome, WordBook};
pub use csv::{export_csv, import_rows, parse_import, ImportRow};
pub use record::{canonical_word, WordRecord, WordSource};
