//! CSV 导入导出
//!
//! 导出格式：`Word,Translation,Date,Source`，按字母顺序（不区分大小写）。
//! 含逗号、引号或换行的字段用双引号包裹，内部引号加倍。

use std::sync::OnceLock;

use chrono::{DateTime, Local, Utc};
use regex::Regex;

use super::book::WordBook;
use super::record::WordSource;
use crate::error::{helpers, WordSaverResult};

pub const CSV_HEADER: &str = "Word,Translation,Date,Source";

/// 导入单词的来源标题
pub const IMPORTED_SOURCE_TITLE: &str = "导入的单词";

static HTML_TAG: OnceLock<Option<Regex>> = OnceLock::new();

/// 导入的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    pub word: String,
    pub translation: String,
}

/// 导出单词本为 CSV
pub fn export_csv(book: &WordBook) -> String {
    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');

    for record in book.alphabetical() {
        let translation = clean_translation(book.translation_of(record).unwrap_or_default());
        let fields = [
            record.word.clone(),
            translation,
            export_date(record.first_saved_at),
            record.source.title.clone(),
        ];

        let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        csv.push_str(&line.join(","));
        csv.push('\n');
    }

    csv
}

/// 解析导入的 CSV
///
/// 首行必须是表头：至少两列，且第一列包含 "word"。空行和空单词被跳过。
pub fn parse_import(text: &str) -> WordSaverResult<Vec<ImportRow>> {
    let mut records = parse_records(text).into_iter();

    let header = records
        .next()
        .ok_or_else(|| helpers::invalid_argument("CSV文件为空"))?;

    let valid_header = header.len() >= 2 && header[0].to_lowercase().contains("word");
    if !valid_header {
        return Err(helpers::invalid_argument(
            "CSV格式无效，请确保第一列为单词，第二列为翻译".to_string(),
        ));
    }

    Ok(records
        .filter_map(|fields| {
            let mut fields = fields.into_iter();
            let word = fields.next()?.trim().to_string();
            if word.is_empty() {
                return None;
            }
            let translation = fields.next().map(|t| t.trim().to_string()).unwrap_or_default();
            Some(ImportRow { word, translation })
        })
        .collect())
}

/// 合并导入行，返回新增单词数
///
/// 已存在的单词（不区分大小写）不重复添加，翻译非空时更新翻译。
pub fn import_rows(book: &mut WordBook, rows: Vec<ImportRow>, now: DateTime<Utc>) -> WordSaverResult<usize> {
    let mut imported = 0;

    for row in rows {
        if book.contains(&row.word) {
            if !row.translation.is_empty() {
                book.set_translation(&row.word, &row.translation);
            }
            continue;
        }

        book.save(
            &row.word,
            Some(&row.translation),
            WordSource::new("", IMPORTED_SOURCE_TITLE),
            now,
        )?;
        imported += 1;
    }

    Ok(imported)
}

/// 去除 HTML 标签并合并空白
pub fn clean_translation(text: &str) -> String {
    let stripped = match html_tag_regex() {
        Some(re) => re.replace_all(text, " ").into_owned(),
        None => text.to_string(),
    };
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn html_tag_regex() -> Option<&'static Regex> {
    HTML_TAG.get_or_init(|| Regex::new(r"<[^>]*>").ok()).as_ref()
}

fn export_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// 按 RFC 4180 规则切分记录，支持引号内的逗号、换行和转义引号
fn parse_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    records
}

fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    let blank = record.iter().all(|f| f.trim().is_empty());
    if !blank {
        records.push(record);
    }
}
