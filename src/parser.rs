//! Record parser for the curated feed.
//!
//! The feed is plain comma-separated text with no header row and exactly
//! seven meaningful columns:
//!
//! | # | Column          |
//! |---|-----------------|
//! | 0 | date            |
//! | 1 | source          |
//! | 2 | original title  |
//! | 3 | display title   |
//! | 4 | summary         |
//! | 5 | url             |
//! | 6 | category        |
//!
//! Commas inside quoted fields are not supported; such a row simply shifts
//! its columns. Rows with fewer than seven fields, or without a title or
//! summary, are dropped.

use crate::models::Article;
use crate::utils::truncate_for_log;
use tracing::{debug, info, instrument};

/// Field delimiter.
pub const DELIMITER: char = ',';

/// Minimum number of fields a row needs to be considered.
pub const COLUMN_COUNT: usize = 7;

/// Position of each column within a row.
#[derive(Debug, Clone, Copy)]
enum Column {
    Date = 0,
    Source = 1,
    OriginalTitle = 2,
    Title = 3,
    Summary = 4,
    Url = 5,
    Category = 6,
}

/// The fields of one row, already split on the delimiter.
struct Row<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn split(line: &'a str) -> Option<Self> {
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        (fields.len() >= COLUMN_COUNT).then_some(Self { fields })
    }

    fn get(&self, column: Column) -> String {
        clean_field(self.fields[column as usize])
    }

    /// Build the article, or `None` if the title or summary is missing.
    fn into_article(self) -> Option<Article> {
        let article = Article {
            date: self.get(Column::Date),
            source: self.get(Column::Source),
            original_title: self.get(Column::OriginalTitle),
            title: self.get(Column::Title),
            summary: self.get(Column::Summary),
            url: self.get(Column::Url),
            category: self.get(Column::Category),
        };
        (!article.title.is_empty() && !article.summary.is_empty()).then_some(article)
    }
}

/// Trim a field and strip one leading and one trailing double quote.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('"').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Parse a single line into an article.
///
/// Returns `None` for blank lines, rows with too few fields, and rows
/// missing a title or summary.
pub fn parse_line(line: &str) -> Option<Article> {
    if line.trim().is_empty() {
        return None;
    }
    Row::split(line)?.into_article()
}

/// Parse the whole feed text into articles, in feed order.
#[instrument(level = "info", skip_all, fields(bytes = text.len()))]
pub fn parse_feed(text: &str) -> Vec<Article> {
    let mut articles = Vec::new();
    let mut skipped = 0usize;
    // Spreadsheet exports often start with a UTF-8 byte order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(article) => articles.push(article),
            None => {
                skipped += 1;
                debug!(
                    line = lineno + 1,
                    preview = %truncate_for_log(line, 80),
                    "Skipping malformed or incomplete row"
                );
            }
        }
    }

    info!(count = articles.len(), skipped, "Parsed feed rows");
    articles
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
2025-08-15 10:30,Science Daily,Quantum Computing Breakthrough,量子コンピューティングの画期的進展,新しい量子暗号化プロトコル,https://example.com/quantum,AI・テクノロジー
2025-08-14 14:20,AI新聞,Mars Underground Discovery,火星地下で生命の痕跡発見,有機化合物を検出,https://example.com/mars,宇宙・地球科学
";

    #[test]
    fn test_parse_feed_maps_columns() {
        let articles = parse_feed(SAMPLE);
        assert_eq!(articles.len(), 2);

        let first = &articles[0];
        assert_eq!(first.date, "2025-08-15 10:30");
        assert_eq!(first.source, "Science Daily");
        assert_eq!(first.original_title, "Quantum Computing Breakthrough");
        assert_eq!(first.title, "量子コンピューティングの画期的進展");
        assert_eq!(first.summary, "新しい量子暗号化プロトコル");
        assert_eq!(first.url, "https://example.com/quantum");
        assert_eq!(first.category, "AI・テクノロジー");
        assert_eq!(articles[1].source, "AI新聞");
    }

    #[test]
    fn test_rows_with_too_few_fields_are_dropped() {
        let text = "a,b,c,d,e,f\n2025/8/14,src,orig,title,summary,https://e.com,cat\n,,,\n";
        let articles = parse_feed(text);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "title");
    }

    #[test]
    fn test_retention_requires_title_and_summary() {
        assert!(parse_line("d,s,o,,summary,u,c").is_none());
        assert!(parse_line("d,s,o,title,   ,u,c").is_none());
        assert!(parse_line("d,s,o,\"\",summary,u,c").is_none());
        assert!(parse_line("d,s,o,title,summary,u,c").is_some());
        // Everything else may be empty.
        assert!(parse_line(",,,title,summary,,").is_some());
    }

    #[test]
    fn test_quotes_and_whitespace_are_stripped() {
        let article = parse_line(r#" "2025/8/14" , "Src" ,o, "Title" ,"Sum",  "https://e.com" ,"cat""#)
            .unwrap();
        assert_eq!(article.date, "2025/8/14");
        assert_eq!(article.source, "Src");
        assert_eq!(article.title, "Title");
        assert_eq!(article.summary, "Sum");
        assert_eq!(article.url, "https://e.com");
        assert_eq!(article.category, "cat");
    }

    #[test]
    fn test_only_one_quote_is_stripped_each_side() {
        assert_eq!(clean_field(r#"""quoted"""#), r#""quoted""#);
        assert_eq!(clean_field(r#""open"#), "open");
        assert_eq!(clean_field(r#"close""#), "close");
    }

    #[test]
    fn test_extra_fields_are_ignored_and_first_line_is_data() {
        let text = "date,source,originalTitle,title,summary,url,category,extra";
        let articles = parse_feed(text);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "title");
        assert_eq!(articles[0].category, "category");
    }

    #[test]
    fn test_crlf_and_blank_lines() {
        let text = "\r\n  \r\nd,s,o,t,su,u,c\r\n\r\n";
        let articles = parse_feed(text);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].category, "c");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_feed("").is_empty());
        assert!(parse_feed("\n\n   \n").is_empty());
    }

    #[test]
    fn test_leading_byte_order_mark_is_dropped() {
        let articles = parse_feed("\u{feff}2025-08-15,s,o,t,su,https://e.com,AI・テクノロジー\n");
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].date, "2025-08-15");

        let normalizer = crate::dates::DateNormalizer::new(9).unwrap();
        assert_eq!(
            normalizer.normalize(&articles[0].date).as_deref(),
            Some("2025/08/15")
        );
    }
}
