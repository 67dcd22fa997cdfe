//! Feed loading with a built-in fallback dataset.
//!
//! # Architecture
//!
//! - [`FeedSource`]: async trait for anything that can hand back raw feed text
//! - [`HttpFeed`]: fetches the published sheet over HTTP(S)
//! - [`FileFeed`]: reads a local export of the same text
//! - [`Feed`]: whichever of the above was configured, or none
//!
//! [`load_articles`] is the only entry point the rest of the program needs. It
//! makes exactly one attempt and always returns something renderable: either
//! the parsed feed or [`fallback_articles`].

use crate::error::FeedError;
use crate::models::{Article, FeedOrigin};
use crate::parser::parse_feed;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Something that can produce the raw feed text.
pub trait FeedSource {
    /// Retrieve the full feed text in a single attempt.
    async fn fetch_text(&self) -> Result<String, FeedError>;
}

/// Feed published at an HTTP(S) endpoint.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: Client,
    url: String,
}

impl HttpFeed {
    /// Create a feed for `url` using the given `User-Agent`.
    pub fn new(url: impl Into<String>, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl FeedSource for HttpFeed {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch_text(&self) -> Result<String, FeedError> {
        let t0 = Instant::now();
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let text = response.text().await?;
        info!(
            bytes = text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched feed"
        );
        Ok(text)
    }
}

/// Feed exported to a local file.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    /// Create a feed that reads the file at `path` on each load.
    ///
    /// The file is not touched until [`FeedSource::fetch_text`] runs, so a
    /// missing file surfaces as [`FeedError::FileRead`] at load time.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedSource for FileFeed {
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn fetch_text(&self) -> Result<String, FeedError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FeedError::FileRead {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
    }
}

/// The configured feed, if any.
#[derive(Debug, Clone)]
pub enum Feed {
    /// Fetch the published feed over HTTP(S).
    Http(HttpFeed),
    /// Read an exported copy from disk.
    File(FileFeed),
    /// No source given; loading goes straight to the fallback dataset.
    Unconfigured,
}

impl FeedSource for Feed {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        match self {
            Feed::Http(feed) => feed.fetch_text().await,
            Feed::File(feed) => feed.fetch_text().await,
            Feed::Unconfigured => Err(FeedError::NotConfigured),
        }
    }
}

/// The working article set of one load.
#[derive(Debug, Clone)]
pub struct FeedLoad {
    pub articles: Vec<Article>,
    pub origin: FeedOrigin,
}

/// Fetch once and parse, substituting the fallback dataset on failure or emptiness.
#[instrument(level = "info", skip_all)]
pub async fn load_articles<S: FeedSource>(source: &S) -> FeedLoad {
    let fetched = source.fetch_text().await;
    resolve(fetched)
}

/// Turn a fetch result into the working article set.
pub fn resolve(fetched: Result<String, FeedError>) -> FeedLoad {
    let reason = match fetched {
        Ok(text) => {
            let articles = parse_feed(&text);
            if !articles.is_empty() {
                info!(count = articles.len(), "Using feed articles");
                return FeedLoad {
                    articles,
                    origin: FeedOrigin::Remote,
                };
            }
            "feed contained no valid rows".to_string()
        }
        Err(e) => e.to_string(),
    };

    warn!(%reason, "Feed unavailable; using fallback articles");
    FeedLoad {
        articles: fallback_articles(),
        origin: FeedOrigin::Fallback { reason },
    }
}

/// The fixed sample dataset: five articles across all four categories,
/// dated 2025-08-11 through 2025-08-15.
pub fn fallback_articles() -> Vec<Article> {
    let sample = |date: &str, source: &str, title: &str, summary: &str, url: &str, category: &str| {
        Article {
            date: date.to_string(),
            source: source.to_string(),
            original_title: String::new(),
            title: title.to_string(),
            summary: summary.to_string(),
            url: url.to_string(),
            category: category.to_string(),
        }
    };

    vec![
        sample(
            "2025-08-15",
            "Science Daily",
            "新しい量子コンピューティング技術により、暗号化の安全性が向上",
            "研究者チームが開発した新しい量子暗号化プロトコルは、従来の方法よりも1000倍高い安全性を提供します。この技術は金融機関での実用化が期待されています。",
            "https://example.com/article1",
            "AI・テクノロジー",
        ),
        sample(
            "2025-08-14",
            "AI新聞",
            "火星の地下で新たな生命の痕跡を発見",
            "NASAの探査機が火星の地下深くで、生命活動を示す可能性のある有機化合物を検出しました。この発見は宇宙生物学の分野に大きな影響を与えると予想されます。",
            "https://example.com/article2",
            "宇宙・地球科学",
        ),
        sample(
            "2025-08-13",
            "Ars Technica",
            "遺伝子治療により失明患者の視力が回復",
            "新しい遺伝子編集技術CRISPR-Cas9を使用した臨床試験で、先天性失明症患者の70%が視力を回復しました。この画期的な治療法は他の遺伝性疾患にも応用可能です。",
            "https://example.com/article3",
            "バイオ・医学",
        ),
        sample(
            "2025-08-12",
            "Science Daily",
            "AIが人間の感情をより正確に理解できる新技術",
            "機械学習アルゴリズムの進歩により、AIシステムが人間の微細な感情変化を98%の精度で検出できるようになりました。この技術はメンタルヘルス分野での活用が期待されています。",
            "https://example.com/article4",
            "心理・社会科学",
        ),
        sample(
            "2025-08-11",
            "AI新聞",
            "超高速充電バッテリーの実用化に成功",
            "新しいナノマテリアル技術により、従来の10倍の速度で充電可能なリチウムイオンバッテリーの実用化に成功しました。この技術により電気自動車の普及が加速すると予想されます。",
            "https://example.com/article5",
            "AI・テクノロジー",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// In-memory source for exercising the loader without a network.
    struct StaticFeed(Result<&'static str, u16>);

    impl FeedSource for StaticFeed {
        async fn fetch_text(&self) -> Result<String, FeedError> {
            match self.0 {
                Ok(text) => Ok(text.to_string()),
                Err(status) => Err(FeedError::HttpStatus { status }),
            }
        }
    }

    #[test]
    fn test_fallback_dataset_shape() {
        let articles = fallback_articles();
        assert_eq!(articles.len(), 5);
        let dates: Vec<&str> = articles.iter().map(|a| a.date.as_str()).collect();
        assert_eq!(
            dates,
            ["2025-08-15", "2025-08-14", "2025-08-13", "2025-08-12", "2025-08-11"]
        );
        assert!(articles.iter().all(|a| a.link().is_ok()));
    }

    #[tokio::test]
    async fn test_valid_feed_is_used() {
        let feed = StaticFeed(Ok("2025/8/14,src,orig,title,summary,https://e.com,AI・テクノロジー"));
        let load = load_articles(&feed).await;
        assert_eq!(load.origin, FeedOrigin::Remote);
        assert_eq!(load.articles.len(), 1);
        assert_eq!(load.articles[0].title, "title");
    }

    #[tokio::test]
    async fn test_zero_valid_rows_uses_fallback() {
        let feed = StaticFeed(Ok("too,few,fields\nd,s,o,,missing title,u,c\n\n"));
        let load = load_articles(&feed).await;
        assert_eq!(load.articles, fallback_articles());
        assert!(matches!(load.origin, FeedOrigin::Fallback { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_uses_fallback() {
        let load = load_articles(&StaticFeed(Err(503))).await;
        assert_eq!(load.articles, fallback_articles());
        assert_eq!(
            load.origin,
            FeedOrigin::Fallback {
                reason: "Feed returned HTTP status 503".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unconfigured_feed_uses_fallback() {
        let load = load_articles(&Feed::Unconfigured).await;
        assert_eq!(load.articles.len(), 5);
        assert_eq!(
            load.origin,
            FeedOrigin::Fallback {
                reason: "No feed source configured".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_file_feed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2025-08-15,src,orig,t1,s1,https://e.com/1,バイオ・医学").unwrap();
        writeln!(file, "2025-08-14,src,orig,t2,s2,https://e.com/2,心理・社会科学").unwrap();

        let feed = Feed::File(FileFeed::new(file.path()));
        let load = load_articles(&feed).await;
        assert_eq!(load.origin, FeedOrigin::Remote);
        assert_eq!(load.articles.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_uses_fallback() {
        let feed = Feed::File(FileFeed::new("/nonexistent/curated_news/feed.csv"));
        let load = load_articles(&feed).await;
        assert!(matches!(load.origin, FeedOrigin::Fallback { .. }));
        assert_eq!(load.articles.len(), 5);
    }

    #[tokio::test]
    async fn test_http_feed_success() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "2025-08-15,src,orig,t1,s1,https://e.com/1,AI・テクノロジー\n\
                 2025/8/14,src,orig,t2,s2,https://e.com/2,宇宙・地球科学\n",
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed.csv", mock_server.uri());
        let feed = Feed::Http(HttpFeed::new(url, "curated_news-test").unwrap());
        let load = load_articles(&feed).await;

        assert_eq!(load.origin, FeedOrigin::Remote);
        assert_eq!(load.articles.len(), 2);
        assert_eq!(load.articles[1].date, "2025/8/14");
    }

    #[tokio::test]
    async fn test_http_feed_error_status_uses_fallback() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string("2025-08-15,src,orig,t1,s1,https://e.com/1,AI・テクノロジー"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let url = format!("{}/feed.csv", mock_server.uri());
        let feed = Feed::Http(HttpFeed::new(url, "curated_news-test").unwrap());
        let load = load_articles(&feed).await;

        assert_eq!(
            load.origin,
            FeedOrigin::Fallback {
                reason: "Feed returned HTTP status 500".to_string()
            }
        );
        assert_eq!(load.articles, fallback_articles());
    }
}
