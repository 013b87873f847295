use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Declares a text field that is either available or stands in for a missing
/// result. On the wire it is always a plain string; the unavailable case is
/// written as `$sentinel` and read back from it (or from an empty string).
macro_rules! sentinel_text {
    ($(#[$meta:meta])* $name:ident => $sentinel:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            Available(String),
            #[default]
            Unavailable,
        }

        impl $name {
            pub const SENTINEL: &'static str = $sentinel;

            pub fn is_available(&self) -> bool {
                matches!(self, Self::Available(_))
            }

            pub fn as_text(&self) -> Option<&str> {
                match self {
                    Self::Available(text) => Some(text),
                    Self::Unavailable => None,
                }
            }

            /// The text, or the sentinel when unavailable
            pub fn as_str(&self) -> &str {
                self.as_text().unwrap_or(Self::SENTINEL)
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                if text.trim().is_empty() || text == Self::SENTINEL {
                    Self::Unavailable
                } else {
                    Self::Available(text)
                }
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self::from(text.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Available(text) => text,
                    $name::Unavailable => $name::SENTINEL.to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

sentinel_text! {
    /// Scraped body text of an article
    ArticleContent => "Content not available"
}

sentinel_text! {
    /// Free-form model analysis of one article
    AnalysisText => "Analysis not available"
}

sentinel_text! {
    /// Return estimate for one time horizon, extracted verbatim from the analysis
    Projection => "Not available"
}

sentinel_text! {
    /// Markdown summary across all analyzed articles
    FinalAnalysis => "Final analysis not available"
}

fn default_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "Utc::now")]
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub content: ArticleContent,
}

impl Article {
    pub fn new(title: impl Into<String>, link: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            author: default_author(),
            published_at,
            content: ArticleContent::Unavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(default)]
    pub analysis: AnalysisText,
    #[serde(default)]
    pub estimated_returns_1_month: Projection,
    #[serde(default)]
    pub estimated_returns_1_year: Projection,
}

impl AnalyzedArticle {
    /// An article whose analysis could not be produced
    pub fn failed(article: Article) -> Self {
        Self {
            article,
            analysis: AnalysisText::Unavailable,
            estimated_returns_1_month: Projection::Unavailable,
            estimated_returns_1_year: Projection::Unavailable,
        }
    }
}

/// Ticker lookup result for the search box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub symbol: String,
    pub name: String,
    pub exchange: Option<String>,
    pub quote_type: Option<String>,
}

/// What to list: `count` articles about `ticker` published on or after `start_date`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub ticker: String,
    pub count: usize,
    pub start_date: NaiveDate,
}

impl ListingQuery {
    pub fn new(ticker: impl Into<String>, count: usize, start_date: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            count,
            start_date,
        }
    }

    /// Inclusive lower bound, midnight UTC of the start date
    pub fn window_start(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start_date.and_time(NaiveTime::MIN))
    }

    pub fn includes(&self, published_at: &DateTime<Utc>) -> bool {
        *published_at >= self.window_start()
    }
}
