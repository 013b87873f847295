use std::time::Duration;

use chrono::{Days, NaiveDate};
use clap::Parser;
use sl_core::{Error, ListingQuery, Result};
use sl_inference::{AnalystConfig, Config, ModelProvider};
use sl_scrapers::FetchConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Stock news scraping and analysis service", long_about = None)]
pub struct Cli {
    #[arg(long, env = "SL_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "SL_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(long, env = "SL_MODEL", default_value = "gemini", help = "Model to use for inference. Available models: gemini (default), deepseek, dummy")]
    pub model: ModelProvider,
    #[arg(long, env = "SL_MODEL_NAME")]
    pub model_name: Option<String>,
    /// Falls back to GOOGLE_API_KEY (gemini) or DEEPSEEK_API_KEY (deepseek)
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long, env = "SL_MODEL_URL")]
    pub model_url: Option<String>,
    /// Per-request timeout for outbound HTTP, in seconds
    #[arg(long, default_value_t = 10)]
    pub fetch_timeout: u64,
    /// Attempts per article page, including the first
    #[arg(long, default_value_t = 3)]
    pub fetch_retries: u32,
    /// Delay between article fetch attempts, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub retry_delay: u64,
    #[arg(long, default_value_t = 5)]
    pub max_concurrent_fetches: usize,
    /// Pause between consecutive analyses, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub pause_between: u64,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve,
    /// List recent articles for a ticker, with scraped content
    Articles {
        ticker: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// List, analyze and summarize recent articles for a ticker
    Analyze {
        ticker: String,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Look up ticker symbols matching a query
    Suggest {
        query: String,
    },
}

#[derive(clap::Args, Debug)]
pub struct WindowArgs {
    #[arg(long, short = 'n', default_value_t = 5)]
    pub count: usize,
    /// Earliest publication date (YYYY-MM-DD), overrides --days
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
    #[arg(long, default_value_t = 7)]
    pub days: u64,
}

impl WindowArgs {
    pub fn query(&self, ticker: &str, today: NaiveDate) -> Result<ListingQuery> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(Error::Config("Stock ticker is required".to_string()));
        }
        if self.count == 0 {
            return Err(Error::Config("--count must be at least 1".to_string()));
        }
        let start_date = match self.start_date {
            Some(date) => date,
            None => today
                .checked_sub_days(Days::new(self.days))
                .ok_or_else(|| Error::Config(format!("--days {} is out of range", self.days)))?,
        };
        Ok(ListingQuery::new(ticker, self.count, start_date))
    }
}

impl Cli {
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout),
            max_attempts: self.fetch_retries.max(1),
            retry_delay: Duration::from_millis(self.retry_delay),
            max_concurrent_fetches: self.max_concurrent_fetches.max(1),
            ..FetchConfig::default()
        }
    }

    pub fn inference_config(&self) -> Config {
        Config {
            provider: self.model,
            api_key: resolve_api_key(self.api_key.clone(), self.model, |var| std::env::var(var).ok()),
            model_name: self.model_name.clone(),
            base_url: self.model_url.clone(),
        }
    }

    pub fn analyst_config(&self) -> AnalystConfig {
        AnalystConfig {
            pause_between: Duration::from_millis(self.pause_between),
            ..AnalystConfig::default()
        }
    }
}

/// Provider specific environment variable holding the API key
pub fn api_key_var(provider: ModelProvider) -> Option<&'static str> {
    match provider {
        ModelProvider::Gemini => Some("GOOGLE_API_KEY"),
        ModelProvider::DeepSeek => Some("DEEPSEEK_API_KEY"),
        ModelProvider::Dummy => None,
    }
}

pub fn resolve_api_key(
    explicit: Option<String>,
    provider: ModelProvider,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    explicit
        .filter(|key| !key.trim().is_empty())
        .or_else(|| api_key_var(provider).and_then(|var| lookup(var)))
        .filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("sl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["serve"]);
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.model, ModelProvider::Gemini);

        let fetch = cli.fetch_config();
        assert_eq!(fetch.timeout, Duration::from_secs(10));
        assert_eq!(fetch.max_attempts, 3);
        assert_eq!(fetch.retry_delay, Duration::from_secs(2));
        assert_eq!(cli.analyst_config().pause_between, Duration::from_secs(1));
    }

    #[test]
    fn test_model_flag() {
        let cli = parse(&["--model", "dummy", "--pause-between", "0", "suggest", "apple"]);
        assert_eq!(cli.model, ModelProvider::Dummy);
        assert!(cli.analyst_config().pause_between.is_zero());
        assert!(matches!(cli.command, Commands::Suggest { ref query } if query == "apple"));

        assert!(Cli::try_parse_from(["sl", "--model", "gpt", "serve"]).is_err());
    }

    #[test]
    fn test_window_query() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        let cli = parse(&["articles", " tsla ", "-n", "3", "--days", "2"]);
        let Commands::Articles { ticker, window } = cli.command else {
            panic!("expected articles subcommand");
        };
        let query = window.query(&ticker, today).unwrap();
        assert_eq!(query.ticker, "TSLA");
        assert_eq!(query.count, 3);
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());

        let cli = parse(&["analyze", "TSLA", "--start-date", "2024-01-02", "--days", "2"]);
        let Commands::Analyze { ticker, window } = cli.command else {
            panic!("expected analyze subcommand");
        };
        let query = window.query(&ticker, today).unwrap();
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }

    #[test]
    fn test_zero_count_rejected() {
        let window = WindowArgs { count: 0, start_date: None, days: 7 };
        let today = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        assert!(matches!(window.query("AAPL", today), Err(Error::Config(_))));
    }

    #[test]
    fn test_resolve_api_key() {
        let env = |var: &str| (var == "GOOGLE_API_KEY").then(|| "from-env".to_string());

        assert_eq!(
            resolve_api_key(Some("explicit".to_string()), ModelProvider::Gemini, env),
            Some("explicit".to_string())
        );
        assert_eq!(resolve_api_key(None, ModelProvider::Gemini, env), Some("from-env".to_string()));
        assert_eq!(resolve_api_key(None, ModelProvider::DeepSeek, env), None);
        assert_eq!(resolve_api_key(Some(" ".to_string()), ModelProvider::Dummy, env), None);
    }
}
