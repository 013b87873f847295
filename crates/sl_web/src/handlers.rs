use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sl_core::{AnalyzedArticle, Article, FinalAnalysis, ListingQuery, Suggestion};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_NUM_ARTICLES: usize = 5;
/// Larger requests are clamped to this
pub const MAX_NUM_ARTICLES: usize = 100;
pub const DEFAULT_TIME_FRAME_DAYS: u64 = 7;
pub const MIN_SUGGESTION_QUERY_CHARS: usize = 2;

/// Counts arrive as JSON numbers or as strings from form fields.
/// Fractional numbers are truncated toward zero.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Count {
    Number(i64),
    Float(f64),
    Text(String),
}

impl Count {
    fn value(&self) -> Option<i64> {
        match self {
            Count::Number(n) => Some(*n),
            Count::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Count::Float(_) => None,
            Count::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchArticlesRequest {
    pub stock_ticker: Option<String>,
    pub num_articles: Option<Count>,
    pub start_date: Option<String>,
    pub time_frame: Option<Count>,
}

impl SearchArticlesRequest {
    /// Validates the request into a listing query relative to `today`
    pub fn into_query(self, today: NaiveDate) -> Result<ListingQuery, ApiError> {
        let ticker = required_ticker(self.stock_ticker)?;

        let count = match self.num_articles {
            None => DEFAULT_NUM_ARTICLES,
            Some(count) => count
                .value()
                .filter(|n| *n >= 1)
                .map(|n| usize::try_from(n).unwrap_or(MAX_NUM_ARTICLES).min(MAX_NUM_ARTICLES))
                .ok_or_else(|| bad_request("num_articles must be a positive integer"))?,
        };

        let start_date = match (self.start_date, self.time_frame) {
            (Some(date), _) => NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|_| bad_request("start_date must be formatted as YYYY-MM-DD"))?,
            (None, time_frame) => {
                let days = match time_frame {
                    None => DEFAULT_TIME_FRAME_DAYS,
                    Some(days) => days
                        .value()
                        .and_then(|n| u64::try_from(n).ok())
                        .ok_or_else(|| bad_request("time_frame must be a non-negative number of days"))?,
                };
                today
                    .checked_sub_days(Days::new(days))
                    .ok_or_else(|| bad_request("time_frame is out of range"))?
            }
        };

        Ok(ListingQuery::new(ticker, count, start_date))
    }
}

#[derive(Debug, Serialize)]
pub struct SearchArticlesResponse {
    pub final_analysis: FinalAnalysis,
    pub articles: Vec<AnalyzedArticle>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeArticleRequest {
    pub article: Option<Article>,
    pub stock_ticker: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FinalAnalysisRequest {
    pub articles: Option<Vec<Article>>,
}

#[derive(Debug, Serialize)]
pub struct FinalAnalysisResponse {
    pub final_analysis: FinalAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

fn bad_request(message: &str) -> ApiError {
    ApiError::BadRequest(message.to_string())
}

fn required_ticker(ticker: Option<String>) -> Result<String, ApiError> {
    ticker
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| bad_request("Stock ticker is required"))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn search_articles(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchArticlesRequest>, JsonRejection>,
) -> Result<Json<SearchArticlesResponse>, ApiError> {
    let query = json_body(body)?.into_query(Utc::now().date_naive())?;
    info!(
        "Searching {} articles for {} since {}",
        query.count, query.ticker, query.start_date
    );

    let articles = state.lister.list_articles(&query).await?;
    if articles.is_empty() {
        return Err(ApiError::NotFound("No articles found".to_string()));
    }

    let analyzed = state.analyst.analyze_articles(&articles).await;
    let final_analysis = state.analyst.final_analysis(&articles).await;

    Ok(Json(SearchArticlesResponse {
        final_analysis,
        articles: analyzed,
    }))
}

pub async fn analyze_article(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AnalyzeArticleRequest>, JsonRejection>,
) -> Result<Json<AnalyzedArticle>, ApiError> {
    let request = json_body(body)?;
    let mut article = request.article.ok_or_else(|| bad_request("Article data is required"))?;
    let ticker = required_ticker(request.stock_ticker)?;
    info!("Analyzing article '{}' for {}", article.title, ticker);

    if !article.content.is_available() {
        article.content = state.fetcher.fetch(&article.link).await;
    }

    Ok(Json(state.analyst.analyze_article(article).await))
}

pub async fn generate_final_analysis(
    State(state): State<Arc<AppState>>,
    body: Result<Json<FinalAnalysisRequest>, JsonRejection>,
) -> Result<Json<FinalAnalysisResponse>, ApiError> {
    let articles = json_body(body)?
        .articles
        .filter(|articles| !articles.is_empty())
        .ok_or_else(|| bad_request("Articles are required"))?;

    let final_analysis = state.analyst.final_analysis(&articles).await;
    Ok(Json(FinalAnalysisResponse { final_analysis }))
}

/// Best effort: any failure yields an empty list
pub async fn stock_suggestions(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SuggestionParams>, QueryRejection>,
) -> Json<SuggestionsResponse> {
    let query = params
        .ok()
        .and_then(|Query(params)| params.query)
        .map(|q| q.trim().to_string())
        .unwrap_or_default();

    if query.chars().count() < MIN_SUGGESTION_QUERY_CHARS {
        return Json(SuggestionsResponse { suggestions: vec![] });
    }

    let suggestions = match state.lookup.suggest(&query).await {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!("Ticker lookup for '{}' failed: {}", query, e);
            vec![]
        }
    };
    Json(SuggestionsResponse { suggestions })
}

pub async fn status() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "sl",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
