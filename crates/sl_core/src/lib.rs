pub mod models;
pub mod error;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use models::InferenceModel;
pub use types::{
    AnalysisText, AnalyzedArticle, Article, ArticleContent, FinalAnalysis, ListingQuery,
    Projection, Suggestion,
};
