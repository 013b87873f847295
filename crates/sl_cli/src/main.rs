use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use reqwest::Client;
use serde::Serialize;
use sl_core::{InferenceModel, Result};
use sl_inference::{create_model, Analyst};
use sl_scrapers::{
    build_client, ArticleSource, ContentFetcher, FinvizScraper, NewsLister, TickerLookup,
    YahooFinanceClient,
};
use sl_web::handlers::SearchArticlesResponse;
use sl_web::{create_app, AppState};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{Cli, Commands};

fn init_model(cli: &Cli, client: Client) -> Result<Arc<dyn InferenceModel>> {
    let model = create_model(&cli.inference_config(), client)?;
    info!("🧠 Inference model initialized successfully (using {})", model.name());
    Ok(model)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn serve(cli: &Cli, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    info!("🚀 Serving on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let fetch_config = cli.fetch_config();
    let client = build_client(&fetch_config)?;

    let yahoo = Arc::new(YahooFinanceClient::new(client.clone()));
    let finviz = Arc::new(FinvizScraper::new(client.clone()));
    let fetcher = ContentFetcher::new(client.clone(), fetch_config);
    let lister = NewsLister::new(finviz.clone(), yahoo.clone(), fetcher.clone());
    info!("🦗 News sources initialized: {} (fallback: {})", finviz.source(), yahoo.source());

    let today = Utc::now().date_naive();
    match &cli.command {
        Commands::Serve => {
            let analyst = Analyst::new(init_model(&cli, client)?).with_config(cli.analyst_config());
            let state = AppState {
                lister: Arc::new(lister),
                lookup: yahoo,
                fetcher,
                analyst,
            };
            serve(&cli, state).await
        }
        Commands::Articles { ticker, window } => {
            let query = window.query(ticker, today)?;
            info!("📰 Listing {} articles for {} since {}", query.count, query.ticker, query.start_date);
            let articles = lister.list_articles(&query).await?;
            print_json(&articles)
        }
        Commands::Analyze { ticker, window } => {
            let analyst = Analyst::new(init_model(&cli, client)?).with_config(cli.analyst_config());
            let query = window.query(ticker, today)?;
            let articles = lister.list_articles(&query).await?;
            if articles.is_empty() {
                info!("No articles found for {}", query.ticker);
                return Ok(());
            }

            let analyzed = analyst.analyze_articles(&articles).await;
            let final_analysis = analyst.final_analysis(&articles).await;
            print_json(&SearchArticlesResponse {
                final_analysis,
                articles: analyzed,
            })
        }
        Commands::Suggest { query } => {
            let suggestions = yahoo.suggest(query.trim()).await?;
            print_json(&suggestions)
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
