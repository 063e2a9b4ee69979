mod config;
mod corpus;
mod errors;
mod interview;
mod llm_client;
mod research;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::corpus::store::CorpusStore;
use crate::interview::context::ContextProvider;
use crate::interview::machine::InterviewMachine;
use crate::interview::registry::SessionRegistry;
use crate::llm_client::LlmClient;
use crate::research::WikipediaResearch;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interviewer API v{}", env!("CARGO_PKG_VERSION"));

    // Load the resume corpus, if one was uploaded before
    let corpus = Arc::new(
        CorpusStore::open(
            &config.corpus_path,
            config.retrieval_top_k,
            config.chunk_config,
        )
        .await?,
    );

    // Initialize LLM client
    let llm = LlmClient::new(
        config.anthropic_api_key.clone(),
        config.llm_model.clone(),
        config.phase_timeout,
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    let mut machine = InterviewMachine::new(
        corpus.clone() as Arc<dyn ContextProvider>,
        Arc::new(llm),
        config.phase_timeout,
    );

    // Optional topic research for the Ask phase
    if config.topic_research {
        let research = WikipediaResearch::new(&config.wikipedia_api_url, config.research_timeout)?;
        machine = machine.with_research(Arc::new(research));
        info!("Topic research enabled ({})", config.wikipedia_api_url);
    }

    // Build app state
    let state = AppState {
        machine: Arc::new(machine),
        sessions: SessionRegistry::new(),
        corpus,
        config: config.clone(),
    };

    // Build router
    // TODO: restrict CORS origins once the web client has a fixed host
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
