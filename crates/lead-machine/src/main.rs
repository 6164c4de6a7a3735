//! Runs the lead machine server.

#[macro_use]
extern crate tracing;

use std::process::ExitCode;

use lead_machine::core::Dispatcher;
use lead_machine::{AppConfig, AppState, router};
use lead_machine_gemini_model::GeminiProvider;
use reqwest::Client;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing `.env` is fine, the environment may be set already.
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::FAILURE;
        }
    };
    debug!("{config:?}");
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set, chat requests will fail");
    }

    let client = Client::new();
    let provider = GeminiProvider::with_client(client.clone(), config.gemini);
    let dispatcher = Dispatcher::new(provider, config.policy);

    if config.site.supabase().is_none() {
        warn!("database credentials are not set, leads endpoints are off");
    }
    let state = AppState::new(dispatcher, config.gemini_api_key)
        .with_site(config.site, &client);

    let listener = match TcpListener::bind(config.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind {}: {err}", config.addr);
            return ExitCode::FAILURE;
        }
    };
    info!("listening on {}", config.addr);

    if let Err(err) = axum::serve(listener, router(state)).await {
        error!("server error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
