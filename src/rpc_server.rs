//! SiteBook RPC Server: JSON-RPC over stdin/stdout for the presentation layer.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"website.add", "params":{"title":"...","link":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! Logs go to stderr; stdout carries only protocol lines.

use std::error::Error;
use std::io::{self, Write};

use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitebook::app::App;
use sitebook::rpc_handler::serve;
use sitebook::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

fn setup_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut settings_engine = SettingsEngine::new(None);
    // Read once up front so the log filter applies before the store opens.
    let log_filter = settings_engine
        .load()
        .map(|s| s.log_filter)
        .unwrap_or_else(|_| sitebook::types::settings::DEFAULT_LOG_FILTER.to_string());
    setup_logging(&log_filter);

    let app = App::from_settings(settings_engine)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", json!({"event":"ready","version":env!("CARGO_PKG_VERSION")}))?;
    out.flush()?;

    let served = serve(&app, io::stdin().lock(), &mut out);
    info!("request stream closed, shutting down");
    app.shutdown()?;
    served?;
    Ok(())
}
