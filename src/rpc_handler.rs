//! RPC method handler for the SiteBook JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested. `handle_method`
//! dispatches each call to the website store or the settings engine, and
//! `serve` runs the newline-delimited request loop over any reader/writer.

use std::io::{self, BufRead, Write};

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::app::App;
use crate::managers::website_store::WebsiteStoreTrait;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::types::website::{ListFilter, Website, WebsiteId};

fn website_json(w: &Website) -> Value {
    json!({"id": w.id, "title": w.title, "link": w.link, "is_favorite": w.is_favorite})
}

fn items_json(websites: &[Website]) -> Value {
    json!({"items": websites.iter().map(website_json).collect::<Vec<_>>()})
}

fn str_param<'a>(params: &'a Value, name: &str) -> Result<&'a str, String> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", name))
}

fn id_param(params: &Value) -> Result<WebsiteId, String> {
    let raw = str_param(params, "id")?;
    raw.parse().map_err(|e| format!("invalid id '{}': {}", raw, e))
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    let store = &app.store;
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Websites ───
        "website.add" => {
            let title = str_param(params, "title")?;
            let link = str_param(params, "link")?;
            let website = store.add_website(title, link).map_err(|e| e.to_string())?;
            Ok(website_json(&website))
        }
        "website.list" => {
            let filter = match params.get("filter").and_then(|v| v.as_str()) {
                Some(name) => name.parse::<ListFilter>()?,
                None => ListFilter::All,
            };
            let websites = store.list(filter).map_err(|e| e.to_string())?;
            Ok(items_json(&websites))
        }
        "website.favorites" => Ok(items_json(&store.list_favorites())),
        "website.set_favorite" => {
            let id = id_param(params)?;
            let is_favorite = params
                .get("is_favorite")
                .and_then(|v| v.as_bool())
                .ok_or("missing is_favorite")?;
            store.set_favorite(id, is_favorite).map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "website.toggle_favorite" => {
            let id = id_param(params)?;
            let is_favorite = store.toggle_favorite(id).map_err(|e| e.to_string())?;
            Ok(json!({"id": id, "is_favorite": is_favorite}))
        }
        "website.open" => {
            let id = id_param(params)?;
            let website = store.get_website(id).map_err(|e| e.to_string())?;
            let url = website.url().map_err(|e| e.to_string())?;
            Ok(json!({
                "id": website.id,
                "title": website.title,
                "url": url.as_str(),
                "is_favorite": website.is_favorite,
            }))
        }
        "website.clear" => {
            store.delete_all().map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Settings ───
        "settings.get" => {
            let engine = app.settings_engine.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let mut engine = app.settings_engine.lock().map_err(|e| e.to_string())?;
            engine.set_value(key, value).map_err(|e| e.to_string())?;
            serde_json::to_value(engine.get_settings()).map_err(|e| e.to_string())
        }
        "settings.reset" => {
            let mut engine = app.settings_engine.lock().map_err(|e| e.to_string())?;
            engine.reset().map_err(|e| e.to_string())?;
            serde_json::to_value(engine.get_settings()).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Turns one raw request line into its response. Blank lines get none.
fn respond_to_line(app: &App, raw: &[u8]) -> Option<Value> {
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line.trim(),
        Err(e) => {
            warn!("request line is not UTF-8: {}", e);
            return Some(json!({"id": null, "error": format!("parse error: {}", e)}));
        }
    };
    if line.is_empty() {
        return None;
    }

    let req: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!("unparseable request: {}", e);
            return Some(json!({"id": null, "error": format!("parse error: {}", e)}));
        }
    };

    let id = req.get("id").cloned().unwrap_or(Value::Null);
    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
    let params = req.get("params").cloned().unwrap_or(json!({}));
    debug!(%method, "rpc request");

    Some(match handle_method(app, method, &params) {
        Ok(val) => json!({"id": id, "result": val}),
        Err(err) => json!({"id": id, "error": err}),
    })
}

/// Answers requests from `input` until it ends or can no longer be read.
///
/// A read failure ends the loop normally so the caller can still shut down;
/// only a failure to write a response is returned as an error.
pub fn serve(app: &App, mut input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("request stream failed, stopping: {}", e);
                break;
            }
        }
        if let Some(response) = respond_to_line(app, &buf) {
            writeln!(out, "{}", response)?;
            out.flush()?;
        }
    }
    Ok(())
}
