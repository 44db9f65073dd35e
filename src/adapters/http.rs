//! Web interface — status page, JSON status feed, and settings endpoint.
//!
//! Three routes on the built-in HTTP server:
//!
//! - `GET /`       — the monitoring page (static HTML, polls `/data`)
//! - `GET /data`   — JSON array of per-channel status rows
//! - `POST /update` — form submission of per-channel parameters
//!
//! Handlers run on the httpd task, concurrently with the control loop.
//! That is safe by construction: `/data` reads the cache lock-free and
//! snapshots channels one critical section at a time, and `/update`
//! commits each channel's fields inside a single critical section.

use esp_idf_svc::http::server::{Configuration as HttpConfig, EspHttpServer};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::{Read as _, Write as _};
use log::info;

use crate::sensors::SensorCache;
use crate::status;
use crate::store::ParameterStore;

use super::update_form;

const INDEX_HTML: &str = include_str!("index.html");

/// Running HTTP server; routes are unregistered when this is dropped.
pub struct HttpApi {
    _server: EspHttpServer<'static>,
}

impl HttpApi {
    /// Register all routes and start serving. `now_ms` must be the same
    /// monotonic clock the control loop runs on, so remaining-time fields
    /// agree with what the state machine sees.
    pub fn start(
        store: &'static ParameterStore,
        cache: &'static SensorCache,
        now_ms: fn() -> u64,
    ) -> anyhow::Result<Self> {
        let mut server = EspHttpServer::new(&HttpConfig::default())?;

        server.fn_handler("/", Method::Get, |req| -> anyhow::Result<()> {
            req.into_response(200, Some("OK"), &[("Content-Type", "text/html")])?
                .write_all(INDEX_HTML.as_bytes())?;
            Ok(())
        })?;

        server.fn_handler("/data", Method::Get, move |req| -> anyhow::Result<()> {
            let rows = status::project(store, cache, now_ms());
            let body = serde_json::to_string(&rows)?;
            req.into_response(200, Some("OK"), &[("Content-Type", "application/json")])?
                .write_all(body.as_bytes())?;
            Ok(())
        })?;

        server.fn_handler("/update", Method::Post, move |mut req| -> anyhow::Result<()> {
            let mut buf = [0u8; 1024];
            let mut len = 0;
            while len < buf.len() {
                let n = req.read(&mut buf[len..])?;
                if n == 0 {
                    break;
                }
                len += n;
            }
            let body = core::str::from_utf8(&buf[..len])?;

            for (ch, update) in update_form::parse(body).iter().enumerate() {
                if !update.is_empty() {
                    store.apply_update(ch, update);
                }
            }

            // Back to the dashboard.
            req.into_response(303, Some("See Other"), &[("Location", "/")])?;
            Ok(())
        })?;

        info!("HTTP API up: / /data /update");
        Ok(Self { _server: server })
    }
}
