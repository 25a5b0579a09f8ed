//! Liveness and reference-data endpoints.

use actix_web::{get, HttpResponse};
use serde::Serialize;
use welllog_core::{core_version, ping as core_ping, Lithology};

#[derive(Debug, Serialize)]
struct PingResponse {
    ping: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct LithologyEntry {
    code: Lithology,
    label: &'static str,
}

#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(PingResponse {
        ping: core_ping(),
        version: core_version(),
    })
}

/// Lists the closed lithology set with display labels.
#[get("/lithologies")]
pub async fn list_lithologies() -> HttpResponse {
    let entries: Vec<_> = Lithology::ALL
        .into_iter()
        .map(|code| LithologyEntry {
            code,
            label: code.label(),
        })
        .collect();
    HttpResponse::Ok().json(entries)
}
