//! # Sistema de Métricas
//! src/metrics/mod.rs
//!
//! Recolección de métricas del servidor:
//! - Contadores de requests y códigos de estado
//! - Errores de parsing por tipo
//! - Latencias (p50, p95, p99)
//! - Conexiones activas

pub mod collector;

pub use collector::{MetricsCollector, MetricsSnapshot};

use crate::http::{Method, Request, Response};
use crate::router::HandlerTable;

/// Path del endpoint de métricas
pub const METRICS_PATH: &str = "/metrics";

/// Registra `GET /metrics`, que responde el snapshot actual en JSON
pub fn register_metrics_endpoint(table: &HandlerTable, metrics: MetricsCollector) {
    table.register(Method::GET, METRICS_PATH, move |_: &Request| {
        Response::json(&metrics.to_json())
    });
}
