//! # minihttp
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: parser propio sobre el socket, tabla de
//! handlers por (método, path exacto) y un pool fijo de workers. Cada
//! conexión lleva un solo request y se cierra después de responder.
//!
//! ## Arquitectura
//!
//! - `http`: scanner de bytes, parser de requests, request/response
//! - `router`: tabla de handlers y dispatcher
//! - `server`: listener TCP, pool de workers y manejo de conexiones
//! - `site`: archivos estáticos del sitio de demostración
//! - `metrics`: contadores y latencias, expuestos en `/metrics`
//! - `config` y `logging`: CLI/env y `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use minihttp::config::Config;
//! use minihttp::metrics::MetricsCollector;
//! use minihttp::router::HandlerTable;
//! use minihttp::server::Server;
//! use std::sync::Arc;
//!
//! let table = Arc::new(HandlerTable::new());
//! let server = Server::bind(Config::default(), table, MetricsCollector::new())
//!     .expect("no se pudo abrir el socket");
//! server.run().expect("error en el loop de aceptación");
//! ```

pub mod config;
pub mod http;
pub mod logging;
pub mod metrics;
pub mod router;
pub mod server;
pub mod site;
