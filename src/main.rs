//! # minihttp - Entry Point
//! src/main.rs
//!
//! Lee la configuración, registra las rutas y arranca el servidor.

use minihttp::config::Config;
use minihttp::logging;
use minihttp::metrics::{self, MetricsCollector};
use minihttp::router::HandlerTable;
use minihttp::server::Server;
use minihttp::site::{self, StaticFiles};
use std::process;
use std::sync::Arc;
use tracing::{debug, error, info};

fn main() {
    let config = Config::new();
    logging::init(&config.log_level);

    if let Err(e) = config.validate() {
        error!(error = %e, "configuración inválida");
        process::exit(2);
    }
    config.log_summary();

    let metrics = MetricsCollector::new();
    let table = Arc::new(HandlerTable::new());

    // Todas las rutas quedan registradas antes de aceptar conexiones
    let files = Arc::new(StaticFiles::new(&config.public_dir));
    site::register_routes(&table, files);
    metrics::register_metrics_endpoint(&table, metrics.clone());

    for (method, path) in table.routes() {
        debug!(%method, %path, "ruta");
    }
    info!(routes = table.len(), "rutas registradas");

    let server = match Server::bind(config, table, metrics) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "no se pudo iniciar el servidor");
            process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        error!(error = %e, "error fatal");
        process::exit(1);
    }
}
