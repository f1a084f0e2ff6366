//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing`. `RUST_LOG` tiene prioridad; si no está definido se
//! usa el filtro que viene de la configuración.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Instala el subscriber global
///
/// Llamarlo más de una vez no es un error: la segunda instalación se
/// ignora (útil en tests que levantan varios servidores).
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .try_init();
}
