//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./minihttp --port 9999 --workers 64 --public-dir ./public
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_HOST=0.0.0.0 PUBLIC_DIR=/srv/www ./minihttp
//! ```

use crate::http::DEFAULT_HEADER_LIMIT;
use clap::Parser;
use tracing::info;

/// Límite mínimo aceptado para request line + headers
const MIN_HEADER_LIMIT: usize = 16;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "minihttp")]
#[command(about = "Servidor HTTP/1.1 mínimo con parser propio")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9999", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers: conexiones atendidas a la vez; el resto espera
    #[arg(short, long, default_value = "64", env = "HTTP_WORKERS")]
    pub workers: usize,

    /// Directorio con los archivos estáticos
    #[arg(long = "public-dir", default_value = "./public", env = "PUBLIC_DIR")]
    pub public_dir: String,

    /// Bytes máximos para request line + headers (no incluye el body)
    #[arg(long = "header-limit", default_value_t = DEFAULT_HEADER_LIMIT, env = "HEADER_LIMIT")]
    pub header_limit: usize,

    /// Filtro de logging si no se define RUST_LOG (ej: "info", "minihttp=debug")
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use minihttp::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:9999");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }
        if self.header_limit < MIN_HEADER_LIMIT {
            return Err(format!("Header limit must be >= {} bytes", MIN_HEADER_LIMIT));
        }
        if self.public_dir.trim().is_empty() {
            return Err("Public dir must not be empty".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración en el log
    pub fn log_summary(&self) {
        info!(
            address = %self.address(),
            workers = self.workers,
            public_dir = %self.public_dir,
            header_limit = self.header_limit,
            "configuración cargada"
        );
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 9999,
            host: "127.0.0.1".to_string(),
            workers: 64,
            public_dir: "./public".to_string(),
            header_limit: DEFAULT_HEADER_LIMIT,
            log_level: "info".to_string(),
        }
    }
}
