//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Capa de conexiones:
//! 1. Escucha en un puerto
//! 2. Entrega cada conexión aceptada a un pool fijo de workers
//! 3. En el worker: parsea, despacha y escribe la respuesta
//! 4. Cierra la conexión (sin keep-alive)

pub mod pool;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use pool::{PoolError, WorkerPool};
pub use tcp::{ConnectionHandler, Server, SERVER_NAME};
