//! # Módulo HTTP
//!
//! Implementa el lado request de HTTP/1.1 desde cero, sin librerías de
//! parsing:
//!
//! - Búsqueda de delimitadores (`CRLF`, `CRLFCRLF`) en el buffer
//! - Parsing de request line, headers y body con `Content-Length`
//! - Descomposición del target en path + query parameters
//! - Construcción de responses
//!
//! ### Formato de Request
//!
//! ```text
//! METHOD SP TARGET SP VERSION CRLF
//! Name: value CRLF
//! CRLF
//! body (solo POST, largo dado por Content-Length)
//! ```
//!
//! No se soportan keep-alive, chunked transfer encoding ni header folding:
//! cada conexión produce como mucho un request.

pub mod parser;    // Parser sobre el stream de la conexión
pub mod request;   // Request ya parseado
pub mod response;  // Construcción de HTTP responses
pub mod scanner;   // Búsqueda de delimitadores
pub mod status;    // Códigos de estado HTTP
pub mod target;    // Path + query parameters

// Re-exportamos los tipos principales para facilitar su uso
pub use parser::{parse, ParseError, DEFAULT_HEADER_LIMIT};
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
pub use target::{QueryParams, RequestTarget};
