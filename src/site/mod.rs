//! # Sitio Estático
//! src/site/mod.rs
//!
//! Rutas del sitio de demostración. Cada ruta sirve el archivo del mismo
//! nombre desde el directorio público.

pub mod files;
pub mod mime;

pub use files::StaticFiles;

use crate::http::{Method, Request};
use crate::router::HandlerTable;
use std::sync::Arc;
use tracing::debug;

/// Páginas que se sirven con GET
pub const GET_PAGES: &[&str] = &[
    "/index.html",
    "/spring.svg",
    "/spring.png",
    "/resources.html",
    "/styles.css",
    "/app.js",
    "/links.html",
    "/forms.html",
    "/classic.html",
    "/events.html",
    "/events.js",
    "/index2.html",
    "/vinni.png",
];

/// Páginas que también aceptan POST (formularios)
pub const POST_PAGES: &[&str] = &["/resources.html"];

/// Registra todas las páginas del sitio en la tabla
pub fn register_routes(table: &HandlerTable, files: Arc<StaticFiles>) {
    let routes = GET_PAGES
        .iter()
        .map(|path| (Method::GET, *path))
        .chain(POST_PAGES.iter().map(|path| (Method::POST, *path)));

    for (method, path) in routes {
        let files = Arc::clone(&files);
        table.register(method, path, move |request: &Request| files.serve(request));
        debug!(%method, path, "route registered");
    }
}
