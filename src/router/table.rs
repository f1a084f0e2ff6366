//! # Tabla de Handlers
//! src/router/table.rs
//!
//! Registro (método, path exacto) → handler. Se llena al arrancar, antes
//! de abrir el socket, y después solo se lee desde muchos workers a la
//! vez. Ninguna entrada se elimina.

use crate::http::{Method, Request, Response};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler compartido entre workers
///
/// Recibe el request ya parseado y retorna la respuesta; no escribe en
/// el socket.
pub type Handler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// Mapa método → (path exacto → handler)
#[derive(Default)]
pub struct HandlerTable {
    routes: RwLock<HashMap<Method, HashMap<String, Handler>>>,
}

impl HandlerTable {
    /// Crea una tabla vacía
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un handler para (método, path)
    ///
    /// Si ya había uno para el mismo par, el último registro gana; no es
    /// un error.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::{Method, Request, Response};
    /// use minihttp::router::HandlerTable;
    ///
    /// let table = HandlerTable::new();
    /// table.register(Method::GET, "/hello", |_req: &Request| {
    ///     Response::json(r#"{"message": "Hello"}"#)
    /// });
    /// assert!(table.resolve(Method::GET, "/hello").is_some());
    /// ```
    pub fn register<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request) -> Response + Send + Sync + 'static,
    {
        self.routes
            .write()
            .entry(method)
            .or_default()
            .insert(path.to_string(), Arc::new(handler));
    }

    /// Busca el handler para (método, path)
    ///
    /// Solo coincidencia exacta: sin patrones, prefijos ni normalización
    /// de `/` final. El lock se libera antes de retornar, así que el
    /// handler se ejecuta sin bloquear a otros lectores.
    pub fn resolve(&self, method: Method, path: &str) -> Option<Handler> {
        self.routes
            .read()
            .get(&method)
            .and_then(|paths| paths.get(path))
            .cloned()
    }

    /// Cantidad de pares (método, path) registrados
    pub fn len(&self) -> usize {
        self.routes.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lista ordenada de rutas registradas, para el log de arranque
    pub fn routes(&self) -> Vec<(Method, String)> {
        let routes = self.routes.read();
        let mut listed: Vec<(Method, String)> = routes
            .iter()
            .flat_map(|(method, paths)| paths.keys().map(move |path| (*method, path.clone())))
            .collect();
        listed.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.as_str().cmp(b.0.as_str())));
        listed
    }
}
