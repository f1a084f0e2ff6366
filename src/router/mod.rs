//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Despacha un request ya parseado al handler registrado para su
//! (método, path).
//!
//! ```text
//! Request → Dispatcher → HandlerTable → Handler → Response
//! ```
//!
//! Si no hay handler, el dispatcher solo reporta `NotFound`; la capa de
//! conexiones decide qué escribir en el socket (404).

pub mod table;

pub use table::{Handler, HandlerTable};

use crate::http::{Method, Request, Response};
use std::sync::Arc;
use thiserror::Error;

/// Resultado negativo del dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// El request era válido pero nadie registró (método, path)
    #[error("no handler for {method} {path}")]
    NotFound { method: Method, path: String },
}

/// Despachador de requests
///
/// Es barato de clonar: todos los clones comparten la misma tabla.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<HandlerTable>,
}

impl Dispatcher {
    pub fn new(table: Arc<HandlerTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &HandlerTable {
        &self.table
    }

    /// Busca y ejecuta el handler del request
    ///
    /// # Ejemplo
    /// ```
    /// use std::sync::Arc;
    /// use minihttp::http::{Method, Request, Response};
    /// use minihttp::router::{DispatchError, Dispatcher, HandlerTable};
    ///
    /// let table = HandlerTable::new();
    /// table.register(Method::GET, "/index.html", |_req: &Request| Response::json("{}"));
    /// let dispatcher = Dispatcher::new(Arc::new(table));
    ///
    /// let found = Request::parse(b"GET /index.html HTTP/1.1\r\n\r\n").unwrap();
    /// assert!(dispatcher.dispatch(&found).is_ok());
    ///
    /// let missing = Request::parse(b"GET /missing.html HTTP/1.1\r\n\r\n").unwrap();
    /// assert!(matches!(dispatcher.dispatch(&missing), Err(DispatchError::NotFound { .. })));
    /// ```
    pub fn dispatch(&self, request: &Request) -> Result<Response, DispatchError> {
        let handler = self
            .table
            .resolve(request.method(), request.path())
            .ok_or_else(|| DispatchError::NotFound {
                method: request.method(),
                path: request.path().to_string(),
            })?;

        Ok(handler(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusCode;

    fn echo_query(req: &Request) -> Response {
        let name = req.query_param("name").unwrap_or("anonymous");
        Response::new(StatusCode::Ok).with_body(name)
    }

    fn dispatcher_with(register: impl FnOnce(&HandlerTable)) -> Dispatcher {
        let table = HandlerTable::new();
        register(&table);
        Dispatcher::new(Arc::new(table))
    }

    #[test]
    fn test_dispatch_found() {
        let dispatcher = dispatcher_with(|t| t.register(Method::GET, "/hello", echo_query));

        let request = Request::parse(b"GET /hello?name=ana HTTP/1.1\r\n\r\n").unwrap();
        let response = dispatcher.dispatch(&request).unwrap();

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.body(), b"ana");
    }

    #[test]
    fn test_dispatch_absent_query_param_is_handled() {
        let dispatcher = dispatcher_with(|t| t.register(Method::GET, "/hello", echo_query));

        let request = Request::parse(b"GET /hello HTTP/1.1\r\n\r\n").unwrap();
        let response = dispatcher.dispatch(&request).unwrap();

        assert_eq!(response.body(), b"anonymous");
    }

    #[test]
    fn test_dispatch_not_found() {
        let dispatcher = dispatcher_with(|t| t.register(Method::GET, "/hello", echo_query));

        let request = Request::parse(b"GET /nonexistent HTTP/1.1\r\n\r\n").unwrap();

        assert_eq!(
            dispatcher.dispatch(&request).unwrap_err(),
            DispatchError::NotFound {
                method: Method::GET,
                path: "/nonexistent".to_string(),
            }
        );
    }

    #[test]
    fn test_dispatch_wrong_method_is_not_found() {
        let dispatcher = dispatcher_with(|t| t.register(Method::GET, "/hello", echo_query));

        let request = Request::parse(b"POST /hello HTTP/1.1\r\n\r\n").unwrap();
        assert!(dispatcher.dispatch(&request).is_err());
    }

    #[test]
    fn test_dispatch_ignores_query_when_matching() {
        let dispatcher = dispatcher_with(|t| t.register(Method::GET, "/hello", echo_query));

        let request = Request::parse(b"GET /hello?x=1 HTTP/1.1\r\n\r\n").unwrap();
        assert!(dispatcher.dispatch(&request).is_ok());
    }

    #[test]
    fn test_not_found_message() {
        let error = DispatchError::NotFound {
            method: Method::POST,
            path: "/x".to_string(),
        };
        assert_eq!(error.to_string(), "no handler for POST /x");
    }

    #[test]
    fn test_clones_share_table() {
        let dispatcher = dispatcher_with(|_| {});
        let clone = dispatcher.clone();

        dispatcher.table().register(Method::GET, "/late", echo_query);

        let request = Request::parse(b"GET /late HTTP/1.1\r\n\r\n").unwrap();
        assert!(clone.dispatch(&request).is_ok());
    }
}
