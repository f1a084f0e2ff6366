//! # Request HTTP
//! src/http/request.rs
//!
//! Resultado inmutable del parser: un `Request` se crea una vez por
//! conexión y se descarta cuando el handler termina.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! POST /resources.html?lang=es HTTP/1.1\r\n
//! Host: localhost:9999\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```

use super::parser::{self, ParseError, DEFAULT_HEADER_LIMIT};
use super::target::QueryParams;
use std::fmt;

/// Métodos HTTP soportados
///
/// Cualquier otro método se rechaza antes de construir el `Request`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET - Obtener un recurso (nunca lleva body)
    GET,

    /// POST - Enviar datos a un recurso
    POST,
}

impl Method {
    /// Parsea el token de método de la request line
    ///
    /// La comparación es exacta: `get` no es `GET`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            _ => None,
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
        }
    }

    /// Indica si el parser debe buscar `Content-Length` y leer un body
    pub fn may_have_body(&self) -> bool {
        matches!(self, Method::POST)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Representa un request HTTP ya parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, POST)
    method: Method,

    /// Path sin query string, siempre empieza con `/`
    path: String,

    /// Versión tal como vino en la request line (ej: "HTTP/1.1")
    version: String,

    /// Líneas de header crudas, en el orden del wire
    headers: Vec<String>,

    /// Query parameters en orden de aparición
    query_params: QueryParams,

    /// Body (vacío para GET o si no hay Content-Length)
    body: Vec<u8>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        version: String,
        headers: Vec<String>,
        query_params: QueryParams,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method,
            path,
            version,
            headers,
            query_params,
            body,
        }
    }

    /// Parsea un request completo desde un slice de bytes
    ///
    /// Atajo sobre [`parser::parse`] con el límite de headers por defecto,
    /// útil en tests y en handlers que reciben requests ya bufferizados.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use minihttp::http::Request;
    ///
    /// let raw = b"GET /index.html?lang=es HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/index.html");
    /// assert_eq!(request.query_param("lang"), Some("es"));
    /// ```
    pub fn parse(mut buffer: &[u8]) -> Result<Self, ParseError> {
        parser::parse(&mut buffer, DEFAULT_HEADER_LIMIT)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Líneas de header crudas (`Name: value`), duplicados incluidos
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Obtiene el valor del primer header con ese nombre
    ///
    /// El nombre se compara sin distinguir mayúsculas; el valor se
    /// retorna sin espacios alrededor.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    pub fn query_params(&self) -> &QueryParams {
        &self.query_params
    }

    /// Obtiene el primer valor de un query parameter
    ///
    /// La ausencia es un caso normal: retorna `None`, nunca falla.
    ///
    /// # Ejemplo
    /// ```
    /// use minihttp::http::Request;
    ///
    /// let raw = b"GET /test?num=42&num=7 HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.query_param("num"), Some("42"));
    /// assert_eq!(request.query_param("missing"), None);
    /// ```
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.first_value(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Obtiene el body como String, si es UTF-8 válido
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_from_token() {
        assert_eq!(Method::from_token("GET"), Some(Method::GET));
        assert_eq!(Method::from_token("POST"), Some(Method::POST));
        assert_eq!(Method::from_token("get"), None);
        assert_eq!(Method::from_token("DELETE"), None);
        assert_eq!(Method::from_token(""), None);
    }

    #[test]
    fn test_method_body_capability() {
        assert!(!Method::GET.may_have_body());
        assert!(Method::POST.may_have_body());
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::GET.to_string(), "GET");
        assert_eq!(Method::POST.as_str(), "POST");
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let raw = b"GET / HTTP/1.1\r\nHost: localhost:9999\r\nUser-Agent: test\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("host"), Some("localhost:9999"));
        assert_eq!(request.header("User-Agent"), Some("test"));
        assert_eq!(request.header("Accept"), None);
    }

    #[test]
    fn test_headers_keep_duplicates_in_order() {
        let raw = b"GET / HTTP/1.1\r\nX-A: 1\r\nX-A: 2\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.headers(), &["X-A: 1".to_string(), "X-A: 2".to_string()]);
        assert_eq!(request.header("X-A"), Some("1"));
    }

    #[test]
    fn test_body_string() {
        let raw = b"POST /form HTTP/1.1\r\nContent-Length: 3\r\n\r\nabc";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body(), b"abc");
        assert_eq!(request.body_string(), Some("abc".to_string()));
    }

    #[test]
    fn test_body_string_invalid_utf8() {
        let raw = b"POST /form HTTP/1.1\r\nContent-Length: 2\r\n\r\n\xff\xfe";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.body().len(), 2);
        assert_eq!(request.body_string(), None);
    }
}
