//! # Parser de Requests HTTP/1.1
//! src/http/parser.rs
//!
//! Parser escrito desde cero que consume bytes directamente del socket.
//!
//! ## Algoritmo
//!
//! 1. Se leen hasta `limit` bytes a un buffer fijo (la "cabeza" del
//!    request). La lectura se detiene antes si ya apareció `CRLFCRLF`
//!    o si el cliente cerró la conexión.
//! 2. Sobre ese buffer se trabaja solo con offsets: `CRLF` delimita la
//!    request line y `CRLFCRLF` el bloque de headers.
//! 3. Si el método puede llevar body, los bytes que ya quedaron en el
//!    buffer después de `CRLFCRLF` son el inicio del body y el resto se
//!    lee del stream, exactamente `Content-Length` bytes.
//!
//! Nunca se bufferizan más de `limit` bytes para request line + headers;
//! un cliente que no completa los headers dentro de ese tamaño recibe un
//! error en vez de bloquear el worker indefinidamente.

use super::request::{Method, Request};
use super::scanner::{self, CRLF, CRLF_CRLF};
use super::status::StatusCode;
use super::target::RequestTarget;
use std::io::{self, Read};
use thiserror::Error;

/// Tamaño máximo por defecto de request line + headers
pub const DEFAULT_HEADER_LIMIT: usize = 4096;

/// Cuánto se reserva de antemano para un body; el resto crece al leer
const BODY_PREALLOC_LIMIT: usize = 64 * 1024;

/// Errores que pueden ocurrir durante el parsing
///
/// Todos son terminales para la conexión: no se intenta recuperar ni
/// leer más bytes después de un error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// No hay `CRLF` dentro del buffer, o la request line no tiene
    /// exactamente 3 tokens separados por un espacio
    #[error("malformed request line")]
    MalformedStartLine,

    /// Método fuera del conjunto soportado (GET, POST)
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// El path del target no empieza con `/`
    #[error("malformed request target: {0}")]
    MalformedTarget(String),

    /// No hay `CRLFCRLF` dentro del buffer, o un header no es UTF-8
    #[error("malformed headers block")]
    MalformedHeaders,

    /// `Content-Length` presente pero no es un entero no negativo
    #[error("invalid Content-Length: {0:?}")]
    MalformedContentLength(String),

    /// El cliente cerró la conexión antes de enviar todo el body
    #[error("body truncated: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },

    /// Falló la lectura del socket
    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Código de estado con el que se responde, o `None` si la conexión
    /// debe cerrarse sin respuesta (el socket ya no es utilizable)
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::Io(_) => None,
            _ => Some(StatusCode::BadRequest),
        }
    }

    /// Etiqueta corta y estable, usada en logs y métricas
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::MalformedStartLine => "malformed_start_line",
            ParseError::UnsupportedMethod(_) => "unsupported_method",
            ParseError::MalformedTarget(_) => "malformed_target",
            ParseError::MalformedHeaders => "malformed_headers",
            ParseError::MalformedContentLength(_) => "malformed_content_length",
            ParseError::TruncatedBody { .. } => "truncated_body",
            ParseError::Io(_) => "io",
        }
    }
}

/// Parsea un request completo desde `source`
///
/// `limit` es la cota dura para request line + headers (no incluye el
/// body). Es el único punto de entrada que usa la capa de conexiones.
///
/// # Ejemplo
///
/// ```
/// use minihttp::http::parser::{parse, DEFAULT_HEADER_LIMIT};
/// use minihttp::http::Method;
///
/// let mut source: &[u8] = b"POST /form?x=1 HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi";
/// let request = parse(&mut source, DEFAULT_HEADER_LIMIT).unwrap();
///
/// assert_eq!(request.method(), Method::POST);
/// assert_eq!(request.path(), "/form");
/// assert_eq!(request.body(), b"hi");
/// ```
pub fn parse<R: Read>(source: &mut R, limit: usize) -> Result<Request, ParseError> {
    let head = read_head(source, limit)?;
    let filled = head.len();

    // 1. Request line
    let line_end = scanner::find(&head, CRLF, 0, filled).ok_or(ParseError::MalformedStartLine)?;
    let line = std::str::from_utf8(&head[..line_end]).map_err(|_| ParseError::MalformedStartLine)?;
    let (method_token, target, version) = split_request_line(line)?;

    let method = Method::from_token(method_token)
        .ok_or_else(|| ParseError::UnsupportedMethod(method_token.to_string()))?;

    let (path, query_params) = RequestTarget::parse(target)
        .ok_or_else(|| ParseError::MalformedTarget(target.to_string()))?
        .into_parts();

    // 2. Bloque de headers
    // Se busca desde el CRLF de la request line para aceptar requests sin
    // headers, donde ese mismo CRLF es la primera mitad del delimitador.
    let boundary =
        scanner::find(&head, CRLF_CRLF, line_end, filled).ok_or(ParseError::MalformedHeaders)?;
    let headers = parse_header_lines(&head[line_end + CRLF.len()..boundary + CRLF.len()])?;

    // 3. Body
    let body = if method.may_have_body() {
        match content_length(&headers)? {
            Some(length) => read_body(source, &head[boundary + CRLF_CRLF.len()..], length)?,
            None => Vec::new(),
        }
    } else {
        Vec::new()
    };

    Ok(Request::new(
        method,
        path,
        version.to_string(),
        headers,
        query_params,
        body,
    ))
}

/// Llena el buffer de cabeza hasta `limit` bytes
///
/// Deja de leer en cuanto el delimitador de headers está en el buffer,
/// así un request chico no espera a que se llene todo el límite.
fn read_head<R: Read>(source: &mut R, limit: usize) -> io::Result<Vec<u8>> {
    let mut buffer = vec![0u8; limit];
    let mut filled = 0;

    while filled < limit {
        let read = match source.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        // Solo hace falta revisar lo nuevo más lo que pudo quedar partido
        let scan_from = filled.saturating_sub(CRLF_CRLF.len() - 1);
        filled += read;

        if scanner::find(&buffer, CRLF_CRLF, scan_from, filled).is_some() {
            break;
        }
    }

    buffer.truncate(filled);
    Ok(buffer)
}

/// Separa la request line en sus 3 tokens
///
/// El separador es un único espacio: `GET  / HTTP/1.1` (doble espacio)
/// produce un token vacío y se rechaza.
fn split_request_line(line: &str) -> Result<(&str, &str, &str), ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();

    match parts.as_slice() {
        [method, target, version]
            if !method.is_empty() && !target.is_empty() && !version.is_empty() =>
        {
            Ok((*method, *target, *version))
        }
        _ => Err(ParseError::MalformedStartLine),
    }
}

/// Convierte el bloque de headers en líneas crudas
fn parse_header_lines(block: &[u8]) -> Result<Vec<String>, ParseError> {
    scanner::split_lines(block)
        .into_iter()
        .map(|line| {
            std::str::from_utf8(line)
                .map(str::to_string)
                .map_err(|_| ParseError::MalformedHeaders)
        })
        .collect()
}

/// Busca `Content-Length` entre las líneas de header
///
/// Retorna `Ok(None)` si no está; gana la primera línea que coincide.
fn content_length(headers: &[String]) -> Result<Option<usize>, ParseError> {
    let value = headers.iter().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("Content-Length")
            .then(|| value.trim())
    });

    match value {
        Some(raw) => raw
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ParseError::MalformedContentLength(raw.to_string())),
        None => Ok(None),
    }
}

/// Lee exactamente `length` bytes de body
///
/// `buffered` son los bytes que ya llegaron junto con los headers.
fn read_body<R: Read>(source: &mut R, buffered: &[u8], length: usize) -> Result<Vec<u8>, ParseError> {
    if buffered.len() >= length {
        return Ok(buffered[..length].to_vec());
    }

    let mut body = Vec::with_capacity(length.min(BODY_PREALLOC_LIMIT));
    body.extend_from_slice(buffered);

    let remaining = (length - buffered.len()) as u64;
    source.by_ref().take(remaining).read_to_end(&mut body)?;

    if body.len() < length {
        return Err(ParseError::TruncatedBody {
            expected: length,
            received: body.len(),
        });
    }

    Ok(body)
}
