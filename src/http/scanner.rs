//! # Búsqueda de Delimitadores
//! src/http/scanner.rs
//!
//! Primitiva usada por el parser para encontrar los límites del request
//! dentro del buffer de lectura: el fin de la request line (`CRLF`) y el
//! fin del bloque de headers (`CRLFCRLF`).

/// Fin de línea HTTP
pub const CRLF: &[u8] = b"\r\n";

/// Fin del bloque de headers (línea vacía)
pub const CRLF_CRLF: &[u8] = b"\r\n\r\n";

/// Busca la primera aparición de `needle` dentro de `haystack[start..end]`.
///
/// Retorna el índice (absoluto, relativo a `haystack`) donde empieza la
/// coincidencia, o `None` si no aparece. Nunca lee fuera de
/// `[start, end)`; si el rango es inválido o más corto que `needle`
/// simplemente no hay coincidencia.
///
/// # Ejemplo
/// ```
/// use minihttp::http::scanner::{find, CRLF};
///
/// let buf = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
/// assert_eq!(find(buf, CRLF, 0, buf.len()), Some(14));
/// assert_eq!(find(buf, CRLF, 16, buf.len()), Some(23));
/// assert_eq!(find(buf, b"zz", 0, buf.len()), None);
/// ```
pub fn find(haystack: &[u8], needle: &[u8], start: usize, end: usize) -> Option<usize> {
    let end = end.min(haystack.len());
    if needle.is_empty() || start >= end || end - start < needle.len() {
        return None;
    }

    haystack[start..end]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|offset| start + offset)
}

/// Divide `bytes` en las líneas terminadas por `CRLF`.
///
/// Un resto final sin `CRLF` también se retorna como línea; un bloque
/// vacío no produce líneas.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut cursor = 0;

    while let Some(pos) = find(bytes, CRLF, cursor, bytes.len()) {
        lines.push(&bytes[cursor..pos]);
        cursor = pos + CRLF.len();
    }
    if cursor < bytes.len() {
        lines.push(&bytes[cursor..]);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_at_start() {
        assert_eq!(find(b"\r\nabc", CRLF, 0, 5), Some(0));
    }

    #[test]
    fn test_find_returns_earliest() {
        let buf = b"a\r\nb\r\nc";
        assert_eq!(find(buf, CRLF, 0, buf.len()), Some(1));
    }

    #[test]
    fn test_find_respects_start() {
        let buf = b"a\r\nb\r\nc";
        assert_eq!(find(buf, CRLF, 2, buf.len()), Some(4));
    }

    #[test]
    fn test_find_respects_end() {
        // La coincidencia cruza `end`, no debe contarse
        let buf = b"abc\r\n";
        assert_eq!(find(buf, CRLF, 0, 4), None);
        assert_eq!(find(buf, CRLF, 0, 5), Some(3));
    }

    #[test]
    fn test_find_double_crlf() {
        let buf = b"GET / HTTP/1.1\r\nA: b\r\n\r\nbody";
        assert_eq!(find(buf, CRLF_CRLF, 0, buf.len()), Some(20));
    }

    #[test]
    fn test_find_not_found() {
        let buf = b"no delimiters here";
        assert_eq!(find(buf, CRLF, 0, buf.len()), None);
    }

    #[test]
    fn test_find_degenerate_ranges() {
        let buf = b"\r\n";
        assert_eq!(find(buf, CRLF, 2, 1), None);
        assert_eq!(find(buf, CRLF, 0, 100), Some(0));
        assert_eq!(find(buf, b"", 0, 2), None);
        assert_eq!(find(b"", CRLF, 0, 0), None);
    }

    #[test]
    fn test_split_lines() {
        let lines = split_lines(b"Host: a\r\nX-Y: z\r\n");
        assert_eq!(lines, vec![&b"Host: a"[..], &b"X-Y: z"[..]]);
    }

    #[test]
    fn test_split_lines_empty_block() {
        assert!(split_lines(b"").is_empty());
    }

    #[test]
    fn test_split_lines_trailing_rest() {
        let lines = split_lines(b"A: 1\r\nB: 2");
        assert_eq!(lines, vec![&b"A: 1"[..], &b"B: 2"[..]]);
    }
}
