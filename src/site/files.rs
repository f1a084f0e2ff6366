//! # Archivos Estáticos
//! src/site/files.rs
//!
//! Sirve archivos del directorio público. Solo llegan aquí los paths que
//! se registraron en la tabla de handlers, pero igual se rechaza
//! cualquier path que intente salir del directorio.
//!
//! `/classic.html` es un template: el literal `{time}` se reemplaza por la
//! hora local antes de enviar.

use super::mime::content_type_for;
use crate::http::{Request, Response, StatusCode};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error};

/// Página que pasa por el template de hora
pub const TEMPLATE_PAGE: &str = "/classic.html";

/// Marcador que se reemplaza en el template
pub const TIME_PLACEHOLDER: &str = "{time}";

/// Raíz de archivos estáticos
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Traduce el path del request a un archivo dentro de la raíz
    ///
    /// Retorna `None` para `/`, para paths con `..` o componentes
    /// absolutos.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = Path::new(request_path.trim_start_matches('/'));

        let mut resolved = self.root.clone();
        let mut has_file = false;
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    resolved.push(part);
                    has_file = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        has_file.then_some(resolved)
    }

    /// Handler: responde con el archivo que corresponde al path
    pub fn serve(&self, request: &Request) -> Response {
        let Some(file_path) = self.resolve(request.path()) else {
            return Response::error(StatusCode::NotFound, "resource not found");
        };

        let content = match fs::read(&file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %file_path.display(), "static file missing");
                return Response::error(StatusCode::NotFound, "resource not found");
            }
            Err(e) => {
                error!(path = %file_path.display(), error = %e, "could not read static file");
                return Response::error(StatusCode::InternalServerError, "could not read resource");
            }
        };

        let content = if request.path() == TEMPLATE_PAGE {
            render_time_template(content, &current_time())
        } else {
            content
        };

        Response::new(StatusCode::Ok)
            .with_header("Content-Type", content_type_for(&file_path))
            .with_body_bytes(content)
    }
}

/// Hora local en formato ISO-8601, sin zona
fn current_time() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.3f")
        .to_string()
}

/// Reemplaza cada `{time}` del template por `now`
///
/// Si el archivo no es UTF-8 se devuelve sin tocar.
pub fn render_time_template(content: Vec<u8>, now: &str) -> Vec<u8> {
    match String::from_utf8(content) {
        Ok(text) => text.replace(TIME_PLACEHOLDER, now).into_bytes(),
        Err(e) => e.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Directorio temporal propio de cada test
    fn public_dir(files: &[(&str, &[u8])]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "minihttp-files-{}-{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        dir
    }

    fn get(path: &str) -> Request {
        Request::parse(format!("GET {} HTTP/1.1\r\n\r\n", path).as_bytes()).unwrap()
    }

    #[test]
    fn test_resolve_inside_root() {
        let files = StaticFiles::new("/srv/public");
        assert_eq!(files.resolve("/index.html"), Some(PathBuf::from("/srv/public/index.html")));
        assert_eq!(files.resolve("/img/./a.png"), Some(PathBuf::from("/srv/public/img/a.png")));
    }

    #[test]
    fn test_resolve_rejects_escapes() {
        let files = StaticFiles::new("/srv/public");
        assert_eq!(files.resolve("/../etc/passwd"), None);
        assert_eq!(files.resolve("/a/../../b"), None);
        assert_eq!(files.resolve("/"), None);
    }

    #[test]
    fn test_serve_file_with_mime_type() {
        let dir = public_dir(&[("styles.css", b"body { color: red; }")]);
        let files = StaticFiles::new(&dir);

        let response = files.serve(&get("/styles.css"));

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("Content-Type"), Some("text/css; charset=utf-8"));
        assert_eq!(response.header("Content-Length"), Some("20"));
        assert_eq!(response.body(), b"body { color: red; }");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_serve_binary_file() {
        let png = [0x89, b'P', b'N', b'G', 0x00, 0xff];
        let dir = public_dir(&[("vinni.png", &png)]);
        let files = StaticFiles::new(&dir);

        let response = files.serve(&get("/vinni.png"));

        assert_eq!(response.header("Content-Type"), Some("image/png"));
        assert_eq!(response.body(), &png);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_serve_missing_file() {
        let dir = public_dir(&[]);
        let files = StaticFiles::new(&dir);

        let response = files.serve(&get("/index.html"));
        assert_eq!(response.status(), StatusCode::NotFound);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_serve_template_page() {
        let dir = public_dir(&[("classic.html", b"<p>Now: {time}</p>")]);
        let files = StaticFiles::new(&dir);

        let response = files.serve(&get(TEMPLATE_PAGE));
        let body = String::from_utf8(response.body().to_vec()).unwrap();

        assert_eq!(response.status(), StatusCode::Ok);
        assert!(body.starts_with("<p>Now: "));
        assert!(!body.contains(TIME_PLACEHOLDER));
        assert_eq!(response.header("Content-Length"), Some(body.len().to_string().as_str()));
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_placeholder_only_replaced_in_template_page() {
        let dir = public_dir(&[("index.html", b"{time}")]);
        let files = StaticFiles::new(&dir);

        let response = files.serve(&get("/index.html"));
        assert_eq!(response.body(), b"{time}");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_render_time_template() {
        let rendered = render_time_template(b"a {time} b {time}".to_vec(), "T");
        assert_eq!(rendered, b"a T b T");

        let binary = vec![0xff, 0xfe];
        assert_eq!(render_time_template(binary.clone(), "T"), binary);
    }
}
