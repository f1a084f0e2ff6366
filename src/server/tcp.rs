//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Acepta conexiones y las entrega al pool de workers. Cada conexión
//! produce como mucho un request y una respuesta, y después se cierra.

use super::pool::WorkerPool;
use crate::config::Config;
use crate::http::{parser, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::router::{Dispatcher, HandlerTable};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Valor del header `Server` en todas las respuestas
pub const SERVER_NAME: &str = "minihttp";

/// Espera inicial tras un error de `accept`; se duplica en errores seguidos
const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(5);

/// Espera máxima entre reintentos de `accept`
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Espera antes de volver a llamar `accept` tras `failures` errores seguidos
fn accept_backoff(failures: u32) -> Duration {
    let factor = 1u32 << failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE.saturating_mul(factor).min(ACCEPT_BACKOFF_MAX)
}

/// Marca una conexión como activa mientras vive
///
/// El contador baja en `Drop`, así que también baja si el handler hace
/// panic y el pool atrapa el unwind.
struct ActiveConnection<'a> {
    metrics: &'a MetricsCollector,
}

impl<'a> ActiveConnection<'a> {
    fn start(metrics: &'a MetricsCollector) -> Self {
        metrics.connection_started();
        Self { metrics }
    }
}

impl Drop for ActiveConnection<'_> {
    fn drop(&mut self) {
        self.metrics.connection_finished();
    }
}

/// Lo que necesita un worker para atender una conexión
///
/// Es barato de clonar: se clona una vez por conexión aceptada.
#[derive(Clone)]
pub struct ConnectionHandler {
    dispatcher: Dispatcher,
    metrics: MetricsCollector,
    header_limit: usize,
}

impl ConnectionHandler {
    pub fn new(dispatcher: Dispatcher, metrics: MetricsCollector, header_limit: usize) -> Self {
        Self {
            dispatcher,
            metrics,
            header_limit,
        }
    }

    /// Atiende una conexión TCP y la cierra
    pub fn handle_tcp(&self, mut stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        if let Err(e) = self.handle(&mut stream, &peer) {
            warn!(%peer, error = %e, "error writing response");
        }
        // Al salir se suelta el stream y se cierra la conexión
    }

    /// Parsea, despacha y responde sobre cualquier stream bidireccional
    ///
    /// - Request malformado: 400 y cierre, sin leer más bytes.
    /// - Sin handler para (método, path): 404.
    /// - Error de lectura del socket: cierre sin respuesta.
    pub fn handle<S: Read + Write>(&self, stream: &mut S, peer: &str) -> io::Result<()> {
        let _active = ActiveConnection::start(&self.metrics);
        self.respond(stream, peer)
    }

    fn respond<S: Read + Write>(&self, stream: &mut S, peer: &str) -> io::Result<()> {
        let start = Instant::now();

        let (mut response, path) = match parser::parse(stream, self.header_limit) {
            Ok(request) => {
                debug!(
                    %peer,
                    method = %request.method(),
                    path = request.path(),
                    headers = request.headers().len(),
                    body_bytes = request.body().len(),
                    "request parsed"
                );

                // Solo los paths con handler cuentan por separado en las
                // métricas; los 404 no crecen la tabla de paths
                match self.dispatcher.dispatch(&request) {
                    Ok(response) => (response, Some(request.path().to_string())),
                    Err(not_found) => {
                        debug!(%peer, error = %not_found, "no handler registered");
                        (Response::error(StatusCode::NotFound, &not_found.to_string()), None)
                    }
                }
            }
            Err(parse_error) => {
                self.metrics.record_parse_failure(parse_error.kind());

                let Some(status) = parse_error.status() else {
                    warn!(%peer, error = %parse_error, "connection failed while reading request");
                    return Ok(());
                };

                warn!(%peer, kind = parse_error.kind(), error = %parse_error, "rejecting malformed request");
                (Response::error(status, &parse_error.to_string()), None)
            }
        };

        response.add_header("Server", SERVER_NAME);
        response.add_header("Connection", "close");

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        let status = response.status();
        self.metrics.record_request(path.as_deref(), status.as_u16(), latency);

        if status.is_server_error() {
            warn!(
                %peer,
                path = path.as_deref().unwrap_or("-"),
                status = status.as_u16(),
                "handler failed"
            );
        } else {
            info!(
                %peer,
                path = path.as_deref().unwrap_or("-"),
                status = status.as_u16(),
                latency_ms = latency.as_secs_f64() * 1000.0,
                "request served"
            );
        }

        Ok(())
    }
}

/// Servidor HTTP/1.1 con pool de workers
pub struct Server {
    config: Config,
    listener: TcpListener,
    pool: WorkerPool,
    handler: ConnectionHandler,
}

impl Server {
    /// Abre el socket de escucha
    ///
    /// La tabla de handlers ya debe estar llena: se registra todo antes
    /// de empezar a aceptar tráfico.
    pub fn bind(config: Config, table: Arc<HandlerTable>, metrics: MetricsCollector) -> io::Result<Self> {
        config
            .validate()
            .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

        let address = config.address();
        let listener = TcpListener::bind(&address)?;
        let pool = WorkerPool::new(config.workers)?;

        info!(address = %listener.local_addr()?, routes = table.len(), "socket bound");

        let handler = ConnectionHandler::new(Dispatcher::new(table), metrics, config.header_limit);

        Ok(Self {
            config,
            listener,
            pool,
            handler,
        })
    }

    /// Dirección real del socket (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Loop de aceptación; no retorna mientras el listener siga abierto
    pub fn run(&self) -> io::Result<()> {
        info!(
            address = %self.local_addr()?,
            workers = self.config.workers,
            "servidor escuchando (una conexión = un request)"
        );

        let mut failures: u32 = 0;

        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    failures = 0;
                    debug!(
                        busy = self.pool.busy(),
                        queued = self.pool.queued(),
                        "connection accepted"
                    );

                    // Con la cola llena, `execute` bloquea y las conexiones
                    // siguientes esperan en el backlog del kernel
                    let handler = self.handler.clone();
                    if let Err(e) = self.pool.execute(move || handler.handle_tcp(stream)) {
                        error!(error = %e, "could not queue connection");
                    }
                }
                Err(e) => {
                    failures = failures.saturating_add(1);
                    let wait = accept_backoff(failures);
                    warn!(error = %e, failures, retry_ms = wait.as_millis() as u64, "error accepting connection");
                    thread::sleep(wait);
                }
            }
        }

        Ok(())
    }
}
