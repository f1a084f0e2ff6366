//! # Collector de Métricas
//! src/metrics/collector.rs
//!
//! Recolecta métricas del servidor en tiempo real. Lo comparten todos los
//! workers; cada registro toma el lock un instante.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Máximo de latencias a guardar para calcular percentiles
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Máximo de paths distintos con contador propio
pub const MAX_TRACKED_PATHS: usize = 1_024;

/// Collector de métricas thread-safe
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsData>>,
    start_time: Instant,
}

/// Datos internos de métricas
#[derive(Default)]
struct MetricsData {
    /// Requests respondidos (incluye 400 y 404)
    total_requests: u64,

    /// Respuestas por código de estado
    status_codes: HashMap<u16, u64>,

    /// Errores de parsing por tipo (`ParseError::kind`)
    parse_failures: HashMap<&'static str, u64>,

    /// Requests por path (solo requests que se pudieron parsear)
    requests_per_path: HashMap<String, u64>,

    /// Últimas latencias en microsegundos
    latencies: VecDeque<u64>,

    /// Conexiones siendo atendidas por un worker
    active_connections: u64,
}

impl MetricsCollector {
    /// Crea un nuevo collector de métricas
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsData {
                latencies: VecDeque::with_capacity(MAX_LATENCY_SAMPLES),
                ..MetricsData::default()
            })),
            start_time: Instant::now(),
        }
    }

    /// Registra un request respondido
    ///
    /// `path` es `None` cuando el request no se pudo parsear o no tenía
    /// handler. Con la tabla de paths llena, los paths nuevos solo suman
    /// al total.
    pub fn record_request(&self, path: Option<&str>, status_code: u16, latency: Duration) {
        let mut data = self.inner.lock();

        data.total_requests += 1;
        *data.status_codes.entry(status_code).or_insert(0) += 1;

        if data.latencies.len() >= MAX_LATENCY_SAMPLES {
            data.latencies.pop_front();
        }
        data.latencies.push_back(latency.as_micros() as u64);

        if let Some(path) = path {
            let full = data.requests_per_path.len() >= MAX_TRACKED_PATHS;
            if let Some(count) = data.requests_per_path.get_mut(path) {
                *count += 1;
            } else if !full {
                data.requests_per_path.insert(path.to_string(), 1);
            }
        }
    }

    /// Registra un error de parsing
    pub fn record_parse_failure(&self, kind: &'static str) {
        *self.inner.lock().parse_failures.entry(kind).or_insert(0) += 1;
    }

    pub fn connection_started(&self) {
        self.inner.lock().active_connections += 1;
    }

    pub fn connection_finished(&self) {
        let mut data = self.inner.lock();
        data.active_connections = data.active_connections.saturating_sub(1);
    }

    pub fn active_connections(&self) -> u64 {
        self.inner.lock().active_connections
    }

    /// Obtiene un snapshot de las métricas
    pub fn snapshot(&self) -> MetricsSnapshot {
        let data = self.inner.lock();
        let latency = LatencySummary::from_samples(&data.latencies);

        let mut top_paths: Vec<PathCount> = data
            .requests_per_path
            .iter()
            .map(|(path, count)| PathCount {
                path: path.clone(),
                count: *count,
            })
            .collect();
        top_paths.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
        top_paths.truncate(10);

        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            total_requests: data.total_requests,
            active_connections: data.active_connections,
            status_codes: data
                .status_codes
                .iter()
                .map(|(code, count)| (code.to_string(), *count))
                .collect(),
            parse_failures: data
                .parse_failures
                .iter()
                .map(|(kind, count)| (kind.to_string(), *count))
                .collect(),
            tracked_paths: data.requests_per_path.len(),
            top_paths,
            latency_us: latency,
        }
    }

    /// Snapshot serializado como JSON (endpoint `/metrics`)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot de métricas (para uso externo)
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub total_requests: u64,
    pub active_connections: u64,
    pub status_codes: BTreeMap<String, u64>,
    pub parse_failures: BTreeMap<String, u64>,
    pub tracked_paths: usize,
    pub top_paths: Vec<PathCount>,
    pub latency_us: LatencySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct PathCount {
    pub path: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LatencySummary {
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub avg: u64,
    pub samples: usize,
}

impl LatencySummary {
    fn from_samples(samples: &VecDeque<u64>) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted: Vec<u64> = samples.iter().copied().collect();
        sorted.sort_unstable();

        let len = sorted.len();
        Self {
            p50: sorted[len * 50 / 100],
            p95: sorted[len * 95 / 100],
            p99: sorted[len * 99 / 100],
            avg: sorted.iter().sum::<u64>() / len as u64,
            samples: len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector() {
        let collector = MetricsCollector::new();

        collector.record_request(Some("/index.html"), 200, Duration::from_millis(10));
        collector.record_request(Some("/index.html"), 200, Duration::from_millis(20));
        collector.record_request(Some("/missing"), 404, Duration::from_millis(5));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, 3);
        assert_eq!(snapshot.status_codes.get("200"), Some(&2));
        assert_eq!(snapshot.status_codes.get("404"), Some(&1));
        assert_eq!(snapshot.top_paths[0].path, "/index.html");
        assert_eq!(snapshot.top_paths[0].count, 2);
    }

    #[test]
    fn test_unparsed_requests_have_no_path() {
        let collector = MetricsCollector::new();
        collector.record_request(None, 400, Duration::from_millis(1));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, 1);
        assert!(snapshot.top_paths.is_empty());
    }

    #[test]
    fn test_tracked_paths_are_capped() {
        let collector = MetricsCollector::new();

        for i in 0..(MAX_TRACKED_PATHS + 500) {
            collector.record_request(Some(&format!("/page-{}", i)), 200, Duration::from_micros(1));
        }
        // Un path ya conocido sigue contando con la tabla llena
        collector.record_request(Some("/page-0"), 200, Duration::from_micros(1));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, MAX_TRACKED_PATHS as u64 + 501);
        assert_eq!(snapshot.tracked_paths, MAX_TRACKED_PATHS);
        assert_eq!(snapshot.top_paths.len(), 10);
        assert_eq!(snapshot.top_paths[0].path, "/page-0");
        assert_eq!(snapshot.top_paths[0].count, 2);
    }

    #[test]
    fn test_parse_failures_by_kind() {
        let collector = MetricsCollector::new();
        collector.record_parse_failure("malformed_start_line");
        collector.record_parse_failure("malformed_start_line");
        collector.record_parse_failure("unsupported_method");

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.parse_failures.get("malformed_start_line"), Some(&2));
        assert_eq!(snapshot.parse_failures.get("unsupported_method"), Some(&1));
    }

    #[test]
    fn test_percentiles() {
        let collector = MetricsCollector::new();

        for i in 1..=100 {
            collector.record_request(Some("/test"), 200, Duration::from_micros(i));
        }

        let latency = collector.snapshot().latency_us;
        assert!(latency.p50 > 0);
        assert!(latency.p95 > latency.p50);
        assert!(latency.p99 > latency.p95);
        assert_eq!(latency.samples, 100);
    }

    #[test]
    fn test_latency_window_management() {
        let collector = MetricsCollector::new();

        for i in 0..(MAX_LATENCY_SAMPLES as u64 + 500) {
            collector.record_request(Some("/test"), 200, Duration::from_micros(i));
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_requests, MAX_LATENCY_SAMPLES as u64 + 500);
        assert_eq!(snapshot.latency_us.samples, MAX_LATENCY_SAMPLES);
    }

    #[test]
    fn test_active_connections_tracking() {
        let collector = MetricsCollector::new();

        collector.connection_started();
        collector.connection_started();
        assert_eq!(collector.active_connections(), 2);

        collector.connection_finished();
        collector.connection_finished();
        collector.connection_finished();
        assert_eq!(collector.active_connections(), 0);
    }

    #[test]
    fn test_json_format() {
        let collector = MetricsCollector::new();
        collector.record_request(Some("/index.html"), 200, Duration::from_millis(50));

        let value: serde_json::Value = serde_json::from_str(&collector.to_json()).unwrap();
        assert_eq!(value["total_requests"], 1);
        assert_eq!(value["top_paths"][0]["path"], "/index.html");
        assert!(value["latency_us"]["p50"].as_u64().unwrap() > 0);
    }
}
