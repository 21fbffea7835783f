//! 请求指标聚合
//!
//! 计数器使用原子操作，响应时间窗口由互斥锁保护，超过容量时丢弃最旧的记录。
//! 指标只在进程生命周期内有效。

use std::collections::{BTreeMap, VecDeque};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use crate::cache::CacheBackend;
use crate::translation::{Resolution, ResolutionSource};

/// 响应时间窗口容量
pub const WINDOW_CAPACITY: usize = 100;

/// 平均响应时间取最近多少条记录
pub const AVERAGE_SAMPLE: usize = 10;

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidInput,
    UpstreamNetwork,
    UpstreamTimeout,
    UpstreamStatus,
    UpstreamMalformed,
    UpstreamRejected,
    Internal,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 7] = [
        ErrorCategory::InvalidInput,
        ErrorCategory::UpstreamNetwork,
        ErrorCategory::UpstreamTimeout,
        ErrorCategory::UpstreamStatus,
        ErrorCategory::UpstreamMalformed,
        ErrorCategory::UpstreamRejected,
        ErrorCategory::Internal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::InvalidInput => "invalid_input",
            ErrorCategory::UpstreamNetwork => "upstream_network",
            ErrorCategory::UpstreamTimeout => "upstream_timeout",
            ErrorCategory::UpstreamStatus => "upstream_status",
            ErrorCategory::UpstreamMalformed => "upstream_malformed",
            ErrorCategory::UpstreamRejected => "upstream_rejected",
            ErrorCategory::Internal => "internal",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// 缓存后端状态，用于指标输出
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub backend: &'static str,
    pub connected: bool,
    /// `keys` 调用失败时为 `None`
    pub estimated_entries: Option<usize>,
}

impl CacheStatus {
    pub fn new(backend: CacheBackend, connected: bool, estimated_entries: Option<usize>) -> Self {
        Self {
            backend: backend.as_str(),
            connected,
            estimated_entries,
        }
    }
}

/// 某一时刻的指标快照
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub http_requests: u64,
    pub total_requests: u64,
    pub cache_hits: u64,
    /// 保留两位小数
    pub cache_hit_rate: f64,
    pub translation_errors: u64,
    /// 保留三位小数
    pub avg_response_time_seconds: f64,
    pub errors_by_category: BTreeMap<&'static str, u64>,
    pub resolutions: BTreeMap<&'static str, u64>,
    pub window_size: usize,
}

/// 指标聚合器
///
/// 通过 `AppState` 注入，不使用全局单例。
#[derive(Debug)]
pub struct MetricsAggregator {
    http_requests: AtomicU64,
    total_requests: AtomicU64,
    cache_hits: AtomicU64,
    translation_errors: AtomicU64,
    errors_by_category: [AtomicU64; 7],
    resolutions: [AtomicU64; 3],
    response_times: Mutex<VecDeque<f64>>,
    window_capacity: usize,
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::with_window_capacity(WINDOW_CAPACITY)
    }

    pub fn with_window_capacity(window_capacity: usize) -> Self {
        let window_capacity = window_capacity.max(1);
        Self {
            http_requests: AtomicU64::new(0),
            total_requests: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            translation_errors: AtomicU64::new(0),
            errors_by_category: Default::default(),
            resolutions: Default::default(),
            response_times: Mutex::new(VecDeque::with_capacity(window_capacity)),
            window_capacity,
        }
    }

    /// 任意 HTTP 请求
    pub fn record_http_request(&self) {
        self.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// 翻译请求
    pub fn record_translate_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录错误；只有内部错误计入 `translation_errors`
    pub fn record_error(&self, category: ErrorCategory) {
        self.errors_by_category[category.index()].fetch_add(1, Ordering::Relaxed);
        if category == ErrorCategory::Internal {
            self.translation_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 记录解析来源以及上游失败类别
    pub fn record_resolution(&self, resolution: &Resolution) {
        let source_index = match resolution.source() {
            ResolutionSource::Upstream => 0,
            ResolutionSource::Fallback => 1,
            ResolutionSource::Passthrough => 2,
        };
        self.resolutions[source_index].fetch_add(1, Ordering::Relaxed);

        if let Some(failure) = resolution.upstream_failure() {
            self.record_error(failure.category());
        }
    }

    pub fn record_response_time(&self, elapsed: Duration) {
        let mut window = self.response_times.lock();
        window.push_back(elapsed.as_secs_f64());
        while window.len() > self.window_capacity {
            window.pop_front();
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn translation_errors(&self) -> u64 {
        self.translation_errors.load(Ordering::Relaxed)
    }

    pub fn error_count(&self, category: ErrorCategory) -> u64 {
        self.errors_by_category[category.index()].load(Ordering::Relaxed)
    }

    pub fn window_len(&self) -> usize {
        self.response_times.lock().len()
    }

    /// 命中率，无请求时为 0
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        self.cache_hits() as f64 / total as f64
    }

    /// 最近 [`AVERAGE_SAMPLE`] 条记录的平均响应时间（秒）
    pub fn average_response_time(&self) -> f64 {
        let window = self.response_times.lock();
        let sample = window.len().min(AVERAGE_SAMPLE);
        if sample == 0 {
            return 0.0;
        }
        window.iter().rev().take(sample).sum::<f64>() / sample as f64
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            http_requests: self.http_requests.load(Ordering::Relaxed),
            total_requests: self.total_requests(),
            cache_hits: self.cache_hits(),
            cache_hit_rate: round_to(self.hit_rate(), 2),
            translation_errors: self.translation_errors(),
            avg_response_time_seconds: round_to(self.average_response_time(), 3),
            errors_by_category: ErrorCategory::ALL
                .iter()
                .map(|category| (category.as_str(), self.error_count(*category)))
                .collect(),
            resolutions: ResolutionSource::ALL
                .iter()
                .zip(self.resolutions.iter())
                .map(|(source, count)| (source.as_str(), count.load(Ordering::Relaxed)))
                .collect(),
            window_size: self.window_len(),
        }
    }

    /// 以 Prometheus 文本格式输出
    pub fn render_prometheus(&self, cache: &CacheStatus) -> String {
        let snapshot = self.snapshot();
        let mut out = String::new();

        write_family(
            &mut out,
            "http_requests_total",
            "Total HTTP requests handled",
            "counter",
            &[(None, snapshot.http_requests as f64)],
        );
        write_family(
            &mut out,
            "translation_requests_total",
            "Total translate requests",
            "counter",
            &[(None, snapshot.total_requests as f64)],
        );
        write_family(
            &mut out,
            "translation_cache_hits_total",
            "Translate requests served from cache",
            "counter",
            &[(None, snapshot.cache_hits as f64)],
        );
        write_family(
            &mut out,
            "translation_errors_total",
            "Translate requests that failed with an internal error",
            "counter",
            &[(None, snapshot.translation_errors as f64)],
        );

        let by_category: Vec<_> = snapshot
            .errors_by_category
            .iter()
            .map(|(category, count)| (Some(("category", *category)), *count as f64))
            .collect();
        write_family(
            &mut out,
            "translation_errors_by_category_total",
            "Errors by category, including degraded upstream calls",
            "counter",
            &by_category,
        );

        let by_source: Vec<_> = snapshot
            .resolutions
            .iter()
            .map(|(source, count)| (Some(("source", *source)), *count as f64))
            .collect();
        write_family(
            &mut out,
            "translation_resolutions_total",
            "Fresh translations by source",
            "counter",
            &by_source,
        );

        write_family(
            &mut out,
            "translation_cache_hit_ratio",
            "Cache hits divided by translate requests",
            "gauge",
            &[(None, self.hit_rate())],
        );
        write_family(
            &mut out,
            "translation_response_time_seconds_avg",
            "Average duration of the most recent requests",
            "gauge",
            &[(None, self.average_response_time())],
        );

        let backend_up = if cache.connected { 1.0 } else { 0.0 };
        write_family(
            &mut out,
            "translation_cache_up",
            "Whether the networked cache store answers PING",
            "gauge",
            &[(Some(("backend", cache.backend)), backend_up)],
        );
        if let Some(entries) = cache.estimated_entries {
            write_family(
                &mut out,
                "translation_cache_entries",
                "Estimated number of cached translations",
                "gauge",
                &[(Some(("backend", cache.backend)), entries as f64)],
            );
        }

        out
    }
}

type Sample<'a> = (Option<(&'a str, &'a str)>, f64);

fn write_family(out: &mut String, name: &str, help: &str, kind: &str, samples: &[Sample<'_>]) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} {}", name, kind);
    for (label, value) in samples {
        match label {
            Some((key, val)) => {
                let _ = writeln!(out, "{}{{{}=\"{}\"}} {}", name, key, val, value);
            }
            None => {
                let _ = writeln!(out, "{} {}", name, value);
            }
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::UpstreamFailure;
    use std::sync::Arc;

    #[test]
    fn test_hit_rate_without_requests_is_zero() {
        let metrics = MetricsAggregator::new();
        assert_eq!(metrics.hit_rate(), 0.0);
        assert_eq!(metrics.snapshot().cache_hit_rate, 0.0);
    }

    #[test]
    fn test_hit_rate_is_rounded() {
        let metrics = MetricsAggregator::new();
        for _ in 0..3 {
            metrics.record_translate_request();
        }
        metrics.record_cache_hit();

        assert!((metrics.hit_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
        assert_eq!(metrics.snapshot().cache_hit_rate, 0.33);
    }

    #[test]
    fn test_window_drops_oldest() {
        let metrics = MetricsAggregator::with_window_capacity(3);
        for ms in [100, 200, 300, 400] {
            metrics.record_response_time(Duration::from_millis(ms));
        }

        assert_eq!(metrics.window_len(), 3);
        // 100ms 已被淘汰
        assert!((metrics.average_response_time() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_average_uses_latest_sample() {
        let metrics = MetricsAggregator::new();
        for _ in 0..20 {
            metrics.record_response_time(Duration::from_secs(1));
        }
        for _ in 0..AVERAGE_SAMPLE {
            metrics.record_response_time(Duration::from_millis(500));
        }

        assert!((metrics.average_response_time() - 0.5).abs() < 1e-9);
        assert_eq!(metrics.snapshot().avg_response_time_seconds, 0.5);
    }

    #[test]
    fn test_only_internal_errors_count_as_translation_errors() {
        let metrics = MetricsAggregator::new();
        metrics.record_error(ErrorCategory::InvalidInput);
        metrics.record_error(ErrorCategory::UpstreamTimeout);
        metrics.record_error(ErrorCategory::Internal);

        assert_eq!(metrics.translation_errors(), 1);
        assert_eq!(metrics.error_count(ErrorCategory::InvalidInput), 1);
        assert_eq!(metrics.error_count(ErrorCategory::UpstreamTimeout), 1);
    }

    #[test]
    fn test_record_resolution_counts_failure_category() {
        let metrics = MetricsAggregator::new();
        metrics.record_resolution(&Resolution::TableHit {
            text: "bonjour".into(),
            cause: Some(UpstreamFailure::Status(503)),
        });
        metrics.record_resolution(&Resolution::Upstream("hola".into()));

        let snapshot = metrics.snapshot();
        assert_eq!(metrics.error_count(ErrorCategory::UpstreamStatus), 1);
        assert_eq!(snapshot.resolutions["fallback"], 1);
        assert_eq!(snapshot.resolutions["upstream"], 1);
        assert_eq!(snapshot.resolutions["passthrough"], 0);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let metrics = Arc::new(MetricsAggregator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_translate_request();
                        metrics.record_response_time(Duration::from_millis(1));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.total_requests(), 8000);
        assert_eq!(metrics.window_len(), WINDOW_CAPACITY);
    }

    #[test]
    fn test_prometheus_preamble() {
        let metrics = MetricsAggregator::new();
        metrics.record_http_request();
        metrics.record_translate_request();

        let body = metrics.render_prometheus(&CacheStatus::new(CacheBackend::Memory, false, Some(4)));
        assert!(body.contains("# HELP http_requests_total"));
        assert!(body.contains("# TYPE http_requests_total counter"));
        assert!(body.contains("http_requests_total 1\n"));
        assert!(body.contains("translation_errors_by_category_total{category=\"internal\"} 0"));
        assert!(body.contains("translation_cache_up{backend=\"memory\"} 0"));
        assert!(body.contains("translation_cache_entries{backend=\"memory\"} 4"));
    }
}
