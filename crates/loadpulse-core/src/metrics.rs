//! Label-keyed metrics registry.
//!
//! Counter/gauge/histogram vectors backed by `DashMap` and atomics. Every
//! series is keyed by the fixed (method, status_code, user) tuple. Label
//! values are accepted verbatim; cardinality is bounded only by the traffic
//! that arrives. Rendering sorts series so an unchanged registry always
//! produces identical exposition output.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::Duration;

/// Series key: one time series per distinct tuple.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Labels {
    pub method: String,
    pub status_code: String,
    pub user: String,
}

impl Labels {
    pub fn new(method: &str, status_code: &str, user: &str) -> Self {
        Self {
            method: method.to_string(),
            status_code: status_code.to_string(),
            user: user.to_string(),
        }
    }

    fn render(&self) -> String {
        format!(
            "method=\"{}\",status_code=\"{}\",user=\"{}\"",
            escape_label(&self.method),
            escape_label(&self.status_code),
            escape_label(&self.user)
        )
    }
}

/// Escape label values per the text exposition rules.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Labels, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1, creating the series if absent.
    pub fn inc(&self, labels: &Labels) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, labels: &Labels, v: u64) {
        let counter = self
            .map
            .entry(labels.clone())
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one series (0 if the series was never touched).
    pub fn get(&self, labels: &Labels) -> u64 {
        self.map
            .get(labels)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} counter");
        let mut series: Vec<(Labels, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));
        for (k, v) in series {
            let _ = writeln!(out, "{name}{{{}}} {v}", k.render());
        }
    }
}

#[derive(Default)]
pub struct GaugeVec {
    map: DashMap<Labels, AtomicI64>,
}

impl GaugeVec {
    /// Add an arbitrary signed delta, creating the series if absent.
    pub fn add(&self, labels: &Labels, v: i64) {
        let gauge = self
            .map
            .entry(labels.clone())
            .or_insert_with(|| AtomicI64::new(0));
        gauge.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for one series (0 if the series was never touched).
    pub fn get(&self, labels: &Labels) -> i64 {
        self.map
            .get(labels)
            .map(|g| g.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} gauge");
        let mut series: Vec<(Labels, i64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));
        for (k, v) in series {
            let _ = writeln!(out, "{name}{{{}}} {v}", k.render());
        }
    }
}

// Fixed buckets in milliseconds, rendered as seconds. Centered around the
// simulated processing delay (2s in the reference config).
const BUCKETS_MILLIS: [u64; 9] = [100, 250, 500, 1_000, 2_000, 2_500, 3_000, 5_000, 10_000];

// `le` label values matching BUCKETS_MILLIS, in seconds.
const BUCKET_LABELS: [&str; 9] = ["0.1", "0.25", "0.5", "1", "2", "2.5", "3", "5", "10"];

struct AtomicHistogram {
    count: AtomicU64,
    sum_millis: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_millis: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<Labels, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe one latency sample and increment cumulative buckets.
    pub fn observe(&self, labels: &Labels, latency: Duration) {
        let hist = self
            .map
            .entry(labels.clone())
            .or_insert_with(AtomicHistogram::default);
        let millis = latency.as_millis() as u64;

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_millis.fetch_add(millis, Ordering::Relaxed);

        for (i, &b) in BUCKETS_MILLIS.iter().enumerate() {
            if millis <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Sample count for one series.
    pub fn count(&self, labels: &Labels) -> u64 {
        self.map
            .get(labels)
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum of observed samples for one series, in milliseconds.
    pub fn sum_millis(&self, labels: &Labels) -> u64 {
        self.map
            .get(labels)
            .map(|h| h.sum_millis.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} histogram");
        let mut keys: Vec<Labels> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();
        for k in keys {
            let Some(hist) = self.map.get(&k) else { continue };
            let label_str = k.render();

            for (i, le) in BUCKET_LABELS.iter().enumerate() {
                let c = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{label_str},le=\"{le}\"}} {c}");
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{label_str},le=\"+Inf\"}} {count}");

            let sum = hist.sum_millis.load(Ordering::Relaxed) as f64 / 1000.0;
            let _ = writeln!(out, "{name}_sum{{{label_str}}} {sum:.3}");
            let _ = writeln!(out, "{name}_count{{{label_str}}} {count}");
        }
    }
}

/// The three instrument families the service reports. Created once at
/// startup, owned for the process lifetime, no teardown.
#[derive(Default)]
pub struct AppMetrics {
    requests_total: CounterVec,
    in_flight: GaugeVec,
    request_duration: HistogramVec,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one completed request for the series.
    pub fn inc_requests(&self, method: &str, status_code: &str, user: &str) {
        self.requests_total
            .inc(&Labels::new(method, status_code, user));
    }

    /// Move the in-flight gauge by `delta` (+1 on entry, -1 on exit).
    pub fn adjust_in_flight(&self, method: &str, status_code: &str, user: &str, delta: i64) {
        self.in_flight
            .add(&Labels::new(method, status_code, user), delta);
    }

    /// Record one request latency sample.
    pub fn observe_latency(&self, method: &str, status_code: &str, user: &str, latency: Duration) {
        self.request_duration
            .observe(&Labels::new(method, status_code, user), latency);
    }

    pub fn requests(&self, labels: &Labels) -> u64 {
        self.requests_total.get(labels)
    }

    pub fn in_flight(&self, labels: &Labels) -> i64 {
        self.in_flight.get(labels)
    }

    pub fn latency_count(&self, labels: &Labels) -> u64 {
        self.request_duration.count(labels)
    }

    pub fn latency_sum_millis(&self, labels: &Labels) -> u64 {
        self.request_duration.sum_millis(labels)
    }

    /// Render the full snapshot. Series are sorted, so two scrapes of an
    /// unchanged registry are byte-identical.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.requests_total.render(
            "loadpulse_http_requests_total",
            "Total amount of HTTP requests",
            &mut out,
        );
        self.in_flight.render(
            "loadpulse_http_requests_in_flight",
            "Requests currently being handled",
            &mut out,
        );
        self.request_duration.render(
            "loadpulse_http_request_duration_seconds",
            "Request handling latency",
            &mut out,
        );
        out
    }
}
