use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, register_histogram_vec, CounterVec, Gauge, HistogramVec,
};

pub static OPS_TOTAL: Lazy<CounterVec> =
    Lazy::new(|| register_counter_vec!("dataview_ops_total", "ops by name", &["op"]).unwrap());

pub static OP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!("dataview_op_duration_seconds", "op durations", &["op"]).unwrap()
});

pub static EXPORT_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!("dataview_export_total", "exports by format", &["format"]).unwrap()
});

pub static ACTIVE_VIEWS: Lazy<Gauge> =
    Lazy::new(|| register_gauge!("dataview_active_views", "registered views").unwrap());

/// Count the op and return a running duration timer for it.
pub fn track(op: &str) -> prometheus::HistogramTimer {
    OPS_TOTAL.with_label_values(&[op]).inc();
    OP_DURATION.with_label_values(&[op]).start_timer()
}
