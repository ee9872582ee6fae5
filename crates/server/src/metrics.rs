use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, Encoder, IntCounter,
    IntCounterVec, IntGauge, TextEncoder,
};

// Prometheus metrics (default registry)
pub static ITEMS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("item_store_items_created_total", "Total items created")
        .expect("register items_created_total")
});

pub static ITEMS_UPDATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("item_store_items_updated_total", "Total items replaced by update")
        .expect("register items_updated_total")
});

pub static ITEMS_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("item_store_items_deleted_total", "Total items deleted")
        .expect("register items_deleted_total")
});

pub static ITEMS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!("item_store_items", "Items currently stored").expect("register items")
});

pub static REQUEST_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "item_store_request_errors_total",
        "Requests rejected, by error kind",
        &["kind"]
    )
    .expect("register request_errors_total")
});

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
