use axum::http::{header, HeaderName, StatusCode};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static POSTS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("diary_posts_created_total", "Total posts created").expect("register posts_created_total")
});

pub static POSTS_SOFT_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("diary_posts_soft_deleted_total", "Total posts moved to the removed list")
        .expect("register posts_soft_deleted_total")
});

pub static POSTS_RESTORED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("diary_posts_restored_total", "Total removed posts restored")
        .expect("register posts_restored_total")
});

pub static POSTS_HARD_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("diary_posts_hard_deleted_total", "Total posts permanently deleted")
        .expect("register posts_hard_deleted_total")
});

pub static FILES_UPLOADED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("diary_files_uploaded_total", "Total files uploaded with posts")
        .expect("register files_uploaded_total")
});

/// Touch every counter so they show up on `/metrics` before the first event.
pub fn init_metrics() {
    Lazy::force(&POSTS_CREATED_TOTAL);
    Lazy::force(&POSTS_SOFT_DELETED_TOTAL);
    Lazy::force(&POSTS_RESTORED_TOTAL);
    Lazy::force(&POSTS_HARD_DELETED_TOTAL);
    Lazy::force(&FILES_UPLOADED_TOTAL);
}

/// Text exposition of the default registry, with the encoder's content type.
pub fn encode_metrics() -> (StatusCode, [(HeaderName, String); 1], String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string())],
            format!("metrics encode error: {e}"),
        );
    }
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
