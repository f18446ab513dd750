use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::errors::ServiceError;

// Prometheus metrics (default registry)
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dscatalog_http_requests_total",
        "HTTP requests by method and status",
        &["method", "status"]
    )
    .expect("register http_requests_total")
});

pub static CATALOG_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "dscatalog_operations_total",
        "Catalog service calls by entity, operation and outcome",
        &["entity", "operation", "outcome"]
    )
    .expect("register operations_total")
});

fn outcome<T>(result: &Result<T, ServiceError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ServiceError::NotFound(_)) => "not_found",
        Err(ServiceError::Database(_)) => "conflict",
        Err(ServiceError::Validation(_) | ServiceError::Model(_) | ServiceError::BadRequest(_)) => "rejected",
        Err(ServiceError::Db(_)) => "error",
    }
}

/// Count one service call and hand the result back unchanged.
pub fn record<T>(entity: &str, operation: &str, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
    CATALOG_OPERATIONS_TOTAL.with_label_values(&[entity, operation, outcome(&result)]).inc();
    result
}

pub async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method.as_str(), response.status().as_str()])
        .inc();
    response
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_by_outcome() {
        let before = CATALOG_OPERATIONS_TOTAL.with_label_values(&["product", "delete", "conflict"]).get();
        let res: Result<(), _> = record("product", "delete", Err(ServiceError::Database("held".into())));
        assert!(res.is_err());
        let after = CATALOG_OPERATIONS_TOTAL.with_label_values(&["product", "delete", "conflict"]).get();
        assert_eq!(after, before + 1);

        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("dscatalog_operations_total"));
    }
}
