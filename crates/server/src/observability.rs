use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};
use service::auth::errors::AuthError;
use service::identity::{IdentityError, UniqueField};

// Prometheus metrics (default registry)
pub static IDENTITY_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "identity_operations_total",
        "Identity registry and auth operations by outcome",
        &["op", "outcome"]
    )
    .expect("register identity_operations_total")
});

/// Short label describing how an operation failed.
pub trait Outcome {
    fn outcome(&self) -> &'static str;
}

impl Outcome for IdentityError {
    fn outcome(&self) -> &'static str {
        match self {
            IdentityError::NotFound(_) => "not_found",
            IdentityError::Conflict(UniqueField::Email) => "conflict_email",
            IdentityError::Conflict(UniqueField::Phone) => "conflict_phone",
            IdentityError::Repository(_) => "error",
        }
    }
}

impl Outcome for AuthError {
    fn outcome(&self) -> &'static str {
        match self {
            AuthError::Identity(e) => e.outcome(),
            AuthError::Validation(_) => "invalid",
            AuthError::Unauthorized => "unauthorized",
            AuthError::HashError(_) | AuthError::TokenError(_) => "error",
        }
    }
}

pub fn record<T, E: Outcome>(op: &str, res: &Result<T, E>) {
    let outcome = match res {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    IDENTITY_OPERATIONS_TOTAL.with_label_values(&[op, outcome]).inc();
}

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
