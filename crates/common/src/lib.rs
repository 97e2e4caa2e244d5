//! Pieces shared by every crate in the workspace: tracing setup and the
//! small response types the transport layer hands back verbatim.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
        assert_eq!(serde_json::to_value(&h).unwrap(), serde_json::json!({"status": "ok"}));
    }

    #[test]
    fn error_body_omits_missing_detail() {
        let body = types::ErrorBody::new("Not Found", None);
        let v = serde_json::to_value(&body).unwrap();
        assert_eq!(v, serde_json::json!({"error": "Not Found"}));
    }
}
