use metrics::counter;

pub struct ProviderTelemetry;

impl ProviderTelemetry {
    pub fn record_mapping_fallback(internal_role: &str) {
        counter!(
            "cm_role_mapping_fallback_total",
            "internal_role" => internal_role.to_string()
        )
        .increment(1);
    }

    pub fn record_request(operation: &'static str) {
        counter!("cm_group_provider_requests_total", "operation" => operation).increment(1);
    }
}
