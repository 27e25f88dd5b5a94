use metrics::counter;

pub struct FederationTelemetry;

impl FederationTelemetry {
    /// Counts one source answer. `outcome` is `found`, `not_found`,
    /// `unsupported` or `fault`.
    pub fn record_outcome(operation: &'static str, source: &str, outcome: &'static str) {
        counter!(
            "cm_federation_source_outcomes_total",
            "operation" => operation,
            "source" => source.to_string(),
            "outcome" => outcome
        )
        .increment(1);
    }
}
