use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use portfolio_analytics::analytics::{
    AdvisorError, OrgId, OrgSnapshot, PropertyId, ProviderError, RentAdvisor, RentSuggestion,
    SnapshotProvider,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Snapshot provider over pre-seeded organizations, backing the demo
/// deployment and the CLI report.
#[derive(Default)]
pub(crate) struct InMemorySnapshotProvider {
    snapshots: HashMap<String, OrgSnapshot>,
}

impl InMemorySnapshotProvider {
    pub(crate) fn single(org: &str, snapshot: OrgSnapshot) -> Self {
        let mut snapshots = HashMap::new();
        snapshots.insert(org.to_string(), snapshot);
        Self { snapshots }
    }
}

impl SnapshotProvider for InMemorySnapshotProvider {
    async fn org_snapshot(&self, org_id: &OrgId) -> Result<OrgSnapshot, ProviderError> {
        self.snapshots
            .get(&org_id.0)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownOrganization(org_id.0.clone()))
    }
}

/// Rent advisor answering from a fixed per-property table; properties
/// without an entry get no recommendation.
#[derive(Default)]
pub(crate) struct StaticRentAdvisor {
    suggestions: HashMap<String, RentSuggestion>,
}

impl StaticRentAdvisor {
    pub(crate) fn with_suggestion(
        mut self,
        property: &str,
        recommended_rent: i64,
        adjustment_percentage: f64,
    ) -> Self {
        self.suggestions.insert(
            property.to_string(),
            RentSuggestion {
                recommended_rent,
                adjustment_percentage,
            },
        );
        self
    }
}

impl RentAdvisor for StaticRentAdvisor {
    async fn suggest_rent(
        &self,
        property_id: &PropertyId,
        _org_id: &OrgId,
    ) -> Result<Option<RentSuggestion>, AdvisorError> {
        Ok(self.suggestions.get(&property_id.0).copied())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
