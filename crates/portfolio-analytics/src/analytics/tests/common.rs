use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate};

use crate::analytics::domain::{
    Lease, LeaseId, LeaseStatus, MaintenanceRequest, MaintenanceStatus, OrgId, Property,
    PropertyId, ScheduleRow, Tenant, TenantId,
};
use crate::analytics::provider::{
    AdvisorError, OrgSnapshot, ProviderError, RentAdvisor, RentSuggestion, SnapshotProvider,
};
use crate::analytics::service::AnalyticsService;
use crate::config::AnalyticsConfig;

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    date(2026, 8, 6)
}

pub(super) fn property(id: &str, name: &str) -> Property {
    Property {
        id: PropertyId(id.to_string()),
        name: name.to_string(),
    }
}

pub(super) fn tenant(id: &str, name: &str) -> Tenant {
    Tenant {
        id: TenantId(id.to_string()),
        full_name: name.to_string(),
    }
}

pub(super) fn active_lease(
    id: &str,
    tenant_id: &str,
    property_id: &str,
    monthly_rent: i64,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
) -> Lease {
    Lease {
        id: LeaseId(id.to_string()),
        tenant_id: TenantId(tenant_id.to_string()),
        property_id: PropertyId(property_id.to_string()),
        monthly_rent,
        starts_on,
        ends_on,
        status: LeaseStatus::Active,
    }
}

pub(super) fn on_time_row(lease_id: &str, due_on: NaiveDate, amount: i64) -> ScheduleRow {
    ScheduleRow {
        lease_id: LeaseId(lease_id.to_string()),
        due_on,
        amount_due: amount,
        is_paid: true,
        paid_on: Some(due_on),
        amount_paid: Some(amount),
    }
}

pub(super) fn late_row(
    lease_id: &str,
    due_on: NaiveDate,
    amount: i64,
    days_late: i64,
) -> ScheduleRow {
    ScheduleRow {
        lease_id: LeaseId(lease_id.to_string()),
        due_on,
        amount_due: amount,
        is_paid: true,
        paid_on: Some(due_on + Duration::days(days_late)),
        amount_paid: Some(amount),
    }
}

pub(super) fn unpaid_row(lease_id: &str, due_on: NaiveDate, amount: i64) -> ScheduleRow {
    ScheduleRow {
        lease_id: LeaseId(lease_id.to_string()),
        due_on,
        amount_due: amount,
        is_paid: false,
        paid_on: None,
        amount_paid: None,
    }
}

pub(super) fn maintenance_request(
    property_id: &str,
    tenant_id: Option<&str>,
    requested_on: NaiveDate,
    assigned_after_days: Option<i64>,
) -> MaintenanceRequest {
    MaintenanceRequest {
        property_id: PropertyId(property_id.to_string()),
        tenant_id: tenant_id.map(|id| TenantId(id.to_string())),
        status: if assigned_after_days.is_some() {
            MaintenanceStatus::InProgress
        } else {
            MaintenanceStatus::Submitted
        },
        requested_on,
        assigned_on: assigned_after_days.map(|days| requested_on + Duration::days(days)),
    }
}

/// Snapshot with one property/tenant pair pre-registered so single-lease
/// tests only add what they assert on.
pub(super) fn base_snapshot() -> OrgSnapshot {
    OrgSnapshot {
        properties: vec![property("prop-1", "Maple Court")],
        tenants: vec![tenant("ten-1", "Alice Romero")],
        ..OrgSnapshot::default()
    }
}

#[derive(Default)]
pub(super) struct InMemoryProvider {
    snapshots: HashMap<String, OrgSnapshot>,
}

impl InMemoryProvider {
    pub(super) fn with(org: &str, snapshot: OrgSnapshot) -> Self {
        let mut snapshots = HashMap::new();
        snapshots.insert(org.to_string(), snapshot);
        Self { snapshots }
    }
}

impl SnapshotProvider for InMemoryProvider {
    async fn org_snapshot(&self, org_id: &OrgId) -> Result<OrgSnapshot, ProviderError> {
        self.snapshots
            .get(&org_id.0)
            .cloned()
            .ok_or_else(|| ProviderError::UnknownOrganization(org_id.0.clone()))
    }
}

pub(super) struct UnavailableProvider;

impl SnapshotProvider for UnavailableProvider {
    async fn org_snapshot(&self, _org_id: &OrgId) -> Result<OrgSnapshot, ProviderError> {
        Err(ProviderError::Unavailable("record store offline".to_string()))
    }
}

/// Advisor answering from a per-property table and recording every call,
/// so tests can assert one lookup per candidate.
#[derive(Default)]
pub(super) struct RecordingAdvisor {
    suggestions: HashMap<String, RentSuggestion>,
    calls: Mutex<Vec<String>>,
}

impl RecordingAdvisor {
    pub(super) fn with_suggestion(mut self, property: &str, recommended_rent: i64) -> Self {
        self.suggestions.insert(
            property.to_string(),
            RentSuggestion {
                recommended_rent,
                adjustment_percentage: 0.0,
            },
        );
        self
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("advisor mutex poisoned").clone()
    }
}

impl RentAdvisor for RecordingAdvisor {
    async fn suggest_rent(
        &self,
        property_id: &PropertyId,
        _org_id: &OrgId,
    ) -> Result<Option<RentSuggestion>, AdvisorError> {
        self.calls
            .lock()
            .expect("advisor mutex poisoned")
            .push(property_id.0.clone());
        Ok(self.suggestions.get(&property_id.0).copied())
    }
}

pub(super) struct FailingAdvisor;

impl RentAdvisor for FailingAdvisor {
    async fn suggest_rent(
        &self,
        _property_id: &PropertyId,
        _org_id: &OrgId,
    ) -> Result<Option<RentSuggestion>, AdvisorError> {
        Err(AdvisorError::Unavailable("advisor offline".to_string()))
    }
}

pub(super) fn service_over(
    org: &str,
    snapshot: OrgSnapshot,
    advisor: Arc<RecordingAdvisor>,
) -> AnalyticsService<InMemoryProvider, RecordingAdvisor> {
    AnalyticsService::new(
        Arc::new(InMemoryProvider::with(org, snapshot)),
        advisor,
        AnalyticsConfig::default(),
    )
}
