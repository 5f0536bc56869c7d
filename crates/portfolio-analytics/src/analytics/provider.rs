use std::future::Future;

use serde::{Deserialize, Serialize};

use super::domain::{
    Expense, Lease, MaintenanceRequest, OrgId, Property, PropertyId, RentPayment, ScheduleRow,
    Tenant,
};

/// Point-in-time view of one organization's records. The engine never
/// mutates a snapshot; every scorer is a pure function over one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgSnapshot {
    pub leases: Vec<Lease>,
    pub schedule_rows: Vec<ScheduleRow>,
    pub rent_payments: Vec<RentPayment>,
    pub maintenance_requests: Vec<MaintenanceRequest>,
    pub expenses: Vec<Expense>,
    pub properties: Vec<Property>,
    pub tenants: Vec<Tenant>,
}

impl OrgSnapshot {
    pub fn tenant(&self, id: &super::domain::TenantId) -> Option<&Tenant> {
        self.tenants.iter().find(|tenant| &tenant.id == id)
    }

    pub fn property(&self, id: &PropertyId) -> Option<&Property> {
        self.properties.iter().find(|property| &property.id == id)
    }
}

/// Read seam over the external record store. Rows belonging to other
/// organizations must never appear in the returned snapshot.
pub trait SnapshotProvider: Send + Sync {
    fn org_snapshot(
        &self,
        org_id: &OrgId,
    ) -> impl Future<Output = Result<OrgSnapshot, ProviderError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown organization: {0}")]
    UnknownOrganization(String),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Market-rent recommendation from the external advisor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentSuggestion {
    pub recommended_rent: i64,
    pub adjustment_percentage: f64,
}

/// Seam over the external rent advisor. `Ok(None)` means the advisor has
/// no recommendation for the property and callers fall back to the
/// current rent; an `Err` must propagate instead of being substituted.
pub trait RentAdvisor: Send + Sync {
    fn suggest_rent(
        &self,
        property_id: &PropertyId,
        org_id: &OrgId,
    ) -> impl Future<Output = Result<Option<RentSuggestion>, AdvisorError>> + Send;
}

#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("rent advisor unavailable: {0}")]
    Unavailable(String),
}
