use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaseId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Lifecycle state reported by the record store. Only `Active` leases
/// participate in scoring, and only while today falls inside the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    Draft,
    Active,
    Ended,
    Terminated,
}

impl LeaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Ended => "Ended",
            Self::Terminated => "Terminated",
        }
    }
}

/// A rental agreement as returned by the snapshot provider. Amounts are
/// integer minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub id: LeaseId,
    pub tenant_id: TenantId,
    pub property_id: PropertyId,
    pub monthly_rent: i64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub status: LeaseStatus,
}

impl Lease {
    /// A lease counts as occupied/scorable only while its status is
    /// `Active` and today falls within the term, inclusive on both ends.
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.status == LeaseStatus::Active && self.starts_on <= today && today <= self.ends_on
    }
}

/// One expected payment obligation for a lease, independent of whether or
/// when it was settled. `amount_paid` is cumulative against `amount_due`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub lease_id: LeaseId,
    pub due_on: NaiveDate,
    pub amount_due: i64,
    pub is_paid: bool,
    pub paid_on: Option<NaiveDate>,
    pub amount_paid: Option<i64>,
}

impl ScheduleRow {
    /// Late means settled strictly after the due date; same-day is on
    /// time, and a settled row with no recorded paid date is never late.
    pub fn is_late(&self) -> bool {
        self.is_paid && self.paid_on.map(|paid| paid > self.due_on).unwrap_or(false)
    }

    /// Remaining obligation on an unsettled row.
    pub fn outstanding(&self) -> i64 {
        if self.is_paid {
            0
        } else {
            self.amount_due - self.amount_paid.unwrap_or(0)
        }
    }
}

/// Historical payment fact. Matched to leases by id and date only, never
/// row-for-row against the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentPayment {
    pub lease_id: LeaseId,
    pub paid_on: NaiveDate,
    pub amount: i64,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Submitted,
    Acknowledged,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Submitted => "Submitted",
            Self::Acknowledged => "Acknowledged",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    pub property_id: PropertyId,
    pub tenant_id: Option<TenantId>,
    pub status: MaintenanceStatus,
    pub requested_on: NaiveDate,
    pub assigned_on: Option<NaiveDate>,
}

impl MaintenanceRequest {
    /// Days between the request and its assignment, when assigned.
    pub fn response_days(&self) -> Option<i64> {
        self.assigned_on
            .map(|assigned| (assigned - self.requested_on).num_days().max(0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: i64,
    pub incurred_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub full_name: String,
}
