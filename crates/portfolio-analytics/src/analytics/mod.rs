//! Portfolio risk and health analytics.
//!
//! Three cooperating scorers turn raw operational records into
//! decision-support outputs: per-tenant payment-risk scores, an aggregate
//! portfolio health score, and ranked lease-renewal opportunities. Each
//! scorer is a pure function of a snapshot plus an explicit evaluation
//! date; the only external call is the renewal ranker's per-property
//! rent-advisor lookup.

pub mod domain;
pub mod health;
pub mod provider;
pub mod renewals;
pub mod risk;
pub mod router;
pub mod service;
pub mod timeliness;

#[cfg(test)]
mod tests;

pub use domain::{
    Expense, Lease, LeaseId, LeaseStatus, MaintenanceRequest, MaintenanceStatus, OrgId, Property,
    PropertyId, RentPayment, ScheduleRow, Tenant, TenantId,
};
pub use health::{HealthLevel, HealthMetrics, PortfolioHealth};
pub use provider::{
    AdvisorError, OrgSnapshot, ProviderError, RentAdvisor, RentSuggestion, SnapshotProvider,
};
pub use renewals::{
    LeaseRenewalOpportunity, PaymentHistoryBand, RenewalPriority, RenewalReport,
    TenantRenewalProfile,
};
pub use risk::{PaymentRiskReport, PaymentRiskScore, RiskLevel};
pub use router::analytics_router;
pub use service::{AnalyticsError, AnalyticsService, PortfolioOverview};
pub use timeliness::{classify_timeliness, full_history, PaymentTimeliness};
