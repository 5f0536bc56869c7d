use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{LeaseId, PropertyId, TenantId};
use super::provider::OrgSnapshot;
use super::timeliness::classify_timeliness;

/// Urgency bucket derived purely from days until lease expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalPriority {
    Immediate,
    High,
    Medium,
}

impl RenewalPriority {
    pub fn from_days_until_expiry(days: i64) -> Self {
        if days <= 30 {
            Self::Immediate
        } else if days <= 60 {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "Immediate",
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

/// Payment-history band over the lease's own schedule history, using the
/// same boundaries as the risk scorer's on-time buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentHistoryBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PaymentHistoryBand {
    pub fn from_on_time_pct(on_time_pct: f64) -> Self {
        if on_time_pct >= 85.0 {
            Self::Excellent
        } else if on_time_pct >= 70.0 {
            Self::Good
        } else if on_time_pct >= 50.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }

    const fn probability_adjustment(self) -> i32 {
        match self {
            Self::Excellent => 20,
            Self::Good => 10,
            Self::Fair => 0,
            Self::Poor => -20,
        }
    }
}

/// Tenant-quality inputs behind a renewal probability, surfaced so the
/// ranking can be audited.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantRenewalProfile {
    pub payment_history: PaymentHistoryBand,
    pub lease_duration_years: i64,
    pub maintenance_requests: usize,
}

/// A ranked renewal opportunity, one per candidate lease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseRenewalOpportunity {
    pub lease_id: LeaseId,
    pub tenant_id: TenantId,
    pub tenant_name: String,
    pub property_id: PropertyId,
    pub property_name: String,
    pub current_rent: i64,
    pub suggested_rent: i64,
    pub ends_on: NaiveDate,
    pub days_until_expiry: i64,
    pub priority: RenewalPriority,
    pub renewal_probability: u8,
    pub recommendation: String,
    pub tenant_score: TenantRenewalProfile,
}

/// Renewal opportunities sorted ascending by lease end date, plus the
/// count of candidate leases dropped for unresolved joins.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenewalReport {
    pub opportunities: Vec<LeaseRenewalOpportunity>,
    pub skipped_leases: u32,
}

/// Fully evaluated candidate awaiting its advisor-suggested rent.
#[derive(Debug, Clone)]
pub(crate) struct RenewalCandidate {
    pub lease_id: LeaseId,
    pub tenant_id: TenantId,
    pub tenant_name: String,
    pub property_id: PropertyId,
    pub property_name: String,
    pub current_rent: i64,
    pub ends_on: NaiveDate,
    pub days_until_expiry: i64,
    pub priority: RenewalPriority,
    pub renewal_probability: u8,
    pub recommendation: String,
    pub tenant_score: TenantRenewalProfile,
}

impl RenewalCandidate {
    /// Attach the advisor's answer; `None` falls back to the current rent.
    pub(crate) fn into_opportunity(
        self,
        suggested_rent: Option<i64>,
    ) -> LeaseRenewalOpportunity {
        LeaseRenewalOpportunity {
            suggested_rent: suggested_rent.unwrap_or(self.current_rent),
            lease_id: self.lease_id,
            tenant_id: self.tenant_id,
            tenant_name: self.tenant_name,
            property_id: self.property_id,
            property_name: self.property_name,
            current_rent: self.current_rent,
            ends_on: self.ends_on,
            days_until_expiry: self.days_until_expiry,
            priority: self.priority,
            renewal_probability: self.renewal_probability,
            recommendation: self.recommendation,
            tenant_score: self.tenant_score,
        }
    }
}

/// Select and evaluate active leases expiring within the horizon. Returns
/// candidates sorted ascending by end date and the skipped-join count.
pub(crate) fn renewal_candidates(
    snapshot: &OrgSnapshot,
    horizon_days: u16,
    today: NaiveDate,
) -> (Vec<RenewalCandidate>, u32) {
    let horizon_end = today + Duration::days(i64::from(horizon_days));
    let mut candidates = Vec::new();
    let mut skipped_leases = 0u32;

    for lease in snapshot.leases.iter().filter(|lease| {
        lease.is_active_on(today) && lease.ends_on >= today && lease.ends_on <= horizon_end
    }) {
        let Some(tenant) = snapshot.tenant(&lease.tenant_id) else {
            debug!(lease = %lease.id.0, "skipping renewal candidate with unresolved tenant");
            skipped_leases += 1;
            continue;
        };
        let Some(property) = snapshot.property(&lease.property_id) else {
            debug!(lease = %lease.id.0, "skipping renewal candidate with unresolved property");
            skipped_leases += 1;
            continue;
        };

        let timeliness =
            classify_timeliness(&snapshot.schedule_rows, |row| row.lease_id == lease.id);
        let payment_history = PaymentHistoryBand::from_on_time_pct(timeliness.on_time_pct);

        let days_until_expiry = (lease.ends_on - today).num_days();
        let lease_duration_years = (lease.ends_on - lease.starts_on).num_days() / 365;
        let maintenance_requests = snapshot
            .maintenance_requests
            .iter()
            .filter(|request| request.tenant_id.as_ref() == Some(&lease.tenant_id))
            .count();

        let mut probability = 70i32 + payment_history.probability_adjustment();
        if lease_duration_years >= 2 {
            probability += 10;
        }
        if maintenance_requests > 5 {
            probability -= 10;
        }
        if maintenance_requests == 0 {
            probability += 5;
        }
        let renewal_probability = probability.clamp(20, 95) as u8;

        let priority = RenewalPriority::from_days_until_expiry(days_until_expiry);
        let recommendation =
            recommendation_text(payment_history, renewal_probability, days_until_expiry);

        candidates.push(RenewalCandidate {
            lease_id: lease.id.clone(),
            tenant_id: lease.tenant_id.clone(),
            tenant_name: tenant.full_name.clone(),
            property_id: lease.property_id.clone(),
            property_name: property.name.clone(),
            current_rent: lease.monthly_rent,
            ends_on: lease.ends_on,
            days_until_expiry,
            priority,
            renewal_probability,
            recommendation,
            tenant_score: TenantRenewalProfile {
                payment_history,
                lease_duration_years,
                maintenance_requests,
            },
        });
    }

    candidates.sort_by_key(|candidate| candidate.ends_on);

    (candidates, skipped_leases)
}

fn recommendation_text(
    band: PaymentHistoryBand,
    renewal_probability: u8,
    days_until_expiry: i64,
) -> String {
    let base = match band {
        PaymentHistoryBand::Excellent if renewal_probability >= 80 => {
            "Strong renewal candidate. Offer terms early and consider a market-rate increase."
        }
        PaymentHistoryBand::Good => {
            "Good renewal candidate. Extend an offer early with a modest increase."
        }
        PaymentHistoryBand::Fair | PaymentHistoryBand::Poor => {
            "Weigh this renewal carefully; review the payment history with the tenant before offering terms."
        }
        _ => "Extend a standard renewal offer.",
    };

    if days_until_expiry <= 30 {
        format!("{base} Lease expires within 30 days; act now.")
    } else {
        base.to_string()
    }
}
