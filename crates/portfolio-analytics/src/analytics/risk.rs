use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Lease, TenantId};
use super::provider::OrgSnapshot;
use super::timeliness::classify_timeliness;

/// Ordinal risk band derived from the additive risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Thresholds are contiguous over the clamped score: no overlap, no gap.
    pub fn from_score(score: u8) -> Self {
        match score {
            70.. => Self::Critical,
            45..=69 => Self::High,
            20..=44 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Recommendation text is determined by the band alone.
    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Critical => {
                "Escalate immediately: begin formal collections outreach and consult counsel on available remedies."
            }
            Self::High => {
                "Send an urgent payment reminder and schedule a meeting with the tenant this week."
            }
            Self::Medium => {
                "Enroll the tenant in proactive reminders starting five days before each due date."
            }
            Self::Low => "Continue standard payment reminders.",
        }
    }
}

/// Payment-risk assessment for one tenant's active lease.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRiskScore {
    pub tenant_id: TenantId,
    pub tenant_name: String,
    pub unit_label: String,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub total_payments: usize,
    pub late_payments: usize,
    pub on_time_percentage: f64,
    pub average_days_late: f64,
    pub outstanding_balance: i64,
    pub last_payment_on: Option<NaiveDate>,
    pub next_payment_due: Option<NaiveDate>,
    pub recommendation: &'static str,
}

/// Scores for every resolvable active lease, highest risk first, plus a
/// count of leases skipped because their tenant or property join failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRiskReport {
    pub scores: Vec<PaymentRiskScore>,
    pub skipped_leases: u32,
}

/// Score every active lease in the snapshot.
pub fn score_portfolio(snapshot: &OrgSnapshot, today: NaiveDate) -> PaymentRiskReport {
    let mut scores = Vec::new();
    let mut skipped_leases = 0u32;

    for lease in snapshot.leases.iter().filter(|l| l.is_active_on(today)) {
        let Some(tenant) = snapshot.tenant(&lease.tenant_id) else {
            debug!(lease = %lease.id.0, "skipping lease with unresolved tenant");
            skipped_leases += 1;
            continue;
        };
        let Some(property) = snapshot.property(&lease.property_id) else {
            debug!(lease = %lease.id.0, "skipping lease with unresolved property");
            skipped_leases += 1;
            continue;
        };

        scores.push(score_lease(
            snapshot,
            lease,
            tenant.full_name.clone(),
            property.name.clone(),
            today,
        ));
    }

    // Stable sort keeps discovery order across equal scores.
    scores.sort_by(|a, b| b.risk_score.cmp(&a.risk_score));

    PaymentRiskReport {
        scores,
        skipped_leases,
    }
}

fn score_lease(
    snapshot: &OrgSnapshot,
    lease: &Lease,
    tenant_name: String,
    unit_label: String,
    today: NaiveDate,
) -> PaymentRiskScore {
    let timeliness =
        classify_timeliness(&snapshot.schedule_rows, |row| row.lease_id == lease.id);

    let outstanding_balance: i64 = snapshot
        .schedule_rows
        .iter()
        .filter(|row| row.lease_id == lease.id)
        .map(|row| row.outstanding())
        .sum();

    let mut score = 0u32;

    if timeliness.on_time_pct < 50.0 {
        score += 40;
    } else if timeliness.on_time_pct < 70.0 {
        score += 30;
    } else if timeliness.on_time_pct < 85.0 {
        score += 15;
    }

    if timeliness.avg_days_late > 10.0 {
        score += 30;
    } else if timeliness.avg_days_late > 5.0 {
        score += 20;
    } else if timeliness.avg_days_late > 2.0 {
        score += 10;
    }

    if outstanding_balance > 2 * lease.monthly_rent {
        score += 30;
    } else if outstanding_balance > lease.monthly_rent {
        score += 15;
    }

    let risk_score = score.min(100) as u8;
    let risk_level = RiskLevel::from_score(risk_score);

    let last_payment_on = last_payment_on(snapshot, lease);
    let next_payment_due = snapshot
        .schedule_rows
        .iter()
        .filter(|row| row.lease_id == lease.id && !row.is_paid && row.due_on >= today)
        .map(|row| row.due_on)
        .min();

    PaymentRiskScore {
        tenant_id: lease.tenant_id.clone(),
        tenant_name,
        unit_label,
        risk_score,
        risk_level,
        total_payments: timeliness.scheduled,
        late_payments: timeliness.late,
        on_time_percentage: timeliness.on_time_pct,
        average_days_late: timeliness.avg_days_late,
        outstanding_balance,
        last_payment_on,
        next_payment_due,
        recommendation: risk_level.recommendation(),
    }
}

/// Latest payment fact for the lease, preferring recorded rent payments
/// over settled schedule rows.
fn last_payment_on(snapshot: &OrgSnapshot, lease: &Lease) -> Option<NaiveDate> {
    snapshot
        .rent_payments
        .iter()
        .filter(|payment| payment.lease_id == lease.id)
        .map(|payment| payment.paid_on)
        .max()
        .or_else(|| {
            snapshot
                .schedule_rows
                .iter()
                .filter(|row| row.lease_id == lease.id && row.is_paid)
                .filter_map(|row| row.paid_on)
                .max()
        })
}
