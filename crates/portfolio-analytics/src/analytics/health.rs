use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::provider::OrgSnapshot;
use super::timeliness::classify_timeliness;

/// Fixed per-property unit assumption. The record store does not expose
/// real unit counts, so occupancy is measured against this estimate.
const UNITS_PER_PROPERTY: usize = 10;

/// Composite weights. The ROI term is capped so a high-margin month
/// cannot dominate the score.
const W_OCCUPANCY: f64 = 0.30;
const W_COLLECTION: f64 = 0.35;
const W_MAINTENANCE: f64 = 0.15;
const ROI_POINTS_CAP: f64 = 20.0;

const COLLECTION_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthLevel {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            75..=89 => Self::Good,
            60..=74 => Self::Fair,
            40..=59 => Self::Poor,
            _ => Self::Critical,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Critical => "Critical",
        }
    }
}

/// Raw counts feeding the component rates, exposed so callers can audit
/// the composite instead of trusting it blindly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthMetrics {
    pub total_properties: usize,
    pub total_units: usize,
    pub occupied_units: usize,
    pub scheduled_due_30d: usize,
    pub paid_on_time_30d: usize,
    pub late_payments_30d: usize,
    pub monthly_income: i64,
    pub expenses_30d: i64,
    pub maintenance_requests: usize,
    pub assigned_maintenance: usize,
    pub avg_maintenance_response_days: f64,
}

/// Aggregate portfolio health for one organization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioHealth {
    pub health_score: u8,
    pub health_level: HealthLevel,
    pub occupancy_rate: f64,
    pub collection_rate: f64,
    pub maintenance_response_rate: f64,
    pub roi_percentage: f64,
    pub recommendations: Vec<String>,
    pub metrics: HealthMetrics,
}

/// Score the whole snapshot in a single pass; no per-tenant loop.
pub fn score_health(snapshot: &OrgSnapshot, today: NaiveDate) -> PortfolioHealth {
    let window_start = today - Duration::days(COLLECTION_WINDOW_DAYS);

    let total_properties = snapshot.properties.len();
    let total_units = total_properties * UNITS_PER_PROPERTY;
    let occupied_units = snapshot
        .leases
        .iter()
        .filter(|lease| lease.is_active_on(today))
        .count();

    let occupancy_rate = if total_units == 0 {
        0.0
    } else {
        occupied_units as f64 / total_units as f64 * 100.0
    };

    // Org-wide trailing-30-day window, independent of the per-tenant
    // full-history figures in the risk scorer.
    let window = classify_timeliness(&snapshot.schedule_rows, |row| {
        row.due_on >= window_start && row.due_on <= today
    });
    let collection_rate = if window.scheduled == 0 {
        100.0
    } else {
        window.paid_on_time as f64 / window.scheduled as f64 * 100.0
    };

    let monthly_income: i64 = snapshot
        .leases
        .iter()
        .filter(|lease| lease.is_active_on(today))
        .map(|lease| lease.monthly_rent)
        .sum();
    let expenses_30d: i64 = snapshot
        .expenses
        .iter()
        .filter(|expense| expense.incurred_on >= window_start && expense.incurred_on <= today)
        .map(|expense| expense.amount)
        .sum();
    let roi_percentage = if monthly_income == 0 {
        0.0
    } else {
        (monthly_income - expenses_30d) as f64 / monthly_income as f64 * 100.0
    };

    let response_days: Vec<i64> = snapshot
        .maintenance_requests
        .iter()
        .filter_map(|request| request.response_days())
        .collect();
    let assigned_maintenance = response_days.len();
    let avg_maintenance_response_days = if assigned_maintenance == 0 {
        0.0
    } else {
        response_days.iter().sum::<i64>() as f64 / assigned_maintenance as f64
    };
    let maintenance_response_rate = maintenance_response_step(avg_maintenance_response_days);

    let composite = W_OCCUPANCY * occupancy_rate
        + W_COLLECTION * collection_rate
        + W_MAINTENANCE * maintenance_response_rate
        + (2.0 * roi_percentage).min(ROI_POINTS_CAP);
    let health_score = composite.clamp(0.0, 100.0).round() as u8;
    let health_level = HealthLevel::from_score(health_score);

    let recommendations = build_recommendations(
        occupancy_rate,
        collection_rate,
        avg_maintenance_response_days,
        roi_percentage,
        window.late,
        window.scheduled,
    );

    PortfolioHealth {
        health_score,
        health_level,
        occupancy_rate,
        collection_rate,
        maintenance_response_rate,
        roi_percentage,
        recommendations,
        metrics: HealthMetrics {
            total_properties,
            total_units,
            occupied_units,
            scheduled_due_30d: window.scheduled,
            paid_on_time_30d: window.paid_on_time,
            late_payments_30d: window.late,
            monthly_income,
            expenses_30d,
            maintenance_requests: snapshot.maintenance_requests.len(),
            assigned_maintenance,
            avg_maintenance_response_days,
        },
    }
}

/// Step function, not a curve: under two days of average response earns
/// 95, under five 75, anything slower 50.
fn maintenance_response_step(avg_days: f64) -> f64 {
    if avg_days < 2.0 {
        95.0
    } else if avg_days < 5.0 {
        75.0
    } else {
        50.0
    }
}

/// Five independent conditions checked in a fixed order; none suppresses
/// another. When none fire the portfolio gets a single all-clear line.
fn build_recommendations(
    occupancy_rate: f64,
    collection_rate: f64,
    avg_response_days: f64,
    roi_percentage: f64,
    late_payments: usize,
    scheduled_due: usize,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if occupancy_rate < 80.0 {
        recommendations.push(
            "Occupancy is below 80%. Prioritize marketing vacant units and review pricing against comparable listings."
                .to_string(),
        );
    }
    if collection_rate < 90.0 {
        recommendations.push(
            "Collections fell below 90% over the last 30 days. Tighten follow-up on overdue balances."
                .to_string(),
        );
    }
    if avg_response_days > 3.0 {
        recommendations.push(
            "Maintenance assignment is averaging more than 3 days. Rebalance vendor workloads to restore responsiveness."
                .to_string(),
        );
    }
    if roi_percentage < 10.0 {
        recommendations.push(
            "Portfolio ROI is under 10%. Audit operating expenses and review rents against market."
                .to_string(),
        );
    }
    if late_payments as f64 > 0.2 * scheduled_due as f64 {
        recommendations.push(
            "More than 20% of payments due in the last 30 days were late. Start payment-plan outreach for repeat offenders."
                .to_string(),
        );
    }

    if recommendations.is_empty() {
        recommendations.push(
            "Portfolio is performing well across occupancy, collections, and maintenance."
                .to_string(),
        );
    }

    recommendations
}
