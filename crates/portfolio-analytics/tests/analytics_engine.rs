use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use portfolio_analytics::analytics::{
    AdvisorError, AnalyticsService, Expense, Lease, LeaseId, LeaseStatus, MaintenanceRequest,
    MaintenanceStatus, OrgId, OrgSnapshot, PaymentHistoryBand, Property, PropertyId, ProviderError,
    RentAdvisor, RentSuggestion, RenewalPriority, RiskLevel, ScheduleRow, SnapshotProvider,
    Tenant, TenantId,
};
use portfolio_analytics::config::AnalyticsConfig;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn today() -> NaiveDate {
    date(2026, 8, 6)
}

struct FixtureProvider {
    snapshot: OrgSnapshot,
}

impl SnapshotProvider for FixtureProvider {
    async fn org_snapshot(&self, org_id: &OrgId) -> Result<OrgSnapshot, ProviderError> {
        if org_id.0 == "org-demo" {
            Ok(self.snapshot.clone())
        } else {
            Err(ProviderError::UnknownOrganization(org_id.0.clone()))
        }
    }
}

struct TableAdvisor {
    rents: HashMap<String, i64>,
}

impl RentAdvisor for TableAdvisor {
    async fn suggest_rent(
        &self,
        property_id: &PropertyId,
        _org_id: &OrgId,
    ) -> Result<Option<RentSuggestion>, AdvisorError> {
        Ok(self.rents.get(&property_id.0).map(|rent| RentSuggestion {
            recommended_rent: *rent,
            adjustment_percentage: 5.0,
        }))
    }
}

fn lease(
    id: &str,
    tenant_id: &str,
    property_id: &str,
    rent: i64,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
) -> Lease {
    Lease {
        id: LeaseId(id.to_string()),
        tenant_id: TenantId(tenant_id.to_string()),
        property_id: PropertyId(property_id.to_string()),
        monthly_rent: rent,
        starts_on,
        ends_on,
        status: LeaseStatus::Active,
    }
}

fn settled_row(lease_id: &str, due_on: NaiveDate, days_late: i64, amount: i64) -> ScheduleRow {
    ScheduleRow {
        lease_id: LeaseId(lease_id.to_string()),
        due_on,
        amount_due: amount,
        is_paid: true,
        paid_on: Some(due_on + Duration::days(days_late)),
        amount_paid: Some(amount),
    }
}

fn open_row(lease_id: &str, due_on: NaiveDate, amount: i64) -> ScheduleRow {
    ScheduleRow {
        lease_id: LeaseId(lease_id.to_string()),
        due_on,
        amount_due: amount,
        is_paid: false,
        paid_on: None,
        amount_paid: None,
    }
}

/// Three-property portfolio with one clean tenant, one chronically late
/// tenant, and one long-tenured tenant expiring inside the horizon.
fn demo_snapshot() -> OrgSnapshot {
    let mut snapshot = OrgSnapshot {
        properties: vec![
            Property {
                id: PropertyId("prop-1".to_string()),
                name: "Maple Court".to_string(),
            },
            Property {
                id: PropertyId("prop-2".to_string()),
                name: "Birch Row".to_string(),
            },
            Property {
                id: PropertyId("prop-3".to_string()),
                name: "Cedar Yard".to_string(),
            },
        ],
        tenants: vec![
            Tenant {
                id: TenantId("ten-1".to_string()),
                full_name: "Alice Romero".to_string(),
            },
            Tenant {
                id: TenantId("ten-2".to_string()),
                full_name: "Marcus Webb".to_string(),
            },
            Tenant {
                id: TenantId("ten-3".to_string()),
                full_name: "Priya Natarajan".to_string(),
            },
        ],
        ..OrgSnapshot::default()
    };

    snapshot.leases.push(lease(
        "lease-1",
        "ten-1",
        "prop-1",
        120_000,
        date(2025, 1, 1),
        date(2027, 1, 1),
    ));
    for month in 0..12i64 {
        snapshot.schedule_rows.push(settled_row(
            "lease-1",
            date(2025, 8, 1) + Duration::days(30 * month),
            0,
            120_000,
        ));
    }

    snapshot.leases.push(lease(
        "lease-2",
        "ten-2",
        "prop-2",
        100_000,
        date(2025, 1, 1),
        date(2026, 12, 1),
    ));
    for month in 0..12i64 {
        snapshot.schedule_rows.push(settled_row(
            "lease-2",
            date(2025, 8, 1) + Duration::days(30 * month),
            12,
            100_000,
        ));
    }
    snapshot
        .schedule_rows
        .push(open_row("lease-2", date(2026, 6, 1), 100_000));
    snapshot
        .schedule_rows
        .push(open_row("lease-2", date(2026, 7, 1), 100_000));
    snapshot
        .schedule_rows
        .push(open_row("lease-2", date(2026, 9, 1), 100_000));

    snapshot.leases.push(lease(
        "lease-3",
        "ten-3",
        "prop-3",
        150_000,
        today() - Duration::days(3 * 365),
        today() + Duration::days(25),
    ));
    for month in 0..10i64 {
        snapshot.schedule_rows.push(settled_row(
            "lease-3",
            today() - Duration::days(320 - 30 * month),
            0,
            150_000,
        ));
    }

    snapshot.maintenance_requests.push(MaintenanceRequest {
        property_id: PropertyId("prop-2".to_string()),
        tenant_id: Some(TenantId("ten-2".to_string())),
        status: MaintenanceStatus::InProgress,
        requested_on: today() - Duration::days(12),
        assigned_on: Some(today() - Duration::days(11)),
    });
    snapshot.expenses.push(Expense {
        amount: 80_000,
        incurred_on: today() - Duration::days(6),
    });

    snapshot
}

fn demo_service() -> AnalyticsService<FixtureProvider, TableAdvisor> {
    let mut rents = HashMap::new();
    rents.insert("prop-3".to_string(), 158_000i64);
    AnalyticsService::new(
        Arc::new(FixtureProvider {
            snapshot: demo_snapshot(),
        }),
        Arc::new(TableAdvisor { rents }),
        AnalyticsConfig::default(),
    )
}

#[tokio::test]
async fn risk_scores_stay_in_range_and_match_their_bands() {
    let service = demo_service();
    let report = service
        .payment_risk(&OrgId("org-demo".to_string()), today())
        .await
        .expect("risk report computes");

    assert_eq!(report.scores.len(), 3);
    for score in &report.scores {
        assert!(score.risk_score <= 100);
        assert_eq!(score.risk_level, RiskLevel::from_score(score.risk_score));
        assert_eq!(score.recommendation, score.risk_level.recommendation());
    }
    assert!(report
        .scores
        .windows(2)
        .all(|pair| pair[0].risk_score >= pair[1].risk_score));

    let worst = &report.scores[0];
    assert_eq!(worst.tenant_name, "Marcus Webb");
    // 12 of 15 rows late (20% on time), 12-day average lateness, 3 open
    // rows worth 3x rent: +40 +30 +30 = 100.
    assert_eq!(worst.risk_score, 100);
    assert_eq!(worst.risk_level, RiskLevel::Critical);
}

#[tokio::test]
async fn health_report_is_bounded_and_order_independent() {
    let service = demo_service();
    let org = OrgId("org-demo".to_string());

    let health = service
        .portfolio_health(&org, today())
        .await
        .expect("health computes");

    assert!(health.health_score <= 100);
    assert_eq!(health.metrics.total_units, 30);
    assert_eq!(health.metrics.occupied_units, 3);
    assert_eq!(health.occupancy_rate, 10.0);
    assert!(!health.recommendations.is_empty());

    let mut reordered = demo_snapshot();
    reordered.schedule_rows.reverse();
    reordered.leases.reverse();
    let reordered_health = portfolio_analytics::analytics::health::score_health(
        &reordered,
        today(),
    );
    assert_eq!(reordered_health, health);
}

#[tokio::test]
async fn renewal_ranking_uses_the_advisor_and_stays_sorted() {
    let service = demo_service();
    let report = service
        .renewal_opportunities(&OrgId("org-demo".to_string()), Some(90), today())
        .await
        .expect("renewals compute");

    assert!(report
        .opportunities
        .windows(2)
        .all(|pair| pair[0].ends_on <= pair[1].ends_on));

    let best = report
        .opportunities
        .iter()
        .find(|o| o.lease_id.0 == "lease-3")
        .expect("expiring lease ranked");
    assert_eq!(best.priority, RenewalPriority::Immediate);
    assert_eq!(best.renewal_probability, 95);
    assert_eq!(best.tenant_score.payment_history, PaymentHistoryBand::Excellent);
    assert_eq!(best.suggested_rent, 158_000);
    assert_eq!(best.property_name, "Cedar Yard");

    for opportunity in &report.opportunities {
        assert!(opportunity.renewal_probability >= 20);
        assert!(opportunity.renewal_probability <= 95);
    }
}

#[tokio::test]
async fn repeated_overviews_serialize_identically() {
    let service = demo_service();
    let org = OrgId("org-demo".to_string());

    let first = service
        .overview(&org, Some(90), today())
        .await
        .expect("overview computes");
    let second = service
        .overview(&org, Some(90), today())
        .await
        .expect("overview computes");

    assert_eq!(
        serde_json::to_string(&first).expect("serializes"),
        serde_json::to_string(&second).expect("serializes"),
    );
}
