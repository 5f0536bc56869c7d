use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::warn;

use crate::config::AnalyticsConfig;

use super::domain::OrgId;
use super::health::{score_health, PortfolioHealth};
use super::provider::{AdvisorError, ProviderError, RentAdvisor, RentSuggestion, SnapshotProvider};
use super::renewals::{renewal_candidates, RenewalCandidate, RenewalReport};
use super::risk::{score_portfolio, PaymentRiskReport};

/// Stateless facade composing the three scorers over the snapshot and
/// rent-advisor seams. Every call is a full recompute against a fresh
/// snapshot; nothing is cached or retried here.
pub struct AnalyticsService<P, A> {
    provider: Arc<P>,
    advisor: Arc<A>,
    config: AnalyticsConfig,
}

impl<P, A> AnalyticsService<P, A>
where
    P: SnapshotProvider + 'static,
    A: RentAdvisor + 'static,
{
    pub fn new(provider: Arc<P>, advisor: Arc<A>, config: AnalyticsConfig) -> Self {
        Self {
            provider,
            advisor,
            config,
        }
    }

    /// Payment-risk scores for every resolvable active lease.
    pub async fn payment_risk(
        &self,
        org_id: &OrgId,
        today: NaiveDate,
    ) -> Result<PaymentRiskReport, AnalyticsError> {
        let snapshot = self.provider.org_snapshot(org_id).await?;
        let report = score_portfolio(&snapshot, today);
        if report.skipped_leases > 0 {
            warn!(
                org = %org_id.0,
                skipped = report.skipped_leases,
                "payment-risk scoring skipped leases with unresolved joins"
            );
        }
        Ok(report)
    }

    /// Aggregate portfolio health for the organization.
    pub async fn portfolio_health(
        &self,
        org_id: &OrgId,
        today: NaiveDate,
    ) -> Result<PortfolioHealth, AnalyticsError> {
        let snapshot = self.provider.org_snapshot(org_id).await?;
        Ok(score_health(&snapshot, today))
    }

    /// Ranked renewal opportunities for leases expiring within the
    /// horizon (the configured default when none is supplied).
    pub async fn renewal_opportunities(
        &self,
        org_id: &OrgId,
        horizon_days: Option<u16>,
        today: NaiveDate,
    ) -> Result<RenewalReport, AnalyticsError> {
        let horizon_days = horizon_days.unwrap_or(self.config.renewal_horizon_days);
        let snapshot = self.provider.org_snapshot(org_id).await?;
        let (candidates, skipped_leases) = renewal_candidates(&snapshot, horizon_days, today);
        if skipped_leases > 0 {
            warn!(
                org = %org_id.0,
                skipped = skipped_leases,
                "renewal ranking skipped leases with unresolved joins"
            );
        }

        let suggestions = self.suggest_rents(org_id, &candidates).await?;
        let opportunities = candidates
            .into_iter()
            .zip(suggestions)
            .map(|(candidate, suggestion)| {
                candidate.into_opportunity(suggestion.map(|s| s.recommended_rent))
            })
            .collect();

        Ok(RenewalReport {
            opportunities,
            skipped_leases,
        })
    }

    /// All three analyses computed concurrently against the same
    /// organization, the way dashboard callers consume them.
    pub async fn overview(
        &self,
        org_id: &OrgId,
        horizon_days: Option<u16>,
        today: NaiveDate,
    ) -> Result<PortfolioOverview, AnalyticsError> {
        let (payment_risk, health, renewals) = tokio::join!(
            self.payment_risk(org_id, today),
            self.portfolio_health(org_id, today),
            self.renewal_opportunities(org_id, horizon_days, today),
        );

        Ok(PortfolioOverview {
            payment_risk: payment_risk?,
            health: health?,
            renewals: renewals?,
        })
    }

    /// One advisor call per candidate, fanned out in bounded batches.
    /// Results are index-tagged so output order never depends on
    /// completion order. An advisor error fails the whole call; only
    /// `Ok(None)` means "no recommendation".
    async fn suggest_rents(
        &self,
        org_id: &OrgId,
        candidates: &[RenewalCandidate],
    ) -> Result<Vec<Option<RentSuggestion>>, AnalyticsError> {
        let concurrency = self.config.advisor_concurrency.max(1);
        let mut suggestions: Vec<Option<RentSuggestion>> = vec![None; candidates.len()];

        for (chunk_index, chunk) in candidates.chunks(concurrency).enumerate() {
            let mut batch = JoinSet::new();
            for (offset, candidate) in chunk.iter().enumerate() {
                let advisor = Arc::clone(&self.advisor);
                let property_id = candidate.property_id.clone();
                let org_id = org_id.clone();
                let index = chunk_index * concurrency + offset;
                batch.spawn(async move {
                    let suggestion = advisor.suggest_rent(&property_id, &org_id).await;
                    (index, suggestion)
                });
            }

            while let Some(joined) = batch.join_next().await {
                let (index, suggestion) =
                    joined.map_err(|err| AnalyticsError::AdvisorTask(err.to_string()))?;
                suggestions[index] = suggestion?;
            }
        }

        Ok(suggestions)
    }
}

/// Composite of the three analyses for one organization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioOverview {
    pub payment_risk: PaymentRiskReport,
    pub health: PortfolioHealth,
    pub renewals: RenewalReport,
}

/// Error raised by the analytics service. Upstream failures propagate;
/// the only defined substitution is the advisor's explicit "no
/// recommendation" answer, handled in the ranker itself.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Advisor(#[from] AdvisorError),
    #[error("rent advisor task aborted: {0}")]
    AdvisorTask(String),
}
