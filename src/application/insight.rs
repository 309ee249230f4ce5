use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

use crate::domain::{GlobalStats, format_cents};

/// Shown whenever no provider is configured or the provider fails.
pub const FALLBACK_INSIGHT: &str =
    "Collect outstanding dues before departure and keep an eye on transport and hotel costs.";

/// Source of the short advisory text on the dashboard.
///
/// Implementations may call out to a remote text-generation service. Nothing in
/// the ledger waits on them: a failure only swaps the text for [`FALLBACK_INSIGHT`].
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, stats: &GlobalStats) -> Result<String>;
}

/// Builds the text locally from the figures, no network involved.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalInsight;

#[async_trait]
impl InsightProvider for LocalInsight {
    async fn generate(&self, stats: &GlobalStats) -> Result<String> {
        if stats.total_tours == 0 {
            return Ok("No tours yet. Create your first tour to start tracking bookings.".into());
        }

        let verdict = if stats.net_profit >= 0 {
            "in profit"
        } else {
            "running at a loss"
        };
        Ok(format!(
            "{} tour(s) with {} guest(s): income {}, expenses {}, {} by {}.",
            stats.total_tours,
            stats.total_guests,
            format_cents(stats.total_income),
            format_cents(stats.total_expenses),
            verdict,
            format_cents(stats.net_profit.abs()),
        ))
    }
}

/// Ask the provider for dashboard text, falling back to the static message.
pub async fn dashboard_insight(
    provider: Option<&dyn InsightProvider>,
    stats: &GlobalStats,
) -> String {
    let Some(provider) = provider else {
        return FALLBACK_INSIGHT.to_string();
    };

    match provider.generate(stats).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!("insight provider returned empty text, using fallback");
            FALLBACK_INSIGHT.to_string()
        }
        Err(e) => {
            warn!(error = %e, "insight provider failed, using fallback");
            FALLBACK_INSIGHT.to_string()
        }
    }
}
