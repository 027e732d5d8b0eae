// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregation over a connection collection.
//!
//! Everything here is pure and deterministic. Malformed input is returned as
//! an explicit error rather than producing quietly wrong percentages.

use std::collections::{BTreeMap, HashSet};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    Breakdown, Connection, ConnectionField, ConnectionStats, GrowthDelta, Insight,
    NetworkSnapshot, ReachTiers,
};

/// Label for groups merged by [`collapse_tail`].
pub const OTHER_LABEL: &str = "Other";

/// Top-industry share at which the network counts as concentrated.
const CONCENTRATION_THRESHOLD_PERCENT: u32 = 40;

/// Mutual connections needed for a recommendation to count as a warm intro.
const WARM_INTRO_MIN_MUTUALS: u32 = 10;

/// Percentage share of each distinct `field` value.
///
/// Shares are rounded to whole percents; the rounding remainder goes to the
/// largest group (ties broken by label) so the total is exactly 100.
/// An empty collection yields an empty breakdown.
pub fn breakdown_by(field: ConnectionField, connections: &[Connection]) -> Breakdown {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for connection in connections {
        *counts.entry(field.value(connection).to_string()).or_insert(0) += 1;
    }
    shares_from_counts(&counts)
}

fn shares_from_counts(counts: &BTreeMap<String, u64>) -> Breakdown {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return Breakdown::default();
    }

    // Round half up in integer arithmetic.
    let mut shares: BTreeMap<String, i64> = counts
        .iter()
        .map(|(label, &n)| (label.clone(), ((n * 200 + total) / (2 * total)) as i64))
        .collect();

    let mut remainder = 100 - shares.values().sum::<i64>();

    let mut by_size: Vec<(&String, u64)> = counts.iter().map(|(l, &n)| (l, n)).collect();
    by_size.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    for (label, _) in by_size {
        if remainder == 0 {
            break;
        }
        if let Some(share) = shares.get_mut(label) {
            // A positive remainder always fits in the largest group. A negative
            // one only spills over when there are dozens of tiny groups.
            let adjusted = (*share + remainder).max(0);
            remainder -= adjusted - *share;
            *share = adjusted;
        }
    }

    Breakdown::new(
        shares
            .into_iter()
            .map(|(label, share)| (label, share as u32))
            .collect(),
    )
}

/// Keep the `max_groups - 1` largest groups and merge the rest into `Other`.
///
/// The 100 total is preserved. Breakdowns that already fit are returned as-is.
pub fn collapse_tail(breakdown: &Breakdown, max_groups: usize) -> Breakdown {
    if breakdown.len() <= max_groups.max(1) {
        return breakdown.clone();
    }

    let keep = max_groups.saturating_sub(1);
    let mut collapsed: BTreeMap<String, u32> = BTreeMap::new();
    let mut other = 0;

    for (i, (label, share)) in breakdown.ranked().into_iter().enumerate() {
        if i < keep && label != OTHER_LABEL {
            collapsed.insert(label.to_string(), share);
        } else {
            other += share;
        }
    }
    *collapsed.entry(OTHER_LABEL.to_string()).or_insert(0) += other;

    Breakdown::new(collapsed)
}

/// Build the reach triple, rejecting negative counts.
pub fn reach_tiers(
    direct_connections: i64,
    second_degree_estimate: i64,
    third_degree_estimate: i64,
) -> Result<ReachTiers> {
    let check = |name: &str, value: i64| -> Result<u64> {
        u64::try_from(value)
            .map_err(|_| AppError::InvalidReachData(format!("{} must be >= 0, got {}", name, value)))
    };

    Ok(ReachTiers {
        first_degree: check("direct connections", direct_connections)?,
        second_degree: check("second-degree estimate", second_degree_estimate)?,
        third_degree_plus: check("third-degree estimate", third_degree_estimate)?,
    })
}

/// Signed percentage change from `past_count` to `current_count`.
///
/// A zero baseline returns [`GrowthDelta::NoBaseline`].
pub fn growth_delta(current_count: u64, past_count: u64) -> GrowthDelta {
    if past_count == 0 {
        return GrowthDelta::NoBaseline;
    }
    let percent = (current_count as f64 - past_count as f64) * 100.0 / past_count as f64;
    GrowthDelta::Change { percent }
}

/// Check field constraints and id uniqueness for a collection.
pub fn validate_connections(connections: &[Connection]) -> Result<()> {
    let mut seen = HashSet::with_capacity(connections.len());
    for connection in connections {
        connection.validate().map_err(|e| {
            AppError::InvalidConnectionData(format!("connection {}: {}", connection.id, e))
        })?;
        if !seen.insert(connection.id) {
            return Err(AppError::InvalidConnectionData(format!(
                "duplicate connection id {}",
                connection.id
            )));
        }
    }
    Ok(())
}

/// Assemble the full stats view for a snapshot.
pub fn compute_stats(snapshot: &NetworkSnapshot, growth_window_months: u32) -> Result<ConnectionStats> {
    validate_connections(&snapshot.connections)?;

    let direct = snapshot.connections.len() as u64;
    let reach = reach_tiers(
        direct as i64,
        snapshot.second_degree_estimate,
        snapshot.third_degree_estimate,
    )?;

    Ok(ConnectionStats {
        industry_breakdown: breakdown_by(ConnectionField::Industry, &snapshot.connections),
        role_breakdown: breakdown_by(ConnectionField::Role, &snapshot.connections),
        extended_reach: reach.total(),
        reach_tiers: reach,
        growth_delta: growth_delta(direct, snapshot.connections_at_window_start),
        new_connections: direct as i64 - snapshot.connections_at_window_start as i64,
        growth_window_months,
    })
}

/// Observations worth surfacing next to the stats.
pub fn insights(stats: &ConnectionStats, recommendations: &[Connection]) -> Vec<Insight> {
    let mut found = Vec::new();

    if let Some((industry, percent)) = stats.industry_breakdown.top() {
        if percent >= CONCENTRATION_THRESHOLD_PERCENT && industry != OTHER_LABEL {
            found.push(Insight::IndustryConcentration {
                industry: industry.to_string(),
                percent,
            });
        }
    }

    let warm = recommendations
        .iter()
        .filter(|c| c.mutual_connections >= WARM_INTRO_MIN_MUTUALS)
        .count();
    if warm > 0 {
        found.push(Insight::WarmIntroductions { count: warm });
    }

    found
}
