//! Derived network statistics.
//!
//! Nothing here is persisted: every value is recomputed from the current
//! connection collection on each request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentage share per group label. Values sum to 100 unless empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Breakdown(BTreeMap<String, u32>);

impl Breakdown {
    pub fn new(shares: BTreeMap<String, u32>) -> Self {
        Self(shares)
    }

    pub fn get(&self, label: &str) -> Option<u32> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all shares (100 for any non-empty breakdown).
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Groups ordered by share descending, then label ascending.
    pub fn ranked(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> =
            self.0.iter().map(|(k, &v)| (k.as_str(), v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Largest group, if any.
    pub fn top(&self) -> Option<(&str, u32)> {
        self.ranked().into_iter().next()
    }
}

/// First, second and third-plus degree reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachTiers {
    pub first_degree: u64,
    pub second_degree: u64,
    pub third_degree_plus: u64,
}

impl ReachTiers {
    /// Extended reach across all tiers, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.first_degree
            .saturating_add(self.second_degree)
            .saturating_add(self.third_degree_plus)
    }

    /// Share of extended reach per tier, in percent with one decimal.
    pub fn shares(&self) -> [f64; 3] {
        let total = self.total();
        if total == 0 {
            return [0.0; 3];
        }
        let share = |n: u64| (n as f64 * 1000.0 / total as f64).round() / 10.0;
        [
            share(self.first_degree),
            share(self.second_degree),
            share(self.third_degree_plus),
        ]
    }
}

/// Growth over the trailing window.
///
/// A zero baseline has no meaningful percentage; it is reported as
/// `NoBaseline` instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthDelta {
    Change { percent: f64 },
    NoBaseline,
}

impl GrowthDelta {
    /// Percentage change, reading the sentinel as 0.
    pub fn percent_or_zero(&self) -> f64 {
        match self {
            GrowthDelta::Change { percent } => *percent,
            GrowthDelta::NoBaseline => 0.0,
        }
    }
}

/// Aggregated view of a user's network.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStats {
    pub industry_breakdown: Breakdown,
    pub role_breakdown: Breakdown,
    pub reach_tiers: ReachTiers,
    /// Extended reach (sum of all tiers)
    pub extended_reach: u64,
    pub growth_delta: GrowthDelta,
    /// Net new direct connections over the window (may be negative)
    pub new_connections: i64,
    pub growth_window_months: u32,
}

/// Actionable observation derived from the stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    /// One industry dominates the network.
    IndustryConcentration { industry: String, percent: u32 },
    /// Recommendations that share many mutual connections.
    WarmIntroductions { count: usize },
}
