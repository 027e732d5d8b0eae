// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregation tests against the bundled network and generated collections.

use network_insights::models::{ConnectionField, GrowthDelta, Insight, NetworkSnapshot};
use network_insights::services::aggregation::{
    breakdown_by, collapse_tail, compute_stats, growth_delta, insights, reach_tiers, OTHER_LABEL,
};

mod common;
use common::{connection, sample_snapshot};

/// Collection with `counts[i]` connections in industry `"Industry i"`.
fn with_group_sizes(counts: &[usize]) -> Vec<network_insights::models::Connection> {
    let mut id = 0;
    let mut connections = Vec::new();
    for (group, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            id += 1;
            let industry = format!("Industry {}", group);
            connections.push(connection(id, "Someone", "Engineer", "Acme", &industry));
        }
    }
    connections
}

#[test]
fn test_sample_network_stats() {
    let snapshot = sample_snapshot();
    let stats = compute_stats(&snapshot, 6).unwrap();

    let industries = &stats.industry_breakdown;
    assert_eq!(industries.get("Technology"), Some(45));
    assert_eq!(industries.get("Finance"), Some(20));
    assert_eq!(industries.get("Healthcare"), Some(15));
    assert_eq!(industries.get("Education"), Some(10));
    assert_eq!(industries.total(), 100);
    assert_eq!(stats.role_breakdown.total(), 100);

    assert_eq!(stats.reach_tiers.first_degree, snapshot.connections.len() as u64);
    assert_eq!(stats.reach_tiers.second_degree, 1825);
    assert_eq!(stats.reach_tiers.third_degree_plus, 8760);
    assert_eq!(stats.extended_reach, 20 + 1825 + 8760);
    assert_eq!(stats.new_connections, 3);
    assert_eq!(stats.growth_window_months, 6);

    let GrowthDelta::Change { percent } = stats.growth_delta else {
        panic!("expected a baseline");
    };
    assert!((percent - 17.647).abs() < 0.001);
}

#[test]
fn test_sample_network_insights() {
    let snapshot = sample_snapshot();
    let stats = compute_stats(&snapshot, 6).unwrap();

    let found = insights(&stats, &snapshot.recommendations);
    assert_eq!(
        found,
        vec![
            Insight::IndustryConcentration {
                industry: "Technology".to_string(),
                percent: 45,
            },
            Insight::WarmIntroductions { count: 3 },
        ]
    );
}

#[test]
fn test_breakdown_always_sums_to_100() {
    // Every split of up to 12 connections across up to 4 groups.
    for a in 0..=12usize {
        for b in 0..=(12 - a) {
            for c in 0..=(12 - a - b) {
                for d in 0..=(12 - a - b - c) {
                    let connections = with_group_sizes(&[a, b, c, d]);
                    let breakdown = breakdown_by(ConnectionField::Industry, &connections);

                    if connections.is_empty() {
                        assert!(breakdown.is_empty());
                        continue;
                    }
                    assert_eq!(breakdown.total(), 100, "split {:?}", [a, b, c, d]);

                    let groups = [a, b, c, d].iter().filter(|&&n| n > 0).count();
                    assert_eq!(breakdown.len(), groups);
                }
            }
        }
    }
}

#[test]
fn test_breakdown_is_deterministic() {
    let mut connections = with_group_sizes(&[3, 3, 3, 2]);
    let forward = breakdown_by(ConnectionField::Industry, &connections);

    connections.reverse();
    let reversed = breakdown_by(ConnectionField::Industry, &connections);

    assert_eq!(forward, reversed);
    assert_eq!(forward.get("Industry 0"), Some(28));
    assert_eq!(forward.get("Industry 3"), Some(18));
}

#[test]
fn test_role_breakdown() {
    let connections = vec![
        connection(1, "A", "Software Engineer", "Acme", "Technology"),
        connection(2, "B", "Software Engineer", "Acme", "Technology"),
        connection(3, "C", "Designer", "Acme", "Technology"),
        connection(4, "D", "Executive", "Acme", "Finance"),
    ];

    let roles = breakdown_by(ConnectionField::Role, &connections);
    assert_eq!(roles.get("Software Engineer"), Some(50));
    assert_eq!(roles.get("Designer"), Some(25));
    assert_eq!(roles.get("Executive"), Some(25));
}

#[test]
fn test_collapse_tail_on_sample_network() {
    let stats = compute_stats(&sample_snapshot(), 6).unwrap();
    let collapsed = collapse_tail(&stats.industry_breakdown, 3);

    assert_eq!(collapsed.get("Technology"), Some(45));
    assert_eq!(collapsed.get("Finance"), Some(20));
    assert_eq!(collapsed.get(OTHER_LABEL), Some(35));
    assert_eq!(collapsed.total(), 100);
}

#[test]
fn test_reach_shares() {
    let tiers = reach_tiers(214, 1825, 8760).unwrap();
    assert_eq!(tiers.shares(), [2.0, 16.9, 81.1]);
}

#[test]
fn test_negative_estimate_is_rejected_by_compute_stats() {
    let snapshot = NetworkSnapshot {
        connections: with_group_sizes(&[2]),
        second_degree_estimate: -5,
        ..Default::default()
    };

    assert!(compute_stats(&snapshot, 6).is_err());
}

#[test]
fn test_huge_reach_estimates_do_not_overflow() {
    let snapshot = NetworkSnapshot {
        connections: with_group_sizes(&[2]),
        second_degree_estimate: i64::MAX,
        third_degree_estimate: i64::MAX,
        ..Default::default()
    };

    let stats = compute_stats(&snapshot, 6).unwrap();
    assert_eq!(stats.extended_reach, u64::MAX);
}

#[test]
fn test_growth_from_zero_baseline() {
    assert_eq!(growth_delta(12, 0), GrowthDelta::NoBaseline);
    assert_eq!(growth_delta(0, 0), GrowthDelta::NoBaseline);
    assert_eq!(growth_delta(0, 5).percent_or_zero(), -100.0);
}
