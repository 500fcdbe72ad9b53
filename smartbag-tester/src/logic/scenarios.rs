use anyhow::{Result, bail, ensure};
use smartbag_engine::{
    BagPolicy, BaggingSession, Category, PlacementReason, RuleKind, SharedSession, base_name,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use super::plan::{CatalogPlan, RunSummary, ScenarioPlan};

const SHARED_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: ScenarioPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, plan: ScenarioPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

fn all_items_bagged(summary: &RunSummary) -> Result<()> {
    let expected = summary.config.total_items;
    ensure!(
        summary.events.len() == expected,
        "expected {expected} placements, saw {}",
        summary.events.len()
    );
    let placed: usize = summary.finished().bags().iter().map(|bag| bag.len()).sum();
    ensure!(
        placed == expected,
        "bags hold {placed} items but {expected} were scanned"
    );
    ensure!(
        summary.finished().is_complete(),
        "session not complete after exhaustion"
    );
    Ok(())
}

fn cursor_is_monotonic(summary: &RunSummary) -> Result<()> {
    for (index, session) in summary.sessions.iter().enumerate() {
        ensure!(
            session.current_item_index() == index,
            "cursor at {} after {index} steps",
            session.current_item_index()
        );
    }
    for (index, event) in summary.events.iter().enumerate() {
        ensure!(event.seq == index, "event {index} carries seq {}", event.seq);
    }
    Ok(())
}

fn capacity_respected(summary: &RunSummary) -> Result<()> {
    let cap = summary.config.items_per_bag;
    for session in &summary.sessions {
        for bag in session.bags() {
            ensure!(
                bag.len() <= cap,
                "{} holds {} items (cap {cap})",
                bag.name,
                bag.len()
            );
        }
    }
    Ok(())
}

fn duplicates_capped(summary: &RunSummary) -> Result<()> {
    let cap = summary.config.duplicate_cap;
    for bag in summary.finished().bags() {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in bag.items() {
            *counts.entry(base_name(&item.name)).or_default() += 1;
        }
        if let Some((name, count)) = counts.into_iter().find(|(_, count)| *count > cap) {
            bail!("{} holds {count} x {name} (cap {cap})", bag.name);
        }
    }
    Ok(())
}

fn chemicals_isolated(summary: &RunSummary) -> Result<()> {
    for session in &summary.sessions {
        for bag in session.bags() {
            let chemicals = bag.items().iter().filter(|item| item.is_chemical()).count();
            ensure!(
                chemicals == 0 || chemicals == bag.len(),
                "{} mixes {chemicals} chemical(s) with {} food item(s)",
                bag.name,
                bag.len() - chemicals
            );
        }
    }
    Ok(())
}

/// A cold item joins an existing cold bag whenever one can take it.
fn cold_items_grouped(summary: &RunSummary) -> Result<()> {
    for (event, before) in summary.events.iter().zip(&summary.sessions) {
        let Some(item) = before.peek_next() else {
            bail!("no item behind event {}", event.seq);
        };
        if !item.has_category(Category::Cold) || item.is_chemical() {
            continue;
        }
        let policy = BagPolicy::new(before.limits());
        let cold_bag_available = before.bags().iter().any(|bag| {
            bag.contains_category(Category::Cold) && policy.is_base_eligible(item, bag)
        });
        if cold_bag_available {
            ensure!(
                event.reason == PlacementReason::Rule(RuleKind::Cold),
                "{} skipped an open cold bag ({:?})",
                event.item_name,
                event.reason
            );
            ensure!(
                before.bags()[event.bag_index].contains_category(Category::Cold),
                "{} placed in {} which holds nothing cold",
                event.item_name,
                event.bag_name
            );
        }
    }
    Ok(())
}

fn new_bags_are_appended(summary: &RunSummary) -> Result<()> {
    for (event, before) in summary.events.iter().zip(&summary.sessions) {
        let count = before.bags().len();
        if event.opened_new_bag {
            ensure!(
                event.bag_index == count,
                "{} opened at index {} with {count} bags present",
                event.bag_name,
                event.bag_index
            );
            ensure!(
                event.bag_name == format!("Bag {}", count + 1),
                "new bag named {}",
                event.bag_name
            );
            ensure!(
                event.reason == PlacementReason::NewBag,
                "new bag opened with reason {:?}",
                event.reason
            );
        } else {
            ensure!(
                event.bag_index < count,
                "{} placed past the end of the bag list",
                event.item_name
            );
        }
    }
    Ok(())
}

/// Repeats of one item fill bags one at a time up to the tighter limit.
fn single_item_spread(summary: &RunSummary) -> Result<()> {
    ensure!(
        summary.catalog.len() == 1,
        "expected a single-item catalog, got {}",
        summary.catalog.len()
    );
    let per_bag = summary
        .config
        .duplicate_cap
        .min(summary.config.items_per_bag);
    let needed = summary.config.total_items.div_ceil(per_bag);
    let expected = needed.max(summary.config.initial_bags);
    ensure!(
        summary.bag_count() == expected,
        "{} bags used, expected {expected}",
        summary.bag_count()
    );
    Ok(())
}

fn replay_is_identical(summary: &RunSummary) -> Result<()> {
    let (replayed, events) = summary.initial().run_to_completion();
    ensure!(
        &replayed == summary.finished(),
        "replay for seed {} diverged",
        summary.seed
    );
    ensure!(events == summary.events, "replayed events differ");
    Ok(())
}

fn reset_restarts_session(summary: &RunSummary) -> Result<()> {
    ensure!(
        &summary.finished().reset() == summary.initial(),
        "reset did not restore the starting session"
    );
    Ok(())
}

fn resume_after_serialization(summary: &RunSummary) -> Result<()> {
    let midpoint = &summary.sessions[summary.sessions.len() / 2];
    let json = serde_json::to_string(midpoint)?;
    let restored: BaggingSession = serde_json::from_str(&json)?;
    ensure!(&restored == midpoint, "session changed across serialization");
    let (finished, _) = restored.run_to_completion();
    ensure!(
        &finished == summary.finished(),
        "resumed session finished differently"
    );
    Ok(())
}

fn shared_session_agrees(summary: &RunSummary) -> Result<()> {
    let shared = Arc::new(SharedSession::new(summary.initial().clone()));
    let handles: Vec<_> = (0..SHARED_WORKERS)
        .map(|_| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let mut seqs = Vec::new();
                while let Ok(event) = shared.place_next() {
                    seqs.push(event.seq);
                }
                seqs
            })
        })
        .collect();

    let mut seqs = Vec::new();
    for handle in handles {
        match handle.join() {
            Ok(mut placed) => seqs.append(&mut placed),
            Err(_) => bail!("worker thread panicked"),
        }
    }
    seqs.sort_unstable();
    ensure!(
        seqs == (0..summary.config.total_items).collect::<Vec<_>>(),
        "workers placed {} items, some twice or not at all",
        seqs.len()
    );
    ensure!(
        shared.snapshot().bags() == summary.finished().bags(),
        "concurrent stepping produced a different layout"
    );
    Ok(())
}

fn smoke_scenario() -> TestScenario {
    TestScenario::new(
        "Smoke Test",
        ScenarioPlan::new(CatalogPlan::Bundled)
            .with_expectation(all_items_bagged)
            .with_expectation(cursor_is_monotonic)
            .with_expectation(capacity_respected)
            .with_expectation(duplicates_capped)
            .with_expectation(chemicals_isolated),
    )
}

#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let scenario = match name.to_lowercase().as_str() {
        "smoke" => smoke_scenario(),
        "chemical-isolation" | "chemicals" => TestScenario::new(
            "Chemical Isolation",
            ScenarioPlan::new(CatalogPlan::Shuffled)
                .with_total_items(35)
                .with_expectation(chemicals_isolated),
        ),
        "cold-grouping" | "cold" => TestScenario::new(
            "Cold Grouping",
            ScenarioPlan::new(CatalogPlan::Shuffled)
                .with_total_items(30)
                .with_expectation(cold_items_grouped),
        ),
        "overflow" => TestScenario::new(
            "Bag Overflow",
            ScenarioPlan::new(CatalogPlan::Bundled)
                .with_total_items(60)
                .with_expectation(capacity_respected)
                .with_expectation(new_bags_are_appended),
        ),
        "duplicate-cap" | "duplicates" => TestScenario::new(
            "Duplicate Cap",
            ScenarioPlan::new(CatalogPlan::SingleItem("milk"))
                .with_total_items(12)
                .with_expectation(duplicates_capped)
                .with_expectation(single_item_spread),
        ),
        "random-catalogs" | "random" => TestScenario::new(
            "Random Catalog Sweep",
            ScenarioPlan::new(CatalogPlan::Random)
                .with_random_config()
                .with_expectation(all_items_bagged)
                .with_expectation(capacity_respected)
                .with_expectation(duplicates_capped)
                .with_expectation(chemicals_isolated)
                .with_expectation(new_bags_are_appended),
        ),
        "determinism" | "deterministic" => TestScenario::new(
            "Deterministic Replay",
            ScenarioPlan::new(CatalogPlan::Shuffled)
                .with_total_items(25)
                .with_expectation(replay_is_identical)
                .with_expectation(reset_restarts_session),
        ),
        "resume" => TestScenario::new(
            "Serialized Resume",
            ScenarioPlan::new(CatalogPlan::Random)
                .with_random_config()
                .with_expectation(resume_after_serialization),
        ),
        "shared-session" | "shared" => TestScenario::new(
            "Shared Session",
            ScenarioPlan::new(CatalogPlan::Bundled)
                .with_total_items(40)
                .with_expectation(shared_session_agrees),
        ),
        _ => return None,
    };
    Some(scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("chemical-isolation", "Chemical Isolation"),
        ("cold-grouping", "Cold Grouping"),
        ("overflow", "Bag Overflow"),
        ("duplicate-cap", "Duplicate Cap"),
        ("random-catalogs", "Random Catalog Sweep"),
        ("determinism", "Deterministic Replay"),
        ("resume", "Serialized Resume"),
        ("shared-session", "Shared Session"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::plan::run_plan;

    fn evaluate(scenario: &TestScenario, seed: u64) -> Result<()> {
        let summary = run_plan(&scenario.plan, seed)?;
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary)?;
        }
        Ok(())
    }

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, description) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            assert_eq!(scenario.name, description);
            assert!(!scenario.plan.expectations.is_empty(), "{key}");
        }
        assert!(get_scenario("nonexistent").is_none());
    }

    #[test]
    fn aliases_are_case_insensitive() {
        assert_eq!(get_scenario("SMOKE").unwrap().name, "Smoke Test");
        assert_eq!(get_scenario("cold").unwrap().name, "Cold Grouping");
    }

    #[test]
    fn every_scenario_passes_for_a_few_seeds() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            for seed in [1, 1337, 0xC0FFEE] {
                if let Err(err) = evaluate(&scenario, seed) {
                    panic!("{key} seed {seed}: {err:#}");
                }
            }
        }
    }

    #[test]
    fn milk_spread_uses_six_bags() {
        let scenario = get_scenario("duplicate-cap").unwrap();
        let summary = run_plan(&scenario.plan, 3).unwrap();
        assert_eq!(summary.bag_count(), 6);
    }

    #[test]
    fn expectations_report_violations() {
        let plan = ScenarioPlan::new(CatalogPlan::Bundled).with_total_items(3);
        let mut summary = run_plan(&plan, 1).unwrap();
        summary.config.total_items = 4;
        assert!(all_items_bagged(&summary).is_err());
        summary.config.items_per_bag = 0;
        assert!(capacity_respected(&summary).is_err());
    }
}
