use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use smartbag_engine::{
    BaggingConfig, BaggingSession, Catalog, Category, Item, PlacementEvent, Position,
};
use std::sync::Arc;

/// Which catalog a run draws its stream from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogPlan {
    /// The catalog shipped with the engine, in catalog order.
    Bundled,
    /// The bundled catalog shuffled by the run seed.
    Shuffled,
    /// A generated catalog with random category tags and positions.
    Random,
    /// Just one bundled item, by id.
    SingleItem(&'static str),
}

impl CatalogPlan {
    fn build(self, rng: &mut ChaCha20Rng) -> Result<Catalog> {
        let bundled = || Catalog::load_default().context("bundled catalog is invalid");
        match self {
            Self::Bundled => bundled(),
            Self::Shuffled => {
                let mut items = bundled()?.items;
                items.shuffle(rng);
                Ok(Catalog::from_items(items))
            }
            Self::Random => Ok(random_catalog(rng)),
            Self::SingleItem(id) => {
                let catalog = bundled()?;
                let item = catalog
                    .find(id)
                    .with_context(|| format!("bundled catalog has no item '{id}'"))?;
                Ok(Catalog::from_items(vec![item.clone()]))
            }
        }
    }
}

fn random_catalog(rng: &mut ChaCha20Rng) -> Catalog {
    let size = rng.gen_range(1..=9);
    let items = (0..size)
        .map(|index| {
            let tag_count = rng.gen_range(1..=3);
            let tags: Vec<Category> = Category::ALL
                .choose_multiple(rng, tag_count)
                .cloned()
                .collect();
            let position = Position::STACKED[rng.gen_range(0..Position::STACKED.len())];
            Item::new(
                format!("sku-{index}"),
                format!("Product {index}"),
                "box",
                &tags,
                position,
            )
        })
        .collect();
    Catalog::from_items(items)
}

fn random_config(rng: &mut ChaCha20Rng) -> BaggingConfig {
    BaggingConfig {
        items_per_bag: rng.gen_range(1..=6),
        duplicate_cap: rng.gen_range(1..=3),
        initial_bags: rng.gen_range(1..=4),
        total_items: rng.gen_range(0..=40),
    }
}

/// Assertion hook run after a plan has been stepped to completion.
type RunExpectationFn = Arc<dyn Fn(&RunSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct RunExpectation(RunExpectationFn);

impl std::fmt::Debug for RunExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunExpectation").finish()
    }
}

impl RunExpectation {
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&RunSummary) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn evaluate(&self, summary: &RunSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for RunExpectation
where
    F: Fn(&RunSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    pub catalog: CatalogPlan,
    /// `None` draws a random config from the run seed.
    pub config: Option<BaggingConfig>,
    pub expectations: Vec<RunExpectation>,
}

impl ScenarioPlan {
    #[must_use]
    pub fn new(catalog: CatalogPlan) -> Self {
        Self {
            catalog,
            config: Some(BaggingConfig::default_config()),
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_total_items(mut self, total_items: usize) -> Self {
        let config = self.config.take().unwrap_or_default();
        self.config = Some(config.with_total_items(total_items));
        self
    }

    #[must_use]
    pub fn with_random_config(mut self) -> Self {
        self.config = None;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<RunExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Everything a run produced: the session before and after every step.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub catalog: Catalog,
    pub config: BaggingConfig,
    /// `sessions[i]` is the state before event `i`; the last entry is final.
    pub sessions: Vec<BaggingSession>,
    pub events: Vec<PlacementEvent>,
}

impl RunSummary {
    #[must_use]
    pub fn initial(&self) -> &BaggingSession {
        &self.sessions[0]
    }

    #[must_use]
    pub fn finished(&self) -> &BaggingSession {
        &self.sessions[self.sessions.len() - 1]
    }

    /// Bags in use once the run is over.
    #[must_use]
    pub fn bag_count(&self) -> usize {
        self.finished().bags().len()
    }
}

/// Build the plan's catalog and config from `seed` and step until exhausted.
pub fn run_plan(plan: &ScenarioPlan, seed: u64) -> Result<RunSummary> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let catalog = plan.catalog.build(&mut rng)?;
    let config = match &plan.config {
        Some(config) => config.clone(),
        None => random_config(&mut rng),
    };
    let mut session = BaggingSession::new(&catalog, &config, seed)
        .with_context(|| format!("could not start a session for seed {seed}"))?;

    let mut sessions = vec![session.clone()];
    let mut events = Vec::with_capacity(config.total_items);
    loop {
        match session.place_next() {
            Ok(step) => {
                events.push(step.event);
                session = step.session;
                sessions.push(session.clone());
            }
            Err(err) if err.is_exhausted() => break,
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("step {} failed for seed {seed}", session.current_item_index())
                });
            }
        }
    }

    Ok(RunSummary {
        seed,
        catalog,
        config,
        sessions,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_plan_records_every_step() {
        let plan = ScenarioPlan::new(CatalogPlan::Bundled).with_total_items(9);
        let summary = run_plan(&plan, 4).unwrap();
        assert_eq!(summary.events.len(), 9);
        assert_eq!(summary.sessions.len(), 10);
        assert_eq!(summary.initial().current_item_index(), 0);
        assert!(summary.finished().is_complete());
    }

    #[test]
    fn random_plans_are_reproducible_per_seed() {
        let plan = ScenarioPlan::new(CatalogPlan::Random).with_random_config();
        let first = run_plan(&plan, 21).unwrap();
        let second = run_plan(&plan, 21).unwrap();
        assert_eq!(first.catalog, second.catalog);
        assert_eq!(first.config, second.config);
        assert_eq!(first.finished(), second.finished());
    }

    #[test]
    fn single_item_plan_keeps_one_template() {
        let plan = ScenarioPlan::new(CatalogPlan::SingleItem("milk")).with_total_items(4);
        let summary = run_plan(&plan, 1).unwrap();
        assert_eq!(summary.catalog.len(), 1);
        assert!(summary.events.iter().all(|event| event.template_id == "milk"));
    }

    #[test]
    fn unknown_single_item_is_an_error() {
        let plan = ScenarioPlan::new(CatalogPlan::SingleItem("caviar"));
        assert!(run_plan(&plan, 1).is_err());
    }
}
