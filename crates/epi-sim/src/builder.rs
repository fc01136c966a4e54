//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use tracing::debug;

use epi_core::{Dist, DrawKey, DrawStream, Purpose, SimConfig, StepContext, StreamId, Tick, Uid};
use epi_disease::Disease;
use epi_intervention::{InterventionConfig, InterventionEngine};
use epi_network::ContactNetwork;

use crate::{AbortHandle, Demographics, Population, Sim, SimError, SimResult};

/// Stream for draws made on behalf of the population itself.
const POPULATION_STREAM: &str = "population";

/// Fluent builder for [`Sim`].
///
/// # Required inputs
///
/// - [`SimConfig`] — agent count, steps, `dt`, seed, …
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.disease(d)`          | none                             |
/// | `.network(n)`          | none                             |
/// | `.intervention(c)`     | none                             |
/// | `.demographics(m)`     | none (closed population)         |
/// | `.age_dist(d)`         | `Uniform { low: 0, high: 100 }`  |
/// | `.initial_ages(v)`     | sampled from `age_dist`          |
/// | `.seed_infections(..)` | only `init_prev` seeding         |
///
/// Every module name must be unique across all kinds: names seed the draw
/// streams, so two modules with the same name would draw identical values.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .disease(Disease::new(sir_config)?)
///     .network(RandomNetwork::new(RandomNetConfig::default())?)
///     .intervention(vaccine)
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config:        SimConfig,
    diseases:      Vec<Disease>,
    networks:      Vec<Box<dyn ContactNetwork>>,
    interventions: Vec<InterventionConfig>,
    demographics:  Vec<Box<dyn Demographics>>,
    age_dist:      Dist,
    ages:          Option<Vec<f64>>,
    seeds:         Vec<(String, Vec<Uid>)>,
}

impl SimBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            diseases:      Vec::new(),
            networks:      Vec::new(),
            interventions: Vec::new(),
            demographics:  Vec::new(),
            age_dist:      Dist::Uniform { low: 0.0, high: 100.0 },
            ages:          None,
            seeds:         Vec::new(),
        }
    }

    /// Add a disease.  It must not have any agents yet.
    pub fn disease(mut self, disease: Disease) -> Self {
        self.diseases.push(disease);
        self
    }

    pub fn network(mut self, network: impl ContactNetwork + 'static) -> Self {
        self.networks.push(Box::new(network));
        self
    }

    pub fn intervention(mut self, config: InterventionConfig) -> Self {
        self.interventions.push(config);
        self
    }

    pub fn demographics(mut self, module: impl Demographics + 'static) -> Self {
        self.demographics.push(Box::new(module));
        self
    }

    /// Distribution of initial ages, in model time units.
    pub fn age_dist(mut self, dist: Dist) -> Self {
        self.age_dist = dist;
        self
    }

    /// Exact initial ages (must be length `n_agents`).
    pub fn initial_ages(mut self, ages: Vec<f64>) -> Self {
        self.ages = Some(ages);
        self
    }

    /// Infect these agents at tick 0, before `init_prev` seeding.
    pub fn seed_infections(mut self, disease: impl Into<String>, uids: Vec<Uid>) -> Self {
        self.seeds.push((disease.into(), uids));
        self
    }

    /// Validate every module, create the initial population in every store,
    /// and seed infections at tick 0.
    ///
    /// All configuration errors surface here; no tick has run yet.
    pub fn build(self) -> SimResult<Sim> {
        self.config.validate()?;
        let n = self.config.n_agents;

        // ── Names ─────────────────────────────────────────────────────────
        let names = self
            .diseases
            .iter()
            .map(|d| d.name().to_owned())
            .chain(self.networks.iter().map(|m| m.name().to_owned()))
            .chain(self.interventions.iter().map(|c| c.name.clone()))
            .chain(self.demographics.iter().map(|m| m.name().to_owned()));
        let mut seen = HashSet::new();
        for name in names {
            if name.is_empty() {
                return Err(SimError::Config("module names must not be empty".to_owned()));
            }
            if !seen.insert(name.clone()) {
                return Err(SimError::Config(format!("duplicate module name '{name}'")));
            }
        }
        if let Some(d) = self.diseases.iter().find(|d| !d.states().is_empty()) {
            return Err(SimError::Config(format!(
                "disease '{}' already has {} agents; add diseases before any agents exist",
                d.name(),
                d.states().len()
            )));
        }

        // ── Initial population ────────────────────────────────────────────
        let draws = DrawStream::new(self.config.seed);
        let ages = match self.ages {
            Some(ages) => {
                if ages.len() != n {
                    return Err(SimError::AgentCountMismatch { expected: n, got: ages.len(), what: "initial ages" });
                }
                ages
            }
            None => {
                let sampler = self.age_dist.duration_sampler("age_dist")?;
                let stream = StreamId::from_name(POPULATION_STREAM);
                Uid::range(0, n)
                    .map(|u| draws.sample(DrawKey::new(Tick::ZERO, stream, Purpose::Age, u), &sampler))
                    .collect()
            }
        };
        let mut population = Population::new()?;
        let uids = population.add_agents(&ages)?;

        let mut diseases = self.diseases;
        let mut networks = self.networks;
        for disease in &mut diseases {
            disease.add_agents(n);
        }
        for network in &mut networks {
            network.add_agents(&uids);
        }

        // ── Interventions ─────────────────────────────────────────────────
        let mut interventions = InterventionEngine::new();
        for config in self.interventions {
            interventions.add(config, &mut diseases)?;
        }

        // ── Seeding ───────────────────────────────────────────────────────
        let ctx = StepContext::new(Tick::ZERO, self.config.dt, &draws);
        for (name, seeds) in &self.seeds {
            let disease = diseases
                .iter_mut()
                .find(|d| d.name() == name)
                .ok_or_else(|| SimError::Config(format!("seed_infections: unknown disease '{name}'")))?;
            disease.infect(ctx, seeds)?;
        }
        for disease in &mut diseases {
            disease.init_state(ctx, &uids)?;
        }

        debug!(
            agents = n,
            diseases = diseases.len(),
            networks = networks.len(),
            interventions = interventions.len(),
            demographics = self.demographics.len(),
            "sim built"
        );

        Ok(Sim {
            clock:         self.config.make_clock(),
            config:        self.config,
            draws,
            population,
            diseases,
            networks,
            interventions,
            demographics:  self.demographics,
            abort:         AbortHandle::new(),
        })
    }
}
