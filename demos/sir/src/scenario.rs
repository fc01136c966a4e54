//! Scenario file: everything needed to build one `Sim` except the seed.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use epi_core::SimConfig;
use epi_disease::{Disease, DiseaseConfig};
use epi_intervention::InterventionConfig;
use epi_network::{DynamicNetConfig, DynamicNetwork, RandomNetConfig, RandomNetwork};
use epi_sim::{AgeRates, Births, Deaths, Sim, SimBuilder, SimResult};

/// Built-in scenario used when no path is given on the command line.
const DEFAULT_SCENARIO: &str = include_str!("../scenario.json");

#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    pub sim:           SimConfig,
    pub diseases:      Vec<DiseaseConfig>,
    pub random:        RandomNetConfig,
    pub dynamic:       DynamicNetConfig,
    #[serde(default)]
    pub interventions: Vec<InterventionConfig>,
    /// Births per 1000 alive agents per unit time.
    #[serde(default)]
    pub birth_rate:    f64,
    /// Background deaths per 1000 agents per unit time.
    #[serde(default)]
    pub death_rate:    f64,
    /// Age-specific death rates; replaces `death_rate` when present.
    #[serde(default)]
    pub deaths_by_age: Option<DeathTable>,
    #[serde(default = "default_replicates")]
    pub replicates:    u64,
}

fn default_replicates() -> u64 {
    1
}

/// Lower age bound of each group and its rate per 1000 per unit time.
#[derive(Clone, Debug, Deserialize)]
pub struct DeathTable {
    pub ages:  Vec<f64>,
    pub rates: Vec<f64>,
}

impl Scenario {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading scenario {}", path.display()))?;
                serde_json::from_str(&text).with_context(|| format!("parsing scenario {}", path.display()))
            }
            None => serde_json::from_str(DEFAULT_SCENARIO).context("parsing built-in scenario"),
        }
    }

    /// A fresh simulation for `seed`.
    pub fn build(&self, seed: u64) -> SimResult<Sim> {
        let config = SimConfig { seed, ..self.sim.clone() };
        let mut builder = SimBuilder::new(config)
            .network(RandomNetwork::new(self.random.clone())?)
            .network(DynamicNetwork::new(self.dynamic.clone())?);
        for disease in &self.diseases {
            builder = builder.disease(Disease::new(disease.clone())?);
        }
        for iv in &self.interventions {
            builder = builder.intervention(iv.clone());
        }
        if self.birth_rate > 0.0 {
            builder = builder.demographics(Births::new(self.birth_rate)?);
        }
        if let Some(table) = &self.deaths_by_age {
            let rates = AgeRates::new(table.ages.clone(), table.rates.clone())?;
            builder = builder.demographics(Deaths::by_age(rates));
        } else if self.death_rate > 0.0 {
            builder = builder.demographics(Deaths::new(self.death_rate)?);
        }
        builder.build()
    }
}
