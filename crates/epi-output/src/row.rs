//! Plain data row types written by output backends.

use epi_disease::DiseaseCounts;
use epi_disease::disease::{COMPARTMENTS, DEAD};
use epi_disease::Disease;
use epi_sim::{Population, TickReport};

use crate::OutputResult;

/// Population-level totals for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:       u64,
    pub model_time: f64,
    pub n_alive:    u64,
    pub births:     u64,
    pub deaths:     u64,
}

impl From<&TickReport> for TickSummaryRow {
    fn from(report: &TickReport) -> Self {
        Self {
            tick:       report.tick.0,
            model_time: report.model_time,
            n_alive:    report.n_alive as u64,
            births:     report.births as u64,
            deaths:     report.deaths as u64,
        }
    }
}

/// One disease's counts for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DiseaseResultRow {
    pub tick:    u64,
    pub disease: String,
    pub counts:  DiseaseCounts,
}

impl DiseaseResultRow {
    pub fn from_report(report: &TickReport) -> Vec<Self> {
        report
            .diseases
            .iter()
            .map(|(name, counts)| Self { tick: report.tick.0, disease: name.clone(), counts: *counts })
            .collect()
    }
}

/// One agent's compartment in one disease at a snapshot tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentStateRow {
    pub agent_id:    u32,
    pub tick:        u64,
    pub disease:     String,
    /// `susceptible`, `exposed`, `infected`, `recovered` or `dead`.
    pub compartment: &'static str,
    pub age:         f64,
}

impl AgentStateRow {
    /// Every agent ever created, in every disease.
    pub fn snapshot(tick: u64, population: &Population, diseases: &[Disease]) -> OutputResult<Vec<Self>> {
        let ages = population.ages()?;
        let mut rows = Vec::with_capacity(ages.len() * diseases.len());
        for disease in diseases {
            let states = disease.states();
            let dead = states.column::<bool>(DEAD)?;
            let flags = COMPARTMENTS
                .iter()
                .map(|c| states.column::<bool>(c).map(|v| (*c, v)))
                .collect::<Result<Vec<_>, _>>()?;
            for (i, &age) in ages.iter().enumerate().take(states.len()) {
                let compartment = if dead[i] {
                    DEAD
                } else {
                    flags.iter().find(|(_, v)| v[i]).map_or("none", |&(c, _)| c)
                };
                rows.push(Self {
                    agent_id: i as u32,
                    tick,
                    disease: disease.name().to_owned(),
                    compartment,
                    age,
                });
            }
        }
        Ok(rows)
    }
}
