//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `tick_summaries.csv`
//! - `disease_results.csv`
//! - `agent_states.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentStateRow, DiseaseResultRow, OutputResult, TickSummaryRow};

/// Column names of `disease_results.csv` after `tick` and `disease`.
pub const COUNT_COLUMNS: [&str; 9] = [
    "n_susceptible",
    "n_exposed",
    "n_infected",
    "n_recovered",
    "n_dead",
    "n_total",
    "new_infections",
    "new_deaths",
    "prevalence",
];

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    diseases:  Writer<File>,
    agents:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "model_time", "n_alive", "births", "deaths"])?;

        let mut diseases = Writer::from_path(dir.join("disease_results.csv"))?;
        diseases.write_record(["tick", "disease"].iter().chain(&COUNT_COLUMNS))?;

        let mut agents = Writer::from_path(dir.join("agent_states.csv"))?;
        agents.write_record(["agent_id", "tick", "disease", "compartment", "age"])?;

        Ok(Self { summaries, diseases, agents, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.model_time.to_string(),
            row.n_alive.to_string(),
            row.births.to_string(),
            row.deaths.to_string(),
        ])?;
        Ok(())
    }

    fn write_disease_results(&mut self, rows: &[DiseaseResultRow]) -> OutputResult<()> {
        for row in rows {
            let mut record = vec![row.tick.to_string(), row.disease.clone()];
            record.extend(row.counts.named().iter().map(|(_, v)| v.to_string()));
            self.diseases.write_record(&record)?;
        }
        Ok(())
    }

    fn write_agent_states(&mut self, rows: &[AgentStateRow]) -> OutputResult<()> {
        for row in rows {
            self.agents.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.disease.clone(),
                row.compartment.to_owned(),
                row.age.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.diseases.flush()?;
        self.agents.flush()?;
        Ok(())
    }
}
