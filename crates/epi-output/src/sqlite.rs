//! `output.db` with one table per row type (feature `sqlite`).
//!
//! `disease_results` is keyed on `(tick, disease)`; agent snapshots are
//! unkeyed and indexed by tick.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{AgentStateRow, DiseaseResultRow, OutputResult, TickSummaryRow};

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Creates the tables if `dir/output.db` does not have them yet.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 tick       INTEGER PRIMARY KEY,
                 model_time REAL    NOT NULL,
                 n_alive    INTEGER NOT NULL,
                 births     INTEGER NOT NULL,
                 deaths     INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS disease_results (
                 tick           INTEGER NOT NULL,
                 disease        TEXT    NOT NULL,
                 n_susceptible  INTEGER NOT NULL,
                 n_exposed      INTEGER NOT NULL,
                 n_infected     INTEGER NOT NULL,
                 n_recovered    INTEGER NOT NULL,
                 n_dead         INTEGER NOT NULL,
                 n_total        INTEGER NOT NULL,
                 new_infections INTEGER NOT NULL,
                 new_deaths     INTEGER NOT NULL,
                 prevalence     REAL    NOT NULL,
                 PRIMARY KEY (tick, disease)
             );
             CREATE TABLE IF NOT EXISTS agent_states (
                 agent_id    INTEGER NOT NULL,
                 tick        INTEGER NOT NULL,
                 disease     TEXT    NOT NULL,
                 compartment TEXT    NOT NULL,
                 age         REAL    NOT NULL
             );
             CREATE INDEX IF NOT EXISTS agent_states_tick ON agent_states (tick);",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries (tick, model_time, n_alive, births, deaths) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.tick as i64, row.model_time, row.n_alive as i64, row.births as i64, row.deaths as i64],
        )?;
        Ok(())
    }

    fn write_disease_results(&mut self, rows: &[DiseaseResultRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO disease_results \
                 (tick, disease, n_susceptible, n_exposed, n_infected, n_recovered, n_dead, n_total, \
                  new_infections, new_deaths, prevalence) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for row in rows {
                let c = &row.counts;
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.disease,
                    c.n_susceptible as i64,
                    c.n_exposed as i64,
                    c.n_infected as i64,
                    c.n_recovered as i64,
                    c.n_dead as i64,
                    c.n_total as i64,
                    c.new_infections as i64,
                    c.new_deaths as i64,
                    c.prevalence,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_agent_states(&mut self, rows: &[AgentStateRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_states (agent_id, tick, disease, compartment, age) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.agent_id, row.tick as i64, row.disease, row.compartment, row.age])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
