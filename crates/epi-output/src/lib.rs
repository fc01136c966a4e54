//! `epi-output` — result collection and output writers for the rust_epi
//! simulation kernel.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                  |
//! |-----------|---------|----------------------------------------------------------------|
//! | *(none)*  | CSV     | `tick_summaries.csv`, `disease_results.csv`, `agent_states.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                    |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`OutputObserver`], which implements `epi_sim::SimObserver`.  For
//! in-memory analysis, [`ResultsObserver`] collects [`Results`] time series
//! keyed `"<module>.<name>"`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use epi_output::{Both, CsvWriter, OutputObserver, ResultsObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = Both(OutputObserver::new(writer), ResultsObserver::new());
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.0.take_error() { eprintln!("output error: {e}"); }
//! println!("{:?}", obs.1.results.summarize("sir.new_infections"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod results;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{Both, OutputObserver};
pub use results::{Results, ResultsObserver, Summary};
pub use row::{AgentStateRow, DiseaseResultRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
