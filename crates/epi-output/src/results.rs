//! In-memory result time series keyed `"<module>.<name>"`.
//!
//! Every [`TickReport`] adds one value to each series:
//!
//! | Key                     | Source                                  |
//! |-------------------------|-----------------------------------------|
//! | `sim.n_alive`           | living agents                           |
//! | `sim.new_births`        | agents born this tick                   |
//! | `sim.new_deaths`        | agents removed this tick (any cause)    |
//! | `<disease>.<count>`     | every field of `DiseaseCounts`          |
//! | `<intervention>.new_reached` / `.new_affected` | delivery counts  |
//!
//! A series first seen after some ticks is back-filled with zeros, and a
//! series missing from a report (an intervention outside its window) gets a
//! zero for that tick, so all series always have the same length.
//!
//! [`finalize`](Results::finalize) multiplies every count series (`n_*`,
//! `new_*`) by the population scale, then adds a running total `cum_<x>` for
//! every `new_<x>` series.  Proportions such as `prevalence` are not scaled.
//! [`resample`](Results::resample) regroups ticks into coarser time bins.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use epi_core::{SimConfig, Tick};
use epi_sim::{SimObserver, TickReport};

use crate::{OutputError, OutputResult};

/// How a series collapses to one number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Summary {
    Sum,
    Mean,
    Last,
}

impl Summary {
    /// Chosen from the result name: `new_*` sums, `cum_*` takes the last
    /// value, everything else (`n_*`, `prevalence`, …) averages.
    pub fn for_name(name: &str) -> Self {
        let name = name.rsplit('.').next().unwrap_or(name);
        if name.starts_with("new_") {
            Summary::Sum
        } else if name.starts_with("cum_") {
            Summary::Last
        } else {
            Summary::Mean
        }
    }

    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Summary::Sum => values.iter().sum(),
            Summary::Mean if values.is_empty() => 0.0,
            Summary::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Summary::Last => values.last().copied().unwrap_or(0.0),
        }
    }
}

impl FromStr for Summary {
    type Err = OutputError;

    fn from_str(s: &str) -> OutputResult<Self> {
        match s {
            "sum" => Ok(Summary::Sum),
            "mean" => Ok(Summary::Mean),
            "last" => Ok(Summary::Last),
            other => Err(OutputError::Resample(format!("unknown summary '{other}', expected sum, mean or last"))),
        }
    }
}

/// `true` for counts of agents or events, which grow with the population.
fn scales_with_population(key: &str) -> bool {
    let name = key.rsplit('.').next().unwrap_or(key);
    name.starts_with("n_") || name.starts_with("new_") || name.starts_with("cum_")
}

#[derive(Clone, Debug)]
struct Series {
    values: Vec<f64>,
    /// Multiplied by the population scale at finalize.
    scale:  bool,
}

#[derive(Clone, Debug)]
pub struct Results {
    ticks:     Vec<Tick>,
    timevec:   Vec<f64>,
    keys:      Vec<String>,
    series:    HashMap<String, Series>,
    pop_scale: f64,
    finalized: bool,
}

impl Default for Results {
    fn default() -> Self {
        Self {
            ticks:     Vec::new(),
            timevec:   Vec::new(),
            keys:      Vec::new(),
            series:    HashMap::new(),
            pop_scale: 1.0,
            finalized: false,
        }
    }
}

impl Results {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results whose count series are scaled by `config.pop_scale`.
    pub fn for_config(config: &SimConfig) -> Self {
        Self { pop_scale: config.pop_scale, ..Self::default() }
    }

    pub fn pop_scale(&self) -> f64 {
        self.pop_scale
    }

    /// Ticks recorded so far.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Model time of each recorded tick.
    pub fn timevec(&self) -> &[f64] {
        &self.timevec
    }

    /// Series keys in the order they first appeared.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&[f64]> {
        self.series.get(key).map(|s| s.values.as_slice())
    }

    /// Whether `key` is multiplied by the population scale at finalize.
    pub fn is_scaled(&self, key: &str) -> Option<bool> {
        self.series.get(key).map(|s| s.scale)
    }

    /// Override the scaling rule chosen from the name.  Only meaningful
    /// before [`finalize`](Self::finalize).
    pub fn set_scale(&mut self, key: &str, scale: bool) -> OutputResult<()> {
        let series = self.series.get_mut(key).ok_or_else(|| OutputError::UnknownResult(key.to_owned()))?;
        series.scale = scale;
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Append one tick.
    pub fn push(&mut self, report: &TickReport) {
        let row = self.ticks.len();
        self.ticks.push(report.tick);
        self.timevec.push(report.model_time);

        self.record(row, "sim.n_alive", report.n_alive as f64);
        self.record(row, "sim.new_births", report.births as f64);
        self.record(row, "sim.new_deaths", report.deaths as f64);
        for (disease, counts) in &report.diseases {
            for (name, value) in counts.named() {
                self.record(row, &format!("{disease}.{name}"), value);
            }
        }
        for d in &report.interventions {
            self.record(row, &format!("{}.new_reached", d.name), d.reached as f64);
            self.record(row, &format!("{}.new_affected", d.name), d.affected as f64);
        }
        for series in self.series.values_mut() {
            series.values.resize(row + 1, 0.0);
        }
    }

    /// Scale count series by the population scale, then add `cum_<x>`
    /// running totals for each `new_<x>` series.  Idempotent.
    pub fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;
        let pop_scale = self.pop_scale;
        for series in self.series.values_mut().filter(|s| s.scale) {
            series.values.iter_mut().for_each(|v| *v *= pop_scale);
        }
        let derived: Vec<(String, Series)> = self
            .keys
            .iter()
            .filter_map(|key| {
                let (module, name) = key.rsplit_once('.')?;
                let rest = name.strip_prefix("new_")?;
                let source = &self.series[key];
                let values = source
                    .values
                    .iter()
                    .scan(0.0, |total, v| {
                        *total += v;
                        Some(*total)
                    })
                    .collect();
                Some((format!("{module}.cum_{rest}"), Series { values, scale: source.scale }))
            })
            .collect();
        for (key, series) in derived {
            self.keys.push(key.clone());
            self.series.insert(key, series);
        }
        debug!(series = self.keys.len(), ticks = self.len(), pop_scale, "results finalized");
    }

    /// Collapse one series with the rule chosen from its name.
    pub fn summarize(&self, key: &str) -> OutputResult<f64> {
        let values = self.get(key).ok_or_else(|| OutputError::UnknownResult(key.to_owned()))?;
        Ok(Summary::for_name(key).apply(values))
    }

    /// `(key, summary)` for every series.
    pub fn summary(&self) -> Vec<(String, f64)> {
        self.keys
            .iter()
            .map(|k| (k.clone(), Summary::for_name(k).apply(&self.series[k].values)))
            .collect()
    }

    /// One series regrouped into bins `width` model time units wide.
    /// `by` defaults to the rule chosen from the name.  Returns the start
    /// time of each bin and its summarized value.
    pub fn resample_series(&self, key: &str, width: f64, by: Option<Summary>) -> OutputResult<(Vec<f64>, Vec<f64>)> {
        let series = self.series.get(key).ok_or_else(|| OutputError::UnknownResult(key.to_owned()))?;
        let bins = self.bins(width)?;
        let by = by.unwrap_or_else(|| Summary::for_name(key));
        let times = bins.iter().map(|b| b.start).collect();
        let values = bins.iter().map(|b| by.apply(&series.values[b.rows.clone()])).collect();
        Ok((times, values))
    }

    /// Every series regrouped into bins `width` model time units wide, each
    /// with its own summary rule.  A bin's tick is the last tick it covers
    /// and its time is the bin start.
    ///
    /// With `dt = 1` day, `resample(365.0)` gives yearly results: summed
    /// `new_*`, averaged `n_*`, end-of-year `cum_*`.
    pub fn resample(&self, width: f64) -> OutputResult<Results> {
        let bins = self.bins(width)?;
        let series = self
            .series
            .iter()
            .map(|(key, s)| {
                let by = Summary::for_name(key);
                let values = bins.iter().map(|b| by.apply(&s.values[b.rows.clone()])).collect();
                (key.clone(), Series { values, scale: s.scale })
            })
            .collect();
        Ok(Results {
            ticks: bins.iter().map(|b| self.ticks[b.rows.end - 1]).collect(),
            timevec: bins.iter().map(|b| b.start).collect(),
            keys: self.keys.clone(),
            series,
            pop_scale: self.pop_scale,
            finalized: self.finalized,
        })
    }

    /// Consecutive row ranges sharing `floor(time / width)`.
    fn bins(&self, width: f64) -> OutputResult<Vec<Bin>> {
        if !(width.is_finite() && width > 0.0) {
            return Err(OutputError::Resample(format!("bin width must be positive and finite, got {width}")));
        }
        let mut bins: Vec<Bin> = Vec::new();
        for (row, &t) in self.timevec.iter().enumerate() {
            // Nudge so that e.g. 0.7 / 0.1 lands in bin 7, not 6.
            let index = (t / width + 1e-9).floor();
            match bins.last_mut() {
                Some(bin) if bin.index == index => bin.rows.end = row + 1,
                _ => bins.push(Bin { index, start: index * width, rows: row..row + 1 }),
            }
        }
        Ok(bins)
    }

    /// Write all series as columns of one CSV file: `tick`, `time`, then
    /// each key.
    pub fn write_csv(&self, path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        let header = ["tick", "time"].into_iter().chain(self.keys.iter().map(String::as_str));
        writer.write_record(header)?;
        for (row, (tick, time)) in self.ticks.iter().zip(&self.timevec).enumerate() {
            let mut record = vec![tick.0.to_string(), time.to_string()];
            record.extend(self.keys.iter().map(|k| self.series[k].values[row].to_string()));
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn record(&mut self, row: usize, key: &str, value: f64) {
        if !self.series.contains_key(key) {
            self.keys.push(key.to_owned());
            let series = Series { values: Vec::with_capacity(row + 1), scale: scales_with_population(key) };
            self.series.insert(key.to_owned(), series);
        }
        if let Some(series) = self.series.get_mut(key) {
            series.values.resize(row, 0.0);
            series.values.push(value);
        }
    }
}

struct Bin {
    index: f64,
    start: f64,
    rows:  std::ops::Range<usize>,
}

/// A [`SimObserver`] that collects [`Results`] and finalizes them when the
/// run ends.
#[derive(Default)]
pub struct ResultsObserver {
    pub results: Results,
}

impl ResultsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect results scaled by `config.pop_scale`.
    pub fn for_config(config: &SimConfig) -> Self {
        Self { results: Results::for_config(config) }
    }

    pub fn into_results(self) -> Results {
        self.results
    }
}

impl SimObserver for ResultsObserver {
    fn on_tick_end(&mut self, report: &TickReport) {
        self.results.push(report);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        self.results.finalize();
    }
}
