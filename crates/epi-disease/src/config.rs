//! Disease configuration and parameter validation.
//!
//! A [`DiseaseConfig`] is plain data (it deserializes from JSON):
//!
//! ```json
//! {
//!   "name": "measles",
//!   "kind": "seir",
//!   "pars": {
//!     "beta": 0.3,
//!     "dur_exp": { "dist": "lognormal", "mean": 8.0, "std": 2.0 },
//!     "dur_inf": { "dist": "lognormal", "mean": 11.0, "std": 2.0 },
//!     "p_death": 0.005
//!   },
//!   "states": [ { "name": "hospitalised", "default": { "bool": false } } ]
//! }
//! ```
//!
//! [`DiseasePars::from_config`] turns it into validated parameters.  Unknown
//! parameter names are rejected rather than ignored, so a typo cannot
//! silently fall back to a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use epi_core::{Dist, Sampler};
use epi_state::StateDef;

use crate::{DiseaseError, DiseaseResult};

/// Which state machine a disease runs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiseaseKind {
    /// susceptible → infected → recovered (or dead).
    Sir,
    /// susceptible → infected → susceptible; no lasting immunity.
    Sis,
    /// susceptible → exposed → infected → recovered (or dead).
    Seir,
}

impl DiseaseKind {
    /// Parameters this kind accepts.
    pub fn par_names(self) -> &'static [&'static str] {
        match self {
            DiseaseKind::Sir | DiseaseKind::Sis => &["beta", "init_prev", "dur_inf", "p_death"],
            DiseaseKind::Seir => &["beta", "init_prev", "dur_exp", "dur_inf", "p_death"],
        }
    }
}

/// A parameter value: a plain number or a distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParValue {
    Scalar(f64),
    Dist(Dist),
}

impl From<f64> for ParValue {
    fn from(v: f64) -> Self {
        ParValue::Scalar(v)
    }
}

impl From<Dist> for ParValue {
    fn from(d: Dist) -> Self {
        ParValue::Dist(d)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiseaseConfig {
    /// Unique module name; prefixes result keys and seeds the draw stream.
    pub name:   String,
    pub kind:   DiseaseKind,
    #[serde(default)]
    pub pars:   BTreeMap<String, ParValue>,
    /// Extra per-agent states, appended after the standard ones.
    #[serde(default)]
    pub states: Vec<StateDef>,
}

impl DiseaseConfig {
    pub fn new(name: impl Into<String>, kind: DiseaseKind) -> Self {
        Self { name: name.into(), kind, pars: BTreeMap::new(), states: Vec::new() }
    }

    pub fn par(mut self, name: &str, value: impl Into<ParValue>) -> Self {
        self.pars.insert(name.to_owned(), value.into());
        self
    }

    pub fn state(mut self, def: StateDef) -> Self {
        self.states.push(def);
        self
    }
}

// ── Validated parameters ──────────────────────────────────────────────────────

/// Parameters after validation.  Durations are in model time units.
#[derive(Clone, Debug)]
pub struct DiseasePars {
    /// Per-unit-time transmission probability per contact.
    pub beta:      f64,
    /// Fraction of the initial population seeded as infected.
    pub init_prev: f64,
    /// Latent period; `Some` only for SEIR.
    pub dur_exp:   Option<Sampler>,
    pub dur_inf:   Sampler,
    /// Probability an infection ends in death rather than recovery.
    pub p_death:   f64,
}

impl DiseasePars {
    pub fn from_config(config: &DiseaseConfig) -> DiseaseResult<Self> {
        let known = config.kind.par_names();
        if let Some(unknown) = config.pars.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(DiseaseError::Config(format!(
                "{}: unknown parameter '{unknown}' for {:?} (expected one of {known:?})",
                config.name, config.kind
            )));
        }

        let name = config.name.as_str();
        let (dur_inf_default, p_death_default) = match config.kind {
            DiseaseKind::Sis => (Dist::lognormal(10.0, 1.0), 0.0),
            DiseaseKind::Sir | DiseaseKind::Seir => (Dist::lognormal(6.0, 1.0), 0.01),
        };

        let beta = match config.pars.get("beta") {
            Some(v) => probability(name, "beta", v)?,
            None => {
                return Err(DiseaseError::Config(format!("{name}: missing required parameter 'beta'")));
            }
        };
        let init_prev = optional_probability(config, "init_prev", 0.01)?;
        let p_death = optional_probability(config, "p_death", p_death_default)?;
        let dur_inf = duration(config, "dur_inf", dur_inf_default)?;
        let dur_exp = match config.kind {
            DiseaseKind::Seir => Some(duration(config, "dur_exp", Dist::lognormal(0.5, 1.0))?),
            DiseaseKind::Sir | DiseaseKind::Sis => None,
        };

        Ok(Self { beta, init_prev, dur_exp, dur_inf, p_death })
    }
}

fn probability(disease: &str, par: &str, value: &ParValue) -> DiseaseResult<f64> {
    match *value {
        ParValue::Scalar(p) if (0.0..=1.0).contains(&p) => Ok(p),
        ParValue::Scalar(p) => Err(DiseaseError::Config(format!(
            "{disease}: '{par}' must be a probability in [0, 1], got {p}"
        ))),
        ParValue::Dist(ref d) => Err(DiseaseError::Config(format!(
            "{disease}: '{par}' must be a number, got distribution {d:?}"
        ))),
    }
}

fn optional_probability(config: &DiseaseConfig, par: &str, default: f64) -> DiseaseResult<f64> {
    match config.pars.get(par) {
        Some(v) => probability(&config.name, par, v),
        None => Ok(default),
    }
}

/// A scalar duration is read as a constant distribution.
fn duration(config: &DiseaseConfig, par: &str, default: Dist) -> DiseaseResult<Sampler> {
    let dist = match config.pars.get(par) {
        Some(ParValue::Scalar(v)) => Dist::constant(*v),
        Some(ParValue::Dist(d)) => d.clone(),
        None => default,
    };
    Ok(dist.duration_sampler(&format!("{}.{par}", config.name))?)
}
