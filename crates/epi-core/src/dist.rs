//! Parametric distributions for durations and counts.
//!
//! [`Dist`] is the configuration form (plain numbers, serde-friendly).
//! [`Sampler`] is the validated form: it can only be obtained through
//! [`Dist::sampler`] / [`Dist::duration_sampler`], so malformed parameters
//! are rejected once at configuration time rather than on every draw.

use rand::Rng;
use rand_distr::{Distribution, Exp, LogNormal, Normal, Poisson, Uniform};

use crate::{CoreError, CoreResult};

/// A distribution as written in configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "dist", rename_all = "snake_case")
)]
pub enum Dist {
    Constant { value: f64 },
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std: f64 },
    /// Lognormal parameterised by the mean and standard deviation of the
    /// distribution itself (not of the underlying normal).
    #[cfg_attr(feature = "serde", serde(rename = "lognormal"))]
    LogNormal { mean: f64, std: f64 },
    Exponential { mean: f64 },
    Poisson { lam: f64 },
}

impl Dist {
    pub fn constant(value: f64) -> Self {
        Dist::Constant { value }
    }

    pub fn lognormal(mean: f64, std: f64) -> Self {
        Dist::LogNormal { mean, std }
    }

    /// Expected value.
    pub fn mean(&self) -> f64 {
        match *self {
            Dist::Constant { value } => value,
            Dist::Uniform { low, high } => 0.5 * (low + high),
            Dist::Normal { mean, .. } | Dist::LogNormal { mean, .. } | Dist::Exponential { mean } => mean,
            Dist::Poisson { lam } => lam,
        }
    }

    /// `true` if no sample can be negative.
    pub fn is_non_negative(&self) -> bool {
        match *self {
            Dist::Constant { value } => value >= 0.0,
            Dist::Uniform { low, .. } => low >= 0.0,
            Dist::Normal { mean, std } => std == 0.0 && mean >= 0.0,
            Dist::LogNormal { .. } | Dist::Exponential { .. } | Dist::Poisson { .. } => true,
        }
    }

    /// Validate parameters and build a sampler.
    pub fn sampler(&self) -> CoreResult<Sampler> {
        let bad = |reason: &str| Err(CoreError::Config(format!("{self:?}: {reason}")));
        let finite = |v: f64| v.is_finite();

        match *self {
            Dist::Constant { value } => {
                if !finite(value) {
                    return bad("value must be finite");
                }
                Ok(Sampler::Constant(value))
            }
            Dist::Uniform { low, high } => {
                if !(finite(low) && finite(high)) || low > high {
                    return bad("requires finite low <= high");
                }
                if low == high {
                    return Ok(Sampler::Constant(low));
                }
                Ok(Sampler::Uniform(Uniform::new(low, high)))
            }
            Dist::Normal { mean, std } => {
                if !(finite(mean) && finite(std)) || std < 0.0 {
                    return bad("requires finite mean and std >= 0");
                }
                match Normal::new(mean, std) {
                    Ok(d) => Ok(Sampler::Normal(d)),
                    Err(e) => bad(&e.to_string()),
                }
            }
            Dist::LogNormal { mean, std } => {
                if !(finite(mean) && finite(std)) || mean <= 0.0 || std < 0.0 {
                    return bad("requires mean > 0 and std >= 0");
                }
                if std == 0.0 {
                    return Ok(Sampler::Constant(mean));
                }
                let sigma2 = (1.0 + (std / mean).powi(2)).ln();
                let mu = mean.ln() - 0.5 * sigma2;
                match LogNormal::new(mu, sigma2.sqrt()) {
                    Ok(d) => Ok(Sampler::LogNormal(d)),
                    Err(e) => bad(&e.to_string()),
                }
            }
            Dist::Exponential { mean } => {
                if !finite(mean) || mean <= 0.0 {
                    return bad("requires mean > 0");
                }
                match Exp::new(1.0 / mean) {
                    Ok(d) => Ok(Sampler::Exponential(d)),
                    Err(e) => bad(&e.to_string()),
                }
            }
            Dist::Poisson { lam } => {
                if !finite(lam) || lam < 0.0 {
                    return bad("requires lam >= 0");
                }
                if lam == 0.0 {
                    return Ok(Sampler::Constant(0.0));
                }
                match Poisson::new(lam) {
                    Ok(d) => Ok(Sampler::Poisson(d)),
                    Err(e) => bad(&e.to_string()),
                }
            }
        }
    }

    /// Like [`sampler`](Self::sampler), but also rejects distributions that
    /// can produce negative values.  Use for anything added to the clock.
    pub fn duration_sampler(&self, name: &str) -> CoreResult<Sampler> {
        if !self.is_non_negative() {
            return Err(CoreError::Config(format!(
                "{name}: {self:?} can produce negative durations; use a non-negative distribution"
            )));
        }
        self.sampler()
    }
}

/// A validated, ready-to-sample distribution.
#[derive(Clone, Debug)]
pub enum Sampler {
    Constant(f64),
    Uniform(Uniform<f64>),
    Normal(Normal<f64>),
    LogNormal(LogNormal<f64>),
    Exponential(Exp<f64>),
    Poisson(Poisson<f64>),
}

impl Sampler {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Constant(v) => *v,
            Sampler::Uniform(d) => d.sample(rng),
            Sampler::Normal(d) => d.sample(rng),
            Sampler::LogNormal(d) => d.sample(rng),
            Sampler::Exponential(d) => d.sample(rng),
            Sampler::Poisson(d) => d.sample(rng),
        }
    }
}
