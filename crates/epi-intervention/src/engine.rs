//! `InterventionEngine` — runs interventions in registration order.
//!
//! # Ordering
//!
//! There is no transactional isolation between interventions: each one
//! reads the states left by the ones registered before it in the same tick.
//! A treatment registered after a diagnostic can therefore target agents
//! diagnosed that very tick.

use tracing::{debug, trace};

use epi_core::{Purpose, StepContext, StreamId, Uid};
use epi_disease::Disease;
use epi_state::StateInit;

use crate::{InterventionConfig, InterventionError, InterventionResult};

/// A validated intervention bound to one disease.
pub struct Intervention {
    pub config:    InterventionConfig,
    stream:        StreamId,
    disease_index: usize,
    /// Agents reached so far.
    pub delivered: usize,
}

impl Intervention {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn stream(&self) -> StreamId {
        self.stream
    }
}

/// What one intervention did in one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Delivered {
    pub name:     String,
    /// Agents that received the product.
    pub reached:  usize,
    /// Agents whose state the product changed.
    pub affected: usize,
}

#[derive(Default)]
pub struct InterventionEngine {
    interventions: Vec<Intervention>,
}

impl InterventionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.interventions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interventions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Intervention> {
        self.interventions.iter()
    }

    /// Validate `config`, register the product's states on its disease and
    /// append it to the run order.
    ///
    /// Fails with a configuration error for a duplicate name, an unknown
    /// disease, a parameter outside [0, 1], an inverted schedule, or an
    /// eligibility rule naming a missing or non-bool state.
    pub fn add(&mut self, config: InterventionConfig, diseases: &mut [Disease]) -> InterventionResult<()> {
        let fail = |reason: String| InterventionError::Config { name: config.name.clone(), reason };

        if self.interventions.iter().any(|i| i.config.name == config.name) {
            return Err(fail("an intervention with this name already exists".to_owned()));
        }
        let disease_index = diseases
            .iter()
            .position(|d| d.name() == config.disease)
            .ok_or_else(|| fail(format!("unknown disease '{}'", config.disease)))?;

        let mut probabilities = config.product.probabilities();
        probabilities.push(("coverage", config.coverage));
        for (par, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(fail(format!("{par} must be in [0, 1], got {p}")));
            }
        }
        if let Some(stop) = config.stop {
            if stop <= config.start {
                return Err(fail(format!("stop {stop} must be after start {}", config.start)));
            }
        }

        let disease = &mut diseases[disease_index];
        for (state, init) in config.product.states() {
            match init {
                StateInit::Bool(v) => disease.states_mut().ensure(state, v)?,
                StateInit::Float(v) => disease.states_mut().ensure(state, v)?,
                StateInit::Cat(v) => disease.states_mut().ensure(state, v)?,
            }
        }
        if let Some(problem) = config.eligibility.problems(disease).into_iter().next() {
            return Err(fail(problem));
        }

        debug!(intervention = %config.name, disease = %config.disease, delivery = ?config.delivery, "intervention added");
        self.interventions.push(Intervention {
            stream: StreamId::from_name(&config.name),
            config,
            disease_index,
            delivered: 0,
        });
        Ok(())
    }

    /// Deliver every intervention due this tick, in registration order.
    pub fn apply(
        &mut self,
        ctx: StepContext<'_>,
        diseases: &mut [Disease],
        ages: &[f64],
    ) -> InterventionResult<Vec<Delivered>> {
        let mut out = Vec::new();
        for iv in &mut self.interventions {
            if !iv.config.is_due(ctx.tick) {
                continue;
            }
            let disease = &mut diseases[iv.disease_index];
            let eligible = iv.config.eligibility.select(disease, ages);
            let recipients: Vec<Uid> = eligible
                .into_iter()
                .filter(|&u| ctx.draws.bernoulli(ctx.key(iv.stream, Purpose::Coverage, u), iv.config.coverage))
                .collect();
            let affected = iv.config.product.administer(ctx, iv.stream, disease, &recipients)?;
            iv.delivered += recipients.len();
            trace!(intervention = %iv.config.name, tick = ctx.tick.0, reached = recipients.len(), affected, "delivered");
            out.push(Delivered { name: iv.config.name.clone(), reached: recipients.len(), affected });
        }
        Ok(out)
    }
}
