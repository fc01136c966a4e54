//! Products: what happens to an agent who receives an intervention.
//!
//! A product holds parameters only.  Scheduling and targeting belong to the
//! [`Intervention`](crate::Intervention) that delivers it.

use epi_core::{Purpose, StepContext, StreamId, Uid};
use epi_disease::Disease;
use epi_disease::disease::{INFECTED, REL_SUS};
use epi_state::StateInit;

use crate::InterventionResult;

pub const VACCINATED: &str = "vaccinated";
pub const TREATED:    &str = "treated";
pub const DIAGNOSED:  &str = "diagnosed";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "product", rename_all = "lowercase")
)]
pub enum Product {
    /// Scales `rel_sus` by `1 - efficacy` and sets `vaccinated`.  Agents
    /// already vaccinated are left unchanged.
    Vaccine { efficacy: f64 },
    /// Cures each infected recipient with probability `efficacy`; sets
    /// `treated` on every recipient.
    Treatment { efficacy: f64 },
    /// Sets `diagnosed` for infected recipients with probability
    /// `sensitivity`, and for uninfected ones with probability
    /// `1 - specificity`.
    Diagnostic { sensitivity: f64, specificity: f64 },
}

impl Product {
    /// States this product writes, registered on the target disease when
    /// the intervention is added.
    pub fn states(&self) -> [(&'static str, StateInit); 1] {
        match self {
            Product::Vaccine { .. } => [(VACCINATED, StateInit::Bool(false))],
            Product::Treatment { .. } => [(TREATED, StateInit::Bool(false))],
            Product::Diagnostic { .. } => [(DIAGNOSED, StateInit::Bool(false))],
        }
    }

    /// Parameters that must be probabilities.
    pub(crate) fn probabilities(&self) -> Vec<(&'static str, f64)> {
        match *self {
            Product::Vaccine { efficacy } | Product::Treatment { efficacy } => vec![("efficacy", efficacy)],
            Product::Diagnostic { sensitivity, specificity } => {
                vec![("sensitivity", sensitivity), ("specificity", specificity)]
            }
        }
    }

    /// Apply to `uids`.  Returns how many agents changed state in a
    /// product-specific sense (newly vaccinated, cured, diagnosed).
    pub fn administer(
        &self,
        ctx: StepContext<'_>,
        stream: StreamId,
        disease: &mut Disease,
        uids: &[Uid],
    ) -> InterventionResult<usize> {
        match *self {
            Product::Vaccine { efficacy } => {
                // A repeat dose does not stack.
                let vaccinated = disease.states().column::<bool>(VACCINATED)?;
                let fresh: Vec<Uid> = uids.iter().copied().filter(|u| !vaccinated[u.index()]).collect();
                let rel_sus = disease.states_mut().column_mut::<f64>(REL_SUS)?;
                for uid in &fresh {
                    rel_sus[uid.index()] *= 1.0 - efficacy;
                }
                disease.states_mut().fill(VACCINATED, &fresh, true)?;
                Ok(fresh.len())
            }
            Product::Treatment { efficacy } => {
                let infected = disease.states().column::<bool>(INFECTED)?;
                let effective: Vec<Uid> = uids
                    .iter()
                    .copied()
                    .filter(|&u| infected[u.index()])
                    .filter(|&u| ctx.draws.bernoulli(ctx.key(stream, Purpose::Efficacy, u), efficacy))
                    .collect();
                disease.states_mut().fill(TREATED, uids, true)?;
                Ok(disease.cure(ctx, &effective)?.len())
            }
            Product::Diagnostic { sensitivity, specificity } => {
                let infected = disease.states().column::<bool>(INFECTED)?;
                let positive: Vec<Uid> = uids
                    .iter()
                    .copied()
                    .filter(|&u| {
                        let p = if infected[u.index()] { sensitivity } else { 1.0 - specificity };
                        ctx.draws.bernoulli(ctx.key(stream, Purpose::Diagnosis, u), p)
                    })
                    .collect();
                disease.states_mut().fill(DIAGNOSED, &positive, true)?;
                Ok(positive.len())
            }
        }
    }
}
