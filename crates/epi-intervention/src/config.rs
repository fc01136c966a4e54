//! Intervention configuration.

use epi_core::Tick;

use crate::{Eligibility, Product};

/// When an intervention is delivered.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Delivery {
    /// Every tick from `start` until `stop`; `coverage` is the per-tick
    /// probability that an eligible agent receives it.
    Routine,
    /// Once, at `start`; `coverage` is the fraction of eligible agents
    /// reached.
    Campaign,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterventionConfig {
    /// Unique name; seeds the intervention's draw stream.
    pub name:        String,
    /// Name of the disease whose states the product acts on.
    pub disease:     String,
    /// First tick of delivery.
    pub start:       Tick,
    /// First tick *without* delivery; `None` runs to the end.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stop:        Option<Tick>,
    pub coverage:    f64,
    pub delivery:    Delivery,
    pub product:     Product,
    #[cfg_attr(feature = "serde", serde(default))]
    pub eligibility: Eligibility,
}

impl InterventionConfig {
    /// Routine delivery from tick 0 with full coverage and no eligibility
    /// rules; adjust fields from there.
    pub fn new(name: impl Into<String>, disease: impl Into<String>, product: Product) -> Self {
        Self {
            name:        name.into(),
            disease:     disease.into(),
            start:       Tick::ZERO,
            stop:        None,
            coverage:    1.0,
            delivery:    Delivery::Routine,
            product,
            eligibility: Eligibility::default(),
        }
    }

    /// `true` if the intervention delivers at `tick`.
    pub fn is_due(&self, tick: Tick) -> bool {
        match self.delivery {
            Delivery::Campaign => tick == self.start,
            Delivery::Routine => tick >= self.start && self.stop.is_none_or(|stop| tick < stop),
        }
    }
}
