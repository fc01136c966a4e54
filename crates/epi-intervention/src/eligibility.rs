//! Who may receive an intervention.

use epi_core::Uid;
use epi_disease::Disease;
use epi_state::StateKind;

/// Extra test applied after the declarative rules.
pub type EligibilityFn = fn(&Disease, Uid) -> bool;

/// Conjunction of rules over the target disease's bool states and the
/// population's ages.  An empty `Eligibility` admits every alive agent.
///
/// ```rust,ignore
/// // Susceptible adults not yet vaccinated.
/// Eligibility::default().all_of("susceptible").none_of("vaccinated").min_age(18.0)
/// ```
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct Eligibility {
    /// States that must all be true.
    pub all_of:  Vec<String>,
    /// States that must all be false.
    pub none_of: Vec<String>,
    /// Inclusive lower age bound.
    pub min_age: Option<f64>,
    /// Exclusive upper age bound.
    pub max_age: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub custom:  Option<EligibilityFn>,
}

impl Eligibility {
    pub fn all_of(mut self, state: &str) -> Self {
        self.all_of.push(state.to_owned());
        self
    }

    pub fn none_of(mut self, state: &str) -> Self {
        self.none_of.push(state.to_owned());
        self
    }

    pub fn min_age(mut self, age: f64) -> Self {
        self.min_age = Some(age);
        self
    }

    pub fn max_age(mut self, age: f64) -> Self {
        self.max_age = Some(age);
        self
    }

    pub fn custom(mut self, f: EligibilityFn) -> Self {
        self.custom = Some(f);
        self
    }

    /// Reasons this predicate cannot be evaluated against `disease`.
    pub(crate) fn problems(&self, disease: &Disease) -> Vec<String> {
        let mut out = Vec::new();
        for state in self.all_of.iter().chain(&self.none_of) {
            match disease.states().kind(state) {
                Some(StateKind::Bool) => {}
                Some(kind) => out.push(format!("eligibility state '{state}' is {kind:?}, expected Bool")),
                None => out.push(format!("eligibility references undefined state '{state}'")),
            }
        }
        if let (Some(lo), Some(hi)) = (self.min_age, self.max_age) {
            if lo >= hi {
                out.push(format!("min_age {lo} must be below max_age {hi}"));
            }
        }
        out
    }

    /// Alive agents satisfying every rule, ascending.  O(rows).
    pub fn select(&self, disease: &Disease, ages: &[f64]) -> Vec<Uid> {
        let states = disease.states();
        let columns = |names: &[String]| -> Vec<&[bool]> {
            names.iter().filter_map(|n| states.column::<bool>(n).ok()).collect()
        };
        let required = columns(&self.all_of);
        let excluded = columns(&self.none_of);
        let age_ok = |i: usize| {
            let age = ages.get(i).copied().unwrap_or(f64::NAN);
            self.min_age.is_none_or(|lo| age >= lo) && self.max_age.is_none_or(|hi| age < hi)
        };

        states
            .active()
            .iter()
            .enumerate()
            .filter(|&(i, &alive)| {
                alive
                    && required.iter().all(|c| c[i])
                    && !excluded.iter().any(|c| c[i])
                    && age_ok(i)
            })
            .map(|(i, _)| Uid(i as u32))
            .filter(|&u| self.custom.is_none_or(|f| f(disease, u)))
            .collect()
    }
}
