//! Prognoses: the immediate state change for a new infection plus the
//! scheduled times of everything that follows.

use tracing::trace;

use epi_core::{Purpose, Sampler, StepContext, Uid};
use epi_state::StateError;

use crate::disease::{
    DEAD, EXPOSED, INFECTED, SUSCEPTIBLE, TI_DEAD, TI_EXPOSED, TI_INFECTED, TI_RECOVERED,
};
use crate::{Disease, DiseaseError, DiseaseKind, DiseaseResult, InfectionRecord};

/// Scheduled outcome for one agent, in timestep units.
struct Prognosis {
    ti_infected: f64,
    ti_end:      f64,
    dies:        bool,
}

impl Disease {
    /// Infect `uids` now and schedule their progression.
    ///
    /// SEIR agents become exposed and are scheduled to turn infected after
    /// `dur_exp`; SIR/SIS agents become infected immediately.  Infection then
    /// ends after `dur_inf` in death (probability `p_death`) or recovery.
    /// Sampled durations are divided by `dt` and added to the current tick.
    ///
    /// All agents are checked and all durations sampled before any state is
    /// written: a dead or non-susceptible target fails with
    /// `InvalidStateTransition`, a negative or non-finite sample with
    /// `InvalidPrognosis`, and in both cases nothing changes.
    pub fn set_prognoses(&mut self, ctx: StepContext<'_>, uids: &[Uid], sources: &[Uid]) -> DiseaseResult<()> {
        if uids.len() != sources.len() {
            return Err(StateError::LengthMismatch {
                name:     "sources".to_owned(),
                expected: uids.len(),
                got:      sources.len(),
            }
            .into());
        }
        if uids.is_empty() {
            return Ok(());
        }
        self.check_targets(uids)?;

        let now = ctx.now();
        let sample = |sampler: &Sampler, purpose: Purpose, field: &'static str, uid: Uid| {
            let value = ctx.draws.sample(ctx.key(self.stream, purpose, uid), sampler);
            if value.is_finite() && value >= 0.0 {
                Ok(value / ctx.dt)
            } else {
                Err(DiseaseError::InvalidPrognosis { uid, tick: ctx.tick, field, value })
            }
        };

        let mut prognoses = Vec::with_capacity(uids.len());
        for &uid in uids {
            let ti_infected = match &self.pars.dur_exp {
                Some(dur_exp) => now + sample(dur_exp, Purpose::DurExposed, "dur_exp", uid)?,
                None => now,
            };
            let ti_end = ti_infected + sample(&self.pars.dur_inf, Purpose::DurInfection, "dur_inf", uid)?;
            let dies = ctx.draws.bernoulli(ctx.key(self.stream, Purpose::Death, uid), self.pars.p_death);
            prognoses.push(Prognosis { ti_infected, ti_end, dies });
        }

        // ── Write ─────────────────────────────────────────────────────────
        let states = &mut self.states;
        states.fill(SUSCEPTIBLE, uids, false)?;
        states.reset(TI_RECOVERED, uids)?;
        states.reset(TI_DEAD, uids)?;
        match self.kind {
            DiseaseKind::Seir => {
                states.fill(EXPOSED, uids, true)?;
                states.fill(TI_EXPOSED, uids, now)?;
            }
            DiseaseKind::Sir | DiseaseKind::Sis => {
                states.fill(INFECTED, uids, true)?;
            }
        }
        let ti_infected: Vec<f64> = prognoses.iter().map(|p| p.ti_infected).collect();
        states.set(TI_INFECTED, uids, &ti_infected)?;

        let ti_dead = states.column_mut::<f64>(TI_DEAD)?;
        for (uid, p) in uids.iter().zip(&prognoses) {
            if p.dies {
                ti_dead[uid.index()] = p.ti_end;
            }
        }
        let ti_recovered = states.column_mut::<f64>(TI_RECOVERED)?;
        for (uid, p) in uids.iter().zip(&prognoses) {
            if !p.dies {
                ti_recovered[uid.index()] = p.ti_end;
            }
        }

        for (&target, &source) in uids.iter().zip(sources) {
            self.log.push(InfectionRecord { tick: ctx.tick, target, source });
        }
        self.tally.roll(ctx.tick).new_infections += uids.len();
        trace!(disease = %self.name, tick = ctx.tick.0, n = uids.len(), "prognoses set");
        Ok(())
    }

    /// Every target must exist, be alive and susceptible, and appear once.
    fn check_targets(&self, uids: &[Uid]) -> DiseaseResult<()> {
        self.states.check_uids(uids)?;
        let susceptible = self.states.column::<bool>(SUSCEPTIBLE)?;
        let dead = self.states.column::<bool>(DEAD)?;
        for &uid in uids {
            let detail = if dead[uid.index()] || !self.states.is_active(uid) {
                "cannot infect a dead agent"
            } else if !susceptible[uid.index()] {
                "agent is not susceptible"
            } else {
                continue;
            };
            return Err(DiseaseError::InvalidStateTransition { uid, detail: detail.to_owned() });
        }
        let mut sorted = uids.to_vec();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(DiseaseError::InvalidStateTransition {
                uid:    w[0],
                detail: "infected twice in one call".to_owned(),
            });
        }
        Ok(())
    }
}
