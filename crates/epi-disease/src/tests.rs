//! Unit tests for epi-disease.

#[cfg(test)]
mod helpers {
    use epi_core::Uid;

    use crate::{Disease, DiseaseConfig, DiseaseKind};

    /// `n` agents, constant durations, no deaths unless asked for.
    pub fn disease(kind: DiseaseKind, beta: f64, p_death: f64, n: usize) -> Disease {
        let mut config = DiseaseConfig::new("flu", kind)
            .par("beta", beta)
            .par("init_prev", 0.0)
            .par("dur_inf", 5.0)
            .par("p_death", p_death);
        if kind == DiseaseKind::Seir {
            config = config.par("dur_exp", 2.0);
        }
        let mut d = Disease::new(config).unwrap();
        d.add_agents(n);
        d
    }

    pub fn uids(ids: &[u32]) -> Vec<Uid> {
        ids.iter().copied().map(Uid).collect()
    }
}

#[cfg(test)]
mod config {
    use epi_core::Dist;

    use crate::{DiseaseConfig, DiseaseError, DiseaseKind, DiseasePars, ParValue};

    #[test]
    fn parses_json() {
        let json = r#"{
            "name": "measles",
            "kind": "seir",
            "pars": {
                "beta": 0.3,
                "dur_exp": { "dist": "lognormal", "mean": 8.0, "std": 2.0 },
                "dur_inf": 11.0
            },
            "states": [ { "name": "hospitalised", "default": { "bool": false } } ]
        }"#;
        let config: DiseaseConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.kind, DiseaseKind::Seir);
        assert_eq!(config.pars["beta"], ParValue::Scalar(0.3));
        assert_eq!(config.pars["dur_exp"], ParValue::Dist(Dist::lognormal(8.0, 2.0)));
        assert_eq!(config.states[0].name, "hospitalised");

        let pars = DiseasePars::from_config(&config).unwrap();
        assert_eq!(pars.beta, 0.3);
        assert!(pars.dur_exp.is_some());
        assert_eq!(pars.p_death, 0.01);
    }

    #[test]
    fn unknown_parameter_rejected() {
        let config = DiseaseConfig::new("sir", DiseaseKind::Sir).par("beta", 0.1).par("btea", 0.2);
        let err = DiseasePars::from_config(&config).unwrap_err();
        assert!(matches!(err, DiseaseError::Config(msg) if msg.contains("btea")));
    }

    #[test]
    fn latent_period_only_for_seir() {
        let config = DiseaseConfig::new("sir", DiseaseKind::Sir).par("beta", 0.1).par("dur_exp", 3.0);
        assert!(DiseasePars::from_config(&config).is_err());
    }

    #[test]
    fn beta_is_required() {
        let config = DiseaseConfig::new("sir", DiseaseKind::Sir);
        assert!(matches!(DiseasePars::from_config(&config), Err(DiseaseError::Config(_))));
    }

    #[test]
    fn probabilities_checked() {
        for (par, value) in [("beta", 1.5), ("init_prev", -0.1), ("p_death", f64::NAN)] {
            let config = DiseaseConfig::new("sir", DiseaseKind::Sir).par("beta", 0.1).par(par, value);
            assert!(DiseasePars::from_config(&config).is_err(), "{par} = {value}");
        }
        let config = DiseaseConfig::new("sir", DiseaseKind::Sir).par("beta", Dist::constant(0.1));
        assert!(DiseasePars::from_config(&config).is_err());
    }

    #[test]
    fn possibly_negative_duration_rejected() {
        let config = DiseaseConfig::new("sir", DiseaseKind::Sir)
            .par("beta", 0.1)
            .par("dur_inf", Dist::Normal { mean: 5.0, std: 1.0 });
        assert!(matches!(DiseasePars::from_config(&config), Err(DiseaseError::Core(_))));
    }
}

#[cfg(test)]
mod pipeline {
    use epi_core::{DrawStream, StepContext, Tick};
    use epi_state::StateStore;

    use super::helpers::{disease, uids};
    use crate::disease::{INFECTED, RECOVERED, TI_DEAD, TI_RECOVERED};
    use crate::{DiseaseError, DiseaseKind, DiseaseResult, StepOutcome, Transition};

    #[test]
    fn default_orders() {
        assert_eq!(disease(DiseaseKind::Sir, 0.0, 0.0, 0).pipeline().names(), ["die", "recover"]);
        assert_eq!(disease(DiseaseKind::Seir, 0.0, 0.0, 0).pipeline().names(), ["die", "infect", "recover"]);
    }

    #[test]
    fn edit_reorders_explicitly() {
        let mut d = disease(DiseaseKind::Sir, 0.0, 0.0, 0);
        d.edit_pipeline(|p| p.move_before("recover", "die")).unwrap();
        assert_eq!(d.pipeline().names(), ["recover", "die"]);

        fn noop(_: &mut StateStore, _: StepContext<'_>, _: &mut StepOutcome) -> DiseaseResult<()> {
            Ok(())
        }
        d.edit_pipeline(|p| p.insert_before("die", "custom", Transition::Custom(noop))).unwrap();
        assert_eq!(d.pipeline().names(), ["recover", "custom", "die"]);
    }

    #[test]
    fn edit_errors_leave_pipeline_unchanged() {
        let mut d = disease(DiseaseKind::Sir, 0.0, 0.0, 0);
        assert!(d.edit_pipeline(|p| p.move_before("recover", "nope")).is_err());
        assert!(d.edit_pipeline(|p| p.push("die", Transition::die(TI_DEAD))).is_err());
        let err = d.edit_pipeline(|p| p.push("wane", Transition::progress(RECOVERED, "immune", TI_RECOVERED)));
        assert!(matches!(err, Err(DiseaseError::State(_))));
        assert_eq!(d.pipeline().names(), ["die", "recover"]);
    }

    #[test]
    fn death_preempts_recovery() {
        let draws = DrawStream::new(1);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.0, 0.0, 2);
        d.infect(ctx, &uids(&[0, 1])).unwrap();
        // Agent 0 has both events due at tick 5.
        d.states_mut().fill(TI_DEAD, &uids(&[0]), 5.0).unwrap();

        let deaths = d.step_state(StepContext::new(Tick(5), 1.0, &draws)).unwrap();
        assert_eq!(deaths, uids(&[0]));
        let infected = d.states().column::<bool>(INFECTED).unwrap();
        assert!(infected[0], "dying agent must not recover first");
        assert!(!infected[1]);
    }

    #[test]
    fn reordered_recovery_runs_first() {
        let draws = DrawStream::new(1);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.0, 0.0, 1);
        d.edit_pipeline(|p| p.move_before("recover", "die")).unwrap();
        d.infect(ctx, &uids(&[0])).unwrap();
        d.states_mut().fill(TI_DEAD, &uids(&[0]), 5.0).unwrap();

        let deaths = d.step_state(StepContext::new(Tick(5), 1.0, &draws)).unwrap();
        assert_eq!(deaths, uids(&[0]));
        assert!(d.states().get_one::<bool>(RECOVERED, uids(&[0])[0]).unwrap());
    }
}

#[cfg(test)]
mod disease {
    use epi_core::{DrawStream, Sampler, StepContext, Tick, Uid};
    use epi_state::{StateDef, StateError};

    use super::helpers::{disease, uids};
    use crate::disease::{
        DEAD, EXPOSED, INFECTED, RECOVERED, SUSCEPTIBLE, TI_DEAD, TI_INFECTED, TI_RECOVERED,
    };
    use crate::{Disease, DiseaseConfig, DiseaseError, DiseaseKind};

    #[test]
    fn standard_and_extra_states() {
        let config = DiseaseConfig::new("flu", DiseaseKind::Sir)
            .par("beta", 0.1)
            .state(StateDef::bool("hospitalised", false));
        let d = Disease::new(config).unwrap();
        for name in [SUSCEPTIBLE, INFECTED, RECOVERED, DEAD, TI_RECOVERED, "rel_sus", "hospitalised"] {
            assert!(d.states().contains(name), "{name}");
        }

        let clash = DiseaseConfig::new("flu", DiseaseKind::Sir)
            .par("beta", 0.1)
            .state(StateDef::float(INFECTED, 0.0));
        assert!(matches!(Disease::new(clash), Err(DiseaseError::State(StateError::DuplicateState(_)))));
    }

    #[test]
    fn scenario_single_agent_recovers_at_five() {
        let draws = DrawStream::new(7);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 1);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &[Uid(0)]).unwrap();
        assert_eq!(d.states().get_one::<f64>(TI_RECOVERED, Uid(0)).unwrap(), 5.0);

        for t in 0..10 {
            d.step_state(StepContext::new(Tick(t), 1.0, &draws)).unwrap();
            let infected = d.states().get_one::<bool>(INFECTED, Uid(0)).unwrap();
            let recovered = d.states().get_one::<bool>(RECOVERED, Uid(0)).unwrap();
            assert_eq!(recovered, t >= 5, "tick {t}");
            assert_eq!(infected, t < 5, "tick {t}");
        }
    }

    #[test]
    fn seir_progresses_through_exposed() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Seir, 0.5, 0.0, 1);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &[Uid(0)]).unwrap();
        assert!(d.states().get_one::<bool>(EXPOSED, Uid(0)).unwrap());
        assert_eq!(d.states().get_one::<f64>(TI_INFECTED, Uid(0)).unwrap(), 2.0);
        assert_eq!(d.states().get_one::<f64>(TI_RECOVERED, Uid(0)).unwrap(), 7.0);

        d.step_state(StepContext::new(Tick(2), 1.0, &draws)).unwrap();
        assert!(d.states().get_one::<bool>(INFECTED, Uid(0)).unwrap());
        assert!(!d.states().get_one::<bool>(EXPOSED, Uid(0)).unwrap());
    }

    #[test]
    fn durations_scale_with_dt() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 1);
        d.infect(StepContext::new(Tick(4), 0.5, &draws), &[Uid(0)]).unwrap();
        // 5 time units at dt = 0.5 is 10 ticks.
        assert_eq!(d.states().get_one::<f64>(TI_RECOVERED, Uid(0)).unwrap(), 14.0);
    }

    #[test]
    fn sis_returns_to_susceptible_and_can_reinfect() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sis, 0.5, 0.0, 1);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &[Uid(0)]).unwrap();
        d.step_state(StepContext::new(Tick(5), 1.0, &draws)).unwrap();
        assert!(d.states().get_one::<bool>(SUSCEPTIBLE, Uid(0)).unwrap());
        d.infect(StepContext::new(Tick(6), 1.0, &draws), &[Uid(0)]).unwrap();
        assert_eq!(d.states().get_one::<f64>(TI_RECOVERED, Uid(0)).unwrap(), 11.0);
        assert_eq!(d.infection_log().len(), 2);
    }

    #[test]
    fn certain_death_schedules_ti_dead_only() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sir, 0.5, 1.0, 1);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &[Uid(0)]).unwrap();
        assert_eq!(d.states().get_one::<f64>(TI_DEAD, Uid(0)).unwrap(), 5.0);
        assert!(d.states().get_one::<f64>(TI_RECOVERED, Uid(0)).unwrap().is_nan());
    }

    #[test]
    fn reinfection_of_infected_is_rejected_atomically() {
        let draws = DrawStream::new(2);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 3);
        d.infect(ctx, &[Uid(1)]).unwrap();
        let err = d.infect(ctx, &uids(&[0, 1])).unwrap_err();
        assert!(matches!(err, DiseaseError::InvalidStateTransition { uid: Uid(1), .. }));
        assert!(d.states().get_one::<bool>(SUSCEPTIBLE, Uid(0)).unwrap(), "no partial write");
        assert!(matches!(d.infect(ctx, &uids(&[2, 2])), Err(DiseaseError::InvalidStateTransition { .. })));
        assert!(matches!(d.infect(ctx, &[Uid(9)]), Err(DiseaseError::State(StateError::InvalidUid(_)))));
    }

    #[test]
    fn dead_cannot_be_infected() {
        let draws = DrawStream::new(2);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 2);
        d.step_die(Tick(0), &[Uid(0)]).unwrap();
        assert!(matches!(d.infect(ctx, &[Uid(0)]), Err(DiseaseError::InvalidStateTransition { .. })));
    }

    #[test]
    fn bad_sample_is_invalid_prognosis() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 1);
        d.pars.dur_inf = Sampler::Constant(-1.0);
        let err = d.infect(StepContext::new(Tick(3), 1.0, &draws), &[Uid(0)]).unwrap_err();
        assert!(matches!(
            err,
            DiseaseError::InvalidPrognosis { uid: Uid(0), tick: Tick(3), field: "dur_inf", .. }
        ));
        assert!(d.states().get_one::<bool>(SUSCEPTIBLE, Uid(0)).unwrap());
    }

    #[test]
    fn init_prev_seeds_fraction() {
        let draws = DrawStream::new(4);
        let config = DiseaseConfig::new("flu", DiseaseKind::Sir).par("beta", 0.1).par("init_prev", 0.2);
        let mut d = Disease::new(config).unwrap();
        let all = d.add_agents(10_000);
        let seeded = d.init_state(StepContext::new(Tick(0), 1.0, &draws), &all).unwrap();
        let frac = seeded.len() as f64 / 10_000.0;
        assert!((frac - 0.2).abs() < 0.02, "got {frac}");
        assert!(d.infection_log().iter().all(|r| !r.source.is_valid()));
    }

    #[test]
    fn step_die_clears_and_counts() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sir, 0.5, 1.0, 3);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &uids(&[0, 1])).unwrap();

        let deaths = d.step_state(StepContext::new(Tick(5), 1.0, &draws)).unwrap();
        assert_eq!(deaths, uids(&[0, 1]));
        // Agent 2 dies of something else in the same tick.
        d.step_die(Tick(5), &uids(&[0, 1, 2])).unwrap();

        for uid in uids(&[0, 1, 2]) {
            assert!(d.states().get_one::<bool>(DEAD, uid).unwrap());
            assert!(!d.states().get_one::<bool>(INFECTED, uid).unwrap());
            assert!(!d.states().get_one::<bool>(SUSCEPTIBLE, uid).unwrap());
            assert_eq!(d.states().get_one::<f64>(TI_DEAD, uid).unwrap(), 5.0);
            assert!(d.states().get_one::<f64>(TI_INFECTED, uid).unwrap().is_nan());
        }
        let counts = d.counts().unwrap();
        assert_eq!(counts.n_dead, 3);
        assert_eq!(counts.new_deaths, 2);
        assert!(counts.is_conserved());
        d.check_compartments().unwrap();

        assert!(matches!(d.step_die(Tick(6), &[Uid(0)]), Err(DiseaseError::State(StateError::InvalidUid(_)))));
    }

    #[test]
    fn cure_cancels_death() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sir, 0.5, 1.0, 2);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &[Uid(0)]).unwrap();
        let cured = d.cure(StepContext::new(Tick(2), 1.0, &draws), &uids(&[0, 1])).unwrap();
        assert_eq!(cured, uids(&[0]));
        assert!(d.states().get_one::<bool>(RECOVERED, Uid(0)).unwrap());
        assert!(d.states().get_one::<f64>(TI_DEAD, Uid(0)).unwrap().is_nan());
        assert!(d.step_state(StepContext::new(Tick(5), 1.0, &draws)).unwrap().is_empty());
    }

    #[test]
    fn counts_and_prevalence() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 4);
        d.step_state(StepContext::new(Tick(1), 1.0, &draws)).unwrap();
        d.infect(StepContext::new(Tick(1), 1.0, &draws), &[Uid(3)]).unwrap();
        let c = d.counts().unwrap();
        assert_eq!((c.n_susceptible, c.n_infected, c.n_total), (3, 1, 4));
        assert_eq!(c.new_infections, 1);
        assert_eq!(c.prevalence, 0.25);
        // The next tick starts a fresh tally.
        d.step_state(StepContext::new(Tick(2), 1.0, &draws)).unwrap();
        assert_eq!(d.counts().unwrap().new_infections, 0);
    }

    #[test]
    fn exclusivity_violation_detected() {
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, 2);
        d.states_mut().fill(INFECTED, &[Uid(1)], true).unwrap();
        assert!(matches!(
            d.check_compartments(),
            Err(DiseaseError::InvalidStateTransition { uid: Uid(1), .. })
        ));
    }

    #[test]
    fn widened_infectious_predicate() {
        let draws = DrawStream::new(2);
        let mut d = disease(DiseaseKind::Seir, 0.5, 0.0, 2).with_infectious(EXPOSED).unwrap();
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &[Uid(0)]).unwrap();
        assert!(d.is_infectious(Uid(0)).unwrap());
        assert_eq!(d.infectious_mask().unwrap(), vec![true, false]);
        assert!(disease(DiseaseKind::Sir, 0.5, 0.0, 1).with_infectious("rel_sus").is_err());
    }
}

#[cfg(test)]
mod transmission {
    use epi_core::{DrawStream, StepContext, Tick, Uid};
    use epi_network::{ContactNetwork, Edge, EdgeList, StaticNetwork};

    use super::helpers::{disease, uids};
    use crate::disease::REL_SUS;
    use crate::{Disease, DiseaseKind};

    fn nets(list: Vec<StaticNetwork>) -> Vec<Box<dyn ContactNetwork>> {
        list.into_iter().map(|n| Box::new(n) as Box<dyn ContactNetwork>).collect()
    }

    #[test]
    fn certain_transmission_over_one_edge() {
        let draws = DrawStream::new(3);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 1.0, 0.0, 2);
        d.infect(ctx, &[Uid(0)]).unwrap();
        let networks = nets(vec![StaticNetwork::from_pairs("pair", &[(Uid(1), Uid(0))], 1.0)]);

        let cases = d.make_new_cases(ctx, &networks).unwrap();
        assert_eq!(cases.uids, vec![Uid(1)]);
        assert_eq!(cases.sources, vec![Uid(0)]);
    }

    #[test]
    fn directed_edges_only_transmit_forward() {
        let draws = DrawStream::new(3);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 1.0, 0.0, 2);
        d.infect(ctx, &[Uid(0)]).unwrap();
        let backwards = nets(vec![StaticNetwork::from_pairs("d", &[(Uid(1), Uid(0))], 1.0).directed(true)]);
        assert!(d.make_new_cases(ctx, &backwards).unwrap().is_empty());
    }

    #[test]
    fn zero_susceptibility_blocks() {
        let draws = DrawStream::new(3);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 1.0, 0.0, 2);
        d.infect(ctx, &[Uid(0)]).unwrap();
        d.states_mut().fill(REL_SUS, &[Uid(1)], 0.0).unwrap();
        let networks = nets(vec![StaticNetwork::complete("all", 2)]);
        assert!(d.make_new_cases(ctx, &networks).unwrap().is_empty());
    }

    #[test]
    fn probability_formula() {
        assert_eq!(Disease::transmission_prob(0.5, 1.0, 1.0, 1.0), 0.5);
        assert_eq!(Disease::transmission_prob(0.5, 4.0, 1.0, 1.0), 1.0);
        assert_eq!(Disease::transmission_prob(0.5, 1.0, 0.5, 0.5), 0.125);
        assert_eq!(Disease::transmission_prob(0.5, f64::NAN, 1.0, 1.0), 0.0);
    }

    #[test]
    fn any_success_policy_compounds() {
        // Every target has two infectious contacts at p = 0.5 each.
        let n = 10_000u32;
        let draws = DrawStream::new(21);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.5, 0.0, n as usize + 2);
        d.infect(ctx, &uids(&[0, 1])).unwrap();
        let mut pairs = Vec::new();
        for t in 2..n + 2 {
            pairs.push((Uid(0), Uid(t)));
            pairs.push((Uid(1), Uid(t)));
        }
        let networks = nets(vec![StaticNetwork::from_pairs("hubs", &pairs, 1.0)]);
        let cases = d.make_new_cases(ctx, &networks).unwrap();
        let frac = cases.len() as f64 / n as f64;
        assert!((frac - 0.75).abs() < 0.02, "got {frac}");

        // Both sources get attributed; roughly evenly.
        let from_zero = cases.sources.iter().filter(|s| **s == Uid(0)).count() as f64 / cases.len() as f64;
        assert!((from_zero - 0.5).abs() < 0.05, "got {from_zero}");
    }

    #[test]
    fn duplicate_edges_are_one_opportunity() {
        let draws = DrawStream::new(8);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let n = 2_000u32;
        let mut d = disease(DiseaseKind::Sir, 0.3, 0.0, n as usize + 1);
        d.infect(ctx, &[Uid(0)]).unwrap();

        let single: Vec<(Uid, Uid)> = (1..=n).map(|t| (Uid(0), Uid(t))).collect();
        let doubled: Vec<(Uid, Uid)> = single.iter().flat_map(|&p| [p, p]).collect();
        let a = d.make_new_cases(ctx, &nets(vec![StaticNetwork::from_pairs("net", &single, 1.0)])).unwrap();
        let b = d.make_new_cases(ctx, &nets(vec![StaticNetwork::from_pairs("net", &doubled, 1.0)])).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn edge_order_does_not_matter() {
        let draws = DrawStream::new(5);
        let ctx = StepContext::new(Tick(2), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.4, 0.0, 50);
        d.infect(StepContext::new(Tick(0), 1.0, &draws), &uids(&[0, 7, 13])).unwrap();

        let mut forward = EdgeList::new();
        for i in 0..50u32 {
            for j in (i + 1)..50 {
                forward.push(Edge { p1: Uid(i), p2: Uid(j), beta: 1.0, dur: f64::INFINITY, start: Tick(0) });
            }
        }
        let mut backward = EdgeList::new();
        for i in (0..forward.len()).rev() {
            let mut e = forward.get(i);
            std::mem::swap(&mut e.p1, &mut e.p2);
            backward.push(e);
        }
        let a = d.make_new_cases(ctx, &nets(vec![StaticNetwork::from_edges("net", forward)])).unwrap();
        let b = d.make_new_cases(ctx, &nets(vec![StaticNetwork::from_edges("net", backward)])).unwrap();
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn zero_beta_short_circuits() {
        let draws = DrawStream::new(5);
        let ctx = StepContext::new(Tick(0), 1.0, &draws);
        let mut d = disease(DiseaseKind::Sir, 0.0, 0.0, 3);
        d.infect(ctx, &[Uid(0)]).unwrap();
        let networks = nets(vec![StaticNetwork::complete("all", 3)]);
        assert!(d.make_new_cases(ctx, &networks).unwrap().is_empty());
    }
}
