//! Tests for the demo's command line and built-in scenario.

#[cfg(test)]
mod args {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use crate::Args;

    #[test]
    fn command_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["sir-demo"]).unwrap();
        assert!(args.scenario.is_none());
        assert_eq!(args.output, PathBuf::from("output/sir"));
        assert!(args.seed.is_none());
        assert!(args.replicates.is_none());
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "sir-demo", "-s", "flu.json", "--output", "out", "--seed", "7", "-r", "3",
        ])
        .unwrap();
        assert_eq!(args.scenario, Some(PathBuf::from("flu.json")));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!((args.seed, args.replicates), (Some(7), Some(3)));
    }

    #[test]
    fn bad_seed_rejected() {
        assert!(Args::try_parse_from(["sir-demo", "--seed", "many"]).is_err());
    }
}

#[cfg(test)]
mod scenario {
    use crate::scenario::Scenario;

    #[test]
    fn built_in_scenario_builds() {
        let scenario = Scenario::load(None).unwrap();
        assert_eq!(scenario.diseases.len(), 2);
        assert_eq!(scenario.interventions.len(), 1);

        let sim = scenario.build(5).unwrap();
        assert_eq!(sim.config.seed, 5);
        assert_eq!(sim.population.len(), scenario.sim.n_agents);
        assert_eq!(sim.networks.len(), 2);
    }

    #[test]
    fn age_table_replaces_crude_death_rate() {
        let mut scenario = Scenario::load(None).unwrap();
        let table = scenario.deaths_by_age.as_ref().unwrap();
        assert_eq!(table.ages.len(), table.rates.len());

        // Births plus by-age deaths; the crude rate is ignored.
        assert_eq!(scenario.build(1).unwrap().demographics.len(), 2);

        scenario.deaths_by_age.as_mut().unwrap().rates.pop();
        assert!(scenario.build(1).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Scenario::load(Some(std::path::Path::new("no/such/scenario.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("no/such/scenario.json"));
    }
}
