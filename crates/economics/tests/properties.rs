use proptest::prelude::*;
use stakesim_economics::*;

// Yield must stay positive so that a deserting staked cohort is pulled back
// before the staked fraction underflows.
fn policy() -> impl Strategy<Value = Policy> {
    prop_oneof![
        Just(Policy::Constant),
        (0.0f64..0.2, 0.005f64..0.1)
            .prop_map(|(location, scale)| Policy::Proactive { location, scale }),
    ]
}

prop_compose! {
    fn parameters()(
        base in 0.01f64..0.2,
        floor_share in 0.1f64..=1.0,
        disinflation in -0.5f64..=0.0,
        commission in 0.0f64..=0.5,
        uptime in 0.5f64..=1.0,
        valuation in 1.0f64..10_000.0,
        staked_policy in policy(),
        unstaked_policy in policy(),
    ) -> SimulationParameters {
        SimulationParameters {
            base_inflation_rate: base,
            disinflation_rate: disinflation,
            long_term_inflation_rate: base * floor_share,
            validator_commission: commission,
            validator_uptime: uptime,
            initial_valuation: valuation,
            staked_policy,
            unstaked_policy,
        }
    }
}

fn run(params: &SimulationParameters, supply: f64, staked: f64, steps: usize) -> Trajectory {
    let state = SimulationState::initial(params, supply, staked).unwrap();
    build_simulation(params.clone(), state, steps)
        .unwrap()
        .run()
        .unwrap()
}

proptest! {
    #[test]
    fn runs_are_deterministic(
        params in parameters(),
        supply in 1.0f64..1e10,
        staked in 0.05f64..=1.0,
        steps in 1usize..40,
    ) {
        let a = run(&params, supply, staked, steps);
        let b = run(&params, supply, staked, steps);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn trajectories_respect_invariants(
        params in parameters(),
        supply in 1.0f64..1e10,
        staked in 0.05f64..=1.0,
        steps in 1usize..40,
    ) {
        let t = run(&params, supply, staked, steps);
        prop_assert_eq!(t.len(), steps);

        for (i, row) in t.iter().enumerate() {
            prop_assert_eq!(row.timestep, i as u64);
            prop_assert!(row.perc_staked > 0.0 && row.perc_staked <= 1.0);
            prop_assert!(row.unstaked_dilution <= 0.0);
            if row.perc_staked < 1.0 {
                prop_assert!(row.staked_dilution >= row.unstaked_dilution);
            }
            prop_assert_eq!(
                row.staker_yield,
                row.inflation * params.validator_uptime * (1.0 - params.validator_commission)
                    / row.perc_staked
            );
            if i > 0 {
                prop_assert!(row.total_supply >= t[i - 1].total_supply);
                prop_assert!(row.inflation >= params.long_term_inflation_rate);
            }
        }
    }

    #[test]
    fn inflation_never_exceeds_base_or_drops_below_floor(
        base in 0.0f64..0.3,
        floor_share in 0.0f64..=1.0,
        disinflation in -0.9f64..=0.0,
        timestep in 0u64..200,
    ) {
        let floor = base * floor_share;
        let rate = compute_inflation_rate(base, disinflation, floor, timestep);
        prop_assert!(rate >= floor);
        prop_assert!(rate <= base);
    }

    #[test]
    fn retention_stays_in_unit_interval(
        policy in policy(),
        previous_yield in 0.0f64..10.0,
    ) {
        for behavior in [Behavior::Staked, Behavior::Unstaked] {
            let r = policy.retention(previous_yield, behavior);
            prop_assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn inverted_rates_never_build(
        base in 0.0f64..0.2,
        excess in 1e-6f64..0.2,
    ) {
        let params = SimulationParameters {
            base_inflation_rate: base,
            long_term_inflation_rate: base + excess,
            ..Default::default()
        };
        let state = SimulationState::initial(&params, 100.0, 0.5).unwrap();
        let is_ordering_error = matches!(
            build_simulation(params, state, 5),
            Err(SimulationError::Config(ConfigError::InflationOrdering { .. }))
        );
        prop_assert!(is_ordering_error);
    }
}
