//! End-to-end planning lock tests.
//!
//! - Every path starts at the start state and ends at the goal state.
//! - Every state respects the velocity and acceleration limits.
//! - Forward steps integrate exactly; only the final snap onto the goal (and
//!   onto the free state, for constrained goals) may jump.
//! - Constrained scenarios never leave the feasible set.
//! - Seeded random trips finish inside their iteration budgets.

use kinoplan_kernel::state::KinematicState;
use kinoplan_planner::{KinematicGraph, Plan, PlanError, PlannerConfig, PlanObserver, StateId};
use kinoplan_search::NeighborOutcome;
use lock_tests::{clearance, gantry, init_tracing, lift_off, line, planar, Scenario};
use proptest::prelude::*;
use proptest::test_runner::{Config, RngAlgorithm, TestCaseResult, TestRng, TestRunner};

fn assert_endpoints(scenario: &Scenario, plan: &Plan) {
    let precision = scenario.config.precision;
    assert_eq!(
        plan.path.first(),
        Some(&scenario.start.rounded(precision)),
        "{}: path must start at the start state",
        scenario.name
    );
    assert_eq!(
        plan.path.last(),
        Some(&scenario.goal.rounded(precision)),
        "{}: path must end at the goal state",
        scenario.name
    );
}

fn assert_within_limits(scenario: &Scenario, plan: &Plan) {
    let config = &scenario.config;
    for (i, state) in plan.path.iter().enumerate() {
        for axis in 0..config.dimensions {
            assert!(
                state.velocity()[axis].abs() <= config.max_velocity[axis],
                "{}: path[{i}] exceeds velocity limit: {state:?}",
                scenario.name
            );
            assert!(
                state.acceleration()[axis].abs() <= config.max_acceleration[axis],
                "{}: path[{i}] exceeds acceleration limit: {state:?}",
                scenario.name
            );
        }
    }
}

fn assert_integrates(scenario: &Scenario, plan: &Plan, snaps: usize) {
    let forward = &plan.path[..plan.path.len() - snaps];
    for (i, pair) in forward.windows(2).enumerate() {
        let stepped = pair[0]
            .step(pair[1].acceleration())
            .unwrap()
            .rounded(plan.precision);
        assert_eq!(
            stepped, pair[1],
            "{}: step {i} does not integrate",
            scenario.name
        );
    }
}

// ---------------------------------------------------------------------------
// Unconstrained
// ---------------------------------------------------------------------------

#[test]
fn line_plan_is_kinematically_consistent() {
    init_tracing();
    let scenario = line();
    let plan = scenario.solve().unwrap();
    assert_endpoints(&scenario, &plan);
    assert_within_limits(&scenario, &plan);
    assert_integrates(&scenario, &plan, 1);
    assert_eq!(plan.stats.jerk, vec![5.0]);
    assert!(plan.stats.search.iterations > 0);
    assert!(plan.stats.lookups >= plan.stats.lookup_hits);
}

#[test]
fn line_plan_never_reverses_direction() {
    init_tracing();
    let scenario = line();
    let plan = scenario.solve().unwrap();
    let mut previous = 0.0_f64;
    for state in &plan.path {
        let v = state.velocity()[0];
        assert!(
            !(previous > 0.0 && v < 0.0 || previous < 0.0 && v > 0.0),
            "velocity reversed: {previous} -> {v}"
        );
        if v != 0.0 {
            previous = v;
        }
    }
}

#[test]
fn planar_plan_is_kinematically_consistent() {
    init_tracing();
    let scenario = planar();
    let plan = scenario.solve().unwrap();
    assert_endpoints(&scenario, &plan);
    assert_within_limits(&scenario, &plan);
    assert_integrates(&scenario, &plan, 1);
    assert_eq!(plan.stats.jerk, vec![2.0, 2.0]);
}

// ---------------------------------------------------------------------------
// Constrained goal
// ---------------------------------------------------------------------------

#[test]
fn clearance_plan_stays_feasible() {
    init_tracing();
    let scenario = clearance().unwrap();
    let plan = scenario.solve().unwrap();
    assert_endpoints(&scenario, &plan);
    assert_within_limits(&scenario, &plan);
    for (i, state) in plan.path.iter().enumerate() {
        assert!(
            (scenario.config.constrain)(state),
            "path[{i}] is infeasible: {state:?}"
        );
    }
    assert!(plan.stats.free_goal.found);
    assert!(plan.stats.free_goal.iterations > 1);
}

#[test]
fn clearance_plan_descends_vertically_into_the_goal() {
    init_tracing();
    let scenario = clearance().unwrap();
    let plan = scenario.solve().unwrap();
    let tail: Vec<Vec<f64>> = plan.path[plan.path.len() - 4..]
        .iter()
        .map(|s| s.position().to_vec())
        .collect();
    assert_eq!(
        tail,
        vec![
            vec![10.0, 5.0, 16.0],
            vec![10.0, 5.0, 11.0],
            vec![10.0, 5.0, 6.0],
            vec![10.0, 5.0, 1.0],
        ]
    );
}

#[test]
fn lift_off_rises_before_moving_sideways() {
    init_tracing();
    let scenario = lift_off().unwrap();
    let plan = scenario.solve().unwrap();
    assert_endpoints(&scenario, &plan);
    assert_within_limits(&scenario, &plan);
    assert!(plan.stats.free_goal.found);
    assert!(plan.stats.search.iterations <= scenario.config.max_iterations);

    let plane = kinoplan_planner::ClearancePlane::new(2, 15.0, 0.0);
    for (i, state) in plan.path.iter().enumerate() {
        assert!(plane.admits(state), "path[{i}] is infeasible: {state:?}");
    }
    let first_free = plan
        .path
        .iter()
        .position(|s| !plane.is_constrained(s))
        .unwrap();
    assert!(first_free > 1, "the start lies below the clearance plane");
    for state in &plan.path[..first_free] {
        assert_eq!(&state.position()[..2], &[0.0, 0.0], "{state:?}");
    }
}

// ---------------------------------------------------------------------------
// Seeded random trips
// ---------------------------------------------------------------------------

const TRIPS: u32 = 20;
const BOUNDS: f64 = 300.0;

/// Runs `TRIPS` cases from a fixed seed, so every run plans the same trips.
fn seeded_trips<S: Strategy>(strategy: &S, trip: impl Fn(S::Value) -> TestCaseResult) {
    init_tracing();
    let config = Config {
        cases: TRIPS,
        failure_persistence: None,
        max_shrink_iters: 0,
        ..Config::default()
    };
    let mut runner =
        TestRunner::new_with_rng(config, TestRng::deterministic_rng(RngAlgorithm::ChaCha));
    if let Err(err) = runner.run(strategy, trip) {
        panic!("{err}");
    }
}

fn solve_trip(scenario: &Scenario) -> Result<Plan, TestCaseError> {
    let plan = scenario
        .solve()
        .map_err(|e| TestCaseError::fail(format!("{}: {e}", scenario.name)))?;
    prop_assert_eq!(plan.path.first(), Some(&scenario.start.rounded(plan.precision)));
    prop_assert_eq!(plan.path.last(), Some(&scenario.goal.rounded(plan.precision)));
    prop_assert!(plan.stats.search.iterations <= scenario.config.max_iterations);
    Ok(plan)
}

fn coordinate() -> impl Strategy<Value = f64> {
    -BOUNDS..BOUNDS
}

#[test]
fn random_line_trips_fit_the_budget() {
    seeded_trips(&(coordinate(), coordinate()), |(from, to)| {
        let scenario = Scenario {
            name: "random line",
            config: PlannerConfig {
                max_iterations: 400,
                ..PlannerConfig::with_limits(1, vec![20.0], vec![5.0])
            },
            start: KinematicState::at_rest(vec![from]),
            goal: KinematicState::at_rest(vec![to]),
        };
        solve_trip(&scenario)?;
        Ok(())
    });
}

#[test]
fn random_spatial_trips_fit_the_budget() {
    let point = || proptest::array::uniform3(coordinate());
    seeded_trips(&(point(), point()), |(from, to)| {
        let scenario = Scenario {
            name: "random spatial",
            config: PlannerConfig {
                max_iterations: 500,
                ..PlannerConfig::with_limits(3, vec![10.0; 3], vec![5.0; 3])
            },
            start: KinematicState::at_rest(from.to_vec()),
            goal: KinematicState::at_rest(to.to_vec()),
        };
        solve_trip(&scenario)?;
        Ok(())
    });
}

#[test]
fn random_gantry_trips_fit_the_budget() {
    let spot = || proptest::array::uniform2(coordinate());
    seeded_trips(&(spot(), spot()), |(from, to)| {
        let scenario = Scenario {
            name: "random gantry",
            config: gantry().unwrap(),
            start: KinematicState::at_rest(vec![from[0], from[1], 0.0]),
            goal: KinematicState::at_rest(vec![to[0], to[1], 3.0]),
        };
        let plan = solve_trip(&scenario)?;
        for state in &plan.path {
            prop_assert!((scenario.config.constrain)(state), "infeasible: {:?}", state);
        }
        Ok(())
    });
}

// ---------------------------------------------------------------------------
// Failure and observation
// ---------------------------------------------------------------------------

#[test]
fn fenced_goal_reports_no_path() {
    init_tracing();
    let config = PlannerConfig {
        constrain: std::sync::Arc::new(|s: &KinematicState| s.position()[0].abs() <= 10.0),
        ..PlannerConfig::with_limits(1, vec![10.0], vec![2.0])
    };
    let mut graph = KinematicGraph::new(config).unwrap();
    let err = graph
        .solve(
            &KinematicState::at_rest(vec![0.0]),
            &KinematicState::at_rest(vec![50.0]),
            &mut kinoplan_search::NullObserver,
        )
        .unwrap_err();
    assert!(matches!(err, PlanError::NoPath { .. }), "got {err:?}");
    let message = err.to_string();
    assert!(message.contains("start: s=[0.0]"), "{message}");
    assert!(message.contains("goal: s=[50.0]"), "{message}");
}

#[derive(Default)]
struct Tally {
    expanded: Vec<StateId>,
    opened: usize,
    improved: usize,
}

impl PlanObserver for Tally {
    fn on_current(&mut self, id: StateId, _state: &KinematicState) -> bool {
        self.expanded.push(id);
        true
    }

    fn on_neighbor(&mut self, _id: StateId, _state: &KinematicState, outcome: NeighborOutcome) {
        match outcome {
            NeighborOutcome::Opened => self.opened += 1,
            NeighborOutcome::ImprovedOpen => self.improved += 1,
            _ => {}
        }
    }
}

#[test]
fn observer_sees_every_expansion() {
    init_tracing();
    let scenario = clearance().unwrap();
    let mut graph = KinematicGraph::new(scenario.config.clone()).unwrap();
    let mut tally = Tally::default();
    let plan = graph
        .solve(&scenario.start, &scenario.goal, &mut tally)
        .unwrap();
    assert_eq!(tally.expanded.len() as u64, plan.stats.search.iterations);
    assert!(tally.opened > 0);
    assert_eq!(tally.improved as u64, plan.stats.search.reprioritized);
    assert_eq!(tally.expanded.first().map(|id| id.index()), Some(0));
}
