//! Property tests across crate boundaries.
//!
//! - A* with a zero heuristic finds shortest paths on random weighted
//!   digraphs (checked against a binary-heap Dijkstra).
//! - One-axis rest-to-rest plans always succeed and end at the goal.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use kinoplan_kernel::state::KinematicState;
use kinoplan_planner::{KinematicGraph, PlannerConfig};
use kinoplan_search::{AStar, NullObserver, SearchGraph, SearchPolicy, Successor};
use proptest::prelude::*;

/// Digraph over `0..n` with positive integer weights.
#[derive(Debug, Clone)]
struct Weighted {
    adjacency: Vec<BTreeMap<usize, u32>>,
}

impl Weighted {
    fn from_edges(n: usize, edges: &[(usize, usize, u32)]) -> Self {
        let mut adjacency = vec![BTreeMap::new(); n];
        for &(from, to, w) in edges {
            if from != to {
                adjacency[from % n].insert(to % n, w);
            }
        }
        Self { adjacency }
    }

    fn dijkstra(&self, start: usize, goal: usize) -> Option<u64> {
        let mut dist = vec![u64::MAX; self.adjacency.len()];
        let mut heap = BinaryHeap::new();
        dist[start] = 0;
        heap.push(Reverse((0_u64, start)));
        while let Some(Reverse((d, node))) = heap.pop() {
            if node == goal {
                return Some(d);
            }
            if d > dist[node] {
                continue;
            }
            for (&next, &w) in &self.adjacency[node] {
                let candidate = d + u64::from(w);
                if candidate < dist[next] {
                    dist[next] = candidate;
                    heap.push(Reverse((candidate, next)));
                }
            }
        }
        None
    }
}

impl SearchGraph for Weighted {
    type Node = usize;

    fn neighbors<'a>(
        &'a self,
        node: usize,
        _goal: usize,
    ) -> Box<dyn Iterator<Item = Successor<usize>> + 'a> {
        Box::new(self.adjacency[node].keys().map(|&n| Successor::Candidate(n)))
    }

    fn cost(&self, from: usize, to: usize) -> f64 {
        if from == to {
            return 0.0;
        }
        f64::from(self.adjacency[from][&to])
    }

    fn heuristic(&self, _node: usize, _goal: usize) -> f64 {
        0.0
    }
}

fn graph_strategy() -> impl Strategy<Value = (Weighted, usize, usize)> {
    (2_usize..24).prop_flat_map(|n| {
        (
            prop::collection::vec((0..n, 0..n, 1_u32..20), 0..(n * 4)),
            0..n,
            0..n,
        )
            .prop_map(move |(edges, start, goal)| (Weighted::from_edges(n, &edges), start, goal))
    })
}

proptest! {
    #[test]
    fn astar_matches_dijkstra((graph, start, goal) in graph_strategy()) {
        let engine = AStar::new(SearchPolicy::default()).unwrap();
        let outcome = engine.solve(&graph, start, goal, &mut NullObserver);
        match graph.dijkstra(start, goal) {
            None => prop_assert!(outcome.path.is_empty()),
            Some(expected) => {
                prop_assert!(outcome.is_goal_reached());
                prop_assert_eq!(outcome.path.first(), Some(&start));
                prop_assert_eq!(outcome.path.last(), Some(&goal));
                let cost: f64 = outcome
                    .path
                    .windows(2)
                    .map(|pair| graph.cost(pair[0], pair[1]))
                    .sum();
                #[allow(clippy::cast_precision_loss)]
                let expected = expected as f64;
                prop_assert!((cost - expected).abs() < 1e-9, "cost {} expected {}", cost, expected);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn line_plans_reach_goal(start in -40_i32..40, goal in -40_i32..40) {
        let config = PlannerConfig::with_limits(1, vec![10.0], vec![2.0]);
        let mut graph = KinematicGraph::new(config).unwrap();
        let start = KinematicState::at_rest(vec![f64::from(start)]);
        let goal = KinematicState::at_rest(vec![f64::from(goal)]);
        let plan = graph.solve(&start, &goal, &mut NullObserver).unwrap();
        prop_assert_eq!(plan.path.first(), Some(&start));
        prop_assert_eq!(plan.path.last(), Some(&goal));
        for state in &plan.path {
            prop_assert!(state.velocity()[0].abs() <= 10.0);
            prop_assert!(state.acceleration()[0].abs() <= 2.0);
        }
    }
}
