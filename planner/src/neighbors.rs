//! Lazy successor generation for [`KinematicGraph`].

use kinoplan_kernel::state::KinematicState;
use kinoplan_search::Successor;

use crate::graph::KinematicGraph;
use crate::session::StateId;

/// Cartesian product of per-axis choices, axis 0 varying fastest.
///
/// Yields nothing if any axis has no choices.
#[derive(Debug, Clone)]
pub struct Permutations {
    basis: Vec<Vec<f64>>,
    digits: Vec<usize>,
    done: bool,
}

/// Lazily enumerate every combination of one entry per axis of `basis`.
#[must_use]
pub fn permutations(basis: Vec<Vec<f64>>) -> Permutations {
    let done = basis.iter().any(Vec::is_empty);
    Permutations {
        digits: vec![0; basis.len()],
        basis,
        done,
    }
}

impl Iterator for Permutations {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Vec<f64>> {
        if self.done {
            return None;
        }
        let item = self
            .digits
            .iter()
            .zip(&self.basis)
            .map(|(d, axis)| axis[*d])
            .collect();
        // Odometer increment; carry out of the last axis ends the sequence.
        self.done = true;
        for (digit, axis) in self.digits.iter_mut().zip(&self.basis) {
            *digit += 1;
            if *digit < axis.len() {
                self.done = false;
                break;
            }
            *digit = 0;
        }
        Some(item)
    }
}

enum Choices {
    Goal(Option<StateId>),
    Listed(std::vec::IntoIter<Vec<f64>>),
    Product(Permutations),
}

/// Successors of one node, computed on demand.
///
/// The iterator holds no session borrow between items, so the search may
/// evaluate heuristics while it is being drained.
pub(crate) struct NeighborIter<'a> {
    graph: &'a KinematicGraph,
    goal: StateId,
    state: KinematicState,
    choices: Choices,
}

impl<'a> NeighborIter<'a> {
    pub(crate) fn new(graph: &'a KinematicGraph, node: StateId, goal: StateId) -> Self {
        graph.count_neighbor_call();
        let state = graph.state(node);
        let goal_state = graph.state(goal);
        let choices = if graph.is_goal_neighbor(&state, &goal_state) {
            Choices::Goal(Some(goal))
        } else {
            let constrained = graph.is_constrained(node);
            let basis: Vec<Vec<f64>> = (0..state.dimensions())
                .map(|i| {
                    let ds = goal_state.position()[i] - state.position()[i];
                    graph.axis_accelerations(&state, constrained, i, ds)
                })
                .collect();
            if graph.is_cruise_node(node) {
                Choices::Listed(cruise_choices(&basis).into_iter())
            } else {
                Choices::Product(permutations(basis))
            }
        };
        Self {
            graph,
            goal,
            state,
            choices,
        }
    }

    fn next_choice(&mut self) -> Option<Vec<f64>> {
        match &mut self.choices {
            Choices::Goal(_) => None,
            Choices::Listed(list) => list.next(),
            Choices::Product(product) => product.next(),
        }
    }
}

impl Iterator for NeighborIter<'_> {
    type Item = Successor<StateId>;

    fn next(&mut self) -> Option<Successor<StateId>> {
        if let Choices::Goal(goal) = &mut self.choices {
            return goal.take().map(Successor::Candidate);
        }
        while let Some(acceleration) = self.next_choice() {
            let Ok(next) = self.state.step(&acceleration) else {
                continue;
            };
            let id = self.graph.intern_unchecked(&next);
            if !self.graph.admits(id) {
                return Some(Successor::Rejected(id));
            }
            if self.graph.estimate(id, self.goal).is_finite() {
                return Some(Successor::Candidate(id));
            }
        }
        None
    }
}

/// Reduced branching for cruising nodes: brake one axis, hold all, or push
/// one axis harder.
fn cruise_choices(basis: &[Vec<f64>]) -> Vec<Vec<f64>> {
    if basis.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    let preferred: Vec<f64> = basis.iter().map(|axis| axis[0]).collect();
    let with_axis = |i: usize, value: f64| {
        let mut choice = preferred.clone();
        choice[i] = value;
        choice
    };

    let mut out: Vec<Vec<f64>> = Vec::with_capacity(2 * basis.len() + 1);
    let mut push = |choice: Vec<f64>| {
        if !out.contains(&choice) {
            out.push(choice);
        }
    };
    for (i, axis) in basis.iter().enumerate() {
        push(with_axis(i, axis[axis.len() - 1]));
    }
    push(preferred.clone());
    for (i, axis) in basis.iter().enumerate() {
        if axis.len() == 3 {
            push(with_axis(i, axis[1]));
        }
    }
    out
}
