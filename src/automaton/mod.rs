/*
    This module is for storing and editing finite automata
*/

pub mod simulator;

use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;

pub use simulator::accepts;

pub type StateId = usize;

/// Where a state is drawn. Never consulted by recognition or conversion.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, PartialEq, Clone)]
pub struct State {
    pub id: StateId,
    pub position: Position,
    pub is_initial: bool,
    pub is_final: bool,
}

impl State {
    pub fn new(id: StateId) -> Self {
        State {
            id,
            position: Position::default(),
            is_initial: false,
            is_final: false,
        }
    }
}

// Endpoints are state ids, never references, so an automaton is a plain
// value that can be cloned and handed around freely
#[derive(Debug, PartialEq, Clone)]
pub struct Transition {
    pub id: usize,
    pub from: StateId,
    pub to: StateId,
    pub symbols: BTreeSet<char>,
}

#[derive(Debug, PartialEq, Clone, Default)]
pub struct Automaton {
    pub states: Vec<State>,
    pub transitions: Vec<Transition>,
}

// Smallest id not already taken, so deleted ids get reused
fn first_free_id(mut ids: Vec<usize>) -> usize {
    ids.sort_unstable();
    ids.dedup();
    ids.iter()
        .enumerate()
        .find(|(expected, id)| *expected != **id)
        .map_or(ids.len(), |(expected, _)| expected)
}

impl Automaton {
    pub fn new() -> Self {
        Automaton::default()
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    fn state_mut(&mut self, id: StateId) -> Option<&mut State> {
        self.states.iter_mut().find(|s| s.id == id)
    }

    pub fn next_state_id(&self) -> StateId {
        first_free_id(self.states.iter().map(|s| s.id).collect())
    }

    fn next_transition_id(&self) -> usize {
        first_free_id(self.transitions.iter().map(|t| t.id).collect())
    }

    /// Adds a fresh non-initial, non-final state and returns its id.
    pub fn add_state(&mut self, position: Position) -> StateId {
        let id = self.next_state_id();
        self.states.push(State {
            position,
            ..State::new(id)
        });
        self.states.sort_by_key(|s| s.id);
        id
    }

    // Returns the state with this id, creating it if it does not exist yet
    pub fn ensure_state(&mut self, id: StateId) -> &mut State {
        if self.state(id).is_none() {
            self.states.push(State::new(id));
            self.states.sort_by_key(|s| s.id);
        }
        let index = self.states.iter().position(|s| s.id == id).unwrap_or_default();
        &mut self.states[index]
    }

    /// Removes a state along with every transition touching it.
    pub fn remove_state(&mut self, id: StateId) -> Option<State> {
        let index = self.states.iter().position(|s| s.id == id)?;
        self.transitions.retain(|t| t.from != id && t.to != id);
        Some(self.states.remove(index))
    }

    /// Marks `id` as the only initial state. Returns false if there is no such state.
    pub fn set_initial(&mut self, id: StateId) -> bool {
        if self.state(id).is_none() {
            return false;
        }
        for state in &mut self.states {
            state.is_initial = state.id == id;
        }
        true
    }

    pub fn set_final(&mut self, id: StateId, is_final: bool) -> bool {
        match self.state_mut(id) {
            Some(state) => {
                state.is_final = is_final;
                true
            }
            None => false,
        }
    }

    /// Adds a new transition even if one already joins the same states.
    pub fn add_transition(&mut self, from: StateId, to: StateId, symbols: impl IntoIterator<Item = char>) -> usize {
        let id = self.next_transition_id();
        self.transitions.push(Transition {
            id,
            from,
            to,
            symbols: symbols.into_iter().collect(),
        });
        id
    }

    /// Adds `symbol` to the first transition from `from` to `to`, creating
    /// one when the pair is not linked yet.
    pub fn link(&mut self, from: StateId, to: StateId, symbol: char) {
        match self.transitions.iter_mut().find(|t| t.from == from && t.to == to) {
            Some(transition) => {
                transition.symbols.insert(symbol);
            }
            None => {
                self.add_transition(from, to, [symbol]);
            }
        }
    }

    pub fn remove_transition(&mut self, id: usize) -> Option<Transition> {
        let index = self.transitions.iter().position(|t| t.id == id)?;
        Some(self.transitions.remove(index))
    }

    // The lowest-id initial state. The editor keeps at most one
    pub fn initial_state(&self) -> Option<&State> {
        let initials = self.states.iter().filter(|s| s.is_initial);
        if initials.clone().count() > 1 {
            tracing::debug!("automaton has several initial states, using the lowest id");
        }
        initials.min_by_key(|s| s.id)
    }

    pub fn final_states(&self) -> impl Iterator<Item = &State> {
        self.states.iter().filter(|s| s.is_final)
    }

    /// Whether the automaton can be tested or converted at all: it needs an
    /// initial state and at least one final state.
    pub fn is_ready(&self) -> bool {
        self.initial_state().is_some() && self.final_states().next().is_some()
    }

    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions.iter().flat_map(|t| t.symbols.iter().copied()).collect()
    }
}

// Renders the automaton file format, so the output can be loaded again
impl Display for Automaton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for state in &self.states {
            writeln!(f, "state {} {} {}", state.id, state.position.x.round(), state.position.y.round())?;
        }
        if let Some(initial) = self.initial_state() {
            writeln!(f, "initial {}", initial.id)?;
        }
        let finals = self.final_states().map(|s| s.id).join(" ");
        if !finals.is_empty() {
            writeln!(f, "final {}", finals)?;
        }
        for transition in &self.transitions {
            writeln!(f, "{} -> {} : {}", transition.from, transition.to, transition.symbols.iter().join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_fill_gaps() {
        let mut automaton = Automaton::new();
        let ids: Vec<_> = (0..4).map(|_| automaton.add_state(Position::default())).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);

        automaton.remove_state(1);
        assert_eq!(automaton.next_state_id(), 1);
        assert_eq!(automaton.add_state(Position::default()), 1);
        assert_eq!(automaton.next_state_id(), 4);
    }

    #[test]
    fn removing_a_state_drops_its_transitions() {
        let mut automaton = Automaton::new();
        let a = automaton.add_state(Position::default());
        let b = automaton.add_state(Position::default());
        let c = automaton.add_state(Position::default());
        automaton.add_transition(a, b, ['x']);
        automaton.add_transition(b, c, ['y']);
        automaton.add_transition(a, c, ['z']);

        assert!(automaton.remove_state(b).is_some());
        assert_eq!(automaton.transitions.len(), 1);
        assert_eq!(automaton.transitions[0].to, c);
        assert!(automaton.remove_state(b).is_none());
    }

    #[test]
    fn removing_a_transition() {
        let mut automaton = Automaton::new();
        let a = automaton.add_state(Position::default());
        let b = automaton.add_state(Position::default());
        let first = automaton.add_transition(a, b, ['x']);
        let second = automaton.add_transition(b, a, ['y']);

        assert_eq!(automaton.remove_transition(first).map(|t| t.symbols), Some(BTreeSet::from(['x'])));
        assert_eq!(automaton.transitions.iter().map(|t| t.id).collect::<Vec<_>>(), vec![second]);
        assert!(automaton.remove_transition(first).is_none());
        assert_eq!(automaton.states.len(), 2);

        // The freed id is handed out again
        assert_eq!(automaton.add_transition(a, b, ['z']), first);
    }

    #[test]
    fn lowest_initial_id_wins() {
        let mut automaton = Automaton::new();
        automaton.states.push(State { is_initial: true, ..State::new(5) });
        automaton.states.push(State { is_initial: true, is_final: true, ..State::new(1) });

        assert_eq!(automaton.initial_state().map(|s| s.id), Some(1));
        assert!(accepts(&automaton, ""));
    }

    #[test]
    fn single_initial_state() {
        let mut automaton = Automaton::new();
        let a = automaton.add_state(Position::default());
        let b = automaton.add_state(Position::default());

        assert!(automaton.set_initial(a));
        assert!(automaton.set_initial(b));
        assert!(!automaton.set_initial(9));
        assert_eq!(automaton.states.iter().filter(|s| s.is_initial).count(), 1);
        assert_eq!(automaton.initial_state().map(|s| s.id), Some(b));
    }

    #[test]
    fn readiness() {
        let mut automaton = Automaton::new();
        let a = automaton.add_state(Position::default());
        assert!(!automaton.is_ready());

        automaton.set_initial(a);
        assert!(!automaton.is_ready());

        automaton.set_final(a, true);
        assert!(automaton.is_ready());
    }

    #[test]
    fn link_merges_symbols() {
        let mut automaton = Automaton::new();
        automaton.ensure_state(0);
        automaton.ensure_state(1);
        automaton.link(0, 1, 'a');
        automaton.link(0, 1, 'b');
        automaton.link(1, 0, 'a');

        assert_eq!(automaton.transitions.len(), 2);
        assert_eq!(automaton.transitions[0].symbols, BTreeSet::from(['a', 'b']));
        assert_eq!(automaton.alphabet(), BTreeSet::from(['a', 'b']));
    }

    #[test]
    fn display_lists_everything() {
        let mut automaton = Automaton::new();
        automaton.ensure_state(0).is_initial = true;
        automaton.ensure_state(1).is_final = true;
        automaton.add_transition(0, 1, ['b', 'a']);

        assert_eq!(
            automaton.to_string(),
            "state 0 0 0\nstate 1 0 0\ninitial 0\nfinal 1\n0 -> 1 : a b\n"
        );
    }
}
