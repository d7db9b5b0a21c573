use std::collections::{BTreeSet, HashMap};

use super::{Automaton, StateId};

/// Every `(state, symbol)` pair mapped to all the states it can move to.
/// Parallel transitions between the same states end up merged here.
pub struct TransitionIndex {
    moves: HashMap<(StateId, char), BTreeSet<StateId>>,
}

impl TransitionIndex {
    pub fn new(automaton: &Automaton) -> Self {
        let mut moves: HashMap<(StateId, char), BTreeSet<StateId>> = HashMap::new();
        for transition in &automaton.transitions {
            for &symbol in &transition.symbols {
                moves.entry((transition.from, symbol)).or_default().insert(transition.to);
            }
        }
        TransitionIndex { moves }
    }

    pub fn targets(&self, state: StateId, symbol: char) -> impl Iterator<Item = StateId> + '_ {
        self.moves.get(&(state, symbol)).into_iter().flatten().copied()
    }

    // All states reachable from any of `states` on `symbol`
    pub fn step(&self, states: &BTreeSet<StateId>, symbol: char) -> BTreeSet<StateId> {
        states.iter().flat_map(|&state| self.targets(state, symbol)).collect()
    }
}

/// Runs the automaton over `input`, following every possible transition at
/// once. Rejects when there is no initial state.
pub fn accepts(automaton: &Automaton, input: &str) -> bool {
    let initial = match automaton.initial_state() {
        Some(state) => state.id,
        None => return false,
    };

    let index = TransitionIndex::new(automaton);
    let mut current = BTreeSet::from([initial]);
    for (position, symbol) in input.chars().enumerate() {
        current = index.step(&current, symbol);
        if current.is_empty() {
            tracing::trace!(position, %symbol, "no move available, rejecting");
            return false;
        }
    }

    automaton.final_states().any(|s| current.contains(&s.id))
}
