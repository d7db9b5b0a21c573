use std::collections::{BTreeSet, HashMap};
use std::f64::consts::TAU;

use itertools::Itertools;

use crate::automaton::{Automaton, Position, StateId};
use crate::grammar::{Grammar, ProductionBody};

const LAYOUT_CENTER: f64 = 250.0;
const LAYOUT_RADIUS: f64 = 200.0;

struct Builder<'a> {
    automaton: Automaton,
    states: HashMap<&'a str, StateId>,
    // Shared target of every bare terminal body
    accept: Option<StateId>,
    // `N -> "" M` bodies, resolved once all transitions exist
    empty_moves: Vec<(StateId, StateId)>,
}

impl<'a> Builder<'a> {
    fn state_for(&mut self, nonterminal: &'a str) -> StateId {
        if let Some(&id) = self.states.get(nonterminal) {
            return id;
        }
        let id = self.automaton.add_state(Position::default());
        tracing::debug!(nonterminal, id, "allocated state");
        self.states.insert(nonterminal, id);
        id
    }

    fn accept_state(&mut self) -> StateId {
        if let Some(id) = self.accept {
            return id;
        }
        let id = self.automaton.add_state(Position::default());
        self.automaton.set_final(id, true);
        tracing::debug!(id, "allocated synthetic final state");
        self.accept = Some(id);
        id
    }

    // One transition per character; longer terminals get fresh states in between
    fn chain(&mut self, from: StateId, terminal: &str, to: StateId) {
        if terminal.is_empty() {
            self.empty_moves.push((from, to));
            return;
        }
        let mut chars = terminal.chars().peekable();
        let mut current = from;
        while let Some(symbol) = chars.next() {
            let next = if chars.peek().is_some() {
                self.automaton.add_state(Position::default())
            } else {
                to
            };
            self.automaton.link(current, next, symbol);
            current = next;
        }
    }

    // `from` itself plus everything reachable from it without reading input
    fn empty_closure(&self, from: StateId) -> BTreeSet<StateId> {
        let mut reached = BTreeSet::from([from]);
        let mut pending = vec![from];
        while let Some(state) = pending.pop() {
            for &(_, to) in self.empty_moves.iter().filter(|(f, _)| *f == state) {
                if reached.insert(to) {
                    pending.push(to);
                }
            }
        }
        reached
    }

    // Each state with empty moves takes over the transitions and finality of
    // the states those moves reach
    fn close_empty_moves(&mut self) {
        let sources = self.empty_moves.iter().map(|&(from, _)| from).unique().collect_vec();
        for from in sources {
            let reached = self.empty_closure(from);
            let copied = self
                .automaton
                .transitions
                .iter()
                .filter(|t| t.from != from && reached.contains(&t.from))
                .flat_map(|t| t.symbols.iter().map(move |&symbol| (t.to, symbol)))
                .collect_vec();
            let is_final = self.automaton.final_states().any(|s| reached.contains(&s.id));

            tracing::debug!(from, reached = reached.len(), "closing empty moves");
            for (to, symbol) in copied {
                self.automaton.link(from, to, symbol);
            }
            if is_final {
                self.automaton.set_final(from, true);
            }
        }
    }

    fn finish(mut self) -> Automaton {
        let count = self.automaton.states.len() as f64;
        for (i, state) in self.automaton.states.iter_mut().enumerate() {
            let angle = TAU * i as f64 / count;
            state.position = Position {
                x: LAYOUT_CENTER + LAYOUT_RADIUS * angle.cos(),
                y: LAYOUT_CENTER + LAYOUT_RADIUS * angle.sin(),
            };
        }
        self.automaton
    }
}

/// Builds a (possibly nondeterministic) automaton recognising the grammar's
/// language. Each nonterminal becomes a state in first-seen order, the start
/// symbol first. A bare terminal body `N -> t` is treated as `N -> t F`
/// where `F` is a single shared final state.
pub fn to_automaton(grammar: &Grammar) -> Automaton {
    let mut builder = Builder {
        automaton: Automaton::new(),
        states: HashMap::new(),
        accept: None,
        empty_moves: Vec::new(),
    };

    let start = builder.state_for(&grammar.start);
    builder.automaton.set_initial(start);

    for production in &grammar.productions {
        let from = builder.state_for(&production.left);
        for body in &production.bodies {
            match body {
                ProductionBody::Empty => {
                    builder.automaton.set_final(from, true);
                }
                ProductionBody::Terminal(t) if t.is_empty() => {
                    builder.automaton.set_final(from, true);
                }
                ProductionBody::Terminal(t) => {
                    let accept = builder.accept_state();
                    builder.chain(from, t, accept);
                }
                ProductionBody::TerminalThenNonterminal(t, n) => {
                    let to = builder.state_for(n);
                    builder.chain(from, t, to);
                }
            }
        }
    }

    builder.close_empty_moves();

    tracing::debug!(
        states = builder.automaton.states.len(),
        transitions = builder.automaton.transitions.len(),
        "converted grammar to automaton"
    );
    builder.finish()
}
