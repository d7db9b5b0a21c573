use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use super::{ConvertErrorType, ConvertResult};
use crate::automaton::{Automaton, StateId};
use crate::pattern;

/// A regular expression tree, kept simplified by its constructors.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expr {
    Epsilon,
    Literal(char),
    Concat(Vec<Expr>),
    Alt(Vec<Expr>),
    Star(Box<Expr>),
}

impl Expr {
    pub fn concat(self, other: Expr) -> Expr {
        let mut items = Vec::new();
        for expr in [self, other] {
            match expr {
                Expr::Epsilon => {}
                Expr::Concat(inner) => items.extend(inner),
                expr => items.push(expr),
            }
        }
        match items.len() {
            0 => Expr::Epsilon,
            1 => items.remove(0),
            _ => Expr::Concat(items),
        }
    }

    pub fn alt(self, other: Expr) -> Expr {
        let mut items: Vec<Expr> = Vec::new();
        for expr in [self, other] {
            let new = match expr {
                Expr::Alt(inner) => inner,
                expr => vec![expr],
            };
            for expr in new {
                if !items.contains(&expr) {
                    items.push(expr);
                }
            }
        }
        // ε is already inside any starred alternative
        if items.iter().any(|e| matches!(e, Expr::Star(_))) {
            items.retain(|e| *e != Expr::Epsilon);
        }
        match items.len() {
            1 => items.remove(0),
            _ => Expr::Alt(items),
        }
    }

    pub fn star(self) -> Expr {
        match self {
            Expr::Epsilon => Expr::Epsilon,
            Expr::Star(inner) => Expr::Star(inner),
            Expr::Alt(items) => {
                let items: Vec<_> = items.into_iter().filter(|e| *e != Expr::Epsilon).collect();
                match items.len() {
                    0 => Expr::Epsilon,
                    1 => Expr::Star(Box::new(items.into_iter().next().unwrap_or(Expr::Epsilon))),
                    _ => Expr::Star(Box::new(Expr::Alt(items))),
                }
            }
            expr => Expr::Star(Box::new(expr)),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::Alt(_) => 0,
            Expr::Concat(_) => 1,
            Expr::Star(_) => 2,
            Expr::Epsilon | Expr::Literal(_) => 3,
        }
    }

    fn write(&self, f: &mut std::fmt::Formatter<'_>, outer: u8) -> std::fmt::Result {
        let grouped = self.precedence() < outer;
        if grouped {
            write!(f, "(")?;
        }
        match self {
            Expr::Epsilon => {}
            Expr::Literal(c) => write!(f, "{}", regex::escape(&c.to_string()))?,
            Expr::Concat(items) => {
                for item in items {
                    item.write(f, 1)?;
                }
            }
            Expr::Alt(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    item.write(f, 1)?;
                }
            }
            Expr::Star(inner) => {
                inner.write(f, 3)?;
                write!(f, "*")?;
            }
        }
        if grouped {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write(f, 0)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
enum Node {
    Start,
    State(StateId),
    Accept,
}

#[derive(Default)]
struct Edges(BTreeMap<(Node, Node), Expr>);

impl Edges {
    fn add(&mut self, from: Node, to: Node, expr: Expr) {
        let merged = match self.0.remove(&(from, to)) {
            Some(existing) => existing.alt(expr),
            None => expr,
        };
        self.0.insert((from, to), merged);
    }

    // Removes `node`, rerouting every path through it around it
    fn eliminate(&mut self, node: Node) {
        let (touching, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.0)
            .into_iter()
            .partition(|((from, to), _)| *from == node || *to == node);
        self.0 = rest.into_iter().collect();

        let mut self_loop = Expr::Epsilon;
        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for ((from, to), expr) in touching {
            if from == node && to == node {
                self_loop = expr.star();
            } else if to == node {
                incoming.push((from, expr));
            } else {
                outgoing.push((to, expr));
            }
        }

        for (from, before) in &incoming {
            for (to, after) in &outgoing {
                let through = before.clone().concat(self_loop.clone()).concat(after.clone());
                self.add(*from, *to, through);
            }
        }
    }
}

/// Writes the automaton's language as a regular expression by state
/// elimination, producing `*` closures for loops.
pub fn automaton_to_regex(automaton: &Automaton) -> ConvertResult<String> {
    let initial = automaton
        .initial_state()
        .ok_or(ConvertErrorType::NoInitialState)?
        .id;

    let mut edges = Edges::default();
    edges.add(Node::Start, Node::State(initial), Expr::Epsilon);
    for transition in &automaton.transitions {
        for &symbol in &transition.symbols {
            edges.add(Node::State(transition.from), Node::State(transition.to), Expr::Literal(symbol));
        }
    }
    for state in automaton.final_states() {
        edges.add(Node::State(state.id), Node::Accept, Expr::Epsilon);
    }

    let ids: BTreeSet<StateId> = automaton
        .states
        .iter()
        .map(|s| s.id)
        .chain(automaton.transitions.iter().flat_map(|t| [t.from, t.to]))
        .collect();
    for id in ids {
        edges.eliminate(Node::State(id));
    }

    let expr = edges
        .0
        .remove(&(Node::Start, Node::Accept))
        .ok_or(ConvertErrorType::EmptyLanguage)?;
    let regex = expr.to_string();

    pattern::compile(&regex).map_err(|e| ConvertErrorType::InvalidPattern(e.to_string()))?;
    tracing::debug!(%regex, "eliminated automaton states");
    Ok(regex)
}
