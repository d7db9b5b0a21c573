/*
    This module is for storing and inspecting right-linear grammars
*/

pub mod matcher;

use std::fmt::Display;

use itertools::Itertools;

pub use matcher::accepts;

pub type Nonterminal = String;
pub type Terminal = String;

// One right-hand side of a production. Right-linear form only: at most one
// nonterminal, and it always comes last
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum ProductionBody {
    Empty,
    Terminal(Terminal),
    TerminalThenNonterminal(Terminal, Nonterminal),
}

impl ProductionBody {
    pub fn terminal(&self) -> Option<&str> {
        match self {
            ProductionBody::Empty => None,
            ProductionBody::Terminal(t) | ProductionBody::TerminalThenNonterminal(t, _) => Some(t),
        }
    }

    // The nonterminal derivation continues with, if any
    pub fn continuation(&self) -> Option<&str> {
        match self {
            ProductionBody::TerminalThenNonterminal(_, n) => Some(n),
            _ => None,
        }
    }
}

impl Display for ProductionBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductionBody::Empty => write!(f, "ε"),
            ProductionBody::Terminal(t) => write!(f, "{}", t),
            ProductionBody::TerminalThenNonterminal(t, n) => write!(f, "{}{}", t, n),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Production {
    pub left: Nonterminal,
    pub bodies: Vec<ProductionBody>,
}

// Productions keep their insertion order, which is the display order and
// the order converters allocate states in
#[derive(Debug, PartialEq, Clone)]
pub struct Grammar {
    pub start: Nonterminal,
    pub productions: Vec<Production>,
}

impl Grammar {
    pub fn new(start: &str) -> Self {
        Grammar {
            start: start.to_string(),
            productions: Vec::new(),
        }
    }

    /// The grammar the editor resets to: `S -> ε`
    pub fn empty_word() -> Self {
        let mut grammar = Grammar::new("S");
        grammar.add_body("S", ProductionBody::Empty);
        grammar
    }

    /// The built-in teaching example, roughly `a{3}(a|b)*bbb`
    pub fn example() -> Self {
        let mut grammar = Grammar::new("S");
        for (left, body) in [
            ("S", "aA"),
            ("A", "aB"),
            ("B", "aC"),
            ("C", "aC"),
            ("C", "bC"),
            ("C", "bD"),
            ("D", "bE"),
        ] {
            let (t, n) = body.split_at(1);
            grammar.add_body(left, ProductionBody::TerminalThenNonterminal(t.to_string(), n.to_string()));
        }
        grammar.add_body("E", ProductionBody::Terminal("b".to_string()));
        grammar
    }

    // Appends an alternative, creating the production the first time its
    // nonterminal shows up. Bodies for a blank nonterminal are dropped
    pub fn add_body(&mut self, left: &str, body: ProductionBody) {
        if left.is_empty() {
            return;
        }
        match self.productions.iter_mut().find(|p| p.left == left) {
            Some(production) => production.bodies.push(body),
            None => self.productions.push(Production {
                left: left.to_string(),
                bodies: vec![body],
            }),
        }
    }

    pub fn production(&self, nonterminal: &str) -> Option<&Production> {
        self.productions.iter().find(|p| p.left == nonterminal)
    }

    // Dangling references simply have no alternatives
    pub fn bodies(&self, nonterminal: &str) -> &[ProductionBody] {
        self.production(nonterminal)
            .map(|p| p.bodies.as_slice())
            .unwrap_or(&[])
    }

    pub fn nonterminals(&self) -> Vec<&str> {
        self.productions.iter().map(|p| p.left.as_str()).collect()
    }

    // Nonterminals used in some body but never defined
    pub fn undefined_nonterminals(&self) -> Vec<&str> {
        self.productions
            .iter()
            .flat_map(|p| p.bodies.iter())
            .filter_map(ProductionBody::continuation)
            .filter(|n| self.production(n).is_none())
            .unique()
            .collect()
    }

    pub fn terminals(&self) -> Vec<char> {
        self.productions
            .iter()
            .flat_map(|p| p.bodies.iter())
            .filter_map(ProductionBody::terminal)
            .flat_map(str::chars)
            .unique()
            .collect()
    }

    /// The formal tuple `G = ({S, A}, {a, b}, P, S)`
    pub fn definition(&self) -> String {
        format!(
            "G = ({{{}}}, {{{}}}, P, {})",
            self.nonterminals().iter().join(", "),
            self.terminals().iter().join(", "),
            self.start
        )
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for production in &self.productions {
            writeln!(f, "{} -> {}", production.left, production.bodies.iter().join(" | "))?;
        }
        Ok(())
    }
}
