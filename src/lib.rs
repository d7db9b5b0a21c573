//! Regular grammars, finite automata and regular expressions, and the
//! conversions between them.

pub mod automaton;
pub mod convert;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod parser;
pub mod pattern;

pub use automaton::Automaton;
pub use grammar::Grammar;
