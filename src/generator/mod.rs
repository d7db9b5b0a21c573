/*
    This module generates sample words of a grammar's language
*/

use itertools::Itertools;
use rand::prelude::*;
use std::fmt::Display;
use std::path::Path;

use crate::grammar::*;
use crate::error_handling::*;

pub const DEFAULT_MAX_STEPS: usize = 100;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // An undefined nonterminal was used and nothing else could be chosen
    UndefinedNonterminal(String),
    // The derivation from this nonterminal ran out of steps
    NoTerminatingDerivation(String),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::UndefinedNonterminal(nonterminal) => write!(f, "No definition for nonterminal `{}`", nonterminal),
            GenerateErrorType::NoTerminatingDerivation(nonterminal) => write!(f, "Could not finish a derivation from `{}`", nonterminal),
        }
    }
}

pub type GenerateError = Error<GenerateErrorType>;
pub type GenResult = Result<String, GenerateError>;

pub fn generate(grammar: &Grammar, file: &Path, max_steps: usize, rng: &mut impl Rng) -> GenResult {
    generate_nonterminal(grammar, &grammar.start, max_steps, rng, &Location::whole_file(file))
}

// Generates a word in the given grammar starting with the given symbol
pub fn generate_with_override(grammar: &Grammar, start: &str, file: &Path, max_steps: usize, rng: &mut impl Rng) -> GenResult {
    generate_nonterminal(grammar, start, max_steps, rng, &Location::whole_file(file))
}

// Bodies that don't walk into a dangling reference
fn live_bodies<'a>(grammar: &'a Grammar, nonterminal: &str) -> Vec<&'a ProductionBody> {
    grammar.bodies(nonterminal)
        .iter()
        .filter(|body| body.continuation().map_or(true, |n| grammar.production(n).is_some()))
        .collect_vec()
}

fn choose_body<'a>(bodies: &[&'a ProductionBody], finishing: bool, rng: &mut impl Rng) -> Option<&'a ProductionBody> {
    if finishing {
        let ending = bodies.iter().filter(|body| body.continuation().is_none()).collect_vec();
        if let Some(body) = ending.choose(rng) {
            return Some(**body);
        }
    }
    bodies.choose(rng).copied()
}

fn generate_nonterminal(grammar: &Grammar, start: &str, max_steps: usize, rng: &mut impl Rng, location: &Location) -> GenResult {
    let mut word = String::new();
    let mut current = start;

    for step in 0..max_steps {
        let bodies = live_bodies(grammar, current);
        // Past half the budget, stop as soon as the grammar allows it
        let Some(body) = choose_body(&bodies, step * 2 >= max_steps, rng) else {
            // Either `current` itself or everything it continues with is undefined
            let missing = grammar.bodies(current)
                .iter()
                .find_map(ProductionBody::continuation)
                .unwrap_or(current);
            return Err(GenerateError {
                location: location.clone(),
                error: GenerateErrorType::UndefinedNonterminal(missing.to_string())
            });
        };

        if let Some(terminal) = body.terminal() {
            word.push_str(terminal);
        }
        match body.continuation() {
            Some(next) => current = next,
            None => return Ok(word),
        }
    }

    Err(GenerateError {
        location: location.clone(),
        error: GenerateErrorType::NoTerminatingDerivation(start.to_string())
    })
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;

    use super::*;

    fn tn(t: &str, n: &str) -> ProductionBody {
        ProductionBody::TerminalThenNonterminal(t.to_string(), n.to_string())
    }

    #[test]
    fn generated_words_are_accepted() {
        let grammar = Grammar::example();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let word = generate(&grammar, Path::new(""), DEFAULT_MAX_STEPS, &mut rng).unwrap();
            assert!(matcher::accepts(&grammar, &word), "{word}");
        }
    }

    #[test]
    fn override_start() {
        let grammar = Grammar::example();
        let mut rng = StdRng::seed_from_u64(1);

        let word = generate_with_override(&grammar, "D", Path::new(""), DEFAULT_MAX_STEPS, &mut rng).unwrap();
        assert_eq!(word, "bb");
    }

    #[test]
    fn dead_ends_are_avoided() {
        let mut grammar = Grammar::new("S");
        grammar.add_body("S", tn("a", "X"));
        grammar.add_body("S", ProductionBody::Terminal("b".to_string()));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..10 {
            assert_eq!(generate(&grammar, Path::new(""), DEFAULT_MAX_STEPS, &mut rng), Ok("b".to_string()));
        }
    }

    #[test]
    fn generation_errors() {
        let path = Path::new("g.rg");
        let mut rng = StdRng::seed_from_u64(0);

        let mut endless = Grammar::new("S");
        endless.add_body("S", tn("a", "S"));
        assert_eq!(
            generate(&endless, path, 20, &mut rng).unwrap_err().error,
            GenerateErrorType::NoTerminatingDerivation("S".to_string())
        );

        let mut dangling = Grammar::new("S");
        dangling.add_body("S", tn("a", "X"));
        assert_eq!(
            generate(&dangling, path, 20, &mut rng).unwrap_err(),
            GenerateError {
                location: Location::whole_file(path),
                error: GenerateErrorType::UndefinedNonterminal("X".to_string())
            }
        );
    }
}
