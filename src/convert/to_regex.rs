use std::collections::HashSet;

use super::{ConvertErrorType, ConvertResult};
use crate::grammar::{Grammar, ProductionBody};
use crate::pattern;

/// Writes the grammar as a regular expression by expanding nonterminals in
/// place. Alternatives are joined with `|` and grouped when there is more
/// than one.
///
/// A nonterminal that derives itself cannot be expanded this way and is
/// reported as [`ConvertErrorType::Cycle`]; see
/// [`super::to_regex_with_closure`] for those grammars.
pub fn to_regex(grammar: &Grammar) -> ConvertResult<String> {
    let regex = build(grammar, &grammar.start, &HashSet::new())?;

    pattern::compile(&regex).map_err(|e| ConvertErrorType::InvalidPattern(e.to_string()))?;
    tracing::debug!(%regex, "converted grammar to regex");
    Ok(regex)
}

// `path` holds the nonterminals being expanded above this one. Each
// alternative gets its own copy, so sibling branches never block each other
fn build<'a>(grammar: &'a Grammar, symbol: &'a str, path: &HashSet<&'a str>) -> ConvertResult<String> {
    if path.contains(symbol) {
        return Err(ConvertErrorType::Cycle(symbol.to_string()));
    }

    let bodies = grammar.bodies(symbol);
    if bodies.is_empty() {
        return Err(ConvertErrorType::UndefinedNonterminal(symbol.to_string()));
    }

    let mut path = path.clone();
    path.insert(symbol);

    let mut parts = bodies
        .iter()
        .map(|body| match body {
            ProductionBody::Empty => Ok(String::new()),
            ProductionBody::Terminal(t) => Ok(regex::escape(t)),
            ProductionBody::TerminalThenNonterminal(t, n) => {
                Ok(format!("{}{}", regex::escape(t), build(grammar, n, &path)?))
            }
        })
        .collect::<ConvertResult<Vec<_>>>()?;

    if parts.len() > 1 {
        Ok(format!("({})", parts.join("|")))
    } else {
        Ok(parts.pop().unwrap_or_default())
    }
}
