use super::CompileErrorType::UndefinedNonterminal;
use super::{CompileError, CompileErrors, Grammar, ProductionBody, Rule};

fn get_rule_undefined_symbols(rule: &Rule, grammar: &Grammar) -> CompileErrors {
    // Keep only the continuation nonterminals, then keep only the ones with
    // no production anywhere in the grammar
    rule.bodies.iter()
        .filter_map(ProductionBody::continuation)
        .filter(|symbol| grammar.production(symbol).is_none())
        .map(|symbol| CompileError {
            location: rule.location.clone(),
            error: UndefinedNonterminal(symbol.to_owned())
        })
        .collect()
}

// Every use of an undefined nonterminal, located at the rule that uses it
pub(super) fn verify_rules(rules: &[Rule], grammar: &Grammar) -> CompileErrors {
    rules.iter()
        .flat_map(|rule| get_rule_undefined_symbols(rule, grammar))
        .collect()
}
