use std::path::{Path, PathBuf};

use itertools::Itertools;

use super::{read_file, rule_lines, strip_comment, CompileError, CompileErrorType, FileResult, Location, Result};
use crate::automaton::{Automaton, Position, StateId};

fn parse_state_id(word: Option<&str>) -> Result<StateId> {
    let word = word.ok_or(CompileErrorType::InvalidStateId(String::new()))?;
    word.parse().map_err(|_| CompileErrorType::InvalidStateId(word.to_string()))
}

fn parse_coordinate(word: &str) -> Result<f64> {
    word.parse().map_err(|_| CompileErrorType::InvalidPosition(word.to_string()))
}

fn parse_symbol(word: &str) -> Result<char> {
    word.chars()
        .exactly_one()
        .map_err(|_| CompileErrorType::InvalidSymbol(word.to_string()))
}

// `state <id> [<x> <y>]`
fn parse_state<'a>(mut words: impl Iterator<Item = &'a str>, automaton: &mut Automaton) -> Result<()> {
    let id = parse_state_id(words.next())?;
    let position = match (words.next(), words.next()) {
        (None, _) => None,
        (Some(x), Some(y)) => Some(Position { x: parse_coordinate(x)?, y: parse_coordinate(y)? }),
        (Some(x), None) => return Err(CompileErrorType::InvalidPosition(x.to_string())),
    };

    let state = automaton.ensure_state(id);
    if let Some(position) = position {
        state.position = position;
    }
    Ok(())
}

// `<from> -> <to> : <symbol>...`
fn parse_transition<'a>(from: &str, mut words: impl Iterator<Item = &'a str>, automaton: &mut Automaton) -> Result<()> {
    let from = parse_state_id(Some(from))?;
    if words.next() != Some("->") {
        return Err(CompileErrorType::MissingArrow);
    }
    let to = parse_state_id(words.next())?;
    if words.next() != Some(":") {
        return Err(CompileErrorType::MissingSymbols);
    }
    let symbols = words.map(parse_symbol).collect::<Result<Vec<_>>>()?;
    if symbols.is_empty() {
        return Err(CompileErrorType::MissingSymbols);
    }

    automaton.ensure_state(from);
    automaton.ensure_state(to);
    automaton.add_transition(from, to, symbols);
    Ok(())
}

fn parse_line(line: &str, automaton: &mut Automaton) -> Result<()> {
    // Give the punctuation room so it splits into words of its own
    let spaced = strip_comment(line)
        .replace("->", " -> ")
        .replace(':', " : ")
        .replace(',', " ");
    let mut words = spaced.split_whitespace();

    match words.next() {
        Some("state") => parse_state(words, automaton),
        Some("initial") => {
            let id = parse_state_id(words.next())?;
            automaton.ensure_state(id);
            automaton.set_initial(id);
            Ok(())
        }
        Some("final") => {
            let ids = words.map(|w| parse_state_id(Some(w))).collect::<Result<Vec<_>>>()?;
            if ids.is_empty() {
                return Err(CompileErrorType::InvalidStateId(String::new()));
            }
            for id in ids {
                automaton.ensure_state(id).is_final = true;
            }
            Ok(())
        }
        Some(word) if word.chars().all(|c| c.is_ascii_digit()) => parse_transition(word, words, automaton),
        Some(word) => Err(CompileErrorType::UnknownDirective(word.to_string())),
        None => Err(CompileErrorType::UnexpectedBlankLine),
    }
}

pub fn parse_automaton_str(text: &str, path: &Path) -> FileResult<Automaton> {
    let mut automaton = Automaton::new();
    let errors = rule_lines(text)
        .filter_map(|(num, line)| {
            parse_line(line, &mut automaton)
                .err()
                .map(|error| CompileError::at(Location::new(path, num), error))
        })
        .collect_vec();

    if !errors.is_empty() {
        return Err(errors);
    }

    tracing::debug!(
        file = %path.display(),
        states = automaton.states.len(),
        transitions = automaton.transitions.len(),
        "parsed automaton"
    );
    Ok(automaton)
}

pub fn parse_automaton_file(path: &PathBuf) -> FileResult<Automaton> {
    parse_automaton_str(&read_file(path)?, path)
}
