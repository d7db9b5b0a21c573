/*
    This module parses grammar (.rg) and automaton (.fa) files
*/

mod automaton;
mod lexer;
mod verifier;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error_handling::*;
use crate::grammar::*;
use itertools::Itertools;
use lexer::*;

pub use automaton::{parse_automaton_file, parse_automaton_str};
use verifier::verify_rules;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple separators
    UnexpectedEquals,
    // The user starts a rule line with something other than a nonterminal
    MissingNonterminal,
    // There is an unclosed quote
    UnmatchedQuote,
    // A character that can't appear in a grammar
    InvalidCharacter(char),
    // An alternative that isn't empty, a terminal, or a terminal followed by one nonterminal
    NotRightLinear(String),
    // A nonterminal is used but never defined
    UndefinedNonterminal(String),
    // Somehow a full rule was parsed as a single alternative
    // This is a problem with regula, not the file
    UnsplitAlternatives,
    // Automaton files: a state id that isn't a non-negative integer
    InvalidStateId(String),
    // Automaton files: a state position that isn't a pair of numbers
    InvalidPosition(String),
    // Automaton files: a transition without `->` between its states
    MissingArrow,
    // Automaton files: a transition without `:` and at least one symbol
    MissingSymbols,
    // Automaton files: a transition symbol longer than one character
    InvalidSymbol(String),
    // Automaton files: a line starting with something unrecognised
    UnknownDirective(String),
    // A blank line got too deep into the parser
    // This is a problem with regula, not the file
    UnexpectedBlankLine,
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::InvalidCharacter(a), CompileErrorType::InvalidCharacter(b)) => a == b,
            (CompileErrorType::NotRightLinear(a), CompileErrorType::NotRightLinear(b))
            | (CompileErrorType::UndefinedNonterminal(a), CompileErrorType::UndefinedNonterminal(b))
            | (CompileErrorType::InvalidStateId(a), CompileErrorType::InvalidStateId(b))
            | (CompileErrorType::InvalidPosition(a), CompileErrorType::InvalidPosition(b))
            | (CompileErrorType::InvalidSymbol(a), CompileErrorType::InvalidSymbol(b))
            | (CompileErrorType::UnknownDirective(a), CompileErrorType::UnknownDirective(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `->` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `->` encountered"),
            CompileErrorType::MissingNonterminal => write!(f, "Tried to define something other than a nonterminal"),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::InvalidCharacter(c) => write!(f, "Unexpected character `{}`", c),
            CompileErrorType::NotRightLinear(text) => write!(f, "`{}` is not right-linear (expected ε, a terminal, or a terminal followed by one nonterminal)", text),
            CompileErrorType::UndefinedNonterminal(nonterminal) => write!(f, "Could not find definition for `{}`", nonterminal),
            CompileErrorType::InvalidStateId(text) => write!(f, "`{}` is not a state id", text),
            CompileErrorType::InvalidPosition(text) => write!(f, "`{}` is not a position", text),
            CompileErrorType::MissingArrow => write!(f, "Expected `->` between the two states of a transition"),
            CompileErrorType::MissingSymbols => write!(f, "Expected `:` followed by the transition's symbols"),
            CompileErrorType::InvalidSymbol(text) => write!(f, "Transition symbol `{}` must be a single character", text),
            CompileErrorType::UnknownDirective(text) => write!(f, "Unknown line start `{}`", text),
            CompileErrorType::UnsplitAlternatives => write!(f, "Alternatives were not fully split (this is a problem with regula, not the file)"),
            CompileErrorType::UnexpectedBlankLine => write!(f, "Blank line encountered in rule parser (this is a problem with regula, not the file)"),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: &Path) -> CompileError {
    CompileError::at(Location::whole_file(file), CompileErrorType::FileError(error))
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: Nonterminal,
    bodies: Vec<ProductionBody>,
    location: Location
}

// An uppercase letter, optionally followed by digits (`S`, `Q12`)
pub fn is_nonterminal(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase()) && chars.all(|c| c.is_ascii_digit())
}

fn parse_body(text: String) -> Result<ProductionBody> {
    if text.is_empty() {
        return Ok(ProductionBody::Empty);
    }

    let split = text.find(|c: char| c.is_ascii_uppercase()).unwrap_or(text.len());
    let (terminal, nonterminal) = text.split_at(split);

    if nonterminal.is_empty() {
        Ok(ProductionBody::Terminal(terminal.to_string()))
    } else if terminal.is_empty() || !is_nonterminal(nonterminal) {
        Err(CompileErrorType::NotRightLinear(text))
    } else {
        Ok(ProductionBody::TerminalThenNonterminal(terminal.to_string(), nonterminal.to_string()))
    }
}

// The words of one alternative are read as a single run of text
fn parse_alternative(tokens: &[Token]) -> Result<ProductionBody> {
    let text = tokens.iter().map(|t| match t {
        Token::Equals => Err(CompileErrorType::UnexpectedEquals),
        Token::Or => Err(CompileErrorType::UnsplitAlternatives),
        Token::Empty => Ok(""),
        Token::Word(s) => Ok(s.as_str())
    }).collect::<Result<String>>()?;

    parse_body(text)
}

fn parse_alternatives(tokens: &[Token]) -> Result<Vec<ProductionBody>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    // Try to get the nonterminal the rule is for. The match returns a result
    // which is then unwrapped with the ? operator
    let symbol = match tokens.first() {
        Some(Token::Word(s)) if is_nonterminal(s) => Ok(s.clone()),
        Some(_) => Err(CompileErrorType::MissingNonterminal),
        None => Err(CompileErrorType::UnexpectedBlankLine)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let bodies = parse_alternatives(&tokens[2..])?;

    return Ok(Rule {
        symbol,
        bodies,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line, location.clone()))
        .map_err(|error| CompileError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    !strip_comment(line).trim().is_empty()
}

// The lines worth parsing, numbered from 1
fn rule_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(num, line)| (num + 1, line))
        .filter(|(_, line)| is_rule_line(line))
}

fn grammar_from_rules(rules: Vec<Rule>, path: &Path) -> Grammar {
    let Some(start) = rules.first().map(|rule| rule.symbol.clone()) else {
        tracing::warn!(file = %path.display(), "no rules found, using S -> ε");
        return Grammar::empty_word();
    };

    let mut grammar = Grammar::new(&start);
    for rule in &rules {
        for body in &rule.bodies {
            grammar.add_body(&rule.symbol, body.clone());
        }
    }

    // Dangling references only make some derivations dead ends
    for warning in verify_rules(&rules, &grammar) {
        tracing::warn!("{}", warning);
    }

    grammar
}

pub fn parse_grammar_str(text: &str, path: &Path) -> FileResult<Grammar> {
    let parsed_lines = rule_lines(text)
        .map(|(num, line)| parse_lex_line(line, Location::new(path, num)));

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    let grammar = grammar_from_rules(rules, path);
    tracing::debug!(file = %path.display(), productions = grammar.productions.len(), "parsed grammar");
    Ok(grammar)
}

fn read_file(path: &Path) -> FileResult<String> {
    std::fs::read_to_string(path).map_err(|e| vec![io_error(e, path)])
}

pub fn parse_grammar_file(path: &PathBuf) -> FileResult<Grammar> {
    parse_grammar_str(&read_file(path)?, path)
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn here() -> Location {
        Location::whole_file(Path::new(""))
    }

    fn tn(t: &str, n: &str) -> ProductionBody {
        ProductionBody::TerminalThenNonterminal(t.to_string(), n.to_string())
    }

    fn t(t: &str) -> ProductionBody {
        ProductionBody::Terminal(t.to_string())
    }

    #[test]
    fn nonterminal_names() {
        let names = vec!["S", "Q12", "s", "SA", "S1a", ""];
        let answers = vec![true, true, false, false, false, false];

        for (name, answer) in zip(names, answers) {
            assert_eq!(is_nonterminal(name), answer, "{name}");
        }
    }

    #[test]
    fn parse_normal_body() {
        let texts = vec!["", "a", "ab", "aA", "abQ3", "0B"];
        let answers = vec![
            ProductionBody::Empty,
            t("a"),
            t("ab"),
            tn("a", "A"),
            tn("ab", "Q3"),
            tn("0", "B"),
        ];

        for (text, answer) in zip(texts, answers) {
            assert_eq!(parse_body(text.to_string()).unwrap(), answer);
        }
    }

    #[test]
    fn parse_malformed_body() {
        for text in ["A", "Aa", "aAb", "aAB", "aA1b"] {
            assert_eq!(
                parse_body(text.to_string()),
                Err(CompileErrorType::NotRightLinear(text.to_string()))
            );
        }
    }

    #[test]
    fn parse_normal_line() {
        let lexed = lexer::lex_line("S -> a A | b | ε").unwrap();

        let answer = Rule {
            symbol: "S".to_string(),
            bodies: vec![tn("a", "A"), t("b"), ProductionBody::Empty],
            location: here()
        };

        assert_eq!(parse_line(&lexed[..], here()), Ok(answer));
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&[Token::Equals]), Err(CompileErrorType::UnexpectedEquals));
        assert_eq!(parse_alternative(&[Token::Or]), Err(CompileErrorType::UnsplitAlternatives));
    }

    #[test]
    fn empty_alternatives_are_epsilon() {
        let lexed = lexer::lex_line("S -> a |").unwrap();
        let rule = parse_line(&lexed[..], here()).unwrap();
        assert_eq!(rule.bodies, vec![t("a"), ProductionBody::Empty]);
    }

    #[test]
    fn parse_malformed_line() {
        // Blank
        assert_eq!(parse_line(&[], here()), Err(CompileErrorType::UnexpectedBlankLine));

        // Missing separator
        assert_eq!(parse_line(
            &lexer::lex_line("S a A").unwrap()[..],
            here()
        ), Err(CompileErrorType::MissingEquals));

        // Repeated separator
        assert_eq!(parse_line(
            &lexer::lex_line("S -> a -> b").unwrap()[..],
            here()
        ), Err(CompileErrorType::UnexpectedEquals));

        // Improper definition
        assert_eq!(parse_line(
            &lexer::lex_line("a -> b").unwrap()[..],
            here()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("| -> a").unwrap()[..],
            here()
        ), Err(CompileErrorType::MissingNonterminal));
        assert_eq!(parse_line(
            &lexer::lex_line("-> a").unwrap()[..],
            here()
        ), Err(CompileErrorType::MissingNonterminal));
    }

    #[test]
    fn repeated_heads_merge() {
        let text = "; comment\nS -> aS\n\nS -> b\n";
        let grammar = parse_grammar_str(text, Path::new("mem.rg")).unwrap();

        assert_eq!(grammar.start, "S");
        assert_eq!(grammar.bodies("S"), &[tn("a", "S"), t("b")]);
    }

    #[test]
    fn blank_file_is_empty_word() {
        let grammar = parse_grammar_str("; nothing here\n\n", Path::new("mem.rg")).unwrap();
        assert_eq!(grammar, Grammar::empty_word());
    }

    #[test]
    fn parse_normal_file() {
        let example_path = PathBuf::from("example_data/example.rg");
        let example_parsed = parse_grammar_file(&example_path).unwrap();

        assert_eq!(example_parsed, Grammar::example());
    }

    #[test]
    fn parse_even_as_file() {
        let path = PathBuf::from("example_data/even_as.rg");
        let grammar = parse_grammar_file(&path).unwrap();

        assert_eq!(grammar.nonterminals(), vec!["S", "O"]);
        let words = vec!["", "b", "aa", "abab", "bbaab", "a", "ab", "aaa", "babbb"];
        let answers = vec![true, true, true, true, true, false, false, false, false];
        for (word, answer) in zip(words, answers) {
            assert_eq!(accepts(&grammar, word), answer, "{word}");
        }
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("example_data/malformed.rg");
        let example_parsed = parse_grammar_file(&example_path).unwrap_err();

        assert_eq!(example_parsed, vec![
            CompileError {
                location: Location::new(&example_path, 3),
                error: CompileErrorType::MissingNonterminal
            },
            CompileError {
                location: Location::new(&example_path, 5),
                error: CompileErrorType::NotRightLinear("aAb".to_string())
            },
            CompileError {
                location: Location::new(&example_path, 7),
                error: CompileErrorType::UnexpectedEquals
            }
        ]);
    }

    #[test]
    fn missing_file() {
        let path = PathBuf::from("example_data/does_not_exist.rg");
        let errors = parse_grammar_file(&path).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error,
            CompileErrorType::FileError(std::io::Error::from(std::io::ErrorKind::NotFound))
        );
    }
}
