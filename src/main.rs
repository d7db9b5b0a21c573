mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Command};
use regula::error_handling::{render_errors, Error, Location};
use regula::{convert, generator, parser, pattern, Automaton, Grammar};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("regula=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "regula=warn".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_verdicts(inputs: &[String], accepts: impl Fn(&str) -> bool) {
    for input in inputs {
        let shown = if input.is_empty() { "ε" } else { input.as_str() };
        let verdict = if accepts(input) { "accept" } else { "reject" };
        println!("{}\t{}", shown, verdict);
    }
}

fn convert_error(path: &Path, error: convert::ConvertErrorType) -> String {
    Error::at(Location::whole_file(path), error).to_string()
}

fn to_regex(grammar: &Grammar, path: &Path, closure: bool) -> Result<String, String> {
    match convert::to_regex(grammar) {
        Err(convert::ConvertErrorType::Cycle(nonterminal)) if closure => {
            tracing::warn!(%nonterminal, "grammar is recursive, eliminating states instead");
            convert::to_regex_with_closure(grammar).map_err(|e| convert_error(path, e))
        }
        result => result.map_err(|e| convert_error(path, e)),
    }
}

fn load_grammar(path: &PathBuf) -> Result<Grammar, String> {
    parser::parse_grammar_file(path).map_err(|e| render_errors(&e))
}

fn load_automaton(path: &PathBuf) -> Result<Automaton, String> {
    parser::parse_automaton_file(path).map_err(|e| render_errors(&e))
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Check { grammar, inputs } => {
            let loaded = load_grammar(&grammar)?;
            print_verdicts(&inputs, |input| regula::grammar::accepts(&loaded, input));
        }
        Command::Simulate { automaton, inputs } => {
            let loaded = load_automaton(&automaton)?;
            if !loaded.is_ready() {
                tracing::warn!("automaton needs an initial state and a final state");
            }
            print_verdicts(&inputs, |input| regula::automaton::accepts(&loaded, input));
        }
        Command::ToAutomaton { grammar } => {
            let loaded = load_grammar(&grammar)?;
            print!("{}", convert::to_automaton(&loaded));
        }
        Command::ToRegex { grammar, closure } => {
            let loaded = load_grammar(&grammar)?;
            println!("{}", to_regex(&loaded, &grammar, closure)?);
        }
        Command::ToGrammar { automaton } => {
            let loaded = load_automaton(&automaton)?;
            let converted = convert::to_grammar(&loaded).map_err(|e| convert_error(&automaton, e))?;
            print!("{}", converted);
        }
        Command::Generate { grammar, start, amount, max_steps } => {
            let loaded = load_grammar(&grammar)?;
            let mut rng = rand::thread_rng();
            for _ in 0..amount.unwrap_or(1) {
                let word = match &start {
                    Some(start) => generator::generate_with_override(&loaded, start, &grammar, max_steps, &mut rng),
                    None => generator::generate(&loaded, &grammar, max_steps, &mut rng),
                }
                .map_err(|e| e.to_string())?;
                println!("{}", word);
            }
        }
        Command::Regex { pattern, inputs } => {
            let compiled = pattern::compile(&pattern).map_err(|e| e.to_string())?;
            print_verdicts(&inputs, |input| compiled.is_match(input));
        }
        Command::Example => {
            let example = Grammar::example();
            println!("{}", example.definition());
            print!("{}", example);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
