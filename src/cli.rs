use std::path::PathBuf;

use clap::{Parser, Subcommand};

use regula::generator::DEFAULT_MAX_STEPS;

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Log conversion and parsing details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand)]
pub enum Command {
    /// Test words against a grammar
    Check {
        /// File containing the grammar
        grammar: PathBuf,

        /// Words to test
        inputs: Vec<String>
    },

    /// Test words against a finite automaton
    Simulate {
        /// File containing the automaton
        automaton: PathBuf,

        /// Words to test
        inputs: Vec<String>
    },

    /// Convert a grammar to a finite automaton
    ToAutomaton {
        /// File containing the grammar
        grammar: PathBuf
    },

    /// Convert a grammar to a regular expression
    ToRegex {
        /// File containing the grammar
        grammar: PathBuf,

        /// Write recursive grammars with `*` instead of failing on them
        #[arg(long)]
        closure: bool
    },

    /// Convert a finite automaton to a grammar
    ToGrammar {
        /// File containing the automaton
        automaton: PathBuf
    },

    /// Generate words of a grammar's language
    Generate {
        /// File containing the grammar
        grammar: PathBuf,

        /// Start symbol (default: first in the file)
        #[arg(short, long, value_name = "SYMBOL")]
        start: Option<String>,

        /// Amount to generate (default: 1)
        #[arg(short = 'n', long, value_name = "AMOUNT")]
        amount: Option<u32>,

        /// Longest derivation to attempt
        #[arg(long, value_name = "STEPS", default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize
    },

    /// Test words against a regular expression
    Regex {
        /// The pattern, matched against whole words
        pattern: String,

        /// Words to test
        inputs: Vec<String>
    },

    /// Print the built-in example grammar
    Example
}
