use std::fmt::Display;
use std::path::{Path, PathBuf};

use itertools::Itertools;

pub trait ErrorType: Display + PartialEq {}

// Where a problem was found. Line 0 stands for the whole file (or for
// models that never came from a file at all)
#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    pub fn new(file: &Path, line: usize) -> Self {
        Location {
            file: file.to_path_buf(),
            line
        }
    }

    pub fn whole_file(file: &Path) -> Self {
        Location::new(file, 0)
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Error<T> {
    pub fn at(location: Location, error: T) -> Self {
        Error { location, error }
    }
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}

pub type Errors<T> = Vec<Error<T>>;

// One error per line, in the order they were found
pub fn render_errors<T: ErrorType>(errors: &Errors<T>) -> String {
    errors.iter().map(|e| e.to_string()).join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Oops;

    impl Display for Oops {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "oops")
        }
    }

    impl ErrorType for Oops {}

    #[test]
    fn location_display() {
        let path = PathBuf::from("grammar.rg");
        assert_eq!(Location::whole_file(&path).to_string(), "grammar.rg");
        assert_eq!(Location::new(&path, 4).to_string(), "grammar.rg:4");
    }

    #[test]
    fn render_keeps_order() {
        let path = PathBuf::from("g.rg");
        let errors = vec![
            Error::at(Location::new(&path, 1), Oops),
            Error::at(Location::new(&path, 7), Oops)
        ];
        let rendered = render_errors(&errors);
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[g.rg:1]"));
        assert!(lines[1].contains("[g.rg:7]"));
    }
}
