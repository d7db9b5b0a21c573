use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    // `->` or `=`
    Equals,
    Or,
    // `ε`, `''` or `""`
    Empty,
    Word(String)
}

pub fn lex_quoted(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    let quote = line.next(); // Consume open quote
    let token_text: String = line.peeking_take_while(|&c| Some(c) != quote).collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != quote {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    if token_text.is_empty() {
        Ok(Token::Empty)
    } else {
        Ok(Token::Word(token_text))
    }
}

pub fn lex_word(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Word(line.peeking_take_while(char::is_ascii_alphanumeric).collect()))
}

// Drops a trailing `;` comment
pub fn strip_comment(line: &str) -> &str {
    line.split(';').next().unwrap_or_default()
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = strip_comment(line).chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if c == '-' {
            line_chars.next();
            if line_chars.next() != Some('>') {
                return Err(CompileErrorType::InvalidCharacter('-'));
            }
            tokens.push(Token::Equals);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if c == 'ε' {
            line_chars.next();
            tokens.push(Token::Empty);
        } else if c == '\"' || c == '\'' {
            tokens.push(lex_quoted(&mut line_chars)?);
        } else if c.is_ascii_alphanumeric() {
            tokens.push(lex_word(&mut line_chars)?);
        } else if c.is_whitespace() {
            line_chars.next();
        } else {
            return Err(CompileErrorType::InvalidCharacter(c));
        }
    }

    return Ok(tokens);
}
