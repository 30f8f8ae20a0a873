//! Lex a GPR string into a series of tokens for later parsing
use thiserror::Error;

use crate::io::gpr_parse::token::Token;

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
        }
    }

    /// Convert the source into tokens, terminated by [`Token::Eof`]
    pub fn lex(mut self) -> Result<Vec<Token>, LexerError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.tokens.push(Token::Eof);
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), LexerError> {
        let c: char = self.advance();
        match c {
            // Single Character Tokens
            '(' => self.add_token(Token::LeftParen),
            ')' => self.add_token(Token::RightParen),
            // Identifiers and Operators
            c if Lexer::is_identifier_char(c) => self.read_identifier(),
            // Whitespace
            c if c.is_whitespace() => {}
            other => {
                return Err(LexerError::InvalidCharacter {
                    character: other,
                    position: self.start,
                })
            }
        };
        Ok(())
    }

    fn advance(&mut self) -> char {
        let char_at_current = self.source[self.current];
        self.current += 1;
        char_at_current
    }

    fn read_identifier(&mut self) {
        while Lexer::is_identifier_char(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        match text.to_lowercase().as_str() {
            "and" => self.add_token(Token::And),
            "or" => self.add_token(Token::Or),
            _ => self.add_token(Token::Identifier(text)),
        }
    }

    /// Gene ids use letters, digits and a few separators, e.g. `Rv0001`, `YAL001C`, `10005.1`
    fn is_identifier_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-' | ':')
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        self.source[self.current]
    }

    fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

#[derive(Debug, Error, PartialEq, Clone)]
pub enum LexerError {
    #[error("Invalid character `{character}` at position {position}")]
    InvalidCharacter { character: char, position: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_gene() {
        let tokens = Lexer::new("Rv0023").lex().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Identifier(String::from("Rv0023")));
    }

    #[test]
    fn test_grouping() {
        let tokens = Lexer::new("(Rv0023 OR Rv0123)").lex().unwrap();
        let expected_tokens = vec![
            Token::LeftParen,
            Token::Identifier(String::from("Rv0023")),
            Token::Or,
            Token::Identifier(String::from("Rv0123")),
            Token::RightParen,
            Token::Eof,
        ];
        assert_eq!(tokens, expected_tokens);
    }

    #[test]
    fn test_identifier_separators() {
        let tokens = Lexer::new("10005.1 and HGNC:8906").lex().unwrap();
        assert_eq!(tokens[0], Token::Identifier("10005.1".to_string()));
        assert_eq!(tokens[1], Token::And);
        assert_eq!(tokens[2], Token::Identifier("HGNC:8906".to_string()));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            Lexer::new("a & b").lex(),
            Err(LexerError::InvalidCharacter {
                character: '&',
                position: 2
            })
        );
    }
}
