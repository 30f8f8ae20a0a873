use thiserror::Error;

use crate::io::gpr_parse::token::Token;
use crate::metabolic_model::gene::GroupType;

/*
GPR Grammar:
expression -> disjunction
disjunction -> conjunction ( "OR" conjunction )* ;
conjunction -> primary ( "AND" primary )* ;
primary -> GENE | "(" expression ")" ;

e.g. ( Gene1 AND Gene2) OR (Gene3 AND Gene4)
 */

/// Parsed gene protein reaction rule
///
/// Chains of the same operator are collected into a single n-ary group, parenthesised
/// sub-expressions stay nested.
#[derive(Clone, Debug, PartialEq)]
pub enum GprExpr {
    /// A terminal gene, by id
    Gene(String),
    /// A group of sub-expressions joined by one operator
    Group(GroupType, Vec<GprExpr>),
}

static EOF: Token = Token::Eof;

/// GPR Parser
pub struct GPRParser {
    /// Vector of tokens from the GPR string
    tokens: Vec<Token>,
    /// Current token being processed
    current: usize,
}

impl GPRParser {
    /// Create a new GPRParser
    pub fn new(tokens: Vec<Token>) -> GPRParser {
        GPRParser { tokens, current: 0 }
    }

    // region Parsing Functions

    /// Parse the token vector into a GPR AST
    pub fn parse(&mut self) -> Result<GprExpr, ParseError> {
        let gpr = self.disjunction()?;
        if !self.is_at_end() {
            // If entire expression has not been parsed, an error has occurred
            return Err(ParseError::EarlyTermination);
        }
        Ok(gpr)
    }

    fn disjunction(&mut self) -> Result<GprExpr, ParseError> {
        let mut operands = vec![self.conjunction()?];
        while self.match_token(Token::Or) {
            operands.push(self.conjunction()?);
        }
        Ok(GPRParser::group(GroupType::Or, operands))
    }

    fn conjunction(&mut self) -> Result<GprExpr, ParseError> {
        let mut operands = vec![self.primary()?];
        while self.match_token(Token::And) {
            operands.push(self.primary()?);
        }
        Ok(GPRParser::group(GroupType::And, operands))
    }

    fn primary(&mut self) -> Result<GprExpr, ParseError> {
        if let Some(identifier) = self.match_identifier() {
            return Ok(GprExpr::Gene(identifier));
        }

        if self.match_token(Token::LeftParen) {
            let expr = self.disjunction()?;
            self.consume(Token::RightParen, "Expect ')' after expression.")?;
            return Ok(expr);
        }

        Err(ParseError::ExpectedExpression)
    }

    fn group(group_type: GroupType, mut operands: Vec<GprExpr>) -> GprExpr {
        if operands.len() == 1 {
            operands.remove(0)
        } else {
            GprExpr::Group(group_type, operands)
        }
    }

    // endregion Parsing Functions

    // region parsing helper functions

    /// Check whether the token at the current position matches `token`, if it does advance
    /// [`self.current`] and return true, otherwise return false
    fn match_token(&mut self, token: Token) -> bool {
        if self.check(&token) {
            self.advance();
            return true;
        }
        false
    }

    /// Similar to [`match_token`], but for matching an identifier token. If the current
    /// token is an identifier return `Some(GeneId)`, where GeneId is the gene's string identifier,
    /// otherwise return None
    fn match_identifier(&mut self) -> Option<String> {
        if let Token::Identifier(id) = self.peek() {
            let id = id.clone();
            self.advance();
            return Some(id);
        }
        None
    }

    /// Check whether the current token matches the provided `token`
    fn check(&self, token: &Token) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek() == token
    }

    /// Advance `self.current` one position unless at end of GPR Vec
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    /// Check whether the parser is at the end of the source Vec
    fn is_at_end(&self) -> bool {
        *self.peek() == Token::Eof
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.current).unwrap_or(&EOF)
    }

    /// Check whether the current token matches an input token, if it matches advance to the
    /// next token, and if it doesn't return an error. Used mainly for matching parenthesis in
    /// source GPR vec.
    fn consume(&mut self, token: Token, msg: &str) -> Result<(), ParseError> {
        if self.check(&token) {
            self.advance();
            return Ok(());
        }

        Err(ParseError::MissingToken(msg.to_string()))
    }

    // endregion parsing helper functions
}

/// Enum representing possible parse errors
#[derive(Debug, Error, PartialEq, Clone)]
pub enum ParseError {
    /// Missing expected token (e.g. a right parenthesis)
    #[error("Missing expected token: {0}")]
    MissingToken(String),
    /// No expression found when one was expected
    #[error("No expression found, check that the GPR string is not empty")]
    ExpectedExpression,
    /// Expression was not completed when parsing terminated
    #[error("Parsing terminated early, check for two gene identifiers without an operator")]
    EarlyTermination,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::gpr_parse::lexer::Lexer;

    fn parse(rule: &str) -> Result<GprExpr, ParseError> {
        let tokens = Lexer::new(rule).lex().unwrap();
        GPRParser::new(tokens).parse()
    }

    fn gene(id: &str) -> GprExpr {
        GprExpr::Gene(id.to_string())
    }

    #[test]
    fn single_gene_parse() {
        assert_eq!(parse("Rv1304").unwrap(), gene("Rv1304"));
    }

    #[test]
    fn chains_are_flattened() {
        assert_eq!(
            parse("a and b and c").unwrap(),
            GprExpr::Group(GroupType::And, vec![gene("a"), gene("b"), gene("c")])
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("a or b and c").unwrap(),
            GprExpr::Group(
                GroupType::Or,
                vec![
                    gene("a"),
                    GprExpr::Group(GroupType::And, vec![gene("b"), gene("c")])
                ]
            )
        );
    }

    #[test]
    fn grouping_parse() {
        assert_eq!(
            parse("(Rv3141 or Rv0023) and Rv018").unwrap(),
            GprExpr::Group(
                GroupType::And,
                vec![
                    GprExpr::Group(GroupType::Or, vec![gene("Rv3141"), gene("Rv0023")]),
                    gene("Rv018")
                ]
            )
        );
    }

    #[test]
    fn errors() {
        assert_eq!(parse(""), Err(ParseError::ExpectedExpression));
        assert_eq!(parse("a b"), Err(ParseError::EarlyTermination));
        assert!(matches!(parse("(a or b"), Err(ParseError::MissingToken(_))));
        assert_eq!(parse("a and"), Err(ParseError::ExpectedExpression));
    }
}
