mod expr;
mod printer;

use diagnostics::Diagnostics;
use scanner::{Token, TokenData, TokenType};

pub use expr::{Expr, LiteralValue};
pub use printer::print;

use TokenType::*;

pub type Result<'a, T> = std::result::Result<T, ParserError<'a>>;

/// Maximum number of operators and groupings on any path from the root of the
/// tree to a literal. Evaluating and printing recurse along these paths.
pub const MAX_DEPTH: usize = 200;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParserErrorType {
    #[error("Expect expression.")]
    ExpectedExpression,
    #[error("Expect ')' after expression.")]
    ExpectedRightParen,
    #[error("Expect end of expression.")]
    ExpectedEof,
    #[error("Too much nesting.")]
    TooMuchNesting,
}

impl ParserErrorType {
    fn at<'a>(self, token: Token<'a>) -> ParserError<'a> {
        ParserError { error: self, token }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {}] Error at {}: {}", .token.line(), .token.location(), .error)]
pub struct ParserError<'a> {
    pub error: ParserErrorType,
    pub token: Token<'a>,
}

/// Recursive descent over
///
/// ```text
/// expression → equality
/// equality   → comparison ( ( "!=" | "==" ) comparison )*
/// comparison → term ( ( ">" | ">=" | "<" | "<=" ) term )*
/// term       → factor ( ( "-" | "+" ) factor )*
/// factor     → unary ( ( "/" | "*" ) unary )*
/// unary      → ( "!" | "-" ) unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
///
/// Trees deeper than [`MAX_DEPTH`] are rejected.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    current: usize,
    /// Open groupings and unary operators around the current token.
    nesting: usize,
    /// Height of the expression returned last.
    height: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut tokens: Vec<Token<'a>>) -> Self {
        if tokens.last().map(Token::ty) != Some(Eof) {
            let line = tokens.last().map(Token::line).unwrap_or_default();
            tokens.push(Token::eof(line));
        }
        Self { tokens, current: 0, nesting: 0, height: 0 }
    }

    /// Parses exactly one expression. The first syntax error aborts parsing,
    /// is reported to `diagnostics` and no tree is returned.
    pub fn parse(mut self, diagnostics: &mut Diagnostics) -> Option<Expr<'a>> {
        match self.expression_until_eof() {
            Ok(expr) => {
                log::debug!("Parsed expression: {}", expr);
                Some(expr)
            }
            Err(e) => {
                log::debug!("Parse error: {:?}", e);
                diagnostics.report_at(e.token.line(), e.token.location(), e.error);
                None
            }
        }
    }

    fn expression_until_eof(&mut self) -> Result<'a, Expr<'a>> {
        let expr = self.expression()?;
        self.consume_or_error(Eof, ParserErrorType::ExpectedEof)?;
        Ok(expr)
    }

    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let BangEqual | EqualEqual = self.peek() {
            let operator = self.advance();
            expr = self.binary(expr, operator, Self::comparison)?;
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.term()?;

        while let Greater | GreaterEqual | Less | LessEqual = self.peek() {
            let operator = self.advance();
            expr = self.binary(expr, operator, Self::term)?;
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.factor()?;

        while let Plus | Minus = self.peek() {
            let operator = self.advance();
            expr = self.binary(expr, operator, Self::factor)?;
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Star | Slash = self.peek() {
            let operator = self.advance();
            expr = self.binary(expr, operator, Self::unary)?;
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Minus | Bang = self.peek() {
            let operator = self.advance();
            let right = Box::new(self.nested(&operator, Self::unary)?);
            self.grow(self.height, &operator)?;
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn binary(
        &mut self,
        left: Expr<'a>,
        operator: Token<'a>,
        operand: fn(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        let left_height = self.height;
        let right = operand(self)?;
        self.grow(left_height.max(self.height), &operator)?;
        Ok(Expr::Binary { left: Box::new(left), operator, right: Box::new(right) })
    }

    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        let token = self.advance();
        log::trace!("Parsing primary expression at {:?}", token);
        self.height = 0;
        match token.data {
            TokenData::False => Ok(Expr::Literal(LiteralValue::Boolean(false))),
            TokenData::True => Ok(Expr::Literal(LiteralValue::Boolean(true))),
            TokenData::Nil => Ok(Expr::Literal(LiteralValue::Nil)),
            TokenData::Str(s) => Ok(Expr::Literal(LiteralValue::Str(s))),
            TokenData::Number(n) => Ok(Expr::Literal(LiteralValue::Number(n))),
            TokenData::LeftParen => {
                let expr = self.nested(&token, Self::expression)?;

                self.consume_or_error(RightParen, ParserErrorType::ExpectedRightParen)?;
                self.grow(self.height, &token)?;

                Ok(Expr::Grouping(Box::new(expr)))
            }

            _ => Err(ParserErrorType::ExpectedExpression.at(token)),
        }
    }

    /// Parses the operand of a grouping or unary operator, refusing to
    /// recurse any deeper than [`MAX_DEPTH`].
    fn nested(
        &mut self,
        token: &Token<'a>,
        parse: fn(&mut Self) -> Result<'a, Expr<'a>>,
    ) -> Result<'a, Expr<'a>> {
        if self.nesting == MAX_DEPTH {
            return Err(ParserErrorType::TooMuchNesting.at(token.clone()));
        }
        self.nesting += 1;
        let expr = parse(self);
        self.nesting -= 1;
        expr
    }

    /// Records the height of a node built on top of a subtree of `height`.
    fn grow(&mut self, height: usize, token: &Token<'a>) -> Result<'a, ()> {
        if height >= MAX_DEPTH {
            return Err(ParserErrorType::TooMuchNesting.at(token.clone()));
        }
        self.height = height + 1;
        Ok(())
    }

    fn consume(&mut self, ty: TokenType) -> std::result::Result<Token<'a>, Token<'a>> {
        if self.peek() == ty {
            Ok(self.advance())
        } else {
            Err(self.peek_token().clone())
        }
    }

    fn consume_or_error(&mut self, ty: TokenType, error_type: ParserErrorType) -> Result<'a, Token<'a>> {
        self.consume(ty).map_err(|token| error_type.at(token))
    }
}

// Helpers
impl<'a> Parser<'a> {
    fn peek_token(&self) -> &Token<'a> {
        &self.tokens[self.current]
    }

    fn peek(&self) -> TokenType {
        self.peek_token().ty()
    }

    /// Never moves past the trailing `Eof`.
    fn advance(&mut self) -> Token<'a> {
        let token = self.peek_token().clone();
        if token.ty() != Eof {
            self.current += 1;
        }
        token
    }
}
