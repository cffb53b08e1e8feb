use std::fmt::{self, Display, Formatter};

use cursor::Line;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub data: TokenData<'a>,
    pub lexeme: &'a str,
    pub line: Line,
}

impl<'a> Token<'a> {
    pub fn new(data: TokenData<'a>, lexeme: &'a str, line: Line) -> Token<'a> {
        Self { data, lexeme, line }
    }

    pub fn eof(line: Line) -> Token<'a> {
        Self::new(TokenData::Eof, "", line)
    }

    pub fn ty(&self) -> TokenType {
        TokenType::from(&self.data)
    }

    pub fn lexeme(&self) -> &'a str {
        self.lexeme
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Where a diagnostic about this token points to: `end` for the end
    /// marker, the quoted lexeme otherwise.
    pub fn location(&self) -> String {
        match self.data {
            TokenData::Eof => "end".to_string(),
            _ => format!("'{}'", self.lexeme),
        }
    }
}

/// `{}` prints the lexeme, `{:#}` prints `<TYPE> <lexeme> <literal>`.
impl Display for Token<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write!(f, "{}", self.lexeme);
        }

        let ty: &'static str = (&self.data).into();
        match self.data {
            TokenData::Str(s) => write!(f, "{ty} {} {s}", self.lexeme),
            TokenData::Number(n) => write!(f, "{ty} {} {}", self.lexeme, number_literal(n)),
            _ => write!(f, "{ty} {} null", self.lexeme),
        }
    }
}

/// Renders a number the way literals are echoed back: always with a
/// fractional part (`42.0`, `3.14`).
pub fn number_literal(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 {
        format!("{n:.1}")
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, strum::EnumDiscriminants, strum::IntoStaticStr)]
#[strum_discriminants(name(TokenType), derive(Hash))]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenData<'a> {
    // Single-character tokens.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens.
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals.
    Identifier,
    #[strum(serialize = "STRING")]
    Str(&'a str),
    Number(f64),

    // Keywords.
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,
    Eof,
}

impl<'a> TokenData<'a> {
    pub fn keyword(identifier: &str) -> Option<TokenData<'a>> {
        use TokenData::*;
        Some(match identifier {
            "and" => And,
            "class" => Class,
            "else" => Else,
            "false" => False,
            "for" => For,
            "fun" => Fun,
            "if" => If,
            "nil" => Nil,
            "or" => Or,
            "print" => Print,
            "return" => Return,
            "super" => Super,
            "this" => This,
            "true" => True,
            "var" => Var,
            "while" => While,
            _ => return None,
        })
    }
}
