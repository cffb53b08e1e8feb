use cursor::{Cursor, Line};
use diagnostics::Diagnostics;

pub mod token;
pub use token::{number_literal, Token, TokenData, TokenType};
use TokenData::*;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Invalid number literal: {0}")]
    InvalidNumber(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
}

pub struct Scanner<'a> {
    start: Cursor<'a>,
    current: Cursor<'a>,
    tokens: Vec<Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let cursor = Cursor::new(source);
        Self { start: cursor.clone(), current: cursor, tokens: Vec::new() }
    }

    /// Never fails: unscannable input is reported to `diagnostics` and skipped.
    /// The returned tokens always end with exactly one `Eof`.
    pub fn scan_tokens(mut self, diagnostics: &mut Diagnostics) -> Vec<Token<'a>> {
        loop {
            self.start = self.current.clone();
            let Some(c) = self.current.next() else {
                break;
            };

            if let Err(e) = self.scan_token(c) {
                log::debug!("Scan error: {:?}", e);
                diagnostics.report(e.line, e.error);
            }
        }

        self.tokens.push(Token::eof(self.current.line()));
        self.tokens
    }

    fn scan_token(&mut self, c: char) -> Result<(), ScanError> {
        match c {
            '(' => self.add_token(LeftParen),
            ')' => self.add_token(RightParen),
            '{' => self.add_token(LeftBrace),
            '}' => self.add_token(RightBrace),
            ',' => self.add_token(Comma),
            '.' => self.add_token(Dot),
            '-' => self.add_token(Minus),
            '+' => self.add_token(Plus),
            ';' => self.add_token(Semicolon),
            '*' => self.add_token(Star),

            '!' => self.add_token_if_followed_by('=', BangEqual, Bang),
            '=' => self.add_token_if_followed_by('=', EqualEqual, Equal),
            '<' => self.add_token_if_followed_by('=', LessEqual, Less),
            '>' => self.add_token_if_followed_by('=', GreaterEqual, Greater),

            '/' => {
                if self.current.advance_if('/') {
                    // Comment
                    self.current.advance_while(|c| c != '\n');
                } else {
                    self.add_token(Slash)
                }
            }

            ' ' | '\r' | '\t' | '\n' => (),

            '"' => return self.string(),

            d if d.is_ascii_digit() => return self.number(),

            c if is_identifier_start(c) => self.identifier(),

            c => return Err(self.error(ScanErrorType::UnexpectedCharacter(c))),
        }
        Ok(())
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.current)
    }

    fn add_token(&mut self, data: TokenData<'a>) {
        let token = Token::new(data, self.lexeme(), self.current.line());
        log::trace!("Scanned {:?}", token);
        self.tokens.push(token);
    }

    fn add_token_if_followed_by(&mut self, next: char, matched: TokenData<'a>, otherwise: TokenData<'a>) {
        if self.current.advance_if(next) {
            self.add_token(matched)
        } else {
            self.add_token(otherwise)
        }
    }

    fn error(&self, error: ScanErrorType) -> ScanError {
        ScanError { error, line: self.current.line() }
    }

    fn string(&mut self) -> Result<(), ScanError> {
        self.current.advance_while(|c| c != '"');

        if !self.current.advance_if('"') {
            return Err(self.error(ScanErrorType::UnterminatedString));
        }

        let lexeme = self.lexeme();
        self.add_token(Str(&lexeme[1..lexeme.len() - 1]));
        Ok(())
    }

    fn number(&mut self) -> Result<(), ScanError> {
        self.current.advance_while(|c| c.is_ascii_digit());

        if self.current.peek() == Some('.') && self.current.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.current.next();
            self.current.advance_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.lexeme();
        let n = lexeme.parse().map_err(|_| self.error(ScanErrorType::InvalidNumber(lexeme.to_string())))?;
        self.add_token(Number(n));
        Ok(())
    }

    fn identifier(&mut self) {
        self.current.advance_while(|c| is_identifier_start(c) || c.is_ascii_digit());
        self.add_token(TokenData::keyword(self.lexeme()).unwrap_or(Identifier));
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scan(source: &str) -> (Vec<Token>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        (tokens, diagnostics)
    }

    fn scan_ok(source: &str) -> Vec<Token> {
        let (tokens, diagnostics) = scan(source);
        assert!(!diagnostics.has_errors(), "{diagnostics}");
        tokens
    }

    fn types(source: &str) -> Vec<TokenType> {
        scan_ok(source).iter().map(Token::ty).collect()
    }

    #[test]
    fn empty_source() {
        assert_eq!(scan_ok(""), vec![Token::eof(Line(1))]);
        assert_eq!(scan_ok("   \t\r\n\n"), vec![Token::eof(Line(3))]);
    }

    #[test]
    fn string_literals() {
        assert_eq!(
            scan_ok("\"hello world\""),
            vec![Token::new(Str("hello world"), "\"hello world\"", Line(1)), Token::eof(Line(1))]
        );

        assert_eq!(scan_ok("\"\"")[0].data, Str(""));
    }

    #[test]
    fn unterminated_string() {
        let (tokens, diagnostics) = scan("\"abc");
        assert_eq!(tokens, vec![Token::eof(Line(1))]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Line(1));
        assert_eq!(diagnostics.to_string(), "[line 1] Error: Unterminated string.");

        // Reported on the line where scanning stopped
        let (tokens, diagnostics) = scan("1 \"hello\nworld\n");
        assert_eq!(tokens.iter().map(Token::ty).collect::<Vec<_>>(), vec![TokenType::Number, TokenType::Eof]);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Line(3));
    }

    #[test]
    fn multiline_string_counts_newlines_only() {
        let tokens = scan_ok("\"a\nb\" +\n1");
        assert_eq!(tokens[0], Token::new(Str("a\nb"), "\"a\nb\"", Line(2)));
        assert_eq!(tokens[1].line, Line(2));
        assert_eq!(tokens[2].line, Line(3));
        assert_eq!(tokens[3], Token::eof(Line(3)));
    }

    #[test]
    fn two_char_tokens() {
        use TokenType::*;
        assert_eq!(
            types("! != = == < <= > >="),
            vec![Bang, BangEqual, Equal, EqualEqual, Less, LessEqual, Greater, GreaterEqual, Eof]
        );
        assert_eq!(types("!==="), vec![BangEqual, EqualEqual, Eof]);
    }

    #[test]
    fn single_char_tokens() {
        let tokens = scan_ok("=(){},.-+;*/!<>");
        assert_eq!(
            tokens.iter().map(|t| t.lexeme).collect::<Vec<_>>(),
            vec!["=", "(", ")", "{", "}", ",", ".", "-", "+", ";", "*", "/", "!", "<", ">", ""]
        );

        use TokenType::*;
        assert_eq!(
            tokens.iter().map(Token::ty).collect::<Vec<_>>(),
            vec![
                Equal, LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus,
                Semicolon, Star, Slash, Bang, Less, Greater, Eof
            ]
        );
    }

    #[test]
    fn comments() {
        assert_eq!(
            scan_ok("a // comment\nb"),
            vec![
                Token::new(Identifier, "a", Line(1)),
                Token::new(Identifier, "b", Line(2)),
                Token::eof(Line(2)),
            ]
        );
        assert_eq!(scan_ok("// only a comment"), vec![Token::eof(Line(1))]);
        assert_eq!(types("4 / 2"), vec![TokenType::Number, TokenType::Slash, TokenType::Number, TokenType::Eof]);
    }

    #[test]
    fn numbers() {
        assert_eq!(scan_ok("123")[0], Token::new(Number(123.0), "123", Line(1)));
        assert_eq!(scan_ok("3.14")[0], Token::new(Number(3.14), "3.14", Line(1)));

        assert_eq!(types("1."), vec![TokenType::Number, TokenType::Dot, TokenType::Eof]);
        assert_eq!(types(".5"), vec![TokenType::Dot, TokenType::Number, TokenType::Eof]);
        assert_eq!(types("-7"), vec![TokenType::Minus, TokenType::Number, TokenType::Eof]);
    }

    #[test]
    fn number_literals_round_trip() {
        for source in ["0", "7", "42", "1234.5", "0.001", "65536.25"] {
            let tokens = scan_ok(source);
            let Number(n) = tokens[0].data else { panic!("not a number: {:?}", tokens[0]) };
            assert_eq!(number_literal(n).parse::<f64>().unwrap(), source.parse::<f64>().unwrap());
        }
    }

    #[test]
    fn identifiers_and_keywords() {
        use TokenType::*;
        assert_eq!(
            types("and class else false for fun if nil or print return super this true var while"),
            vec![
                And, Class, Else, False, For, Fun, If, Nil, Or, Print, Return, Super, This, True,
                Var, While, Eof
            ]
        );
        assert_eq!(types("_foo bar2 nilly orchid"), vec![Identifier, Identifier, Identifier, Identifier, Eof]);
    }

    #[test]
    fn unexpected_characters_are_skipped() {
        let (tokens, diagnostics) = scan("1 @ 2\n$#");
        assert_eq!(
            tokens,
            vec![
                Token::new(Number(1.0), "1", Line(1)),
                Token::new(Number(2.0), "2", Line(1)),
                Token::eof(Line(2)),
            ]
        );
        assert_eq!(
            diagnostics.to_string(),
            "[line 1] Error: Unexpected character: @\n\
             [line 2] Error: Unexpected character: $\n\
             [line 2] Error: Unexpected character: #"
        );
    }

    #[test]
    fn eof_is_on_the_last_line() {
        let tokens = scan_ok("(\n\n)\n");
        assert_eq!(tokens.last(), Some(&Token::eof(Line(4))));
        assert_eq!(tokens.iter().filter(|t| t.ty() == TokenType::Eof).count(), 1);
    }
}
