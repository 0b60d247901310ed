//! The tokenizer never fails. A character that does not start any token is published as an
//! `Invalid` token, and it is responsibility of callers to reject the source code as a lexical
//! error when they see one.
//!
//! Whitespace and comments are skipped, but they still advance the tracked position.
use log::trace;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Position in a text document expressed as one-based line and column.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone)]
pub struct Position {
    /// Line position in a document (one-based).
    pub line: usize,
    /// Column on a line in a document (one-based), counted in characters.
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

// The effective range of a token.
// `start` inclusive, `end` exclusive.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Default)]
pub struct EffectiveRange {
    pub length: usize,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub range: EffectiveRange,
    text: String,
}

impl Token {
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, range: EffectiveRange) -> Self {
        Self {
            kind,
            range,
            text: text.into(),
        }
    }

    /// The source text of this token. Empty for `EndOfFile`.
    pub fn text(&self) -> &str {
        self.text.as_str()
    }

    pub fn position(&self) -> Position {
        self.range.start
    }

    pub fn line(&self) -> usize {
        self.range.start.line
    }

    pub fn column(&self) -> usize {
        self.range.start.column
    }

    pub fn is_invalid(&self) -> bool {
        self.kind == TokenKind::Invalid
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum TokenKind {
    // Keywords
    Function,
    Return,

    // Primitive
    Identifier,
    Number,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Assign,

    // punctuations
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    // End of input source
    EndOfFile,

    // A character which doesn't start any token.
    Invalid,
}

#[derive(Debug)]
pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    at_end: bool,
    /// Set after `EndOfFile` has been returned once.
    finished: bool,
    /// Tracking the range of token.
    lineno: usize,
    columnno: usize,
    start_position: Option<Position>,
    token_text: String,

    /// Remember a peeked value.
    peeked: Option<Token>,
}

impl<'a> Tokenizer<'a> {
    pub fn from_string<S: AsRef<str> + ?Sized>(src: &'a S) -> Tokenizer<'a> {
        let mut iter = src.as_ref().chars().peekable();
        let at_end = iter.peek().is_none();

        Tokenizer {
            chars: iter,
            at_end,
            finished: false,
            lineno: 1,
            columnno: 1,
            start_position: None,
            token_text: "".to_string(),
            peeked: None,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.at_end
    }

    /// Returns a reference to the `next_token()` value without advance the tokenizer.
    pub fn peek(&mut self) -> &Token {
        let token = match self.peeked.take() {
            Some(v) => v,
            None => self.advance_token(),
        };

        self.peeked.get_or_insert(token)
    }

    pub fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    pub fn current_position(&self) -> Position {
        Position {
            line: self.lineno,
            column: self.columnno,
        }
    }

    /// Returns the next token. After the end of input, `EndOfFile` is returned repeatedly.
    pub fn next_token(&mut self) -> Token {
        match self.peeked.take() {
            Some(v) => v,
            None => self.advance_token(),
        }
    }

    fn begin_token(&mut self) {
        self.token_text.clear();
        self.start_position = Some(self.current_position());
    }

    fn end_token(&mut self, kind: TokenKind) -> Token {
        let start = self
            .start_position
            .take()
            .unwrap_or_else(|| self.current_position());

        Token {
            kind,
            range: EffectiveRange {
                length: self.token_text.chars().count(),
                start,
                end: self.current_position(),
            },
            text: self.token_text.clone(),
        }
    }

    fn advance_token(&mut self) -> Token {
        self.skip_trivia();
        self.begin_token();

        let kind = match self.peek_char() {
            None => TokenKind::EndOfFile,
            Some(nextc) => match nextc {
                '0'..='9' => self.read_number(),
                'a'..='z' | 'A'..='Z' | '_' => self.read_name(),
                x => {
                    self.next_char();
                    match x {
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        '*' => TokenKind::Star,
                        '/' => TokenKind::Slash,
                        '^' => TokenKind::Caret,
                        '=' => TokenKind::Assign,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        ',' => TokenKind::Comma,
                        ';' => TokenKind::Semicolon,
                        _ => TokenKind::Invalid,
                    }
                }
            },
        };

        let token = self.end_token(kind);
        trace!("[token] {} `{}` at {}", token.kind, token.text(), token.position());
        token
    }

    fn read_name(&mut self) -> TokenKind {
        while let Some(nextc) = self.peek_char() {
            match nextc {
                'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => {
                    self.next_char();
                }
                _ => break,
            };
        }

        match self.token_text.as_str() {
            "function" | "func" => TokenKind::Function,
            "return" => TokenKind::Return,
            _ => TokenKind::Identifier,
        }
    }

    // A second decimal point terminates the number. It is left for the next token.
    fn read_number(&mut self) -> TokenKind {
        let mut decimal_seen = false;

        while let Some(nextc) = self.peek_char() {
            match nextc {
                '0'..='9' => {}
                '.' if !decimal_seen => decimal_seen = true,
                _ => break,
            };
            self.next_char();
        }

        TokenKind::Number
    }

    fn peek_char(&mut self) -> Option<char> {
        let c = self.chars.peek();
        self.at_end = c.is_none();
        c.copied()
    }

    // Peeks the character after the next one.
    fn peek_second_char(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;

        self.token_text.push(c);
        self.columnno += 1;

        if c == '\n' {
            self.lineno += 1;
            self.columnno = 1;
        }

        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if !c.is_whitespace() {
                break;
            }
            self.next_char();
        }
    }

    fn skip_line_comment(&mut self) {
        self.next_char(); // '/'
        self.next_char(); // '/'

        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.next_char();
        }
    }

    // An unterminated block comment is consumed through the end of input.
    fn skip_block_comment(&mut self) {
        self.next_char(); // '/'
        self.next_char(); // '*'

        while let Some(c) = self.peek_char() {
            if c == '*' && self.peek_second_char() == Some('/') {
                self.next_char();
                self.next_char();
                break;
            }
            self.next_char();
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.skip_whitespace();
            } else if c == '/' && self.peek_second_char() == Some('/') {
                self.skip_line_comment();
            } else if c == '/' && self.peek_second_char() == Some('*') {
                self.skip_block_comment();
            } else {
                break;
            }
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    /// Yields tokens up to and including exactly one `EndOfFile`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let token = self.next_token();

        if token.kind == TokenKind::EndOfFile {
            self.finished = true;
        }
        Some(token)
    }
}

/// Collects all tokens of `src`. The last token is always `EndOfFile`.
pub fn tokenize<S: AsRef<str> + ?Sized>(src: &S) -> Vec<Token> {
    Tokenizer::from_string(src).collect()
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Function => write!(f, "FUNCTION"),
            TokenKind::Return => write!(f, "RETURN"),
            TokenKind::Identifier => write!(f, "ID"),
            TokenKind::Number => write!(f, "NUM"),
            TokenKind::Plus => write!(f, "PLUS"),
            TokenKind::Minus => write!(f, "MINUS"),
            TokenKind::Star => write!(f, "MULT"),
            TokenKind::Slash => write!(f, "DIV"),
            TokenKind::Caret => write!(f, "POW"),
            TokenKind::Assign => write!(f, "ASSIGN"),
            TokenKind::LParen => write!(f, "LPAREN"),
            TokenKind::RParen => write!(f, "RPAREN"),
            TokenKind::LBrace => write!(f, "LBRACE"),
            TokenKind::RBrace => write!(f, "RBRACE"),
            TokenKind::Comma => write!(f, "COMMA"),
            TokenKind::Semicolon => write!(f, "SEMICOLON"),
            TokenKind::EndOfFile => write!(f, "EOF"),
            TokenKind::Invalid => write!(f, "UNKNOWN"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfFile => write!(f, "end of file"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn is_at_end_empty() {
        let tokenizer = Tokenizer::from_string("");
        assert!(tokenizer.is_at_end());
    }

    #[test]
    fn is_at_end_one() {
        let mut tokenizer = Tokenizer::from_string("o");
        assert!(!tokenizer.is_at_end());
        tokenizer.next_token();
        assert!(tokenizer.is_at_end());
    }

    #[test]
    fn tokenize_function() {
        let mut tokenizer = Tokenizer::from_string("func ab_01(x)");

        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::Function);
        assert_eq!(
            token.range,
            EffectiveRange {
                start: Position { line: 1, column: 1 },
                end: Position { line: 1, column: 5 },
                length: 4
            }
        );

        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text(), "ab_01");
        assert_eq!(
            token.range,
            EffectiveRange {
                start: Position { line: 1, column: 6 },
                end: Position {
                    line: 1,
                    column: 11
                },
                length: 5
            }
        );

        assert_eq!(tokenizer.next_token().kind, TokenKind::LParen);
        assert_eq!(tokenizer.next_token().kind, TokenKind::Identifier);
        assert_eq!(tokenizer.next_token().kind, TokenKind::RParen);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::EndOfFile);
        assert_eq!(token.text(), "");
        assert!(tokenizer.is_at_end());
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("+-*/^=(){},;"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Caret,
                TokenKind::Assign,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Comma,
                TokenKind::Semicolon,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn keywords() {
        assert_eq!(
            kinds("function func return returns _func"),
            vec![
                TokenKind::Function,
                TokenKind::Function,
                TokenKind::Return,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn numbers() {
        let tokens = tokenize("42 3.14 7.");

        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text(), "42");
        assert_eq!(tokens[1].text(), "3.14");
        assert_eq!(tokens[2].text(), "7.");
        assert_eq!(tokens[3].kind, TokenKind::EndOfFile);
    }

    #[test]
    fn second_decimal_point_terminates_number() {
        let tokens = tokenize("1.2.3");

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text(), "1.2");
        assert_eq!(tokens[1].kind, TokenKind::Invalid);
        assert_eq!(tokens[1].text(), ".");
        assert_eq!(tokens[1].column(), 4);
        assert_eq!(tokens[2].kind, TokenKind::Number);
        assert_eq!(tokens[2].text(), "3");
    }

    #[test]
    fn number_followed_by_name() {
        let tokens = tokenize("2x");

        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].text(), "2");
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text(), "x");
    }

    #[test]
    fn comments() {
        let tokens = tokenize("// line\na /* block\n comment */ b");

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text(), "a");
        assert_eq!(tokens[0].position(), Position { line: 2, column: 1 });
        assert_eq!(tokens[1].text(), "b");
        assert_eq!(tokens[1].position(), Position { line: 3, column: 13 });
        assert_eq!(tokens[2].kind, TokenKind::EndOfFile);
    }

    #[test]
    fn unterminated_block_comment() {
        let tokens = tokenize("a /* never closed\n b c");

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text(), "a");
        assert_eq!(tokens[1].kind, TokenKind::EndOfFile);
        assert_eq!(tokens[1].position(), Position { line: 2, column: 5 });
    }

    #[test]
    fn slash_is_not_a_comment() {
        assert_eq!(
            kinds("a / b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn invalid_character() {
        let tokens = tokenize("x = 1;\n  y @ 2");
        let invalid = tokens.iter().find(|t| t.is_invalid());

        assert_matches!(invalid, Some(token) => {
            assert_eq!(token.text(), "@");
            assert_eq!(token.line(), 2);
            assert_eq!(token.column(), 5);
        });
    }

    #[test]
    fn exactly_one_end_of_file() {
        let tokenizer = Tokenizer::from_string("a b");
        let tokens = tokenizer.collect::<Vec<_>>();

        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens
                .iter()
                .filter(|t| t.kind == TokenKind::EndOfFile)
                .count(),
            1
        );
    }

    #[test]
    fn restartable_from_scratch() {
        let src = "function f() { return 1; }";

        assert_eq!(tokenize(src), tokenize(src));
    }

    #[test]
    fn peek0() {
        let mut tokenizer = Tokenizer::from_string("1 2 3");

        // peek() lets us see into the future
        assert_eq!(tokenizer.peek().text(), "1");
        assert_eq!(tokenizer.next_token().text(), "1");
        assert_eq!(tokenizer.next_token().text(), "2");

        // The tokenizer does not advance even if we `peek` multiple times
        assert_eq!(tokenizer.peek().text(), "3");
        assert_eq!(tokenizer.peek().text(), "3");
        assert_eq!(tokenizer.next_token().text(), "3");

        // After an iterator is finished.
        assert_eq!(tokenizer.peek_kind(), TokenKind::EndOfFile);
        assert_eq!(tokenizer.peek_kind(), TokenKind::EndOfFile);
    }
}
