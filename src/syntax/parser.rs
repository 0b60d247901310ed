use super::*;
use log::trace;

/// A recursive descent parser with one token of lookahead.
///
/// Each `parse_*` method realizes one production of the grammar (see `tree`) and either commits
/// to it or matches the empty string. The first error aborts parsing.
#[derive(Debug)]
pub struct Parser {
    /// Always terminated by `EndOfFile`.
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        let terminated = matches!(tokens.last(), Some(token) if token.kind == TokenKind::EndOfFile);

        if !terminated {
            let end = tokens.last().map(|t| t.range.end).unwrap_or_default();
            let range = EffectiveRange {
                length: 0,
                start: end,
                end,
            };

            tokens.push(Token::new(TokenKind::EndOfFile, "", range));
        }

        Self {
            tokens,
            position: 0,
        }
    }

    pub fn parse_string<S: AsRef<str> + ?Sized>(src: &S) -> Result<SyntaxNode, ParseError> {
        let mut parser = Parser::new(tokenize(src));
        parser.parse()
    }

    /// Parses the whole token sequence. An `Invalid` token anywhere in the sequence is reported
    /// as a lexical error before parsing is attempted.
    pub fn parse(&mut self) -> Result<SyntaxNode, ParseError> {
        if let Some(token) = self.tokens.iter().find(|t| t.is_invalid()) {
            return Err(ParseError::invalid_character(token));
        }

        self.position = 0;

        let program = self.parse_program()?;

        if !self.match_token(TokenKind::EndOfFile) {
            return Err(ParseError::mismatch_token(self.peek(), "end of file"));
        }

        Ok(program)
    }

    fn parse_program(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_program");

        let functions = self.parse_function_list()?;
        Ok(SyntaxNode::new(Symbol::Program, vec![functions]))
    }

    fn parse_function_list(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_function_list");

        let mut functions = vec![];

        while self.match_token(TokenKind::Function) {
            functions.push(self.parse_function_decl()?);
        }

        Ok(Self::fold_list(Symbol::FuncList, functions))
    }

    fn parse_function_decl(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_function_decl");

        self.expect_token(TokenKind::Function, "`function`")?;

        let name = self.expect_token(TokenKind::Identifier, "function name")?;

        self.expect_token(TokenKind::LParen, "`(`")?;
        let params = self.parse_params()?;
        self.expect_token(TokenKind::RParen, "`)`")?;

        self.expect_token(TokenKind::LBrace, "`{`")?;
        let body = self.parse_statements()?;
        self.expect_token(TokenKind::RBrace, "`}`")?;

        Ok(SyntaxNode::new(
            Symbol::FuncDecl,
            vec![Self::terminal(&name), params, body],
        ))
    }

    fn parse_params(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_params");

        if !self.match_token(TokenKind::Identifier) {
            return Ok(SyntaxNode::epsilon(Symbol::Params));
        }

        let list = self.parse_param_list()?;
        Ok(SyntaxNode::new(Symbol::Params, vec![list]))
    }

    fn parse_param_list(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_param_list");

        let mut names = vec![];
        let mut name = self.expect_token(TokenKind::Identifier, "parameter name")?;

        while self.match_token(TokenKind::Comma) {
            self.next_token();
            names.push(Self::terminal(&name));
            name = self.expect_token(TokenKind::Identifier, "parameter name")?;
        }

        Ok(Self::fold_separated(
            Symbol::ParamList,
            names,
            Self::terminal(&name),
        ))
    }

    fn parse_statements(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_statements");

        let mut statements = vec![];

        while self.match_token(TokenKind::Identifier) || self.match_token(TokenKind::Return) {
            statements.push(self.parse_statement()?);
        }

        Ok(Self::fold_list(Symbol::Statements, statements))
    }

    fn parse_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_statement");

        let head = match self.peek_kind() {
            TokenKind::Return => self.next_token(),
            TokenKind::Identifier => {
                let target = self.next_token();
                self.expect_token(TokenKind::Assign, "`=`")?;
                target
            }
            _ => return Err(ParseError::mismatch_token(self.peek(), "statement")),
        };

        let expr = self.parse_expr()?;
        self.expect_token(TokenKind::Semicolon, "`;`")?;

        Ok(SyntaxNode::new(
            Symbol::Statement,
            vec![Self::terminal(&head), expr],
        ))
    }

    fn parse_expr(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_expr");

        let term = self.parse_term()?;
        let trailer = self.parse_expr_prime()?;

        Ok(SyntaxNode::new(Symbol::Expr, vec![term, trailer]))
    }

    fn parse_expr_prime(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_expr_prime");

        let mut links = vec![];

        while self.match_token(TokenKind::Plus) || self.match_token(TokenKind::Minus) {
            let operator = self.next_token();
            links.push((Self::terminal(&operator), self.parse_term()?));
        }

        Ok(Self::fold_chain(Symbol::ExprPrime, links))
    }

    fn parse_term(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_term");

        let factor = self.parse_factor()?;
        let trailer = self.parse_term_prime()?;

        Ok(SyntaxNode::new(Symbol::Term, vec![factor, trailer]))
    }

    fn parse_term_prime(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_term_prime");

        let mut links = vec![];

        while self.match_token(TokenKind::Star) || self.match_token(TokenKind::Slash) {
            let operator = self.next_token();
            links.push((Self::terminal(&operator), self.parse_factor()?));
        }

        Ok(Self::fold_chain(Symbol::TermPrime, links))
    }

    fn parse_factor(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_factor");

        let base = self.parse_base()?;
        let trailer = self.parse_factor_prime()?;

        Ok(SyntaxNode::new(Symbol::Factor, vec![base, trailer]))
    }

    fn parse_factor_prime(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_factor_prime");

        let mut links = vec![];

        while self.match_token(TokenKind::Caret) {
            let operator = self.next_token();
            links.push((Self::terminal(&operator), self.parse_base()?));
        }

        Ok(Self::fold_chain(Symbol::FactorPrime, links))
    }

    fn parse_base(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_base");

        let children = match self.peek_kind() {
            TokenKind::Number => vec![Self::terminal(&self.next_token())],
            TokenKind::Identifier => {
                let name = Self::terminal(&self.next_token());

                // Function call
                if self.match_token(TokenKind::LParen) {
                    self.next_token();
                    let args = self.parse_args()?;
                    self.expect_token(TokenKind::RParen, "`)`")?;

                    vec![name, args]
                } else {
                    vec![name]
                }
            }
            TokenKind::LParen => {
                self.next_token();
                let expr = self.parse_expr()?;
                self.expect_token(TokenKind::RParen, "`)`")?;

                vec![expr]
            }
            _ => return Err(ParseError::mismatch_token(self.peek(), "expression")),
        };

        Ok(SyntaxNode::new(Symbol::Base, children))
    }

    fn parse_args(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_args");

        if self.match_token(TokenKind::RParen) {
            return Ok(SyntaxNode::epsilon(Symbol::Args));
        }

        let list = self.parse_arg_list()?;
        Ok(SyntaxNode::new(Symbol::Args, vec![list]))
    }

    fn parse_arg_list(&mut self) -> Result<SyntaxNode, ParseError> {
        self.debug_trace("parse_arg_list");

        let mut arguments = vec![];
        let mut argument = self.parse_expr()?;

        while self.match_token(TokenKind::Comma) {
            self.next_token();
            arguments.push(argument);
            argument = self.parse_expr()?;
        }

        Ok(Self::fold_separated(Symbol::ArgList, arguments, argument))
    }

    // Lists and chains are collected in a loop and then nested from the back, so that their
    // length never adds to the depth of recursion.

    /// `X := item X | ε`
    fn fold_list(symbol: Symbol, items: Vec<SyntaxNode>) -> SyntaxNode {
        items
            .into_iter()
            .rev()
            .fold(SyntaxNode::epsilon(symbol), |rest, item| {
                SyntaxNode::new(symbol, vec![item, rest])
            })
    }

    /// `X := item ("," X)?`
    fn fold_separated(symbol: Symbol, items: Vec<SyntaxNode>, last: SyntaxNode) -> SyntaxNode {
        items
            .into_iter()
            .rev()
            .fold(SyntaxNode::new(symbol, vec![last]), |rest, item| {
                SyntaxNode::new(symbol, vec![item, rest])
            })
    }

    /// `X' := op operand X' | ε`
    fn fold_chain(symbol: Symbol, links: Vec<(SyntaxNode, SyntaxNode)>) -> SyntaxNode {
        links
            .into_iter()
            .rev()
            .fold(SyntaxNode::epsilon(symbol), |rest, (operator, operand)| {
                SyntaxNode::new(symbol, vec![operator, operand, rest])
            })
    }

    fn terminal(token: &Token) -> SyntaxNode {
        SyntaxNode::terminal(token.kind, token.text())
    }

    // Sticks to the last token (`EndOfFile`) once the sequence is exhausted.
    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.position.min(last)]
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn next_token(&mut self) -> Token {
        let token = self.peek().clone();

        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn match_token(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    fn expect_token(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.match_token(kind) {
            Ok(self.next_token())
        } else {
            Err(ParseError::mismatch_token(self.peek(), expected))
        }
    }

    fn debug_trace(&self, name: &str) {
        trace!("[{}] position: {}", name, self.peek().position());
    }
}
