//! Grammar
//! -------
//!
//! ```ignore
//! Program    := FuncList
//! FuncList   := FuncDecl FuncList | ε
//! FuncDecl   := "function" Id "(" Params ")" "{" Statements "}"
//! Params     := ParamList | ε
//! ParamList  := Id ("," ParamList)?
//! Statements := Statement Statements | ε
//! Statement  := "return" Expr ";" | Id "=" Expr ";"
//! Expr       := Term Expr'
//! Expr'      := ("+" | "-") Term Expr' | ε
//! Term       := Factor Term'
//! Term'      := ("*" | "/") Factor Term' | ε
//! Factor     := Base Factor'
//! Factor'    := "^" Base Factor' | ε
//! Base       := <Number> | Id ("(" Args ")")? | "(" Expr ")"
//! Args       := ArgList | ε
//! ArgList    := Expr ("," ArgList)?
//! Id         := <Identifier>
//! ```
//!
//! Every rule is one `SyntaxNode` tagged by its `Symbol`. Punctuation (parentheses, braces,
//! commas, semicolons, `=`) is not kept in the tree; operators, keywords, identifiers and
//! numbers are kept as terminal nodes carrying their lexeme.
use super::TokenKind;
use std::fmt;

/// A grammar symbol.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Program,
    FuncList,
    FuncDecl,
    Params,
    ParamList,
    Statements,
    Statement,
    Expr,
    ExprPrime,
    Term,
    TermPrime,
    Factor,
    FactorPrime,
    Base,
    Args,
    ArgList,
    Terminal(TokenKind),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    /// Numbers of children a node of this symbol may have.
    pub fn arities(&self) -> &'static [usize] {
        match self {
            Symbol::Program => &[1],
            Symbol::FuncList => &[0, 2],
            Symbol::FuncDecl => &[3],
            Symbol::Params => &[0, 1],
            Symbol::ParamList => &[1, 2],
            Symbol::Statements => &[0, 2],
            Symbol::Statement => &[2],
            Symbol::Expr | Symbol::Term | Symbol::Factor => &[2],
            Symbol::ExprPrime | Symbol::TermPrime | Symbol::FactorPrime => &[0, 3],
            Symbol::Base => &[1, 2],
            Symbol::Args => &[0, 1],
            Symbol::ArgList => &[1, 2],
            Symbol::Terminal(_) => &[0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxNode {
    symbol: Symbol,
    value: Option<String>,
    children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    /// Panics if `symbol` can't have that many children. Only the parser builds nodes.
    pub(crate) fn new(symbol: Symbol, children: Vec<SyntaxNode>) -> Self {
        assert!(
            symbol.arities().contains(&children.len()),
            "{} can't have {} children",
            symbol,
            children.len()
        );

        Self {
            symbol,
            value: None,
            children,
        }
    }

    /// A non-terminal which matched the empty string.
    pub(crate) fn epsilon(symbol: Symbol) -> Self {
        Self::new(symbol, vec![])
    }

    pub fn terminal<S: Into<String>>(kind: TokenKind, value: S) -> Self {
        Self {
            symbol: Symbol::Terminal(kind),
            value: Some(value.into()),
            children: vec![],
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn is(&self, symbol: Symbol) -> bool {
        self.symbol == symbol
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn children(&self) -> &[SyntaxNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&SyntaxNode> {
        self.children.get(index)
    }

    pub fn is_epsilon(&self) -> bool {
        !self.symbol.is_terminal() && self.children.is_empty()
    }

    /// Returns the lexeme of the first child if it is an identifier.
    pub fn identifier(&self) -> Option<&str> {
        self.child(0)
            .filter(|node| node.is(Symbol::Terminal(TokenKind::Identifier)))
            .and_then(SyntaxNode::value)
    }

    /// Iterates `FuncDecl` nodes of a `Program` in declaration order.
    pub fn functions(&self) -> ListItems<'_> {
        let head = self
            .child(0)
            .filter(|list| self.is(Symbol::Program) && list.is(Symbol::FuncList));

        ListItems { next: head }
    }

    /// Iterates the elements of a right-recursive list (`FuncList`, `ParamList`, `Statements`,
    /// `ArgList`). For the optional wrappers `Params` and `Args`, iterates the wrapped list.
    pub fn items(&self) -> ListItems<'_> {
        let head = match self.symbol {
            Symbol::Params | Symbol::Args => self.child(0),
            _ => Some(self),
        };

        ListItems { next: head }
    }

    /// Iterates the `(operator, operand)` pairs of the prime chain of `Expr`, `Term` or
    /// `Factor`. The first operand is `child(0)`.
    pub fn operations(&self) -> Operations<'_> {
        let trailer = match self.symbol {
            Symbol::Expr | Symbol::Term | Symbol::Factor => self.child(1),
            _ => None,
        };

        Operations { next: trailer }
    }

    /// Renders the tree as an indented list of grammar symbols.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0)];

        while let Some((node, level)) = stack.pop() {
            for _ in 0..level {
                out.push_str("  ");
            }

            match (&node.value, node.is_epsilon()) {
                (Some(value), _) => out.push_str(&format!("{} ({})", node.symbol, value)),
                (None, true) => out.push_str(&format!("{} -> ε", node.symbol)),
                (None, false) => out.push_str(&node.symbol.to_string()),
            }
            out.push('\n');

            stack.extend(node.children.iter().rev().map(|child| (child, level + 1)));
        }

        out
    }
}

// Long lists and operator chains nest deeply, so children are released from a heap stack
// instead of by recursive drop.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);

        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListItems<'a> {
    next: Option<&'a SyntaxNode>,
}

impl<'a> Iterator for ListItems<'a> {
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next.take()?;
        let mut children = link.children.iter();
        let item = children.next()?;

        self.next = children.next().filter(|rest| rest.symbol == link.symbol);
        Some(item)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOperator::Add),
            TokenKind::Minus => Some(BinaryOperator::Sub),
            TokenKind::Star => Some(BinaryOperator::Mul),
            TokenKind::Slash => Some(BinaryOperator::Div),
            TokenKind::Caret => Some(BinaryOperator::Pow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Operations<'a> {
    next: Option<&'a SyntaxNode>,
}

impl<'a> Iterator for Operations<'a> {
    type Item = (BinaryOperator, &'a SyntaxNode);

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next.take()?;

        match link.children.as_slice() {
            [op, operand, rest] => {
                let operator = match op.symbol {
                    Symbol::Terminal(kind) => BinaryOperator::from_token_kind(kind)?,
                    _ => return None,
                };

                self.next = Some(rest);
                Some((operator, operand))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Program => write!(f, "program"),
            Symbol::FuncList => write!(f, "function_list"),
            Symbol::FuncDecl => write!(f, "function_decl"),
            Symbol::Params => write!(f, "params"),
            Symbol::ParamList => write!(f, "param_list"),
            Symbol::Statements => write!(f, "statements"),
            Symbol::Statement => write!(f, "statement"),
            Symbol::Expr => write!(f, "expr"),
            Symbol::ExprPrime => write!(f, "expr'"),
            Symbol::Term => write!(f, "term"),
            Symbol::TermPrime => write!(f, "term'"),
            Symbol::Factor => write!(f, "factor"),
            Symbol::FactorPrime => write!(f, "factor'"),
            Symbol::Base => write!(f, "base"),
            Symbol::Args => write!(f, "args"),
            Symbol::ArgList => write!(f, "arg_list"),
            Symbol::Terminal(kind) => write!(f, "{}", kind),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Sub => write!(f, "-"),
            BinaryOperator::Mul => write!(f, "*"),
            BinaryOperator::Div => write!(f, "/"),
            BinaryOperator::Pow => write!(f, "^"),
        }
    }
}
