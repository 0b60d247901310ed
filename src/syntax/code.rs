//! Renders a syntax tree back to canonical source code.
//!
//! The tree doesn't keep punctuation, so it is restored from the shape of each node. Parsing the
//! rendered code again produces the same tree.
use super::{Symbol, SyntaxNode, TokenKind};
use std::fmt;

const INDENT: &str = "    ";

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_node(f, self)
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &SyntaxNode) -> fmt::Result {
    match node.symbol() {
        Symbol::Program | Symbol::FuncList => {
            let functions = if node.is(Symbol::Program) {
                node.functions()
            } else {
                node.items()
            };

            for (i, function) in functions.enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write_node(f, function)?;
            }
            Ok(())
        }
        Symbol::FuncDecl => {
            let name = node.identifier().unwrap_or_default();

            write!(f, "function {}(", name)?;
            if let Some(params) = node.child(1) {
                write_separated(f, params)?;
            }
            writeln!(f, ") {{")?;
            if let Some(statements) = node.child(2) {
                for statement in statements.items() {
                    write!(f, "{}", INDENT)?;
                    write_node(f, statement)?;
                    writeln!(f)?;
                }
            }
            writeln!(f, "}}")
        }
        Symbol::Params | Symbol::ParamList | Symbol::Args | Symbol::ArgList => {
            write_separated(f, node)
        }
        Symbol::Statements => {
            for statement in node.items() {
                write_node(f, statement)?;
                writeln!(f)?;
            }
            Ok(())
        }
        Symbol::Statement => match node.children() {
            [keyword, expr] if keyword.is(Symbol::Terminal(TokenKind::Return)) => {
                write!(f, "return ")?;
                write_node(f, expr)?;
                write!(f, ";")
            }
            [target, expr] => {
                write_node(f, target)?;
                write!(f, " = ")?;
                write_node(f, expr)?;
                write!(f, ";")
            }
            _ => Ok(()),
        },
        Symbol::Expr | Symbol::Term | Symbol::Factor => {
            if let Some(head) = node.child(0) {
                write_node(f, head)?;
            }
            for (operator, operand) in node.operations() {
                write!(f, " {} ", operator)?;
                write_node(f, operand)?;
            }
            Ok(())
        }
        // Trailers are written by their `Expr`, `Term` or `Factor`.
        Symbol::ExprPrime | Symbol::TermPrime | Symbol::FactorPrime => Ok(()),
        Symbol::Base => match node.children() {
            [expr] if expr.is(Symbol::Expr) => {
                write!(f, "(")?;
                write_node(f, expr)?;
                write!(f, ")")
            }
            [name, args] => {
                write_node(f, name)?;
                write!(f, "(")?;
                write_separated(f, args)?;
                write!(f, ")")
            }
            [operand] => write_node(f, operand),
            _ => Ok(()),
        },
        Symbol::Terminal(_) => write!(f, "{}", node.value().unwrap_or_default()),
    }
}

fn write_separated(f: &mut fmt::Formatter<'_>, list: &SyntaxNode) -> fmt::Result {
    for (i, item) in list.items().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_node(f, item)?;
    }
    Ok(())
}
