#![deny(unused, nonstandard_style, rust_2018_idioms)]

pub mod compiler;
pub mod ir;
pub mod sem;
pub mod syntax;

mod util;

use ir::Instruction;
use sem::SemanticError;
use syntax::{ParseError, Parser, SyntaxNode};

/// Parses `src` into a syntax tree rooted at `program`.
pub fn parse<S: AsRef<str> + ?Sized>(src: &S) -> Result<SyntaxNode, ParseError> {
    Parser::parse_string(src)
}

/// Checks the function declarations, identifier references and call arities of `program`.
pub fn analyze(program: &SyntaxNode) -> Result<(), SemanticError> {
    sem::analyze(program).map(|_| ())
}

/// Generates three-address code for a program which passed `analyze()`.
pub fn generate(program: &SyntaxNode) -> Vec<Instruction> {
    ir::generate(program)
}
