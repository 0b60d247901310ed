pub mod cli;
pub use cli::{parse_options, Command, CompilerOptions};

use crate::ir::{self, Instruction};
use crate::sem::{self, SemanticError};
use crate::syntax::{tokenize, ParseError, Parser, SyntaxNode};
use log::debug;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompilerError {
    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("input file must have the `.neto` extension: {0}")]
    InvalidExtension(PathBuf),

    #[error(transparent)]
    InputSourceError(#[from] io::Error),

    #[error("can't write intermediate code: {0}")]
    OutputError(io::Error),

    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    SemanticError(#[from] SemanticError),
}

impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InvalidOption(message)
    }
}

/// The result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    pub tree: SyntaxNode,
    pub instructions: Vec<Instruction>,
}

impl Compilation {
    /// The intermediate code listing.
    pub fn listing(&self) -> String {
        ir::render(&self.instructions)
    }
}

/// Runs every phase over `src`. The first error aborts the remaining phases.
pub fn compile<S: AsRef<str> + ?Sized>(src: &S) -> Result<Compilation, CompilerError> {
    let tokens = tokenize(src);
    debug!(
        "[tokens] {}",
        tokens
            .iter()
            .map(|token| token.kind.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    );

    let tree = Parser::new(tokens).parse()?;
    debug!("[tree]\n{}", tree.dump());

    let functions = sem::analyze(&tree)?;
    for function in functions.iter() {
        debug!("[functions] {}", function);
    }

    let instructions = ir::generate(&tree);
    debug!("[ir]\n{}", ir::render(&instructions));

    Ok(Compilation { tree, instructions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn accepted() {
        let compilation = compile("function f(a, b) { return a + b * 2; }").unwrap();

        assert_eq!(compilation.instructions.len(), 5);
        assert_eq!(
            compilation.listing(),
            "FUNC f\n  t0 = b * 2\n  t1 = a + t0\n  RETURN t1\nENDFUNC f\n"
        );
    }

    #[test]
    fn lexical_error() {
        let err = compile("function f() {\n  return 1 @ 2;\n}").unwrap_err();

        assert_matches!(err, CompilerError::ParseError(err) => {
            assert!(err.is_lexical());
            assert_eq!(err.line(), 2);
            assert_eq!(err.column(), 12);
        });
    }

    #[test]
    fn syntax_error() {
        let err = compile("function f() { return 1 }").unwrap_err();

        assert_matches!(err, CompilerError::ParseError(err) => {
            assert!(!err.is_lexical());
        });
    }

    #[test]
    fn semantic_error() {
        let err = compile("function f() { return x; }").unwrap_err();

        assert_matches!(
            err,
            CompilerError::SemanticError(SemanticError::UndeclaredIdentifier { .. })
        );
        assert_eq!(
            err.to_string(),
            "Semantic error: identifier `x` is not declared in function `f`"
        );
    }
}
