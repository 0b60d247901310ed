use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("Semantic error: function `{name}` is already declared")]
    DuplicateFunction { name: String },

    #[error("Semantic error: identifier `{name}` is not declared in function `{function}`")]
    UndeclaredIdentifier { name: String, function: String },

    #[error("Semantic error: function `{name}` is not declared (called in `{function}`)")]
    UndeclaredFunction { name: String, function: String },

    #[error("Semantic error: function `{name}` is called with the wrong number of arguments (expected {expected}, actual {found})")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}
