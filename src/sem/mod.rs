pub mod binder;
mod errors;
pub mod validator;

use crate::syntax::SyntaxNode;
pub use binder::Binder;
pub use errors::SemanticError;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;
use std::slice;
pub use validator::Validator;

pub trait SemanticAnalyzer {
    fn analyze(&mut self, program: &SyntaxNode) -> Result<(), SemanticError>;
}

/// Runs both passes over `program` and returns the function table built along the way.
pub fn analyze(program: &SyntaxNode) -> Result<FunctionTable, SemanticError> {
    // 1. signatures
    let mut binder = Binder::new();
    binder.analyze(program)?;

    // 2. bodies
    let mut validator = Validator::new(binder.into_functions());
    validator.analyze(program)?;

    Ok(validator.into_functions())
}

/// The signature and local variables of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    name: String,
    parameters: Vec<String>,
    locals: HashSet<String>,
}

impl FunctionInfo {
    pub fn new<S: Into<String>>(name: S, parameters: Vec<String>) -> Self {
        Self {
            name: name.into(),
            parameters,
            locals: HashSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn locals(&self) -> &HashSet<String> {
        &self.locals
    }

    pub fn add_local<S: Into<String>>(&mut self, name: S) {
        self.locals.insert(name.into());
    }

    /// Returns `true` if `name` is a parameter or a local variable of this function.
    pub fn declares(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name) || self.locals.contains(name)
    }
}

/// Global function table keyed by function name. Iterates in insertion order.
#[derive(Debug, Default, Clone)]
pub struct FunctionTable {
    functions: Vec<FunctionInfo>,
    index: HashMap<String, usize>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the function of the same name in place, if any, and returns it.
    pub fn insert(&mut self, info: FunctionInfo) -> Option<FunctionInfo> {
        match self.index.get(&info.name) {
            Some(&i) => self.functions.get_mut(i).map(|slot| mem::replace(slot, info)),
            None => {
                self.index.insert(info.name.clone(), self.functions.len());
                self.functions.push(info);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionInfo> {
        self.index.get(name).and_then(|&i| self.functions.get(i))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FunctionInfo> {
        let i = *self.index.get(name)?;
        self.functions.get_mut(i)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, FunctionInfo> {
        self.functions.iter()
    }
}

impl fmt::Display for FunctionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut locals = self.locals.iter().map(String::as_str).collect::<Vec<_>>();
        locals.sort_unstable();

        write!(
            f,
            "{}({}) locals: {{{}}}",
            self.name,
            self.parameters.join(", "),
            locals.join(", ")
        )
    }
}
