use super::{FunctionInfo, FunctionTable, SemanticAnalyzer, SemanticError};
use crate::syntax::SyntaxNode;
use log::debug;

/// Collects the signature of every function declared in a program.
#[derive(Debug, Default)]
pub struct Binder {
    functions: FunctionTable,
}

impl SemanticAnalyzer for Binder {
    fn analyze(&mut self, program: &SyntaxNode) -> Result<(), SemanticError> {
        self.functions = FunctionTable::new();

        for function in program.functions() {
            let name = function.identifier().unwrap_or_default();
            let parameters = function
                .child(1)
                .into_iter()
                .flat_map(SyntaxNode::items)
                .filter_map(SyntaxNode::value)
                .map(str::to_string)
                .collect::<Vec<_>>();

            if self.functions.contains(name) {
                return Err(SemanticError::DuplicateFunction {
                    name: name.to_string(),
                });
            }

            debug!("[binder] function `{}`({})", name, parameters.join(", "));
            self.functions.insert(FunctionInfo::new(name, parameters));
        }

        Ok(())
    }
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn into_functions(self) -> FunctionTable {
        self.functions
    }
}

/// Binds every assignment target in the body of `function` as a local variable of `info`.
///
/// Must run over the whole body before any identifier is checked: a local is visible in the
/// whole function, even before the assignment.
pub fn bind_locals(function: &SyntaxNode, info: &mut FunctionInfo) {
    let statements = function.child(2).into_iter().flat_map(SyntaxNode::items);

    for statement in statements {
        if let Some(target) = statement.identifier() {
            info.add_local(target);
        }
    }
}
