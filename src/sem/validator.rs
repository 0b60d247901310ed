use super::binder::bind_locals;
use super::{FunctionInfo, FunctionTable, SemanticAnalyzer, SemanticError};
use crate::syntax::{Symbol, SyntaxNode};
use log::debug;

/// Validates identifier usage and call arity of every function body.
#[derive(Debug)]
pub struct Validator {
    functions: FunctionTable,
}

/// What an expression in a function body can see.
#[derive(Debug, Clone, Copy)]
struct AnalysisContext<'a> {
    functions: &'a FunctionTable,
    function: &'a FunctionInfo,
}

impl SemanticAnalyzer for Validator {
    fn analyze(&mut self, program: &SyntaxNode) -> Result<(), SemanticError> {
        for function in program.functions() {
            let name = function.identifier().unwrap_or_default();

            if let Some(info) = self.functions.get_mut(name) {
                bind_locals(function, info);
            }

            let info = match self.functions.get(name) {
                Some(info) => info,
                None => continue,
            };
            let context = AnalysisContext {
                functions: &self.functions,
                function: info,
            };

            debug!("[validator] function `{}`", name);
            self.validate_function(&context, function)?;
        }

        Ok(())
    }
}

impl Validator {
    /// `functions` are the signatures collected by `Binder`.
    pub fn new(functions: FunctionTable) -> Self {
        Self { functions }
    }

    pub fn into_functions(self) -> FunctionTable {
        self.functions
    }

    fn validate_function(
        &self,
        context: &AnalysisContext<'_>,
        function: &SyntaxNode,
    ) -> Result<(), SemanticError> {
        let statements = function.child(2).into_iter().flat_map(SyntaxNode::items);

        for statement in statements {
            if let Some(expr) = statement.child(1) {
                self.validate_expr(context, expr)?;
            }
        }

        Ok(())
    }

    fn validate_expr(
        &self,
        context: &AnalysisContext<'_>,
        node: &SyntaxNode,
    ) -> Result<(), SemanticError> {
        match node.symbol() {
            Symbol::Expr | Symbol::Term | Symbol::Factor => {
                if let Some(head) = node.child(0) {
                    self.validate_expr(context, head)?;
                }
                for (_, operand) in node.operations() {
                    self.validate_expr(context, operand)?;
                }
                Ok(())
            }
            Symbol::Base => match node.children() {
                [name, args] => {
                    self.validate_call(context, name.value().unwrap_or_default(), args)?;

                    for argument in args.items() {
                        self.validate_expr(context, argument)?;
                    }
                    Ok(())
                }
                [operand] => match node.identifier() {
                    Some(name) => self.validate_variable(context, name),
                    None => self.validate_expr(context, operand),
                },
                _ => Ok(()),
            },
            _ => Ok(()),
        }
    }

    fn validate_variable(
        &self,
        context: &AnalysisContext<'_>,
        name: &str,
    ) -> Result<(), SemanticError> {
        if context.function.declares(name) {
            Ok(())
        } else {
            Err(SemanticError::UndeclaredIdentifier {
                name: name.to_string(),
                function: context.function.name().to_string(),
            })
        }
    }

    fn validate_call(
        &self,
        context: &AnalysisContext<'_>,
        name: &str,
        args: &SyntaxNode,
    ) -> Result<(), SemanticError> {
        let callee = match context.functions.get(name) {
            Some(callee) => callee,
            None => {
                return Err(SemanticError::UndeclaredFunction {
                    name: name.to_string(),
                    function: context.function.name().to_string(),
                })
            }
        };

        let found = args.items().count();

        if found != callee.arity() {
            return Err(SemanticError::ArgumentCountMismatch {
                name: name.to_string(),
                expected: callee.arity(),
                found,
            });
        }

        Ok(())
    }
}
