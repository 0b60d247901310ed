use super::Instruction;
use crate::syntax::{Symbol, SyntaxNode, TokenKind};
use crate::util::naming::PrefixNaming;
use log::{debug, trace};

/// Linearizes a semantically valid program into three-address code.
///
/// Temporaries are named `t0`, `t1`, ... and numbered across the whole program. Each call of
/// `generate()` starts again from `t0`.
#[derive(Debug)]
pub struct CodeGenerator {
    naming: PrefixNaming,
    code: Vec<Instruction>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            naming: PrefixNaming::new("t"),
            code: vec![],
        }
    }

    pub fn generate(&mut self, program: &SyntaxNode) -> Vec<Instruction> {
        self.naming.reset();
        self.code.clear();

        for function in program.functions() {
            self.build_function(function);
        }

        debug!("[codegen] {} instruction(s)", self.code.len());
        std::mem::take(&mut self.code)
    }

    fn emit(&mut self, instruction: Instruction) {
        trace!("[codegen] {}", instruction);
        self.code.push(instruction);
    }

    fn build_function(&mut self, function: &SyntaxNode) {
        let name = function.identifier().unwrap_or_default();

        self.emit(Instruction::func(name));
        if let Some(statements) = function.child(2) {
            for statement in statements.items() {
                self.build_statement(statement);
            }
        }
        self.emit(Instruction::end_func(name));
    }

    fn build_statement(&mut self, statement: &SyntaxNode) {
        if let [head, expr] = statement.children() {
            let result = self.build_expr(expr);

            if head.is(Symbol::Terminal(TokenKind::Return)) {
                self.emit(Instruction::ret(result));
            } else {
                let target = head.value().unwrap_or_default();
                self.emit(Instruction::copy(target, result));
            }
        }
    }

    /// Emits the code of an expression subtree and returns the operand holding its value.
    fn build_expr(&mut self, node: &SyntaxNode) -> String {
        match node.symbol() {
            // Fold the trailer chain from left to right.
            Symbol::Expr | Symbol::Term | Symbol::Factor => {
                let mut result = match node.child(0) {
                    Some(head) => self.build_expr(head),
                    None => String::new(),
                };

                for (operator, operand) in node.operations() {
                    let rhs = self.build_expr(operand);
                    let temp = self.naming.next();

                    self.emit(Instruction::binary(temp.clone(), operator, result, rhs));
                    result = temp;
                }

                result
            }
            Symbol::Base => match node.children() {
                [name, args] => {
                    let arguments = args
                        .items()
                        .map(|argument| self.build_expr(argument))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let temp = self.naming.next();
                    let function = name.value().unwrap_or_default().to_string();

                    self.emit(Instruction::call(temp.clone(), function, arguments));
                    temp
                }
                [operand] => self.build_expr(operand),
                _ => String::new(),
            },
            Symbol::Terminal(_) => node.value().unwrap_or_default().to_string(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::render;
    use crate::syntax::{BinaryOperator, Parser};

    fn generate(src: &str) -> Vec<String> {
        let program = Parser::parse_string(src).unwrap();

        CodeGenerator::new()
            .generate(&program)
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn precedence() {
        assert_eq!(
            generate("function f(a, b) { return a + b * 2; }"),
            vec!["FUNC f", "t0 = b * 2", "t1 = a + t0", "RETURN t1", "ENDFUNC f"]
        );
    }

    #[test]
    fn left_associativity() {
        assert_eq!(
            generate("function f(a, b, c) { return a - b - c; }"),
            vec!["FUNC f", "t0 = a - b", "t1 = t0 - c", "RETURN t1", "ENDFUNC f"]
        );
        assert_eq!(
            generate("function f(a, b, c) { return a / b * c; }"),
            vec!["FUNC f", "t0 = a / b", "t1 = t0 * c", "RETURN t1", "ENDFUNC f"]
        );
    }

    #[test]
    fn power_chain() {
        assert_eq!(
            generate("function f(a) { return a ^ 2 ^ 3; }"),
            vec!["FUNC f", "t0 = a ^ 2", "t1 = t0 ^ 3", "RETURN t1", "ENDFUNC f"]
        );
    }

    #[test]
    fn parenthesized() {
        assert_eq!(
            generate("function f(a, b) { return (a + b) * 2; }"),
            vec!["FUNC f", "t0 = a + b", "t1 = t0 * 2", "RETURN t1", "ENDFUNC f"]
        );
    }

    #[test]
    fn plain_operands() {
        assert_eq!(
            generate("function f(a) { x = a; y = 1.5; return x; }"),
            vec!["FUNC f", "x = a", "y = 1.5", "RETURN x", "ENDFUNC f"]
        );
    }

    #[test]
    fn call() {
        let src = "function g(a, b) { return a; } function f() { return g(1, 2); }";
        let program = Parser::parse_string(src).unwrap();
        let code = CodeGenerator::new().generate(&program);

        assert_eq!(
            code[4],
            Instruction::call("t0", "g".to_string(), "1, 2".to_string())
        );
        assert_eq!(code[5], Instruction::ret("t0".to_string()));
    }

    #[test]
    fn nested_calls() {
        let src = "function g(a) { return a; } \
                   function h(a, b) { return b; } \
                   function f(x) { y = h(g(x + 1), 3) * 2; return y; }";

        assert_eq!(
            generate(src)[6..],
            [
                "FUNC f",
                "t0 = x + 1",
                "t1 = CALL g(t0)",
                "t2 = CALL h(t1, 3)",
                "t3 = t2 * 2",
                "y = t3",
                "RETURN y",
                "ENDFUNC f",
            ]
        );
    }

    #[test]
    fn call_without_arguments() {
        let src = "function g() { return 1; } function f() { return g(); }";

        assert_eq!(generate(src)[4], "t0 = CALL g()");
    }

    #[test]
    fn temporaries_span_functions() {
        let src = "function f(a) { return a * 2; } function g(b) { return b + 1; }";

        assert_eq!(
            generate(src),
            vec![
                "FUNC f",
                "t0 = a * 2",
                "RETURN t0",
                "ENDFUNC f",
                "FUNC g",
                "t1 = b + 1",
                "RETURN t1",
                "ENDFUNC g",
            ]
        );
    }

    #[test]
    fn each_run_starts_from_t0() {
        let program = Parser::parse_string("function f(a) { return a * a; }").unwrap();
        let mut generator = CodeGenerator::new();

        let first = generator.generate(&program);
        let second = generator.generate(&program);

        assert_eq!(first, second);
        assert_eq!(
            first[1],
            Instruction::binary("t0", BinaryOperator::Mul, "a".into(), "a".into())
        );
    }

    #[test]
    fn empty_program() {
        assert!(generate("").is_empty());
    }

    #[test]
    fn listing() {
        let program = Parser::parse_string("function f(a) { b = a + 1; return b; }").unwrap();
        let code = CodeGenerator::new().generate(&program);

        assert_eq!(
            render(&code),
            "FUNC f\n  t0 = a + 1\n  b = t0\n  RETURN b\nENDFUNC f\n"
        );
    }
}
