//! Three-address intermediate code.
mod generator;

pub use generator::CodeGenerator;

use crate::syntax::{BinaryOperator, SyntaxNode};
use std::fmt;

/// Generates the instructions of `program` with a fresh generator.
pub fn generate(program: &SyntaxNode) -> Vec<Instruction> {
    CodeGenerator::new().generate(program)
}

/// Renders `instructions` as a listing. Instructions between `FUNC` and `ENDFUNC` are indented,
/// and functions are separated by an empty line.
pub fn render(instructions: &[Instruction]) -> String {
    let mut listing = String::new();

    for instruction in instructions {
        match instruction.opcode {
            Opcode::Func => {
                if !listing.is_empty() {
                    listing.push('\n');
                }
            }
            Opcode::EndFunc => {}
            _ => listing.push_str("  "),
        }

        listing.push_str(&instruction.to_string());
        listing.push('\n');
    }

    listing
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Opcode {
    Binary(BinaryOperator),
    /// `=`
    Copy,
    Call,
    Return,
    Func,
    EndFunc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Empty for `RETURN`, `FUNC` and `ENDFUNC`.
    pub destination: String,
    pub opcode: Opcode,
    pub operand1: String,
    pub operand2: Option<String>,
}

impl Instruction {
    pub fn binary<S: Into<String>>(
        destination: S,
        operator: BinaryOperator,
        lhs: String,
        rhs: String,
    ) -> Self {
        Self {
            destination: destination.into(),
            opcode: Opcode::Binary(operator),
            operand1: lhs,
            operand2: Some(rhs),
        }
    }

    pub fn copy<S: Into<String>>(destination: S, operand: String) -> Self {
        Self {
            destination: destination.into(),
            opcode: Opcode::Copy,
            operand1: operand,
            operand2: None,
        }
    }

    /// `arguments` is the comma separated list of argument operands.
    pub fn call<S: Into<String>>(destination: S, function: String, arguments: String) -> Self {
        Self {
            destination: destination.into(),
            opcode: Opcode::Call,
            operand1: function,
            operand2: Some(arguments),
        }
    }

    pub fn ret(operand: String) -> Self {
        Self {
            destination: String::new(),
            opcode: Opcode::Return,
            operand1: operand,
            operand2: None,
        }
    }

    pub fn func<S: Into<String>>(name: S) -> Self {
        Self {
            destination: String::new(),
            opcode: Opcode::Func,
            operand1: name.into(),
            operand2: None,
        }
    }

    pub fn end_func<S: Into<String>>(name: S) -> Self {
        Self {
            destination: String::new(),
            opcode: Opcode::EndFunc,
            operand1: name.into(),
            operand2: None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Binary(operator) => write!(f, "{}", operator),
            Opcode::Copy => write!(f, "="),
            Opcode::Call => write!(f, "CALL"),
            Opcode::Return => write!(f, "RETURN"),
            Opcode::Func => write!(f, "FUNC"),
            Opcode::EndFunc => write!(f, "ENDFUNC"),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operand2 = self.operand2.as_deref().unwrap_or_default();

        match self.opcode {
            Opcode::Func | Opcode::EndFunc | Opcode::Return => {
                write!(f, "{} {}", self.opcode, self.operand1)
            }
            Opcode::Call => write!(
                f,
                "{} = CALL {}({})",
                self.destination, self.operand1, operand2
            ),
            Opcode::Copy => write!(f, "{} = {}", self.destination, self.operand1),
            Opcode::Binary(operator) => write!(
                f,
                "{} = {} {} {}",
                self.destination, self.operand1, operator, operand2
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let instructions = vec![
            Instruction::func("f"),
            Instruction::binary("t0", BinaryOperator::Pow, "a".into(), "2".into()),
            Instruction::call("t1", "g".into(), "t0, 1".into()),
            Instruction::call("t2", "h".into(), "".into()),
            Instruction::copy("x", "t1".into()),
            Instruction::ret("x".into()),
            Instruction::end_func("f"),
        ];
        let lines = instructions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();

        assert_eq!(
            lines,
            vec![
                "FUNC f",
                "t0 = a ^ 2",
                "t1 = CALL g(t0, 1)",
                "t2 = CALL h()",
                "x = t1",
                "RETURN x",
                "ENDFUNC f",
            ]
        );
    }

    #[test]
    fn render_listing() {
        let instructions = vec![
            Instruction::func("f"),
            Instruction::ret("1".into()),
            Instruction::end_func("f"),
            Instruction::func("g"),
            Instruction::copy("x", "2".into()),
            Instruction::ret("x".into()),
            Instruction::end_func("g"),
        ];

        assert_eq!(
            render(&instructions),
            "FUNC f\n  RETURN 1\nENDFUNC f\n\nFUNC g\n  x = 2\n  RETURN x\nENDFUNC g\n"
        );
    }

    #[test]
    fn render_nothing() {
        assert_eq!(render(&[]), "");
    }
}
