use thiserror::Error;

/// Errors raised while tokenizing an expression or converting it to postfix
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid operator '{0}'")]
    UnknownOperator(char),
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
    #[error("Mismatched closing bracket: '(' is missing")]
    MissingOpenParen,
    #[error("Mismatched opening bracket: ')' is missing")]
    MissingCloseParen,
    #[error("Failed to parse expression: {0}")]
    Grammar(String),
}

/// Errors raised while evaluating a postfix sequence
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Operator '{0}' is missing an operand")]
    MissingOperand(char),
    #[error("Function '{0}' is missing an argument")]
    MissingArgument(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Modulo by zero")]
    ModuloByZero,
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
    #[error("Invalid operator '{0}'")]
    UnknownOperator(char),
    #[error("Factorial is not defined for negative integer {0}")]
    NegativeFactorial(i64),
    #[error("Variable '{0}' has no value")]
    UnboundVariable(char),
    #[error("Function '{0}' must be the last operation of the expression")]
    NonTerminalPosition(String),
    #[error("Invalid expression: stack holds {0} values at the failure point")]
    InvalidExpression(usize),
    #[error("Nothing to calculate")]
    EmptyExpression,
}

/// Errors reported by the math functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Factorial is not defined for negative integer {0}")]
    NegativeFactorial(i64),
}

impl From<MathError> for EvalError {
    fn from(e: MathError) -> Self {
        match e {
            MathError::NegativeFactorial(n) => EvalError::NegativeFactorial(n),
        }
    }
}

/// Any failure of the whole infix-to-result pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub type ParseResult<T> = Result<T, ParseError>;
pub type EvalStep<T> = Result<T, EvalError>;
pub(crate) type StepResult = EvalStep<()>;
