use cursor::Line;
use parser::{Expr, LiteralValue};
use scanner::{Token, TokenType};

mod value;
pub use value::Value;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum RuntimeErrorType {
    #[error("Operand must be a number.")]
    OperandMustBeNumber,
    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers,
    #[error("Operands must be two numbers or two strings.")]
    OperandsMustBeTwoNumbersOrTwoStrings,
}

impl RuntimeErrorType {
    fn at<'a>(self, operator: &Token<'a>) -> RuntimeError<'a> {
        RuntimeError { error: self, operator: operator.clone() }
    }
}

/// Aborts the evaluation of the whole expression. Only the message is
/// displayed, the line is available through [`RuntimeError::line`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{error}")]
pub struct RuntimeError<'a> {
    pub error: RuntimeErrorType,
    pub operator: Token<'a>,
}

impl RuntimeError<'_> {
    pub fn line(&self) -> Line {
        self.operator.line()
    }
}

pub type Result<'a, T> = std::result::Result<T, RuntimeError<'a>>;

/// Tree-walking evaluator. Expressions have no side effects and there are
/// no bindings yet, so evaluating is reentrant.
#[derive(Debug, Default)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    pub fn evaluate<'a>(&self, expr: &Expr<'a>) -> Result<'a, Value> {
        let value: Value = match expr {
            Expr::Literal(LiteralValue::Number(n)) => (*n).into(),
            Expr::Literal(LiteralValue::Str(s)) => (*s).into(),
            Expr::Literal(LiteralValue::Boolean(b)) => (*b).into(),
            Expr::Literal(LiteralValue::Nil) => Value::Nil,

            Expr::Grouping(expr) => self.evaluate(expr)?,

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                self.unary(operator, right)?
            }

            Expr::Binary { left, operator, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.binary(left, operator, right)?
            }
        };
        log::trace!("Evaluated {} to {:?}", expr, value);
        Ok(value)
    }

    fn unary<'a>(&self, operator: &Token<'a>, right: Value) -> Result<'a, Value> {
        match (operator.ty(), right) {
            (TokenType::Minus, Value::Number(n)) => Ok((-n).into()),
            (TokenType::Minus, _) => Err(RuntimeErrorType::OperandMustBeNumber.at(operator)),
            (TokenType::Bang, v) => Ok((!v.is_truthy()).into()),
            (ty, _) => unreachable!("Parser produced unary operator {ty:?}"),
        }
    }

    fn binary<'a>(&self, left: Value, operator: &Token<'a>, right: Value) -> Result<'a, Value> {
        use TokenType::*;
        match (&left, &right, operator.ty()) {
            (Value::Number(l), Value::Number(r), Plus) => Ok((l + r).into()),
            (Value::Str(l), Value::Str(r), Plus) => Ok((l.clone() + r).into()),
            (_, _, Plus) => Err(RuntimeErrorType::OperandsMustBeTwoNumbersOrTwoStrings.at(operator)),

            (Value::Number(l), Value::Number(r), Minus) => Ok((l - r).into()),
            (Value::Number(l), Value::Number(r), Star) => Ok((l * r).into()),
            // Division by zero yields ±Infinity or NaN
            (Value::Number(l), Value::Number(r), Slash) => Ok((l / r).into()),

            (Value::Number(l), Value::Number(r), Greater) => Ok((l > r).into()),
            (Value::Number(l), Value::Number(r), GreaterEqual) => Ok((l >= r).into()),
            (Value::Number(l), Value::Number(r), Less) => Ok((l < r).into()),
            (Value::Number(l), Value::Number(r), LessEqual) => Ok((l <= r).into()),

            (_, _, Minus | Star | Slash | Greater | GreaterEqual | Less | LessEqual) => {
                Err(RuntimeErrorType::OperandsMustBeNumbers.at(operator))
            }

            (_, _, EqualEqual) => Ok(left.eq_in_lox(&right).into()),
            (_, _, BangEqual) => Ok((!left.eq_in_lox(&right)).into()),

            (_, _, ty) => unreachable!("Parser produced binary operator {ty:?}"),
        }
    }
}
