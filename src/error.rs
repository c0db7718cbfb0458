use alloc::string::String;

use thiserror::Error;

use crate::expr::Binop;

/// Failures while reducing an expression to a number.
///
/// `expr` always holds the rendering of the node that failed, so the caller
/// can tell which part of a large tree is at fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("division by zero in `{expr}`")]
    DivisionByZero { expr: String },

    #[error("integer overflow computing {lhs} {op} {rhs} in `{expr}`")]
    Overflow {
        op: Binop,
        lhs: i64,
        rhs: i64,
        expr: String,
    },
}

pub type Result<T, E = EvalError> = core::result::Result<T, E>;
