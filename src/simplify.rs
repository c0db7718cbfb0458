use core::ops::ControlFlow;

use tracing::{debug, instrument, trace};

use crate::error::{EvalError, Result};
use crate::eval::apply;
use crate::expr::{Binop, Expr};
use crate::fold::Fold;

/// Rebuilds an expression bottom-up, applying local rewrites at each node once
/// its operands are already simplified:
///
/// - `e + 0`, `0 + e`, `e - 0`, `e * 1`, `1 * e`, `e / 1` become `e`
/// - `e * 0` and `0 * e` become `0`
/// - an operator applied to two constants becomes its value
///
/// A constant division by zero is an error. Constant arithmetic that overflows
/// is left as it is.
pub const fn simplify() -> Simplify { Simplify }

pub struct Simplify;

impl Fold for Simplify {
    type Output = Expr;
    type Break = EvalError;
    type Finish = Result<Expr>;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> { ControlFlow::Continue(Expr::Var) }

    fn int(&mut self, value: i64) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(Expr::Int(value))
    }

    fn binop(
        &mut self,
        node: &Expr,
        op: Binop,
        lhs: Expr,
        rhs: Expr,
    ) -> ControlFlow<Self::Break, Self::Output> {
        let (rule, simplified) = match (op, lhs.as_int(), rhs.as_int()) {
            (Binop::Div, Some(_), Some(0)) => {
                return ControlFlow::Break(EvalError::DivisionByZero {
                    expr: node.render(),
                });
            }
            (_, Some(a), Some(b)) => match apply(op, a, b) {
                Some(value) => (Some("const-fold"), Expr::Int(value)),
                None => (None, Expr::binop(op, lhs, rhs)),
            },
            (Binop::Add, Some(0), _) => (Some("add-zero-l"), rhs),
            (Binop::Add, _, Some(0)) => (Some("add-zero-r"), lhs),
            (Binop::Sub, _, Some(0)) => (Some("sub-zero-r"), lhs),
            (Binop::Mul, Some(0), _) => (Some("mul-zero-l"), Expr::Int(0)),
            (Binop::Mul, _, Some(0)) => (Some("mul-zero-r"), Expr::Int(0)),
            (Binop::Mul, Some(1), _) => (Some("mul-one-l"), rhs),
            (Binop::Mul, _, Some(1)) => (Some("mul-one-r"), lhs),
            (Binop::Div, _, Some(1)) => (Some("div-one-r"), lhs),
            _ => (None, Expr::binop(op, lhs, rhs)),
        };
        if let Some(rule) = rule {
            trace!(rule, %op, "rewrote node");
        }
        ControlFlow::Continue(simplified)
    }

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> Self::Finish {
        match state {
            ControlFlow::Continue(expr) => Ok(expr),
            ControlFlow::Break(err) => Err(err),
        }
    }
}

impl Expr {
    /// Best-effort algebraic simplification.
    ///
    /// The result computes the same value as `self` for every `X` at which
    /// `self` evaluates, and simplifying it again changes nothing.
    /// # Examples
    /// ```
    /// # use polynomial::expr::Expr;
    /// // (X + 0) * (3 - 2)
    /// let expr = Expr::mul(Expr::add(Expr::var(), Expr::int(0)), Expr::sub(Expr::int(3), Expr::int(2)));
    /// assert_eq!(expr.simplify(), Ok(Expr::var()));
    /// ```
    #[instrument(level = "debug", skip(self), err)]
    pub fn simplify(&self) -> Result<Self> {
        let simplified = simplify().fold(self)?;
        debug!(before = self.size(), after = simplified.size(), "simplified");
        Ok(simplified)
    }
}
