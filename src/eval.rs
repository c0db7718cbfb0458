use core::ops::ControlFlow;

use tracing::{instrument, trace};

use crate::error::{EvalError, Result};
use crate::expr::{Binop, Expr};
use crate::fold::Fold;

/// Integer division rounding toward negative infinity.
///
/// Returns `None` when `rhs` is zero or the quotient does not fit in an `i64`.
/// # Examples
/// ```
/// # use polynomial::eval::floor_div;
/// assert_eq!(floor_div(7, 2), Some(3));
/// assert_eq!(floor_div(-7, 2), Some(-4));
/// assert_eq!(floor_div(7, -2), Some(-4));
/// assert_eq!(floor_div(-7, -2), Some(3));
/// assert_eq!(floor_div(1, 0), None);
/// assert_eq!(floor_div(i64::MIN, -1), None);
/// ```
pub const fn floor_div(lhs: i64, rhs: i64) -> Option<i64> {
    let Some(quotient) = lhs.checked_div(rhs) else {
        return None;
    };
    match lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
        true => Some(quotient - 1),
        false => Some(quotient),
    }
}

/// Apply `op` with checked arithmetic. `None` means the divisor was zero or
/// the result overflowed.
pub(crate) const fn apply(op: Binop, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        Binop::Add => lhs.checked_add(rhs),
        Binop::Sub => lhs.checked_sub(rhs),
        Binop::Mul => lhs.checked_mul(rhs),
        Binop::Div => floor_div(lhs, rhs),
    }
}

/// Reduces an expression to a number with `X` bound to `x`.
pub const fn evaluate(x: i64) -> Evaluate { Evaluate { x } }

pub struct Evaluate {
    x: i64,
}

impl Fold for Evaluate {
    type Output = i64;
    type Break = EvalError;
    type Finish = Result<i64>;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> { ControlFlow::Continue(self.x) }

    fn int(&mut self, value: i64) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(value)
    }

    fn binop(
        &mut self,
        node: &Expr,
        op: Binop,
        lhs: i64,
        rhs: i64,
    ) -> ControlFlow<Self::Break, Self::Output> {
        if op == Binop::Div && rhs == 0 {
            trace!(lhs, "division by zero");
            return ControlFlow::Break(EvalError::DivisionByZero {
                expr: node.render(),
            });
        }
        match apply(op, lhs, rhs) {
            Some(value) => ControlFlow::Continue(value),
            None => ControlFlow::Break(EvalError::Overflow {
                op,
                lhs,
                rhs,
                expr: node.render(),
            }),
        }
    }

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> Self::Finish {
        match state {
            ControlFlow::Continue(value) => Ok(value),
            ControlFlow::Break(err) => Err(err),
        }
    }
}

impl Expr {
    /// Evaluate with `X` bound to `x`, returning the resulting integer.
    ///
    /// Operands are evaluated left before right. The first failing node
    /// aborts the whole evaluation.
    /// # Examples
    /// ```
    /// # use polynomial::expr::Expr;
    /// // 2 * X - 1 + 6 / 2
    /// let expr = Expr::add(
    ///     Expr::sub(Expr::mul(Expr::int(2), Expr::var()), Expr::int(1)),
    ///     Expr::div(Expr::int(6), Expr::int(2)),
    /// );
    /// assert_eq!(expr.evaluate(4), Ok(10));
    /// ```
    #[instrument(level = "debug", skip(self), ret, err)]
    pub fn evaluate(&self, x: i64) -> Result<i64> { evaluate(x).fold(self) }

    /// Same as [`Expr::evaluate`], but hands the result back as an
    /// [`Expr::Int`] leaf.
    pub fn evaluate_to_constant(&self, x: i64) -> Result<Self> {
        evaluate(x).map(|result: Result<i64>| result.map(Self::Int)).fold(self)
    }
}
