use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::expr::{Binop, Expr, Precedence};

const OPEN: &str = "( ";
const CLOSE: &str = " )";

const fn infix(op: Binop) -> &'static str {
    match op {
        Binop::Add => " + ",
        Binop::Sub => " - ",
        Binop::Mul => " * ",
        Binop::Div => " / ",
    }
}

enum Task<'expr> {
    Expr(&'expr Expr),
    Text(&'static str),
}

/// Queue `operand` for writing, wrapped in parentheses when it binds more
/// loosely than the operator it belongs to.
fn push_operand<'expr>(tasks: &mut Vec<Task<'expr>>, operand: &'expr Expr, parent: Precedence) {
    match operand.precedence() < parent {
        true => {
            tasks.push(Task::Text(CLOSE));
            tasks.push(Task::Expr(operand));
            tasks.push(Task::Text(OPEN));
        }
        false => tasks.push(Task::Expr(operand)),
    }
}

/// Write the infix form of `expr`. Tasks sit on a stack in reverse order, so
/// the tree is written left to right in one pass without recursion.
pub fn write_expr<W>(out: &mut W, expr: &Expr) -> fmt::Result
where
    W: fmt::Write + ?Sized,
{
    let mut tasks = vec![Task::Expr(expr)];
    while let Some(task) = tasks.pop() {
        match task {
            Task::Text(text) => out.write_str(text)?,
            Task::Expr(Expr::Var) => out.write_str("X")?,
            Task::Expr(Expr::Int(value)) => write!(out, "{value}")?,
            Task::Expr(Expr::Binop(op, lhs, rhs)) => {
                let precedence = op.precedence();
                push_operand(&mut tasks, rhs, precedence);
                tasks.push(Task::Text(infix(*op)));
                push_operand(&mut tasks, lhs, precedence);
            }
        }
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write_expr(f, self) }
}

impl Expr {
    /// # Examples
    /// ```
    /// # use polynomial::expr::Expr;
    /// let expr = Expr::mul(Expr::add(Expr::int(2), Expr::int(3)), Expr::int(4));
    /// assert_eq!(expr.render(), "( 2 + 3 ) * 4");
    /// ```
    pub fn render(&self) -> String { self.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves() {
        assert_eq!(Expr::var().render(), "X");
        assert_eq!(Expr::int(42).render(), "42");
        assert_eq!(Expr::int(-3).render(), "-3");
    }

    #[test]
    fn additive_operands_are_never_wrapped() {
        let expr = Expr::sub(Expr::add(Expr::int(1), Expr::int(2)), Expr::sub(Expr::int(3), Expr::int(4)));
        assert_eq!(expr.render(), "1 + 2 - 3 - 4");
        let expr = Expr::add(Expr::mul(Expr::int(2), Expr::var()), Expr::div(Expr::int(6), Expr::int(2)));
        assert_eq!(expr.render(), "2 * X + 6 / 2");
    }

    #[test]
    fn multiplicative_operands_wrap_additive_ones() {
        let expr = Expr::mul(Expr::add(Expr::int(2), Expr::int(3)), Expr::add(Expr::int(4), Expr::int(1)));
        assert_eq!(expr.render(), "( 2 + 3 ) * ( 4 + 1 )");
        let expr = Expr::div(Expr::sub(Expr::int(10), Expr::int(2)), Expr::int(4));
        assert_eq!(expr.render(), "( 10 - 2 ) / 4");
        let expr = Expr::mul(Expr::var(), Expr::sub(Expr::var(), Expr::int(1)));
        assert_eq!(expr.render(), "X * ( X - 1 )");
    }

    #[test]
    fn multiplicative_operands_stay_bare() {
        let expr = Expr::div(Expr::int(6), Expr::mul(Expr::int(2), Expr::int(3)));
        assert_eq!(expr.render(), "6 / 2 * 3");
        let expr = Expr::mul(Expr::div(Expr::var(), Expr::int(2)), Expr::int(-1));
        assert_eq!(expr.render(), "X / 2 * -1");
    }

    #[test]
    fn nested_wrapping() {
        // ((2 + 3) * 4 + 1) * X
        let expr = Expr::mul(
            Expr::add(Expr::mul(Expr::add(Expr::int(2), Expr::int(3)), Expr::int(4)), Expr::int(1)),
            Expr::var(),
        );
        assert_eq!(expr.render(), "( ( 2 + 3 ) * 4 + 1 ) * X");
    }

    #[test]
    fn display_matches_render() {
        let expr = Expr::sub(Expr::int(2), Expr::int(5));
        assert_eq!(format!("{expr}"), expr.render());
    }

    #[test]
    fn deep_trees_do_not_recurse() {
        let mut expr = Expr::var();
        for _ in 0..50_000 {
            expr = Expr::mul(Expr::add(expr, Expr::int(1)), Expr::int(2));
        }
        let rendered = expr.render();
        assert_eq!(rendered.matches("( ").count(), 50_000);
        assert!(rendered.trim_start_matches("( ").starts_with("X + 1 ) * 2 + 1 ) * 2"));
        assert!(rendered.ends_with(" + 1 ) * 2"));
    }
}
