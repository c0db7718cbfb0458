use alloc::vec;
use alloc::vec::Vec;

use crate::expr::{Binop, Expr};

/// One step of a post-order walk. A `Binop` event arrives only after every
/// event of its left subtree and then its right subtree.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event<'expr> {
    Var,
    Int(i64),
    Binop(&'expr Expr, Binop),
}

enum Frame<'expr> {
    Visit(&'expr Expr),
    Combine(&'expr Expr, Binop),
}

/// Post-order iterator over an expression, driven by a heap-allocated stack
/// so that tree depth never translates into call-stack depth.
pub struct PostOrder<'expr> {
    frames: Vec<Frame<'expr>>,
}

impl<'expr> PostOrder<'expr> {
    pub fn new(expr: &'expr Expr) -> Self {
        Self {
            frames: vec![Frame::Visit(expr)],
        }
    }
}

impl<'expr> Iterator for PostOrder<'expr> {
    type Item = Event<'expr>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.frames.pop()? {
                Frame::Combine(node, op) => return Some(Event::Binop(node, op)),
                Frame::Visit(Expr::Var) => return Some(Event::Var),
                Frame::Visit(Expr::Int(value)) => return Some(Event::Int(*value)),
                Frame::Visit(node @ Expr::Binop(op, lhs, rhs)) => {
                    self.frames.push(Frame::Combine(node, *op));
                    self.frames.push(Frame::Visit(rhs));
                    self.frames.push(Frame::Visit(lhs));
                }
            }
        }
    }
}

impl Expr {
    /// # Examples
    /// ```
    /// # use polynomial::expr::Expr;
    /// # use polynomial::foldable::Event;
    /// let expr = Expr::add(Expr::int(2), Expr::var());
    /// let events: Vec<_> = expr.post_order().collect();
    /// assert_eq!(events[..2], [Event::Int(2), Event::Var]);
    /// assert!(matches!(events[2], Event::Binop(_, polynomial::expr::Binop::Add)));
    /// ```
    pub fn post_order(&self) -> PostOrder<'_> { PostOrder::new(self) }
}
