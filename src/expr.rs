use alloc::boxed::Box;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;
use core::ops::ControlFlow;

use crate::fold::Fold;
use crate::foldable::Event;

/// A polynomial expression in the single free variable `X`.
///
/// Every binary node owns its operands, so an `Expr` is always a strict tree.
/// Nodes are never mutated after construction; every operation builds new
/// values. `Clone`, `PartialEq`, `Hash` and `Drop` walk the tree with an
/// explicit stack; only `Debug` recurses.
#[derive(Debug)]
pub enum Expr {
    Var,
    Int(i64),
    Binop(Binop, Box<Self>, Box<Self>),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Binop {
    Add,
    Sub,
    Mul,
    Div,
}

/// Binding strength of a node when it appears as an operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Additive,
    Multiplicative,
    Atom,
}

impl Binop {
    pub const fn precedence(self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Additive,
            Self::Mul | Self::Div => Precedence::Multiplicative,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

impl fmt::Display for Binop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.symbol()) }
}

impl Expr {
    pub const fn var() -> Self { Self::Var }

    pub const fn int(value: i64) -> Self { Self::Int(value) }

    pub fn binop(op: Binop, lhs: Self, rhs: Self) -> Self {
        Self::Binop(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Self, rhs: Self) -> Self { Self::binop(Binop::Add, lhs, rhs) }

    pub fn sub(lhs: Self, rhs: Self) -> Self { Self::binop(Binop::Sub, lhs, rhs) }

    pub fn mul(lhs: Self, rhs: Self) -> Self { Self::binop(Binop::Mul, lhs, rhs) }

    pub fn div(lhs: Self, rhs: Self) -> Self { Self::binop(Binop::Div, lhs, rhs) }

    pub const fn precedence(&self) -> Precedence {
        match self {
            Self::Var | Self::Int(_) => Precedence::Atom,
            Self::Binop(op, ..) => op.precedence(),
        }
    }

    pub const fn is_leaf(&self) -> bool { !matches!(self, Self::Binop(..)) }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// Node shape with the operands left out. Two trees are equal exactly when
/// their post-order shape sequences are.
#[derive(PartialEq, Eq, Hash)]
enum Shape {
    Var,
    Int(i64),
    Binop(Binop),
}

impl From<Event<'_>> for Shape {
    fn from(event: Event<'_>) -> Self {
        match event {
            Event::Var => Self::Var,
            Event::Int(value) => Self::Int(value),
            Event::Binop(_, op) => Self::Binop(op),
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.post_order()
            .map(Shape::from)
            .eq(other.post_order().map(Shape::from))
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for event in self.post_order() {
            Shape::from(event).hash(state);
        }
    }
}

struct Rebuild;

impl Fold for Rebuild {
    type Output = Expr;
    type Break = Infallible;
    type Finish = Expr;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> { ControlFlow::Continue(Expr::Var) }

    fn int(&mut self, value: i64) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(Expr::Int(value))
    }

    fn binop(
        &mut self,
        _: &Expr,
        op: Binop,
        lhs: Expr,
        rhs: Expr,
    ) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(Expr::binop(op, lhs, rhs))
    }

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> Expr {
        match state {
            ControlFlow::Continue(expr) => expr,
            ControlFlow::Break(b) => match b {},
        }
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self { Rebuild.fold(self) }
}

/// Move the binary operands of `expr` onto `pending`, leaving `Var` behind.
/// Leaf operands stay put, so dropping a detached node never recurses.
fn detach(expr: &mut Expr, pending: &mut Vec<Expr>) {
    if let Expr::Binop(_, lhs, rhs) = expr {
        for operand in [lhs, rhs] {
            if !operand.is_leaf() {
                pending.push(mem::replace(&mut **operand, Expr::Var));
            }
        }
    }
}

// Tear the tree down with an explicit stack, otherwise dropping a deep
// left-nested chain overflows the call stack.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        detach(self, &mut pending);
        while let Some(mut expr) = pending.pop() {
            detach(&mut expr, &mut pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_tiers() {
        assert!(Precedence::Additive < Precedence::Multiplicative);
        assert!(Precedence::Multiplicative < Precedence::Atom);
        assert_eq!(Expr::add(Expr::var(), Expr::int(1)).precedence(), Precedence::Additive);
        assert_eq!(Expr::sub(Expr::var(), Expr::int(1)).precedence(), Precedence::Additive);
        assert_eq!(Expr::mul(Expr::var(), Expr::int(1)).precedence(), Precedence::Multiplicative);
        assert_eq!(Expr::div(Expr::var(), Expr::int(1)).precedence(), Precedence::Multiplicative);
        assert_eq!(Expr::var().precedence(), Precedence::Atom);
        assert_eq!(Expr::int(-3).precedence(), Precedence::Atom);
    }

    #[test]
    fn leaves() {
        assert!(Expr::var().is_leaf());
        assert!(Expr::int(7).is_leaf());
        assert!(!Expr::mul(Expr::int(2), Expr::var()).is_leaf());
        assert_eq!(Expr::int(7).as_int(), Some(7));
        assert_eq!(Expr::var().as_int(), None);
    }

    #[test]
    fn clone_is_structurally_equal() {
        let expr = Expr::mul(Expr::add(Expr::var(), Expr::int(1)), Expr::sub(Expr::var(), Expr::int(1)));
        assert_eq!(expr.clone(), expr);
    }

    #[test]
    fn expressions_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Expr>();
        assert_send_sync::<Binop>();
    }

    #[test]
    fn equality_follows_structure() {
        let lhs = Expr::sub(Expr::int(1), Expr::sub(Expr::int(2), Expr::int(3)));
        let rhs = Expr::sub(Expr::sub(Expr::int(1), Expr::int(2)), Expr::int(3));
        assert_ne!(lhs, rhs);
        assert_ne!(Expr::add(Expr::var(), Expr::int(1)), Expr::sub(Expr::var(), Expr::int(1)));
        assert_ne!(Expr::int(0), Expr::var());
        assert_eq!(lhs, lhs.clone());
    }

    #[test]
    fn equal_trees_hash_alike() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(expr: &Expr) -> u64 {
            let mut hasher = DefaultHasher::new();
            expr.hash(&mut hasher);
            hasher.finish()
        }

        let expr = Expr::mul(Expr::add(Expr::var(), Expr::int(1)), Expr::int(2));
        assert_eq!(hash_of(&expr), hash_of(&expr.clone()));
    }

    #[test]
    fn deep_clone_and_compare() {
        let mut expr = Expr::var();
        for i in 0..200_000 {
            expr = Expr::add(expr, Expr::int(i));
        }
        let copy = expr.clone();
        assert_eq!(copy, expr);
        let mut other = Expr::int(0);
        for i in 0..200_000 {
            other = Expr::add(other, Expr::int(i));
        }
        assert_ne!(other, expr);
    }

    #[test]
    fn dropping_deep_tree() {
        let mut expr = Expr::var();
        for i in 0..200_000 {
            expr = Expr::add(expr, Expr::int(i));
        }
        drop(expr);
    }
}
