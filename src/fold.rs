use alloc::vec::Vec;
use core::convert::Infallible;
use core::ops::ControlFlow;

use crate::expr::{Binop, Expr};
use crate::foldable::Event;

/// A bottom-up computation over an expression tree.
///
/// `var` and `int` produce a value for each leaf, `binop` combines the values
/// of a node's two operands. Any step may `Break`, which abandons the rest of
/// the traversal. `finish` turns the final state into the fold's result.
pub trait Fold {
    type Output;
    type Break;
    type Finish;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output>;

    fn int(&mut self, value: i64) -> ControlFlow<Self::Break, Self::Output>;

    fn binop(
        &mut self,
        node: &Expr,
        op: Binop,
        lhs: Self::Output,
        rhs: Self::Output,
    ) -> ControlFlow<Self::Break, Self::Output>;

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> Self::Finish;

    fn fold(mut self, expr: &Expr) -> Self::Finish
    where
        Self: Sized,
    {
        let state = drive(&mut self, expr);
        self.finish(state)
    }

    /// Zip up two folds into a single fold, so both results come out of one
    /// traversal of the tree.
    /// # Examples
    /// ```
    /// # use polynomial::expr::Expr;
    /// # use polynomial::fold::{depth, size, Fold};
    /// let expr = Expr::add(Expr::mul(Expr::int(2), Expr::var()), Expr::int(1));
    /// assert_eq!(size().zip(depth()).fold(&expr), (5, 3));
    /// ```
    fn zip<Other>(self, other: Other) -> Zip<Self, Other>
    where
        Self: Sized,
        Other: Fold,
    {
        Zip {
            f1: self,
            f2: other,
        }
    }

    fn map<FinishFn, Finish2>(self, finish_fn: FinishFn) -> Map<Self, FinishFn>
    where
        Self: Sized,
        FinishFn: FnMut(Self::Finish) -> Finish2,
    {
        Map {
            fold1: self,
            finish_fn,
        }
    }
}

fn drive<F>(fold: &mut F, expr: &Expr) -> ControlFlow<F::Break, F::Output>
where
    F: Fold,
{
    let mut outputs = Vec::new();
    for event in expr.post_order() {
        let output = match event {
            Event::Var => fold.var()?,
            Event::Int(value) => fold.int(value)?,
            Event::Binop(node, op) => {
                let (Some(rhs), Some(lhs)) = (outputs.pop(), outputs.pop()) else {
                    unreachable!("post-order walk yields both operands before their node")
                };
                fold.binop(node, op, lhs, rhs)?
            }
        };
        outputs.push(output);
    }
    match outputs.pop() {
        Some(output) => ControlFlow::Continue(output),
        None => unreachable!("post-order walk yields at least one event"),
    }
}

/// Combine per-operand states, calling `binop` only when neither operand
/// broke. The leftmost break wins.
fn combine<F>(
    fold: &mut F,
    node: &Expr,
    op: Binop,
    lhs: ControlFlow<F::Break, F::Output>,
    rhs: ControlFlow<F::Break, F::Output>,
) -> ControlFlow<F::Break, F::Output>
where
    F: Fold,
{
    match (lhs, rhs) {
        (ControlFlow::Continue(lhs), ControlFlow::Continue(rhs)) => fold.binop(node, op, lhs, rhs),
        (ControlFlow::Break(b), _) | (ControlFlow::Continue(_), ControlFlow::Break(b)) => {
            ControlFlow::Break(b)
        }
    }
}

pub struct Zip<Fold1, Fold2>
where
    Fold1: Fold,
    Fold2: Fold,
{
    f1: Fold1,
    f2: Fold2,
}

/// Per-node state of a [`Zip`]. A side that broke keeps carrying its break up
/// the tree while the other side carries on; the zip as a whole only breaks
/// once both sides have.
pub type ZipOutput<F1, F2> = (
    ControlFlow<<F1 as Fold>::Break, <F1 as Fold>::Output>,
    ControlFlow<<F2 as Fold>::Break, <F2 as Fold>::Output>,
);

impl<F1, F2> Zip<F1, F2>
where
    F1: Fold,
    F2: Fold,
{
    fn join(
        s1: ControlFlow<F1::Break, F1::Output>,
        s2: ControlFlow<F2::Break, F2::Output>,
    ) -> ControlFlow<(F1::Break, F2::Break), ZipOutput<F1, F2>> {
        match (s1, s2) {
            (ControlFlow::Break(b1), ControlFlow::Break(b2)) => ControlFlow::Break((b1, b2)),
            (s1, s2) => ControlFlow::Continue((s1, s2)),
        }
    }
}

impl<F1, F2> Fold for Zip<F1, F2>
where
    F1: Fold,
    F2: Fold,
{
    type Output = ZipOutput<F1, F2>;
    type Break = (F1::Break, F2::Break);
    type Finish = (F1::Finish, F2::Finish);

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> {
        Self::join(self.f1.var(), self.f2.var())
    }

    fn int(&mut self, value: i64) -> ControlFlow<Self::Break, Self::Output> {
        Self::join(self.f1.int(value), self.f2.int(value))
    }

    fn binop(
        &mut self,
        node: &Expr,
        op: Binop,
        (l1, l2): Self::Output,
        (r1, r2): Self::Output,
    ) -> ControlFlow<Self::Break, Self::Output> {
        let s1 = combine(&mut self.f1, node, op, l1, r1);
        let s2 = combine(&mut self.f2, node, op, l2, r2);
        Self::join(s1, s2)
    }

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> Self::Finish {
        match state {
            ControlFlow::Continue((s1, s2)) => (self.f1.finish(s1), self.f2.finish(s2)),
            ControlFlow::Break((b1, b2)) => (
                self.f1.finish(ControlFlow::Break(b1)),
                self.f2.finish(ControlFlow::Break(b2)),
            ),
        }
    }
}

pub struct Map<Fold1, FinishFn> {
    fold1: Fold1,
    finish_fn: FinishFn,
}

impl<Fold1, FinishFn, Finish2> Fold for Map<Fold1, FinishFn>
where
    Fold1: Fold,
    FinishFn: FnMut(Fold1::Finish) -> Finish2,
{
    type Output = Fold1::Output;
    type Break = Fold1::Break;
    type Finish = Finish2;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> { self.fold1.var() }

    fn int(&mut self, value: i64) -> ControlFlow<Self::Break, Self::Output> {
        self.fold1.int(value)
    }

    fn binop(
        &mut self,
        node: &Expr,
        op: Binop,
        lhs: Self::Output,
        rhs: Self::Output,
    ) -> ControlFlow<Self::Break, Self::Output> {
        self.fold1.binop(node, op, lhs, rhs)
    }

    fn finish(mut self, state: ControlFlow<Self::Break, Self::Output>) -> Finish2 {
        let finish1 = self.fold1.finish(state);
        (self.finish_fn)(finish1)
    }
}

/// Number of nodes in the tree.
/// # Examples
/// ```
/// # use polynomial::expr::Expr;
/// # use polynomial::fold::{size, Fold};
/// assert_eq!(size().fold(&Expr::var()), 1);
/// assert_eq!(size().fold(&Expr::sub(Expr::int(2), Expr::int(5))), 3);
/// ```
pub const fn size() -> Size { Size }

pub struct Size;

impl Fold for Size {
    type Output = usize;
    type Break = Infallible;
    type Finish = usize;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> { ControlFlow::Continue(1) }

    fn int(&mut self, _: i64) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(1)
    }

    fn binop(
        &mut self,
        _: &Expr,
        _: Binop,
        lhs: usize,
        rhs: usize,
    ) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(lhs + rhs + 1)
    }

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> usize {
        match state {
            ControlFlow::Continue(size) => size,
            ControlFlow::Break(b) => match b {},
        }
    }
}

/// Length of the longest root-to-leaf path, counting nodes.
/// # Examples
/// ```
/// # use polynomial::expr::Expr;
/// # use polynomial::fold::{depth, Fold};
/// assert_eq!(depth().fold(&Expr::int(4)), 1);
/// let expr = Expr::mul(Expr::add(Expr::int(2), Expr::int(3)), Expr::int(4));
/// assert_eq!(depth().fold(&expr), 3);
/// ```
pub const fn depth() -> Depth { Depth }

pub struct Depth;

impl Fold for Depth {
    type Output = usize;
    type Break = Infallible;
    type Finish = usize;

    fn var(&mut self) -> ControlFlow<Self::Break, Self::Output> { ControlFlow::Continue(1) }

    fn int(&mut self, _: i64) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(1)
    }

    fn binop(
        &mut self,
        _: &Expr,
        _: Binop,
        lhs: usize,
        rhs: usize,
    ) -> ControlFlow<Self::Break, Self::Output> {
        ControlFlow::Continue(core::cmp::max(lhs, rhs) + 1)
    }

    fn finish(self, state: ControlFlow<Self::Break, Self::Output>) -> usize {
        match state {
            ControlFlow::Continue(depth) => depth,
            ControlFlow::Break(b) => match b {},
        }
    }
}

impl Expr {
    pub fn size(&self) -> usize { size().fold(self) }

    pub fn depth(&self) -> usize { depth().fold(self) }
}
