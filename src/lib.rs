//! Polynomial expressions in a single variable `X`: construction, evaluation,
//! precedence-aware rendering and best-effort simplification.
//!
//! Evaluation, rendering, simplification, cloning, comparison, hashing and
//! dropping all run on an explicit heap stack, so tree depth is bounded by
//! memory rather than by the call stack. Only the derived `Debug` recurses.
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod error;
pub mod eval;
pub mod expr;
pub mod fold;
pub mod foldable;
pub mod render;
pub mod simplify;

pub mod prelude {
    pub use core::convert::Infallible;
    pub use core::ops::ControlFlow::{self, Break, Continue};

    pub use crate::error::{EvalError, Result};
    pub use crate::expr::{Binop, Expr, Precedence};
    pub use crate::fold::Fold;
    pub use crate::foldable::Event;
}
