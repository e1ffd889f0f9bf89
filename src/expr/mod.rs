//! Expression compiler and evaluator (§4.2, §4.3).

pub mod compile;
pub mod eval;

use crate::types::{ByteVar, NumericDomain, Operator};

/// A single postfix token produced by the shunting-yard compiler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Var(ByteVar),
    LitInt(i32),
    LitFloat(f32),
    Op(Operator),
}

/// A compiled, non-restartable postfix expression plus the numeric domain
/// its tokens were built for. Evaluation allocates its own scratch stack per
/// call (see the crate-level concurrency notes) rather than storing one
/// here, so a single `Expression` can be evaluated concurrently from many
/// threads.
#[derive(Debug, Clone)]
pub struct Expression {
    pub(crate) domain: NumericDomain,
    pub(crate) postfix: Vec<Token>,
}

impl Expression {
    /// Numeric domain (integer or float) this expression's tokens live in.
    #[must_use]
    pub fn domain(&self) -> NumericDomain {
        self.domain
    }

    /// Number of tokens in the compiled postfix sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.postfix.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.postfix.is_empty()
    }
}
