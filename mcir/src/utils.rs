use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// Failure of an expression-level operation (evaluation, typing, negation).
    #[error("{0}")]
    Expr(#[from] mcexpr::utils::Error),

    /// A default branch can only extend a nondeterministic choice.
    #[error("Expected a nondeterministic choice action, found a `{found}` action.")]
    NotAChoice { found: String },

    /// Builders take one action per guard, plus an optional default action.
    #[error("Expected {guards} or {} actions for {guards} guards, found {actions}.", .guards + 1)]
    GuardActionMismatch { guards: usize, actions: usize },

    /// Only loop actions can be unrolled.
    #[error("Expected a loop action, found a `{found}` action.")]
    NotALoop { found: String },

    /// The loop range has more iterations than allowed.
    #[error("Unrolling requires {iterations} iterations, the limit is {max}.")]
    UnrollLimitExceeded { iterations: usize, max: usize },

    /// The queue array or its size variable is not usable as a queue.
    #[error("Invalid queue encoding: {reason}.")]
    InvalidQueue { reason: String },
}

pub type IrResult<T> = Result<T, Error>;
