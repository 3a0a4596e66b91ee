//! mcir: imperative action IR built on top of `mcexpr` expressions.
//!
//! Provides the [`action::Action`] tree, builders synthesizing guarded
//! choices and conditionals ([`builder`]), queue encodings over arrays
//! ([`queue`]), loop unrolling ([`unroll`]), structural normalization
//! ([`normalize`]) and extraction of analysis scopes for the interval
//! analyzer of `mcexpr` ([`scope`]).

pub mod action;
pub mod builder;
pub mod normalize;
pub mod queue;
pub mod scope;
pub mod unroll;
pub mod utils;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::action::{Action, ActionKind};
    pub use crate::builder::{
        create_choice_action, create_if_action, create_switch_action,
        extend_choice_with_default_branch, guarded_branch,
    };
    pub use crate::normalize::normalize;
    pub use crate::queue::{ArrayQueue, QueueEncoding};
    pub use crate::scope::collect_analysis_scope;
    pub use crate::unroll::{UnrollOptions, unroll_all_loops, unroll_loop};
    pub use crate::utils::{Error, IrResult};
}
