//! Loop unrolling.
use log::debug;
use mcexpr::{eval::ExpressionEvaluator, expr::Expr, package::Package};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    action::Action,
    utils::{Error, IrResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnrollOptions {
    /// Largest number of iterations a single loop may unroll to.
    pub max_iterations: usize,
}

impl Default for UnrollOptions {
    fn default() -> Self {
        Self {
            max_iterations: 4096,
        }
    }
}

/// Sequence of copies of the loop body, one per value of the range, each with
/// the loop parameter replaced by that value.
pub fn unroll_loop(package: &Package, action: &Action, options: &UnrollOptions) -> IrResult<Action> {
    let Action::Loop {
        parameter,
        range,
        body,
    } = action
    else {
        return Err(Error::NotALoop {
            found: action.kind().to_string(),
        });
    };

    let (lower, upper) = ExpressionEvaluator::new(package).evaluate_range_bounds(range)?;
    let iterations = if lower > upper {
        0
    } else {
        (&upper - &lower + 1u32)
            .to_usize()
            .unwrap_or(usize::MAX)
    };
    if iterations > options.max_iterations {
        return Err(Error::UnrollLimitExceeded {
            iterations,
            max: options.max_iterations,
        });
    }

    let copies = (0..iterations)
        .map(|offset| {
            let mut copy = body.as_ref().clone();
            copy.substitute(*parameter, &Expr::Int(&lower + BigInt::from(offset)));
            copy
        })
        .collect();

    debug!("Unrolled loop into {} iterations", iterations);
    Ok(Action::Sequential(copies))
}

/// Unroll every loop of `action`, in place. Outer loops are unrolled first so
/// that the ranges of inner loops no longer mention outer parameters when
/// their turn comes. Returns the number of unrolled loops.
pub fn unroll_all_loops(
    package: &Package,
    action: &mut Action,
    options: &UnrollOptions,
) -> IrResult<usize> {
    let mut count = 0;
    let mut stack: Vec<&mut Action> = vec![action];
    while let Some(node) = stack.pop() {
        if node.is_loop() {
            *node = unroll_loop(package, node, options)?;
            count += 1;
        }
        stack.extend(node.children_mut());
    }
    Ok(count)
}
