//! Builders for guarded compositions.
//!
//! Every builder takes one action per guard and optionally one more, trailing
//! action executed when no guard holds.
use log::debug;
use mcexpr::{
    expr::{Expr, func},
    negate::negate,
    utils::ExprResult,
};

use crate::{
    action::Action,
    utils::{Error, IrResult},
};

fn check_arity(guards: usize, actions: usize) -> IrResult<()> {
    if actions == guards || actions == guards + 1 {
        Ok(())
    } else {
        Err(Error::GuardActionMismatch { guards, actions })
    }
}

/// `assume guard; action`
pub fn guarded_branch(guard: Expr, action: Action) -> Action {
    Action::Sequential(vec![Action::Assume(guard), action])
}

/// Nondeterministic choice between the guarded actions.
///
/// A trailing extra action becomes a default branch, see
/// [`extend_choice_with_default_branch`]. So does an action guarded by
/// [`Expr::Else`].
pub fn create_choice_action(guards: Vec<Expr>, actions: Vec<Action>) -> IrResult<Action> {
    check_arity(guards.len(), actions.len())?;

    let mut actions = actions.into_iter();
    let mut defaults = Vec::new();
    let mut branches = Vec::new();
    for (guard, action) in guards.into_iter().zip(actions.by_ref()) {
        if guard.is_else() {
            defaults.push(action);
        } else {
            branches.push(guarded_branch(guard, action));
        }
    }
    defaults.extend(actions);

    let mut choice = Action::NonDeterministic(branches);
    for default in defaults {
        extend_choice_with_default_branch(&mut choice, default)?;
    }
    Ok(choice)
}

/// `if g0 { a0 } else if g1 { a1 } ... else { default }`
pub fn create_if_action(guards: Vec<Expr>, mut actions: Vec<Action>) -> IrResult<Action> {
    check_arity(guards.len(), actions.len())?;

    let mut otherwise = if actions.len() > guards.len() {
        actions.pop().map(Box::new)
    } else {
        None
    };

    for (guard, action) in guards.into_iter().zip(actions).rev() {
        otherwise = Some(Box::new(Action::If {
            condition: guard,
            then: Box::new(action),
            otherwise,
        }));
    }

    Ok(otherwise.map_or(Action::Empty, |action| *action))
}

/// Nondeterministic choice whose guards are made mutually exclusive: guard
/// `i` only holds when no earlier guard does, the default branch only when no
/// guard does.
pub fn create_switch_action(guards: Vec<Expr>, actions: Vec<Action>) -> IrResult<Action> {
    check_arity(guards.len(), actions.len())?;

    let negations = guards.iter().map(negate).collect::<ExprResult<Vec<_>>>()?;

    let mut actions = actions.into_iter();
    let mut branches = Vec::with_capacity(guards.len() + 1);
    for (index, (guard, action)) in guards.into_iter().zip(actions.by_ref()).enumerate() {
        let condition = func::and(
            negations[..index]
                .iter()
                .cloned()
                .chain(std::iter::once(guard)),
        );
        branches.push(guarded_branch(condition, action));
    }

    if let Some(default) = actions.next() {
        branches.push(guarded_branch(func::and(negations), default));
    }

    Ok(Action::NonDeterministic(branches))
}

/// Append to `choice` a branch executing `action` exactly when no existing
/// branch can start, i.e. guarded by the negated disjunction of the branch
/// preconditions.
pub fn extend_choice_with_default_branch(choice: &mut Action, action: Action) -> IrResult<()> {
    let branches = match choice {
        Action::NonDeterministic(branches) => branches,
        other => {
            return Err(Error::NotAChoice {
                found: other.kind().to_string(),
            });
        }
    };

    let guard = negate(&func::or(branches.iter().map(Action::precondition)))?;
    debug!(
        "Default branch synthesized from {} branch preconditions",
        branches.len()
    );
    branches.push(guarded_branch(guard, action));
    Ok(())
}
