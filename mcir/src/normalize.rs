//! Structural normalization of action trees.
//!
//! - nested sequences, parallel compositions and choices of the same kind are
//!   flattened into their parent,
//! - `skip` and `assume true` are removed from sequences, `skip` from parallel
//!   compositions,
//! - sequences and parallel compositions of a single action are replaced by
//!   that action (and by `skip` when empty).
//!
//! An empty choice blocks, so it is kept as is.
use mcexpr::expr::Expr;

use crate::action::Action;

fn collapse(mut actions: Vec<Action>, wrap: fn(Vec<Action>) -> Action) -> Action {
    match actions.len() {
        0 => Action::Empty,
        1 => actions.swap_remove(0),
        _ => wrap(actions),
    }
}

pub fn normalize(action: Action) -> Action {
    match action {
        Action::Sequential(actions) => {
            let mut flat = Vec::with_capacity(actions.len());
            for child in actions.into_iter().map(normalize) {
                match child {
                    Action::Sequential(inner) => flat.extend(inner),
                    Action::Empty | Action::Assume(Expr::Bool(true)) => {}
                    child => flat.push(child),
                }
            }
            collapse(flat, Action::Sequential)
        }
        Action::Parallel(actions) => {
            let mut flat = Vec::with_capacity(actions.len());
            for child in actions.into_iter().map(normalize) {
                match child {
                    Action::Parallel(inner) => flat.extend(inner),
                    Action::Empty => {}
                    child => flat.push(child),
                }
            }
            collapse(flat, Action::Parallel)
        }
        Action::NonDeterministic(actions) => {
            let mut flat = Vec::with_capacity(actions.len());
            for child in actions.into_iter().map(normalize) {
                match child {
                    Action::NonDeterministic(inner) if !inner.is_empty() => flat.extend(inner),
                    child => flat.push(child),
                }
            }
            if flat.len() == 1 {
                flat.swap_remove(0)
            } else {
                Action::NonDeterministic(flat)
            }
        }
        Action::If {
            condition,
            then,
            otherwise,
        } => Action::If {
            condition,
            then: Box::new(normalize(*then)),
            otherwise: otherwise.map(|otherwise| Box::new(normalize(*otherwise))),
        },
        Action::Loop {
            parameter,
            range,
            body,
        } => Action::Loop {
            parameter,
            range,
            body: Box::new(normalize(*body)),
        },
        action @ (Action::Empty
        | Action::Assume(_)
        | Action::Assignment { .. }
        | Action::Havoc(_)
        | Action::VariableDeclaration(_)) => action,
    }
}
