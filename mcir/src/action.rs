//! Action IR
//!
//! Small imperative language consumed by model-checking backends: primitive
//! actions (assume, assignment, havoc, local declarations) composed
//! sequentially, in parallel, by nondeterministic choice, by conditionals and
//! by bounded loops.
use std::collections::BTreeMap;

use auto_enums::auto_enum;
use mcexpr::{
    expr::{Expr, IntegerRange, func},
    package::{DeclKey, Package},
};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs};

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(ActionKind))]
#[strum_discriminants(derive(Hash, strum::Display))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    /// Does nothing.
    Empty,

    /// Blocks unless the condition holds.
    Assume(Expr),

    /// `lhs := rhs`; `lhs` is a reference expression.
    Assignment { lhs: Expr, rhs: Expr },

    /// Assigns an arbitrary value to a reference expression.
    Havoc(Expr),

    /// Introduces a local variable.
    VariableDeclaration(DeclKey),

    Sequential(Vec<Action>),

    Parallel(Vec<Action>),

    /// Executes one of the branches whose precondition holds.
    NonDeterministic(Vec<Action>),

    If {
        condition: Expr,
        then: Box<Action>,
        otherwise: Option<Box<Action>>,
    },

    /// Executes `body` for every value of `range`, in ascending order, with
    /// `parameter` bound to that value.
    Loop {
        parameter: DeclKey,
        range: IntegerRange,
        body: Box<Action>,
    },
}

impl Action {
    /// Discriminant of this action.
    pub fn kind(&self) -> ActionKind {
        self.into()
    }

    /// Direct sub-actions.
    #[auto_enum(Iterator)]
    pub fn children(&self) -> impl Iterator<Item = &Action> {
        match self {
            Action::Empty
            | Action::Assume(_)
            | Action::Assignment { .. }
            | Action::Havoc(_)
            | Action::VariableDeclaration(_) => std::iter::empty(),
            Action::Sequential(actions)
            | Action::Parallel(actions)
            | Action::NonDeterministic(actions) => actions.iter(),
            Action::If {
                then, otherwise, ..
            } => std::iter::once(then.as_ref()).chain(otherwise.as_deref()),
            Action::Loop { body, .. } => std::iter::once(body.as_ref()),
        }
    }

    /// Direct sub-actions, mutably.
    #[auto_enum(Iterator)]
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Action> {
        match self {
            Action::Empty
            | Action::Assume(_)
            | Action::Assignment { .. }
            | Action::Havoc(_)
            | Action::VariableDeclaration(_) => std::iter::empty(),
            Action::Sequential(actions)
            | Action::Parallel(actions)
            | Action::NonDeterministic(actions) => actions.iter_mut(),
            Action::If {
                then, otherwise, ..
            } => std::iter::once(then.as_mut()).chain(otherwise.as_deref_mut()),
            Action::Loop { body, .. } => std::iter::once(body.as_mut()),
        }
    }

    /// Expressions held directly by this action (not by its sub-actions).
    #[auto_enum(Iterator)]
    pub fn expressions(&self) -> impl Iterator<Item = &Expr> {
        match self {
            Action::Assume(expr) | Action::Havoc(expr) => std::iter::once(expr),
            Action::Assignment { lhs, rhs } => [lhs, rhs].into_iter(),
            Action::If { condition, .. } => std::iter::once(condition),
            Action::Loop { range, .. } => [range.lower.as_ref(), range.upper.as_ref()].into_iter(),
            Action::Empty
            | Action::VariableDeclaration(_)
            | Action::Sequential(_)
            | Action::Parallel(_)
            | Action::NonDeterministic(_) => std::iter::empty(),
        }
    }

    #[auto_enum(Iterator)]
    pub fn expressions_mut(&mut self) -> impl Iterator<Item = &mut Expr> {
        match self {
            Action::Assume(expr) | Action::Havoc(expr) => std::iter::once(expr),
            Action::Assignment { lhs, rhs } => [lhs, rhs].into_iter(),
            Action::If { condition, .. } => std::iter::once(condition),
            Action::Loop { range, .. } => [range.lower.as_mut(), range.upper.as_mut()].into_iter(),
            Action::Empty
            | Action::VariableDeclaration(_)
            | Action::Sequential(_)
            | Action::Parallel(_)
            | Action::NonDeterministic(_) => std::iter::empty(),
        }
    }

    /// Pre-order iterator over this action and all its sub-actions.
    pub fn descendants(&self) -> impl Iterator<Item = &Action> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let action = stack.pop()?;
            let start = stack.len();
            stack.extend(action.children());
            stack[start..].reverse();
            Some(action)
        })
    }

    /// Replace every reference to a key of `replacements`, in every expression
    /// of the action tree. Returns the number of replaced nodes.
    pub fn substitute_all(&mut self, replacements: &BTreeMap<DeclKey, Expr>) -> usize {
        let mut count = 0;
        let mut stack: Vec<&mut Action> = vec![self];
        while let Some(action) = stack.pop() {
            for expr in action.expressions_mut() {
                count += expr.substitute_all(replacements);
            }
            stack.extend(action.children_mut());
        }
        count
    }

    /// Replace every reference to `decl` by a clone of `replacement`.
    pub fn substitute(&mut self, decl: DeclKey, replacement: &Expr) -> usize {
        self.substitute_all(&BTreeMap::from([(decl, replacement.clone())]))
    }

    /// Condition under which the action can start executing.
    ///
    /// Built from clones; the action is left untouched.
    pub fn precondition(&self) -> Expr {
        match self {
            Action::Assume(condition) => condition.clone(),
            Action::Sequential(actions) => actions
                .first()
                .map_or(Expr::Bool(true), Action::precondition),
            Action::Parallel(actions) => func::and(actions.iter().map(Action::precondition)),
            Action::NonDeterministic(actions) => func::or(actions.iter().map(Action::precondition)),
            Action::If {
                condition,
                then,
                otherwise,
            } => func::ite(
                condition.clone(),
                then.precondition(),
                otherwise
                    .as_ref()
                    .map_or(Expr::Bool(true), |otherwise| otherwise.precondition()),
            ),
            Action::Empty
            | Action::Assignment { .. }
            | Action::Havoc(_)
            | Action::VariableDeclaration(_)
            | Action::Loop { .. } => Expr::Bool(true),
        }
    }

    /// Build a formatting helper rendering the action as indented pseudo-code.
    pub fn fmt<'a>(&'a self, package: &'a Package) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            action: &'a Action,
            package: &'a Package,
        }

        fn write_block(
            f: &mut std::fmt::Formatter<'_>,
            keyword: &str,
            actions: &[Action],
            package: &Package,
            indent: usize,
        ) -> std::fmt::Result {
            writeln!(f, "{:indent$}{} {{", "", keyword, indent = indent)?;
            for action in actions {
                write_action(f, action, package, indent + 2)?;
            }
            writeln!(f, "{:indent$}}}", "", indent = indent)
        }

        fn write_action(
            f: &mut std::fmt::Formatter<'_>,
            action: &Action,
            package: &Package,
            indent: usize,
        ) -> std::fmt::Result {
            let pad = "";
            match action {
                Action::Empty => writeln!(f, "{pad:indent$}skip"),
                Action::Assume(condition) => {
                    writeln!(f, "{pad:indent$}assume {}", condition.fmt(package))
                }
                Action::Assignment { lhs, rhs } => writeln!(
                    f,
                    "{pad:indent$}{} := {}",
                    lhs.fmt(package),
                    rhs.fmt(package)
                ),
                Action::Havoc(target) => writeln!(f, "{pad:indent$}havoc {}", target.fmt(package)),
                Action::VariableDeclaration(key) => match package.declaration(*key) {
                    Ok(declaration) => writeln!(
                        f,
                        "{pad:indent$}var {}: {}",
                        declaration.name,
                        declaration.ty.fmt(package)
                    ),
                    Err(_) => writeln!(f, "{pad:indent$}var <unknown>"),
                },
                Action::Sequential(actions) => write_block(f, "seq", actions, package, indent),
                Action::Parallel(actions) => write_block(f, "par", actions, package, indent),
                Action::NonDeterministic(actions) => {
                    write_block(f, "choice", actions, package, indent)
                }
                Action::If {
                    condition,
                    then,
                    otherwise,
                } => {
                    writeln!(f, "{pad:indent$}if {} {{", condition.fmt(package))?;
                    write_action(f, then, package, indent + 2)?;
                    if let Some(otherwise) = otherwise {
                        writeln!(f, "{pad:indent$}}} else {{")?;
                        write_action(f, otherwise, package, indent + 2)?;
                    }
                    writeln!(f, "{pad:indent$}}}")
                }
                Action::Loop {
                    parameter,
                    range,
                    body,
                } => {
                    let name = package
                        .declaration(*parameter)
                        .map(|declaration| declaration.name.as_str())
                        .unwrap_or("<unknown>");
                    writeln!(f, "{pad:indent$}for {} in {} {{", name, range.fmt(package))?;
                    write_action(f, body, package, indent + 2)?;
                    writeln!(f, "{pad:indent$}}}")
                }
            }
        }

        impl<'a> std::fmt::Display for Fmt<'a> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write_action(f, self.action, self.package, 0)
            }
        }

        Fmt {
            action: self,
            package,
        }
    }
}
