//! Expression negator
//!
//! [`negate`] builds the logical complement of a boolean expression, pushing
//! the negation one level down (De Morgan, complementary predicates, dual
//! quantifiers). [`transform_transformable_not_expressions`] applies it until
//! no `!` wraps a composite expression anymore (negation normal form).
use log::debug;

use crate::{
    expr::{BinaryOp, Expr, NaryOp, UnaryOp, func},
    utils::{Error, ExprResult},
};

fn not_negatable(expr: &Expr) -> Error {
    Error::NotNegatable {
        expression: expr.kind().to_string(),
    }
}

/// Logical complement of `expr`.
///
/// Only the outermost operator is rewritten; operands that need negating are
/// wrapped into a plain `!`. Atomic boolean expressions (references,
/// accesses, calls) are wrapped as well. Arithmetic expressions and
/// non-boolean literals cannot be negated.
pub fn negate(expr: &Expr) -> ExprResult<Expr> {
    match expr {
        Expr::Bool(value) => Ok(Expr::Bool(!value)),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => Ok(operand.as_ref().clone()),
        Expr::Nary {
            op: op @ (NaryOp::And | NaryOp::Or),
            operands,
        } => Ok(Expr::Nary {
            op: if *op == NaryOp::And {
                NaryOp::Or
            } else {
                NaryOp::And
            },
            operands: operands.iter().cloned().map(func::not).collect(),
        }),
        Expr::Nary {
            op: NaryOp::Xor,
            operands,
        } => Ok(negate_xor(operands)),
        Expr::Binary {
            op: BinaryOp::Imply,
            lhs,
            rhs,
        } => Ok(Expr::Nary {
            op: NaryOp::And,
            operands: vec![lhs.as_ref().clone(), func::not(rhs.as_ref().clone())],
        }),
        Expr::Binary { op, lhs, rhs } => match op.negated() {
            Some(negated) => Ok(func::predicate(
                negated,
                lhs.as_ref().clone(),
                rhs.as_ref().clone(),
            )),
            None => Err(not_negatable(expr)),
        },
        Expr::IfThenElse {
            condition,
            then,
            otherwise,
        } => Ok(func::ite(
            condition.as_ref().clone(),
            func::not(then.as_ref().clone()),
            func::not(otherwise.as_ref().clone()),
        )),
        Expr::Quantified {
            quantifier,
            parameter,
            body,
        } => Ok(Expr::Quantified {
            quantifier: quantifier.dual(),
            parameter: *parameter,
            body: Box::new(func::not(body.as_ref().clone())),
        }),
        Expr::Ref(_)
        | Expr::ArrayAccess { .. }
        | Expr::RecordAccess { .. }
        | Expr::Call { .. }
        | Expr::Select(_) => Ok(func::not(expr.clone())),
        Expr::Int(_)
        | Expr::Decimal(_)
        | Expr::Rational { .. }
        | Expr::EnumLiteral { .. }
        | Expr::Range(_)
        | Expr::Array(_)
        | Expr::Record { .. }
        | Expr::TypeRef(_)
        | Expr::Unary { .. }
        | Expr::Nary { .. }
        | Expr::Else => Err(not_negatable(expr)),
    }
}

/// `!(x1 xor x2 xor ... xor xn)` as `(((x1 == x2) != x3) != ...) != xn`.
fn negate_xor(operands: &[Expr]) -> Expr {
    match operands {
        [] => Expr::Bool(true),
        [single] => func::not(single.clone()),
        [first, second, rest @ ..] => rest.iter().fold(
            func::equal(first.clone(), second.clone()),
            |aggregate, operand| func::inequal(aggregate, operand.clone()),
        ),
    }
}

/// `true` if `operand` is an expression [`negate`] rewrites instead of
/// wrapping.
fn is_composite_boolean(operand: &Expr) -> bool {
    match operand {
        Expr::Bool(_)
        | Expr::IfThenElse { .. }
        | Expr::Quantified { .. }
        | Expr::Unary {
            op: UnaryOp::Not, ..
        } => true,
        Expr::Nary { op, .. } => op.is_logical(),
        Expr::Binary { op, .. } => *op == BinaryOp::Imply || op.is_predicate(),
        _ => false,
    }
}

/// `true` for a `!` wrapping an expression it can be pushed into.
pub fn is_transformable_not(expr: &Expr) -> bool {
    matches!(
        expr,
        Expr::Unary { op: UnaryOp::Not, operand } if is_composite_boolean(operand)
    )
}

/// Rewrite, in place, every transformable `!` of `root` until none remains.
/// Returns the number of rewrites.
///
/// The tree is processed top-down with an explicit worklist: a rewritten node
/// is examined again before its children are scheduled.
pub fn transform_transformable_not_expressions(root: &mut Expr) -> ExprResult<usize> {
    let mut rewrites = 0;
    let mut stack: Vec<&mut Expr> = vec![root];

    while let Some(node) = stack.pop() {
        loop {
            let rewritten = match &*node {
                Expr::Unary {
                    op: UnaryOp::Not,
                    operand,
                } if is_composite_boolean(operand) => negate(operand)?,
                _ => break,
            };
            *node = rewritten;
            rewrites += 1;
        }
        stack.extend(node.children_mut());
    }

    debug!("Negation normal form reached after {} rewrites", rewrites);
    Ok(rewrites)
}
