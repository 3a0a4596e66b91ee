//! Free builder functions for [`Expr`].
//!
//! Logical n-ary builders collapse degenerate operand lists: an empty
//! conjunction is `true`, an empty disjunction is `false` and a single operand
//! is returned as is.
use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::{
    expr::{BinaryOp, Expr, IntegerRange, NaryOp, Quantifier, UnaryOp},
    package::{DeclKey, FunctionKey, TypeDeclKey},
};

pub fn int(value: impl Into<BigInt>) -> Expr {
    Expr::Int(value.into())
}

pub fn decimal(value: BigDecimal) -> Expr {
    Expr::Decimal(value)
}

pub fn rational(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Expr {
    Expr::Rational {
        numerator: numerator.into(),
        denominator: denominator.into(),
    }
}

pub fn reference(decl: DeclKey) -> Expr {
    Expr::Ref(decl)
}

pub fn type_reference(ty: TypeDeclKey) -> Expr {
    Expr::TypeRef(ty)
}

pub fn enum_literal(ty: TypeDeclKey, index: usize) -> Expr {
    Expr::EnumLiteral { ty, index }
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary {
        op,
        operand: Box::new(operand),
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Plain `!operand`, no simplification (see [`crate::negate::negate`]).
pub fn not(operand: Expr) -> Expr {
    unary(UnaryOp::Not, operand)
}

pub fn minus(operand: Expr) -> Expr {
    unary(UnaryOp::Minus, operand)
}

pub fn plus(operand: Expr) -> Expr {
    unary(UnaryOp::Plus, operand)
}

fn collapsing(op: NaryOp, neutral: bool, operands: impl IntoIterator<Item = Expr>) -> Expr {
    let mut operands: Vec<Expr> = operands.into_iter().collect();
    match operands.len() {
        0 => Expr::Bool(neutral),
        1 => operands.swap_remove(0),
        _ => Expr::Nary { op, operands },
    }
}

/// Conjunction of `operands`.
pub fn and(operands: impl IntoIterator<Item = Expr>) -> Expr {
    collapsing(NaryOp::And, true, operands)
}

/// Disjunction of `operands`.
pub fn or(operands: impl IntoIterator<Item = Expr>) -> Expr {
    collapsing(NaryOp::Or, false, operands)
}

/// Exclusive disjunction of `operands` (true iff an odd number holds).
pub fn xor(operands: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Nary {
        op: NaryOp::Xor,
        operands: operands.into_iter().collect(),
    }
}

pub fn add(operands: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Nary {
        op: NaryOp::Add,
        operands: operands.into_iter().collect(),
    }
}

pub fn multiply(operands: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Nary {
        op: NaryOp::Multiply,
        operands: operands.into_iter().collect(),
    }
}

pub fn subtract(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Subtract, lhs, rhs)
}

pub fn divide(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Divide, lhs, rhs)
}

pub fn modulo(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Modulo, lhs, rhs)
}

pub fn int_div(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Div, lhs, rhs)
}

pub fn less(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Less, lhs, rhs)
}

pub fn less_equal(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::LessEqual, lhs, rhs)
}

pub fn greater(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Greater, lhs, rhs)
}

pub fn greater_equal(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::GreaterEqual, lhs, rhs)
}

pub fn equal(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Equal, lhs, rhs)
}

pub fn inequal(lhs: Expr, rhs: Expr) -> Expr {
    binary(BinaryOp::Inequal, lhs, rhs)
}

pub fn imply(antecedent: Expr, consequent: Expr) -> Expr {
    binary(BinaryOp::Imply, antecedent, consequent)
}

/// Predicate `lhs op rhs` for any [`BinaryOp`].
pub fn predicate(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    binary(op, lhs, rhs)
}

pub fn ite(condition: Expr, then: Expr, otherwise: Expr) -> Expr {
    Expr::IfThenElse {
        condition: Box::new(condition),
        then: Box::new(then),
        otherwise: Box::new(otherwise),
    }
}

pub fn array_access(operand: Expr, index: Expr) -> Expr {
    Expr::ArrayAccess {
        operand: Box::new(operand),
        index: Box::new(index),
    }
}

pub fn record_access(operand: Expr, field: impl Into<String>) -> Expr {
    Expr::RecordAccess {
        operand: Box::new(operand),
        field: field.into(),
    }
}

pub fn select(operand: Expr) -> Expr {
    Expr::Select(Box::new(operand))
}

pub fn call(function: FunctionKey, arguments: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Call {
        function,
        arguments: arguments.into_iter().collect(),
    }
}

/// Inclusive integer range literal `[lower, upper]`.
pub fn range(lower: impl Into<Expr>, upper: impl Into<Expr>) -> Expr {
    Expr::Range(IntegerRange::inclusive(lower, upper))
}

pub fn forall(parameter: DeclKey, body: Expr) -> Expr {
    Expr::Quantified {
        quantifier: Quantifier::Forall,
        parameter,
        body: Box::new(body),
    }
}

pub fn exists(parameter: DeclKey, body: Expr) -> Expr {
    Expr::Quantified {
        quantifier: Quantifier::Exists,
        parameter,
        body: Box::new(body),
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Self::Output {
        not(self)
    }
}

impl std::ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Self::Output {
        and([self, rhs])
    }
}

impl std::ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Self::Output {
        or([self, rhs])
    }
}
