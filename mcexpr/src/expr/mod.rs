//! Expression tree
//!
//! [`Expr`] is a closed sum-type covering literals, references, operators,
//! conditionals and quantifiers. Children are owned (`Box`/`Vec`), hence each
//! node has exactly one parent; reusing a subtree at another location always
//! goes through `clone()`.
//!
//! Structural (syntactic) equality is the derived [`PartialEq`]: two
//! expressions are equal when they have the same shape, operators, literals and
//! referenced keys, independently of any evaluated value.
//!
//! Generic traversal is provided by [`Expr::children`], [`Expr::children_mut`]
//! and [`Expr::descendants`]; query-by-kind is `descendants().filter(..)` over
//! [`Expr::kind`].
use std::collections::{BTreeMap, BTreeSet};

use auto_enums::auto_enum;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs, EnumIter, EnumTryAs, IntoEnumIterator};

use crate::package::{DeclKey, FunctionKey, TypeDeclKey};

pub mod fmt;
pub mod func;

/// Unary operators.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    Not,
    Minus,
    Plus,
}

impl UnaryOp {
    /// Creates an [`UnaryOp`] from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        UnaryOp::iter().find(|op| op.to_str() == s)
    }

    /// Returns the string representation of the [`UnaryOp`].
    pub fn to_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinaryOp {
    /// Arithmetic subtraction
    Subtract,
    /// Division (truncating for integers)
    Divide,
    /// Integer remainder
    Modulo,
    /// Integer division
    Div,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    Inequal,
    /// Logical implication
    Imply,
}

impl BinaryOp {
    /// Creates a [`BinaryOp`] from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        BinaryOp::iter().find(|op| op.to_str() == s)
    }

    /// Returns the string representation of the [`BinaryOp`].
    pub fn to_str(&self) -> &'static str {
        match self {
            BinaryOp::Subtract => "-",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "mod",
            BinaryOp::Div => "div",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::Equal => "==",
            BinaryOp::Inequal => "!=",
            BinaryOp::Imply => "imply",
        }
    }

    /// Returns `true` for `<`, `<=`, `>` and `>=`.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual
        )
    }

    /// Returns `true` for ordering comparisons, equality and inequality.
    pub fn is_predicate(&self) -> bool {
        self.is_ordering() || matches!(self, BinaryOp::Equal | BinaryOp::Inequal)
    }

    /// Returns `true` for arithmetic operators.
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Subtract | BinaryOp::Divide | BinaryOp::Modulo | BinaryOp::Div
        )
    }

    /// Complementary predicate: `a op b` is equivalent to `!(a op.negated() b)`.
    pub fn negated(&self) -> Option<Self> {
        match self {
            BinaryOp::Equal => Some(BinaryOp::Inequal),
            BinaryOp::Inequal => Some(BinaryOp::Equal),
            BinaryOp::Greater => Some(BinaryOp::LessEqual),
            BinaryOp::GreaterEqual => Some(BinaryOp::Less),
            BinaryOp::Less => Some(BinaryOp::GreaterEqual),
            BinaryOp::LessEqual => Some(BinaryOp::Greater),
            _ => None,
        }
    }

    /// Predicate obtained by swapping the operands: `a op b` is equivalent to
    /// `b op.flipped() a`.
    pub fn flipped(&self) -> Option<Self> {
        match self {
            BinaryOp::Less => Some(BinaryOp::Greater),
            BinaryOp::LessEqual => Some(BinaryOp::GreaterEqual),
            BinaryOp::Greater => Some(BinaryOp::Less),
            BinaryOp::GreaterEqual => Some(BinaryOp::LessEqual),
            BinaryOp::Equal => Some(BinaryOp::Equal),
            BinaryOp::Inequal => Some(BinaryOp::Inequal),
            _ => None,
        }
    }
}

/// Operators taking any number of operands.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NaryOp {
    And,
    Or,
    Xor,
    Add,
    Multiply,
}

impl NaryOp {
    /// Creates a [`NaryOp`] from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        NaryOp::iter().find(|op| op.to_str() == s)
    }

    /// Returns the string representation of the [`NaryOp`].
    pub fn to_str(&self) -> &'static str {
        match self {
            NaryOp::And => "&&",
            NaryOp::Or => "||",
            NaryOp::Xor => "xor",
            NaryOp::Add => "+",
            NaryOp::Multiply => "*",
        }
    }

    /// Returns `true` for `and`, `or` and `xor`.
    pub fn is_logical(&self) -> bool {
        matches!(self, NaryOp::And | NaryOp::Or | NaryOp::Xor)
    }
}

/// Quantifier of a [`Expr::Quantified`] expression.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quantifier {
    Forall,
    Exists,
}

impl Quantifier {
    /// The other quantifier (`forall` <-> `exists`).
    pub fn dual(&self) -> Self {
        match self {
            Quantifier::Forall => Quantifier::Exists,
            Quantifier::Exists => Quantifier::Forall,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            Quantifier::Forall => "forall",
            Quantifier::Exists => "exists",
        }
    }
}

/// Integer interval `lower .. upper` with configurable bound inclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntegerRange {
    pub lower: Box<Expr>,
    pub upper: Box<Expr>,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl IntegerRange {
    /// `[lower, upper]`
    pub fn inclusive(lower: impl Into<Expr>, upper: impl Into<Expr>) -> Self {
        Self {
            lower: Box::new(lower.into()),
            upper: Box::new(upper.into()),
            lower_inclusive: true,
            upper_inclusive: true,
        }
    }

    /// `[lower, upper)`
    pub fn half_open(lower: impl Into<Expr>, upper: impl Into<Expr>) -> Self {
        Self {
            lower: Box::new(lower.into()),
            upper: Box::new(upper.into()),
            lower_inclusive: true,
            upper_inclusive: false,
        }
    }
}

/// `field := value` entry of a record literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldAssignment {
    pub field: String,
    pub value: Expr,
}

/// Discriminated union of every expression of the language.
///
/// The generated [`ExprKind`] discriminant (via `strum`) is handy for
/// query-by-kind traversals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, EnumDiscriminants)]
#[strum_discriminants(name(ExprKind))]
#[strum_discriminants(derive(Hash, EnumIter, strum::Display))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    // Literals
    Bool(bool),
    Int(BigInt),
    Decimal(BigDecimal),
    Rational {
        numerator: BigInt,
        denominator: BigInt,
    },
    /// `index`-th literal of the enumeration declared by `ty`.
    EnumLiteral {
        ty: TypeDeclKey,
        index: usize,
    },
    Range(IntegerRange),
    Array(Vec<Expr>),
    Record {
        ty: TypeDeclKey,
        fields: Vec<FieldAssignment>,
    },

    // References
    /// Direct reference to a variable, constant or parameter.
    Ref(DeclKey),
    /// Reference to a declared type (operand of `select`).
    TypeRef(TypeDeclKey),
    ArrayAccess {
        operand: Box<Expr>,
        index: Box<Expr>,
    },
    RecordAccess {
        operand: Box<Expr>,
        field: String,
    },
    /// Arbitrary element of an array, a range or an enumeration.
    Select(Box<Expr>),
    /// Function application.
    Call {
        function: FunctionKey,
        arguments: Vec<Expr>,
    },

    // Operators
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Nary {
        op: NaryOp,
        operands: Vec<Expr>,
    },

    IfThenElse {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// `else` guard marker: holds when no other guard of the same choice holds.
    Else,

    Quantified {
        quantifier: Quantifier,
        parameter: DeclKey,
        body: Box<Expr>,
    },
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::Int(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Int(value.into())
    }
}

impl From<usize> for Expr {
    fn from(value: usize) -> Self {
        Expr::Int(value.into())
    }
}

impl From<BigInt> for Expr {
    fn from(value: BigInt) -> Self {
        Expr::Int(value)
    }
}

impl From<BigDecimal> for Expr {
    fn from(value: BigDecimal) -> Self {
        Expr::Decimal(value)
    }
}

impl From<IntegerRange> for Expr {
    fn from(value: IntegerRange) -> Self {
        Expr::Range(value)
    }
}

impl Expr {
    /// Discriminant of this expression.
    pub fn kind(&self) -> ExprKind {
        self.into()
    }

    /// Returns `true` for literal values (including array and record literals).
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expr::Bool(_)
                | Expr::Int(_)
                | Expr::Decimal(_)
                | Expr::Rational { .. }
                | Expr::EnumLiteral { .. }
                | Expr::Range(_)
                | Expr::Array(_)
                | Expr::Record { .. }
        )
    }

    /// Returns `true` for expressions designating a storage location or a
    /// value through a declaration: direct references, array and record
    /// accesses, and function accesses.
    pub fn is_reference_expression(&self) -> bool {
        matches!(
            self,
            Expr::Ref(_) | Expr::ArrayAccess { .. } | Expr::RecordAccess { .. } | Expr::Call { .. }
        )
    }

    /// Returns `true` if this is a direct reference to `decl`.
    pub fn is_reference_to(&self, decl: DeclKey) -> bool {
        matches!(self, Expr::Ref(key) if *key == decl)
    }

    /// Iterate over the direct children of this expression.
    #[auto_enum(Iterator)]
    pub fn children(&self) -> impl Iterator<Item = &Expr> {
        match self {
            Expr::Bool(_)
            | Expr::Int(_)
            | Expr::Decimal(_)
            | Expr::Rational { .. }
            | Expr::EnumLiteral { .. }
            | Expr::Ref(_)
            | Expr::TypeRef(_)
            | Expr::Else => std::iter::empty(),
            Expr::Range(range) => [range.lower.as_ref(), range.upper.as_ref()].into_iter(),
            Expr::Array(elements) => elements.iter(),
            Expr::Record { fields, .. } => fields.iter().map(|field| &field.value),
            Expr::ArrayAccess { operand, index } => [operand.as_ref(), index.as_ref()].into_iter(),
            Expr::RecordAccess { operand, .. }
            | Expr::Select(operand)
            | Expr::Unary { operand, .. }
            | Expr::Quantified { body: operand, .. } => std::iter::once(operand.as_ref()),
            Expr::Call { arguments, .. } => arguments.iter(),
            Expr::Binary { lhs, rhs, .. } => [lhs.as_ref(), rhs.as_ref()].into_iter(),
            Expr::Nary { operands, .. } => operands.iter(),
            Expr::IfThenElse {
                condition,
                then,
                otherwise,
            } => [condition.as_ref(), then.as_ref(), otherwise.as_ref()].into_iter(),
        }
    }

    /// Mutably iterate over the direct children of this expression.
    #[auto_enum(Iterator)]
    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Expr> {
        match self {
            Expr::Bool(_)
            | Expr::Int(_)
            | Expr::Decimal(_)
            | Expr::Rational { .. }
            | Expr::EnumLiteral { .. }
            | Expr::Ref(_)
            | Expr::TypeRef(_)
            | Expr::Else => std::iter::empty(),
            Expr::Range(range) => [range.lower.as_mut(), range.upper.as_mut()].into_iter(),
            Expr::Array(elements) => elements.iter_mut(),
            Expr::Record { fields, .. } => fields.iter_mut().map(|field| &mut field.value),
            Expr::ArrayAccess { operand, index } => [operand.as_mut(), index.as_mut()].into_iter(),
            Expr::RecordAccess { operand, .. }
            | Expr::Select(operand)
            | Expr::Unary { operand, .. }
            | Expr::Quantified { body: operand, .. } => std::iter::once(operand.as_mut()),
            Expr::Call { arguments, .. } => arguments.iter_mut(),
            Expr::Binary { lhs, rhs, .. } => [lhs.as_mut(), rhs.as_mut()].into_iter(),
            Expr::Nary { operands, .. } => operands.iter_mut(),
            Expr::IfThenElse {
                condition,
                then,
                otherwise,
            } => [condition.as_mut(), then.as_mut(), otherwise.as_mut()].into_iter(),
        }
    }

    /// Pre-order iterator over this expression and all its descendants.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Apply `f` to this expression and then, pre-order, to every descendant.
    ///
    /// Children are taken after `f` ran on their parent, so a rewritten node
    /// has its new children visited.
    pub fn walk_mut(&mut self, mut f: impl FnMut(&mut Expr)) {
        let mut stack: Vec<&mut Expr> = vec![self];
        while let Some(node) = stack.pop() {
            f(node);
            stack.extend(node.children_mut());
        }
    }

    /// Replace every direct reference to a key of `replacements` by a clone of
    /// the associated expression. Replacement happens simultaneously: inserted
    /// expressions are not visited again. Returns the number of replaced nodes.
    pub fn substitute_all(&mut self, replacements: &BTreeMap<DeclKey, Expr>) -> usize {
        if replacements.is_empty() {
            return 0;
        }

        let mut count = 0;
        let mut stack: Vec<&mut Expr> = vec![self];
        while let Some(node) = stack.pop() {
            if let Expr::Ref(key) = *node {
                if let Some(replacement) = replacements.get(&key) {
                    *node = replacement.clone();
                    count += 1;
                }
                continue;
            }
            stack.extend(node.children_mut());
        }
        count
    }

    /// Replace every direct reference to `decl` by a clone of `replacement`.
    pub fn substitute(&mut self, decl: DeclKey, replacement: &Expr) -> usize {
        self.substitute_all(&BTreeMap::from([(decl, replacement.clone())]))
    }

    /// Returns `true` if `decl` is directly referenced somewhere in this expression.
    pub fn contains_reference(&self, decl: DeclKey) -> bool {
        self.descendants().any(|node| node.is_reference_to(decl))
    }

    /// Every declaration directly referenced by this expression.
    pub fn referenced_declarations(&self) -> BTreeSet<DeclKey> {
        self.descendants()
            .filter_map(|node| match node {
                Expr::Ref(key) => Some(*key),
                _ => None,
            })
            .collect()
    }
}

/// Iterator returned by [`Expr::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a Expr>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(node.children());
        self.stack[start..].reverse();
        Some(node)
    }
}
