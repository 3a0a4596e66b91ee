//! Types module
//!
//! Canonical representation of the types of the expression language:
//!
//! - Primitive types: booleans, integers, decimals, rationals and `void`.
//! - Integer ranges, whose bounds are expressions.
//! - Arrays (element type + size expression) and records (ordered fields).
//! - Enumerations (ordered literal names).
//! - [`Type::Named`] references to a [`TypeDeclaration`](crate::package::TypeDeclaration).
//!
//! Named records and enumerations have nominal identity, every other named
//! type is an alias that is transparent for type equality (see
//! [`Package::aliasless_type`]).
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use strum::{EnumDiscriminants, EnumIs};

use crate::{
    eval::ExpressionEvaluator,
    expr::{Expr, FieldAssignment, IntegerRange},
    package::{Package, TypeDeclKey},
    utils::{Error, ExprResult},
};

pub mod hierarchy;

/// Field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldDeclaration {
    pub name: String,
    pub ty: Type,
}

/// Sum-type of every type of the language.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumDiscriminants)]
#[strum_discriminants(name(TypeKind))]
#[strum_discriminants(derive(Hash))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Type {
    Boolean,
    Integer,
    Decimal,
    Rational,
    Void,

    /// Integers restricted to a range.
    Range(IntegerRange),

    /// Fixed-size array. The size is an expression that must evaluate to an
    /// integer whenever the size is needed (default values, hierarchies).
    Array { element: Box<Type>, size: Box<Expr> },

    /// Anonymous record.
    Record(Vec<FieldDeclaration>),

    /// Anonymous enumeration.
    Enumeration(Vec<String>),

    /// Reference to a declared type.
    Named(TypeDeclKey),
}

impl Type {
    /// Array of `size` elements of type `element`.
    pub fn array(element: Type, size: usize) -> Self {
        Type::Array {
            element: Box::new(element),
            size: Box::new(Expr::from(size)),
        }
    }

    /// Rank of numeric types in the promotion order
    /// `integer < rational < decimal`; `None` for non-numeric types.
    ///
    /// Notice that named types must be resolved first.
    pub fn numeric_rank(&self) -> Option<u8> {
        match self {
            Type::Integer | Type::Range(_) => Some(0),
            Type::Rational => Some(1),
            Type::Decimal => Some(2),
            _ => None,
        }
    }

    /// Type of the given numeric rank (inverse of [`Type::numeric_rank`]).
    pub(crate) fn from_numeric_rank(rank: u8) -> Self {
        match rank {
            0 => Type::Integer,
            1 => Type::Rational,
            _ => Type::Decimal,
        }
    }

    /// Build a formatting helper rendering this type with the names of the
    /// package.
    pub fn fmt<'a>(&'a self, package: &'a Package) -> impl std::fmt::Display + 'a {
        struct Fmt<'a> {
            ty: &'a Type,
            package: &'a Package,
        }

        impl<'a> std::fmt::Display for Fmt<'a> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self.ty {
                    Type::Boolean => write!(f, "boolean"),
                    Type::Integer => write!(f, "integer"),
                    Type::Decimal => write!(f, "decimal"),
                    Type::Rational => write!(f, "rational"),
                    Type::Void => write!(f, "void"),
                    Type::Range(range) => write!(f, "integer{}", range.fmt(self.package)),
                    Type::Array { element, size } => write!(
                        f,
                        "{}[{}]",
                        element.fmt(self.package),
                        size.fmt(self.package)
                    ),
                    Type::Record(fields) => {
                        write!(f, "record {{")?;
                        for (i, field) in fields.iter().enumerate() {
                            if i > 0 {
                                write!(f, ",")?;
                            }
                            write!(f, " {}: {}", field.name, field.ty.fmt(self.package))?;
                        }
                        write!(f, " }}")
                    }
                    Type::Enumeration(literals) => write!(f, "enum {{ {} }}", literals.join(", ")),
                    Type::Named(key) => match self.package.type_declaration(*key) {
                        Ok(declaration) => write!(f, "{}", declaration.name),
                        Err(_) => write!(f, "<unknown type>"),
                    },
                }
            }
        }

        Fmt { ty: self, package }
    }
}

impl Package {
    /// Follow [`Type::Named`] references until reaching a definition.
    ///
    /// Unlike [`Package::aliasless_type`], records and enumerations are
    /// resolved as well, so the result can be inspected structurally.
    pub fn resolve_type<'s>(&'s self, mut ty: &'s Type) -> ExprResult<&'s Type> {
        while let Type::Named(key) = ty {
            ty = &self.type_declaration(*key)?.ty;
        }
        Ok(ty)
    }

    /// Strip every alias from `ty`, recursively.
    ///
    /// References to declared records and enumerations are kept as they are:
    /// those types are compared by declaration identity.
    pub fn aliasless_type(&self, ty: &Type) -> ExprResult<Type> {
        match ty {
            Type::Named(key) => {
                let declaration = self.type_declaration(*key)?;
                match &declaration.ty {
                    Type::Record(_) | Type::Enumeration(_) => Ok(ty.clone()),
                    aliased => self.aliasless_type(aliased),
                }
            }
            Type::Array { element, size } => Ok(Type::Array {
                element: Box::new(self.aliasless_type(element)?),
                size: size.clone(),
            }),
            Type::Record(fields) => Ok(Type::Record(
                fields
                    .iter()
                    .map(|field| {
                        Ok(FieldDeclaration {
                            name: field.name.clone(),
                            ty: self.aliasless_type(&field.ty)?,
                        })
                    })
                    .collect::<ExprResult<_>>()?,
            )),
            _ => Ok(ty.clone()),
        }
    }

    /// Default (initial) value of a type.
    ///
    /// - `false`, `0`, `0.0` and `0/1` for primitive types,
    /// - the smallest value of a range,
    /// - the first literal of an enumeration,
    /// - an array literal of `size` default elements,
    /// - a record literal of default fields.
    pub fn default_expression(&self, ty: &Type) -> ExprResult<Expr> {
        match ty {
            Type::Boolean => Ok(Expr::Bool(false)),
            Type::Integer => Ok(Expr::from(0)),
            Type::Decimal => Ok(Expr::Decimal(0.into())),
            Type::Rational => Ok(Expr::Rational {
                numerator: 0.into(),
                denominator: 1.into(),
            }),
            Type::Void => Err(Error::NotEvaluable {
                expression: "void".to_string(),
                reason: "the void type has no value".to_string(),
            }),
            Type::Range(range) => {
                let evaluator = ExpressionEvaluator::new(self);
                let mut lower = evaluator.evaluate_integer(&range.lower)?;
                if !range.lower_inclusive {
                    lower += 1;
                }
                Ok(Expr::Int(lower))
            }
            Type::Array { element, size } => {
                let size = ExpressionEvaluator::new(self).evaluate_size(size)?;
                let element = self.default_expression(element)?;
                Ok(Expr::Array(vec![element; size]))
            }
            Type::Record(_) => Err(Error::NotEvaluable {
                expression: ty.fmt(self).to_string(),
                reason: "record literals require a declared record type".to_string(),
            }),
            Type::Enumeration(_) => Err(Error::NotEvaluable {
                expression: ty.fmt(self).to_string(),
                reason: "enumeration literals require a declared enumeration type".to_string(),
            }),
            Type::Named(key) => {
                let declaration = self.type_declaration(*key)?;
                match &declaration.ty {
                    Type::Enumeration(literals) if !literals.is_empty() => {
                        Ok(Expr::EnumLiteral { ty: *key, index: 0 })
                    }
                    Type::Enumeration(_) => Err(Error::NotEvaluable {
                        expression: declaration.name.clone(),
                        reason: "the enumeration declares no literal".to_string(),
                    }),
                    Type::Record(fields) => Ok(Expr::Record {
                        ty: *key,
                        fields: fields
                            .iter()
                            .map(|field| {
                                Ok(FieldAssignment {
                                    field: field.name.clone(),
                                    value: self.default_expression(&field.ty)?,
                                })
                            })
                            .collect::<ExprResult<_>>()?,
                    }),
                    aliased => self.default_expression(aliased),
                }
            }
        }
    }
}
