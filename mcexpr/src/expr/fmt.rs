//! Pretty-print helpers for expressions and ranges.
//!
//! Composite expressions are fully parenthesized; names are looked up in the
//! package, stale keys print as `<unknown>`.
use std::fmt;

use crate::{
    expr::{Expr, IntegerRange},
    package::{DeclKey, Package, TypeDeclKey},
    types::Type,
};

fn declaration_name(package: &Package, key: DeclKey) -> &str {
    package
        .declaration(key)
        .map(|declaration| declaration.name.as_str())
        .unwrap_or("<unknown>")
}

fn type_name(package: &Package, key: TypeDeclKey) -> &str {
    package
        .type_declaration(key)
        .map(|declaration| declaration.name.as_str())
        .unwrap_or("<unknown>")
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    package: &Package,
    items: &[Expr],
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item.fmt(package))?;
    }
    Ok(())
}

impl IntegerRange {
    /// Build a formatting helper rendering the range as `[lower..upper)`.
    pub fn fmt<'a>(&'a self, package: &'a Package) -> impl fmt::Display + 'a {
        struct Fmt<'a> {
            range: &'a IntegerRange,
            package: &'a Package,
        }

        impl<'a> fmt::Display for Fmt<'a> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}{}..{}{}",
                    if self.range.lower_inclusive { "[" } else { "(" },
                    self.range.lower.fmt(self.package),
                    self.range.upper.fmt(self.package),
                    if self.range.upper_inclusive { "]" } else { ")" },
                )
            }
        }

        Fmt {
            range: self,
            package,
        }
    }
}

impl Expr {
    /// Build a formatting helper rendering the expression with the names of
    /// the package.
    pub fn fmt<'a>(&'a self, package: &'a Package) -> impl fmt::Display + 'a {
        struct Fmt<'a> {
            expr: &'a Expr,
            package: &'a Package,
        }

        impl<'a> fmt::Display for Fmt<'a> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let package = self.package;
                match self.expr {
                    Expr::Bool(value) => write!(f, "{}", value),
                    Expr::Int(value) => write!(f, "{}", value),
                    Expr::Decimal(value) => write!(f, "{}", value),
                    Expr::Rational {
                        numerator,
                        denominator,
                    } => write!(f, "{}/{}", numerator, denominator),
                    Expr::EnumLiteral { ty, index } => {
                        let literal = package
                            .type_declaration(*ty)
                            .ok()
                            .and_then(|declaration| match &declaration.ty {
                                Type::Enumeration(literals) => literals.get(*index),
                                _ => None,
                            });
                        match literal {
                            Some(literal) => write!(f, "{}::{}", type_name(package, *ty), literal),
                            None => write!(f, "{}::#{}", type_name(package, *ty), index),
                        }
                    }
                    Expr::Range(range) => write!(f, "{}", range.fmt(package)),
                    Expr::Array(elements) => {
                        write!(f, "[")?;
                        write_list(f, package, elements, ", ")?;
                        write!(f, "]")
                    }
                    Expr::Record { ty, fields } => {
                        write!(f, "{} {{", type_name(package, *ty))?;
                        for (i, field) in fields.iter().enumerate() {
                            if i > 0 {
                                write!(f, ",")?;
                            }
                            write!(f, " {} := {}", field.field, field.value.fmt(package))?;
                        }
                        write!(f, " }}")
                    }
                    Expr::Ref(key) => write!(f, "{}", declaration_name(package, *key)),
                    Expr::TypeRef(key) => write!(f, "{}", type_name(package, *key)),
                    Expr::ArrayAccess { operand, index } => {
                        write!(f, "{}[{}]", operand.fmt(package), index.fmt(package))
                    }
                    Expr::RecordAccess { operand, field } => {
                        write!(f, "{}.{}", operand.fmt(package), field)
                    }
                    Expr::Select(operand) => write!(f, "select({})", operand.fmt(package)),
                    Expr::Call {
                        function,
                        arguments,
                    } => {
                        let name = package
                            .function(*function)
                            .map(|function| function.name.as_str())
                            .unwrap_or("<unknown>");
                        write!(f, "{}(", name)?;
                        write_list(f, package, arguments, ", ")?;
                        write!(f, ")")
                    }
                    Expr::Unary { op, operand } => {
                        write!(f, "{}({})", op.to_str(), operand.fmt(package))
                    }
                    Expr::Binary { op, lhs, rhs } => write!(
                        f,
                        "({} {} {})",
                        lhs.fmt(package),
                        op.to_str(),
                        rhs.fmt(package)
                    ),
                    Expr::Nary { op, operands } => {
                        write!(f, "(")?;
                        write_list(f, package, operands, &format!(" {} ", op.to_str()))?;
                        write!(f, ")")
                    }
                    Expr::IfThenElse {
                        condition,
                        then,
                        otherwise,
                    } => write!(
                        f,
                        "(if {} then {} else {})",
                        condition.fmt(package),
                        then.fmt(package),
                        otherwise.fmt(package)
                    ),
                    Expr::Else => write!(f, "else"),
                    Expr::Quantified {
                        quantifier,
                        parameter,
                        body,
                    } => write!(
                        f,
                        "({} {}: {})",
                        quantifier.to_str(),
                        declaration_name(package, *parameter),
                        body.fmt(package)
                    ),
                }
            }
        }

        Fmt {
            expr: self,
            package,
        }
    }
}
