//! Type determinator
//!
//! Static type inference for [`Expr`]. Numeric operators promote their
//! operands along `integer < rational < decimal`; predicates and logical
//! connectives are boolean; accesses yield the element or field type.
use crate::{
    eval::ExpressionEvaluator,
    expr::{BinaryOp, Expr, NaryOp, UnaryOp},
    package::Package,
    types::Type,
    utils::{Error, ExprResult},
};

/// Computes the type of expressions of a [`Package`].
#[derive(Debug, Clone, Copy)]
pub struct TypeDeterminator<'a> {
    package: &'a Package,
}

impl<'a> TypeDeterminator<'a> {
    pub fn new(package: &'a Package) -> Self {
        Self { package }
    }

    fn mismatch(&self, expected: &str, found: &Type) -> Error {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.fmt(self.package).to_string(),
        }
    }

    /// Numeric rank of the type of `expr`, see [`Type::numeric_rank`].
    fn numeric_rank(&self, expr: &Expr) -> ExprResult<u8> {
        let ty = self.get_type(expr)?;
        self.package
            .resolve_type(&ty)?
            .numeric_rank()
            .ok_or_else(|| self.mismatch("a numeric type", &ty))
    }

    /// Promoted type of numeric operands.
    fn promoted<'e>(&self, operands: impl IntoIterator<Item = &'e Expr>) -> ExprResult<Type> {
        let mut rank = 0;
        for operand in operands {
            rank = rank.max(self.numeric_rank(operand)?);
        }
        Ok(Type::from_numeric_rank(rank))
    }

    fn expect_integer(&self, expr: &Expr) -> ExprResult<()> {
        let ty = self.get_type(expr)?;
        match self.package.resolve_type(&ty)? {
            Type::Integer | Type::Range(_) => Ok(()),
            _ => Err(self.mismatch("an integer type", &ty)),
        }
    }

    /// Type of an arbitrary element of a value of type `ty`.
    fn selected_type(&self, ty: &Type) -> ExprResult<Type> {
        if let Type::Named(key) = ty {
            let declaration = self.package.type_declaration(*key)?;
            if declaration.ty.is_enumeration() {
                return Ok(ty.clone());
            }
            return self.selected_type(&declaration.ty);
        }

        match ty {
            Type::Array { element, .. } => Ok(element.as_ref().clone()),
            Type::Range(_) => Ok(Type::Integer),
            Type::Enumeration(_) => Ok(ty.clone()),
            _ => Err(self.mismatch("an array, range or enumeration type", ty)),
        }
    }

    /// Static type of `expr`.
    pub fn get_type(&self, expr: &Expr) -> ExprResult<Type> {
        match expr {
            Expr::Bool(_) => Ok(Type::Boolean),
            Expr::Int(_) => Ok(Type::Integer),
            Expr::Decimal(_) => Ok(Type::Decimal),
            Expr::Rational { .. } => Ok(Type::Rational),
            Expr::EnumLiteral { ty, .. } | Expr::Record { ty, .. } | Expr::TypeRef(ty) => {
                Ok(Type::Named(*ty))
            }
            Expr::Range(range) => Ok(Type::Range(range.clone())),
            Expr::Array(elements) => {
                let first = elements.first().ok_or(Error::EmptyArrayLiteral)?;
                Ok(Type::array(self.get_type(first)?, elements.len()))
            }
            Expr::Ref(key) => Ok(self.package.declaration(*key)?.ty.clone()),
            Expr::ArrayAccess { operand, .. } => {
                let ty = self.get_type(operand)?;
                match self.package.resolve_type(&ty)? {
                    Type::Array { element, .. } => Ok(element.as_ref().clone()),
                    _ => Err(self.mismatch("an array type", &ty)),
                }
            }
            Expr::RecordAccess { operand, field } => {
                let ty = self.get_type(operand)?;
                match self.package.resolve_type(&ty)? {
                    Type::Record(fields) => fields
                        .iter()
                        .find(|declaration| &declaration.name == field)
                        .map(|declaration| declaration.ty.clone())
                        .ok_or_else(|| Error::UnknownField {
                            field: field.clone(),
                            ty: ty.fmt(self.package).to_string(),
                        }),
                    _ => Err(self.mismatch("a record type", &ty)),
                }
            }
            Expr::Select(operand) => {
                let ty = self.get_type(operand)?;
                self.selected_type(&ty)
            }
            Expr::Call {
                function,
                arguments,
            } => {
                let declaration = self.package.function(*function)?;
                if declaration.parameters.len() != arguments.len() {
                    return Err(Error::NotTypable {
                        expression: expr.fmt(self.package).to_string(),
                        reason: format!(
                            "`{}` expects {} arguments, found {}",
                            declaration.name,
                            declaration.parameters.len(),
                            arguments.len()
                        ),
                    });
                }
                Ok(declaration.return_type.clone())
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Not => Ok(Type::Boolean),
                UnaryOp::Minus | UnaryOp::Plus => {
                    Ok(Type::from_numeric_rank(self.numeric_rank(operand)?))
                }
            },
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::Subtract | BinaryOp::Divide => self.promoted([lhs.as_ref(), rhs.as_ref()]),
                BinaryOp::Modulo | BinaryOp::Div => {
                    self.expect_integer(lhs)?;
                    self.expect_integer(rhs)?;
                    Ok(Type::Integer)
                }
                BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
                | BinaryOp::Equal
                | BinaryOp::Inequal
                | BinaryOp::Imply => Ok(Type::Boolean),
            },
            Expr::Nary { op, operands } => match op {
                NaryOp::Add | NaryOp::Multiply => self.promoted(operands),
                NaryOp::And | NaryOp::Or | NaryOp::Xor => Ok(Type::Boolean),
            },
            Expr::IfThenElse {
                then, otherwise, ..
            } => {
                let then_type = self.get_type(then)?;
                let else_type = self.get_type(otherwise)?;
                if !self.equals(&then_type, &else_type) {
                    return Err(Error::BranchTypeMismatch {
                        then_type: then_type.fmt(self.package).to_string(),
                        else_type: else_type.fmt(self.package).to_string(),
                    });
                }
                Ok(then_type)
            }
            Expr::Else | Expr::Quantified { .. } => Ok(Type::Boolean),
        }
    }

    /// Type equality: aliases are transparent, declared records and
    /// enumerations compare by identity, array sizes compare by value when
    /// both evaluate and structurally otherwise.
    pub fn equals(&self, a: &Type, b: &Type) -> bool {
        match (
            self.package.aliasless_type(a),
            self.package.aliasless_type(b),
        ) {
            (Ok(a), Ok(b)) => self.equals_aliasless(&a, &b),
            _ => false,
        }
    }

    fn equals_aliasless(&self, a: &Type, b: &Type) -> bool {
        match (a, b) {
            (
                Type::Array {
                    element: a_element,
                    size: a_size,
                },
                Type::Array {
                    element: b_element,
                    size: b_size,
                },
            ) => {
                if !self.equals_aliasless(a_element, b_element) {
                    return false;
                }
                if a_size == b_size {
                    return true;
                }
                let evaluator = ExpressionEvaluator::new(self.package);
                matches!(
                    (evaluator.evaluate_integer(a_size), evaluator.evaluate_integer(b_size)),
                    (Ok(a), Ok(b)) if a == b
                )
            }
            (Type::Record(a_fields), Type::Record(b_fields)) => {
                a_fields.len() == b_fields.len()
                    && a_fields.iter().zip(b_fields).all(|(a, b)| {
                        a.name == b.name && self.equals_aliasless(&a.ty, &b.ty)
                    })
            }
            _ => a == b,
        }
    }

    fn resolved_type_of(&self, expr: &Expr) -> Option<Type> {
        let ty = self.get_type(expr).ok()?;
        self.package.resolve_type(&ty).ok().cloned()
    }

    /// `true` for integer, range, rational and decimal typed expressions.
    pub fn is_number(&self, expr: &Expr) -> bool {
        self.resolved_type_of(expr)
            .is_some_and(|ty| ty.numeric_rank().is_some())
    }

    pub fn is_boolean(&self, expr: &Expr) -> bool {
        self.resolved_type_of(expr).is_some_and(|ty| ty.is_boolean())
    }

    /// `true` for integer and range typed expressions.
    pub fn is_integer(&self, expr: &Expr) -> bool {
        self.resolved_type_of(expr)
            .is_some_and(|ty| matches!(ty, Type::Integer | Type::Range(_)))
    }

    pub fn is_enumeration(&self, expr: &Expr) -> bool {
        self.resolved_type_of(expr)
            .is_some_and(|ty| ty.is_enumeration())
    }

    /// `true` for decimal and rational typed expressions.
    pub fn is_fractional(&self, expr: &Expr) -> bool {
        self.resolved_type_of(expr)
            .is_some_and(|ty| matches!(ty, Type::Decimal | Type::Rational))
    }
}
