//! Expression evaluator
//!
//! [`ExpressionEvaluator`] computes the concrete value of an expression when
//! one exists. Evaluation never guesses: an expression depending on a state
//! variable, on an unbound parameter or on anything else without a static
//! value yields an [`Error`] of the [`Evaluation`](crate::utils::ErrorCategory::Evaluation)
//! family.
//!
//! Numbers are evaluated in one of two parallel domains sharing a single
//! implementation: the integer domain ([`BigInt`], decimals and rationals are
//! truncated toward zero) and the decimal domain ([`BigDecimal`]).
//!
//! A handful of structural shortcuts make some expressions evaluable even when
//! their operands are not:
//!
//! - `x * 0` is `0` and `0 / x` is `0`,
//! - `x - x` is `0` and `a + (-a)` cancels out,
//! - `x < x` and `x > x` are false, `x <= x` and `x >= x` are true,
//! - a conjunction containing `r == A` and `r == B` with provably different
//!   `A` and `B` is false (and dually for disjunctions of inequalities).
use std::{
    collections::BTreeMap,
    ops::{Add, Mul, Neg, Sub},
};

use auto_enums::auto_enum;
use bigdecimal::BigDecimal;
use log::{debug, trace, warn};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    expr::{BinaryOp, Expr, IntegerRange, NaryOp, Quantifier, UnaryOp},
    package::{
        ComponentKey, Declaration, DeclarationKind, DeclKey, FunctionKey, Package, ParameterOwner,
    },
    types::Type,
    typing::TypeDeterminator,
    utils::{Error, ExprResult},
};

/// How a component parameter bound by several instances is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParameterBindingPolicy {
    /// Use the argument of the first instance (a warning is logged when
    /// other instances bind the parameter as well).
    #[default]
    FirstMatch,
    /// Fail with [`Error::AmbiguousParameterBinding`] unless exactly one
    /// instance binds the parameter.
    RequireUnique,
}

/// Options of an [`ExpressionEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvaluatorOptions {
    /// Maximum nesting of function inlining and of reference resolution.
    pub max_inline_depth: usize,
    pub parameter_binding: ParameterBindingPolicy,
    /// Largest number of values a quantifier is evaluated over before giving
    /// up with [`Error::NotEvaluable`].
    pub max_quantifier_domain: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            max_inline_depth: 64,
            parameter_binding: ParameterBindingPolicy::FirstMatch,
            max_quantifier_domain: 1 << 20,
        }
    }
}

/// Explicit values of declarations (usually parameters), consulted before any
/// other resolution mechanism.
pub type Bindings = BTreeMap<DeclKey, Expr>;

/// Arithmetic shared by the integer and decimal evaluation domains.
trait NumericDomain {
    type Value: Clone
        + PartialEq
        + Zero
        + One
        + Add<Output = Self::Value>
        + Sub<Output = Self::Value>
        + Mul<Output = Self::Value>
        + Neg<Output = Self::Value>;

    fn from_integer(value: BigInt) -> Self::Value;

    fn from_decimal(value: &BigDecimal) -> Self::Value;

    /// `denominator` is non-zero.
    fn from_rational(numerator: &BigInt, denominator: &BigInt) -> Self::Value;

    /// `denominator` is non-zero.
    fn divide(numerator: Self::Value, denominator: Self::Value) -> Self::Value;
}

struct IntegerDomain;

impl NumericDomain for IntegerDomain {
    type Value = BigInt;

    fn from_integer(value: BigInt) -> BigInt {
        value
    }

    fn from_decimal(value: &BigDecimal) -> BigInt {
        let (digits, _) = value.with_scale(0).into_bigint_and_exponent();
        digits
    }

    fn from_rational(numerator: &BigInt, denominator: &BigInt) -> BigInt {
        numerator / denominator
    }

    fn divide(numerator: BigInt, denominator: BigInt) -> BigInt {
        numerator / denominator
    }
}

struct DecimalDomain;

impl NumericDomain for DecimalDomain {
    type Value = BigDecimal;

    fn from_integer(value: BigInt) -> BigDecimal {
        BigDecimal::new(value, 0)
    }

    fn from_decimal(value: &BigDecimal) -> BigDecimal {
        value.clone()
    }

    fn from_rational(numerator: &BigInt, denominator: &BigInt) -> BigDecimal {
        BigDecimal::new(numerator.clone(), 0) / BigDecimal::new(denominator.clone(), 0)
    }

    fn divide(numerator: BigDecimal, denominator: BigDecimal) -> BigDecimal {
        numerator / denominator
    }
}

/// Evaluates expressions of a [`Package`].
#[derive(Debug, Clone, Copy)]
pub struct ExpressionEvaluator<'a> {
    package: &'a Package,
    bindings: Option<&'a Bindings>,
    options: EvaluatorOptions,
    depth: usize,
}

impl<'a> ExpressionEvaluator<'a> {
    pub fn new(package: &'a Package) -> Self {
        Self {
            package,
            bindings: None,
            options: EvaluatorOptions::default(),
            depth: 0,
        }
    }

    /// Resolve the declarations of `bindings` to the associated expressions
    /// before looking at their declarations.
    pub fn with_bindings(mut self, bindings: &'a Bindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn with_options(mut self, options: EvaluatorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn package(&self) -> &'a Package {
        self.package
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    fn not_evaluable(&self, expr: &Expr, reason: impl Into<String>) -> Error {
        Error::NotEvaluable {
            expression: expr.fmt(self.package).to_string(),
            reason: reason.into(),
        }
    }

    fn division_by_zero(&self, expr: &Expr) -> Error {
        Error::DivisionByZero {
            expression: expr.fmt(self.package).to_string(),
        }
    }

    fn through_reference(&self, declaration: &Declaration) -> ExprResult<Self> {
        if self.depth >= self.options.max_inline_depth {
            return Err(Error::ResolutionDepthExceeded {
                declaration: declaration.name.clone(),
                max: self.options.max_inline_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    fn through_call(&self, function: FunctionKey) -> ExprResult<Self> {
        if self.depth >= self.options.max_inline_depth {
            return Err(Error::InlineDepthExceeded {
                function: self.package.function(function)?.name.clone(),
                max: self.options.max_inline_depth,
            });
        }
        Ok(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Expression standing for the value of `key`.
    ///
    /// Explicit bindings come first, then the value of constants, then the
    /// argument of the component instance binding a component parameter.
    pub fn resolve_reference(&self, key: DeclKey) -> ExprResult<&'a Expr> {
        if let Some(bound) = self.bindings.and_then(|bindings| bindings.get(&key)) {
            return Ok(bound);
        }

        let declaration = self.package.declaration(key)?;
        match declaration.kind {
            DeclarationKind::Constant => {
                declaration
                    .initial
                    .as_ref()
                    .ok_or_else(|| Error::MissingInitialValue {
                        declaration: declaration.name.clone(),
                    })
            }
            DeclarationKind::Parameter(ParameterOwner::Component { component, index }) => {
                self.bind_component_parameter(declaration, component, index)
            }
            DeclarationKind::Parameter(ParameterOwner::Function { .. }) => {
                Err(Error::NotEvaluable {
                    expression: declaration.name.clone(),
                    reason: "function parameters only have a value inside an inlined call"
                        .to_string(),
                })
            }
            DeclarationKind::Parameter(ParameterOwner::Local) => Err(Error::NotEvaluable {
                expression: declaration.name.clone(),
                reason: "the iteration parameter is not bound".to_string(),
            }),
            DeclarationKind::Variable => Err(Error::NotEvaluable {
                expression: declaration.name.clone(),
                reason: "state variables have no static value".to_string(),
            }),
        }
    }

    /// Scan the instances of `component` for the argument binding its
    /// `index`-th parameter.
    fn bind_component_parameter(
        &self,
        declaration: &Declaration,
        component: ComponentKey,
        index: usize,
    ) -> ExprResult<&'a Expr> {
        let unbound = || Error::UnboundParameter {
            parameter: declaration.name.clone(),
            index,
        };

        let mut instances = self.package.instances_of(component);
        let instance = instances.next().ok_or_else(unbound)?;
        let argument = instance.arguments.get(index).ok_or_else(unbound)?;

        let others = instances.count();
        if others > 0 {
            match self.options.parameter_binding {
                ParameterBindingPolicy::FirstMatch => warn!(
                    "Parameter `{}` is bound by {} instances, using the argument of `{}`",
                    declaration.name,
                    others + 1,
                    instance.name
                ),
                ParameterBindingPolicy::RequireUnique => {
                    return Err(Error::AmbiguousParameterBinding {
                        parameter: declaration.name.clone(),
                        count: others + 1,
                    });
                }
            }
        }

        debug!(
            "Parameter `{}` bound to `{}` by instance `{}`",
            declaration.name,
            argument.fmt(self.package),
            instance.name
        );
        Ok(argument)
    }

    /// Follow references and accesses over literals until reaching an
    /// expression that is neither. Returns that expression together with the
    /// evaluator to continue with (its depth accounts for the references
    /// crossed on the way).
    fn literal<'r>(self, expr: &'r Expr) -> ExprResult<(Self, &'r Expr)>
    where
        'a: 'r,
    {
        match expr {
            Expr::Ref(key) => {
                let value = self.resolve_reference(*key)?;
                let declaration = self.package.declaration(*key)?;
                self.through_reference(declaration)?.literal(value)
            }
            Expr::ArrayAccess { operand, index } => {
                let (inner, aggregate) = self.literal(operand)?;
                let Expr::Array(elements) = aggregate else {
                    return Err(self.not_evaluable(expr, "the accessed value is not an array literal"));
                };
                let position = self.evaluate_integer(index)?;
                let element = position
                    .to_usize()
                    .and_then(|position| elements.get(position))
                    .ok_or_else(|| Error::IndexOutOfBounds {
                        index: position.to_string(),
                        len: elements.len(),
                    })?;
                inner.literal(element)
            }
            Expr::RecordAccess { operand, field } => {
                let (inner, aggregate) = self.literal(operand)?;
                let Expr::Record { ty, fields } = aggregate else {
                    return Err(self.not_evaluable(expr, "the accessed value is not a record literal"));
                };
                let assignment = fields
                    .iter()
                    .find(|assignment| &assignment.field == field)
                    .ok_or_else(|| Error::UnknownField {
                        field: field.clone(),
                        ty: self
                            .package
                            .type_declaration(*ty)
                            .map(|declaration| declaration.name.clone())
                            .unwrap_or_default(),
                    })?;
                inner.literal(&assignment.value)
            }
            _ => Ok((self, expr)),
        }
    }

    /// Inline a call to `function`: clone the body and substitute every
    /// parameter by a clone of the matching argument. A body made of a single
    /// parameter reference collapses to the argument itself.
    pub fn inline_call(&self, function: FunctionKey, arguments: &[Expr]) -> ExprResult<Expr> {
        let declaration = self.package.function(function)?;
        if declaration.parameters.len() != arguments.len() {
            return Err(Error::NotEvaluable {
                expression: declaration.name.clone(),
                reason: format!(
                    "expected {} arguments, found {}",
                    declaration.parameters.len(),
                    arguments.len()
                ),
            });
        }

        if let Expr::Ref(key) = &declaration.body {
            if let Some(position) = declaration.parameters.iter().position(|p| p == key) {
                return Ok(arguments[position].clone());
            }
        }

        let replacements: BTreeMap<DeclKey, Expr> = declaration
            .parameters
            .iter()
            .copied()
            .zip(arguments.iter().cloned())
            .collect();
        let mut body = declaration.body.clone();
        body.substitute_all(&replacements);
        trace!("Inlined call to `{}`: {}", declaration.name, body.fmt(self.package));
        Ok(body)
    }

    fn numeric<D: NumericDomain>(&self, expr: &Expr) -> ExprResult<D::Value> {
        match expr {
            Expr::Int(value) => Ok(D::from_integer(value.clone())),
            Expr::Decimal(value) => Ok(D::from_decimal(value)),
            Expr::Rational {
                numerator,
                denominator,
            } => {
                if denominator.is_zero() {
                    return Err(self.division_by_zero(expr));
                }
                Ok(D::from_rational(numerator, denominator))
            }
            Expr::EnumLiteral { index, .. } => Ok(D::from_integer(BigInt::from(*index))),
            Expr::Ref(_) | Expr::ArrayAccess { .. } | Expr::RecordAccess { .. } => {
                let (evaluator, value) = self.literal(expr)?;
                evaluator.numeric::<D>(value)
            }
            Expr::Call {
                function,
                arguments,
            } => {
                let inlined = self.inline_call(*function, arguments)?;
                self.through_call(*function)?.numeric::<D>(&inlined)
            }
            Expr::Unary { op, operand } => match op {
                UnaryOp::Minus => Ok(-self.numeric::<D>(operand)?),
                UnaryOp::Plus => self.numeric::<D>(operand),
                UnaryOp::Not => Err(self.not_evaluable(expr, "a negation has no numeric value")),
            },
            Expr::Binary { op, lhs, rhs } => match op {
                BinaryOp::Subtract => {
                    if lhs == rhs {
                        return Ok(D::Value::zero());
                    }
                    Ok(self.numeric::<D>(lhs)? - self.numeric::<D>(rhs)?)
                }
                BinaryOp::Divide => {
                    let numerator = self.numeric::<D>(lhs)?;
                    if numerator.is_zero() {
                        return Ok(numerator);
                    }
                    let denominator = self.numeric::<D>(rhs)?;
                    if denominator.is_zero() {
                        return Err(self.division_by_zero(expr));
                    }
                    Ok(D::divide(numerator, denominator))
                }
                BinaryOp::Modulo | BinaryOp::Div => {
                    let numerator = self.evaluate_integer(lhs)?;
                    let denominator = self.evaluate_integer(rhs)?;
                    if denominator.is_zero() {
                        return Err(self.division_by_zero(expr));
                    }
                    Ok(D::from_integer(if *op == BinaryOp::Modulo {
                        numerator % denominator
                    } else {
                        numerator / denominator
                    }))
                }
                _ => Err(self.not_evaluable(expr, "a predicate has no numeric value")),
            },
            Expr::Nary { op, operands } => match op {
                NaryOp::Add => {
                    let remaining = cancel_opposites(operands);
                    remaining
                        .into_iter()
                        .try_fold(D::Value::zero(), |sum, operand| {
                            self.numeric::<D>(operand).map(|value| sum + value)
                        })
                }
                NaryOp::Multiply => {
                    let mut product = D::Value::one();
                    let mut failure = None;
                    for operand in operands {
                        match self.numeric::<D>(operand) {
                            Ok(value) if value.is_zero() => return Ok(value),
                            Ok(value) => product = product * value,
                            Err(err) => {
                                failure.get_or_insert(err);
                            }
                        }
                    }
                    match failure {
                        Some(err) => Err(err),
                        None => Ok(product),
                    }
                }
                NaryOp::And | NaryOp::Or | NaryOp::Xor => {
                    Err(self.not_evaluable(expr, "a logical expression has no numeric value"))
                }
            },
            Expr::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                if self.evaluate_boolean(condition)? {
                    self.numeric::<D>(then)
                } else {
                    self.numeric::<D>(otherwise)
                }
            }
            Expr::Bool(_) => Err(self.not_evaluable(expr, "a boolean has no numeric value")),
            Expr::Range(_)
            | Expr::Array(_)
            | Expr::Record { .. }
            | Expr::TypeRef(_)
            | Expr::Select(_)
            | Expr::Else
            | Expr::Quantified { .. } => {
                Err(self.not_evaluable(expr, "the expression has no numeric value"))
            }
        }
    }

    /// Integer value of `expr`, or its boolean value coerced to `1`/`0`.
    pub fn evaluate(&self, expr: &Expr) -> ExprResult<BigInt> {
        let integer_err = match self.evaluate_integer(expr) {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        match self.evaluate_boolean(expr) {
            Ok(value) => Ok(if value { BigInt::one() } else { BigInt::zero() }),
            Err(boolean_err) => {
                if TypeDeterminator::new(self.package).is_boolean(expr) {
                    Err(boolean_err)
                } else {
                    Err(integer_err)
                }
            }
        }
    }

    /// Value of `expr` in the integer domain.
    pub fn evaluate_integer(&self, expr: &Expr) -> ExprResult<BigInt> {
        self.numeric::<IntegerDomain>(expr)
    }

    /// Value of `expr` in the decimal domain.
    pub fn evaluate_decimal(&self, expr: &Expr) -> ExprResult<BigDecimal> {
        self.numeric::<DecimalDomain>(expr)
    }

    /// Non-negative integer value of `expr` (array sizes, indexes).
    pub fn evaluate_size(&self, expr: &Expr) -> ExprResult<usize> {
        let value = self.evaluate_integer(expr)?;
        value
            .to_usize()
            .ok_or_else(|| self.not_evaluable(expr, format!("{} is not a valid size", value)))
    }

    /// Smallest and largest integers of `range` (the range is empty when the
    /// first exceeds the second).
    pub fn evaluate_range_bounds(&self, range: &IntegerRange) -> ExprResult<(BigInt, BigInt)> {
        let mut lower = self.evaluate_integer(&range.lower)?;
        if !range.lower_inclusive {
            lower += 1;
        }
        let mut upper = self.evaluate_integer(&range.upper)?;
        if !range.upper_inclusive {
            upper -= 1;
        }
        Ok((lower, upper))
    }

    /// Every integer of `range`, in ascending order.
    pub fn evaluate_range(&self, range: &IntegerRange) -> ExprResult<Vec<BigInt>> {
        let (mut lower, upper) = self.evaluate_range_bounds(range)?;
        let mut values = Vec::new();
        while lower <= upper {
            values.push(lower.clone());
            lower += 1;
        }
        Ok(values)
    }

    /// `true` only if `expr` evaluates to true; failures count as `false`.
    pub fn is_definitely_true_expression(&self, expr: &Expr) -> bool {
        matches!(self.evaluate_boolean(expr), Ok(true))
    }

    /// `true` only if `expr` evaluates to false; failures count as `false`.
    pub fn is_definitely_false_expression(&self, expr: &Expr) -> bool {
        matches!(self.evaluate_boolean(expr), Ok(false))
    }

    /// Boolean value of `expr`.
    pub fn evaluate_boolean(&self, expr: &Expr) -> ExprResult<bool> {
        match expr {
            Expr::Bool(value) => Ok(*value),
            Expr::Ref(_) | Expr::ArrayAccess { .. } | Expr::RecordAccess { .. } => {
                let (evaluator, value) = self.literal(expr)?;
                evaluator.evaluate_boolean(value)
            }
            Expr::Call {
                function,
                arguments,
            } => {
                let inlined = self.inline_call(*function, arguments)?;
                self.through_call(*function)?.evaluate_boolean(&inlined)
            }
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => Ok(!self.evaluate_boolean(operand)?),
            Expr::Binary { op, lhs, rhs } => self.predicate(expr, *op, lhs, rhs),
            Expr::Nary { op, operands } => match op {
                NaryOp::And => self.junction(operands, NaryOp::And),
                NaryOp::Or => self.junction(operands, NaryOp::Or),
                NaryOp::Xor => {
                    let mut odd = false;
                    for operand in operands {
                        odd ^= self.evaluate_boolean(operand)?;
                    }
                    Ok(odd)
                }
                NaryOp::Add | NaryOp::Multiply => {
                    Err(self.not_evaluable(expr, "an arithmetic expression has no boolean value"))
                }
            },
            Expr::IfThenElse {
                condition,
                then,
                otherwise,
            } => {
                if self.evaluate_boolean(condition)? {
                    self.evaluate_boolean(then)
                } else {
                    self.evaluate_boolean(otherwise)
                }
            }
            Expr::Quantified {
                quantifier,
                parameter,
                body,
            } => self.quantified(*quantifier, *parameter, body),
            Expr::Else => Err(self.not_evaluable(expr, "`else` only has a value inside a choice")),
            _ => Err(self.not_evaluable(expr, "the expression has no boolean value")),
        }
    }

    fn predicate(&self, expr: &Expr, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> ExprResult<bool> {
        match op {
            BinaryOp::Imply => {
                if !self.evaluate_boolean(lhs)? {
                    return Ok(true);
                }
                self.evaluate_boolean(rhs)
            }
            BinaryOp::Equal | BinaryOp::Inequal => {
                let equal = self.equality(lhs, rhs)?;
                Ok(equal == (op == BinaryOp::Equal))
            }
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                if lhs == rhs {
                    return Ok(matches!(op, BinaryOp::LessEqual | BinaryOp::GreaterEqual));
                }

                let ordering = if self.is_fractional(lhs) || self.is_fractional(rhs) {
                    self.evaluate_decimal(lhs)?.cmp(&self.evaluate_decimal(rhs)?)
                } else {
                    self.evaluate_integer(lhs)?.cmp(&self.evaluate_integer(rhs)?)
                };

                Ok(match op {
                    BinaryOp::Less => ordering.is_lt(),
                    BinaryOp::LessEqual => ordering.is_le(),
                    BinaryOp::Greater => ordering.is_gt(),
                    _ => ordering.is_ge(),
                })
            }
            BinaryOp::Subtract | BinaryOp::Divide | BinaryOp::Modulo | BinaryOp::Div => {
                Err(self.not_evaluable(expr, "an arithmetic expression has no boolean value"))
            }
        }
    }

    fn is_fractional(&self, expr: &Expr) -> bool {
        TypeDeterminator::new(self.package).is_fractional(expr)
    }

    fn equality(&self, lhs: &Expr, rhs: &Expr) -> ExprResult<bool> {
        if let (Expr::EnumLiteral { .. }, Expr::EnumLiteral { .. }) = (lhs, rhs) {
            return Ok(lhs == rhs);
        }
        if self.is_fractional(lhs) || self.is_fractional(rhs) {
            return Ok(self.evaluate_decimal(lhs)? == self.evaluate_decimal(rhs)?);
        }
        Ok(self.evaluate(lhs)? == self.evaluate(rhs)?)
    }

    /// Conjunction (`connective` is `And`) or disjunction (`Or`).
    ///
    /// Failures of individual operands are held back: an absorbing operand
    /// (false for `And`, true for `Or`) decides regardless. Otherwise the
    /// operands are scanned for two predicates on the same reference that
    /// cannot hold (resp. fail) together. For `Or` this scan goes beyond plain
    /// short-circuiting: `r != A || r != B` is true for any value of `r`.
    fn junction(&self, operands: &[Expr], connective: NaryOp) -> ExprResult<bool> {
        let absorbing = connective == NaryOp::Or;
        let mut failure = None;
        for operand in operands {
            match self.evaluate_boolean(operand) {
                Ok(value) if value == absorbing => return Ok(absorbing),
                Ok(_) => {}
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }

        let Some(failure) = failure else {
            return Ok(!absorbing);
        };

        let predicate = if absorbing {
            BinaryOp::Inequal
        } else {
            BinaryOp::Equal
        };
        if self.has_exclusive_predicates(operands, connective, predicate) {
            return Ok(absorbing);
        }
        Err(failure)
    }

    fn has_exclusive_predicates(
        &self,
        operands: &[Expr],
        connective: NaryOp,
        predicate: BinaryOp,
    ) -> bool {
        let mut pairs = Vec::new();
        collect_reference_predicates(operands, connective, predicate, &mut pairs);

        pairs.iter().enumerate().any(|(i, (reference, value))| {
            pairs[i + 1..].iter().any(|(other_reference, other_value)| {
                reference == other_reference && self.provably_different(value, other_value)
            })
        })
    }

    fn provably_different(&self, lhs: &Expr, rhs: &Expr) -> bool {
        match (lhs, rhs) {
            (Expr::EnumLiteral { .. }, Expr::EnumLiteral { .. }) => lhs != rhs,
            _ => matches!(
                (self.evaluate(lhs), self.evaluate(rhs)),
                (Ok(a), Ok(b)) if a != b
            ),
        }
    }

    /// Quantifiers behave like the conjunction (`forall`) or disjunction
    /// (`exists`) of their instances: failures are held back until an
    /// absorbing instance decides or the domain is exhausted.
    fn quantified(
        &self,
        quantifier: Quantifier,
        parameter: DeclKey,
        body: &Expr,
    ) -> ExprResult<bool> {
        let declaration = self.package.declaration(parameter)?;
        let domain = self.quantifier_domain(&declaration.ty).map_err(|err| match err {
            Error::NotEvaluable { reason, .. } => Error::NotEvaluable {
                expression: declaration.name.clone(),
                reason,
            },
            err => err,
        })?;

        let absorbing = quantifier == Quantifier::Exists;
        let max = self.options.max_quantifier_domain;
        let mut failure = None;
        for (count, value) in domain.values().enumerate() {
            if count == max {
                return Err(Error::NotEvaluable {
                    expression: declaration.name.clone(),
                    reason: format!("the quantified domain has more than {} values", max),
                });
            }

            let mut instance = body.clone();
            instance.substitute(parameter, &value);
            match self.evaluate_boolean(&instance) {
                Ok(holds) if holds == absorbing => return Ok(absorbing),
                Ok(_) => {}
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(!absorbing),
        }
    }

    /// Values of a boolean, enumeration or range type.
    fn quantifier_domain(&self, ty: &Type) -> ExprResult<QuantifierDomain> {
        let mut current = ty;
        while let Type::Named(key) = current {
            let declaration = self.package.type_declaration(*key)?;
            if let Type::Enumeration(literals) = &declaration.ty {
                return Ok(QuantifierDomain::Literals(
                    (0..literals.len())
                        .map(|index| Expr::EnumLiteral { ty: *key, index })
                        .collect(),
                ));
            }
            current = &declaration.ty;
        }

        match current {
            Type::Boolean => Ok(QuantifierDomain::Literals(vec![
                Expr::Bool(false),
                Expr::Bool(true),
            ])),
            Type::Range(range) => {
                let (lower, upper) = self.evaluate_range_bounds(range)?;
                Ok(QuantifierDomain::Integers { lower, upper })
            }
            _ => Err(Error::NotEvaluable {
                expression: current.fmt(self.package).to_string(),
                reason: "quantification requires a finite domain".to_string(),
            }),
        }
    }
}

/// Values a quantified parameter ranges over. Integer ranges are enumerated
/// lazily.
enum QuantifierDomain {
    Literals(Vec<Expr>),
    Integers { lower: BigInt, upper: BigInt },
}

impl QuantifierDomain {
    #[auto_enum(Iterator)]
    fn values(self) -> impl Iterator<Item = Expr> {
        match self {
            QuantifierDomain::Literals(values) => values.into_iter(),
            QuantifierDomain::Integers { lower, upper } => {
                std::iter::successors(Some(lower), |value| Some(value + 1))
                    .take_while(move |value| *value <= upper)
                    .map(Expr::Int)
            }
        }
    }
}

/// Operands left after dropping every pair `(a, -a)`.
fn cancel_opposites(operands: &[Expr]) -> Vec<&Expr> {
    let opposite = |a: &Expr, b: &Expr| {
        matches!(b, Expr::Unary { op: UnaryOp::Minus, operand } if operand.as_ref() == a)
            || matches!(a, Expr::Unary { op: UnaryOp::Minus, operand } if operand.as_ref() == b)
    };

    let mut remaining: Vec<&Expr> = operands.iter().collect();
    let mut i = 0;
    while i < remaining.len() {
        match (i + 1..remaining.len()).find(|&j| opposite(remaining[i], remaining[j])) {
            Some(j) => {
                remaining.remove(j);
                remaining.remove(i);
            }
            None => i += 1,
        }
    }
    remaining
}

/// `(reference, value)` of every `reference <predicate> value` found among
/// `operands` or the operands of nested `connective` expressions.
fn collect_reference_predicates<'e>(
    operands: &'e [Expr],
    connective: NaryOp,
    predicate: BinaryOp,
    pairs: &mut Vec<(&'e Expr, &'e Expr)>,
) {
    for operand in operands {
        match operand {
            Expr::Nary { op, operands } if *op == connective => {
                collect_reference_predicates(operands, connective, predicate, pairs)
            }
            Expr::Binary { op, lhs, rhs } if *op == predicate && lhs.is_reference_expression() => {
                pairs.push((lhs.as_ref(), rhs.as_ref()))
            }
            _ => {}
        }
    }
}
