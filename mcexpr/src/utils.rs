use strum::{EnumIs, EnumTryAs};
use thiserror::Error;

/// Broad family an [`Error`] belongs to.
///
/// Callers that only need to know *why* a question could not be answered
/// (rather than the exact failure) can branch on this instead of on every
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The expression has no concrete value in the current context.
    Evaluation,
    /// No type could be inferred for the expression.
    Typing,
    /// The expression has no negation in this language.
    Negation,
    /// The package itself is inconsistent (stale keys, unknown fields).
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIs, EnumTryAs, Error)]
pub enum Error {
    /// Generic evaluation failure, e.g. a reference to a state variable.
    #[error("Expression `{expression}` cannot be evaluated: {reason}.")]
    NotEvaluable { expression: String, reason: String },

    /// Right hand side of a division or modulo evaluated to zero.
    #[error("Division by zero while evaluating `{expression}`.")]
    DivisionByZero { expression: String },

    /// A constant has been declared without an initial value.
    #[error("Constant `{declaration}` has no initial value.")]
    MissingInitialValue { declaration: String },

    /// No component instance binds the parameter.
    #[error(
        "Parameter `{parameter}` is not bound: no instance of its owning component provides an argument at position {index}."
    )]
    UnboundParameter { parameter: String, index: usize },

    /// More than one instance binds the parameter and the binding policy asks for uniqueness.
    #[error("Parameter `{parameter}` is bound by {count} component instances.")]
    AmbiguousParameterBinding { parameter: String, count: usize },

    /// Array access outside of the literal bounds.
    #[error("Index `{index}` is out of bounds for an array literal of {len} elements.")]
    IndexOutOfBounds { index: String, len: usize },

    /// Function inlining exceeded its configured depth (usually recursion).
    #[error("Inlining of function `{function}` exceeded the maximum depth of {max}.")]
    InlineDepthExceeded { function: String, max: usize },

    /// Resolving a reference went through too many definitions (usually a cyclic constant).
    #[error("Resolution of `{declaration}` exceeded the maximum depth of {max}.")]
    ResolutionDepthExceeded { declaration: String, max: usize },

    /// Generic typing failure.
    #[error("Expression `{expression}` cannot be typed: {reason}.")]
    NotTypable { expression: String, reason: String },

    /// The operand type does not match what the operator requires.
    #[error("Type mismatch: expected {expected}, found `{found}`.")]
    TypeMismatch { expected: String, found: String },

    /// Both branches of a conditional must have equal types.
    #[error(
        "Branches of a conditional expression have different types: `{then_type}` and `{else_type}`."
    )]
    BranchTypeMismatch { then_type: String, else_type: String },

    /// Array literals must contain at least one element to be typed.
    #[error("An empty array literal has no element type.")]
    EmptyArrayLiteral,

    /// The expression cannot be negated (e.g. an arithmetic expression).
    #[error("Expression `{expression}` cannot be negated.")]
    NotNegatable { expression: String },

    /// A key does not designate any element of the package.
    #[error("The package contains no {kind} for the given key.")]
    UnknownDeclaration { kind: &'static str },

    /// A record access names a field the record type does not declare.
    #[error("Type `{ty}` declares no field named `{field}`.")]
    UnknownField { field: String, ty: String },
}

impl Error {
    /// Family of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotEvaluable { .. }
            | Error::DivisionByZero { .. }
            | Error::MissingInitialValue { .. }
            | Error::UnboundParameter { .. }
            | Error::AmbiguousParameterBinding { .. }
            | Error::IndexOutOfBounds { .. }
            | Error::InlineDepthExceeded { .. }
            | Error::ResolutionDepthExceeded { .. } => ErrorCategory::Evaluation,
            Error::NotTypable { .. }
            | Error::TypeMismatch { .. }
            | Error::BranchTypeMismatch { .. }
            | Error::EmptyArrayLiteral => ErrorCategory::Typing,
            Error::NotNegatable { .. } => ErrorCategory::Negation,
            Error::UnknownDeclaration { .. } | Error::UnknownField { .. } => ErrorCategory::Model,
        }
    }
}

pub type ExprResult<T> = Result<T, Error>;
