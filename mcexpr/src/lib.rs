//! mcexpr: the typed expression language shared by model-checking backends.
//!
//! Expressions ([`expr::Expr`]) and types ([`types::Type`]) refer to named
//! elements through keys into a [`package::Package`]. On top of this data
//! model the crate provides:
//!
//!  - an evaluator computing exact integer, decimal and boolean values
//!    ([`eval::ExpressionEvaluator`]),
//!  - static type inference ([`typing::TypeDeterminator`]),
//!  - logical negation and negation normal form ([`negate`]),
//!  - boundary value discovery for integer variables ([`interval`]).
//!
//! Example
//! ```
//! use mcexpr::prelude::*;
//!
//! let mut package = Package::new("example");
//! let n = package.add_constant("N", Type::Integer, Expr::from(4));
//! let x = package.add_variable("x", Type::Integer, None);
//!
//! // `N * 2 - x * 0` only depends on constants
//! let e = func::subtract(
//!     func::multiply([func::reference(n), Expr::from(2)]),
//!     func::multiply([func::reference(x), Expr::from(0)]),
//! );
//! let value = ExpressionEvaluator::new(&package).evaluate_integer(&e).unwrap();
//! assert_eq!(value.to_string(), "8");
//! ```

/// Expression evaluation.
pub mod eval;
/// Expression tree, builders and formatting.
pub mod expr;
/// Boundary values of integer variables.
pub mod interval;
/// Logical negation and negation normal form.
pub mod negate;
/// Declaration store.
pub mod package;
/// Types, default values and native leaf hierarchies.
pub mod types;
/// Static type inference.
pub mod typing;
/// Error type.
pub mod utils;

pub mod prelude {
    //! Convenient re-exports for end users.
    pub use crate::eval::{
        Bindings, EvaluatorOptions, ExpressionEvaluator, ParameterBindingPolicy,
    };
    pub use crate::expr::{
        BinaryOp, Expr, ExprKind, FieldAssignment, IntegerRange, NaryOp, Quantifier, UnaryOp,
        func,
    };
    pub use crate::interval::{AnalysisScope, IntervalAnalyzer};
    pub use crate::negate::{negate, transform_transformable_not_expressions};
    pub use crate::package::{
        ComponentKey, DeclKey, DeclarationKind, FunctionKey, Package, ParameterOwner,
        TypeDeclKey,
    };
    pub use crate::types::{
        FieldDeclaration, Type,
        hierarchy::{FieldHierarchy, IndexHierarchy},
    };
    pub use crate::typing::TypeDeterminator;
    pub use crate::utils::{Error, ErrorCategory, ExprResult};
}
