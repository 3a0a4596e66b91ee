//! Predicate interval analyzer
//!
//! Discovers, for an integer variable, the boundary values worth exploring:
//! for every predicate `x op v` of the analysed expressions, one value on each
//! side of the boundary the predicate draws (a value satisfying it and a value
//! violating it).
//!
//! | predicate | valid | invalid |
//! |-----------|-------|---------|
//! | `x == v`  | `v`   | `v + 1` |
//! | `x != v`  | `v + 1` | `v`   |
//! | `x < v`   | `v - 1` | `v`   |
//! | `x > v`   | `v + 1` | `v`   |
//! | `x <= v`  | `v`   | `v + 1` |
//! | `x >= v`  | `v`   | `v - 1` |
use std::collections::BTreeSet;

use log::trace;
use num_bigint::BigInt;
use petgraph::{Direction, prelude::DiGraphMap};

use crate::{
    eval::ExpressionEvaluator,
    expr::{BinaryOp, Expr},
    package::{DeclKey, Package},
    typing::TypeDeterminator,
};

/// Expressions and value flows analysed together.
#[derive(Debug, Clone, Default)]
pub struct AnalysisScope<'e> {
    /// Expressions whose predicates are scanned.
    pub expressions: Vec<&'e Expr>,
    /// Edge `source -> target` for every assignment `target := source`
    /// between two variables.
    pub assignments: DiGraphMap<DeclKey, ()>,
}

impl<'e> AnalysisScope<'e> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expression(&mut self, expr: &'e Expr) {
        self.expressions.push(expr);
    }

    /// Record the assignment `target := source`.
    pub fn add_assignment(&mut self, target: DeclKey, source: DeclKey) {
        self.assignments.add_edge(source, target, ());
    }

    /// Variables related to `variable` by an assignment, in either direction.
    pub fn assignment_neighbors(&self, variable: DeclKey) -> impl Iterator<Item = DeclKey> + '_ {
        self.assignments
            .neighbors_directed(variable, Direction::Outgoing)
            .chain(
                self.assignments
                    .neighbors_directed(variable, Direction::Incoming),
            )
    }
}

/// Valid and invalid boundary values of `x op v`.
pub fn boundary_values(op: BinaryOp, value: &BigInt) -> Option<(BigInt, BigInt)> {
    let next = value + 1;
    let previous = value - 1;
    match op {
        BinaryOp::Equal => Some((value.clone(), next)),
        BinaryOp::Inequal => Some((next, value.clone())),
        BinaryOp::Less => Some((previous, value.clone())),
        BinaryOp::Greater => Some((next, value.clone())),
        BinaryOp::LessEqual => Some((value.clone(), next)),
        BinaryOp::GreaterEqual => Some((value.clone(), previous)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntervalAnalyzer<'a> {
    package: &'a Package,
}

impl<'a> IntervalAnalyzer<'a> {
    pub fn new(package: &'a Package) -> Self {
        Self { package }
    }

    /// Value the boundary is drawn at: the value of `other`, else the initial
    /// value of the declaration it references, else the default value of its
    /// type.
    fn boundary(&self, other: &Expr) -> Option<BigInt> {
        let evaluator = ExpressionEvaluator::new(self.package);
        if let Ok(value) = evaluator.evaluate(other) {
            return Some(value);
        }

        if let Expr::Ref(key) = other {
            let initial = self
                .package
                .declaration(*key)
                .ok()
                .and_then(|declaration| declaration.initial.as_ref());
            if let Some(Ok(value)) = initial.map(|initial| evaluator.evaluate(initial)) {
                return Some(value);
            }
        }

        let ty = TypeDeterminator::new(self.package).get_type(other).ok()?;
        let default = self.package.default_expression(&ty).ok()?;
        evaluator.evaluate(&default).ok()
    }

    /// Boundary values of `variable` drawn by the predicates of `scope`.
    ///
    /// Only predicates with exactly one side being a direct reference to
    /// `variable` are considered.
    pub fn calculate_integer_values(
        &self,
        scope: &AnalysisScope<'_>,
        variable: DeclKey,
    ) -> BTreeSet<BigInt> {
        let mut values = BTreeSet::new();

        let predicates = scope
            .expressions
            .iter()
            .flat_map(|expr| expr.descendants())
            .filter_map(|node| match node {
                Expr::Binary { op, lhs, rhs } if op.is_predicate() => Some((*op, lhs, rhs)),
                _ => None,
            });

        for (op, lhs, rhs) in predicates {
            let (op, other) = match (lhs.is_reference_to(variable), rhs.is_reference_to(variable)) {
                (true, false) => (op, rhs.as_ref()),
                (false, true) => match op.flipped() {
                    Some(flipped) => (flipped, lhs.as_ref()),
                    None => continue,
                },
                _ => continue,
            };

            let Some(value) = self.boundary(other) else {
                trace!(
                    "Skipping predicate on `{}`: no value for `{}`",
                    Expr::Ref(variable).fmt(self.package),
                    other.fmt(self.package)
                );
                continue;
            };

            if let Some((valid, invalid)) = boundary_values(op, &value) {
                values.insert(valid);
                values.insert(invalid);
            }
        }

        values
    }

    /// Boundary values of `variable` and of every variable transitively
    /// related to it by assignments, across all `scopes`.
    pub fn calculate_integer_values_extended(
        &self,
        scopes: &[AnalysisScope<'_>],
        variable: DeclKey,
    ) -> BTreeSet<BigInt> {
        let mut values = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut worklist: Vec<(usize, DeclKey)> =
            (0..scopes.len()).map(|index| (index, variable)).collect();

        while let Some((index, current)) = worklist.pop() {
            if !visited.insert((index, current)) {
                continue;
            }

            let scope = &scopes[index];
            values.extend(self.calculate_integer_values(scope, current));
            for neighbor in scope.assignment_neighbors(current) {
                worklist.extend((0..scopes.len()).map(|index| (index, neighbor)));
            }
        }

        values
    }
}
