//! Field and index hierarchies
//!
//! Composite values are flattened by backends into their *native* leaves:
//! primitive values or (possibly multidimensional) arrays of primitive values.
//! A [`FieldHierarchy`] is the path of record fields leading to such a leaf
//! and an [`IndexHierarchy`] is the path of array indexes leading to a single
//! element.
//!
//! Arrays are transparent for field hierarchies: an array of records
//! contributes the leaves of the record, each leaf keeping the array wrapping
//! (an array of records is seen as a record of arrays).
use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    eval::ExpressionEvaluator,
    expr::{Expr, func},
    package::Package,
    types::Type,
    utils::{Error, ExprResult},
};

/// Ordered path of record fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldHierarchy {
    fields: Vec<String>,
}

impl FieldHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fields<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.fields.last().map(String::as_str)
    }

    /// Append a field at the end of the path.
    pub fn push(&mut self, field: impl Into<String>) {
        self.fields.push(field.into());
    }

    /// Insert a field at the beginning of the path.
    pub fn prepend(&mut self, field: impl Into<String>) {
        self.fields.insert(0, field.into());
    }

    /// Append every field of `other`.
    pub fn extend(&mut self, other: &FieldHierarchy) {
        self.fields.extend(other.fields.iter().cloned());
    }

    /// Path without its last field, `None` for the empty path.
    pub fn parent(&self) -> Option<FieldHierarchy> {
        let (_, parent) = self.fields.split_last()?;
        Some(Self {
            fields: parent.to_vec(),
        })
    }

    /// Wrap `operand` into the chain of record accesses described by this path.
    pub fn access(&self, operand: Expr) -> Expr {
        self.fields
            .iter()
            .fold(operand, |operand, field| func::record_access(operand, field.clone()))
    }
}

impl Display for FieldHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fields.join("."))
    }
}

/// Ordered path of array indexes.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexHierarchy {
    indexes: Vec<usize>,
}

impl IndexHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indexes(indexes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indexes: indexes.into_iter().collect(),
        }
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.indexes.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.indexes.last().copied()
    }

    pub fn push(&mut self, index: usize) {
        self.indexes.push(index);
    }

    pub fn prepend(&mut self, index: usize) {
        self.indexes.insert(0, index);
    }

    pub fn extend(&mut self, other: &IndexHierarchy) {
        self.indexes.extend_from_slice(&other.indexes);
    }

    /// Wrap `operand` into the chain of array accesses described by this path.
    pub fn access(&self, operand: Expr) -> Expr {
        self.indexes
            .iter()
            .fold(operand, |operand, index| {
                func::array_access(operand, Expr::from(*index))
            })
    }
}

impl Display for IndexHierarchy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for index in &self.indexes {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

impl Package {
    /// Every path from `ty` to one of its native leaves, in field order.
    ///
    /// A native type yields a single empty hierarchy.
    pub fn native_field_hierarchies(&self, ty: &Type) -> ExprResult<Vec<FieldHierarchy>> {
        match self.resolve_type(ty)? {
            Type::Record(fields) => {
                let mut hierarchies = Vec::new();
                for field in fields {
                    for mut hierarchy in self.native_field_hierarchies(&field.ty)? {
                        hierarchy.prepend(field.name.clone());
                        hierarchies.push(hierarchy);
                    }
                }
                Ok(hierarchies)
            }
            Type::Array { element, .. } => self.native_field_hierarchies(element),
            _ => Ok(vec![FieldHierarchy::new()]),
        }
    }

    /// Type of the native leaf of `ty` designated by `hierarchy`.
    ///
    /// Array wrappings met on the way are kept around the leaf type.
    pub fn native_type(&self, ty: &Type, hierarchy: &FieldHierarchy) -> ExprResult<Type> {
        self.native_type_of(ty, hierarchy.fields())
    }

    fn native_type_of(&self, ty: &Type, fields: &[String]) -> ExprResult<Type> {
        let Some((first, rest)) = fields.split_first() else {
            return Ok(ty.clone());
        };

        match self.resolve_type(ty)? {
            Type::Array { element, size } => Ok(Type::Array {
                element: Box::new(self.native_type_of(element, fields)?),
                size: size.clone(),
            }),
            Type::Record(declared) => {
                let field = declared
                    .iter()
                    .find(|field| &field.name == first)
                    .ok_or_else(|| Error::UnknownField {
                        field: first.clone(),
                        ty: ty.fmt(self).to_string(),
                    })?;
                self.native_type_of(&field.ty, rest)
            }
            _ => Err(Error::UnknownField {
                field: first.clone(),
                ty: ty.fmt(self).to_string(),
            }),
        }
    }

    /// Native leaf types of `ty`, in the order of
    /// [`Package::native_field_hierarchies`].
    pub fn native_types(&self, ty: &Type) -> ExprResult<Vec<Type>> {
        self.native_field_hierarchies(ty)?
            .iter()
            .map(|hierarchy| self.native_type(ty, hierarchy))
            .collect()
    }

    /// Every index path into the (nested) arrays of `ty`, in ascending
    /// lexicographic order. Array sizes must be evaluable.
    pub fn index_hierarchies(&self, ty: &Type) -> ExprResult<Vec<IndexHierarchy>> {
        match self.resolve_type(ty)? {
            Type::Array { element, size } => {
                let size = ExpressionEvaluator::new(self).evaluate_size(size)?;
                let inner = self.index_hierarchies(element)?;
                let mut hierarchies = Vec::with_capacity(size * inner.len());
                for index in 0..size {
                    for suffix in &inner {
                        let mut hierarchy = IndexHierarchy::from_indexes([index]);
                        hierarchy.extend(suffix);
                        hierarchies.push(hierarchy);
                    }
                }
                Ok(hierarchies)
            }
            _ => Ok(vec![IndexHierarchy::new()]),
        }
    }
}
