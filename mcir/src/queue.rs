//! Queues encoded over fixed-size arrays.
//!
//! Two encodings exist:
//!
//!  - [`QueueEncoding::SizeCounter`]: the array holds the elements in FIFO
//!    order, front at index 0, and a separate integer variable counts them.
//!  - [`QueueEncoding::Sentinel`]: for queues of capacity 1 only. The single
//!    slot holds the default value of the element type when the queue is
//!    empty, no size variable is needed.
use log::debug;
use mcexpr::{
    eval::ExpressionEvaluator,
    expr::{Expr, func},
    package::Package,
    types::Type,
    typing::TypeDeterminator,
};

use crate::{
    action::Action,
    utils::{Error, IrResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueueEncoding {
    /// `size` is a reference expression holding the number of elements.
    SizeCounter { size: Expr },
    Sentinel,
}

/// Symbolic queue operations over an array reference expression.
#[derive(Debug, Clone)]
pub struct ArrayQueue {
    array: Expr,
    capacity: usize,
    element_default: Expr,
    encoding: QueueEncoding,
}

impl ArrayQueue {
    /// Queue stored in `array` (a reference expression of array type).
    ///
    /// `size` is required for capacities above 1. Capacity 1 queues always use
    /// the sentinel encoding, a given `size` is then ignored.
    pub fn new(package: &Package, array: Expr, size: Option<Expr>) -> IrResult<Self> {
        let ty = TypeDeterminator::new(package).get_type(&array)?;
        let Type::Array {
            element,
            size: capacity,
        } = package.resolve_type(&ty)?
        else {
            return Err(Error::InvalidQueue {
                reason: format!("`{}` is not an array", array.fmt(package)),
            });
        };

        let capacity = ExpressionEvaluator::new(package).evaluate_size(capacity)?;
        let element_default = package.default_expression(element)?;

        let encoding = match (capacity, size) {
            (0, _) => {
                return Err(Error::InvalidQueue {
                    reason: format!("`{}` has no capacity", array.fmt(package)),
                });
            }
            (1, size) => {
                if size.is_some() {
                    debug!(
                        "Queue `{}` has capacity 1, its size variable is ignored",
                        array.fmt(package)
                    );
                }
                QueueEncoding::Sentinel
            }
            (_, Some(size)) => QueueEncoding::SizeCounter { size },
            (_, None) => {
                return Err(Error::InvalidQueue {
                    reason: format!(
                        "`{}` has capacity {} and requires a size variable",
                        array.fmt(package),
                        capacity
                    ),
                });
            }
        };

        debug!(
            "Queue `{}` of capacity {} uses the {:?} encoding",
            array.fmt(package),
            capacity,
            encoding
        );

        Ok(Self {
            array,
            capacity,
            element_default,
            encoding,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn encoding(&self) -> &QueueEncoding {
        &self.encoding
    }

    fn slot(&self, index: impl Into<Expr>) -> Expr {
        func::array_access(self.array.clone(), index.into())
    }

    /// Front element.
    pub fn peek(&self) -> Expr {
        self.slot(0)
    }

    /// Number of elements.
    pub fn size_expression(&self) -> Expr {
        match &self.encoding {
            QueueEncoding::SizeCounter { size } => size.clone(),
            QueueEncoding::Sentinel => func::ite(
                func::equal(self.slot(0), self.element_default.clone()),
                Expr::from(0),
                Expr::from(1),
            ),
        }
    }

    pub fn is_empty(&self) -> Expr {
        match &self.encoding {
            QueueEncoding::SizeCounter { size } => func::equal(size.clone(), Expr::from(0)),
            QueueEncoding::Sentinel => func::equal(self.slot(0), self.element_default.clone()),
        }
    }

    pub fn is_full(&self) -> Expr {
        match &self.encoding {
            QueueEncoding::SizeCounter { size } => {
                func::equal(size.clone(), Expr::from(self.capacity))
            }
            QueueEncoding::Sentinel => func::inequal(self.slot(0), self.element_default.clone()),
        }
    }

    /// Remove the front element: shift every element left, fill the last slot
    /// with the default value and decrement the size.
    pub fn pop(&self) -> Action {
        match &self.encoding {
            QueueEncoding::SizeCounter { size } => {
                let mut actions: Vec<Action> = (1..self.capacity)
                    .map(|index| Action::Assignment {
                        lhs: self.slot(index - 1),
                        rhs: self.slot(index),
                    })
                    .collect();
                actions.push(Action::Assignment {
                    lhs: self.slot(self.capacity - 1),
                    rhs: self.element_default.clone(),
                });
                actions.push(Action::Assignment {
                    lhs: size.clone(),
                    rhs: func::subtract(size.clone(), Expr::from(1)),
                });
                Action::Sequential(actions)
            }
            QueueEncoding::Sentinel => Action::Assignment {
                lhs: self.slot(0),
                rhs: self.element_default.clone(),
            },
        }
    }

    /// Append `value` at the back and increment the size.
    pub fn push(&self, value: Expr) -> Action {
        match &self.encoding {
            QueueEncoding::SizeCounter { size } => Action::Sequential(vec![
                Action::Assignment {
                    lhs: self.slot(size.clone()),
                    rhs: value,
                },
                Action::Assignment {
                    lhs: size.clone(),
                    rhs: func::add([size.clone(), Expr::from(1)]),
                },
            ]),
            QueueEncoding::Sentinel => Action::Assignment {
                lhs: self.slot(0),
                rhs: value,
            },
        }
    }
}
