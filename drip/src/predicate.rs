// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Predicates deciding whether a row belongs in a filter.
//!
//! Any `Fn(&V) -> bool` closure is a [`Predicate`]. The builders [`eq`],
//! [`gt`], [`ge`], [`lt`] and [`le`] bind the right-hand operand of a
//! comparison: `gt(x)` accepts the values `v` with `v > x`.
//!
//! # Usage
//!
//! ```rust
//! use drip::predicate::Predicate;
//! use drip::predicate::ge;
//! use drip::predicate::gt;
//!
//! assert!(gt(3).test(&4).unwrap());
//! assert!(!gt(3).test(&3).unwrap());
//! assert!(ge(3).test(&3).unwrap());
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::Error;

/// A boolean test on a value.
pub trait Predicate<V: ?Sized> {
    /// Returns whether `value` satisfies the predicate.
    fn test(&self, value: &V) -> Result<bool, Error>;
}

impl<V, F> Predicate<V> for F
where
    V: ?Sized,
    F: Fn(&V) -> bool,
{
    fn test(&self, value: &V) -> Result<bool, Error> {
        Ok(self(value))
    }
}

/// Types the comparison predicates can compare.
///
/// `Ok(None)` means the values are unordered (e.g. NaN), which fails every
/// comparison. An error means the values cannot be compared at all.
pub trait Operand {
    /// Orders `self` relative to `other`.
    fn compare(&self, other: &Self) -> Result<Option<Ordering>, Error>;
}

macro_rules! impl_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl Operand for $t {
                fn compare(&self, other: &Self) -> Result<Option<Ordering>, Error> {
                    Ok(self.partial_cmp(other))
                }
            }
        )*
    };
}

impl_operand!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String
);

impl<T: Operand + ?Sized> Operand for &T {
    fn compare(&self, other: &Self) -> Result<Option<Ordering>, Error> {
        (**self).compare(*other)
    }
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Returns the operator as written in Rust, e.g. `>=`.
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
        }
    }

    /// Returns whether an ordering of `value` relative to the operand
    /// satisfies the operator.
    fn accepts(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A comparison against a bound operand, built by [`eq`], [`gt`], [`ge`],
/// [`lt`] or [`le`].
#[derive(Debug, Clone, PartialEq)]
pub struct Compare<T> {
    op: CompareOp,
    operand: T,
}

impl<T> Compare<T> {
    /// Creates a predicate testing `value <op> operand`.
    pub fn new(op: CompareOp, operand: T) -> Self {
        Compare { op, operand }
    }

    /// Returns the operator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Returns the bound right-hand operand.
    pub fn operand(&self) -> &T {
        &self.operand
    }
}

impl<T: Operand> Predicate<T> for Compare<T> {
    fn test(&self, value: &T) -> Result<bool, Error> {
        let ordering = value.compare(&self.operand)?;
        Ok(self.op.accepts(ordering))
    }
}

/// Renders as e.g. `>= 25`.
impl<T: fmt::Display> fmt::Display for Compare<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.op, self.operand)
    }
}

/// Equality predicate.
pub fn eq<T>(x: T) -> Compare<T> {
    Compare::new(CompareOp::Eq, x)
}

/// Greater than predicate: accepts `v` when `v > x`.
pub fn gt<T>(x: T) -> Compare<T> {
    Compare::new(CompareOp::Gt, x)
}

/// Greater than or equal predicate: accepts `v` when `v >= x`.
pub fn ge<T>(x: T) -> Compare<T> {
    Compare::new(CompareOp::Ge, x)
}

/// Less than predicate: accepts `v` when `v < x`.
pub fn lt<T>(x: T) -> Compare<T> {
    Compare::new(CompareOp::Lt, x)
}

/// Less than or equal predicate: accepts `v` when `v <= x`.
pub fn le<T>(x: T) -> Compare<T> {
    Compare::new(CompareOp::Le, x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unordered_fails_every_operator() {
        for op in [
            CompareOp::Eq,
            CompareOp::Gt,
            CompareOp::Ge,
            CompareOp::Lt,
            CompareOp::Le,
        ] {
            assert!(!Compare::new(op, f64::NAN).test(&1.0).unwrap(), "{op}");
            assert!(!Compare::new(op, 1.0).test(&f64::NAN).unwrap(), "{op}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ge(25).to_string(), ">= 25");
        assert_eq!(eq("foo").to_string(), "== foo");
    }
}
