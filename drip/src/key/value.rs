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

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use crate::error::Error;
use crate::predicate::Operand;

/// A dynamically typed field value.
///
/// Produced by [`FieldKey`](crate::key::FieldKey)s, and comparable with the
/// predicates in [`crate::predicate`]. Integers and floats compare with each
/// other numerically; any other pair of different kinds fails to compare.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Returns the name of this value's kind, as used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
        }
    }

    /// Returns the boolean, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the string, if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Operand for Value {
    fn compare(&self, other: &Self) -> Result<Option<Ordering>, Error> {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Some(a.cmp(b))),
            (Value::Int(a), Value::Int(b)) => Ok(Some(a.cmp(b))),
            (Value::Float(a), Value::Float(b)) => Ok(a.partial_cmp(b)),
            (Value::Int(a), Value::Float(b)) => Ok(compare_int_float(*a, *b)),
            (Value::Float(a), Value::Int(b)) => Ok(compare_int_float(*b, *a).map(Ordering::reverse)),
            (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
            _ => Err(Error::type_mismatch(self.kind_name(), other.kind_name())),
        }
    }
}

/// Compares an integer with a float by exact value.
///
/// Casting the integer to `f64` rounds above 2^53, so the float's integral
/// part is compared as an `i64` and its fraction breaks ties.
fn compare_int_float(int: i64, float: f64) -> Option<Ordering> {
    // 2^63, the first float above i64::MAX.
    const I64_END: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return None;
    }
    if float >= I64_END {
        return Some(Ordering::Less);
    }
    if float < -I64_END {
        return Some(Ordering::Greater);
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&float),
        ord => Some(ord),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// A row field that can be read as a [`Value`].
pub trait Cell {
    /// Returns the field as a [`Value`], without conversion.
    fn to_value(&self) -> Value;
}

impl Cell for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl Cell for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_string())
    }
}

impl Cell for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl Cell for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl Cell for i32 {
    fn to_value(&self) -> Value {
        Value::Int(i64::from(*self))
    }
}

impl Cell for i64 {
    fn to_value(&self) -> Value {
        Value::Int(*self)
    }
}

impl Cell for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }
}

impl<C: Cell + ?Sized> Cell for &C {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

/// A caller-supplied, named column constructor.
///
/// # Examples
///
/// ```
/// use drip::error::Error;
/// use drip::error::ErrorKind;
/// use drip::key::Constructor;
/// use drip::key::Value;
///
/// fn shout(value: Value) -> Result<Value, Error> {
///     match value {
///         Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
///         v => Err(Error::new(ErrorKind::KeyExtraction, format!("not a string: {v}"))),
///     }
/// }
///
/// let upper = Constructor::new("upper", shout);
/// assert_eq!(upper.name(), "upper");
/// ```
#[derive(Clone, Copy)]
pub struct Constructor {
    name: &'static str,
    func: fn(Value) -> Result<Value, Error>,
}

impl Constructor {
    /// Creates a constructor named `name`, reported as the conversion target
    /// when `func` fails.
    pub const fn new(name: &'static str, func: fn(Value) -> Result<Value, Error>) -> Self {
        Constructor { name, func }
    }

    /// Returns the constructor's name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.name).finish()
    }
}

impl PartialEq for Constructor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::fn_addr_eq(self.func, other.func)
    }
}

impl Eq for Constructor {}

impl Hash for Constructor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// A per-column type constructor applied by a [`FieldKey`](crate::key::FieldKey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Conversion {
    /// Keep the field as it is.
    #[default]
    Raw,
    /// Convert to [`Value::Int`]. Strings are parsed after trimming
    /// whitespace, floats are truncated toward zero and bools become 0 or 1.
    Int,
    /// Convert to [`Value::Float`]. Strings are parsed after trimming
    /// whitespace and integers are widened.
    Float,
    /// Convert to [`Value::Str`] using the value's display form.
    Str,
    /// Convert to [`Value::Bool`]. Strings must be `true` or `false`;
    /// numbers are true when non-zero.
    Bool,
    /// Apply a caller-supplied [`Constructor`], e.g. a date parser. Its error
    /// becomes the source of the resulting
    /// [`KeyExtraction`](crate::error::ErrorKind::KeyExtraction) error.
    Custom(Constructor),
}

impl Conversion {
    /// Returns the conversion's name, recorded as `target` in error context.
    pub const fn name(self) -> &'static str {
        match self {
            Conversion::Raw => "raw",
            Conversion::Int => "int",
            Conversion::Float => "float",
            Conversion::Str => "str",
            Conversion::Bool => "bool",
            Conversion::Custom(constructor) => constructor.name,
        }
    }

    /// Applies the conversion to the value read from field `index`.
    ///
    /// The index only decorates the error.
    pub fn apply(self, index: usize, value: Value) -> Result<Value, Error> {
        let target = self.name();
        match (self, value) {
            (Conversion::Raw, v) => Ok(v),
            (Conversion::Custom(constructor), v) => (constructor.func)(v).map_err(|err| {
                Error::conversion(index, target, err.message().to_string()).set_source(err)
            }),

            (Conversion::Int, Value::Int(i)) => Ok(Value::Int(i)),
            (Conversion::Int, Value::Bool(b)) => Ok(Value::Int(i64::from(b))),
            (Conversion::Int, Value::Float(v)) => {
                // `as` saturates, so reject what cannot be represented.
                if v.is_finite() && v.trunc() >= i64::MIN as f64 && v.trunc() < i64::MAX as f64 {
                    Ok(Value::Int(v.trunc() as i64))
                } else {
                    Err(Error::conversion(
                        index,
                        target,
                        format!("cannot convert float {v:?} to int"),
                    ))
                }
            }
            (Conversion::Int, Value::Str(s)) => s.trim().parse::<i64>().map(Value::Int).map_err(
                |err| {
                    Error::conversion(index, target, format!("invalid int literal {s:?}"))
                        .set_source(err)
                },
            ),

            (Conversion::Float, Value::Float(v)) => Ok(Value::Float(v)),
            (Conversion::Float, Value::Int(i)) => Ok(Value::Float(i as f64)),
            (Conversion::Float, Value::Bool(b)) => Ok(Value::Float(if b { 1.0 } else { 0.0 })),
            (Conversion::Float, Value::Str(s)) => {
                s.trim().parse::<f64>().map(Value::Float).map_err(|err| {
                    Error::conversion(index, target, format!("invalid float literal {s:?}"))
                        .set_source(err)
                })
            }

            (Conversion::Str, Value::Str(s)) => Ok(Value::Str(s)),
            (Conversion::Str, v) => Ok(Value::Str(v.to_string())),

            (Conversion::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
            (Conversion::Bool, Value::Int(i)) => Ok(Value::Bool(i != 0)),
            (Conversion::Bool, Value::Float(v)) => Ok(Value::Bool(v != 0.0)),
            (Conversion::Bool, Value::Str(s)) => {
                s.trim().parse::<bool>().map(Value::Bool).map_err(|err| {
                    Error::conversion(index, target, format!("invalid bool literal {s:?}"))
                        .set_source(err)
                })
            }
        }
    }
}
