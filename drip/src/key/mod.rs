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

//! Key functions extracting the value a predicate tests from a row.
//!
//! Any `Fn(&R) -> V` closure is a [`Key`]. For rows with positional fields
//! (anything implementing [`Row`], CSV records included) this module also
//! builds positional extractors:
//!
//! - [`make_key_functions`] returns [`FieldKey`]s producing [`Value`]s,
//!   optionally converting each column with a [`Conversion`], including
//!   caller-supplied [`Constructor`]s.
//! - [`item_keys`] returns [`ItemKey`]s producing owned copies of the raw
//!   fields, with their static type.
//!
//! # Usage
//!
//! ```rust
//! use drip::key::Conversion;
//! use drip::key::Key;
//! use drip::key::Value;
//! use drip::key::make_key_functions;
//!
//! let row = vec!["2001-01-01", "-6", "ONT"];
//!
//! let raw = make_key_functions(3);
//! assert_eq!(raw[1].extract(&row).unwrap(), Value::from("-6"));
//!
//! let typed = make_key_functions([Conversion::Str, Conversion::Int, Conversion::Str]);
//! assert_eq!(typed[1].extract(&row).unwrap(), Value::Int(-6));
//! ```
//!
//! # Notes
//!
//! - Keys fail lazily: a missing field or a failed conversion is reported when
//!   the key is applied to that row, as
//!   [`ErrorKind::KeyExtraction`](crate::error::ErrorKind::KeyExtraction).

mod value;

pub use self::value::Cell;
pub use self::value::Constructor;
pub use self::value::Conversion;
pub use self::value::Value;

use crate::error::Error;

/// A function from a row to the value a predicate tests.
pub trait Key<R: ?Sized> {
    type Output;

    /// Extracts the key of `row`.
    fn extract(&self, row: &R) -> Result<Self::Output, Error>;
}

impl<R, V, F> Key<R> for F
where
    R: ?Sized,
    F: Fn(&R) -> V,
{
    type Output = V;

    fn extract(&self, row: &R) -> Result<V, Error> {
        Ok(self(row))
    }
}

/// A row whose fields are addressed by position.
pub trait Row {
    type Field: ?Sized;

    /// Returns field `index`, or `None` if the row is too short.
    fn field(&self, index: usize) -> Option<&Self::Field>;

    /// Returns the number of fields in the row.
    fn num_fields(&self) -> usize;
}

impl<F> Row for [F] {
    type Field = F;

    fn field(&self, index: usize) -> Option<&F> {
        self.get(index)
    }

    fn num_fields(&self) -> usize {
        self.len()
    }
}

impl<F> Row for Vec<F> {
    type Field = F;

    fn field(&self, index: usize) -> Option<&F> {
        self.get(index)
    }

    fn num_fields(&self) -> usize {
        self.len()
    }
}

impl<F, const N: usize> Row for [F; N] {
    type Field = F;

    fn field(&self, index: usize) -> Option<&F> {
        self.get(index)
    }

    fn num_fields(&self) -> usize {
        N
    }
}

impl Row for csv::StringRecord {
    type Field = str;

    fn field(&self, index: usize) -> Option<&str> {
        self.get(index)
    }

    fn num_fields(&self) -> usize {
        self.len()
    }
}

fn read_field<R: Row + ?Sized>(row: &R, index: usize) -> Result<&R::Field, Error> {
    row.field(index)
        .ok_or_else(|| Error::field_out_of_range(index, row.num_fields()))
}

/// Positional key reading one field as a [`Value`] and applying a
/// [`Conversion`] to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKey {
    index: usize,
    conversion: Conversion,
}

impl FieldKey {
    /// Creates a key reading field `index` and applying `conversion`.
    pub fn new(index: usize, conversion: Conversion) -> Self {
        FieldKey { index, conversion }
    }

    /// Returns the index of the field this key reads.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the conversion applied to the field.
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }
}

impl<R> Key<R> for FieldKey
where
    R: Row + ?Sized,
    R::Field: Cell,
{
    type Output = Value;

    fn extract(&self, row: &R) -> Result<Value, Error> {
        let field = read_field(row, self.index)?;
        self.conversion.apply(self.index, field.to_value())
    }
}

/// Positional key returning an owned copy of one raw field.
///
/// Unlike [`FieldKey`] the output keeps the field's static type, e.g.
/// `String` for `Vec<String>` rows and for CSV records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    index: usize,
}

impl ItemKey {
    /// Creates a key copying field `index`.
    pub fn new(index: usize) -> Self {
        ItemKey { index }
    }

    /// Returns the index of the field this key reads.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<R> Key<R> for ItemKey
where
    R: Row + ?Sized,
    R::Field: ToOwned,
{
    type Output = <R::Field as ToOwned>::Owned;

    fn extract(&self, row: &R) -> Result<Self::Output, Error> {
        read_field(row, self.index).map(ToOwned::to_owned)
    }
}

/// What [`make_key_functions`] should build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySpec {
    /// Raw extractors for the first `n` fields.
    Count(usize),
    /// One extractor per conversion, for the fields in order.
    Typed(Vec<Conversion>),
}

impl From<usize> for KeySpec {
    fn from(n: usize) -> Self {
        KeySpec::Count(n)
    }
}

impl From<Vec<Conversion>> for KeySpec {
    fn from(conversions: Vec<Conversion>) -> Self {
        KeySpec::Typed(conversions)
    }
}

impl From<&[Conversion]> for KeySpec {
    fn from(conversions: &[Conversion]) -> Self {
        KeySpec::Typed(conversions.to_vec())
    }
}

impl<const N: usize> From<[Conversion; N]> for KeySpec {
    fn from(conversions: [Conversion; N]) -> Self {
        KeySpec::Typed(conversions.to_vec())
    }
}

/// Builds positional key functions.
///
/// A count `n` yields keys for fields `0..n` returning each field as is; a
/// sequence of conversions yields one key per conversion, key `i` reading
/// field `i` and applying conversion `i`.
///
/// # Examples
///
/// ```
/// use drip::key::Conversion;
/// use drip::key::Key;
/// use drip::key::Value;
/// use drip::key::make_key_functions;
///
/// let row = vec![Value::from("42"), Value::from(42)];
/// let keys = make_key_functions([Conversion::Int, Conversion::Str]);
/// assert_eq!(keys[0].extract(&row).unwrap(), Value::Int(42));
/// assert_eq!(keys[1].extract(&row).unwrap(), Value::from("42"));
/// ```
pub fn make_key_functions(spec: impl Into<KeySpec>) -> Vec<FieldKey> {
    match spec.into() {
        KeySpec::Count(n) => (0..n).map(|i| FieldKey::new(i, Conversion::Raw)).collect(),
        KeySpec::Typed(conversions) => conversions
            .into_iter()
            .enumerate()
            .map(|(i, conversion)| FieldKey::new(i, conversion))
            .collect(),
    }
}

/// Builds `n` raw positional keys for fields `0..n`.
///
/// # Examples
///
/// ```
/// use drip::key::Key;
/// use drip::key::item_keys;
///
/// let row = vec!["a".to_string(), "b".to_string()];
/// let keys = item_keys(2);
/// let second: String = keys[1].extract(&row).unwrap();
/// assert_eq!(second, "b");
/// ```
pub fn item_keys(n: usize) -> Vec<ItemKey> {
    (0..n).map(ItemKey::new).collect()
}
