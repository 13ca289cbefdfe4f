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

use std::fmt;
use std::iter::FusedIterator;
use std::ops::BitAnd;
use std::ops::BitOr;
use std::ops::BitXor;
use std::ops::Index;
use std::ops::Not;

use crate::error::Error;
use crate::filter::FilterBuilder;

const WORD_BITS: usize = 64;

/// A selection over the rows of a dataset.
///
/// Bit `i` of a filter tells whether row `i` of the dataset it was built
/// from is included. A filter always has exactly as many bits as that dataset
/// has rows, and it is immutable once built: refinement and the boolean
/// algebra below return new filters.
///
/// # Examples
///
/// ```
/// use drip::Filter;
/// use drip::predicate::ge;
/// use drip::predicate::le;
///
/// let data: Vec<i64> = (0..100).collect();
/// let ge25 = Filter::builder(&data).matching(&ge(25)).unwrap();
/// let le75 = Filter::builder(&data).matching(&le(75)).unwrap();
///
/// let between = &ge25 & &le75;
/// assert_eq!(between.count_ones(), 51);
/// assert_eq!((!&between).count_ones(), 49);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Filter {
    /// Number of logical bits, equal to the dataset length.
    num_bits: usize,
    /// Bits packed into u64 words, LSB first.
    /// Length = ceil(num_bits / 64); bits past `num_bits` are always zero.
    words: Vec<u64>,
}

impl Filter {
    /// Returns a builder that builds or refines a filter over `data`.
    ///
    /// See [`FilterBuilder`] for the available terminal operations.
    pub fn builder<T>(data: &[T]) -> FilterBuilder<'_, T> {
        FilterBuilder::new(data)
    }

    /// Creates a filter of `len` bits, all set.
    pub fn all(len: usize) -> Self {
        let mut filter = Filter {
            num_bits: len,
            words: vec![!0u64; len.div_ceil(WORD_BITS)],
        };
        filter.mask_trailing_bits();
        filter
    }

    /// Creates a filter of `len` bits, all cleared.
    pub fn none(len: usize) -> Self {
        Filter {
            num_bits: len,
            words: vec![0u64; len.div_ceil(WORD_BITS)],
        }
    }

    /// Sets bit `index`. Only the filter engine builds filters bit by bit.
    pub(crate) fn set(&mut self, index: usize) {
        debug_assert!(index < self.num_bits);
        self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns the number of bits, i.e. the length of the dataset the filter
    /// was built from.
    pub fn len(&self) -> usize {
        self.num_bits
    }

    /// Returns whether the filter has no bits at all.
    ///
    /// A filter with bits that are all cleared is not empty; use
    /// [`count_ones()`](Self::count_ones) to test for an empty selection.
    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    /// Returns the number of selected rows.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns the number of excluded rows.
    pub fn count_zeros(&self) -> usize {
        self.num_bits - self.count_ones()
    }

    /// Returns bit `index`, or `None` if it is out of range.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index < self.num_bits {
            Some(self.bit(index))
        } else {
            None
        }
    }

    /// Returns whether every row selected by `self` is also selected by
    /// `other`. Filters of different lengths are never subsets of each other.
    pub fn is_subset(&self, other: &Filter) -> bool {
        self.num_bits == other.num_bits
            && self
                .words
                .iter()
                .zip(&other.words)
                .all(|(a, b)| a & !b == 0)
    }

    /// Iterates over all bits in index order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            filter: self,
            front: 0,
            back: self.num_bits,
        }
    }

    /// Iterates over the indices of the set bits in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use drip::Filter;
    ///
    /// let filter = Filter::from(vec![false, true, true, false, true]);
    /// assert_eq!(filter.ones().collect::<Vec<_>>(), vec![1, 2, 4]);
    /// ```
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word_index: 0,
            current: self.words.first().copied().unwrap_or(0),
            remaining: self.count_ones(),
        }
    }

    // ========================================================================
    // Boolean Algebra
    // ========================================================================

    /// Returns the rows selected by both filters (bitwise AND).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
    /// if the filters have different lengths.
    pub fn intersection(&self, other: &Filter) -> Result<Filter, Error> {
        self.check_same_len(other)?;
        Ok(self.zip_words(other, |a, b| a & b))
    }

    /// Returns the rows selected by either filter (bitwise OR).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
    /// if the filters have different lengths.
    pub fn union(&self, other: &Filter) -> Result<Filter, Error> {
        self.check_same_len(other)?;
        Ok(self.zip_words(other, |a, b| a | b))
    }

    /// Returns the rows selected by exactly one of the filters (bitwise XOR).
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
    /// if the filters have different lengths.
    pub fn symmetric_difference(&self, other: &Filter) -> Result<Filter, Error> {
        self.check_same_len(other)?;
        Ok(self.zip_words(other, |a, b| a ^ b))
    }

    /// Returns the rows not selected by this filter (bitwise NOT).
    pub fn complement(&self) -> Filter {
        let mut filter = Filter {
            num_bits: self.num_bits,
            words: self.words.iter().map(|w| !w).collect(),
        };
        filter.mask_trailing_bits();
        filter
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn bit(&self, index: usize) -> bool {
        let mask = 1u64 << (index % WORD_BITS);
        (self.words[index / WORD_BITS] & mask) != 0
    }

    fn check_same_len(&self, other: &Filter) -> Result<(), Error> {
        if self.num_bits == other.num_bits {
            Ok(())
        } else {
            Err(Error::length_mismatch("filter", self.num_bits, other.num_bits))
        }
    }

    /// Combines two filters of equal length word by word. Any `op` that maps
    /// two zero bits to zero keeps the trailing bits cleared.
    fn zip_words(&self, other: &Filter, op: impl Fn(u64, u64) -> u64) -> Filter {
        Filter {
            num_bits: self.num_bits,
            words: self
                .words
                .iter()
                .zip(&other.words)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        }
    }

    /// Clears the excess bits in the last word.
    fn mask_trailing_bits(&mut self) {
        let excess_bits = self.num_bits % WORD_BITS;
        if excess_bits != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << excess_bits) - 1;
            }
        }
    }

    fn assert_same_len(&self, other: &Filter) {
        assert_eq!(
            self.num_bits, other.num_bits,
            "Cannot combine filters of different lengths"
        );
    }
}

// ============================================================================
// Construction
// ============================================================================

impl FromIterator<bool> for Filter {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut words = Vec::with_capacity(iter.size_hint().0.div_ceil(WORD_BITS));
        let mut num_bits = 0;
        for bit in iter {
            if num_bits % WORD_BITS == 0 {
                words.push(0);
            }
            if bit {
                if let Some(last) = words.last_mut() {
                    *last |= 1u64 << (num_bits % WORD_BITS);
                }
            }
            num_bits += 1;
        }
        Filter { num_bits, words }
    }
}

impl From<&[bool]> for Filter {
    fn from(bits: &[bool]) -> Self {
        bits.iter().copied().collect()
    }
}

impl From<Vec<bool>> for Filter {
    fn from(bits: Vec<bool>) -> Self {
        bits.into_iter().collect()
    }
}

// ============================================================================
// Operators
// ============================================================================
//
// The operators panic on filters of different lengths; the named methods
// above return the error instead.

impl BitAnd for &Filter {
    type Output = Filter;

    fn bitand(self, rhs: Self) -> Filter {
        self.assert_same_len(rhs);
        self.zip_words(rhs, |a, b| a & b)
    }
}

impl BitAnd for Filter {
    type Output = Filter;

    fn bitand(self, rhs: Self) -> Filter {
        &self & &rhs
    }
}

impl BitOr for &Filter {
    type Output = Filter;

    fn bitor(self, rhs: Self) -> Filter {
        self.assert_same_len(rhs);
        self.zip_words(rhs, |a, b| a | b)
    }
}

impl BitOr for Filter {
    type Output = Filter;

    fn bitor(self, rhs: Self) -> Filter {
        &self | &rhs
    }
}

impl BitXor for &Filter {
    type Output = Filter;

    fn bitxor(self, rhs: Self) -> Filter {
        self.assert_same_len(rhs);
        self.zip_words(rhs, |a, b| a ^ b)
    }
}

impl BitXor for Filter {
    type Output = Filter;

    fn bitxor(self, rhs: Self) -> Filter {
        &self ^ &rhs
    }
}

impl Not for &Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        self.complement()
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        self.complement()
    }
}

impl Index<usize> for Filter {
    type Output = bool;

    fn index(&self, index: usize) -> &bool {
        assert!(
            index < self.num_bits,
            "index {index} out of range for filter of length {}",
            self.num_bits
        );
        if self.bit(index) { &true } else { &false }
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("len", &self.num_bits)
            .field("ones", &self.count_ones())
            .finish()
    }
}

/// Renders the bits in index order, e.g. `0110`.
impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// Iterator over the bits of a [`Filter`], created by [`Filter::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    filter: &'a Filter,
    front: usize,
    back: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.front < self.back {
            let bit = self.filter.bit(self.front);
            self.front += 1;
            Some(bit)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<bool> {
        if self.front < self.back {
            self.back -= 1;
            Some(self.filter.bit(self.back))
        } else {
            None
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Filter {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the indices of the set bits of a [`Filter`], created by
/// [`Filter::ones`].
#[derive(Debug, Clone)]
pub struct Ones<'a> {
    words: &'a [u64],
    word_index: usize,
    /// Unvisited bits of `words[word_index]`.
    current: u64,
    remaining: usize,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.current == 0 {
            self.word_index += 1;
            self.current = *self.words.get(self.word_index)?;
        }
        let offset = self.current.trailing_zeros() as usize;
        self.current &= self.current - 1;
        self.remaining -= 1;
        Some(self.word_index * WORD_BITS + offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Ones<'_> {}

impl FusedIterator for Ones<'_> {}
