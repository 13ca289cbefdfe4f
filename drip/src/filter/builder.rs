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

use crate::error::Error;
use crate::filter::Filter;
use crate::key::Key;
use crate::predicate::Predicate;

/// Builder for creating and refining [`Filter`]s over a dataset.
///
/// Without a prior filter every row starts out selected. With one, set via
/// [`refine()`](Self::refine), only the rows it selects are tested, so the
/// result never selects a row the prior filter excluded.
///
/// # Examples
///
/// ```
/// use drip::Filter;
/// use drip::predicate::ge;
/// use drip::predicate::lt;
///
/// let data: Vec<i64> = (0..100).collect();
///
/// let base = Filter::builder(&data).build().unwrap();
/// assert_eq!(base.count_ones(), 100);
///
/// let ge25 = Filter::builder(&data).matching(&ge(25)).unwrap();
/// let window = Filter::builder(&data)
///     .refine(&ge25)
///     .matching(&lt(30))
///     .unwrap();
/// assert_eq!(window.ones().collect::<Vec<_>>(), vec![25, 26, 27, 28, 29]);
/// ```
#[derive(Debug)]
pub struct FilterBuilder<'a, T> {
    data: &'a [T],
    prior: Option<&'a Filter>,
}

impl<T> Clone for FilterBuilder<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for FilterBuilder<'_, T> {}

impl<'a, T> FilterBuilder<'a, T> {
    /// Creates a builder over `data` with no prior filter.
    pub fn new(data: &'a [T]) -> Self {
        FilterBuilder { data, prior: None }
    }

    /// Sets the filter to refine.
    ///
    /// The prior filter must have been built from a dataset of the same
    /// length; this is checked when the filter is built.
    pub fn refine(mut self, prior: &'a Filter) -> Self {
        self.prior = Some(prior);
        self
    }

    /// Returns the starting filter without testing any row: a copy of the
    /// prior filter if one was set, otherwise a filter selecting every row.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
    /// if the prior filter's length differs from the dataset's.
    pub fn build(self) -> Result<Filter, Error> {
        self.check_prior()?;
        Ok(match self.prior {
            Some(prior) => prior.clone(),
            None => Filter::all(self.data.len()),
        })
    }

    /// Builds a filter selecting the rows that satisfy `pred`.
    ///
    /// The predicate is applied to each row as a whole. Rows excluded by the
    /// prior filter are not tested.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
    /// if the prior filter's length differs from the dataset's, or the first
    /// error returned by `pred`.
    pub fn matching<P>(self, pred: &P) -> Result<Filter, Error>
    where
        P: Predicate<T> + ?Sized,
    {
        self.refine_rows(|row| pred.test(row))
    }

    /// Builds a filter selecting the rows whose `key` satisfies `pred`.
    ///
    /// Rows excluded by the prior filter are passed to neither `key` nor
    /// `pred`, so they may hold data the key cannot extract.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
    /// if the prior filter's length differs from the dataset's, or the first
    /// error returned by `key` or `pred`.
    ///
    /// # Examples
    ///
    /// ```
    /// use drip::Filter;
    /// use drip::key::Value;
    /// use drip::key::make_key_functions;
    /// use drip::key::Conversion;
    /// use drip::predicate::gt;
    ///
    /// let rows = vec![
    ///     vec!["ONT", "-6"],
    ///     vec!["SFO", "12"],
    ///     vec!["LAX", "31"],
    /// ];
    /// let keys = make_key_functions([Conversion::Str, Conversion::Int]);
    /// let delayed = Filter::builder(&rows)
    ///     .matching_by(&keys[1], &gt(Value::Int(10)))
    ///     .unwrap();
    /// assert_eq!(delayed.to_string(), "011");
    /// ```
    pub fn matching_by<K, P>(self, key: &K, pred: &P) -> Result<Filter, Error>
    where
        K: Key<T> + ?Sized,
        P: Predicate<K::Output> + ?Sized,
    {
        self.refine_rows(|row| {
            let value = key.extract(row)?;
            pred.test(&value)
        })
    }

    fn check_prior(&self) -> Result<(), Error> {
        match self.prior {
            Some(prior) if prior.len() != self.data.len() => Err(Error::length_mismatch(
                "prior filter",
                self.data.len(),
                prior.len(),
            )),
            _ => Ok(()),
        }
    }

    /// Tests the selected rows in index order, stopping at the first error.
    fn refine_rows<F>(self, mut test: F) -> Result<Filter, Error>
    where
        F: FnMut(&T) -> Result<bool, Error>,
    {
        self.check_prior()?;

        let len = self.data.len();
        let mut refined = Filter::none(len);
        let mut tested = 0;
        let mut kept = 0;
        let mut visit = |index: usize| -> Result<(), Error> {
            tested += 1;
            if test(&self.data[index])? {
                refined.set(index);
                kept += 1;
            }
            Ok(())
        };

        match self.prior {
            Some(prior) => prior.ones().try_for_each(&mut visit)?,
            None => (0..len).try_for_each(&mut visit)?,
        }

        log::debug!("refined filter over {len} rows: tested {tested}, kept {kept}");
        Ok(refined)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_excluded_rows_are_not_tested() {
        let data: Vec<u32> = (0..10).collect();
        let evens = Filter::builder(&data)
            .matching(&|v: &u32| v % 2 == 0)
            .unwrap();

        let calls = Cell::new(0);
        let refined = Filter::builder(&data)
            .refine(&evens)
            .matching(&|v: &u32| {
                assert_eq!(v % 2, 0, "odd row {v} was tested");
                calls.set(calls.get() + 1);
                true
            })
            .unwrap();

        assert_eq!(calls.get(), 5);
        assert_eq!(refined, evens);
    }

    #[test]
    fn test_mismatched_prior_is_rejected_before_testing() {
        let data = [1, 2, 3];
        let prior = Filter::all(4);
        let calls = Cell::new(0);
        let err = Filter::builder(&data)
            .refine(&prior)
            .matching(&|_: &i32| {
                calls.set(calls.get() + 1);
                true
            })
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        assert_eq!(err.context("expected"), Some("3"));
        assert_eq!(err.context("actual"), Some("4"));
        assert_eq!(calls.get(), 0);
    }
}
