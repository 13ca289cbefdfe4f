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

//! Projection of the rows a filter selects.

use std::fmt;
use std::iter::FusedIterator;

use crate::error::Error;
use crate::filter::Filter;
use crate::filter::Ones;

/// Returns a lazy iterator over the rows of `data` selected by `filter`, in
/// dataset order.
///
/// Neither `data` nor `filter` is copied. To iterate again, clone the
/// returned [`Query`] before consuming it or call `query` again.
///
/// # Errors
///
/// Returns [`ErrorKind::LengthMismatch`](crate::error::ErrorKind::LengthMismatch)
/// if the filter's length differs from the dataset's.
///
/// # Examples
///
/// ```
/// use drip::Filter;
/// use drip::predicate::ge;
/// use drip::query;
///
/// let data: Vec<i64> = (0..100).collect();
/// let ge25 = Filter::builder(&data).matching(&ge(25)).unwrap();
///
/// let rows: Vec<i64> = query(&data, &ge25).unwrap().copied().collect();
/// assert_eq!(rows, (25..100).collect::<Vec<i64>>());
/// ```
pub fn query<'a, T>(data: &'a [T], filter: &'a Filter) -> Result<Query<'a, T>, Error> {
    if filter.len() != data.len() {
        return Err(Error::length_mismatch("filter", data.len(), filter.len()));
    }
    Ok(Query {
        data,
        ones: filter.ones(),
    })
}

/// Iterator over the selected rows of a dataset, created by [`query`].
pub struct Query<'a, T> {
    data: &'a [T],
    ones: Ones<'a>,
}

impl<'a, T> Query<'a, T> {
    /// Returns the indices of the rows this query has yet to yield.
    pub fn indices(&self) -> Ones<'a> {
        self.ones.clone()
    }
}

impl<T> Clone for Query<'_, T> {
    fn clone(&self) -> Self {
        Query {
            data: self.data,
            ones: self.ones.clone(),
        }
    }
}

impl<T> fmt::Debug for Query<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("rows", &self.data.len())
            .field("remaining", &self.ones.len())
            .finish()
    }
}

impl<'a, T> Iterator for Query<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let data = self.data;
        self.ones.next().map(|index| &data[index])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ones.size_hint()
    }
}

impl<T> ExactSizeIterator for Query<'_, T> {}

impl<T> FusedIterator for Query<'_, T> {}
