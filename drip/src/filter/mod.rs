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

//! Bitmask filters over in-memory datasets.
//!
//! A [`Filter`] holds one bit per row of the dataset it was built from.
//! Filters are built, and refined, with a [`FilterBuilder`]; refinement only
//! ever clears bits. Filters built from datasets of the same length combine
//! with `&`, `|`, `^` and `!`.
//!
//! # Usage
//!
//! ```rust
//! use drip::filter;
//! use drip::Filter;
//! use drip::predicate::ge;
//!
//! let data: Vec<i64> = (0..100).collect();
//!
//! let everything = filter(&data);
//! assert_eq!(everything.count_ones(), 100);
//!
//! let ge25 = Filter::builder(&data).matching(&ge(25)).unwrap();
//! assert_eq!(ge25.count_ones(), 75);
//! assert!(ge25.is_subset(&everything));
//! ```
//!
//! # Notes
//!
//! - A filter only makes sense next to the dataset it was built from. Do not
//!   resize a dataset between filter operations meant to be combined.
//! - Building never evaluates keys or predicates on rows the prior filter
//!   excludes.

mod bitmask;
mod builder;

pub use self::bitmask::Filter;
pub use self::bitmask::Iter;
pub use self::bitmask::Ones;
pub use self::builder::FilterBuilder;

/// Returns a filter selecting every row of `data`.
///
/// This is the starting point for refinement and the identity of `&`.
pub fn filter<T>(data: &[T]) -> Filter {
    Filter::all(data.len())
}
