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

//! # drip
//!
//! A library for exploring multivariate datasets held in memory.
//!
//! Rows are selected with bitmask [`Filter`]s: one bit per row of a dataset.
//! Filters are built from a key function and a predicate, refined by further
//! predicates, combined with `&`, `|`, `^` and `!`, and finally projected back
//! into rows with [`query`].
//!
//! ```rust
//! use drip::Filter;
//! use drip::key::Conversion;
//! use drip::key::Value;
//! use drip::key::make_key_functions;
//! use drip::predicate::eq;
//! use drip::predicate::gt;
//! use drip::query;
//!
//! // date, delay, origin
//! let flights = vec![
//!     vec!["2001-01-01", "-6", "ONT"],
//!     vec!["2001-01-01", "14", "SFO"],
//!     vec!["2001-01-02", "45", "ONT"],
//! ];
//! let keys = make_key_functions([Conversion::Str, Conversion::Int, Conversion::Str]);
//! let (delay, origin) = (&keys[1], &keys[2]);
//!
//! let late = Filter::builder(&flights)
//!     .matching_by(delay, &gt(Value::Int(0)))
//!     .unwrap();
//! let late_from_ont = Filter::builder(&flights)
//!     .refine(&late)
//!     .matching_by(origin, &eq(Value::from("ONT")))
//!     .unwrap();
//!
//! let rows: Vec<_> = query(&flights, &late_from_ont).unwrap().collect();
//! assert_eq!(rows, vec![&flights[2]]);
//! ```

pub mod error;
pub mod filter;
pub mod key;
pub mod predicate;
pub mod query;

pub use self::filter::Filter;
pub use self::filter::FilterBuilder;
pub use self::filter::filter;
pub use self::query::query;
