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

use drip::Filter;
use drip::error::ErrorKind;
use drip::filter;
use drip::predicate::ge;
use drip::predicate::le;
use drip::query;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;

#[test]
fn test_query() {
    let data: Vec<i64> = (0..100).collect();
    let ge25 = Filter::builder(&data).matching(&ge(25)).unwrap();
    let results: Vec<i64> = query(&data, &ge25).unwrap().copied().collect();
    assert_eq!(results, (25..100).collect::<Vec<i64>>());
}

#[test]
fn test_query_without_predicate_round_trips() {
    let data = vec!["b", "a", "d", "c"];
    let all = filter(&data);
    let rows: Vec<&str> = query(&data, &all).unwrap().copied().collect();
    assert_eq!(rows, data);
}

#[test]
fn test_query_preserves_dataset_order() {
    let data: Vec<i64> = vec![9, 1, 8, 2, 7, 3];
    let small = Filter::builder(&data).matching(&le(3)).unwrap();
    let rows: Vec<i64> = query(&data, &small).unwrap().copied().collect();
    assert_eq!(rows, vec![1, 2, 3]);
}

#[test]
fn test_query_yields_references_into_dataset() {
    let data: Vec<String> = vec!["x".to_string(), "y".to_string()];
    let fil = Filter::from(vec![false, true]);
    let row = query(&data, &fil).unwrap().next().unwrap();
    assert!(std::ptr::eq(row, &data[1]));
}

#[test]
fn test_query_is_restartable() {
    let data: Vec<i64> = (0..200).collect();
    let fil = Filter::builder(&data)
        .matching(&|v: &i64| v % 7 == 0)
        .unwrap();

    let mut rows = query(&data, &fil).unwrap();
    assert_that!(rows.len(), eq(29));
    assert_eq!(rows.next(), Some(&0));
    assert_eq!(rows.next(), Some(&7));

    let rest = rows.clone();
    assert_eq!(rows.len(), 27);
    assert_eq!(rows.indices().next(), Some(14));
    assert_eq!(rows.count(), 27);
    assert_eq!(rest.last(), Some(&196));

    // A fresh call starts from the beginning again.
    assert_eq!(query(&data, &fil).unwrap().next(), Some(&0));
}

#[test]
fn test_query_of_empty_selection() {
    let data: Vec<i64> = (0..10).collect();
    let none = Filter::builder(&data).matching(&ge(10)).unwrap();
    let mut rows = query(&data, &none).unwrap();
    assert_eq!(rows.len(), 0);
    assert_eq!(rows.next(), None);
    assert_eq!(rows.next(), None);
}

#[test]
fn test_query_empty_dataset() {
    let data: Vec<i64> = vec![];
    let fil = filter(&data);
    assert_eq!(query(&data, &fil).unwrap().count(), 0);
}

#[test]
fn test_query_length_mismatch() {
    let data: Vec<i64> = (0..10).collect();
    let fil = Filter::all(9);
    let err = query(&data, &fil).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthMismatch);
    assert_that!(err.message(), contains_substring("expected 10, got 9"));
}
