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

use std::error::Error as _;

use csv::ReaderBuilder;
use csv::StringRecord;
use drip::Filter;
use drip::error::Error;
use drip::error::ErrorKind;
use drip::key::Constructor;
use drip::key::Conversion;
use drip::key::FieldKey;
use drip::key::Key;
use drip::key::KeySpec;
use drip::key::Value;
use drip::key::item_keys;
use drip::key::make_key_functions;
use drip::predicate;
use drip::query;
use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;

const FLIGHTS: &str = "\
date,delay,distance,origin,destination
01010001,14,405,MDW,BNA
01010530,-11,370,LAX,SFO
01010540,5,389,ONT,SFO
01010600,-6,389,ONT,SMF
01010605,61,1547,LAS,ORD
";

/// Parses an `MMDDhhmm` flight date into minutes since the start of January.
fn parse_date(value: Value) -> Result<Value, Error> {
    let Some(date) = value.as_str().filter(|s| s.len() == 8) else {
        return Err(Error::new(
            ErrorKind::KeyExtraction,
            format!("not an MMDDhhmm date: {value}"),
        ));
    };
    let part = |range: std::ops::Range<usize>| {
        date[range].parse::<i64>().map_err(|err| {
            Error::new(ErrorKind::KeyExtraction, format!("bad date {date:?}")).set_source(err)
        })
    };
    let (day, hour, minute) = (part(2..4)?, part(4..6)?, part(6..8)?);
    Ok(Value::Int(((day - 1) * 24 + hour) * 60 + minute))
}

const DATE: Constructor = Constructor::new("date", parse_date);

fn flights() -> Vec<StringRecord> {
    ReaderBuilder::new()
        .from_reader(FLIGHTS.as_bytes())
        .records()
        .collect::<Result<_, _>>()
        .unwrap()
}

#[test]
fn test_item_keys_int() {
    let keys = make_key_functions(5);
    let datum = vec!["a", "b", "c", "d", "e"];
    assert_that!(keys.len(), eq(5));
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(k.index(), i);
        assert_eq!(k.conversion(), Conversion::Raw);
        assert_eq!(k.extract(&datum).unwrap(), Value::from(datum[i]));
    }
}

#[test]
fn test_item_keys_three_fields() {
    let row = ["a", "b", "c"];
    let values: Vec<Value> = make_key_functions(3)
        .iter()
        .map(|k| k.extract(&row).unwrap())
        .collect();
    assert_eq!(values, vec![Value::from("a"), Value::from("b"), Value::from("c")]);
}

#[test]
fn test_item_keys_iterable() {
    let keys = make_key_functions(vec![
        Conversion::Int,
        Conversion::Str,
        Conversion::Float,
        Conversion::Bool,
    ]);
    let datum = vec![
        Value::from("42"),
        Value::from(42),
        Value::from("42.0"),
        Value::from(1),
    ];
    assert_eq!(keys[0].extract(&datum).unwrap(), Value::Int(42));
    assert_eq!(keys[1].extract(&datum).unwrap(), Value::from("42"));
    assert_eq!(keys[2].extract(&datum).unwrap(), Value::Float(42.0));
    assert_eq!(keys[3].extract(&datum).unwrap(), Value::Bool(true));
}

#[test]
fn test_key_spec_conversions() {
    assert_eq!(KeySpec::from(2), KeySpec::Count(2));
    assert_eq!(
        KeySpec::from(&[Conversion::Int][..]),
        KeySpec::Typed(vec![Conversion::Int])
    );
    assert!(make_key_functions(0).is_empty());
    assert!(make_key_functions(Vec::<Conversion>::new()).is_empty());
}

#[test]
fn test_static_item_keys() {
    let row = vec!["ONT".to_string(), "-6".to_string()];
    let keys = item_keys(2);
    let origin: String = keys[0].extract(&row).unwrap();
    assert_eq!(origin, "ONT");

    let ints = [3_i64, 4, 5];
    let third: i64 = keys[1].extract(&ints).unwrap();
    assert_eq!(third, 4);

    let err = item_keys(4)[3].extract(&ints).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyExtraction);
    assert_that!(err.message(), contains_substring("out of range"));
}

#[test]
fn test_field_out_of_range() {
    let key = FieldKey::new(2, Conversion::Raw);
    let err = key.extract(&vec!["a", "b"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyExtraction);
    assert_eq!(err.context("index"), Some("2"));
    assert_that!(
        err.message(),
        contains_substring("field index 2 out of range for row with 2 fields")
    );
}

#[test]
fn test_failed_conversion_keeps_source() {
    let key = FieldKey::new(0, Conversion::Int);
    let err = key.extract(&vec!["4.5"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyExtraction);
    assert_eq!(err.context("target"), Some("int"));
    assert!(err.source().is_some());
}

#[test]
fn test_csv_records_as_rows() {
    let data = flights();
    let keys = make_key_functions([
        Conversion::Str,
        Conversion::Int,
        Conversion::Int,
        Conversion::Str,
        Conversion::Str,
    ]);
    let (delay, origin) = (&keys[1], &keys[3]);

    assert_eq!(origin.extract(&data[2]).unwrap(), Value::from("ONT"));
    assert_eq!(delay.extract(&data[3]).unwrap(), Value::Int(-6));

    let from_ont = Filter::builder(&data)
        .matching_by(origin, &predicate::eq(Value::from("ONT")))
        .unwrap();
    let early_from_ont = Filter::builder(&data)
        .refine(&from_ont)
        .matching_by(delay, &predicate::lt(Value::Int(0)))
        .unwrap();

    let rows: Vec<&StringRecord> = query(&data, &early_from_ont).unwrap().collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get(0), Some("01010600"));

    // Raw CSV fields are strings, and keep their static type through item_keys.
    let raw_delay: String = item_keys(2)[1].extract(&data[0]).unwrap();
    assert_eq!(raw_delay, "14");
}

#[test]
fn test_mixed_numeric_keys_compare() {
    let rows = vec![vec!["1.5"], vec!["2"], vec!["3.25"]];
    let keys = make_key_functions([Conversion::Float]);
    let fil = Filter::builder(&rows)
        .matching_by(&keys[0], &predicate::ge(Value::Int(2)))
        .unwrap();
    assert_eq!(fil.to_string(), "011");
}

#[test]
fn test_custom_constructor() {
    let data = flights();
    let keys = make_key_functions([Conversion::Custom(DATE), Conversion::Int]);
    assert_eq!(keys[0].conversion().name(), "date");
    assert_eq!(keys[0].extract(&data[1]).unwrap(), Value::Int(330));

    let morning = Filter::builder(&data)
        .matching_by(&keys[0], &predicate::ge(Value::Int(6 * 60)))
        .unwrap();
    assert_eq!(morning.to_string(), "00011");
}

#[test]
fn test_failing_custom_constructor_is_lazy() {
    let rows = vec![vec!["01010600"], vec!["noon"], vec!["01010605"]];
    let keys = make_key_functions([Conversion::Custom(DATE)]);
    assert_eq!(keys[0].extract(&rows[0]).unwrap(), Value::Int(360));

    let err = keys[0].extract(&rows[1]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyExtraction);
    assert_eq!(err.context("index"), Some("0"));
    assert_eq!(err.context("target"), Some("date"));
    assert_that!(err.message(), contains_substring("not an MMDDhhmm date: noon"));
    assert!(err.source().is_some());

    let err = Filter::builder(&rows)
        .matching_by(&keys[0], &predicate::ge(Value::Int(0)))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::KeyExtraction);

    // Rows excluded by the prior filter never reach the constructor.
    let skip_bad = Filter::from(vec![true, false, true]);
    let fil = Filter::builder(&rows)
        .refine(&skip_bad)
        .matching_by(&keys[0], &predicate::ge(Value::Int(0)))
        .unwrap();
    assert_eq!(fil.to_string(), "101");
}
