use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use objser_reflect::binary::walker::{ABSENT, PRESENT};
use objser_reflect::binary::{BinaryError, Serializer};
use objser_reflect::derive::Reflect;
use objser_reflect::registry::ClassificationFault;
use uuid::Uuid;

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Entry {
    key: String,
    hits: u64,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Journal {
    version: i32,
    title: String,
    note: Option<String>,
    head: Option<Entry>,
    entries: Vec<Entry>,
    stamp: DateTime<Utc>,
    owner: Uuid,
}

fn sample_journal() -> Journal {
    Journal {
        version: 3,
        title: "log".into(),
        note: Some("n".into()),
        head: Some(Entry {
            key: "h".into(),
            hits: 1,
        }),
        entries: vec![
            Entry {
                key: "a".into(),
                hits: 10,
            },
            Entry {
                key: "bc".into(),
                hits: 20,
            },
        ],
        stamp: Utc.with_ymd_and_hms(2020, 2, 29, 0, 0, 0).unwrap(),
        owner: Uuid::from_u128(7),
    }
}

#[test]
fn every_strict_prefix_is_truncated() {
    let serializer = Serializer::new();
    let bytes = serializer.to_vec(&sample_journal()).unwrap();

    for len in 0..bytes.len() {
        let err = serializer.from_slice::<Journal>(&bytes[..len]).unwrap_err();
        assert!(err.is_truncated(), "prefix of {len} bytes: {err}");
    }
    assert_eq!(
        serializer.from_slice::<Journal>(&bytes).unwrap(),
        sample_journal()
    );
}

#[test]
fn stream_reads_values_back_to_back() {
    let serializer = Serializer::new();
    let first = sample_journal();
    let second = Journal::default();

    let mut buf = Vec::new();
    serializer.serialize(&first, &mut buf).unwrap();
    serializer.serialize(&second, &mut buf).unwrap();

    let mut reader = buf.as_slice();
    assert_eq!(serializer.deserialize::<Journal, _>(&mut reader).unwrap(), first);
    assert_eq!(serializer.deserialize::<Journal, _>(&mut reader).unwrap(), second);
    assert!(reader.is_empty());
}

#[test]
fn invalid_presence_marker() {
    let serializer = Serializer::new();
    let mut bytes = serializer.to_vec(&Journal::default()).unwrap();

    // version (4) + title (4) + note (4) puts the `head` marker at 12.
    assert_eq!(bytes[12], ABSENT);
    bytes[12] = 2;
    assert!(matches!(
        serializer.from_slice::<Journal>(&bytes),
        Err(BinaryError::InvalidMarker(2))
    ));
}

#[test]
fn null_for_non_nullable_member() {
    let serializer = Serializer::new();
    let mut bytes = serializer.to_vec(&Journal::default()).unwrap();

    // `title` is a `String`, a `-1` length cannot be stored in it.
    bytes[4..8].copy_from_slice(&(-1_i32).to_le_bytes());
    let err = serializer.from_slice::<Journal>(&bytes).unwrap_err();
    assert!(matches!(
        err,
        BinaryError::UnexpectedNull {
            member: Some("title"),
            ..
        }
    ));
}

#[test]
fn absent_element_in_object_sequence() {
    let serializer = Serializer::new();
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1_i32.to_le_bytes());
    bytes.push(ABSENT);

    assert!(serializer.from_slice::<Vec<Entry>>(&bytes).is_err());
    assert_eq!(
        serializer.from_slice::<Vec<Option<Entry>>>(&bytes).unwrap(),
        vec![None]
    );

    bytes[4] = PRESENT;
    bytes.extend_from_slice(&0_i32.to_le_bytes());
    bytes.extend_from_slice(&5_u64.to_le_bytes());
    assert_eq!(
        serializer.from_slice::<Vec<Entry>>(&bytes).unwrap(),
        vec![Entry {
            key: String::new(),
            hits: 5
        }]
    );
}

#[test]
fn malformed_collection_count() {
    let serializer = Serializer::new();
    let bytes = (-7_i32).to_le_bytes();
    assert!(matches!(
        serializer.from_slice::<Vec<u32>>(&bytes),
        Err(BinaryError::MalformedCollection { count: -7 })
    ));
}

#[test]
fn oversized_count_without_payload_is_truncated() {
    let serializer = Serializer::new();
    let bytes = i32::MAX.to_le_bytes();
    let err = serializer.from_slice::<Vec<u64>>(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn count_past_end_of_stream_is_truncated() {
    let serializer = Serializer::new();
    let mut bytes = 3_i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&2_i32.to_le_bytes());
    bytes.extend_from_slice(b"ok");
    let err = serializer.from_slice::<Vec<String>>(&bytes).unwrap_err();
    assert!(err.is_truncated());
}

#[test]
fn sequence_limit() {
    let serializer = Serializer::builder().max_sequence_len(2).build();
    let bytes = serializer.to_vec(&vec![1_u8, 2, 3]).unwrap();
    assert!(matches!(
        serializer.from_slice::<Vec<u8>>(&bytes),
        Err(BinaryError::MalformedCollection { count: 3 })
    ));
}

#[test]
fn invalid_utf8_string() {
    let serializer = Serializer::new();
    let mut bytes = 2_i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0xC3, 0x28]);
    assert!(matches!(
        serializer.from_slice::<String>(&bytes),
        Err(BinaryError::InvalidUtf8(_))
    ));
}

// -----------------------------------------------------------------------------
// Classification

#[derive(Reflect, Default, Debug)]
#[reflect(default)]
struct WithMap {
    name: String,
    scores: HashMap<String, i32>,
}

#[derive(Reflect, Default, Debug)]
#[reflect(default)]
struct HoldsWithMap {
    ok: u8,
    inner: Option<WithMap>,
}

#[derive(Reflect, Default)]
#[reflect(default)]
struct NullableNumber {
    level: Option<i32>,
}

#[test]
fn classification_fails_before_any_byte() {
    let serializer = Serializer::new();

    let mut buf = Vec::new();
    let err = serializer
        .serialize(&HoldsWithMap::default(), &mut buf)
        .unwrap_err();
    assert!(err.is_classification());
    assert!(buf.is_empty());

    let err = serializer
        .serialize(&vec![WithMap::default()], &mut buf)
        .unwrap_err();
    assert!(err.is_classification());
    assert!(buf.is_empty());

    match serializer.serialize(&NullableNumber::default(), &mut buf) {
        Err(BinaryError::Classification(err)) => {
            assert_eq!(err.member, Some("level"));
            assert!(matches!(err.fault, ClassificationFault::NullableValueType(_)));
        }
        other => panic!("expected a classification error, got {other:?}"),
    }
    assert!(buf.is_empty());
}

#[test]
fn classification_fails_on_read_too() {
    let serializer = Serializer::new();
    let err = serializer.from_slice::<WithMap>(&[0; 16]).unwrap_err();
    assert!(err.is_classification());
}

#[test]
fn failed_classification_is_not_cached() {
    let serializer = Serializer::new();
    assert!(serializer.descriptor::<HoldsWithMap>().is_err());
    assert!(serializer.descriptor::<HoldsWithMap>().is_err());
    assert!(serializer.registry().read().get_with_type_path(
        <HoldsWithMap as objser_reflect::Typed>::type_path()
    ).is_none());
}
