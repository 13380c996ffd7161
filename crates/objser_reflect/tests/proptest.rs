use chrono::{DateTime, Utc};
use objser_reflect::access::ByteBuf;
use objser_reflect::binary::Serializer;
use objser_reflect::binary::primitive::{from_ticks, to_ticks};
use objser_reflect::derive::Reflect;
use proptest::prelude::*;
use uuid::Uuid;

const MIN_TICKS: i64 = 0;
const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(default)]
struct Sample {
    flag: bool,
    small: i16,
    count: u32,
    total: i64,
    ratio: f64,
    label: Option<String>,
    blob: ByteBuf,
    id: Uuid,
    at: DateTime<Utc>,
    values: Vec<i32>,
    nested: Option<Vec<String>>,
}

fn datetime() -> impl Strategy<Value = DateTime<Utc>> {
    (MIN_TICKS..=MAX_TICKS).prop_filter_map("representable", from_ticks)
}

prop_compose! {
    fn sample()(
        flag in any::<bool>(),
        small in any::<i16>(),
        count in any::<u32>(),
        total in any::<i64>(),
        ratio in -1.0e12_f64..1.0e12,
        label in proptest::option::of(".{0,16}"),
        blob in proptest::collection::vec(any::<u8>(), 0..32),
        id in any::<u128>(),
        at in datetime(),
        values in proptest::collection::vec(any::<i32>(), 0..16),
        nested in proptest::option::of(proptest::collection::vec("[a-z]{0,4}", 0..4)),
    ) -> Sample {
        Sample {
            flag,
            small,
            count,
            total,
            ratio,
            label,
            blob: ByteBuf(blob),
            id: Uuid::from_u128(id),
            at,
            values,
            nested,
        }
    }
}

proptest! {
    #[test]
    fn samples_survive_a_round_trip(value in sample()) {
        let serializer = Serializer::new();
        let bytes = serializer.to_vec(&value).unwrap();
        let back: Sample = serializer.from_slice(&bytes).unwrap();
        prop_assert_eq!(back, value);
    }

    #[test]
    fn cut_samples_are_truncated(value in sample(), cut in any::<prop::sample::Index>()) {
        let serializer = Serializer::new();
        let bytes = serializer.to_vec(&value).unwrap();
        let len = cut.index(bytes.len());
        let err = serializer.from_slice::<Sample>(&bytes[..len]).unwrap_err();
        prop_assert!(err.is_truncated());
    }

    #[test]
    fn ticks_are_stable(ticks in MIN_TICKS..=MAX_TICKS) {
        let datetime = from_ticks(ticks).unwrap();
        prop_assert_eq!(to_ticks(datetime), Some(ticks));
    }
}
