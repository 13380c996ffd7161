use chrono::{DateTime, TimeZone, Utc};
use objser_reflect::access::ByteBuf;
use objser_reflect::binary::Serializer;
use objser_reflect::derive::Reflect;
use uuid::Uuid;

#[derive(Reflect, Default, Debug, Clone, PartialEq)]
#[reflect(default)]
struct Record {
    int_value: i32,
    name: String,
    tags: Vec<String>,
    id: Uuid,
    created: DateTime<Utc>,
}

fn sample_record() -> Record {
    Record {
        int_value: -42,
        name: "abc".into(),
        tags: vec!["x".into(), "y".into()],
        id: Uuid::from_u128(0x6F62_6A73_6572_0000_0000_0000_0000_0001),
        created: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
    }
}

#[test]
fn record_is_exactly_forty_nine_bytes() {
    let serializer = Serializer::new();
    let record = sample_record();

    let bytes = serializer.to_vec(&record).unwrap();
    assert_eq!(bytes.len(), 4 + 7 + 4 + 5 + 5 + 16 + 8);

    assert_eq!(&bytes[0..4], &(-42_i32).to_le_bytes());
    assert_eq!(&bytes[4..11], &[3, 0, 0, 0, b'a', b'b', b'c']);
    assert_eq!(&bytes[11..15], &2_i32.to_le_bytes());
    assert_eq!(&bytes[15..20], &[1, 0, 0, 0, b'x']);
    assert_eq!(&bytes[20..25], &[1, 0, 0, 0, b'y']);
    assert_eq!(&bytes[25..41], &record.id.to_bytes_le());

    let back: Record = serializer.from_slice(&bytes).unwrap();
    assert_eq!(back, record);
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct AllKinds {
    b: bool,
    i8: i8,
    i16: i16,
    i32: i32,
    i64: i64,
    u8: u8,
    u16: u16,
    u32: u32,
    u64: u64,
    f32: f32,
    f64: f64,
    text: String,
    maybe_text: Option<String>,
    bytes: ByteBuf,
    maybe_bytes: Option<ByteBuf>,
    id: Uuid,
    at: DateTime<Utc>,
    list: Vec<i64>,
    maybe_list: Option<Vec<i64>>,
}

#[test]
fn extreme_values_round_trip() {
    let serializer = Serializer::new();
    let max_time = DateTime::from_timestamp(253_402_300_799, 999_999_900).unwrap();
    let min_time = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();

    let samples = [
        AllKinds::default(),
        AllKinds {
            b: true,
            i8: i8::MIN,
            i16: i16::MIN,
            i32: i32::MIN,
            i64: i64::MIN,
            u8: u8::MAX,
            u16: u16::MAX,
            u32: u32::MAX,
            u64: u64::MAX,
            f32: f32::MIN,
            f64: f64::MAX,
            text: "ünïcødé ✓".into(),
            maybe_text: Some(String::new()),
            bytes: ByteBuf(vec![0, 255, 1]),
            maybe_bytes: Some(ByteBuf::new()),
            id: Uuid::from_u128(u128::MAX),
            at: max_time,
            list: vec![i64::MAX, 0, -1],
            maybe_list: Some(Vec::new()),
        },
        AllKinds {
            i8: -1,
            i16: -1,
            i32: -1,
            i64: -1,
            f32: -0.5,
            f64: f64::MIN_POSITIVE,
            at: min_time,
            maybe_text: None,
            maybe_list: None,
            ..AllKinds::default()
        },
    ];

    for sample in samples {
        let bytes = serializer.to_vec(&sample).unwrap();
        let back: AllKinds = serializer.from_slice(&bytes).unwrap();
        assert_eq!(back, sample);
    }
}

#[test]
fn null_and_empty_are_distinct() {
    let serializer = Serializer::new();

    let empty = AllKinds {
        maybe_text: Some(String::new()),
        maybe_bytes: Some(ByteBuf::new()),
        maybe_list: Some(Vec::new()),
        ..AllKinds::default()
    };
    let null = AllKinds::default();

    let empty_bytes = serializer.to_vec(&empty).unwrap();
    let null_bytes = serializer.to_vec(&null).unwrap();
    assert_eq!(empty_bytes.len(), null_bytes.len());
    assert_ne!(empty_bytes, null_bytes);

    assert_eq!(serializer.from_slice::<AllKinds>(&empty_bytes).unwrap(), empty);
    assert_eq!(serializer.from_slice::<AllKinds>(&null_bytes).unwrap(), null);
}

#[test]
fn sequence_order_is_preserved() {
    let serializer = Serializer::new();
    let words: Vec<String> = ["delta", "alpha", "charlie", "bravo"]
        .into_iter()
        .map(String::from)
        .collect();

    let bytes = serializer.to_vec(&words).unwrap();
    let back: Vec<String> = serializer.from_slice(&bytes).unwrap();
    assert_eq!(back, words);
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Artist {
    name: String,
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Album {
    title: String,
    artist: Artist,
    guest: Option<Artist>,
    credits: Vec<Artist>,
    sessions: Vec<Option<Artist>>,
    discs: Vec<Vec<u8>>,
}

#[test]
fn nested_objects_round_trip() {
    let serializer = Serializer::new();
    let album = Album {
        title: "Seasons".into(),
        artist: Artist {
            name: "Main".into(),
        },
        guest: None,
        credits: vec![
            Artist { name: "A".into() },
            Artist { name: "B".into() },
        ],
        sessions: vec![None, Some(Artist { name: "C".into() })],
        discs: vec![vec![1, 2], vec![]],
    };

    let bytes = serializer.to_vec(&album).unwrap();
    let back: Album = serializer.from_slice(&bytes).unwrap();
    assert_eq!(back, album);
}

#[test]
fn shared_references_are_written_by_value() {
    let serializer = Serializer::new();
    let same = Artist {
        name: "Twin".into(),
    };
    let album = Album {
        credits: vec![
            Artist {
                name: same.name.clone(),
            },
            same,
        ],
        ..Album::default()
    };

    let bytes = serializer.to_vec(&album).unwrap();
    let back: Album = serializer.from_slice(&bytes).unwrap();
    assert_eq!(back.credits[0], back.credits[1]);
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Pair(u8, String);

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Wrapper<T> {
    inner: T,
}

#[test]
fn tuple_and_generic_structs() {
    let serializer = Serializer::new();

    let pair = Pair(9, "nine".into());
    let bytes = serializer.to_vec(&pair).unwrap();
    assert_eq!(bytes, [9, 4, 0, 0, 0, b'n', b'i', b'n', b'e']);
    assert_eq!(serializer.from_slice::<Pair>(&bytes).unwrap(), pair);

    let wrapped = Wrapper { inner: pair };
    let bytes = serializer.to_vec(&wrapped).unwrap();
    assert_eq!(bytes[0], 1, "nested object carries a presence marker");
    assert_eq!(serializer.from_slice::<Wrapper<Pair>>(&bytes).unwrap(), wrapped);

    let descriptor = serializer.descriptor::<Pair>().unwrap();
    assert_eq!(descriptor.index_of("1"), Some(1));
}

#[derive(Reflect, Default, Debug, PartialEq)]
#[reflect(default)]
struct Settings {
    volume: u8,
    #[reflect(ignore)]
    cache: Vec<u8>,
    #[reflect(readonly)]
    revision: u32,
}

#[test]
fn ignored_and_readonly_fields_are_not_encoded() {
    let serializer = Serializer::new();
    let settings = Settings {
        volume: 80,
        cache: vec![1, 2, 3],
        revision: 7,
    };

    let bytes = serializer.to_vec(&settings).unwrap();
    assert_eq!(bytes, [80]);

    let back: Settings = serializer.from_slice(&bytes).unwrap();
    assert_eq!(back, Settings {
        volume: 80,
        ..Settings::default()
    });

    let descriptor = serializer.descriptor::<Settings>().unwrap();
    assert_eq!(descriptor.skipped(), ["revision"]);
}

#[derive(Reflect, Default)]
#[reflect(default, type_path = "demo::Renamed")]
struct Renamed {
    value: u8,
}

#[test]
fn type_path_attribute() {
    let serializer = Serializer::new();
    let descriptor = serializer.descriptor::<Renamed>().unwrap();
    assert_eq!(descriptor.type_path(), "demo::Renamed");

    let descriptor = serializer.descriptor::<Artist>().unwrap();
    assert!(descriptor.type_path().ends_with("::Artist"));
}
