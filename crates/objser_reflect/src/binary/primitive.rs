//! Encoding of the fixed primitive kinds.
//!
//! | kind                | encoding                                          |
//! |---------------------|---------------------------------------------------|
//! | integers, floats    | little-endian, native width                       |
//! | bool                | one byte, `0` or `1`                              |
//! | string, bytes       | `i32` length, then the payload; `-1` for null     |
//! | id                  | 16 raw bytes, GUID field order                    |
//! | date/time           | `i64` count of 100 ns ticks since 0001-01-01 UTC  |

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::access::{Value, ValueRef};
use crate::binary::{BinaryError, Limits};
use crate::info::PrimitiveKind;

// -----------------------------------------------------------------------------
// Constants

/// Length and count prefix of an absent value.
pub const NULL_LENGTH: i32 = -1;

/// Ticks per second, one tick is 100 ns.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks at 1970-01-01T00:00:00 UTC.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Ticks at 9999-12-31T23:59:59.9999999 UTC, the largest encodable instant.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

// Cap on speculative allocation for a length read from the stream.
const PREALLOC_LIMIT: usize = 64 * 1024;

// -----------------------------------------------------------------------------
// Ticks

/// Converts a date/time into ticks, truncating sub-tick precision.
///
/// Returns `None` outside `0..=MAX_TICKS` and for leap-second instants,
/// which have no tick of their own.
///
/// ```
/// use chrono::DateTime;
/// use objser_reflect::binary::primitive::{UNIX_EPOCH_TICKS, to_ticks};
///
/// let epoch = DateTime::from_timestamp(0, 0).unwrap();
/// assert_eq!(to_ticks(epoch), Some(UNIX_EPOCH_TICKS));
/// ```
pub fn to_ticks(datetime: DateTime<Utc>) -> Option<i64> {
    let nanos = datetime.timestamp_subsec_nanos();
    if nanos >= NANOS_PER_SECOND {
        return None;
    }
    datetime
        .timestamp()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(i64::from(nanos / 100))?
        .checked_add(UNIX_EPOCH_TICKS)
        .filter(|ticks| (0..=MAX_TICKS).contains(ticks))
}

/// Converts ticks into a date/time.
///
/// Returns `None` outside `0..=MAX_TICKS`.
pub fn from_ticks(ticks: i64) -> Option<DateTime<Utc>> {
    if !(0..=MAX_TICKS).contains(&ticks) {
        return None;
    }
    let since_epoch = ticks - UNIX_EPOCH_TICKS;
    let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = u32::try_from(since_epoch.rem_euclid(TICKS_PER_SECOND) * 100).ok()?;
    DateTime::from_timestamp(secs, nanos)
}

// -----------------------------------------------------------------------------
// Write

/// Writes a length or count prefix.
pub(crate) fn write_len<W: Write + ?Sized>(len: usize, writer: &mut W) -> Result<(), BinaryError> {
    let len = i32::try_from(len).map_err(|_| BinaryError::LengthOverflow(len))?;
    writer.write_i32::<LittleEndian>(len)?;
    Ok(())
}

/// Writes one primitive value of the given kind.
///
/// [`ValueRef::Null`] is accepted for the nullable kinds and written as the
/// `-1` sentinel. Any other mismatch between `kind` and `value` is a
/// [`BinaryError::KindMismatch`] and nothing is written.
///
/// # Examples
///
/// ```
/// use objser_reflect::access::ValueRef;
/// use objser_reflect::binary::primitive::write_primitive;
/// use objser_reflect::info::PrimitiveKind;
///
/// let mut buf = Vec::new();
/// write_primitive(PrimitiveKind::String, ValueRef::String("abc"), &mut buf).unwrap();
/// write_primitive(PrimitiveKind::String, ValueRef::Null, &mut buf).unwrap();
///
/// assert_eq!(buf, [3, 0, 0, 0, b'a', b'b', b'c', 0xFF, 0xFF, 0xFF, 0xFF]);
/// ```
pub fn write_primitive<W: Write + ?Sized>(
    kind: PrimitiveKind,
    value: ValueRef<'_>,
    writer: &mut W,
) -> Result<(), BinaryError> {
    type LE = LittleEndian;

    match (kind, value) {
        (PrimitiveKind::Bool, ValueRef::Bool(v)) => writer.write_u8(u8::from(v))?,
        (PrimitiveKind::I8, ValueRef::I8(v)) => writer.write_i8(v)?,
        (PrimitiveKind::I16, ValueRef::I16(v)) => writer.write_i16::<LE>(v)?,
        (PrimitiveKind::I32, ValueRef::I32(v)) => writer.write_i32::<LE>(v)?,
        (PrimitiveKind::I64, ValueRef::I64(v)) => writer.write_i64::<LE>(v)?,
        (PrimitiveKind::U8, ValueRef::U8(v)) => writer.write_u8(v)?,
        (PrimitiveKind::U16, ValueRef::U16(v)) => writer.write_u16::<LE>(v)?,
        (PrimitiveKind::U32, ValueRef::U32(v)) => writer.write_u32::<LE>(v)?,
        (PrimitiveKind::U64, ValueRef::U64(v)) => writer.write_u64::<LE>(v)?,
        (PrimitiveKind::F32, ValueRef::F32(v)) => writer.write_f32::<LE>(v)?,
        (PrimitiveKind::F64, ValueRef::F64(v)) => writer.write_f64::<LE>(v)?,
        (PrimitiveKind::String, ValueRef::String(v)) => {
            write_len(v.len(), writer)?;
            writer.write_all(v.as_bytes())?;
        }
        (PrimitiveKind::Bytes, ValueRef::Bytes(v)) => {
            write_len(v.len(), writer)?;
            writer.write_all(v)?;
        }
        (PrimitiveKind::String | PrimitiveKind::Bytes, ValueRef::Null) => {
            writer.write_i32::<LE>(NULL_LENGTH)?;
        }
        (PrimitiveKind::Id, ValueRef::Id(v)) => writer.write_all(&v.to_bytes_le())?,
        (PrimitiveKind::DateTime, ValueRef::DateTime(v)) => {
            let ticks = to_ticks(v).ok_or(BinaryError::UnrepresentableDateTime(v))?;
            writer.write_i64::<LE>(ticks)?;
        }
        (kind, value) => {
            return Err(BinaryError::KindMismatch {
                expected: kind.name(),
                found: value.kind_name(),
            });
        }
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// Read

/// Reads a length or count prefix, `None` for the null sentinel.
pub(crate) fn read_len<R: Read + ?Sized>(
    reader: &mut R,
    context: &'static str,
) -> Result<Option<i32>, BinaryError> {
    let len = reader
        .read_i32::<LittleEndian>()
        .map_err(|e| BinaryError::read(e, context))?;
    Ok((len != NULL_LENGTH).then_some(len))
}

fn read_payload<R: Read + ?Sized>(
    reader: &mut R,
    limits: &Limits,
    context: &'static str,
) -> Result<Option<Vec<u8>>, BinaryError> {
    let Some(len) = read_len(reader, context)? else {
        return Ok(None);
    };
    let len = usize::try_from(len).map_err(|_| BinaryError::InvalidLength(len))?;
    if len > limits.max_bytes_len {
        return Err(BinaryError::LimitExceeded {
            len,
            max: limits.max_bytes_len,
        });
    }

    let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    Read::take(&mut *reader, len as u64)
        .read_to_end(&mut buf)
        .map_err(|e| BinaryError::read(e, context))?;
    if buf.len() < len {
        return Err(BinaryError::Truncated { context });
    }
    Ok(Some(buf))
}

/// Reads one primitive value of the given kind.
///
/// The nullable kinds read the `-1` sentinel as [`Value::Null`], never as an
/// empty value.
///
/// # Examples
///
/// ```
/// use objser_reflect::access::Value;
/// use objser_reflect::binary::{BinaryError, Limits, primitive::read_primitive};
/// use objser_reflect::info::PrimitiveKind;
///
/// let limits = Limits::default();
///
/// let value = read_primitive(PrimitiveKind::I16, &mut &[0xFE, 0xFF][..], &limits).unwrap();
/// assert!(matches!(value, Value::I16(-2)));
///
/// let err = read_primitive(PrimitiveKind::I32, &mut &[1, 2][..], &limits).unwrap_err();
/// assert!(matches!(err, BinaryError::Truncated { .. }));
/// ```
pub fn read_primitive<R: Read + ?Sized>(
    kind: PrimitiveKind,
    reader: &mut R,
    limits: &Limits,
) -> Result<Value, BinaryError> {
    type LE = LittleEndian;

    let context = kind.name();
    let eof = |e| BinaryError::read(e, context);

    let value = match kind {
        PrimitiveKind::Bool => match reader.read_u8().map_err(eof)? {
            0 => Value::Bool(false),
            1 => Value::Bool(true),
            b => return Err(BinaryError::InvalidBool(b)),
        },
        PrimitiveKind::I8 => Value::I8(reader.read_i8().map_err(eof)?),
        PrimitiveKind::I16 => Value::I16(reader.read_i16::<LE>().map_err(eof)?),
        PrimitiveKind::I32 => Value::I32(reader.read_i32::<LE>().map_err(eof)?),
        PrimitiveKind::I64 => Value::I64(reader.read_i64::<LE>().map_err(eof)?),
        PrimitiveKind::U8 => Value::U8(reader.read_u8().map_err(eof)?),
        PrimitiveKind::U16 => Value::U16(reader.read_u16::<LE>().map_err(eof)?),
        PrimitiveKind::U32 => Value::U32(reader.read_u32::<LE>().map_err(eof)?),
        PrimitiveKind::U64 => Value::U64(reader.read_u64::<LE>().map_err(eof)?),
        PrimitiveKind::F32 => Value::F32(reader.read_f32::<LE>().map_err(eof)?),
        PrimitiveKind::F64 => Value::F64(reader.read_f64::<LE>().map_err(eof)?),
        PrimitiveKind::String => match read_payload(reader, limits, context)? {
            Some(buf) => Value::String(String::from_utf8(buf).map_err(BinaryError::InvalidUtf8)?),
            None => Value::Null,
        },
        PrimitiveKind::Bytes => match read_payload(reader, limits, context)? {
            Some(buf) => Value::Bytes(buf),
            None => Value::Null,
        },
        PrimitiveKind::Id => {
            let mut bytes = [0_u8; 16];
            reader.read_exact(&mut bytes).map_err(eof)?;
            Value::Id(Uuid::from_bytes_le(bytes))
        }
        PrimitiveKind::DateTime => {
            let ticks = reader.read_i64::<LE>().map_err(eof)?;
            Value::DateTime(from_ticks(ticks).ok_or(BinaryError::InvalidDateTime(ticks))?)
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn encode(kind: PrimitiveKind, value: ValueRef<'_>) -> Vec<u8> {
        let mut buf = Vec::new();
        write_primitive(kind, value, &mut buf).unwrap();
        buf
    }

    fn decode(kind: PrimitiveKind, bytes: &[u8]) -> Result<Value, BinaryError> {
        let mut reader = bytes;
        read_primitive(kind, &mut reader, &Limits::default())
    }

    #[test]
    fn integers_are_little_endian() {
        assert_eq!(encode(PrimitiveKind::I32, ValueRef::I32(-42)), [0xD6, 0xFF, 0xFF, 0xFF]);
        assert_eq!(encode(PrimitiveKind::U16, ValueRef::U16(0x0102)), [0x02, 0x01]);
        assert_eq!(
            encode(PrimitiveKind::I64, ValueRef::I64(i64::MIN)),
            [0, 0, 0, 0, 0, 0, 0, 0x80]
        );
        assert_eq!(encode(PrimitiveKind::F32, ValueRef::F32(1.0)), 1.0_f32.to_le_bytes());
    }

    #[test]
    fn empty_and_null_strings_differ() {
        assert_eq!(encode(PrimitiveKind::String, ValueRef::String("")), [0, 0, 0, 0]);
        assert_eq!(encode(PrimitiveKind::String, ValueRef::Null), [0xFF; 4]);

        assert!(matches!(decode(PrimitiveKind::String, &[0, 0, 0, 0]), Ok(Value::String(s)) if s.is_empty()));
        assert!(matches!(decode(PrimitiveKind::String, &[0xFF; 4]), Ok(Value::Null)));
        assert!(matches!(decode(PrimitiveKind::Bytes, &[0xFF; 4]), Ok(Value::Null)));
    }

    #[test]
    fn bool_rejects_other_bytes() {
        assert!(matches!(decode(PrimitiveKind::Bool, &[1]), Ok(Value::Bool(true))));
        assert!(matches!(decode(PrimitiveKind::Bool, &[2]), Err(BinaryError::InvalidBool(2))));
    }

    #[test]
    fn invalid_lengths() {
        let below_null = (-2_i32).to_le_bytes();
        assert!(matches!(
            decode(PrimitiveKind::String, &below_null),
            Err(BinaryError::InvalidLength(-2))
        ));

        let mut reader = &5_i32.to_le_bytes()[..];
        let limits = Limits {
            max_bytes_len: 4,
            ..Limits::default()
        };
        assert!(matches!(
            read_primitive(PrimitiveKind::Bytes, &mut reader, &limits),
            Err(BinaryError::LimitExceeded { len: 5, max: 4 })
        ));
    }

    #[test]
    fn invalid_utf8_is_reported() {
        let bytes = [2, 0, 0, 0, 0xC3, 0x28];
        assert!(matches!(
            decode(PrimitiveKind::String, &bytes),
            Err(BinaryError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn truncated_payload() {
        let bytes = [3, 0, 0, 0, b'a'];
        assert!(decode(PrimitiveKind::String, &bytes).unwrap_err().is_truncated());
        assert!(decode(PrimitiveKind::Id, &[0; 15]).unwrap_err().is_truncated());
        assert!(decode(PrimitiveKind::U8, &[]).unwrap_err().is_truncated());
    }

    #[test]
    fn id_uses_guid_byte_order() {
        let id = Uuid::from_u128(0x00112233_4455_6677_8899_AABBCCDDEEFF);
        let bytes = encode(PrimitiveKind::Id, ValueRef::Id(id));
        assert_eq!(
            bytes,
            [
                0x33, 0x22, 0x11, 0x00, 0x55, 0x44, 0x77, 0x66, 0x88, 0x99, 0xAA, 0xBB, 0xCC,
                0xDD, 0xEE, 0xFF
            ]
        );
        assert!(matches!(decode(PrimitiveKind::Id, &bytes), Ok(Value::Id(v)) if v == id));
    }

    #[test]
    fn tick_boundaries() {
        let min = Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_ticks(min), Some(0));
        assert_eq!(from_ticks(0), Some(min));

        let max = from_ticks(MAX_TICKS).unwrap();
        assert_eq!(to_ticks(max), Some(MAX_TICKS));
        assert_eq!(max.timestamp_subsec_nanos(), 999_999_900);

        assert_eq!(from_ticks(-1), None);
        assert_eq!(from_ticks(MAX_TICKS + 1), None);

        let too_late = Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(to_ticks(too_late), None);
    }

    #[test]
    fn sub_tick_precision_is_truncated() {
        let precise = DateTime::from_timestamp(0, 123_456_789).unwrap();
        let ticks = to_ticks(precise).unwrap();
        assert_eq!(ticks, UNIX_EPOCH_TICKS + 1_234_567);
        assert_eq!(from_ticks(ticks).unwrap().timestamp_subsec_nanos(), 123_456_700);
    }

    #[test]
    fn leap_second_is_unrepresentable() {
        // 2016-12-31T23:59:60.5Z
        let leap = DateTime::from_timestamp(1_483_228_799, 1_500_000_000).unwrap();
        assert_eq!(to_ticks(leap), None);

        let mut buf = Vec::new();
        let err = write_primitive(PrimitiveKind::DateTime, ValueRef::DateTime(leap), &mut buf)
            .unwrap_err();
        assert!(matches!(err, BinaryError::UnrepresentableDateTime(v) if v == leap));
        assert!(buf.is_empty());
    }

    #[test]
    fn out_of_range_ticks_are_rejected() {
        let bytes = (-5_i64).to_le_bytes();
        assert!(matches!(
            decode(PrimitiveKind::DateTime, &bytes),
            Err(BinaryError::InvalidDateTime(-5))
        ));
    }

    #[test]
    fn kind_mismatch_writes_nothing() {
        let mut buf = Vec::new();
        let err = write_primitive(PrimitiveKind::I32, ValueRef::U8(1), &mut buf).unwrap_err();
        assert!(matches!(err, BinaryError::KindMismatch { expected: "i32", found: "u8" }));
        assert!(buf.is_empty());
    }
}
