//! Count-prefixed homogeneous sequences.
//!
//! A sequence is an `i32` element count followed by the elements in
//! iteration order. `-1` marks an absent sequence, `0` an empty one.

use std::io::{Read, Write};

use crate::access::{Sequence, Value};
use crate::binary::primitive::{NULL_LENGTH, read_len, write_len};
use crate::binary::{BinaryError, Limits, walker};
use crate::info::ValueKind;

use byteorder::{LittleEndian, WriteBytesExt};

// Cap on speculative allocation for a count read from the stream.
const PREALLOC_LIMIT: usize = 4096;

/// Writes `sequence` with elements of kind `element`, `None` writes the null count.
///
/// # Examples
///
/// ```
/// use objser_reflect::binary::collection::write_collection;
/// use objser_reflect::info::{PrimitiveKind, ValueKind};
///
/// let kind = ValueKind::Primitive(PrimitiveKind::U8);
/// let mut buf = Vec::new();
///
/// write_collection(&kind, Some(&vec![7_u8, 9]), &mut buf).unwrap();
/// write_collection(&kind, Some(&Vec::<u8>::new()), &mut buf).unwrap();
/// write_collection(&kind, None, &mut buf).unwrap();
///
/// assert_eq!(buf, [2, 0, 0, 0, 7, 9, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]);
/// ```
pub fn write_collection<W: Write + ?Sized>(
    element: &ValueKind,
    sequence: Option<&dyn Sequence>,
    writer: &mut W,
) -> Result<(), BinaryError> {
    let Some(sequence) = sequence else {
        writer.write_i32::<LittleEndian>(NULL_LENGTH)?;
        return Ok(());
    };

    let len = sequence.len();
    write_len(len, writer)?;
    for index in 0..len {
        let item = sequence.item(index).ok_or(BinaryError::KindMismatch {
            expected: "sequence element",
            found: "missing element",
        })?;
        walker::write_value(element, item, writer)?;
    }
    Ok(())
}

/// Reads a sequence with elements of kind `element`, `None` for the null count.
///
/// A negative count other than `-1`, or a count above
/// [`Limits::max_sequence_len`], is [`BinaryError::MalformedCollection`].
/// A stream ending inside the elements is [`BinaryError::Truncated`].
pub fn read_collection<R: Read + ?Sized>(
    element: &ValueKind,
    reader: &mut R,
    limits: &Limits,
) -> Result<Option<Vec<Value>>, BinaryError> {
    let Some(count) = read_len(reader, "collection count")? else {
        return Ok(None);
    };
    let len = match usize::try_from(count) {
        Ok(len) if len <= limits.max_sequence_len => len,
        _ => return Err(BinaryError::MalformedCollection { count }),
    };

    let mut items = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    for _ in 0..len {
        items.push(walker::read_value(element, reader, limits)?);
    }
    Ok(Some(items))
}
