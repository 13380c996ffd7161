//! Descriptor-driven traversal of object graphs.
//!
//! An object is the concatenation of its members in declared order, there
//! are no names, tags or lengths on the wire. Members of object kind are
//! preceded by a presence marker, `1` present and `0` absent.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt};

use crate::Reflect;
use crate::access::{Value, ValueRef};
use crate::binary::collection::{read_collection, write_collection};
use crate::binary::primitive::{read_primitive, write_primitive};
use crate::binary::{BinaryError, Limits};
use crate::info::{TypeDescriptor, ValueKind};

/// Marker byte before a present object.
pub const PRESENT: u8 = 1;
/// Marker byte of an absent object.
pub const ABSENT: u8 = 0;

// -----------------------------------------------------------------------------
// Write

/// Writes every member of `instance` in declared order, without a presence marker.
///
/// Bytes written before a failure are not rolled back.
pub fn write_object<W: Write + ?Sized>(
    descriptor: &TypeDescriptor,
    instance: &dyn Reflect,
    writer: &mut W,
) -> Result<(), BinaryError> {
    for member in descriptor.members() {
        let value = member.get(instance).ok_or(BinaryError::TypeMismatch {
            expected: descriptor.type_path(),
            found: instance.reflect_type_path(),
        })?;
        write_value(member.kind(), value, writer)?;
    }
    Ok(())
}

/// Writes one value of the given kind.
///
/// Objects get a presence marker, null objects are the `0` marker alone.
pub fn write_value<W: Write + ?Sized>(
    kind: &ValueKind,
    value: ValueRef<'_>,
    writer: &mut W,
) -> Result<(), BinaryError> {
    match (kind, value) {
        (ValueKind::Primitive(kind), value) => write_primitive(*kind, value, writer),
        (ValueKind::Object(_), ValueRef::Null) => {
            writer.write_u8(ABSENT)?;
            Ok(())
        }
        (ValueKind::Object(descriptor), ValueRef::Object(instance)) => {
            writer.write_u8(PRESENT)?;
            write_object(descriptor, instance, writer)
        }
        (ValueKind::Sequence(element), ValueRef::Null) => write_collection(element, None, writer),
        (ValueKind::Sequence(element), ValueRef::Sequence(sequence)) => {
            write_collection(element, Some(sequence), writer)
        }
        (kind, value) => Err(BinaryError::KindMismatch {
            expected: kind.name(),
            found: value.kind_name(),
        }),
    }
}

// -----------------------------------------------------------------------------
// Read

/// Reads an object without a presence marker.
///
/// A default instance is constructed first, then every member is read and
/// set in declared order.
pub fn read_object<R: Read + ?Sized>(
    descriptor: &TypeDescriptor,
    reader: &mut R,
    limits: &Limits,
) -> Result<Box<dyn Reflect>, BinaryError> {
    let mut instance = descriptor.construct();

    for member in descriptor.members() {
        let value = read_value(member.kind(), reader, limits)?;
        if value.is_null() && !member.is_nullable() {
            return Err(BinaryError::UnexpectedNull {
                owner: descriptor.type_path(),
                member: Some(member.name()),
            });
        }
        member
            .set(&mut *instance, value)
            .map_err(|source| BinaryError::Member {
                owner: descriptor.type_path(),
                member: member.name(),
                source,
            })?;
    }

    Ok(instance)
}

/// Reads one value of the given kind.
///
/// Absent strings, bytes, sequences and objects are returned as [`Value::Null`].
pub fn read_value<R: Read + ?Sized>(
    kind: &ValueKind,
    reader: &mut R,
    limits: &Limits,
) -> Result<Value, BinaryError> {
    match kind {
        ValueKind::Primitive(kind) => read_primitive(*kind, reader, limits),
        ValueKind::Object(descriptor) => {
            let marker = reader
                .read_u8()
                .map_err(|e| BinaryError::read(e, "presence marker"))?;
            match marker {
                ABSENT => Ok(Value::Null),
                PRESENT => read_object(descriptor, reader, limits).map(Value::Object),
                other => Err(BinaryError::InvalidMarker(other)),
            }
        }
        ValueKind::Sequence(element) => Ok(match read_collection(element, reader, limits)? {
            Some(items) => Value::Sequence(items),
            None => Value::Null,
        }),
    }
}
