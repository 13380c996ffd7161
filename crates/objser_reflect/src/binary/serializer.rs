use core::any::type_name;
use core::fmt;

use std::io::{Read, Write};
use std::sync::Arc;

use log::{Level, Log, Record};

use crate::access::{Value, ValueRef};
use crate::binary::{BinaryError, walker};
use crate::info::{TypeDescriptor, ValueKind};
use crate::registry::{ClassificationError, TypeRegistryArc};
use crate::{Field, Typed};

/// The log target of codec failures.
pub const LOG_TARGET: &str = "objser::binary";

// -----------------------------------------------------------------------------
// Limits

/// Upper bounds applied to lengths and counts read from a stream.
///
/// Lengths above a limit fail before anything is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum element count of one sequence.
    pub max_sequence_len: usize,
    /// Maximum byte length of one string or byte sequence.
    pub max_bytes_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_sequence_len: i32::MAX as usize,
            max_bytes_len: i32::MAX as usize,
        }
    }
}

// -----------------------------------------------------------------------------
// SerializerBuilder

/// Used to create a [`Serializer`].
#[derive(Default)]
#[must_use]
pub struct SerializerBuilder {
    registry: Option<TypeRegistryArc>,
    logger: Option<Arc<dyn Log>>,
    limits: Limits,
}

impl SerializerBuilder {
    /// Creates a new [`SerializerBuilder`] instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares an existing descriptor cache.
    ///
    /// If not set, the serializer creates its own empty registry.
    pub fn registry(mut self, registry: TypeRegistryArc) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Reports failures to `logger` instead of the global `log` facade.
    pub fn logger(mut self, logger: Arc<dyn Log>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Override the maximum element count of one sequence.
    pub fn max_sequence_len(mut self, max: usize) -> Self {
        self.limits.max_sequence_len = max;
        self
    }

    /// Override the maximum byte length of one string or byte sequence.
    pub fn max_bytes_len(mut self, max: usize) -> Self {
        self.limits.max_bytes_len = max;
        self
    }

    /// Creates a [`Serializer`] with the configurations.
    pub fn build(self) -> Serializer {
        Serializer {
            registry: self.registry.unwrap_or_default(),
            logger: self.logger,
            limits: self.limits,
        }
    }
}

// -----------------------------------------------------------------------------
// Serializer

/// Binary serializer for registered types.
///
/// Every call touches only the given stream: it is neither flushed, closed
/// nor repositioned. Failures are logged at `error` level under
/// [`LOG_TARGET`] and returned.
///
/// Cloning is cheap and shares the descriptor cache.
///
/// # Examples
///
/// ```
/// use objser_reflect::binary::Serializer;
/// use objser_reflect::derive::Reflect;
///
/// #[derive(Reflect, Default, Debug, PartialEq)]
/// #[reflect(default)]
/// struct Track {
///     number: u16,
///     title: Option<String>,
///     tags: Vec<String>,
/// }
///
/// let serializer = Serializer::new();
/// let track = Track {
///     number: 7,
///     title: None,
///     tags: vec!["live".into()],
/// };
///
/// let bytes = serializer.to_vec(&track).unwrap();
/// assert_eq!(bytes.len(), 2 + 4 + 4 + (4 + 4));
///
/// let back: Track = serializer.from_slice(&bytes).unwrap();
/// assert_eq!(back, track);
/// ```
#[derive(Clone, Default)]
pub struct Serializer {
    registry: TypeRegistryArc,
    logger: Option<Arc<dyn Log>>,
    limits: Limits,
}

impl Serializer {
    /// Creates a serializer with its own registry, default limits and the
    /// global logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a serializer sharing `registry`.
    pub fn with_registry(registry: TypeRegistryArc) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Returns a serializer sharing the registry and limits of `self` that
    /// reports failures to `logger`.
    pub fn with_logger(&self, logger: Arc<dyn Log>) -> Self {
        Self {
            registry: self.registry.clone(),
            logger: Some(logger),
            limits: self.limits,
        }
    }

    /// Creates a [`SerializerBuilder`].
    #[inline]
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::new()
    }

    /// Returns the descriptor cache.
    #[inline]
    pub fn registry(&self) -> &TypeRegistryArc {
        &self.registry
    }

    #[inline]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Returns the descriptor of `T`, building it on first use.
    pub fn descriptor<T: Typed>(&self) -> Result<Arc<TypeDescriptor>, ClassificationError> {
        self.registry.get_or_build::<T>()
    }

    /// Writes `value` into `writer`.
    ///
    /// The type is classified before the first byte is written, a
    /// [`ClassificationError`] leaves `writer` untouched.
    pub fn serialize<T: Field, W: Write + ?Sized>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> Result<(), BinaryError> {
        let result = self.write_root(value, writer);
        self.report(result, "serialize", type_name::<T>())
    }

    /// Reads one `T` from `reader`, consuming exactly its bytes.
    pub fn deserialize<T: Field, R: Read + ?Sized>(&self, reader: &mut R) -> Result<T, BinaryError> {
        let result = self.read_root::<T, R>(reader);
        self.report(result, "deserialize", type_name::<T>())
    }

    /// Serializes `value` into a new buffer.
    pub fn to_vec<T: Field>(&self, value: &T) -> Result<Vec<u8>, BinaryError> {
        let mut buf = Vec::new();
        self.serialize(value, &mut buf)?;
        Ok(buf)
    }

    /// Deserializes a `T` that spans all of `bytes`.
    ///
    /// Bytes left after the value are [`BinaryError::TrailingBytes`].
    pub fn from_slice<T: Field>(&self, bytes: &[u8]) -> Result<T, BinaryError> {
        let mut reader = bytes;
        let value = self.deserialize::<T, _>(&mut reader)?;
        if reader.is_empty() {
            Ok(value)
        } else {
            let err = BinaryError::TrailingBytes {
                remaining: reader.len(),
            };
            self.report(Err(err), "deserialize", type_name::<T>())
        }
    }

    fn write_root<T: Field, W: Write + ?Sized>(
        &self,
        value: &T,
        writer: &mut W,
    ) -> Result<(), BinaryError> {
        let (kind, nullable) = self.registry.classify::<T>()?;
        match (&kind, value.as_value()) {
            // The top-level non-nullable object carries no presence marker.
            (ValueKind::Object(descriptor), ValueRef::Object(instance)) if !nullable => {
                walker::write_object(descriptor, instance, writer)
            }
            (kind, value) => walker::write_value(kind, value, writer),
        }
    }

    fn read_root<T: Field, R: Read + ?Sized>(&self, reader: &mut R) -> Result<T, BinaryError> {
        let (kind, nullable) = self.registry.classify::<T>()?;
        let value = match &kind {
            ValueKind::Object(descriptor) if !nullable => {
                Value::Object(walker::read_object(descriptor, reader, &self.limits)?)
            }
            kind => walker::read_value(kind, reader, &self.limits)?,
        };
        if value.is_null() && !nullable {
            return Err(BinaryError::UnexpectedNull {
                owner: type_name::<T>(),
                member: None,
            });
        }
        Ok(T::from_value(value)?)
    }

    fn report<T>(
        &self,
        result: Result<T, BinaryError>,
        operation: &'static str,
        type_name: &'static str,
    ) -> Result<T, BinaryError> {
        if let Err(err) = &result {
            match &self.logger {
                Some(logger) => logger.log(
                    &Record::builder()
                        .level(Level::Error)
                        .target(LOG_TARGET)
                        .module_path_static(Some(module_path!()))
                        .file_static(Some(file!()))
                        .line(Some(line!()))
                        .args(format_args!("{operation} `{type_name}` failed: {err}"))
                        .build(),
                ),
                None => log::error!(
                    target: LOG_TARGET,
                    "{operation} `{type_name}` failed: {err}"
                ),
            }
        }
        result
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("registry", &self.registry)
            .field("logger", &self.logger.is_some())
            .field("limits", &self.limits)
            .finish()
    }
}
