//! Configuration file layout.
//!
//! A file is an `i32` section count followed by the sections, each written by
//! one top-level serializer call.

use std::fs;
use std::io::Write;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use objser_reflect::binary::{BinaryError, Serializer};
use tempfile::NamedTempFile;

use crate::{ConfigError, ConfigSection};

pub(crate) fn encode(
    serializer: &Serializer,
    sections: &[ConfigSection],
) -> Result<Vec<u8>, ConfigError> {
    let count =
        i32::try_from(sections.len()).map_err(|_| BinaryError::LengthOverflow(sections.len()))?;

    let mut buf = Vec::new();
    buf.write_i32::<LittleEndian>(count).map_err(BinaryError::from)?;
    for section in sections {
        serializer.serialize(section, &mut buf)?;
    }
    Ok(buf)
}

pub(crate) fn decode(
    serializer: &Serializer,
    bytes: &[u8],
) -> Result<Vec<ConfigSection>, ConfigError> {
    let mut reader = bytes;
    let count = reader
        .read_i32::<LittleEndian>()
        .map_err(|e| BinaryError::read(e, "section count"))?;
    if count < 0 {
        return Err(BinaryError::MalformedCollection { count }.into());
    }

    let mut sections = Vec::with_capacity((count as usize).min(64));
    for _ in 0..count {
        sections.push(serializer.deserialize::<ConfigSection, _>(&mut reader)?);
    }

    if !reader.is_empty() {
        return Err(BinaryError::TrailingBytes {
            remaining: reader.len(),
        }
        .into());
    }
    Ok(sections)
}

pub(crate) fn read(path: &Path) -> Result<Vec<u8>, ConfigError> {
    fs::read(path).map_err(ConfigError::io(path))
}

/// Replaces `path` with `bytes` through a temporary file in the same directory.
pub(crate) fn write(path: &Path, bytes: &[u8]) -> Result<(), ConfigError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(ConfigError::io(dir))?;

    let mut file = NamedTempFile::new_in(dir).map_err(ConfigError::io(dir))?;
    let temp_path = file.path().to_owned();
    file.write_all(bytes).map_err(ConfigError::io(&temp_path))?;
    file.as_file().sync_all().map_err(ConfigError::io(temp_path))?;
    file.persist(path).map_err(|err| ConfigError::Io {
        path: path.to_owned(),
        source: err.error,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ConfigSection> {
        let mut audio = ConfigSection::new("audio");
        audio.insert("volume", vec![80]);
        vec![audio, ConfigSection::new("empty")]
    }

    #[test]
    fn layout() {
        let serializer = Serializer::new();
        let bytes = encode(&serializer, &sample()).unwrap();

        let mut expected = 2_i32.to_le_bytes().to_vec();
        // "audio", one entry "volume" = [80]
        expected.extend_from_slice(&5_i32.to_le_bytes());
        expected.extend_from_slice(b"audio");
        expected.extend_from_slice(&1_i32.to_le_bytes());
        expected.push(1);
        expected.extend_from_slice(&6_i32.to_le_bytes());
        expected.extend_from_slice(b"volume");
        expected.extend_from_slice(&1_i32.to_le_bytes());
        expected.push(80);
        // "empty", no entries
        expected.extend_from_slice(&5_i32.to_le_bytes());
        expected.extend_from_slice(b"empty");
        expected.extend_from_slice(&0_i32.to_le_bytes());
        assert_eq!(bytes, expected);

        assert_eq!(decode(&serializer, &bytes).unwrap(), sample());
    }

    #[test]
    fn rejects_bad_counts_and_trailing_bytes() {
        let serializer = Serializer::new();

        let err = decode(&serializer, &(-2_i32).to_le_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Binary(BinaryError::MalformedCollection { count: -2 })
        ));

        let err = decode(&serializer, &[1, 0]).unwrap_err();
        assert!(matches!(err, ConfigError::Binary(ref e) if e.is_truncated()));

        let mut bytes = encode(&serializer, &[]).unwrap();
        bytes.push(0);
        let err = decode(&serializer, &bytes).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Binary(BinaryError::TrailingBytes { remaining: 1 })
        ));
    }

    #[test]
    fn write_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.bin");

        write(&path, b"first").unwrap();
        write(&path, b"second").unwrap();
        assert_eq!(read(&path).unwrap(), b"second");

        let err = read(&dir.path().join("missing.bin")).unwrap_err();
        assert!(err.is_not_found());
    }
}
