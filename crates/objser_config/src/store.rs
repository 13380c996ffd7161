use core::any::type_name;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{Log, Metadata, Record};
use objser_reflect::Field;
use objser_reflect::binary::Serializer;
use objser_task::{Worker, WorkerContext};

use crate::{ConfigError, ConfigSection, LOG_TARGET, file};

// -----------------------------------------------------------------------------
// SerializerReports

// Forwards serializer failures at `debug`. The store reports each failure
// once at its own level.
struct SerializerReports;

impl Log for SerializerReports {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::Level::Error && log::log_enabled!(target: LOG_TARGET, log::Level::Debug)
    }

    fn log(&self, record: &Record<'_>) {
        log::debug!(target: LOG_TARGET, "{}: {}", record.target(), record.args());
    }

    fn flush(&self) {
        log::logger().flush();
    }
}

// -----------------------------------------------------------------------------
// ConfigStore

/// Named, categorized values persisted to one file.
///
/// Every value is kept as the bytes the [`Serializer`] produced for it, so a
/// value is only decoded when it is read back with the same type.
///
/// Reading never fails the caller: a missing or undecodable value yields the
/// supplied default and is logged at `warn`, an unreadable file yields an
/// empty store and is logged at `error`.
///
/// # Examples
///
/// ```
/// use objser_config::ConfigStore;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("settings.bin");
///
/// let mut store = ConfigStore::open(&path);
/// store.set("audio", "volume", &80_u8).unwrap();
/// store.save().unwrap();
///
/// let store = ConfigStore::open(&path);
/// assert_eq!(store.get_or("audio", "volume", 100_u8), 80);
/// assert_eq!(store.get_or("audio", "balance", 0_i8), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    serializer: Serializer,
    sections: Vec<ConfigSection>,
}

impl ConfigStore {
    /// Opens the store at `path` with a default [`Serializer`].
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_serializer(path, Serializer::new())
    }

    /// Opens the store at `path`, encoding values with `serializer`.
    ///
    /// A missing file starts an empty store. Any other load failure is
    /// logged and also starts an empty store.
    ///
    /// The store keeps the registry and limits of `serializer` but reports
    /// failures itself, the serializer's own reports are demoted to `debug`.
    pub fn with_serializer(path: impl Into<PathBuf>, serializer: Serializer) -> Self {
        let mut store = Self {
            path: path.into(),
            serializer: serializer.with_logger(Arc::new(SerializerReports)),
            sections: Vec::new(),
        };

        match store.load() {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                log::debug!(
                    target: LOG_TARGET,
                    "no configuration at `{}`, starting empty",
                    store.path.display()
                );
            }
            Err(err) => {
                log::error!(
                    target: LOG_TARGET,
                    "failed to load configuration, starting empty: {err}"
                );
            }
        }
        store
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    /// Replaces the in-memory values with the content of the file.
    ///
    /// On failure the current values are kept.
    pub fn load(&mut self) -> Result<(), ConfigError> {
        let bytes = file::read(&self.path)?;
        self.sections = file::decode(&self.serializer, &bytes)?;
        Ok(())
    }

    /// Writes every value to the file, replacing it atomically.
    pub fn save(&self) -> Result<(), ConfigError> {
        let bytes = file::encode(&self.serializer, &self.sections)?;
        file::write(&self.path, &bytes)
    }

    /// Saves a snapshot of the current values on the IO task pool.
    ///
    /// Later changes to the store are not part of this save. Aborting the
    /// worker before the file is replaced leaves the old file in place.
    pub fn save_in_background(&self) -> Worker<(), ConfigError> {
        let path = self.path.clone();
        let serializer = self.serializer.clone();
        let sections = self.sections.clone();

        Worker::start(move |ctx: &WorkerContext| {
            let bytes = file::encode(&serializer, &sections)?;
            ctx.report_progress(0.5);
            ctx.checkpoint()?;
            file::write(&path, &bytes)?;
            ctx.report_progress(1.0);
            Ok(())
        })
    }

    /// Reads the value `name` of `category`.
    ///
    /// Returns `Ok(None)` if it is not set.
    pub fn get<T: Field>(&self, category: &str, name: &str) -> Result<Option<T>, ConfigError> {
        let Some(entry) = self.section(category).and_then(|s| s.entry(name)) else {
            return Ok(None);
        };
        Ok(Some(self.serializer.from_slice(&entry.value)?))
    }

    /// Reads the value `name` of `category`, or returns `default`.
    ///
    /// A stored value that cannot be decoded as `T` is logged once at `warn`.
    pub fn get_or<T: Field>(&self, category: &str, name: &str, default: T) -> T {
        match self.get(category, name) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(err) => {
                log::warn!(
                    target: LOG_TARGET,
                    "cannot read `{category}.{name}` as `{}`, using the default: {err}",
                    type_name::<T>()
                );
                default
            }
        }
    }

    /// Stores `value` as `name` of `category`, creating the category on demand.
    ///
    /// Nothing is changed when `value` cannot be serialized.
    pub fn set<T: Field>(&mut self, category: &str, name: &str, value: &T) -> Result<(), ConfigError> {
        let bytes = self.serializer.to_vec(value)?;
        let index = match self.sections.iter().position(|s| s.category == category) {
            Some(index) => index,
            None => {
                self.sections.push(ConfigSection::new(category));
                self.sections.len() - 1
            }
        };
        self.sections[index].insert(name, bytes);
        Ok(())
    }

    /// Removes `name` of `category`, returns `true` if it was set.
    ///
    /// A category left without entries is removed too.
    pub fn remove(&mut self, category: &str, name: &str) -> bool {
        let Some(index) = self.sections.iter().position(|s| s.category == category) else {
            return false;
        };
        let removed = self.sections[index].remove(name).is_some();
        if self.sections[index].entries.is_empty() {
            self.sections.remove(index);
        }
        removed
    }

    pub fn contains(&self, category: &str, name: &str) -> bool {
        self.section(category).is_some_and(|s| s.entry(name).is_some())
    }

    /// Returns the categories in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.category.as_str())
    }

    /// Returns the value names of `category` in insertion order.
    pub fn names<'a>(&'a self, category: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.section(category)
            .into_iter()
            .flat_map(|s| s.entries.iter().map(|e| e.name.as_str()))
    }

    pub fn section(&self, category: &str) -> Option<&ConfigSection> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
