use objser_reflect::access::ByteBuf;
use objser_reflect::derive::Reflect;

/// One named value, stored as the serialized bytes of the value.
#[derive(Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(default, type_path = "objser_config::ConfigEntry")]
pub struct ConfigEntry {
    pub name: String,
    pub value: ByteBuf,
}

/// The entries of one category, written with a single serializer call.
#[derive(Reflect, Default, Debug, Clone, PartialEq, Eq)]
#[reflect(default, type_path = "objser_config::ConfigSection")]
pub struct ConfigSection {
    pub category: String,
    pub entries: Vec<ConfigEntry>,
}

impl ConfigSection {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(&self, name: &str) -> Option<&ConfigEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Replaces the value of `name`, or appends a new entry.
    pub fn insert(&mut self, name: &str, value: Vec<u8>) {
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.value = ByteBuf(value),
            None => self.entries.push(ConfigEntry {
                name: name.to_owned(),
                value: ByteBuf(value),
            }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ConfigEntry> {
        let index = self.entries.iter().position(|entry| entry.name == name)?;
        Some(self.entries.remove(index))
    }
}
