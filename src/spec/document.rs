//! Raw serde shape of the arch file.
//!
//! These types mirror the YAML keys one to one. They are converted into the
//! annotated [`Specification`](super::Specification) right after decoding and
//! are not used anywhere else.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub workdir: String,
    #[serde(default)]
    pub allow: RawAllow,
    #[serde(default)]
    pub vendors: OrderedMap<RawVendor>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub exclude_files: Vec<String>,
    #[serde(default)]
    pub components: OrderedMap<RawComponent>,
    #[serde(default)]
    pub deps: OrderedMap<RawRules>,
    #[serde(default)]
    pub common_components: Vec<String>,
    #[serde(default)]
    pub common_vendors: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawAllow {
    #[serde(default)]
    pub dep_on_any_vendor: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawVendor {
    #[serde(rename = "in", default)]
    pub import_paths: StringList,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawComponent {
    #[serde(rename = "in", default)]
    pub local_paths: StringList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawRules {
    #[serde(default)]
    pub may_depend_on: Vec<String>,
    #[serde(default)]
    pub can_use: Vec<String>,
    #[serde(default)]
    pub any_project_deps: bool,
    #[serde(default)]
    pub any_vendor_deps: bool,
}

/// A field written either as a single string or as a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    One(String),
    Many(Vec<String>),
}

impl Default for StringList {
    fn default() -> Self {
        StringList::Many(Vec::new())
    }
}

impl StringList {
    /// Normalized list form; a single value becomes a one-element list.
    pub fn items(&self) -> Vec<&str> {
        match self {
            StringList::One(value) => vec![value.as_str()],
            StringList::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Whether the source used list syntax. Decides if item references
    /// carry an index.
    pub fn is_list(&self) -> bool {
        matches!(self, StringList::Many(_))
    }
}

/// String-keyed map that keeps entries in document order.
///
/// Declaration order matters: when two components claim the same path the one
/// declared first wins. Duplicate keys are rejected while decoding.
#[derive(Debug)]
pub struct OrderedMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> OrderedMap<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
            type Value = OrderedMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping with string keys")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedMap::default())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, T)> = Vec::new();
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    if entries.iter().any(|(existing, _)| *existing == key) {
                        return Err(de::Error::custom(format!("duplicate key '{}'", key)));
                    }
                    entries.push((key, value));
                }
                Ok(OrderedMap { entries })
            }
        }

        deserializer.deserialize_any(OrderedMapVisitor(PhantomData))
    }
}

/// Decode the arch file text.
pub fn parse_document(source: &str) -> Result<RawDocument, serde_yaml::Error> {
    if source.trim().is_empty() {
        return Ok(RawDocument::default());
    }
    serde_yaml::from_str(source)
}
