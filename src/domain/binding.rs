// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed binding of namespaced keys.
//!
//! A [`TypedConfigurationBundle`] is a read-only snapshot of every key found
//! under a prefix. Field names are derived from the remaining key segments:
//! `bootiful.some-field`, `bootiful.some_field` and `bootiful.someField` all
//! bind to the field `some_field`. Further dots create nested groups.
//!
//! Bundles can be deserialized into any serde type. Scalars are parsed with
//! `FromStr`, comma separated values or indexed keys (`list.0`, `list.1`)
//! fill sequences, and a missing required field is reported as
//! [`ConfigError::MissingRequiredField`].

use crate::domain::config_key::relaxed_name;
use crate::domain::{ConfigError, ConfigKey, ConfigValue, Result};
use serde::de::value::{BorrowedStrDeserializer, StrDeserializer};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use std::collections::BTreeMap;
use std::fmt;

/// A type bound from all keys under a fixed prefix.
///
/// # Examples
///
/// ```
/// use bootcfg::domain::ConfigurationProperties;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct BootifulProperties {
///     message: String,
/// }
///
/// impl ConfigurationProperties for BootifulProperties {
///     const PREFIX: &'static str = "bootiful";
/// }
/// ```
pub trait ConfigurationProperties: DeserializeOwned {
    /// The key prefix the type binds from, without a trailing dot.
    const PREFIX: &'static str;
}

/// Normalises one key segment into a field name.
///
/// ```
/// use bootcfg::domain::binding::field_name;
///
/// assert_eq!(field_name("some-field"), "some_field");
/// assert_eq!(field_name("someField"), "some_field");
/// assert_eq!(field_name("SOME_FIELD"), "some_field");
/// ```
pub fn field_name(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    let mut prev_lower = false;
    for c in segment.chars() {
        if c == '-' {
            out.push('_');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

fn field_path(key: &ConfigKey) -> String {
    key.segments().map(field_name).collect::<Vec<_>>().join(".")
}

/// Snapshot of the keys under one prefix, keyed by normalised field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedConfigurationBundle {
    prefix: String,
    fields: BTreeMap<String, ConfigValue>,
}

impl TypedConfigurationBundle {
    /// Creates an empty bundle for `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().trim_end_matches('.').to_string(),
            fields: BTreeMap::new(),
        }
    }

    /// The prefix the bundle was collected from.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns `true` when the relative key already has a value.
    pub fn contains(&self, relative: &ConfigKey) -> bool {
        self.fields.contains_key(&field_path(relative))
    }

    /// Stores a value for a key relative to the prefix.
    ///
    /// Returns `false` and keeps the existing value when the field is
    /// already set, so callers feeding sources in priority order get
    /// first-wins semantics.
    pub fn insert(&mut self, relative: &ConfigKey, value: ConfigValue) -> bool {
        let path = field_path(relative);
        if path.is_empty() || self.fields.contains_key(&path) {
            return false;
        }
        self.fields.insert(path, value);
        true
    }

    /// Looks up a field by name; the name is normalised like a key.
    ///
    /// Falls back to relaxed matching, so `max_size` also finds a value
    /// collected from the environment as `max.size`.
    pub fn get(&self, field: &str) -> Option<&ConfigValue> {
        let path = field_path(&ConfigKey::from(field));
        self.fields.get(&path).or_else(|| {
            let relaxed = relaxed_name(&path);
            self.fields
                .iter()
                .find(|(k, _)| relaxed_name(k) == relaxed)
                .map(|(_, v)| v)
        })
    }

    /// Looks up a field that must be present.
    pub fn require(&self, field: &str) -> Result<&ConfigValue> {
        self.get(field)
            .ok_or_else(|| ConfigError::MissingRequiredField {
                prefix: self.prefix.clone(),
                field: field.to_string(),
            })
    }

    /// Iterates over `(field path, value)` pairs in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of bound fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` when nothing was found under the prefix.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Deserializes the bundle into `T`.
    ///
    /// ```
    /// use bootcfg::domain::{ConfigKey, ConfigValue, TypedConfigurationBundle};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Server {
    ///     port: u16,
    ///     tags: Vec<String>,
    /// }
    ///
    /// let mut bundle = TypedConfigurationBundle::new("server");
    /// bundle.insert(&ConfigKey::from("port"), ConfigValue::from("8080"));
    /// bundle.insert(&ConfigKey::from("tags"), ConfigValue::from("a, b"));
    ///
    /// let server: Server = bundle.bind().unwrap();
    /// assert_eq!(server.port, 8080);
    /// assert_eq!(server.tags, vec!["a", "b"]);
    /// ```
    pub fn bind<T: DeserializeOwned>(&self) -> Result<T> {
        let tree = self.tree();
        let root = FieldDeserializer {
            input: Input::Group(&tree),
            key: self.prefix.clone(),
        };
        T::deserialize(root).map_err(|e| e.into_config_error(&self.prefix))
    }

    fn tree(&self) -> BTreeMap<String, Node> {
        let mut root = BTreeMap::new();
        'fields: for (path, value) in &self.fields {
            let segments: Vec<&str> = path.split('.').collect();
            let Some((last, parents)) = segments.split_last() else {
                continue;
            };

            let mut group = &mut root;
            for segment in parents {
                let entry = group
                    .entry(segment.to_string())
                    .or_insert_with(|| Node::Group(BTreeMap::new()));
                if let Node::Value(_) = entry {
                    tracing::debug!(
                        "Key '{}.{}' shadows a scalar with a nested group",
                        self.prefix,
                        path
                    );
                    *entry = Node::Group(BTreeMap::new());
                }
                let Node::Group(children) = entry else {
                    continue 'fields;
                };
                group = children;
            }

            group
                .entry(last.to_string())
                .or_insert_with(|| Node::Value(value.as_string()));
        }
        root
    }
}

#[derive(Debug)]
enum Node {
    Value(String),
    Group(BTreeMap<String, Node>),
}

#[derive(Debug)]
enum BindError {
    Missing(String),
    Config(ConfigError),
    Custom(String),
}

impl BindError {
    fn within(self, segment: &str) -> Self {
        match self {
            BindError::Missing(field) => BindError::Missing(format!("{}.{}", segment, field)),
            other => other,
        }
    }

    fn into_config_error(self, prefix: &str) -> ConfigError {
        match self {
            BindError::Missing(field) => ConfigError::MissingRequiredField {
                prefix: prefix.to_string(),
                field,
            },
            BindError::Config(err) => err,
            BindError::Custom(message) => ConfigError::ParseError {
                message: format!("Failed to bind '{}': {}", prefix, message),
                source: None,
            },
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Missing(field) => write!(f, "missing field '{}'", field),
            BindError::Config(err) => write!(f, "{}", err),
            BindError::Custom(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for BindError {}

impl de::Error for BindError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BindError::Custom(msg.to_string())
    }

    fn missing_field(field: &'static str) -> Self {
        BindError::Missing(field.to_string())
    }
}

#[derive(Clone, Copy)]
enum Input<'de> {
    Value(&'de str),
    Group(&'de BTreeMap<String, Node>),
}

impl<'de> Input<'de> {
    fn of(node: &'de Node) -> Self {
        match node {
            Node::Value(v) => Input::Value(v),
            Node::Group(children) => Input::Group(children),
        }
    }
}

struct FieldDeserializer<'de> {
    input: Input<'de>,
    key: String,
}

impl<'de> FieldDeserializer<'de> {
    fn child(&self, segment: &str, input: Input<'de>) -> Self {
        let key = if self.key.is_empty() {
            segment.to_string()
        } else {
            format!("{}.{}", self.key, segment)
        };
        Self { input, key }
    }

    fn scalar(&self) -> std::result::Result<&'de str, BindError> {
        match self.input {
            Input::Value(v) => Ok(v),
            Input::Group(_) => Err(BindError::Custom(format!(
                "expected a value for '{}', found a nested group",
                self.key
            ))),
        }
    }

    fn parsed<T>(&self) -> std::result::Result<T, BindError>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.scalar()?;
        ConfigValue::from(raw).parse(&self.key).map_err(BindError::Config)
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
                visitor.$visit(self.parsed::<$ty>()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for FieldDeserializer<'de> {
    type Error = BindError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
        let input = self.input;
        match input {
            Input::Value(v) => visitor.visit_borrowed_str(v),
            Input::Group(children) => visitor.visit_map(GroupAccess::new(self, children)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
        let raw = self.scalar()?;
        let flag = ConfigValue::from(raw)
            .as_bool(&self.key)
            .map_err(BindError::Config)?;
        visitor.visit_bool(flag)
    }

    deserialize_parsed! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
        deserialize_char => visit_char(char),
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
        let input = self.input;
        match input {
            Input::Value(v) if v.is_empty() => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
        let items: Vec<FieldDeserializer<'de>> = match self.input {
            Input::Value(v) if v.trim().is_empty() => Vec::new(),
            Input::Value(v) => v
                .split(',')
                .enumerate()
                .map(|(i, part)| self.child(&i.to_string(), Input::Value(part.trim())))
                .collect(),
            Input::Group(children) => {
                let mut indexed = Vec::with_capacity(children.len());
                for (segment, node) in children {
                    let index = segment.parse::<usize>().map_err(|_| {
                        BindError::Custom(format!(
                            "expected indexed keys under '{}', found '{}'",
                            self.key, segment
                        ))
                    })?;
                    indexed.push((index, self.child(segment, Input::of(node))));
                }
                indexed.sort_by_key(|(index, _)| *index);
                indexed.into_iter().map(|(_, item)| item).collect()
            }
        };
        visitor.visit_seq(ItemsAccess {
            items: items.into_iter(),
        })
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
        let input = self.input;
        match input {
            Input::Group(children) => visitor.visit_map(GroupAccess::new(self, children)),
            Input::Value(_) => Err(BindError::Custom(format!(
                "expected a nested group for '{}', found a value",
                self.key
            ))),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        let input = self.input;
        match input {
            Input::Group(children) => {
                visitor.visit_map(GroupAccess::for_struct(self, children, fields))
            }
            Input::Value(_) => self.deserialize_map(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        let raw = self.scalar()?;
        let variant: StrDeserializer<'de, BindError> = raw.trim().into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> std::result::Result<V::Value, BindError> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        visitor.visit_unit()
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> std::result::Result<V::Value, BindError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i128 u128 str string bytes byte_buf identifier
    }
}

struct GroupAccess<'de> {
    parent: FieldDeserializer<'de>,
    entries: std::vec::IntoIter<(&'de str, &'de Node)>,
    pending: Option<(&'de str, &'de Node)>,
}

impl<'de> GroupAccess<'de> {
    fn new(parent: FieldDeserializer<'de>, children: &'de BTreeMap<String, Node>) -> Self {
        let entries: Vec<_> = children.iter().map(|(k, v)| (k.as_str(), v)).collect();
        Self {
            parent,
            entries: entries.into_iter(),
            pending: None,
        }
    }

    /// Like [`new`](Self::new), plus an entry for every expected field that
    /// is only present under a relaxed spelling such as `max.size` for
    /// `max_size`.
    fn for_struct(
        parent: FieldDeserializer<'de>,
        children: &'de BTreeMap<String, Node>,
        fields: &'static [&'static str],
    ) -> Self {
        let mut entries: Vec<(&'de str, &'de Node)> =
            children.iter().map(|(k, v)| (k.as_str(), v)).collect();
        for field in fields {
            if children.contains_key(*field) {
                continue;
            }
            if let Some(node) = find_relaxed(children, &relaxed_name(field)) {
                tracing::trace!("Field '{}' bound through relaxed name", field);
                entries.push((*field, node));
            }
        }
        Self {
            parent,
            entries: entries.into_iter(),
            pending: None,
        }
    }
}

/// Finds the node whose dotted path under `children` has the relaxed form
/// `target`.
fn find_relaxed<'de>(children: &'de BTreeMap<String, Node>, target: &str) -> Option<&'de Node> {
    children.iter().find_map(|(segment, node)| {
        let relaxed = relaxed_name(segment);
        if relaxed == target {
            return Some(node);
        }
        match node {
            Node::Group(nested) => target
                .strip_prefix(relaxed.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(|rest| find_relaxed(nested, rest)),
            Node::Value(_) => None,
        }
    })
}

impl<'de> de::MapAccess<'de> for GroupAccess<'de> {
    type Error = BindError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> std::result::Result<Option<K::Value>, BindError> {
        match self.entries.next() {
            Some((segment, node)) => {
                self.pending = Some((segment, node));
                seed.deserialize(BorrowedStrDeserializer::new(segment))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<S: DeserializeSeed<'de>>(
        &mut self,
        seed: S,
    ) -> std::result::Result<S::Value, BindError> {
        let (segment, node) = self
            .pending
            .take()
            .ok_or_else(|| BindError::Custom("value requested before key".to_string()))?;
        seed.deserialize(self.parent.child(segment, Input::of(node)))
            .map_err(|e| e.within(segment))
    }
}

struct ItemsAccess<'de> {
    items: std::vec::IntoIter<FieldDeserializer<'de>>,
}

impl<'de> de::SeqAccess<'de> for ItemsAccess<'de> {
    type Error = BindError;

    fn next_element_seed<S: DeserializeSeed<'de>>(
        &mut self,
        seed: S,
    ) -> std::result::Result<Option<S::Value>, BindError> {
        self.items.next().map(|item| seed.deserialize(item)).transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}
