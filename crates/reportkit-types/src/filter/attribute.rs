use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::resource::deserialize_optional_id;

/// Data type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    Date,
    Time,
    GeoPoint,
    /// Also used for types this client doesn't know
    #[default]
    #[serde(other)]
    Text,
}

/// An attribute of a data set, as described by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub id: Option<String>,
    pub name: String,
    /// Stable identifier used in the wire format
    pub code: String,
    #[serde(rename = "type", default)]
    pub attribute_type: AttributeType,
    /// Data set the attribute was loaded from; filled in by the loader
    #[serde(skip)]
    pub data_set_id: Option<String>,
}

/// A value of an attribute. Equality, ordering and hashing only look at the
/// wire `value`; the `label` is for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "RawAttributeValue")]
pub struct AttributeValue {
    pub label: String,
    pub value: String,
}

#[derive(Deserialize)]
struct RawAttributeValue {
    #[serde(default)]
    label: Option<String>,
    value: String,
}

impl From<RawAttributeValue> for AttributeValue {
    fn from(raw: RawAttributeValue) -> Self {
        let label = raw.label.unwrap_or_else(|| raw.value.clone());
        Self {
            label,
            value: raw.value,
        }
    }
}

impl AttributeValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// A value whose label is the value itself.
    pub fn from_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for AttributeValue {}

impl PartialOrd for AttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for AttributeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Stand-in for an attribute known only by its code.
///
/// Lets callers filter without loading attribute metadata first. The name
/// is the code and the type is always [`AttributeType::Text`], so it must
/// not be relied on for type information.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnresolvedAttribute {
    pub data_set_id: String,
    pub code: String,
}

impl UnresolvedAttribute {
    pub fn new(data_set_id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            data_set_id: data_set_id.into(),
            code: code.into(),
        }
    }
}

/// The attribute a filter is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAttribute {
    Resolved(Attribute),
    Unresolved(UnresolvedAttribute),
}

impl FilterAttribute {
    pub fn code(&self) -> &str {
        match self {
            FilterAttribute::Resolved(attribute) => &attribute.code,
            FilterAttribute::Unresolved(attribute) => &attribute.code,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FilterAttribute::Resolved(attribute) => &attribute.name,
            FilterAttribute::Unresolved(attribute) => &attribute.code,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            FilterAttribute::Resolved(attribute) => attribute.id.as_deref(),
            FilterAttribute::Unresolved(_) => None,
        }
    }

    pub fn attribute_type(&self) -> AttributeType {
        match self {
            FilterAttribute::Resolved(attribute) => attribute.attribute_type,
            FilterAttribute::Unresolved(_) => AttributeType::Text,
        }
    }

    pub fn data_set_id(&self) -> Option<&str> {
        match self {
            FilterAttribute::Resolved(attribute) => attribute.data_set_id.as_deref(),
            FilterAttribute::Unresolved(attribute) => Some(attribute.data_set_id.as_str()),
        }
    }
}

impl From<Attribute> for FilterAttribute {
    fn from(attribute: Attribute) -> Self {
        FilterAttribute::Resolved(attribute)
    }
}

impl From<UnresolvedAttribute> for FilterAttribute {
    fn from(attribute: UnresolvedAttribute) -> Self {
        FilterAttribute::Unresolved(attribute)
    }
}
