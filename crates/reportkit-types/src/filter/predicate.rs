use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use super::attribute::{AttributeValue, FilterAttribute};

/// Operations that take no values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoValueOperation {
    Null,
    NotNull,
}

impl NoValueOperation {
    pub fn op(&self) -> &'static str {
        match self {
            NoValueOperation::Null => "NULL",
            NoValueOperation::NotNull => "NOT_NULL",
        }
    }

    pub fn create_filter(self, attribute: impl Into<FilterAttribute>) -> NoValueFilter {
        NoValueFilter {
            operation: self,
            attribute: attribute.into(),
        }
    }
}

/// Operations that match against a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MultiValueOperation {
    In,
    NotIn,
}

impl MultiValueOperation {
    pub fn op(&self) -> &'static str {
        match self {
            MultiValueOperation::In => "IN",
            MultiValueOperation::NotIn => "NOT_IN",
        }
    }

    pub fn create_filter(self, attribute: impl Into<FilterAttribute>) -> MultiValueFilter {
        MultiValueFilter {
            operation: self,
            attribute: attribute.into(),
            values: BTreeSet::new(),
        }
    }
}

/// Any filter operation.
///
/// Use [`NoValueOperation`] or [`MultiValueOperation`] directly when the
/// concrete filter shape matters at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterOperation {
    NoValue(NoValueOperation),
    MultiValue(MultiValueOperation),
}

impl FilterOperation {
    pub const NULL: Self = FilterOperation::NoValue(NoValueOperation::Null);
    pub const NOT_NULL: Self = FilterOperation::NoValue(NoValueOperation::NotNull);
    pub const IN: Self = FilterOperation::MultiValue(MultiValueOperation::In);
    pub const NOT_IN: Self = FilterOperation::MultiValue(MultiValueOperation::NotIn);

    pub fn op(&self) -> &'static str {
        match self {
            FilterOperation::NoValue(operation) => operation.op(),
            FilterOperation::MultiValue(operation) => operation.op(),
        }
    }

    pub fn takes_values(&self) -> bool {
        matches!(self, FilterOperation::MultiValue(_))
    }

    /// Create a filter of the shape matching this operation.
    pub fn create_filter(self, attribute: impl Into<FilterAttribute>) -> Filter {
        match self {
            FilterOperation::NoValue(operation) => operation.create_filter(attribute).into(),
            FilterOperation::MultiValue(operation) => operation.create_filter(attribute).into(),
        }
    }
}

impl From<NoValueOperation> for FilterOperation {
    fn from(operation: NoValueOperation) -> Self {
        FilterOperation::NoValue(operation)
    }
}

impl From<MultiValueOperation> for FilterOperation {
    fn from(operation: MultiValueOperation) -> Self {
        FilterOperation::MultiValue(operation)
    }
}

impl fmt::Display for FilterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.op())
    }
}

/// A `NULL` / `NOT_NULL` filter. Immutable.
#[derive(Debug, Clone)]
pub struct NoValueFilter {
    operation: NoValueOperation,
    attribute: FilterAttribute,
}

impl NoValueFilter {
    pub fn operation(&self) -> NoValueOperation {
        self.operation
    }

    pub fn attribute(&self) -> &FilterAttribute {
        &self.attribute
    }

    pub fn to_json(&self) -> Value {
        filter_node(self.attribute.code(), json!({ "op": self.operation.op() }))
    }
}

/// An `IN` / `NOT_IN` filter.
///
/// The value set is the only mutable part of a filter: it grows through
/// [`add_value`](Self::add_value) and [`add_all`](Self::add_all), and values
/// equal by wire `value` are kept once. A filter shared with another reader
/// can still change until the caller stops adding values.
#[derive(Debug, Clone)]
pub struct MultiValueFilter {
    operation: MultiValueOperation,
    attribute: FilterAttribute,
    values: BTreeSet<AttributeValue>,
}

impl MultiValueFilter {
    pub fn operation(&self) -> MultiValueOperation {
        self.operation
    }

    pub fn attribute(&self) -> &FilterAttribute {
        &self.attribute
    }

    pub fn values(&self) -> &BTreeSet<AttributeValue> {
        &self.values
    }

    pub fn add_value(&mut self, value: AttributeValue) -> &mut Self {
        self.values.insert(value);
        self
    }

    pub fn add_all<I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        self.values.extend(values);
        self
    }

    /// Consuming form of [`add_all`](Self::add_all) for building inline.
    pub fn with_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        self.add_all(values);
        self
    }

    pub fn to_json(&self) -> Value {
        let values: Vec<&str> = self.values.iter().map(|v| v.value.as_str()).collect();
        filter_node(
            self.attribute.code(),
            json!({ "op": self.operation.op(), "values": values }),
        )
    }
}

/// A filter of either shape.
///
/// Equality and hashing are structural: two filters are equal when they
/// serialize to the same JSON.
#[derive(Debug, Clone)]
pub enum Filter {
    NoValue(NoValueFilter),
    MultiValue(MultiValueFilter),
}

impl Filter {
    pub fn operation(&self) -> FilterOperation {
        match self {
            Filter::NoValue(filter) => filter.operation.into(),
            Filter::MultiValue(filter) => filter.operation.into(),
        }
    }

    pub fn attribute(&self) -> &FilterAttribute {
        match self {
            Filter::NoValue(filter) => &filter.attribute,
            Filter::MultiValue(filter) => &filter.attribute,
        }
    }

    /// The value set, for multi-value filters only.
    pub fn values(&self) -> Option<&BTreeSet<AttributeValue>> {
        match self {
            Filter::NoValue(_) => None,
            Filter::MultiValue(filter) => Some(&filter.values),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Filter::NoValue(filter) => filter.to_json(),
            Filter::MultiValue(filter) => filter.to_json(),
        }
    }
}

fn filter_node(code: &str, body: Value) -> Value {
    let mut node = Map::new();
    node.insert(code.to_string(), body);
    Value::Object(node)
}

impl From<NoValueFilter> for Filter {
    fn from(filter: NoValueFilter) -> Self {
        Filter::NoValue(filter)
    }
}

impl From<MultiValueFilter> for Filter {
    fn from(filter: MultiValueFilter) -> Self {
        Filter::MultiValue(filter)
    }
}

macro_rules! structural_identity {
    ($($ty:ty),*) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.to_json() == other.to_json()
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.to_json().to_string().hash(state);
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_json())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.to_json().serialize(serializer)
            }
        }
    )*};
}

structural_identity!(NoValueFilter, MultiValueFilter, Filter);
