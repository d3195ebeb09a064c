//! Attribute-scoped filter predicates.

pub mod attribute;
pub mod predicate;

pub use attribute::{Attribute, AttributeType, AttributeValue, FilterAttribute, UnresolvedAttribute};
pub use predicate::{
    Filter, FilterOperation, MultiValueFilter, MultiValueOperation, NoValueFilter,
    NoValueOperation,
};
