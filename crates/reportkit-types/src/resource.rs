//! Resource elements returned by list and detail endpoints.
//!
//! Only the fields needed for listing and lookup are modelled; anything else
//! the server sends is ignored.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// An element with a unique ID. This can be the element's own ID or the ID
/// of the resource it points to.
pub trait IdElement {
    fn id(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "owner")]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub last_change: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub last_change: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSetInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "owner")]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub last_change: Option<String>,
}

/// A comment posted to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub author_id: Option<String>,
    #[serde(default, rename = "author")]
    pub author_name: Option<String>,
    pub text: String,
    #[serde(default, rename = "when")]
    pub posted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserInfo {
    /// First and last name joined by a space, falling back to the username.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            self.username.clone()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

macro_rules! impl_id_element {
    ($($ty:ty),*) => {$(
        impl IdElement for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        }
    )*};
}

impl_id_element!(
    ReportInfo,
    DashboardInfo,
    DataSetInfo,
    Comment,
    DomainInfo,
    UserInfo,
    UserGroup
);

// The server sends IDs as strings for some resources and as numbers for others.
fn id_from_value<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(id) => Ok(Some(id)),
        Value::Number(id) => Ok(Some(id.to_string())),
        other => Err(E::custom(format!("expected string or number ID, got {other}"))),
    }
}

pub(crate) fn deserialize_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<String, D::Error> {
    id_from_value::<D::Error>(Value::deserialize(deserializer)?)?
        .ok_or_else(|| serde::de::Error::custom("ID may not be null"))
}

pub(crate) fn deserialize_optional_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    id_from_value(Value::deserialize(deserializer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids() {
        let report: ReportInfo =
            serde_json::from_value(json!({"id": 31, "name": "Sales", "owner": "Jane"})).unwrap();
        assert_eq!(report.id(), "31");
        assert_eq!(report.owner_name.as_deref(), Some("Jane"));

        let dashboard: DashboardInfo =
            serde_json::from_value(json!({"id": "d-9", "name": "Overview"})).unwrap();
        assert_eq!(dashboard.id(), "d-9");
        assert_eq!(dashboard.last_change, None);
    }

    #[test]
    fn test_null_id_is_rejected() {
        let result: Result<DataSetInfo, _> =
            serde_json::from_value(json!({"id": null, "name": "Orders"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_comment_fields() {
        let comment: Comment = serde_json::from_value(json!({
            "id": 5,
            "authorId": 12,
            "author": "Bob",
            "text": "Numbers look off",
            "when": "Tue, 3 Sep 2024 10:00:00 GMT"
        }))
        .unwrap();
        assert_eq!(comment.author_id.as_deref(), Some("12"));
        assert_eq!(comment.author_name.as_deref(), Some("Bob"));
        assert_eq!(comment.posted_at.as_deref(), Some("Tue, 3 Sep 2024 10:00:00 GMT"));
    }

    #[test]
    fn test_user_display_name() {
        let mut user: UserInfo =
            serde_json::from_value(json!({"id": 1, "username": "jdoe", "firstName": "Jane"}))
                .unwrap();
        assert_eq!(user.display_name(), "Jane");

        user.last_name = Some("Doe".to_string());
        assert_eq!(user.display_name(), "Jane Doe");

        user.first_name = None;
        user.last_name = None;
        assert_eq!(user.display_name(), "jdoe");
    }
}
