//! JSON:API request and response envelopes.
//!
//! The backend speaks `{data: {type, id, attributes, relationships}}`
//! envelopes. Write paths always emit camelCase attribute keys; read paths
//! tolerate camelCase or snake_case, handled once per entity by serde
//! aliases on the attribute structs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// A single-resource JSON:API document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<A> {
    /// The primary resource.
    pub data: Resource<A>,

    /// Side-loaded resources requested via `include=`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource<serde_json::Value>>,
}

/// A JSON:API resource object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource<A> {
    /// Resource type, e.g. `"shopping-carts"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Server-assigned identifier; absent on create requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Attribute payload.
    pub attributes: A,

    /// Named relationships to other resources.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

/// A to-one relationship entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// The related resource's identifier.
    pub data: ResourceIdentifier,
}

/// Type/id pair identifying a related resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    /// Related resource type.
    #[serde(rename = "type")]
    pub kind: String,

    /// Related resource id.
    pub id: String,
}

impl<A> Document<A> {
    /// Build a create-request document (no id).
    pub fn create(kind: impl Into<String>, attributes: A) -> Self {
        Self {
            data: Resource {
                kind: kind.into(),
                id: None,
                attributes,
                relationships: BTreeMap::new(),
            },
            included: Vec::new(),
        }
    }

    /// Build an update-request document for an existing resource.
    pub fn update(kind: impl Into<String>, id: impl Into<String>, attributes: A) -> Self {
        Self {
            data: Resource {
                kind: kind.into(),
                id: Some(id.into()),
                attributes,
                relationships: BTreeMap::new(),
            },
            included: Vec::new(),
        }
    }

    /// Attach a to-one relationship to the primary resource.
    #[must_use]
    pub fn with_relationship(
        mut self,
        name: impl Into<String>,
        kind: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        self.data.relationships.insert(
            name.into(),
            Relationship {
                data: ResourceIdentifier {
                    kind: kind.into(),
                    id: id.into(),
                },
            },
        );

        self
    }

    /// Deserialize all included resources of the given type.
    ///
    /// Resources of other types and malformed entries are skipped; the
    /// backend may side-load more than was asked for.
    pub fn included_of<T: DeserializeOwned>(&self, kind: &str) -> Vec<(String, T)> {
        self.included
            .iter()
            .filter(|resource| resource.kind == kind)
            .filter_map(|resource| {
                let id = resource.id.clone()?;
                let attributes = serde_json::from_value(resource.attributes.clone()).ok()?;

                Some((id, attributes))
            })
            .collect()
    }
}
