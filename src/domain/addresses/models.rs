//! Address Models

use serde::{Deserialize, Serialize};

/// Address input fields, as collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressFields {
    #[serde(alias = "line_1")]
    pub line1: String,

    #[serde(default, skip_serializing_if = "Option::is_none", alias = "line_2")]
    pub line2: Option<String>,

    pub city: String,

    pub state: String,

    #[serde(alias = "postal_code")]
    pub postal_code: String,

    #[serde(default)]
    pub country: String,
}

/// Persisted address, as returned by the backend.
#[derive(Debug, Clone)]
pub struct Address {
    pub id: String,
    pub fields: AddressFields,
}
