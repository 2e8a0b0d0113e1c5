//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::addresses::{
        errors::AddressesApiError,
        models::{Address, AddressFields},
    },
    http::ApiClient,
    jsonapi::Document,
};

/// HTTP implementation of [`AddressesApi`].
#[derive(Debug, Clone)]
pub struct HttpAddressesApi {
    api: ApiClient,
}

impl HttpAddressesApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AddressesApi for HttpAddressesApi {
    #[tracing::instrument(name = "addresses.api.create", skip(self, fields), err)]
    async fn create_address(&self, fields: AddressFields) -> Result<Address, AddressesApiError> {
        let body = Document::create("addresses", fields);

        let document: Document<AddressFields> = self.api.post("/addresses", &body).await?;

        Ok(Address {
            id: document.data.id.clone().unwrap_or_default(),
            fields: document.data.attributes,
        })
    }
}

/// Typed access to the address endpoints.
#[automock]
#[async_trait]
pub trait AddressesApi: Send + Sync {
    /// Persist one address record.
    async fn create_address(&self, fields: AddressFields) -> Result<Address, AddressesApiError>;
}
