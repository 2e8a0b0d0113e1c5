//! Checkout sessions service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    domain::checkout::{
        errors::CheckoutApiError,
        models::{
            CheckoutSession, CheckoutSessionAttributes, CheckoutSessionUpdate, NewCheckoutSession,
        },
    },
    http::ApiClient,
    jsonapi::Document,
};

/// HTTP implementation of [`CheckoutApi`].
#[derive(Debug, Clone)]
pub struct HttpCheckoutApi {
    api: ApiClient,
}

impl HttpCheckoutApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CheckoutApi for HttpCheckoutApi {
    #[tracing::instrument(
        name = "checkout.api.create_session",
        skip(self, session),
        fields(cart_id = %session.cart_id),
        err
    )]
    async fn create_session(
        &self,
        session: NewCheckoutSession,
    ) -> Result<CheckoutSession, CheckoutApiError> {
        let cart_id = session.cart_id.clone();

        let body = Document::create("checkout-sessions", session)
            .with_relationship("shoppingCart", "shopping-carts", cart_id);

        let document: Document<CheckoutSessionAttributes> =
            self.api.post("/checkout-sessions", &body).await?;

        let session = CheckoutSession::from_document(&document);

        info!(session_id = %session.id, "created checkout session");

        Ok(session)
    }

    #[tracing::instrument(name = "checkout.api.get_session", skip(self), err)]
    async fn get_session(&self, session_id: &str) -> Result<CheckoutSession, CheckoutApiError> {
        let document: Document<CheckoutSessionAttributes> = self
            .api
            .get(
                &format!("/checkout-sessions/{session_id}"),
                &[("include", "shoppingCart,shippingAddress,billingAddress")],
            )
            .await?;

        Ok(CheckoutSession::from_document(&document))
    }

    #[tracing::instrument(name = "checkout.api.update_session", skip(self, update), err)]
    async fn update_session(
        &self,
        session_id: &str,
        update: CheckoutSessionUpdate,
    ) -> Result<CheckoutSession, CheckoutApiError> {
        let body = Document::update("checkout-sessions", session_id, update);

        let document: Document<CheckoutSessionAttributes> = self
            .api
            .patch(&format!("/checkout-sessions/{session_id}"), &body)
            .await?;

        Ok(CheckoutSession::from_document(&document))
    }
}

/// Typed access to the checkout-session endpoints.
#[automock]
#[async_trait]
pub trait CheckoutApi: Send + Sync {
    /// Create a session bound to a cart. One per checkout attempt.
    async fn create_session(
        &self,
        session: NewCheckoutSession,
    ) -> Result<CheckoutSession, CheckoutApiError>;

    /// Fetch a session with its cart and address relationships included.
    async fn get_session(&self, session_id: &str) -> Result<CheckoutSession, CheckoutApiError>;

    /// Apply a partial update to a session.
    async fn update_session(
        &self,
        session_id: &str,
        update: CheckoutSessionUpdate,
    ) -> Result<CheckoutSession, CheckoutApiError>;
}
