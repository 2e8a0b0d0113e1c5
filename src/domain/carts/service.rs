//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    domain::{
        carts::{
            errors::CartsApiError,
            models::{
                Cart, CartAttributes, CartItem, CartItemAttributes, CartItemUpdate, CartUpdate,
                CheckoutPayload, NewCart, NewCartItem, NewCartItemAttributes,
            },
        },
        orders::models::{Order, OrderAttributes},
    },
    http::ApiClient,
    jsonapi::Document,
};

/// HTTP implementation of [`CartsApi`].
#[derive(Debug, Clone)]
pub struct HttpCartsApi {
    api: ApiClient,
}

impl HttpCartsApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CartsApi for HttpCartsApi {
    #[tracing::instrument(name = "carts.api.current_cart", skip(self), err)]
    async fn current_cart(&self) -> Result<Option<Cart>, CartsApiError> {
        let session_id = self.api.session_id().to_owned();

        let document: Option<Document<CartAttributes>> = self
            .api
            .get_optional(
                "/shopping-carts/current",
                &[("session_id", session_id.as_str())],
            )
            .await?;

        Ok(document.as_ref().map(Cart::from_document))
    }

    #[tracing::instrument(name = "carts.api.create_cart", skip(self, cart), err)]
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsApiError> {
        // Without a session id the backend cannot hand the cart back on
        // the next current-cart lookup; default to this client's session.
        let cart = NewCart {
            session_id: cart
                .session_id
                .or_else(|| Some(self.api.session_id().to_owned())),
        };

        let body = Document::create("shopping-carts", cart);

        let document: Document<CartAttributes> =
            self.api.post("/shopping-carts", &body).await?;

        let cart = Cart::from_document(&document);

        info!(cart_id = %cart.id, "created cart");

        Ok(cart)
    }

    #[tracing::instrument(name = "carts.api.update_cart", skip(self, update), err)]
    async fn update_cart(&self, cart_id: &str, update: CartUpdate) -> Result<Cart, CartsApiError> {
        let body = Document::update("shopping-carts", cart_id, update);

        let document: Document<CartAttributes> = self
            .api
            .patch(&format!("/shopping-carts/{cart_id}"), &body)
            .await?;

        Ok(Cart::from_document(&document))
    }

    #[tracing::instrument(name = "carts.api.clear_cart", skip(self), err)]
    async fn clear_cart(&self, cart_id: &str) -> Result<(), CartsApiError> {
        // Clearing an already-empty or already-gone cart counts as done.
        self.api
            .delete_idempotent(&format!("/shopping-carts/{cart_id}/clear"))
            .await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.api.checkout_cart",
        skip(self, payload),
        fields(cart_id = %cart_id),
        err
    )]
    async fn checkout_cart(
        &self,
        cart_id: &str,
        payload: &CheckoutPayload,
    ) -> Result<Order, CartsApiError> {
        let document: Document<OrderAttributes> = self
            .api
            .post(&format!("/shopping-carts/{cart_id}/checkout"), payload)
            .await?;

        let order = Order::from_document(&document);

        info!(order_id = %order.id, "converted cart to order");

        Ok(order)
    }

    #[tracing::instrument(
        name = "carts.api.add_item",
        skip(self, item),
        fields(cart_id = %item.cart_id, product_id = %item.product_id),
        err
    )]
    async fn add_item(&self, item: NewCartItem) -> Result<CartItem, CartsApiError> {
        let attributes = NewCartItemAttributes {
            quantity: item.quantity,
            unit_price: item.unit_price,
            variant_id: item.variant_id,
        };

        let body = Document::create("cart-items", attributes)
            .with_relationship("shoppingCart", "shopping-carts", item.cart_id)
            .with_relationship("product", "products", item.product_id);

        let document: Document<CartItemAttributes> = self.api.post("/cart-items", &body).await?;

        Ok(item_from_document(document))
    }

    #[tracing::instrument(name = "carts.api.update_item", skip(self), err)]
    async fn update_item(
        &self,
        item_id: &str,
        update: CartItemUpdate,
    ) -> Result<CartItem, CartsApiError> {
        let body = Document::update("cart-items", item_id, update);

        let document: Document<CartItemAttributes> = self
            .api
            .patch(&format!("/cart-items/{item_id}"), &body)
            .await?;

        Ok(item_from_document(document))
    }

    #[tracing::instrument(name = "carts.api.remove_item", skip(self), err)]
    async fn remove_item(&self, item_id: &str) -> Result<(), CartsApiError> {
        // Removing an already-removed item counts as done.
        self.api
            .delete_idempotent(&format!("/cart-items/{item_id}"))
            .await?;

        Ok(())
    }
}

fn item_from_document(document: Document<CartItemAttributes>) -> CartItem {
    let id = document.data.id.clone().unwrap_or_default();

    CartItem::from_attributes(id, document.data.attributes)
}

/// Typed access to the shopping-cart endpoints.
#[automock]
#[async_trait]
pub trait CartsApi: Send + Sync {
    /// Fetch the active cart for this session, `None` when no cart exists
    /// yet.
    async fn current_cart(&self) -> Result<Option<Cart>, CartsApiError>;

    /// Create a cart, typically on first add-to-cart.
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsApiError>;

    /// Patch cart attributes; unset fields are left alone.
    async fn update_cart(&self, cart_id: &str, update: CartUpdate) -> Result<Cart, CartsApiError>;

    /// Remove every item from the cart.
    async fn clear_cart(&self, cart_id: &str) -> Result<(), CartsApiError>;

    /// Convert the cart into an order.
    async fn checkout_cart(
        &self,
        cart_id: &str,
        payload: &CheckoutPayload,
    ) -> Result<Order, CartsApiError>;

    /// Add a product to the cart.
    async fn add_item(&self, item: NewCartItem) -> Result<CartItem, CartsApiError>;

    /// Change an item, currently only its quantity.
    async fn update_item(
        &self,
        item_id: &str,
        update: CartItemUpdate,
    ) -> Result<CartItem, CartsApiError>;

    /// Delete an item from its cart.
    async fn remove_item(&self, item_id: &str) -> Result<(), CartsApiError>;
}
