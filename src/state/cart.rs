//! Cart state holder.

use std::{collections::HashSet, sync::Arc};

use thiserror::Error;
use tracing::error;

use crate::{
    domain::{
        carts::{
            CartsApi, CartsApiError,
            models::{Cart, CartItemUpdate, CheckoutPayload, NewCart, NewCartItem},
        },
        orders::models::Order,
    },
    state::{
        notice::Notice,
        request::{OperationKind, OperationTracker, RequestState},
    },
};

/// Errors returned by cart state operations.
#[derive(Debug, Error)]
pub enum CartStateError {
    /// Quantities below 1 are rejected before any request is sent.
    #[error("quantity must be at least 1")]
    QuantityBelowMinimum,

    /// The operation needs a cart that does not exist yet.
    #[error("no active cart")]
    NoActiveCart,

    /// The backend call failed; cart state is unchanged.
    #[error("cart operation failed")]
    Operation(#[source] CartsApiError),
}

/// Single source of truth for the current user's cart.
///
/// Every mutation goes through the backend and then refetches the cart, so
/// totals are always the server's. Failed mutations leave the held cart
/// untouched (stale but consistent) and emit an error [`Notice`].
pub struct CartState {
    carts: Arc<dyn CartsApi>,
    cart: Option<Cart>,
    operations: OperationTracker,
    pending_items: HashSet<String>,
    notices: Vec<Notice>,
}

impl std::fmt::Debug for CartState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartState")
            .field("cart", &self.cart)
            .field("operations", &self.operations)
            .field("pending_items", &self.pending_items)
            .finish_non_exhaustive()
    }
}

impl CartState {
    /// Create an empty state over the given carts service.
    #[must_use]
    pub fn new(carts: Arc<dyn CartsApi>) -> Self {
        Self {
            carts,
            cart: None,
            operations: OperationTracker::default(),
            pending_items: HashSet::new(),
            notices: Vec::new(),
        }
    }

    /// The currently held cart, if one exists.
    #[must_use]
    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    /// Request state for one operation kind.
    #[must_use]
    pub fn operation(&self, kind: OperationKind) -> &RequestState {
        self.operations.state(kind)
    }

    /// Whether this specific item has an update in flight, so the UI can
    /// spin one row without blocking the others.
    #[must_use]
    pub fn is_item_pending(&self, item_id: &str) -> bool {
        self.pending_items.contains(item_id)
    }

    /// Drain accumulated notices for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Fetch the current cart from the backend.
    ///
    /// No cart yet is not an error; the held cart becomes `None`.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure; the previously held cart is
    /// kept.
    pub async fn refresh(&mut self) -> Result<(), CartStateError> {
        self.operations.begin(OperationKind::LoadCart);

        match self.carts.current_cart().await {
            Ok(cart) => {
                self.cart = cart;
                self.operations.succeed(OperationKind::LoadCart);

                Ok(())
            }
            Err(source) => {
                error!("failed to load cart: {source}");
                self.operations.fail(OperationKind::LoadCart, "cart.load_failed");
                self.notices.push(Notice::error("cart.load_failed"));

                Err(CartStateError::Operation(source))
            }
        }
    }

    /// Add a product with quantity 1.
    ///
    /// # Errors
    ///
    /// See [`CartState::add_product`].
    pub async fn add_one(&mut self, product_id: &str) -> Result<(), CartStateError> {
        self.add_product(product_id, 1, None).await
    }

    /// Add a product to the cart, creating the cart lazily on first add.
    ///
    /// On success the cart is refetched so totals reflect the server's
    /// computation.
    ///
    /// # Errors
    ///
    /// Rejects `quantity` of 0 without a network call; otherwise returns
    /// an error on backend failure.
    pub async fn add_product(
        &mut self,
        product_id: &str,
        quantity: u32,
        unit_price: Option<f64>,
    ) -> Result<(), CartStateError> {
        if quantity < 1 {
            return Err(CartStateError::QuantityBelowMinimum);
        }

        self.operations.begin(OperationKind::AddItem);

        let result = self.add_product_inner(product_id, quantity, unit_price).await;

        match &result {
            Ok(()) => {
                self.operations.succeed(OperationKind::AddItem);
                self.notices.push(Notice::success("cart.item_added"));
            }
            Err(source) => {
                error!("failed to add product {product_id}: {source}");
                self.operations.fail(OperationKind::AddItem, "cart.add_failed");
                self.notices.push(Notice::error("cart.add_failed"));
            }
        }

        result
    }

    async fn add_product_inner(
        &mut self,
        product_id: &str,
        quantity: u32,
        unit_price: Option<f64>,
    ) -> Result<(), CartStateError> {
        let cart_id = match &self.cart {
            Some(cart) => cart.id.clone(),
            None => {
                let cart = self
                    .carts
                    .create_cart(NewCart { session_id: None })
                    .await
                    .map_err(CartStateError::Operation)?;

                let id = cart.id.clone();
                self.cart = Some(cart);

                id
            }
        };

        self.carts
            .add_item(NewCartItem {
                cart_id,
                product_id: product_id.to_owned(),
                variant_id: None,
                quantity,
                unit_price,
            })
            .await
            .map_err(CartStateError::Operation)?;

        self.refetch_silently().await;

        Ok(())
    }

    /// Change an item's quantity.
    ///
    /// # Errors
    ///
    /// Rejects `quantity` of 0 before any request is sent; otherwise
    /// returns an error on backend failure, leaving the cart unchanged.
    pub async fn update_item_quantity(
        &mut self,
        item_id: &str,
        quantity: u32,
    ) -> Result<(), CartStateError> {
        if quantity < 1 {
            return Err(CartStateError::QuantityBelowMinimum);
        }

        self.operations.begin(OperationKind::UpdateItem);
        self.pending_items.insert(item_id.to_owned());

        let result = self
            .carts
            .update_item(item_id, CartItemUpdate { quantity })
            .await;

        self.pending_items.remove(item_id);

        match result {
            Ok(_) => {
                self.operations.succeed(OperationKind::UpdateItem);
                self.refetch_silently().await;

                Ok(())
            }
            Err(source) => {
                error!("failed to update item {item_id}: {source}");
                self.operations
                    .fail(OperationKind::UpdateItem, "cart.update_failed");
                self.notices.push(Notice::error("cart.update_failed"));

                Err(CartStateError::Operation(source))
            }
        }
    }

    /// Remove an item. Removing an already-removed item succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure, leaving the cart unchanged.
    pub async fn remove_item(&mut self, item_id: &str) -> Result<(), CartStateError> {
        self.operations.begin(OperationKind::RemoveItem);
        self.pending_items.insert(item_id.to_owned());

        let result = self.carts.remove_item(item_id).await;

        self.pending_items.remove(item_id);

        match result {
            Ok(()) => {
                self.operations.succeed(OperationKind::RemoveItem);
                self.refetch_silently().await;

                Ok(())
            }
            Err(source) => {
                error!("failed to remove item {item_id}: {source}");
                self.operations
                    .fail(OperationKind::RemoveItem, "cart.remove_failed");
                self.notices.push(Notice::error("cart.remove_failed"));

                Err(CartStateError::Operation(source))
            }
        }
    }

    /// Empty the cart. Clearing an absent or already-empty cart succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error on backend failure, leaving the cart unchanged.
    pub async fn clear_all_items(&mut self) -> Result<(), CartStateError> {
        let Some(cart_id) = self.cart.as_ref().map(|cart| cart.id.clone()) else {
            return Ok(());
        };

        self.operations.begin(OperationKind::ClearCart);

        match self.carts.clear_cart(&cart_id).await {
            Ok(()) => {
                self.operations.succeed(OperationKind::ClearCart);
                self.refetch_silently().await;

                Ok(())
            }
            Err(source) => {
                error!("failed to clear cart {cart_id}: {source}");
                self.operations
                    .fail(OperationKind::ClearCart, "cart.clear_failed");
                self.notices.push(Notice::error("cart.clear_failed"));

                Err(CartStateError::Operation(source))
            }
        }
    }

    /// Convert the cart to an order. Navigation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`CartStateError::NoActiveCart`] when nothing is in the
    /// cart, or an error on backend failure with the cart left intact so
    /// the user can retry.
    pub async fn checkout(&mut self, payload: &CheckoutPayload) -> Result<Order, CartStateError> {
        let Some(cart_id) = self.cart.as_ref().map(|cart| cart.id.clone()) else {
            return Err(CartStateError::NoActiveCart);
        };

        self.operations.begin(OperationKind::Checkout);

        match self.carts.checkout_cart(&cart_id, payload).await {
            Ok(order) => {
                self.operations.succeed(OperationKind::Checkout);
                // The backend clears the cart on successful checkout.
                self.cart = None;

                Ok(order)
            }
            Err(source) => {
                error!("checkout failed for cart {cart_id}: {source}");
                self.operations
                    .fail(OperationKind::Checkout, "checkout.failed");
                self.notices.push(Notice::error("checkout.failed"));

                Err(CartStateError::Operation(source))
            }
        }
    }

    /// Refetch after a successful mutation. A failed refetch keeps the
    /// stale cart and logs; the mutation itself already succeeded.
    async fn refetch_silently(&mut self) {
        match self.carts.current_cart().await {
            Ok(cart) => self.cart = cart,
            Err(source) => error!("failed to refresh cart after mutation: {source}"),
        }
    }
}
