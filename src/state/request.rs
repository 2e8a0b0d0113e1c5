//! Per-operation request state.
//!
//! One tagged state value per operation kind instead of a row of
//! independent booleans, so the UI can disable exactly the control whose
//! request is in flight while the rest stay live.

use std::collections::HashMap;

/// Cart/checkout operations tracked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Fetching the current cart.
    LoadCart,
    /// Adding a product.
    AddItem,
    /// Changing an item quantity.
    UpdateItem,
    /// Removing an item.
    RemoveItem,
    /// Emptying the cart.
    ClearCart,
    /// Converting the cart to an order.
    Checkout,
}

/// Lifecycle of one request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestState {
    /// Nothing in flight and nothing recorded.
    #[default]
    Idle,
    /// A request is in flight.
    Pending,
    /// The last request succeeded.
    Success,
    /// The last request failed with this reason.
    Error(String),
}

const IDLE: RequestState = RequestState::Idle;

/// Request state keyed by operation kind.
#[derive(Debug, Default)]
pub struct OperationTracker {
    states: HashMap<OperationKind, RequestState>,
}

impl OperationTracker {
    /// Current state for an operation; operations never started are idle.
    #[must_use]
    pub fn state(&self, operation: OperationKind) -> &RequestState {
        self.states.get(&operation).unwrap_or(&IDLE)
    }

    /// Whether this operation has a request in flight.
    #[must_use]
    pub fn is_pending(&self, operation: OperationKind) -> bool {
        matches!(self.state(operation), RequestState::Pending)
    }

    /// Mark an operation as in flight.
    pub fn begin(&mut self, operation: OperationKind) {
        self.states.insert(operation, RequestState::Pending);
    }

    /// Mark an operation as succeeded.
    pub fn succeed(&mut self, operation: OperationKind) {
        self.states.insert(operation, RequestState::Success);
    }

    /// Mark an operation as failed.
    pub fn fail(&mut self, operation: OperationKind, reason: impl Into<String>) {
        self.states
            .insert(operation, RequestState::Error(reason.into()));
    }
}
