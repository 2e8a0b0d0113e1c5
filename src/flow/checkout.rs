//! Checkout flow orchestration.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    batch::BatchOutcome,
    domain::{
        addresses::{AddressesApi, AddressesApiError, models::{Address, AddressFields}},
        checkout::{
            CheckoutApi, CheckoutApiError,
            models::{CheckoutSession, CheckoutSessionUpdate, NewCheckoutSession, SessionStatus},
        },
        orders::models::Order,
    },
    flow::{
        form::{CheckoutForm, FieldError},
        stepper::{CheckoutStep, Stepper},
    },
    state::cart::{CartState, CartStateError},
};

/// Errors from driving the checkout session.
#[derive(Debug, Error)]
pub enum CheckoutFlowError {
    /// `start_checkout` was called while a session already exists.
    #[error("a checkout session has already been started")]
    AlreadyStarted,

    /// A session operation was attempted before `start_checkout`.
    #[error("checkout has not been started")]
    NotStarted,

    /// The session reached a terminal status; no further status-changing
    /// call may be issued for it.
    #[error("checkout session is finalized")]
    SessionFinalized,

    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] CheckoutApiError),
}

/// Errors from submitting the checkout form.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A required field is missing or malformed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] FieldError),

    /// The conversion call failed; form state is intact and the user may
    /// retry.
    #[error("checkout submission failed")]
    Checkout(#[source] CartStateError),
}

/// Page-level orchestration of one checkout attempt.
///
/// Owns the session lifecycle and the stepper. The session is created at
/// most once per flow instance; once its status is terminal the flow
/// refuses to issue further status-changing calls.
pub struct CheckoutFlow {
    checkout: Arc<dyn CheckoutApi>,
    addresses: Arc<dyn AddressesApi>,
    session: Option<CheckoutSession>,
    stepper: Stepper,
}

impl std::fmt::Debug for CheckoutFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutFlow")
            .field("session", &self.session)
            .field("stepper", &self.stepper)
            .finish_non_exhaustive()
    }
}

impl CheckoutFlow {
    /// Create a flow with no session yet.
    #[must_use]
    pub fn new(checkout: Arc<dyn CheckoutApi>, addresses: Arc<dyn AddressesApi>) -> Self {
        Self {
            checkout,
            addresses,
            session: None,
            stepper: Stepper::new(),
        }
    }

    /// The session, once started.
    #[must_use]
    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    /// The visual stepper.
    #[must_use]
    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// Mutable access for presentational navigation.
    pub fn stepper_mut(&mut self) -> &mut Stepper {
        &mut self.stepper
    }

    fn active_session_id(&self) -> Result<String, CheckoutFlowError> {
        let session = self.session.as_ref().ok_or(CheckoutFlowError::NotStarted)?;

        if session.status.is_terminal() {
            return Err(CheckoutFlowError::SessionFinalized);
        }

        Ok(session.id.clone())
    }

    /// Create the session for the current cart. Call once per attempt.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutFlowError::AlreadyStarted`] on re-invocation, or
    /// the backend error.
    pub async fn start_checkout(&mut self, cart_id: &str) -> Result<&CheckoutSession, CheckoutFlowError> {
        if self.session.is_some() {
            return Err(CheckoutFlowError::AlreadyStarted);
        }

        let session = self
            .checkout
            .create_session(NewCheckoutSession {
                cart_id: cart_id.to_owned(),
            })
            .await?;

        info!(session_id = %session.id, cart_id, "started checkout");

        Ok(self.session.insert(session))
    }

    /// Record the chosen shipping method and its cost on the session.
    ///
    /// # Errors
    ///
    /// Fails when the flow has not started, the session is finalized, or
    /// the backend rejects the update.
    pub async fn set_shipping_method(
        &mut self,
        method: &str,
        amount: f64,
    ) -> Result<(), CheckoutFlowError> {
        let session_id = self.active_session_id()?;

        let update = CheckoutSessionUpdate {
            shipping_method: Some(method.to_owned()),
            shipping_amount: Some(amount),
            ..CheckoutSessionUpdate::default()
        };

        self.session = Some(self.checkout.update_session(&session_id, update).await?);

        Ok(())
    }

    /// Link an existing address record as the shipping address.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CheckoutFlow::set_shipping_method`].
    pub async fn update_shipping_address(
        &mut self,
        address_id: &str,
    ) -> Result<(), CheckoutFlowError> {
        let session_id = self.active_session_id()?;

        let update = CheckoutSessionUpdate {
            shipping_address_id: Some(address_id.to_owned()),
            ..CheckoutSessionUpdate::default()
        };

        self.session = Some(self.checkout.update_session(&session_id, update).await?);

        Ok(())
    }

    /// Link an existing address record as the billing address.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CheckoutFlow::set_shipping_method`].
    pub async fn update_billing_address(
        &mut self,
        address_id: &str,
    ) -> Result<(), CheckoutFlowError> {
        let session_id = self.active_session_id()?;

        let update = CheckoutSessionUpdate {
            billing_address_id: Some(address_id.to_owned()),
            ..CheckoutSessionUpdate::default()
        };

        self.session = Some(self.checkout.update_session(&session_id, update).await?);

        Ok(())
    }

    /// Create address records for the form data and link whichever
    /// succeed to the session.
    ///
    /// Each record is attempted independently; one failing does not roll
    /// back the other. The outcome lists exactly which inputs failed so
    /// the user can retry those.
    ///
    /// # Errors
    ///
    /// Fails before any attempt when the flow has not started or the
    /// session is finalized, and afterwards only when linking the created
    /// records to the session fails.
    pub async fn save_addresses(
        &mut self,
        shipping: AddressFields,
        billing: Option<AddressFields>,
    ) -> Result<BatchOutcome<Address, AddressFields, AddressesApiError>, CheckoutFlowError> {
        let session_id = self.active_session_id()?;

        let mut outcome = BatchOutcome::new();
        let mut update = CheckoutSessionUpdate::default();

        match self.addresses.create_address(shipping.clone()).await {
            Ok(address) => {
                update.shipping_address_id = Some(address.id.clone());
                outcome.record(shipping, Ok(address));
            }
            Err(error) => outcome.record(shipping, Err(error)),
        }

        if let Some(billing) = billing {
            match self.addresses.create_address(billing.clone()).await {
                Ok(address) => {
                    update.billing_address_id = Some(address.id.clone());
                    outcome.record(billing, Ok(address));
                }
                Err(error) => outcome.record(billing, Err(error)),
            }
        }

        if update.shipping_address_id.is_some() || update.billing_address_id.is_some() {
            self.session = Some(self.checkout.update_session(&session_id, update).await?);
        }

        Ok(outcome)
    }

    /// Move the session into payment with the chosen method.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`CheckoutFlow::set_shipping_method`].
    pub async fn begin_payment(&mut self, method: &str) -> Result<(), CheckoutFlowError> {
        let session_id = self.active_session_id()?;

        let update = CheckoutSessionUpdate {
            payment_method: Some(method.to_owned()),
            status: Some(SessionStatus::PaymentPending),
            ..CheckoutSessionUpdate::default()
        };

        self.session = Some(self.checkout.update_session(&session_id, update).await?);
        self.stepper.mark_completed(CheckoutStep::Shipping);

        Ok(())
    }

    /// Cancel the attempt. Reachable from pending and payment-pending.
    ///
    /// # Errors
    ///
    /// Fails when the flow has not started, the session is already
    /// finalized, or the backend rejects the update.
    pub async fn cancel(&mut self) -> Result<(), CheckoutFlowError> {
        let session_id = self.active_session_id()?;

        let update = CheckoutSessionUpdate {
            status: Some(SessionStatus::Cancelled),
            ..CheckoutSessionUpdate::default()
        };

        self.session = Some(self.checkout.update_session(&session_id, update).await?);

        Ok(())
    }

    /// Refetch the session, picking up server-side status changes.
    ///
    /// # Errors
    ///
    /// Fails when the flow has not started or the fetch fails. Refreshing
    /// a finalized session is allowed; it issues no status change.
    pub async fn refresh(&mut self) -> Result<&CheckoutSession, CheckoutFlowError> {
        let session_id = self
            .session
            .as_ref()
            .map(|session| session.id.clone())
            .ok_or(CheckoutFlowError::NotStarted)?;

        let session = self.checkout.get_session(&session_id).await?;

        Ok(self.session.insert(session))
    }

    /// Confirmation-view path once the session completed.
    #[must_use]
    pub fn confirmation_path(&self) -> Option<String> {
        let session = self.session.as_ref()?;

        if session.status != SessionStatus::Completed {
            return None;
        }

        let order_id = session.sales_order_id.as_ref()?;

        Some(format!("/order-confirmation/{order_id}"))
    }

    /// Validate the form and convert the cart into an order.
    ///
    /// Validation failures block submission before any network call. On
    /// success the stepper jumps to confirmation and the returned path is
    /// where the caller should navigate. On failure the form is untouched
    /// and the user may retry.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Validation`] or [`SubmitError::Checkout`].
    pub async fn submit_order(
        &mut self,
        form: &CheckoutForm,
        cart: &mut CartState,
    ) -> Result<(String, Order), SubmitError> {
        form.validate()?;

        let payload = form.payload();

        let order = cart
            .checkout(&payload)
            .await
            .map_err(SubmitError::Checkout)?;

        for step in CheckoutStep::ALL {
            self.stepper.mark_completed(step);
        }

        // Cannot skip: every step was just marked completed.
        self.stepper
            .go_to(CheckoutStep::Confirmation)
            .unwrap_or(());

        info!(order_id = %order.id, "checkout submitted");

        Ok((format!("/order-confirmation/{}", order.id), order))
    }
}
