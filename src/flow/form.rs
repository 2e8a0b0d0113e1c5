//! Checkout form and its client-side validation.

use thiserror::Error;

use crate::domain::{addresses::models::AddressFields, carts::models::CheckoutPayload};

/// One failed validation check.
///
/// Checks run sequentially and the first failure wins, so callers get one
/// message per submit attempt, tied to the field to highlight.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Form field identifier, e.g. `"shippingCity"`.
    pub field: &'static str,
    /// Localized message key.
    pub message: &'static str,
}

/// Data collected by the checkout page before submission.
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub shipping: AddressFields,

    /// When set, the billing fieldset is ignored and billing mirrors
    /// shipping. Defaults to on.
    pub billing_same_as_shipping: bool,
    pub billing: AddressFields,
}

impl CheckoutForm {
    /// An empty form with billing mirroring shipping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            billing_same_as_shipping: true,
            ..Self::default()
        }
    }

    /// Run the required-field checks. No network is involved; a failure
    /// here must block submission entirely.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<(), FieldError> {
        let checks: [(&'static str, &str, &'static str); 6] = [
            ("customerName", &self.customer_name, "checkout.name_required"),
            ("customerEmail", &self.customer_email, "checkout.email_required"),
            ("shippingLine1", &self.shipping.line1, "checkout.address_required"),
            ("shippingCity", &self.shipping.city, "checkout.city_required"),
            ("shippingState", &self.shipping.state, "checkout.state_required"),
            ("shippingPostalCode", &self.shipping.postal_code, "checkout.postal_code_required"),
        ];

        for (field, value, message) in checks {
            if value.trim().is_empty() {
                return Err(FieldError { field, message });
            }
        }

        if !is_plausible_email(&self.customer_email) {
            return Err(FieldError {
                field: "customerEmail",
                message: "checkout.email_invalid",
            });
        }

        if !self.billing_same_as_shipping {
            let billing_checks: [(&'static str, &str, &'static str); 4] = [
                ("billingLine1", &self.billing.line1, "checkout.address_required"),
                ("billingCity", &self.billing.city, "checkout.city_required"),
                ("billingState", &self.billing.state, "checkout.state_required"),
                ("billingPostalCode", &self.billing.postal_code, "checkout.postal_code_required"),
            ];

            for (field, value, message) in billing_checks {
                if value.trim().is_empty() {
                    return Err(FieldError { field, message });
                }
            }
        }

        Ok(())
    }

    /// Build the order-creation payload. Billing is omitted when it
    /// mirrors shipping.
    #[must_use]
    pub fn payload(&self) -> CheckoutPayload {
        CheckoutPayload {
            customer_name: self.customer_name.trim().to_owned(),
            customer_email: self.customer_email.trim().to_owned(),
            customer_phone: self.customer_phone.clone(),
            shipping_address: self.shipping.clone(),
            billing_address: (!self.billing_same_as_shipping).then(|| self.billing.clone()),
        }
    }
}

/// Basic `local@domain` shape check; the backend does the real one.
fn is_plausible_email(email: &str) -> bool {
    match email.trim().split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    }
}
