//! Checkout flow orchestration: the session lifecycle, the form, and the
//! visual stepper.

pub mod checkout;
pub mod form;
pub mod stepper;

pub use checkout::{CheckoutFlow, CheckoutFlowError, SubmitError};
pub use form::{CheckoutForm, FieldError};
pub use stepper::{CheckoutStep, Stepper, StepperError};
