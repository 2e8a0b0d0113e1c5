//! Coupon application state machine.

use std::sync::Arc;

use tracing::error;

use crate::domain::coupons::{
    CouponsApi, CouponsApiError,
    models::{CouponOutcome, CouponValidation},
    service::normalize_code,
};

/// A discount currently attached to the cart's working state.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedCoupon {
    /// Normalized coupon code.
    pub code: String,
    /// Server-computed discount amount.
    pub discount_amount: f64,
}

/// Observable phase of the coupon machine.
///
/// `no-coupon → validating → applied`, or
/// `… → rejected(reason) → no-coupon`. A rejection never disturbs a
/// previously applied discount; `prior` carries it so acknowledging the
/// rejection restores it.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponPhase {
    /// No discount attached.
    NoCoupon,
    /// A code is being checked or applied.
    Validating {
        /// Discount that was attached before this attempt, if any.
        prior: Option<AppliedCoupon>,
    },
    /// A discount is attached.
    Applied(AppliedCoupon),
    /// The backend refused the code.
    Rejected {
        /// Human-readable rejection reason from the backend.
        reason: String,
        /// Discount still attached from before the attempt, if any.
        prior: Option<AppliedCoupon>,
    },
}

/// Coupon application over a single cart.
pub struct CouponState {
    coupons: Arc<dyn CouponsApi>,
    phase: CouponPhase,
}

impl std::fmt::Debug for CouponState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouponState")
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl CouponState {
    /// Create a machine in the no-coupon phase.
    #[must_use]
    pub fn new(coupons: Arc<dyn CouponsApi>) -> Self {
        Self {
            coupons,
            phase: CouponPhase::NoCoupon,
        }
    }

    /// Current observable phase.
    #[must_use]
    pub fn phase(&self) -> &CouponPhase {
        &self.phase
    }

    /// The attached discount, if any, regardless of transient phases.
    #[must_use]
    pub fn applied(&self) -> Option<&AppliedCoupon> {
        match &self.phase {
            CouponPhase::Applied(applied) => Some(applied),
            CouponPhase::Validating { prior } | CouponPhase::Rejected { prior, .. } => {
                prior.as_ref()
            }
            CouponPhase::NoCoupon => None,
        }
    }

    fn take_applied(&mut self) -> Option<AppliedCoupon> {
        match std::mem::replace(&mut self.phase, CouponPhase::NoCoupon) {
            CouponPhase::Applied(applied) => Some(applied),
            CouponPhase::Validating { prior } | CouponPhase::Rejected { prior, .. } => prior,
            CouponPhase::NoCoupon => None,
        }
    }

    /// Check a code against the cart total without mutating anything.
    ///
    /// Business rejections come back as `valid: false` values; the machine
    /// phase is untouched by a pure check.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport/server failure.
    pub async fn validate(
        &self,
        code: &str,
        cart_total: f64,
    ) -> Result<CouponValidation, CouponsApiError> {
        self.coupons.validate_coupon(code, cart_total).await
    }

    /// Apply a code to the cart. Applying over an existing coupon replaces
    /// it; the server decides.
    ///
    /// On rejection the previously applied discount, if any, stays in
    /// place and the machine reports [`CouponPhase::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error only on transport/server failure; the phase is
    /// restored to its prior value.
    pub async fn apply(
        &mut self,
        cart_id: &str,
        code: &str,
    ) -> Result<CouponOutcome, CouponsApiError> {
        let prior = self.take_applied();

        self.phase = CouponPhase::Validating {
            prior: prior.clone(),
        };

        match self.coupons.apply_coupon(cart_id, code).await {
            Ok(CouponOutcome::Applied {
                discount_amount,
                total_amount,
            }) => {
                self.phase = CouponPhase::Applied(AppliedCoupon {
                    code: normalize_code(code),
                    discount_amount,
                });

                Ok(CouponOutcome::Applied {
                    discount_amount,
                    total_amount,
                })
            }
            Ok(CouponOutcome::Rejected { error }) => {
                self.phase = CouponPhase::Rejected {
                    reason: error.clone(),
                    prior,
                };

                Ok(CouponOutcome::Rejected { error })
            }
            Err(source) => {
                error!("failed to apply coupon: {source}");

                self.phase = match prior {
                    Some(applied) => CouponPhase::Applied(applied),
                    None => CouponPhase::NoCoupon,
                };

                Err(source)
            }
        }
    }

    /// Clear the applied discount. Safe to call when none is applied.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport/server failure; the phase is
    /// left as it was.
    pub async fn remove(&mut self, cart_id: &str) -> Result<(), CouponsApiError> {
        self.coupons.remove_coupon(cart_id).await?;

        self.phase = CouponPhase::NoCoupon;

        Ok(())
    }

    /// Leave the rejected phase, restoring a previously applied discount
    /// or returning to no-coupon.
    pub fn acknowledge_rejection(&mut self) {
        if let CouponPhase::Rejected { .. } = &self.phase {
            self.phase = match self.take_applied() {
                Some(applied) => CouponPhase::Applied(applied),
                None => CouponPhase::NoCoupon,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::coupons::MockCouponsApi;

    use super::*;

    #[tokio::test]
    async fn apply_moves_to_applied_with_server_discount() {
        let mut api = MockCouponsApi::new();

        api.expect_apply_coupon()
            .once()
            .withf(|cart_id, code| cart_id == "c1" && code == " save10 ")
            .return_once(|_, _| {
                Ok(CouponOutcome::Applied {
                    discount_amount: 20.0,
                    total_amount: None,
                })
            });

        let mut state = CouponState::new(Arc::new(api));

        let outcome = state
            .apply("c1", " save10 ")
            .await
            .expect("apply should succeed");

        assert!(matches!(outcome, CouponOutcome::Applied { discount_amount, .. } if discount_amount == 20.0));

        assert_eq!(
            state.phase(),
            &CouponPhase::Applied(AppliedCoupon {
                code: "SAVE10".to_owned(),
                discount_amount: 20.0,
            })
        );
    }

    #[tokio::test]
    async fn validate_is_a_pure_check_and_leaves_the_phase_alone() {
        let mut api = MockCouponsApi::new();

        api.expect_validate_coupon()
            .once()
            .withf(|code, cart_total| code == "SAVE10" && (*cart_total - 232.0).abs() < f64::EPSILON)
            .return_once(|_, _| {
                Ok(CouponValidation {
                    valid: true,
                    error: None,
                    coupon: None,
                    discount_amount: Some(20.0),
                    total_amount: None,
                })
            });

        // Shared reference only; a pure check needs no exclusive access.
        let state = CouponState::new(Arc::new(api));

        let validation = state
            .validate("SAVE10", 232.0)
            .await
            .expect("validate should succeed");

        assert!(validation.valid);
        assert_eq!(state.phase(), &CouponPhase::NoCoupon);
    }

    #[tokio::test]
    async fn rejection_is_a_value_and_preserves_prior_discount() {
        let mut api = MockCouponsApi::new();

        api.expect_apply_coupon()
            .once()
            .return_once(|_, _| {
                Ok(CouponOutcome::Applied {
                    discount_amount: 20.0,
                    total_amount: None,
                })
            });

        api.expect_apply_coupon()
            .once()
            .return_once(|_, _| {
                Ok(CouponOutcome::Rejected {
                    error: "Coupon has expired".to_owned(),
                })
            });

        let mut state = CouponState::new(Arc::new(api));

        state.apply("c1", "SAVE10").await.expect("first apply ok");

        let outcome = state
            .apply("c1", "EXPIRED")
            .await
            .expect("rejection is not a transport error");

        assert_eq!(
            outcome,
            CouponOutcome::Rejected {
                error: "Coupon has expired".to_owned()
            }
        );

        // The earlier discount is still attached.
        assert_eq!(
            state.applied().map(|applied| applied.discount_amount),
            Some(20.0)
        );

        state.acknowledge_rejection();

        assert_eq!(
            state.phase(),
            &CouponPhase::Applied(AppliedCoupon {
                code: "SAVE10".to_owned(),
                discount_amount: 20.0,
            })
        );
    }

    #[tokio::test]
    async fn rejection_without_prior_returns_to_no_coupon() {
        let mut api = MockCouponsApi::new();

        api.expect_apply_coupon().once().return_once(|_, _| {
            Ok(CouponOutcome::Rejected {
                error: "Coupon has expired".to_owned(),
            })
        });

        let mut state = CouponState::new(Arc::new(api));

        state
            .apply("c1", "EXPIRED")
            .await
            .expect("rejection is not a transport error");

        assert!(state.applied().is_none(), "no discount was ever attached");

        state.acknowledge_rejection();

        assert_eq!(state.phase(), &CouponPhase::NoCoupon);
    }

    #[tokio::test]
    async fn remove_is_safe_when_nothing_is_applied() {
        let mut api = MockCouponsApi::new();

        api.expect_remove_coupon().once().return_once(|_| Ok(()));

        let mut state = CouponState::new(Arc::new(api));

        state
            .remove("c1")
            .await
            .expect("removing with no coupon applied should succeed");

        assert_eq!(state.phase(), &CouponPhase::NoCoupon);
    }
}
