//! Client-side working state: the current cart, per-operation request
//! state, coupon application, and outcome notices.

pub mod cart;
pub mod coupon;
pub mod notice;
pub mod request;

pub use cart::{CartState, CartStateError};
pub use coupon::{AppliedCoupon, CouponPhase, CouponState};
pub use notice::{Notice, NoticeLevel};
pub use request::{OperationKind, OperationTracker, RequestState};
