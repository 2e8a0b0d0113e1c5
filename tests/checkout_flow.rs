//! End-to-end scenarios against a mocked backend.

use std::sync::Arc;

use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, method, path, query_param},
};

use storefront_client::{
    config::StorefrontConfig,
    domain::{
        addresses::models::AddressFields,
        carts::{CartsApi, HttpCartsApi},
        checkout::{HttpCheckoutApi, models::SessionStatus},
        coupons::{CouponsApi, HttpCouponsApi, models::CouponOutcome},
        orders::models::OrderStatus,
    },
    flow::{CheckoutFlow, CheckoutForm, SubmitError},
    http::ApiClient,
    state::{CartState, CouponPhase, CouponState},
};

fn test_config(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        base_url: server.uri(),
        api_token: Some("test-token".to_owned()),
        session_id: "test-session".to_owned(),
    }
}

fn cart_document() -> serde_json::Value {
    json!({
        "data": {
            "type": "shopping-carts",
            "id": "c1",
            "attributes": {
                "sessionId": "test-session",
                "subtotalAmount": 200.0,
                "taxAmount": 32.0,
                "totalAmount": 232.0
            }
        },
        "included": [{
            "type": "cart-items",
            "id": "i1",
            "attributes": {
                "productId": "p1",
                "quantity": 2,
                "unitPrice": 100.0,
                "originalPrice": 100.0,
                "subtotal": 200.0,
                "taxAmount": 32.0,
                "total": 232.0
            }
        }]
    })
}

fn filled_form() -> CheckoutForm {
    let mut form = CheckoutForm::new();

    form.customer_name = "Ada Lovelace".to_owned();
    form.customer_email = "ada@example.com".to_owned();
    form.shipping = AddressFields {
        line1: "1 Analytical Way".to_owned(),
        line2: None,
        city: "London".to_owned(),
        state: "LDN".to_owned(),
        postal_code: "N1 7GU".to_owned(),
        country: "GB".to_owned(),
    };

    form
}

#[tokio::test]
async fn missing_current_cart_is_none_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .and(query_param("session_id", "test-session"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let carts = HttpCartsApi::new(ApiClient::new(test_config(&server)));

    let cart = carts
        .current_cart()
        .await
        .expect("a 404 must not be an error");

    assert!(cart.is_none());
}

#[tokio::test]
async fn server_failure_on_current_cart_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let carts = HttpCartsApi::new(ApiClient::new(test_config(&server)));

    let result = carts.current_cart().await;

    assert!(result.is_err(), "a 500 must propagate, got {result:?}");
}

#[tokio::test]
async fn snake_case_cart_payload_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "type": "shopping-carts",
                "id": "c1",
                "attributes": {
                    "session_id": "test-session",
                    "subtotal_amount": 200.0,
                    "tax_amount": 32.0,
                    "discount_amount": 20.0,
                    "total_amount": 212.0
                }
            }
        })))
        .mount(&server)
        .await;

    let carts = HttpCartsApi::new(ApiClient::new(test_config(&server)));

    let cart = carts
        .current_cart()
        .await
        .expect("request should succeed")
        .expect("cart should exist");

    assert_eq!(cart.subtotal_amount, 200.0);
    assert_eq!(cart.discount_amount, Some(20.0));
    assert_eq!(cart.total_amount, 212.0);
}

#[tokio::test]
async fn lazily_created_cart_is_correlated_with_the_session() {
    let server = MockServer::start().await;

    // Creation must carry the client's session id, or the follow-up
    // session-scoped lookup below would miss and drop the cart.
    Mock::given(method("POST"))
        .and(path("/api/v1/shopping-carts"))
        .and(body_partial_json(json!({
            "data": {
                "type": "shopping-carts",
                "attributes": {"sessionId": "test-session"}
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(cart_document()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/cart-items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "type": "cart-items",
                "id": "i1",
                "attributes": {"productId": "p1", "quantity": 1, "unitPrice": 100.0}
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .and(query_param("session_id", "test-session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_document()))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let mut state = CartState::new(Arc::new(HttpCartsApi::new(client)));

    state.add_one("p1").await.expect("add should succeed");

    let cart = state
        .cart()
        .expect("cart must survive the post-add session-scoped refetch");

    assert_eq!(cart.id, "c1");
    assert_eq!(cart.session_id.as_deref(), Some("test-session"));
}

#[tokio::test]
async fn cart_update_sends_only_set_attributes() {
    use storefront_client::domain::carts::models::CartUpdate;

    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/shopping-carts/c1"))
        .and(body_partial_json(json!({
            "data": {
                "type": "shopping-carts",
                "id": "c1",
                "attributes": {"couponCode": "SAVE10"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "type": "shopping-carts",
                "id": "c1",
                "attributes": {
                    "couponCode": "SAVE10",
                    "subtotalAmount": 200.0,
                    "taxAmount": 32.0,
                    "discountAmount": 20.0,
                    "totalAmount": 212.0
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let carts = HttpCartsApi::new(ApiClient::new(test_config(&server)));

    let cart = carts
        .update_cart(
            "c1",
            CartUpdate {
                coupon_code: Some("SAVE10".to_owned()),
                ..CartUpdate::default()
            },
        )
        .await
        .expect("update should succeed");

    assert_eq!(cart.coupon_code.as_deref(), Some("SAVE10"));
    assert_eq!(cart.discount_amount, Some(20.0));
}

#[tokio::test]
async fn coupon_code_is_sent_uppercase_and_trimmed() {
    let server = MockServer::start().await;

    // Only the canonical spelling is mounted; a lowercase or padded code
    // would miss and fail the expectation.
    Mock::given(method("GET"))
        .and(path("/api/v1/coupons/validate/SAVE10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "discountAmount": 20.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coupons = HttpCouponsApi::new(ApiClient::new(test_config(&server)));

    let validation = coupons
        .validate_coupon(" save10 ", 232.0)
        .await
        .expect("validate should succeed");

    assert!(validation.valid);
    assert_eq!(validation.discount_amount, Some(20.0));
}

#[tokio::test]
async fn expired_coupon_is_rejected_as_a_value() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_document()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/shopping-carts/c1/apply-coupon"))
        .and(body_partial_json(json!({"code": "EXPIRED"})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "valid": false,
            "error": "Coupon has expired"
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let mut cart_state = CartState::new(Arc::new(HttpCartsApi::new(client.clone())));
    let mut coupon_state = CouponState::new(Arc::new(HttpCouponsApi::new(client)));

    cart_state.refresh().await.expect("load should succeed");

    let cart_id = cart_state.cart().expect("cart should be held").id.clone();

    let outcome = coupon_state
        .apply(&cart_id, "EXPIRED")
        .await
        .expect("a business rejection is not a transport error");

    assert_eq!(
        outcome,
        CouponOutcome::Rejected {
            error: "Coupon has expired".to_owned()
        }
    );

    // No discount was ever applied and none appears now.
    assert!(coupon_state.applied().is_none());

    let cart = cart_state.cart().expect("cart should still be held");

    assert_eq!(cart.discount_amount, None);
}

#[tokio::test]
async fn happy_path_from_cart_to_confirmation() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_document()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/shopping-carts/c1/apply-coupon"))
        .and(body_partial_json(json!({"code": "SAVE10"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid": true,
            "discountAmount": 20.0,
            "totalAmount": 212.0
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/shopping-carts/c1/checkout"))
        .and(body_partial_json(json!({
            "customerName": "Ada Lovelace",
            "shippingAddress": {"city": "London"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "type": "ecommerce-orders",
                "id": "o1",
                "attributes": {"status": "pending", "totalAmount": 212.0}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let mut cart_state = CartState::new(Arc::new(HttpCartsApi::new(client.clone())));
    let mut coupon_state = CouponState::new(Arc::new(HttpCouponsApi::new(client.clone())));

    let mut flow = CheckoutFlow::new(
        Arc::new(HttpCheckoutApi::new(client.clone())),
        Arc::new(storefront_client::domain::addresses::HttpAddressesApi::new(client)),
    );

    cart_state.refresh().await.expect("load should succeed");

    let cart = cart_state.cart().expect("cart should be held");

    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].quantity, 2);
    assert_eq!(cart.items[0].unit_price, 100.0);

    let cart_id = cart.id.clone();

    let outcome = coupon_state
        .apply(&cart_id, "SAVE10")
        .await
        .expect("apply should succeed");

    assert_eq!(
        outcome,
        CouponOutcome::Applied {
            discount_amount: 20.0,
            total_amount: Some(212.0),
        },
        "the backend's echoed total must come through"
    );

    assert!(matches!(coupon_state.phase(), CouponPhase::Applied(_)));

    let (confirmation_path, order) = flow
        .submit_order(&filled_form(), &mut cart_state)
        .await
        .expect("submission should succeed");

    assert_eq!(order.id, "o1");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(confirmation_path, "/order-confirmation/o1");
    assert!(cart_state.cart().is_none(), "cart is gone after checkout");
}

#[tokio::test]
async fn empty_city_blocks_submission_before_any_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/shopping-carts/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_document()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/shopping-carts/c1/checkout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));
    let mut cart_state = CartState::new(Arc::new(HttpCartsApi::new(client.clone())));

    let mut flow = CheckoutFlow::new(
        Arc::new(HttpCheckoutApi::new(client.clone())),
        Arc::new(storefront_client::domain::addresses::HttpAddressesApi::new(client)),
    );

    cart_state.refresh().await.expect("load should succeed");

    let mut form = filled_form();
    form.shipping.city = String::new();

    let result = flow.submit_order(&form, &mut cart_state).await;

    match result {
        Err(SubmitError::Validation(error)) => {
            assert_eq!(error.field, "shippingCity");
            assert_eq!(error.message, "checkout.city_required");
        }
        other => panic!("expected a validation error, got {other:?}"),
    }

    assert!(
        cart_state.cart().is_some(),
        "cart state is untouched by a blocked submit"
    );
}

#[tokio::test]
async fn checkout_session_mirrors_server_totals() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/checkout-sessions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "type": "checkout-sessions",
                "id": "cs1",
                "attributes": {
                    "status": "pending",
                    "subtotal_amount": 100.0,
                    "shipping_amount": 10.0,
                    "tax_amount": 16.0,
                    "discount_amount": 5.0,
                    "total_amount": 121.0
                },
                "relationships": {
                    "shoppingCart": {"data": {"type": "shopping-carts", "id": "c1"}}
                }
            }
        })))
        .mount(&server)
        .await;

    let client = ApiClient::new(test_config(&server));

    let mut flow = CheckoutFlow::new(
        Arc::new(HttpCheckoutApi::new(client.clone())),
        Arc::new(storefront_client::domain::addresses::HttpAddressesApi::new(client)),
    );

    let session = flow
        .start_checkout("c1")
        .await
        .expect("session creation should succeed");

    assert_eq!(session.status, SessionStatus::Pending);
    assert_eq!(session.cart_id.as_deref(), Some("c1"));
    assert_eq!(
        session.total_amount,
        session.subtotal_amount + session.shipping_amount + session.tax_amount
            - session.discount_amount
    );
    assert_eq!(session.total_amount, 121.0);
}
