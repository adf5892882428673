//! Orders
//!
//! Checkout turns the session's cart snapshot into a persisted order and
//! clears the cart wholesale. Payment is simulated: the gateway validates the
//! card shape and then always approves; no real processing occurs, and only a
//! masked card reference is ever persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    cart::CartItem,
    session::Session,
    store::{JsonStore, StoreError},
    users::ShippingAddress,
};

/// Name of the order collection in the store.
const ORDERS_COLLECTION: &str = "orders";

/// Errors from the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires an authenticated session.
    #[error("session is not authenticated")]
    NotAuthenticated,

    /// The cart has no lines to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The simulated gateway rejected the card details.
    #[error("payment was declined: {0}")]
    PaymentDeclined(String),

    /// Store failure while persisting the order or cart.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Progress states for a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, not yet picked up for fulfilment.
    Pending,

    /// Being prepared.
    Processing,

    /// Handed to the carrier.
    Shipped,

    /// Received by the customer.
    Delivered,

    /// Cancelled before delivery.
    Cancelled,
}

/// Card details presented at checkout.
///
/// Held only for the duration of the call; the CVV is never persisted and
/// the card number is stored masked to its last four digits.
#[derive(Clone)]
pub struct PaymentDetails {
    /// Card number; digits, optionally separated by spaces or dashes.
    pub card_number: String,

    /// Expiry in `MM/YY` form.
    pub expiry_date: String,

    /// Card verification value.
    pub cvv: String,

    /// Name on the card.
    pub card_holder_name: String,
}

impl fmt::Debug for PaymentDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PaymentDetails(**redacted**)")
    }
}

/// A placed order as persisted in the order collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Opaque order id.
    pub id: String,

    /// Id of the ordering user.
    pub user_id: String,

    /// Cart lines frozen at checkout time.
    pub items: Vec<CartItem>,

    /// Total carried over from the cart.
    pub total: Decimal,

    /// Destination address.
    pub shipping_address: ShippingAddress,

    /// Masked card reference, `****` plus the last four digits.
    pub payment_reference: String,

    /// Fulfilment status.
    pub status: OrderStatus,

    /// Placement timestamp.
    pub created_at: DateTime<Utc>,
}

/// Place an order from the session's cart, then clear and re-persist the
/// cart wholesale.
///
/// # Errors
///
/// - [`CheckoutError::NotAuthenticated`]: the session has no bound user.
/// - [`CheckoutError::EmptyCart`]: there is nothing to order.
/// - [`CheckoutError::PaymentDeclined`]: the card details failed validation.
/// - [`CheckoutError::Store`]: the order or cart could not be persisted.
pub fn checkout(
    session: &mut Session,
    store: &JsonStore,
    payment: &PaymentDetails,
    shipping: ShippingAddress,
) -> Result<Order, CheckoutError> {
    let user_id = session
        .current_user_id()
        .ok_or(CheckoutError::NotAuthenticated)?
        .to_string();

    if session.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let payment_reference = authorize_payment(payment)?;

    let order = Order {
        id: Uuid::new_v4().to_string(),
        user_id,
        items: session.cart().items().to_vec(),
        total: session.cart().total(),
        shipping_address: shipping,
        payment_reference,
        status: OrderStatus::Pending,
        created_at: Utc::now(),
    };

    let mut orders: Vec<Order> = store.read_all(ORDERS_COLLECTION)?;
    orders.push(order.clone());
    store.write_all(ORDERS_COLLECTION, &orders)?;

    session.cart_mut().clear();
    session.persist(store)?;

    info!(order_id = %order.id, total = %order.total, "order placed");

    Ok(order)
}

/// Read the order collection.
///
/// # Errors
///
/// Returns a [`StoreError`] if the collection cannot be read or parsed.
pub fn orders(store: &JsonStore) -> Result<Vec<Order>, StoreError> {
    store.read_all(ORDERS_COLLECTION)
}

/// Simulated gateway: validates the card shape, then approves.
fn authorize_payment(payment: &PaymentDetails) -> Result<String, CheckoutError> {
    let digits: Vec<char> = payment
        .card_number
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.len() < 12 {
        return Err(CheckoutError::PaymentDeclined(
            "card number is too short".to_string(),
        ));
    }

    if !(3..=4).contains(&payment.cvv.len()) {
        return Err(CheckoutError::PaymentDeclined("CVV is invalid".to_string()));
    }

    if payment.expiry_date.is_empty() {
        return Err(CheckoutError::PaymentDeclined(
            "expiry date is missing".to_string(),
        ));
    }

    let last_four: String = digits.iter().rev().take(4).rev().collect();

    Ok(format!("****{last_four}"))
}
