use crate::domain::error::DomainError;
use crate::domain::order::{Order, PaymentRequest, cart_total};
use crate::domain::repository::OrderRepository;
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct CheckoutService<R: OrderRepository> {
    order_repository: Arc<R>,
}

impl<R: OrderRepository> CheckoutService<R> {
    pub fn new(order_repository: Arc<R>) -> Self {
        Self { order_repository }
    }

    /// Turns a checkout submission into a persisted order. The client-declared
    /// total is never trusted: it must equal the recomputed cart total plus
    /// the shipping price.
    #[instrument(skip(self, req), fields(items = req.books.len(), currency = %req.currency))]
    pub async fn place_order(&self, req: PaymentRequest) -> Result<Order> {
        if req.books.is_empty() {
            warn!("Rejecting payment with empty cart");
            return Err(DomainError::EmptyCart.into());
        }

        if req.card.is_expired_at(Utc::now()) {
            warn!(
                expiry_month = req.card.expiry_month,
                expiry_year = req.card.expiry_year,
                "Rejecting payment with expired card"
            );
            return Err(DomainError::CardExpired.into());
        }

        let cart = cart_total(&req.books)?;
        let expected_total = cart
            .inner()
            .checked_add(req.shipping_price.inner())
            .ok_or(DomainError::CartTotalMismatch)?;

        if expected_total != req.shipping_and_cart_total.inner() {
            warn!(
                declared = req.shipping_and_cart_total.inner(),
                expected = expected_total,
                "Rejecting payment with mismatched total"
            );
            return Err(DomainError::CartTotalMismatch.into());
        }

        let order = Order {
            id: Uuid::new_v4().to_string(),
            order_number: fastrand::u32(100_000..1_000_000),
            user_id: req.app_user_id,
            card_last4: req.card.last4(),
            items: req.books,
            shipping_address: req.shipping_address,
            billing_address: req.billing_address,
            shipping_price: req.shipping_price,
            total: req.shipping_and_cart_total,
            currency: req.currency,
            created_at: Utc::now(),
        };

        self.order_repository.save_order(order.clone()).await?;

        info!(
            order_id = %order.id,
            order_number = order.order_number,
            total = order.total.inner(),
            currency = %order.currency,
            "Order placed successfully"
        );

        Ok(order)
    }
}
