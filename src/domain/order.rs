use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::error::DomainError;

/// Monetary value in minor currency units (kuruş, cents, ...).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Self {
        Amount(value)
    }

    pub fn inner(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct Address {
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "Contact name is required"))]
    pub contact_name: String,
    #[validate(length(min = 1, message = "Zip code is required"))]
    pub zip_code: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CartItem {
    #[validate(length(min = 1, message = "Book id is required"))]
    pub book_id: String,
    pub title: String,
    pub price: Amount,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
}

impl CartItem {
    /// Line total, rejecting arithmetic overflow from absurd inputs.
    pub fn line_total(&self) -> Result<Amount, DomainError> {
        self.price
            .inner()
            .checked_mul(u64::from(self.quantity))
            .map(Amount::new)
            .ok_or(DomainError::CartTotalMismatch)
    }
}

/// Sum of all line totals, checked.
pub fn cart_total(items: &[CartItem]) -> Result<Amount, DomainError> {
    let mut total: u64 = 0;
    for item in items {
        total = total
            .checked_add(item.line_total()?.inner())
            .ok_or(DomainError::CartTotalMismatch)?;
    }
    Ok(Amount::new(total))
}

fn digits_only(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn validate_card_number(number: &str) -> Result<(), ValidationError> {
    if digits_only(number) && (13..=19).contains(&number.len()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("card_number");
        error.message = Some("Card number must be 13 to 19 digits".into());
        Err(error)
    }
}

fn validate_cvc(cvc: &str) -> Result<(), ValidationError> {
    if digits_only(cvc) && (3..=4).contains(&cvc.len()) {
        Ok(())
    } else {
        let mut error = ValidationError::new("cvc");
        error.message = Some("CVC must be 3 or 4 digits".into());
        Err(error)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Card {
    #[validate(length(min = 1, message = "Card holder name is required"))]
    pub holder_name: String,
    #[validate(custom(function = "validate_card_number"))]
    pub number: String,
    #[validate(range(min = 1, max = 12, message = "Expiry month must be between 1 and 12"))]
    pub expiry_month: u32,
    #[validate(range(min = 2000, max = 2100, message = "Expiry year is out of range"))]
    pub expiry_year: i32,
    #[validate(custom(function = "validate_cvc"))]
    pub cvc: String,
}

impl Card {
    /// Month-precision expiry check against the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_year < now.year()
            || (self.expiry_year == now.year() && self.expiry_month < now.month())
    }

    pub fn last4(&self) -> String {
        let digits: Vec<char> = self.number.chars().collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

/// Checkout submission assembled by the storefront: cart lines, addresses,
/// card details and the total the client displayed to the customer.
#[derive(Debug, Deserialize, Validate)]
pub struct PaymentRequest {
    pub app_user_id: Option<String>,
    #[validate(length(min = 1, message = "Shopping cart is empty"), nested)]
    pub books: Vec<CartItem>,
    #[validate(nested)]
    pub shipping_address: Address,
    #[validate(nested)]
    pub billing_address: Address,
    #[validate(nested)]
    pub card: Card,
    pub shipping_price: Amount,
    pub shipping_and_cart_total: Amount,
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    pub currency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: String,
    pub order_number: u32,
    pub user_id: Option<String>,
    pub items: Vec<CartItem>,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub card_last4: String,
    pub shipping_price: Amount,
    pub total: Amount,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}
