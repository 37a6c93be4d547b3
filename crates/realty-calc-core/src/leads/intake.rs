use chrono::NaiveDateTime;
use rand::Rng;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::reference::{generate_reference, is_valid_email, ORDER_PREFIX, SAMPLE_PREFIX};
use crate::error::ValidationErrors;
use crate::types::Money;
use crate::RealtyCalcResult;

/// List price of the data-collection program, in won
pub const REPORT_PRICE: Money = dec!(50000);
pub const REPORT_PRODUCT: &str = "레인보우리치 프로그램";
pub const SAMPLE_DELIVERY_HOURS: u32 = 24;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Buyer accepted the terms
    #[serde(default)]
    pub agreement: bool,
}

impl OrderRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.name.trim().is_empty() {
            errors.add("name", "Name is required");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Enter a valid email address");
        }
        if self.phone.trim().is_empty() {
            errors.add("phone", "Phone number is required");
        }
        if !self.agreement {
            errors.add("agreement", "The terms must be accepted");
        }

        errors
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleRequest {
    pub email: String,
    pub apartment_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SampleRequest {
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if self.email.trim().is_empty() {
            errors.add("email", "Email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "Enter a valid email address");
        }
        if self.apartment_name.trim().is_empty() {
            errors.add("apartment_name", "Apartment name is required");
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleStatus {
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_number: String,
    pub status: OrderStatus,
    pub product: String,
    pub price: Money,
    /// Name the buyer should use on the bank transfer
    pub depositor_name: String,
    pub ordered_at: NaiveDateTime,
    /// Notifications that could not be delivered; the order stands regardless
    pub notification_failures: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleReceipt {
    pub request_id: String,
    pub status: SampleStatus,
    pub estimated_delivery_hours: u32,
    pub requested_at: NaiveDateTime,
    pub notification_failures: Vec<String>,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "address")]
pub enum Recipient {
    Customer(String),
    Admin,
}

impl std::fmt::Display for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recipient::Customer(email) => write!(f, "customer <{email}>"),
            Recipient::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: Recipient,
    pub reference: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Delivery to {recipient} failed: {reason}")]
    Delivery { recipient: String, reason: String },
}

/// Outbound channel for order and sample notifications (mail, chat, ...).
pub trait Notifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the tracing log instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %notification.recipient,
            reference = %notification.reference,
            subject = %notification.subject,
            "notification queued"
        );
        Ok(())
    }
}

/// Send every notification, collecting failures instead of propagating them.
fn dispatch(notifier: &dyn Notifier, notifications: &[Notification]) -> Vec<String> {
    let mut failures = Vec::new();
    for n in notifications {
        if let Err(e) = notifier.notify(n) {
            tracing::warn!(reference = %n.reference, error = %e, "notification failed");
            failures.push(e.to_string());
        }
    }
    failures
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Validate an order, assign its `RR` number and notify buyer and admin.
pub fn submit_order<R: Rng + ?Sized>(
    request: &OrderRequest,
    at: NaiveDateTime,
    rng: &mut R,
    notifier: &dyn Notifier,
) -> RealtyCalcResult<OrderReceipt> {
    request.validate().into_result(())?;

    let order_number = generate_reference(ORDER_PREFIX, at, rng);
    let name = request.name.trim().to_string();

    let notifications = [
        Notification {
            recipient: Recipient::Customer(request.email.trim().to_string()),
            reference: order_number.clone(),
            subject: format!("Order {order_number} received"),
            body: format!(
                "Thank you, {name}. Please transfer {REPORT_PRICE} won under the name {name} to complete order {order_number}."
            ),
        },
        Notification {
            recipient: Recipient::Admin,
            reference: order_number.clone(),
            subject: format!("New order {order_number}"),
            body: format!("{name} ({}) ordered {REPORT_PRODUCT}.", request.phone.trim()),
        },
    ];
    let notification_failures = dispatch(notifier, &notifications);

    tracing::info!(order_number = %order_number, "order accepted");

    Ok(OrderReceipt {
        order_number,
        status: OrderStatus::PendingPayment,
        product: REPORT_PRODUCT.to_string(),
        price: REPORT_PRICE,
        depositor_name: name,
        ordered_at: at,
        notification_failures,
    })
}

/// Validate a sample request, assign its `SAMPLE` id and notify the admin.
pub fn submit_sample_request<R: Rng + ?Sized>(
    request: &SampleRequest,
    at: NaiveDateTime,
    rng: &mut R,
    notifier: &dyn Notifier,
) -> RealtyCalcResult<SampleReceipt> {
    request.validate().into_result(())?;

    let request_id = generate_reference(SAMPLE_PREFIX, at, rng);
    let or_none = |v: &Option<String>| {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("none")
            .to_string()
    };

    let notifications = [Notification {
        recipient: Recipient::Admin,
        reference: request_id.clone(),
        subject: format!("Sample request {request_id}"),
        body: format!(
            "From: {}\nApartment: {}\nLocation: {}\nMessage: {}",
            request.email.trim(),
            request.apartment_name.trim(),
            or_none(&request.location),
            or_none(&request.message),
        ),
    }];
    let notification_failures = dispatch(notifier, &notifications);

    tracing::info!(request_id = %request_id, "sample request accepted");

    Ok(SampleReceipt {
        request_id,
        status: SampleStatus::Pending,
        estimated_delivery_hours: SAMPLE_DELIVERY_HOURS,
        requested_at: at,
        notification_failures,
    })
}
