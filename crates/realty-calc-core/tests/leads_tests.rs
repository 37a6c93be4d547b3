use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use realty_calc_core::leads::{
    submit_order, submit_sample_request, LogNotifier, Notification, Notifier, NotifyError,
    OrderRequest, SampleRequest, SampleStatus,
};
use realty_calc_core::RealtyCalcError;
use rust_decimal_macros::dec;

struct Unreachable;

impl Notifier for Unreachable {
    fn notify(&self, n: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery {
            recipient: n.recipient.to_string(),
            reason: "smtp timeout".into(),
        })
    }
}

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap()
}

fn order() -> OrderRequest {
    OrderRequest {
        name: "Lee".into(),
        email: "lee@example.com".into(),
        phone: "010-0000-0000".into(),
        agreement: true,
    }
}

#[test]
fn test_failed_notifications_do_not_fail_the_order() {
    let mut rng = StdRng::seed_from_u64(42);
    let receipt = submit_order(&order(), at(), &mut rng, &Unreachable).unwrap();

    assert!(receipt.order_number.starts_with("RR2512312359"));
    assert_eq!(receipt.notification_failures.len(), 2);
    assert!(receipt.notification_failures[0].contains("smtp timeout"));
}

#[test]
fn test_order_receipt_names_the_program() {
    let mut rng = StdRng::seed_from_u64(7);
    let receipt = submit_order(&order(), at(), &mut rng, &LogNotifier).unwrap();

    assert_eq!(receipt.product, "레인보우리치 프로그램");
    assert_eq!(receipt.price, dec!(50000));
}

#[test]
fn test_invalid_order_is_rejected_before_numbering() {
    let mut req = order();
    req.email = "lee@example".into();
    let mut rng = StdRng::seed_from_u64(42);
    match submit_order(&req, at(), &mut rng, &LogNotifier) {
        Err(RealtyCalcError::Validation(errors)) => assert!(errors.contains("email")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_sample_request_receipt() {
    let req = SampleRequest {
        email: "park@example.com".into(),
        apartment_name: "Banpo Xi".into(),
        location: Some("Seocho".into()),
        message: None,
    };
    let mut rng = StdRng::seed_from_u64(3);
    let receipt = submit_sample_request(&req, at(), &mut rng, &LogNotifier).unwrap();

    assert!(receipt.request_id.starts_with("SAMPLE2512312359"));
    assert_eq!(receipt.request_id.len(), 18);
    assert_eq!(receipt.status, SampleStatus::Pending);
    assert_eq!(receipt.estimated_delivery_hours, 24);
    assert!(receipt.notification_failures.is_empty());
}
