//! Order and sample-request intake: reference numbers, field checks and
//! best-effort notification dispatch. Transport is left to the caller.

pub mod intake;
pub mod reference;

pub use intake::{
    submit_order, submit_sample_request, LogNotifier, Notification, Notifier, NotifyError,
    OrderReceipt, OrderRequest, OrderStatus, Recipient, SampleReceipt, SampleRequest,
    SampleStatus,
};
pub use reference::{generate_reference, is_valid_email, ORDER_PREFIX, SAMPLE_PREFIX};
