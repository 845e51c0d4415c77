//! Domain layer: the payment attempt state machine, its value objects, and the
//! ports through which the application talks to the backend, the document and
//! the gateway SDK.

pub mod attempt;
pub mod money;
pub mod payment;
pub mod ports;
