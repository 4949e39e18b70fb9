//! Outbound HTTP integration.

pub mod callout;
pub mod client;

pub use callout::{CalloutResponse, HttpCallout, ReqwestCallout};
