//! Typed HTTP client for the finance and reports backend.
//!
//! Operations are declared once in [`operation::OPERATIONS`]; a [`Call`] is
//! resolved against that table into a [`RequestPlan`] and then sent by
//! [`FinanceClient`]. Responses come back as [`models::Envelope`]s, already
//! schema-checked.

pub mod client;
pub mod error;
pub mod operation;
pub mod request;

pub use client::{FinanceClient, FinanceClientConfig};
pub use error::{ClientError, Result};
pub use operation::{HttpMethod, Operation, OperationSpec, PayloadKind, OPERATIONS};
pub use request::{encode_query, Call, Payload, RequestPlan};
pub use reqwest::StatusCode;
