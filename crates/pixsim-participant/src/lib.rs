//! Participant node of the pixsim payment simulation.
//!
//! Accepts client payment orders, reserves funds in a local double-entry
//! ledger, forwards orders to the downstream provider, and reconciles the
//! final outcome from provider webhooks. The webhook pipeline is built to
//! converge to the same terminal state and ledger under any permutation,
//! duplication, or loss of events:
//!
//! - event-id dedup absorbs retried transport,
//! - absorbing terminal states ignore late or logically duplicated events,
//! - deterministic posting ids make ledger appends replay-safe.

pub mod api;
pub mod client;
pub mod engine;
pub mod payment;
pub mod store;

pub use api::{create_router, AppState};
pub use client::{GatewayError, HttpProviderGateway, ProviderGateway};
pub use engine::{ParticipantEngine, PaymentOrder, SubmitError};
pub use payment::Payment;
pub use store::{ParticipantStore, Submission};
