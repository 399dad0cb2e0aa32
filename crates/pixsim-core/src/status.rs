//! Payment lifecycle statuses.

use serde::{Deserialize, Serialize};

/// Participant view of a payment's lifecycle.
///
/// Advances only along `CREATED → PENDING → {CONFIRMED, REJECTED}`; the two
/// terminal states are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Created,
    Pending,
    Confirmed,
    Rejected,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, PaymentStatus::Confirmed | PaymentStatus::Rejected)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Created => "CREATED",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Confirmed => "CONFIRMED",
            PaymentStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// Provider view of a payment, and the vocabulary of webhook event types.
///
/// The provider never sees `CREATED`: a payment exists there only once it has
/// been accepted as `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProviderStatus {
    Pending,
    Confirmed,
    Rejected,
}

impl ProviderStatus {
    /// Normalizes a wire token into a status. Unknown tokens yield `None`
    /// and the event carrying them is dropped as a no-op.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(ProviderStatus::Pending),
            "CONFIRMED" => Some(ProviderStatus::Confirmed),
            "REJECTED" => Some(ProviderStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProviderStatus::Confirmed | ProviderStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderStatus::Pending => "PENDING",
            ProviderStatus::Confirmed => "CONFIRMED",
            ProviderStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProviderStatus> for PaymentStatus {
    fn from(s: ProviderStatus) -> Self {
        match s {
            ProviderStatus::Pending => PaymentStatus::Pending,
            ProviderStatus::Confirmed => PaymentStatus::Confirmed,
            ProviderStatus::Rejected => PaymentStatus::Rejected,
        }
    }
}
