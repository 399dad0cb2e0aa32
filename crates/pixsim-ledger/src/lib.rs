//! Double-entry ledger for the participant node.
//!
//! The ledger is:
//! - Account-scoped over a closed set of internal accounts
//! - Double-entry (every entry's debits equal its credits)
//! - Immutable (entries are append-only, never rewritten)
//! - Idempotent (each posting id is applied at most once)
//!
//! # Invariants
//!
//! 1. Per entry, Σ DEBIT == Σ CREDIT
//! 2. A posting id appears at most once; re-appending is a no-op
//! 3. Balances equal the fold of the entry log (DEBIT subtracts, CREDIT adds)
//! 4. Queries observe a consistent snapshot, never a half-applied entry

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pixsim_core::PaymentId;

/// Errors that can occur in ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unbalanced entry {posting_id}: debits {debits} != credits {credits}")]
    UnbalancedEntry {
        posting_id: String,
        debits: i64,
        credits: i64,
    },

    #[error("entry {posting_id} carries a non-positive line amount {amount}")]
    NonPositiveLine { posting_id: String, amount: i64 },
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Internal accounts of the participant ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Account {
    /// Funds the customer can spend.
    CustomerAvailable,
    /// Funds reserved for in-flight payments.
    CustomerHeld,
    /// Funds handed off to the payment rail.
    PixClearing,
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Account::CustomerAvailable => "CUSTOMER_AVAILABLE",
            Account::CustomerHeld => "CUSTOMER_HELD",
            Account::PixClearing => "PIX_CLEARING",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Debit,
    Credit,
}

/// The three posting kinds of the payment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    Hold,
    Settle,
    Release,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Hold => "HOLD",
            EntryKind::Settle => "SETTLE",
            EntryKind::Release => "RELEASE",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic unique id of a ledger entry: `<payment_id>:<KIND>`.
///
/// Derivation from the payment id is what makes appends replay-safe: a
/// duplicated finalization re-derives the same posting id and is absorbed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostingId(pub String);

impl PostingId {
    pub fn derive(payment_id: &PaymentId, kind: EntryKind) -> Self {
        Self(format!("{payment_id}:{kind}"))
    }
}

impl std::fmt::Display for PostingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One side of a double-entry posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerLine {
    pub account: Account,
    pub direction: Direction,
    pub amount: i64,
}

/// A balanced, append-only ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub posting_id: PostingId,
    pub payment_id: PaymentId,
    pub occurred_at: DateTime<Utc>,
    pub kind: EntryKind,
    pub lines: Vec<LedgerLine>,
}

impl LedgerEntry {
    fn template(
        payment_id: &PaymentId,
        kind: EntryKind,
        debit: Account,
        credit: Account,
        amount: i64,
    ) -> Self {
        Self {
            posting_id: PostingId::derive(payment_id, kind),
            payment_id: payment_id.clone(),
            occurred_at: Utc::now(),
            kind,
            lines: vec![
                LedgerLine {
                    account: debit,
                    direction: Direction::Debit,
                    amount,
                },
                LedgerLine {
                    account: credit,
                    direction: Direction::Credit,
                    amount,
                },
            ],
        }
    }

    /// Reserve customer funds for an in-flight payment.
    pub fn hold(payment_id: &PaymentId, amount: i64) -> Self {
        Self::template(
            payment_id,
            EntryKind::Hold,
            Account::CustomerAvailable,
            Account::CustomerHeld,
            amount,
        )
    }

    /// Move held funds to clearing on confirmation.
    pub fn settle(payment_id: &PaymentId, amount: i64) -> Self {
        Self::template(
            payment_id,
            EntryKind::Settle,
            Account::CustomerHeld,
            Account::PixClearing,
            amount,
        )
    }

    /// Return held funds to the customer on rejection.
    pub fn release(payment_id: &PaymentId, amount: i64) -> Self {
        Self::template(
            payment_id,
            EntryKind::Release,
            Account::CustomerHeld,
            Account::CustomerAvailable,
            amount,
        )
    }

    fn validate(&self) -> Result<()> {
        let mut debits = 0i64;
        let mut credits = 0i64;
        for line in &self.lines {
            if line.amount <= 0 {
                return Err(LedgerError::NonPositiveLine {
                    posting_id: self.posting_id.0.clone(),
                    amount: line.amount,
                });
            }
            match line.direction {
                Direction::Debit => debits += line.amount,
                Direction::Credit => credits += line.amount,
            }
        }
        if debits != credits {
            return Err(LedgerError::UnbalancedEntry {
                posting_id: self.posting_id.0.clone(),
                debits,
                credits,
            });
        }
        Ok(())
    }
}

/// Folds an entry log into per-account balances.
///
/// This is the definition the incremental balances are a denormalization of;
/// tests use it as the oracle for [`Ledger::balances`].
pub fn fold_balances<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> HashMap<Account, i64> {
    let mut balances = HashMap::new();
    for entry in entries {
        for line in &entry.lines {
            let slot = balances.entry(line.account).or_insert(0);
            match line.direction {
                Direction::Debit => *slot -= line.amount,
                Direction::Credit => *slot += line.amount,
            }
        }
    }
    balances
}

#[derive(Default)]
struct LedgerInner {
    entries: Vec<LedgerEntry>,
    posted: HashSet<PostingId>,
    balances: HashMap<Account, i64>,
}

/// The participant ledger.
///
/// One lock guards the entry log, the posting-id set, and the balances map,
/// so an append is atomic and queries see either all of an entry or none of
/// it.
#[derive(Default)]
pub struct Ledger {
    inner: RwLock<LedgerInner>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Returns `Ok(false)` when the posting id was already
    /// applied — the entry is absorbed without effect.
    pub fn post(&self, entry: LedgerEntry) -> Result<bool> {
        entry.validate()?;

        let mut inner = self.inner.write();
        if inner.posted.contains(&entry.posting_id) {
            return Ok(false);
        }
        inner.posted.insert(entry.posting_id.clone());
        for line in &entry.lines {
            let slot = inner.balances.entry(line.account).or_insert(0);
            match line.direction {
                Direction::Debit => *slot -= line.amount,
                Direction::Credit => *slot += line.amount,
            }
        }
        inner.entries.push(entry);
        Ok(true)
    }

    /// Snapshot of the entry log in insertion order.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.inner.read().entries.clone()
    }

    /// Snapshot of the per-account balances.
    pub fn balances(&self) -> HashMap<Account, i64> {
        self.inner.read().balances.clone()
    }

    pub fn entry_count(&self) -> usize {
        self.inner.read().entries.len()
    }
}
