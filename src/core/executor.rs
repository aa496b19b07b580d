//! Operation execution
//!
//! Maps a parsed [`Operation`] onto a [`Ledger`] call and folds the result into
//! an [`Outcome`]. Malformed requests, out-of-range accounts, duplicate
//! accounts and balance overflow all surface as `Outcome::Invalid`; none of
//! them is fatal.

use crate::core::traits::{Ledger, TransferOutcome};
use crate::types::{Operation, Outcome};

/// Execute one operation against the ledger
pub fn execute(ledger: &dyn Ledger, operation: &Operation) -> Outcome {
    match operation {
        Operation::Check { account } => match ledger.check(*account) {
            Ok(balance) => Outcome::Balance(balance),
            Err(reason) => Outcome::Invalid(reason),
        },
        Operation::Transfer { legs } => match ledger.transfer(legs) {
            Ok(TransferOutcome::Committed) => Outcome::Committed,
            Ok(TransferOutcome::InsufficientFunds(account)) => Outcome::InsufficientFunds(account),
            Err(reason) => Outcome::Invalid(reason),
        },
        Operation::Invalid(reason) => Outcome::Invalid(reason.clone()),
    }
}
