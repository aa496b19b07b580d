//! CSV export of final balances
//!
//! Writes one `account,balance` row per account in ascending id order. This is
//! a diagnostic dump of a finished run; nothing reads it back.

use crate::types::{AccountId, Balance, LedgerError};
use serde::Serialize;
use std::io::Write;

/// One row of the balance export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceRow {
    pub account: AccountId,
    pub balance: Balance,
}

/// Write balances to CSV format
///
/// `balances[i]` is the balance of account `i + 1`, as returned by
/// [`Ledger::snapshot`](crate::core::Ledger::snapshot).
///
/// # Arguments
///
/// * `balances` - Final balances in ascending account order
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(LedgerError)` if a write error occurred
pub fn write_balances_csv(balances: &[Balance], output: &mut dyn Write) -> Result<(), LedgerError> {
    let mut writer = csv::Writer::from_writer(output);

    for (account, &balance) in (1..=AccountId::MAX).zip(balances) {
        writer.serialize(BalanceRow { account, balance })?;
    }

    writer.flush()?;

    Ok(())
}
