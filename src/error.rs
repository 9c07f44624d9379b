// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Error types for ledger operations.

use thiserror::Error;

/// Ledger operation errors.
///
/// Every variant is raised before the account is touched, so a failed call
/// never leaves a partial transaction behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Deposit amount is zero or negative
    #[error("amount of deposit must be positive")]
    InvalidDepositAmount,

    /// Withdrawal amount is zero or negative
    #[error("amount of withdrawal must be positive")]
    InvalidWithdrawalAmount,

    /// Account opened with a negative balance
    #[error("initial balance must not be negative")]
    InvalidInitialBalance,

    /// Resulting balance does not fit in a `Decimal`
    #[error("resulting balance is out of range")]
    BalanceOutOfRange,

    /// Withdrawal would breach the minimum balance and the overdraft policy refused it
    #[error("not sufficient funds for this withdrawal")]
    InsufficientFunds,

    /// Overdraft policy returned a fee that is not a debit
    #[error("overdraft fee must be negative")]
    InvalidOverdraftFee,

    /// No account is registered under the requested number
    #[error("account not found")]
    AccountNotFound,
}

impl LedgerError {
    /// Returns `true` for errors caused by an amount outside its valid range.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::InvalidDepositAmount
                | Self::InvalidWithdrawalAmount
                | Self::InvalidInitialBalance
                | Self::BalanceOutOfRange
        )
    }
}
