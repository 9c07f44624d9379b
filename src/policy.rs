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

//! Pluggable account policies.
//!
//! An account carries two capabilities chosen when it is opened:
//!
//! - an [`OverdraftPolicy`], consulted whenever a withdrawal would take the
//!   balance below the account's minimum balance;
//! - a [`MonthEndPolicy`], consulted by month-end processing.
//!
//! Deposit and withdrawal never branch on the concrete policy type.

use crate::{LedgerError, Transaction};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;

/// A withdrawal that would breach the minimum balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overdraft {
    /// Requested withdrawal amount (positive).
    pub amount: Decimal,
    /// Date of the requested withdrawal.
    pub date: DateTime<Utc>,
    /// Balance after the withdrawal, before any fee.
    pub prospective_balance: Decimal,
    pub minimum_balance: Decimal,
}

/// Decides what happens to a withdrawal that breaches the minimum balance.
pub trait OverdraftPolicy: fmt::Debug + Send + Sync {
    /// Returns `Err` to reject the withdrawal, `Ok(Some(fee))` to accept it
    /// and record `fee` right after it, or `Ok(None)` to accept it as is.
    fn check_withdrawal_limit(&self, overdraft: &Overdraft)
    -> Result<Option<Transaction>, LedgerError>;
}

/// Refuses every overdraft with [`LedgerError::InsufficientFunds`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectOverdraft;

impl OverdraftPolicy for RejectOverdraft {
    fn check_withdrawal_limit(
        &self,
        _overdraft: &Overdraft,
    ) -> Result<Option<Transaction>, LedgerError> {
        Err(LedgerError::InsufficientFunds)
    }
}

/// Accepts overdrafts and charges a flat fee for each one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverdraftFee {
    fee: Decimal,
}

impl OverdraftFee {
    pub const DEFAULT_FEE: Decimal = dec!(20);
    pub const NOTE: &'static str = "Apply overdraft fee";

    /// Negative fees are treated as their magnitude.
    pub fn new(fee: Decimal) -> Self {
        Self { fee: fee.abs() }
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }
}

impl Default for OverdraftFee {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FEE)
    }
}

impl OverdraftPolicy for OverdraftFee {
    fn check_withdrawal_limit(
        &self,
        overdraft: &Overdraft,
    ) -> Result<Option<Transaction>, LedgerError> {
        if self.fee.is_zero() {
            return Ok(None);
        }
        Ok(Some(Transaction::new(-self.fee, overdraft.date, Self::NOTE)))
    }
}

/// Movement requested by a [`MonthEndPolicy`].
///
/// Amounts are positive magnitudes; the account applies them through its
/// regular deposit and withdrawal paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthEndAction {
    Deposit { amount: Decimal, note: String },
    Withdrawal { amount: Decimal, note: String },
}

/// Scheduled account-level effects applied at the end of a period.
///
/// The account does not track periods: calling month-end processing twice
/// applies the policy twice.
pub trait MonthEndPolicy: fmt::Debug + Send + Sync {
    /// Returns the movement to apply, if any. Fails with
    /// [`LedgerError::BalanceOutOfRange`] when the amount cannot be computed.
    fn month_end(&self, balance: Decimal) -> Result<Option<MonthEndAction>, LedgerError>;
}

/// Does nothing at month end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMonthEnd;

impl MonthEndPolicy for NoMonthEnd {
    fn month_end(&self, _balance: Decimal) -> Result<Option<MonthEndAction>, LedgerError> {
        Ok(None)
    }
}

/// Pays `rate` of the balance as interest when the balance is above `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestAccrual {
    pub threshold: Decimal,
    pub rate: Decimal,
}

impl InterestAccrual {
    pub const DEFAULT_THRESHOLD: Decimal = dec!(500);
    pub const DEFAULT_RATE: Decimal = dec!(0.05);
    pub const NOTE: &'static str = "apply monthly interest";
}

impl Default for InterestAccrual {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
            rate: Self::DEFAULT_RATE,
        }
    }
}

impl MonthEndPolicy for InterestAccrual {
    fn month_end(&self, balance: Decimal) -> Result<Option<MonthEndAction>, LedgerError> {
        if balance <= self.threshold {
            return Ok(None);
        }
        let interest = balance
            .checked_mul(self.rate)
            .ok_or(LedgerError::BalanceOutOfRange)?;
        Ok((interest > Decimal::ZERO).then(|| MonthEndAction::Deposit {
            amount: interest,
            note: Self::NOTE.to_string(),
        }))
    }
}

/// Charges `rate` of the outstanding amount when the balance is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditLineInterest {
    pub rate: Decimal,
}

impl CreditLineInterest {
    pub const DEFAULT_RATE: Decimal = dec!(0.07);
    pub const NOTE: &'static str = "Charge monthly interest";
}

impl Default for CreditLineInterest {
    fn default() -> Self {
        Self {
            rate: Self::DEFAULT_RATE,
        }
    }
}

impl MonthEndPolicy for CreditLineInterest {
    fn month_end(&self, balance: Decimal) -> Result<Option<MonthEndAction>, LedgerError> {
        if balance >= Decimal::ZERO {
            return Ok(None);
        }
        let interest = (-balance)
            .checked_mul(self.rate)
            .ok_or(LedgerError::BalanceOutOfRange)?;
        Ok((interest > Decimal::ZERO).then(|| MonthEndAction::Withdrawal {
            amount: interest,
            note: Self::NOTE.to_string(),
        }))
    }
}

/// Credits a fixed amount every month (gift cards with a monthly top-up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyDeposit {
    pub amount: Decimal,
}

impl MonthlyDeposit {
    pub const NOTE: &'static str = "Add monthly deposit";
}

impl MonthEndPolicy for MonthlyDeposit {
    fn month_end(&self, _balance: Decimal) -> Result<Option<MonthEndAction>, LedgerError> {
        Ok((self.amount > Decimal::ZERO).then(|| MonthEndAction::Deposit {
            amount: self.amount,
            note: Self::NOTE.to_string(),
        }))
    }
}
