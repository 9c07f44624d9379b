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

//! Account management.
//!
//! An [`Account`] owns an append-only log of [`Transaction`]s. The balance is
//! never stored: it is the sum of the log, recomputed on every read.
//!
//! # Example
//!
//! ```
//! use account_ledger_rs::{Account, AccountNumber, AccountOptions, LedgerError};
//! use chrono::Utc;
//! use rust_decimal_macros::dec;
//!
//! let account =
//!     Account::open(AccountNumber(1), "Alice", dec!(100), AccountOptions::basic()).unwrap();
//! account.withdraw(dec!(30), Utc::now(), "rent").unwrap();
//! assert_eq!(account.balance(), dec!(70));
//!
//! let result = account.withdraw(dec!(1000), Utc::now(), "overdraw");
//! assert_eq!(result, Err(LedgerError::InsufficientFunds));
//! assert_eq!(account.balance(), dec!(70));
//! ```

use crate::base::AccountNumber;
use crate::history::History;
use crate::options::AccountOptions;
use crate::policy::{MonthEndAction, MonthEndPolicy, Overdraft, OverdraftPolicy};
use crate::{LedgerError, Transaction};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct AccountData {
    owner: String,
    /// Insertion-ordered, append-only.
    transactions: Vec<Transaction>,
}

impl AccountData {
    fn new(owner: String) -> Self {
        Self {
            owner,
            transactions: Vec::new(),
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.transactions.iter().all(|tx| !tx.amount().is_zero()),
            "Invariant violated: zero-amount transaction in log"
        );
    }

    fn balance(&self) -> Decimal {
        self.transactions.iter().map(Transaction::amount).sum()
    }

    /// Appends `+amount`.
    fn deposit(
        &mut self,
        amount: Decimal,
        date: DateTime<Utc>,
        note: String,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidDepositAmount);
        }
        self.balance()
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOutOfRange)?;
        self.transactions.push(Transaction::new(amount, date, note));
        self.assert_invariants();
        Ok(())
    }

    /// Appends `-amount`, plus the fee returned by `overdraft` when the
    /// withdrawal takes the balance below `minimum_balance`. The fee must be
    /// a debit.
    fn withdraw(
        &mut self,
        amount: Decimal,
        date: DateTime<Utc>,
        note: String,
        minimum_balance: Decimal,
        overdraft: &dyn OverdraftPolicy,
    ) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidWithdrawalAmount);
        }

        let prospective_balance = self
            .balance()
            .checked_sub(amount)
            .ok_or(LedgerError::BalanceOutOfRange)?;
        let fee = if prospective_balance < minimum_balance {
            overdraft.check_withdrawal_limit(&Overdraft {
                amount,
                date,
                prospective_balance,
                minimum_balance,
            })?
        } else {
            None
        };
        if let Some(fee) = &fee {
            if fee.amount() >= Decimal::ZERO {
                return Err(LedgerError::InvalidOverdraftFee);
            }
            prospective_balance
                .checked_add(fee.amount())
                .ok_or(LedgerError::BalanceOutOfRange)?;
        }

        self.transactions.push(Transaction::new(-amount, date, note));
        if let Some(fee) = fee {
            debug!(fee = %fee.amount(), "overdraft fee charged");
            self.transactions.push(fee);
        }
        self.assert_invariants();
        Ok(())
    }
}

/// Ledger account.
///
/// All operations take `&self`; the owner and the transaction log sit behind
/// one lock so calls on the same account are serialized.
#[derive(Debug)]
pub struct Account {
    number: AccountNumber,
    minimum_balance: Decimal,
    overdraft: Arc<dyn OverdraftPolicy>,
    month_end: Arc<dyn MonthEndPolicy>,
    inner: Mutex<AccountData>,
}

impl Account {
    const DECIMAL_PRECISION: u32 = 4;
    pub const INITIAL_BALANCE_NOTE: &'static str = "Initial balance";

    /// Opens an account dated now. See [`Account::open_at`].
    pub fn open(
        number: AccountNumber,
        owner: impl Into<String>,
        initial_balance: Decimal,
        options: AccountOptions,
    ) -> Result<Self, LedgerError> {
        Self::open_at(number, owner, initial_balance, options, Utc::now())
    }

    /// Opens an account.
    ///
    /// A positive `initial_balance` is recorded as the first deposit, noted
    /// `Initial balance`. A zero initial balance leaves the log empty.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidInitialBalance`] if `initial_balance` is negative.
    pub fn open_at(
        number: AccountNumber,
        owner: impl Into<String>,
        initial_balance: Decimal,
        options: AccountOptions,
        date: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::InvalidInitialBalance);
        }

        let mut data = AccountData::new(owner.into());
        if initial_balance > Decimal::ZERO {
            data.deposit(initial_balance, date, Self::INITIAL_BALANCE_NOTE.to_string())?;
        }
        debug!(%number, owner = %data.owner, %initial_balance, "account opened");

        Ok(Self {
            number,
            minimum_balance: options.minimum_balance,
            overdraft: options.overdraft,
            month_end: options.month_end,
            inner: Mutex::new(data),
        })
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn owner(&self) -> String {
        self.inner.lock().owner.clone()
    }

    pub fn set_owner(&self, owner: impl Into<String>) {
        self.inner.lock().owner = owner.into();
    }

    pub fn minimum_balance(&self) -> Decimal {
        self.minimum_balance
    }

    /// Sum of all transaction amounts.
    pub fn balance(&self) -> Decimal {
        self.inner.lock().balance()
    }

    /// Ordered copy of the transaction log.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.inner.lock().transactions.clone()
    }

    pub fn transaction_count(&self) -> usize {
        self.inner.lock().transactions.len()
    }

    /// Records a credit of `amount`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidDepositAmount`] if `amount` is zero or negative.
    /// - [`LedgerError::BalanceOutOfRange`] if the new balance does not fit.
    pub fn deposit(
        &self,
        amount: Decimal,
        date: DateTime<Utc>,
        note: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.inner.lock().deposit(amount, date, note.into())
    }

    /// Records a debit of `amount`.
    ///
    /// If the balance would drop below the minimum balance the overdraft
    /// policy decides: it either rejects the withdrawal or accepts it, in
    /// which case any fee it returns is recorded right after the withdrawal.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidWithdrawalAmount`] if `amount` is zero or negative.
    /// - [`LedgerError::BalanceOutOfRange`] if the new balance does not fit.
    /// - [`LedgerError::InvalidOverdraftFee`] if the policy returns a fee that
    ///   is not a debit.
    /// - [`LedgerError::InsufficientFunds`] (or whatever the policy returns)
    ///   if the overdraft is refused.
    pub fn withdraw(
        &self,
        amount: Decimal,
        date: DateTime<Utc>,
        note: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.inner.lock().withdraw(
            amount,
            date,
            note.into(),
            self.minimum_balance,
            self.overdraft.as_ref(),
        )
    }

    /// Runs the month-end policy, dated now.
    pub fn month_end_processing(&self) -> Result<(), LedgerError> {
        self.month_end_processing_at(Utc::now())
    }

    /// Runs the month-end policy against the current balance.
    ///
    /// The resulting movement goes through the regular deposit and withdrawal
    /// checks. Nothing prevents running this twice in the same period.
    pub fn month_end_processing_at(&self, date: DateTime<Utc>) -> Result<(), LedgerError> {
        let mut data = self.inner.lock();
        match self.month_end.month_end(data.balance())? {
            Some(MonthEndAction::Deposit { amount, note }) => {
                debug!(number = %self.number, %amount, %note, "month-end deposit");
                data.deposit(amount, date, note)
            }
            Some(MonthEndAction::Withdrawal { amount, note }) => {
                debug!(number = %self.number, %amount, %note, "month-end withdrawal");
                data.withdraw(
                    amount,
                    date,
                    note,
                    self.minimum_balance,
                    self.overdraft.as_ref(),
                )
            }
            None => Ok(()),
        }
    }

    /// Report of every transaction with its running balance.
    pub fn history(&self) -> History {
        History::from_transactions(&self.inner.lock().transactions)
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let data = self.inner.lock();
        let mut state = serializer.serialize_struct("Account", 4)?;
        state.serialize_field("account", &self.number)?;
        state.serialize_field("owner", &data.owner)?;
        state.serialize_field(
            "balance",
            &data.balance().round_dp(Account::DECIMAL_PRECISION),
        )?;
        state.serialize_field("transactions", &data.transactions.len())?;
        state.end()
    }
}
