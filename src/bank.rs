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

//! Account factory and registry.
//!
//! The [`Bank`] hands out account numbers from its
//! [`AccountNumberGenerator`], opens accounts and keeps them indexed by
//! number. It never moves money between accounts.
//!
//! # Thread Safety
//!
//! Accounts live in a [`DashMap`] and each account serializes its own
//! operations, so different accounts can be used from different threads.

use crate::account::Account;
use crate::base::{AccountNumber, AccountNumberGenerator, SequentialNumbers};
use crate::options::AccountOptions;
use crate::LedgerError;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::warn;

pub struct Bank {
    accounts: DashMap<AccountNumber, Account>,
    numbers: Box<dyn AccountNumberGenerator>,
}

impl Bank {
    /// Creates a bank numbering accounts from [`SequentialNumbers::DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::with_generator(SequentialNumbers::new())
    }

    pub fn with_generator(numbers: impl AccountNumberGenerator + 'static) -> Self {
        Bank {
            accounts: DashMap::new(),
            numbers: Box::new(numbers),
        }
    }

    /// Opens and registers a new account.
    ///
    /// The number is drawn before the opening is validated, so a rejected
    /// opening still consumes one.
    ///
    /// # Errors
    ///
    /// [`LedgerError::InvalidInitialBalance`] if `initial_balance` is negative.
    pub fn open_account(
        &self,
        owner: impl Into<String>,
        initial_balance: Decimal,
        options: AccountOptions,
    ) -> Result<AccountNumber, LedgerError> {
        self.open_account_at(owner, initial_balance, options, Utc::now())
    }

    /// Like [`Bank::open_account`] with an explicit opening date.
    pub fn open_account_at(
        &self,
        owner: impl Into<String>,
        initial_balance: Decimal,
        options: AccountOptions,
        date: DateTime<Utc>,
    ) -> Result<AccountNumber, LedgerError> {
        let number = self.numbers.next_number();
        let account = Account::open_at(number, owner, initial_balance, options, date)?;
        self.accounts.insert(number, account);
        Ok(number)
    }

    /// Retrieves an account by number.
    pub fn get_account(
        &self,
        number: &AccountNumber,
    ) -> Option<dashmap::mapref::one::Ref<'_, AccountNumber, Account>> {
        self.accounts.get(number)
    }

    /// Like [`Bank::get_account`] but failing with [`LedgerError::AccountNotFound`].
    pub fn account(
        &self,
        number: &AccountNumber,
    ) -> Result<dashmap::mapref::one::Ref<'_, AccountNumber, Account>, LedgerError> {
        self.get_account(number).ok_or(LedgerError::AccountNotFound)
    }

    /// Returns an iterator over all accounts, in no particular order.
    pub fn accounts(
        &self,
    ) -> impl Iterator<Item = dashmap::mapref::multiple::RefMulti<'_, AccountNumber, Account>> {
        self.accounts.iter()
    }

    /// All registered account numbers in ascending order.
    pub fn account_numbers(&self) -> Vec<AccountNumber> {
        let mut numbers: Vec<_> = self.accounts.iter().map(|entry| *entry.key()).collect();
        numbers.sort_unstable();
        numbers
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Runs month-end processing on every account, dated now.
    pub fn perform_month_end(&self) -> Vec<(AccountNumber, LedgerError)> {
        self.perform_month_end_at(Utc::now())
    }

    /// Runs month-end processing on every account.
    ///
    /// A failing account does not stop the others; failures are returned in
    /// ascending account-number order.
    pub fn perform_month_end_at(&self, date: DateTime<Utc>) -> Vec<(AccountNumber, LedgerError)> {
        let mut failures = Vec::new();
        for number in self.account_numbers() {
            let Some(account) = self.accounts.get(&number) else {
                continue;
            };
            if let Err(e) = account.month_end_processing_at(date) {
                warn!(%number, error = %e, "month-end processing failed");
                failures.push((number, e));
            }
        }
        failures
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}
