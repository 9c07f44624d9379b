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

//! # Account Ledger
//!
//! This library provides an append-only account ledger: accounts record
//! deposits and withdrawals as signed transactions, derive their balance from
//! the log and render a history report.
//!
//! ## Core Components
//!
//! - [`Account`]: Transaction log with balance, minimum balance and policies
//! - [`Bank`]: Account factory and registry owning the number generator
//! - [`OverdraftPolicy`] / [`MonthEndPolicy`]: Capabilities injected at opening
//! - [`History`]: Report of transactions with running balances
//! - [`LedgerError`]: Error types for rejected operations
//!
//! ## Example
//!
//! ```
//! use account_ledger_rs::{AccountOptions, Bank, InterestAccrual};
//! use rust_decimal_macros::dec;
//!
//! let bank = Bank::new();
//! let options = AccountOptions::interest_earning(InterestAccrual::default());
//! let number = bank.open_account("Bob", dec!(1000), options).unwrap();
//!
//! let account = bank.get_account(&number).unwrap();
//! account.month_end_processing().unwrap();
//! assert_eq!(account.balance(), dec!(1050));
//! ```

pub mod account;
mod bank;
mod base;
mod config;
pub mod error;
mod history;
mod options;
pub mod policy;
mod transaction;

pub use account::Account;
pub use bank::Bank;
pub use base::{AccountNumber, AccountNumberGenerator, SequentialNumbers};
pub use config::LedgerConfig;
pub use error::LedgerError;
pub use history::{History, HistoryRow};
pub use options::{AccountKind, AccountOptions};
pub use policy::{
    CreditLineInterest, InterestAccrual, MonthEndAction, MonthEndPolicy, MonthlyDeposit,
    NoMonthEnd, Overdraft, OverdraftFee, OverdraftPolicy, RejectOverdraft,
};
pub use transaction::Transaction;
