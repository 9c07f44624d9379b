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

//! Ledger transactions.
//!
//! A [`Transaction`] is an immutable signed movement of money. Credits are
//! positive, debits are negative; the balance of an account is the sum of
//! the amounts of its transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    amount: Decimal,
    date: DateTime<Utc>,
    note: String,
}

impl Transaction {
    pub fn new(amount: Decimal, date: DateTime<Utc>, note: impl Into<String>) -> Self {
        Self {
            amount,
            date,
            note: note.into(),
        }
    }

    /// Signed amount: positive for credits, negative for debits.
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn is_credit(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}
