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

//! Account history report.
//!
//! The report has a header line followed by one line per transaction in
//! insertion order. Each line holds the short date, the signed amount, the
//! running balance after that transaction and the note, separated by tabs:
//!
//! ```text
//! Date		Amount	Balance	Note
//! 3/1/2025	100	100	Initial balance
//! 3/2/2025	-30	70	rent
//! ```

use crate::Transaction;
use chrono::{DateTime, Utc};
use csv::Writer;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::io::Write;

const SHORT_DATE: &str = "%-m/%-d/%Y";

fn short_date<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(SHORT_DATE))
}

/// One line of the history report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    #[serde(serialize_with = "short_date")]
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    /// Balance after this transaction.
    pub balance: Decimal,
    pub note: String,
}

/// Snapshot of an account's transactions with running balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct History {
    rows: Vec<HistoryRow>,
}

impl History {
    pub const HEADER: &'static str = "Date\t\tAmount\tBalance\tNote";

    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut balance = Decimal::ZERO;
        let rows = transactions
            .iter()
            .map(|tx| {
                balance += tx.amount();
                HistoryRow {
                    date: tx.date(),
                    amount: tx.amount(),
                    balance,
                    note: tx.note().to_string(),
                }
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Running balance after the last row, zero for an empty history.
    pub fn final_balance(&self) -> Decimal {
        self.rows.last().map_or(Decimal::ZERO, |row| row.balance)
    }

    /// Writes the rows as CSV with columns `date, amount, balance, note`.
    ///
    /// # Errors
    ///
    /// Returns a CSV error if writing fails.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = Writer::from_writer(writer);
        for row in &self.rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl fmt::Display for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", Self::HEADER)?;
        for row in &self.rows {
            writeln!(
                f,
                "{}\t{}\t{}\t{}",
                row.date.format(SHORT_DATE),
                row.amount,
                row.balance,
                row.note
            )?;
        }
        Ok(())
    }
}
