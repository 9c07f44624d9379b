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

//! Account identifiers and the generators that hand them out.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for an account.
///
/// Numbers are only unique with respect to the [`AccountNumberGenerator`]
/// that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AccountNumber(pub u64);

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh account numbers.
///
/// Implementations must never return the same number twice and must be safe
/// to call from several threads at once.
pub trait AccountNumberGenerator: fmt::Debug + Send + Sync {
    fn next_number(&self) -> AccountNumber;
}

/// Monotonic counter backed by an [`AtomicU64`].
///
/// # Example
///
/// ```
/// use account_ledger_rs::{AccountNumber, AccountNumberGenerator, SequentialNumbers};
///
/// let numbers = SequentialNumbers::starting_at(10);
/// assert_eq!(numbers.next_number(), AccountNumber(10));
/// assert_eq!(numbers.next_number(), AccountNumber(11));
/// ```
#[derive(Debug)]
pub struct SequentialNumbers {
    next: AtomicU64,
}

impl SequentialNumbers {
    /// First number handed out by [`SequentialNumbers::new`].
    pub const DEFAULT_SEED: u64 = 1_234_567_890;

    pub fn new() -> Self {
        Self::starting_at(Self::DEFAULT_SEED)
    }

    pub fn starting_at(seed: u64) -> Self {
        Self {
            next: AtomicU64::new(seed),
        }
    }
}

impl Default for SequentialNumbers {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountNumberGenerator for SequentialNumbers {
    fn next_number(&self) -> AccountNumber {
        AccountNumber(self.next.fetch_add(1, Ordering::Relaxed))
    }
}
