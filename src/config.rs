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

//! Tunable constants for the account kinds.

use crate::options::{AccountKind, AccountOptions};
use crate::policy::{CreditLineInterest, InterestAccrual, MonthlyDeposit, OverdraftFee};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Ledger-wide settings used to build [`AccountOptions`] for each [`AccountKind`].
///
/// The command-line driver fills this from its arguments; library users can
/// start from [`LedgerConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Interest is paid only on balances strictly above this.
    pub interest_threshold: Decimal,
    pub interest_rate: Decimal,
    /// How far below zero a line of credit may go before fees apply.
    pub credit_limit: Decimal,
    pub overdraft_fee: Decimal,
    pub credit_interest_rate: Decimal,
    /// Monthly top-up for gift cards; zero disables it.
    pub gift_card_deposit: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            interest_threshold: InterestAccrual::DEFAULT_THRESHOLD,
            interest_rate: InterestAccrual::DEFAULT_RATE,
            credit_limit: dec!(2000),
            overdraft_fee: OverdraftFee::DEFAULT_FEE,
            credit_interest_rate: CreditLineInterest::DEFAULT_RATE,
            gift_card_deposit: Decimal::ZERO,
        }
    }
}

impl LedgerConfig {
    pub fn options_for(&self, kind: AccountKind) -> AccountOptions {
        match kind {
            AccountKind::Basic => AccountOptions::basic(),
            AccountKind::InterestEarning => AccountOptions::interest_earning(InterestAccrual {
                threshold: self.interest_threshold,
                rate: self.interest_rate,
            }),
            AccountKind::LineOfCredit => AccountOptions::line_of_credit(
                self.credit_limit,
                OverdraftFee::new(self.overdraft_fee),
                CreditLineInterest {
                    rate: self.credit_interest_rate,
                },
            ),
            AccountKind::GiftCard => AccountOptions::gift_card(MonthlyDeposit {
                amount: self.gift_card_deposit,
            }),
        }
    }
}
