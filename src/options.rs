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

//! Construction-time account settings.
//!
//! [`AccountOptions`] bundles the minimum balance with the overdraft and
//! month-end policies. Presets cover the usual account kinds:
//!
//! | Kind | Minimum balance | Overdraft | Month end |
//! |------|-----------------|-----------|-----------|
//! | basic | 0 | reject | none |
//! | interest earning | 0 | reject | 5% above 500 |
//! | line of credit | `-limit` | flat fee | 7% on negative balance |
//! | gift card | 0 | reject | optional monthly deposit |

use crate::policy::{
    CreditLineInterest, InterestAccrual, MonthEndPolicy, MonthlyDeposit, NoMonthEnd,
    OverdraftFee, OverdraftPolicy, RejectOverdraft,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The account kinds understood by [`crate::LedgerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Basic,
    InterestEarning,
    LineOfCredit,
    GiftCard,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::InterestEarning => "interest_earning",
            Self::LineOfCredit => "line_of_credit",
            Self::GiftCard => "gift_card",
        };
        f.write_str(name)
    }
}

impl FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "interest" | "interest_earning" => Ok(Self::InterestEarning),
            "credit" | "line_of_credit" => Ok(Self::LineOfCredit),
            "gift" | "gift_card" => Ok(Self::GiftCard),
            other => Err(format!("unknown account kind '{other}'")),
        }
    }
}

/// Settings fixed for the lifetime of an account.
#[derive(Debug, Clone)]
pub struct AccountOptions {
    pub(crate) minimum_balance: Decimal,
    pub(crate) overdraft: Arc<dyn OverdraftPolicy>,
    pub(crate) month_end: Arc<dyn MonthEndPolicy>,
}

impl AccountOptions {
    /// Zero minimum balance, overdrafts rejected, no month-end effects.
    pub fn basic() -> Self {
        Self {
            minimum_balance: Decimal::ZERO,
            overdraft: Arc::new(RejectOverdraft),
            month_end: Arc::new(NoMonthEnd),
        }
    }

    pub fn interest_earning(accrual: InterestAccrual) -> Self {
        Self::basic().with_month_end(accrual)
    }

    /// Allows the balance to go down to `-credit_limit`, charging `fee` for
    /// each withdrawal past it and `interest` on a negative balance at month end.
    pub fn line_of_credit(
        credit_limit: Decimal,
        fee: OverdraftFee,
        interest: CreditLineInterest,
    ) -> Self {
        Self::basic()
            .with_minimum_balance(-credit_limit.abs())
            .with_overdraft(fee)
            .with_month_end(interest)
    }

    pub fn gift_card(monthly: MonthlyDeposit) -> Self {
        Self::basic().with_month_end(monthly)
    }

    pub fn with_minimum_balance(mut self, minimum_balance: Decimal) -> Self {
        self.minimum_balance = minimum_balance;
        self
    }

    pub fn with_overdraft(mut self, policy: impl OverdraftPolicy + 'static) -> Self {
        self.overdraft = Arc::new(policy);
        self
    }

    pub fn with_month_end(mut self, policy: impl MonthEndPolicy + 'static) -> Self {
        self.month_end = Arc::new(policy);
        self
    }

    pub fn minimum_balance(&self) -> Decimal {
        self.minimum_balance
    }
}

impl Default for AccountOptions {
    fn default() -> Self {
        Self::basic()
    }
}
