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

//! Account public API integration tests.

use account_ledger_rs::{
    Account, AccountNumber, AccountOptions, CreditLineInterest, InterestAccrual, LedgerError,
    MonthlyDeposit, Overdraft, OverdraftFee, OverdraftPolicy, Transaction,
};
use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// === Helper Functions ===

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, d, 10, 0, 0).unwrap()
}

fn basic(owner: &str, initial: Decimal) -> Account {
    Account::open_at(AccountNumber(1), owner, initial, AccountOptions::basic(), day(1)).unwrap()
}

fn interest(owner: &str, initial: Decimal) -> Account {
    let options = AccountOptions::interest_earning(InterestAccrual::default());
    Account::open_at(AccountNumber(2), owner, initial, options, day(1)).unwrap()
}

fn credit_line(limit: Decimal) -> Account {
    let options = AccountOptions::line_of_credit(
        limit,
        OverdraftFee::default(),
        CreditLineInterest::default(),
    );
    Account::open_at(AccountNumber(3), "Carol", Decimal::ZERO, options, day(1)).unwrap()
}

fn log_sum(account: &Account) -> Decimal {
    account.transactions().iter().map(Transaction::amount).sum()
}

// === Opening ===

#[test]
fn positive_initial_balance_becomes_first_deposit() {
    let account = basic("Alice", dec!(100));
    let transactions = account.transactions();
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].amount(), dec!(100));
    assert_eq!(transactions[0].note(), "Initial balance");
    assert_eq!(transactions[0].date(), day(1));
    assert_eq!(account.balance(), dec!(100));
}

#[test]
fn zero_initial_balance_leaves_log_empty() {
    let account = basic("Alice", Decimal::ZERO);
    assert_eq!(account.transaction_count(), 0);
    assert_eq!(account.balance(), Decimal::ZERO);
}

#[test]
fn negative_initial_balance_is_rejected() {
    let result = Account::open(AccountNumber(1), "Alice", dec!(-5), AccountOptions::basic());
    assert_eq!(result.err(), Some(LedgerError::InvalidInitialBalance));
}

#[test]
fn owner_is_mutable() {
    let account = basic("Alice", dec!(10));
    assert_eq!(account.owner(), "Alice");
    account.set_owner("Alicia");
    assert_eq!(account.owner(), "Alicia");
    assert_eq!(account.transaction_count(), 1);
}

// === Deposits and Withdrawals ===

#[test]
fn alice_example() {
    let account = basic("Alice", dec!(100));
    assert_eq!(account.balance(), dec!(100));

    account.withdraw(dec!(30), day(2), "rent").unwrap();
    assert_eq!(account.balance(), dec!(70));

    let result = account.withdraw(dec!(1000), day(3), "overdraw");
    assert_eq!(result, Err(LedgerError::InsufficientFunds));
    assert_eq!(account.balance(), dec!(70));
    assert_eq!(account.transaction_count(), 2);
}

#[test]
fn withdrawal_is_stored_as_negative_amount() {
    let account = basic("Alice", dec!(100));
    account.withdraw(dec!(12.34), day(2), "lunch").unwrap();
    let last = account.transactions().pop().unwrap();
    assert_eq!(last.amount(), dec!(-12.34));
    assert_eq!(last.note(), "lunch");
    assert_eq!(last.date(), day(2));
}

#[test]
fn deposit_zero_returns_invalid_amount() {
    let account = basic("Alice", dec!(100));
    let result = account.deposit(Decimal::ZERO, day(2), "nothing");
    assert_eq!(result, Err(LedgerError::InvalidDepositAmount));
    assert_eq!(account.transaction_count(), 1);
}

#[test]
fn deposit_negative_returns_invalid_amount() {
    let account = basic("Alice", dec!(100));
    let result = account.deposit(dec!(-10), day(2), "negative");
    assert_eq!(result, Err(LedgerError::InvalidDepositAmount));
    assert!(result.unwrap_err().is_out_of_range());
    assert_eq!(account.transaction_count(), 1);
}

#[test]
fn withdrawal_zero_returns_invalid_amount() {
    let account = basic("Alice", dec!(100));
    let result = account.withdraw(Decimal::ZERO, day(2), "nothing");
    assert_eq!(result, Err(LedgerError::InvalidWithdrawalAmount));
    assert_eq!(account.transaction_count(), 1);
}

#[test]
fn withdrawal_negative_is_checked_before_funds() {
    let account = basic("Alice", Decimal::ZERO);
    let result = account.withdraw(dec!(-1), day(2), "negative");
    assert_eq!(result, Err(LedgerError::InvalidWithdrawalAmount));
}

#[test]
fn withdraw_exact_balance_succeeds() {
    let account = basic("Alice", dec!(100));
    account.withdraw(dec!(100), day(2), "all of it").unwrap();
    assert_eq!(account.balance(), Decimal::ZERO);
}

#[test]
fn small_decimal_precision() {
    let account = basic("Alice", Decimal::ZERO);
    account.deposit(dec!(0.1), day(2), "a").unwrap();
    account.deposit(dec!(0.2), day(2), "b").unwrap();
    assert_eq!(account.balance(), dec!(0.3));
}

#[test]
fn balance_equals_sum_of_log() {
    let account = basic("Alice", dec!(50));
    account.deposit(dec!(25.5), day(2), "a").unwrap();
    account.withdraw(dec!(10.25), day(3), "b").unwrap();
    let _ = account.withdraw(dec!(1000), day(4), "c");
    account.deposit(dec!(1), day(5), "d").unwrap();
    assert_eq!(account.balance(), log_sum(&account));
    assert_eq!(account.balance(), dec!(66.25));
}

// === Minimum Balance and Overdraft Policies ===

#[test]
fn custom_minimum_balance_with_reject_policy() {
    let options = AccountOptions::basic().with_minimum_balance(dec!(25));
    let account = Account::open_at(AccountNumber(9), "Dan", dec!(100), options, day(1)).unwrap();

    account.withdraw(dec!(75), day(2), "to the floor").unwrap();
    assert_eq!(account.balance(), dec!(25));

    let result = account.withdraw(dec!(0.01), day(3), "below floor");
    assert_eq!(result, Err(LedgerError::InsufficientFunds));
    assert_eq!(account.transaction_count(), 2);
}

#[test]
fn credit_line_allows_withdrawal_within_limit_without_fee() {
    let account = credit_line(dec!(2000));
    account.withdraw(dec!(1999), day(2), "within").unwrap();
    assert_eq!(account.transaction_count(), 1);
    assert_eq!(account.balance(), dec!(-1999));
}

#[test]
fn credit_line_past_limit_appends_withdrawal_then_fee() {
    let account = credit_line(dec!(2000));
    account.withdraw(dec!(2500), day(2), "car").unwrap();

    let transactions = account.transactions();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].amount(), dec!(-2500));
    assert_eq!(transactions[0].note(), "car");
    assert_eq!(transactions[1].amount(), dec!(-20));
    assert_eq!(transactions[1].note(), "Apply overdraft fee");
    assert_eq!(transactions[1].date(), day(2));
    assert_eq!(account.balance(), dec!(-2520));
}

/// Accepts any overdraft but refuses to record a fee.
#[derive(Debug)]
struct Lenient;

impl OverdraftPolicy for Lenient {
    fn check_withdrawal_limit(
        &self,
        _overdraft: &Overdraft,
    ) -> Result<Option<Transaction>, LedgerError> {
        Ok(None)
    }
}

/// Records every overdraft it sees as a fee equal to 1% of the shortfall.
#[derive(Debug)]
struct ShortfallFee;

impl OverdraftPolicy for ShortfallFee {
    fn check_withdrawal_limit(
        &self,
        overdraft: &Overdraft,
    ) -> Result<Option<Transaction>, LedgerError> {
        let shortfall = overdraft.minimum_balance - overdraft.prospective_balance;
        Ok(Some(Transaction::new(
            -(shortfall * dec!(0.01)),
            overdraft.date,
            "shortfall fee",
        )))
    }
}

#[test]
fn custom_policy_without_fee_appends_single_transaction() {
    let options = AccountOptions::basic().with_overdraft(Lenient);
    let account = Account::open_at(AccountNumber(5), "Eve", dec!(10), options, day(1)).unwrap();
    account.withdraw(dec!(30), day(2), "overdraw").unwrap();
    assert_eq!(account.transaction_count(), 2);
    assert_eq!(account.balance(), dec!(-20));
}

#[test]
fn custom_policy_sees_prospective_balance() {
    let options = AccountOptions::basic().with_overdraft(ShortfallFee);
    let account = Account::open_at(AccountNumber(6), "Eve", dec!(100), options, day(1)).unwrap();
    account.withdraw(dec!(300), day(2), "overdraw").unwrap();
    let transactions = account.transactions();
    assert_eq!(transactions[2].amount(), dec!(-2));
    assert_eq!(account.balance(), dec!(-202));
}

/// Returns a zero-amount "fee" for every overdraft.
#[derive(Debug)]
struct FreeFee;

impl OverdraftPolicy for FreeFee {
    fn check_withdrawal_limit(
        &self,
        overdraft: &Overdraft,
    ) -> Result<Option<Transaction>, LedgerError> {
        Ok(Some(Transaction::new(Decimal::ZERO, overdraft.date, "free")))
    }
}

/// Returns a credit instead of a fee for every overdraft.
#[derive(Debug)]
struct CashbackFee;

impl OverdraftPolicy for CashbackFee {
    fn check_withdrawal_limit(
        &self,
        overdraft: &Overdraft,
    ) -> Result<Option<Transaction>, LedgerError> {
        Ok(Some(Transaction::new(dec!(5), overdraft.date, "cashback")))
    }
}

#[test]
fn zero_fee_from_policy_is_rejected_without_append() {
    let options = AccountOptions::basic().with_overdraft(FreeFee);
    let account = Account::open_at(AccountNumber(7), "Eve", dec!(10), options, day(1)).unwrap();
    let result = account.withdraw(dec!(30), day(2), "overdraw");
    assert_eq!(result, Err(LedgerError::InvalidOverdraftFee));
    assert_eq!(account.transaction_count(), 1);
    assert_eq!(account.balance(), dec!(10));
}

#[test]
fn credit_fee_from_policy_is_rejected_without_append() {
    let options = AccountOptions::basic().with_overdraft(CashbackFee);
    let account = Account::open_at(AccountNumber(8), "Eve", dec!(10), options, day(1)).unwrap();
    let result = account.withdraw(dec!(30), day(2), "overdraw");
    assert_eq!(result, Err(LedgerError::InvalidOverdraftFee));
    assert_eq!(account.transaction_count(), 1);
    // The account keeps working after the rejection.
    account.withdraw(dec!(10), day(3), "to zero").unwrap();
    assert_eq!(account.balance(), Decimal::ZERO);
}

// === Decimal Range ===

#[test]
fn deposit_past_decimal_max_is_rejected() {
    let account = basic("Alice", Decimal::MAX);
    let result = account.deposit(Decimal::MAX, day(2), "too much");
    assert_eq!(result, Err(LedgerError::BalanceOutOfRange));
    assert_eq!(account.transaction_count(), 1);
    assert_eq!(account.balance(), Decimal::MAX);
    assert_eq!(account.history().rows().len(), 1);

    account.withdraw(dec!(1), day(3), "still usable").unwrap();
    assert_eq!(account.balance(), Decimal::MAX - dec!(1));
}

#[test]
fn withdrawal_past_decimal_min_is_rejected() {
    let account = credit_line(Decimal::MAX);
    account.withdraw(Decimal::MAX, day(2), "to the limit").unwrap();
    let result = account.withdraw(dec!(1), day(3), "past the limit");
    assert_eq!(result, Err(LedgerError::BalanceOutOfRange));
    assert_eq!(account.transaction_count(), 1);
    assert_eq!(account.balance(), Decimal::MIN);
}

#[test]
fn month_end_interest_past_decimal_max_is_rejected() {
    let options = AccountOptions::interest_earning(InterestAccrual {
        threshold: dec!(500),
        rate: dec!(2),
    });
    let account =
        Account::open_at(AccountNumber(9), "Bob", Decimal::MAX, options, day(1)).unwrap();
    let result = account.month_end_processing_at(day(31));
    assert_eq!(result, Err(LedgerError::BalanceOutOfRange));
    assert_eq!(account.transaction_count(), 1);
}

// === Month-End Processing ===

#[test]
fn basic_month_end_is_noop() {
    let account = basic("Alice", dec!(1000));
    account.month_end_processing().unwrap();
    assert_eq!(account.transaction_count(), 1);
    assert_eq!(account.balance(), dec!(1000));
}

#[test]
fn bob_example_month_end_pays_interest() {
    let account = interest("Bob", dec!(1000));
    account.month_end_processing_at(day(31)).unwrap();
    assert_eq!(account.balance(), dec!(1050));

    let last = account.transactions().pop().unwrap();
    assert_eq!(last.amount(), dec!(50));
    assert_eq!(last.note(), "apply monthly interest");
    assert_eq!(last.date(), day(31));
}

#[test]
fn repeated_month_end_compounds_without_guard() {
    let account = interest("Bob", dec!(1000));
    account.month_end_processing_at(day(31)).unwrap();
    account.month_end_processing_at(day(31)).unwrap();
    // Second run pays 5% of 1050 in the same period.
    assert_eq!(account.balance(), dec!(1102.5));
    assert_eq!(account.transaction_count(), 3);
}

#[test]
fn interest_not_paid_at_or_below_threshold() {
    let account = interest("Bob", dec!(500));
    account.month_end_processing().unwrap();
    assert_eq!(account.balance(), dec!(500));
    assert_eq!(account.transaction_count(), 1);
}

#[test]
fn credit_line_month_end_charges_interest_on_debt() {
    let account = credit_line(dec!(2000));
    account.withdraw(dec!(1000), day(2), "tuition").unwrap();
    account.month_end_processing_at(day(31)).unwrap();

    let last = account.transactions().pop().unwrap();
    assert_eq!(last.amount(), dec!(-70));
    assert_eq!(last.note(), "Charge monthly interest");
    assert_eq!(account.balance(), dec!(-1070));
}

#[test]
fn credit_line_month_end_interest_past_limit_also_charges_fee() {
    let account = credit_line(dec!(1000));
    account.withdraw(dec!(1000), day(2), "tuition").unwrap();
    account.month_end_processing_at(day(31)).unwrap();
    assert_eq!(account.transaction_count(), 3);
    assert_eq!(account.balance(), dec!(-1090));
}

#[test]
fn gift_card_monthly_deposit() {
    let options = AccountOptions::gift_card(MonthlyDeposit { amount: dec!(50) });
    let account = Account::open_at(AccountNumber(8), "Gus", dec!(100), options, day(1)).unwrap();
    account.month_end_processing_at(day(31)).unwrap();
    assert_eq!(account.balance(), dec!(150));
    assert_eq!(account.transactions()[1].note(), "Add monthly deposit");
}

#[test]
fn rejected_month_end_withdrawal_leaves_log_unchanged() {
    let options = AccountOptions::basic()
        .with_minimum_balance(dec!(-100))
        .with_month_end(CreditLineInterest::default());
    let account =
        Account::open_at(AccountNumber(4), "Hal", Decimal::ZERO, options, day(1)).unwrap();
    account.withdraw(dec!(100), day(2), "to the limit").unwrap();

    let result = account.month_end_processing_at(day(31));
    assert_eq!(result, Err(LedgerError::InsufficientFunds));
    assert_eq!(account.transaction_count(), 1);
}

// === History ===

#[test]
fn history_of_two_transactions_has_three_lines() {
    let account = basic("Alice", dec!(100));
    account.withdraw(dec!(30), day(2), "rent").unwrap();

    let report = account.history().to_string();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Date\t\tAmount\tBalance\tNote");
    assert_eq!(lines[1], "3/1/2025\t100\t100\tInitial balance");
    assert_eq!(lines[2], "3/2/2025\t-30\t70\trent");
}

#[test]
fn history_running_balance_tracks_each_row() {
    let account = interest("Bob", dec!(1000));
    account.withdraw(dec!(200), day(2), "rent").unwrap();
    account.month_end_processing_at(day(31)).unwrap();

    let history = account.history();
    let balances: Vec<Decimal> = history.rows().iter().map(|row| row.balance).collect();
    assert_eq!(balances, vec![dec!(1000), dec!(800), dec!(840)]);
    assert_eq!(history.final_balance(), account.balance());
}

#[test]
fn history_is_a_snapshot() {
    let account = basic("Alice", dec!(100));
    let before = account.history();
    account.deposit(dec!(1), day(2), "later").unwrap();
    assert_eq!(before.len(), 1);
    assert_eq!(account.history().len(), 2);
}
