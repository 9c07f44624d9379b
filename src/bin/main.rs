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

use account_ledger_rs::{AccountKind, AccountNumber, Bank, LedgerConfig, LedgerError};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Account Ledger - Replay ledger command CSV files
///
/// Reads account commands from a CSV file and writes account histories or a
/// balance summary to stdout. Logging goes to stderr and is controlled by
/// `RUST_LOG` (default `warn`).
#[derive(Parser, Debug)]
#[command(name = "account-ledger-rs")]
#[command(about = "Replays account ledger commands from a CSV file", long_about = None)]
struct Args {
    /// Path to CSV file with commands
    ///
    /// Expected format: type,account,amount,date,note
    /// Example: cargo run -- commands.csv > histories.txt
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// What to write to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::History)]
    output: OutputFormat,

    /// Interest-earning accounts are paid interest above this balance
    #[arg(long, default_value = "500")]
    interest_threshold: Decimal,

    /// Monthly interest rate for interest-earning accounts
    #[arg(long, default_value = "0.05")]
    interest_rate: Decimal,

    /// How far below zero a line of credit may go before fees apply
    #[arg(long, default_value = "2000")]
    credit_limit: Decimal,

    /// Fee charged for each withdrawal past the credit limit
    #[arg(long, default_value = "20")]
    overdraft_fee: Decimal,

    /// Monthly interest rate charged on a negative line-of-credit balance
    #[arg(long, default_value = "0.07")]
    credit_interest_rate: Decimal,

    /// Monthly top-up for gift cards (0 disables it)
    #[arg(long, default_value = "0")]
    gift_card_deposit: Decimal,
}

impl Args {
    fn config(&self) -> LedgerConfig {
        LedgerConfig {
            interest_threshold: self.interest_threshold,
            interest_rate: self.interest_rate,
            credit_limit: self.credit_limit,
            overdraft_fee: self.overdraft_fee,
            credit_interest_rate: self.credit_interest_rate,
            gift_card_deposit: self.gift_card_deposit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full history report per account
    History,
    /// One CSV row per account: account,owner,balance,transactions
    Summary,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let session = match process_commands(BufReader::new(file), &args.config()) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Error processing commands: {}", e);
            process::exit(1);
        }
    };

    let result = match args.output {
        OutputFormat::History => {
            write_histories(&session, io::stdout().lock()).map_err(csv::Error::from)
        }
        OutputFormat::Summary => write_summary(&session, io::stdout().lock()),
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Errors raised while replaying a single command.
#[derive(Error, Debug, PartialEq, Eq)]
enum ReplayError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("no account labelled '{0}'")]
    UnknownAccount(String),

    #[error("account label '{0}' is already in use")]
    DuplicateAccount(String),
}

/// Raw CSV record matching the input format.
///
/// Fields: `type, account, amount, date, note`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "type")]
    command: String,
    #[serde(default)]
    account: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    amount: Option<Decimal>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    date: Option<NaiveDate>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Open {
        label: String,
        kind: AccountKind,
        owner: String,
        initial_balance: Decimal,
        date: DateTime<Utc>,
    },
    Deposit {
        label: String,
        amount: Decimal,
        date: DateTime<Utc>,
        note: String,
    },
    Withdrawal {
        label: String,
        amount: Decimal,
        date: DateTime<Utc>,
        note: String,
    },
    /// Month end for one account, or for every account when `label` is `None`.
    MonthEnd {
        label: Option<String>,
        date: DateTime<Utc>,
    },
    Rename {
        label: String,
        owner: String,
    },
}

impl CsvRecord {
    /// Converts CSV record to a Command.
    ///
    /// Returns `None` for unknown command types or missing required fields.
    fn into_command(self) -> Option<Command> {
        let date = self
            .date
            .map_or_else(Utc::now, |d| d.and_time(NaiveTime::MIN).and_utc());
        let note = self.note.unwrap_or_default();
        let label = self.account;
        let command = self.command.to_lowercase();

        let kind = match command.as_str() {
            "open" => Some(AccountKind::Basic),
            "open_interest" => Some(AccountKind::InterestEarning),
            "open_credit" => Some(AccountKind::LineOfCredit),
            "open_gift" => Some(AccountKind::GiftCard),
            _ => None,
        };
        if let Some(kind) = kind {
            if label.is_empty() {
                return None;
            }
            let owner = if note.is_empty() { label.clone() } else { note };
            return Some(Command::Open {
                label,
                kind,
                owner,
                initial_balance: self.amount.unwrap_or(Decimal::ZERO),
                date,
            });
        }

        match command.as_str() {
            "deposit" => Some(Command::Deposit {
                label,
                amount: self.amount?,
                date,
                note,
            }),
            "withdrawal" => Some(Command::Withdrawal {
                label,
                amount: self.amount?,
                date,
                note,
            }),
            "month_end" => Some(Command::MonthEnd {
                label: (!label.is_empty()).then_some(label),
                date,
            }),
            "rename" if !note.is_empty() => Some(Command::Rename { label, owner: note }),
            _ => None,
        }
    }
}

/// Accounts opened while replaying a file, in opening order.
struct Session {
    bank: Bank,
    config: LedgerConfig,
    labels: HashMap<String, AccountNumber>,
    opened: Vec<AccountNumber>,
}

impl Session {
    fn new(config: LedgerConfig) -> Self {
        Self {
            bank: Bank::new(),
            config,
            labels: HashMap::new(),
            opened: Vec::new(),
        }
    }

    fn number(&self, label: &str) -> Result<AccountNumber, ReplayError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| ReplayError::UnknownAccount(label.to_string()))
    }

    fn apply(&mut self, command: Command) -> Result<(), ReplayError> {
        match command {
            Command::Open {
                label,
                kind,
                owner,
                initial_balance,
                date,
            } => {
                if self.labels.contains_key(&label) {
                    return Err(ReplayError::DuplicateAccount(label));
                }
                let number = self.bank.open_account_at(
                    owner,
                    initial_balance,
                    self.config.options_for(kind),
                    date,
                )?;
                debug!(%label, %number, %kind, "opened account");
                self.labels.insert(label, number);
                self.opened.push(number);
            }
            Command::Deposit {
                label,
                amount,
                date,
                note,
            } => {
                let number = self.number(&label)?;
                self.bank.account(&number)?.deposit(amount, date, note)?;
            }
            Command::Withdrawal {
                label,
                amount,
                date,
                note,
            } => {
                let number = self.number(&label)?;
                self.bank.account(&number)?.withdraw(amount, date, note)?;
            }
            Command::MonthEnd { label: Some(label), date } => {
                let number = self.number(&label)?;
                self.bank.account(&number)?.month_end_processing_at(date)?;
            }
            Command::MonthEnd { label: None, date } => {
                for (number, e) in self.bank.perform_month_end_at(date) {
                    warn!(%number, error = %e, "month end skipped");
                }
            }
            Command::Rename { label, owner } => {
                let number = self.number(&label)?;
                self.bank.account(&number)?.set_owner(owner);
            }
        }
        Ok(())
    }
}

/// Replays commands from a CSV reader.
///
/// Malformed rows and rejected commands are logged and skipped.
///
/// # CSV Format
///
/// Expected columns: `type, account, amount, date, note`
/// - `type`: open, open_interest, open_credit, open_gift, deposit, withdrawal,
///   month_end, rename
/// - `account`: label identifying the account within the file
/// - `amount`: Decimal amount (initial balance for the open commands)
/// - `date`: optional `YYYY-MM-DD`, defaults to now
/// - `note`: transaction note, owner name for open and rename
///
/// # Example
///
/// ```csv
/// type,account,amount,date,note
/// open,alice,100,2025-03-01,Alice
/// withdrawal,alice,30,2025-03-02,rent
/// month_end,,,2025-03-31,
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
fn process_commands<R: Read>(reader: R, config: &LedgerConfig) -> Result<Session, csv::Error> {
    let mut session = Session::new(*config);

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader);

    for (line, result) in rdr.deserialize::<CsvRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line + 2, error = %e, "skipping malformed row");
                continue;
            }
        };

        let Some(command) = record.into_command() else {
            warn!(line = line + 2, "skipping invalid command");
            continue;
        };

        if let Err(e) = session.apply(command) {
            warn!(line = line + 2, error = %e, "command rejected");
        }
    }

    Ok(session)
}

/// Writes `Account <number> (<owner>)` followed by the history report for
/// every account, in opening order.
fn write_histories<W: Write>(session: &Session, mut writer: W) -> io::Result<()> {
    for number in &session.opened {
        let Some(account) = session.bank.get_account(number) else {
            continue;
        };
        writeln!(writer, "Account {} ({})", number, account.owner())?;
        write!(writer, "{}", account.history())?;
        writeln!(writer)?;
    }
    writer.flush()
}

/// Writes one CSV row per account with balances rounded to 4 decimal places.
///
/// # CSV Format
///
/// Columns: `account, owner, balance, transactions`
fn write_summary<W: Write>(session: &Session, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for number in &session.opened {
        if let Some(account) = session.bank.get_account(number) {
            wtr.serialize(&*account)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
