//! Admin bulk point awards from CSV uploads.
//!
//! Input is `email,points[,reason]` per line, with an optional header row.
//! Rows fail independently: a malformed email or unknown user is reported
//! with its line number and never aborts the rest of the batch.

use std::sync::Arc;
use std::sync::OnceLock;

use async_trait::async_trait;
use mockable::Clock;
use regex::Regex;

use crate::domain::ledger::{TransactionDirection, TransactionKind};
use crate::domain::ledger_service::{map_ledger_repository_error, validate_draft};
use crate::domain::ports::{
    BulkAwardCommand, BulkAwardOutcome, BulkRowError, LedgerRepository, UserDirectory,
};
use crate::domain::{CallerIdentity, Error};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// One successfully parsed CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAwardRow {
    pub line: usize,
    pub email: String,
    pub points: i64,
    pub reason: String,
}

const DEFAULT_REASON: &str = "bulk award";

fn parse_row(line_number: usize, line: &str) -> Result<BulkAwardRow, BulkRowError> {
    let mut fields = line.split(',').map(str::trim);
    let email = fields.next().unwrap_or_default();
    if !email_regex().is_match(email) {
        return Err(BulkRowError {
            line: line_number,
            reason: format!("malformed email: {email}"),
        });
    }

    let raw_points = fields.next().unwrap_or_default();
    let points: i64 = raw_points.parse().map_err(|_| BulkRowError {
        line: line_number,
        reason: format!("points must be an integer, got: {raw_points}"),
    })?;
    if points <= 0 {
        return Err(BulkRowError {
            line: line_number,
            reason: format!("points must be positive, got: {points}"),
        });
    }

    let reason = fields
        .next()
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REASON)
        .to_owned();

    Ok(BulkAwardRow {
        line: line_number,
        email: email.to_owned(),
        points,
        reason,
    })
}

/// Split CSV text into parsed rows and per-line errors.
///
/// Line numbers are physical and 1-based; blank lines and a leading
/// `email,...` header are skipped without consuming a number from errors.
pub fn parse_csv(csv: &str) -> (Vec<BulkAwardRow>, Vec<BulkRowError>) {
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in csv.lines().enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if line_number == 1 && trimmed.to_ascii_lowercase().starts_with("email") {
            continue;
        }
        match parse_row(line_number, trimmed) {
            Ok(row) => rows.push(row),
            Err(error) => errors.push(error),
        }
    }

    (rows, errors)
}

/// Bulk award service implementing the command driving port.
pub struct BulkAwardService<L, D> {
    ledger_repo: Arc<L>,
    directory: Arc<D>,
    clock: Arc<dyn Clock>,
}

impl<L, D> BulkAwardService<L, D> {
    /// Create a new service over the ledger and the user directory.
    pub fn new(ledger_repo: Arc<L>, directory: Arc<D>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ledger_repo,
            directory,
            clock,
        }
    }
}

#[async_trait]
impl<L, D> BulkAwardCommand for BulkAwardService<L, D>
where
    L: LedgerRepository,
    D: UserDirectory,
{
    async fn award_csv(
        &self,
        caller: &CallerIdentity,
        csv: &str,
    ) -> Result<BulkAwardOutcome, Error> {
        caller.require_admin()?;

        let (rows, mut errors) = parse_csv(csv);
        let mut processed = 0;

        for row in rows {
            let user = match self.directory.find_by_email(&row.email).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    errors.push(BulkRowError {
                        line: row.line,
                        reason: format!("no user with email: {}", row.email),
                    });
                    continue;
                }
                Err(error) => {
                    errors.push(BulkRowError {
                        line: row.line,
                        reason: format!("directory lookup failed: {error}"),
                    });
                    continue;
                }
            };

            let draft = match validate_draft(
                user.id,
                TransactionKind::Points,
                row.points,
                TransactionDirection::Earn,
                &row.reason,
                None,
                None,
                self.clock.utc(),
            ) {
                Ok(draft) => draft,
                Err(error) => {
                    errors.push(BulkRowError {
                        line: row.line,
                        reason: error.message().to_owned(),
                    });
                    continue;
                }
            };

            match self.ledger_repo.record(&draft).await {
                Ok(_) => processed += 1,
                Err(error) => {
                    let mapped = map_ledger_repository_error(error);
                    errors.push(BulkRowError {
                        line: row.line,
                        reason: mapped.message().to_owned(),
                    });
                }
            }
        }

        errors.sort_by_key(|error| error.line);
        Ok(BulkAwardOutcome { processed, errors })
    }
}

#[cfg(test)]
#[path = "bulk_award_tests.rs"]
mod tests;
