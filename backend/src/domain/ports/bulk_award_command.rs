//! Driving port for CSV bulk point awards.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{CallerIdentity, Error};

/// A row that could not be processed, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkRowError {
    pub line: usize,
    pub reason: String,
}

/// Result of one bulk upload: how many rows were awarded and which failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAwardOutcome {
    pub processed: usize,
    pub errors: Vec<BulkRowError>,
}

/// Use-case port for the admin CSV award surface.
#[async_trait]
pub trait BulkAwardCommand: Send + Sync {
    /// Parse `email,points[,reason]` lines and award each valid row;
    /// requires the admin capability. Row failures never abort the batch.
    async fn award_csv(
        &self,
        caller: &CallerIdentity,
        csv: &str,
    ) -> Result<BulkAwardOutcome, Error>;
}

/// Fixture command used until persistence is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBulkAwardCommand;

#[async_trait]
impl BulkAwardCommand for FixtureBulkAwardCommand {
    async fn award_csv(
        &self,
        caller: &CallerIdentity,
        _csv: &str,
    ) -> Result<BulkAwardOutcome, Error> {
        caller.require_admin()?;
        Ok(BulkAwardOutcome {
            processed: 0,
            errors: Vec::new(),
        })
    }
}
