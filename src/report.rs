//! Batch report assembly and persistence.
//!
//! One scan batch produces one report: an entry per dispatched candidate,
//! keyed by a sequential index starting at `"1"`, plus the two batch
//! timings. Hits carry the resolved point, payload and profit; failures
//! carry the error string; no-opportunity outcomes serialize as `null`.

use std::collections::BTreeMap;
use std::time::Duration;

use eyre::{Result, WrapErr};
use serde::Serialize;

use crate::arb::opportunity::{Opportunity, Outcome};

/// The reported summary of one confirmed opportunity.
#[derive(Clone, Debug, Serialize)]
pub struct OpportunityRecord {
    /// Id of the triangle the opportunity was found on
    pub triangle: i64,
    /// Resolved trade-ratio point
    pub point: u64,
    /// Packed execution payload, hex without `0x`
    pub payload: String,
    /// Confirmed profit, rendered in full precision
    pub profit: String,
}

impl From<&Opportunity> for OpportunityRecord {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            triangle: opportunity.triangle.id,
            point: opportunity.point,
            payload: opportunity.payload.clone(),
            profit: opportunity.profit.to_string(),
        }
    }
}

/// One report entry per dispatched candidate.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum ReportEntry {
    /// A confirmed opportunity
    Hit(OpportunityRecord),
    /// The error string of a failed resolution
    Error(String),
    /// No opportunity; serializes as `null`
    Miss,
}

/// The full report of one scan batch.
#[derive(Clone, Debug, Serialize)]
pub struct BatchReport {
    /// Milliseconds spent in selection and cost estimation
    pub select_ms: u128,
    /// Milliseconds for the whole batch, dispatch included
    pub total_ms: u128,
    /// Entries keyed by sequential index, starting at `"1"`
    pub result_map: BTreeMap<String, ReportEntry>,
}

impl BatchReport {
    /// Assembles the report from one batch of outcomes.
    ///
    /// Outcomes are keyed in arrival order; the batch itself carries no
    /// ordering guarantee, so neither do the keys.
    #[must_use]
    pub fn from_outcomes(outcomes: &[Outcome], select: Duration, total: Duration) -> Self {
        let result_map = outcomes
            .iter()
            .enumerate()
            .map(|(i, outcome)| {
                let entry = match outcome {
                    Outcome::Hit(opportunity) => ReportEntry::Hit(opportunity.into()),
                    Outcome::Miss => ReportEntry::Miss,
                    Outcome::Failed(error) => ReportEntry::Error(error.clone()),
                };
                ((i + 1).to_string(), entry)
            })
            .collect();

        Self {
            select_ms: select.as_millis(),
            total_ms: total.as_millis(),
            result_map,
        }
    }

    /// Number of entries in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.result_map.len()
    }

    /// Whether the report holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.result_map.is_empty()
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    /// * If serialization or the file write fails
    pub async fn write(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .wrap_err_with(|| format!("failed to write report to {path}"))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    /// A three-outcome batch: one hit, one miss, one failure.
    fn outcomes() -> Vec<Outcome> {
        vec![
            Outcome::Hit(opportunity(7, ("X", "Y", "Z"), 6_000_000)),
            Outcome::Miss,
            Outcome::Failed("oracle unavailable".to_string()),
        ]
    }

    #[test]
    fn test_keys_are_sequential_from_one() {
        let report = BatchReport::from_outcomes(
            &outcomes(),
            Duration::from_millis(2),
            Duration::from_millis(40),
        );

        assert_eq!(report.len(), 3);
        let keys: Vec<&str> = report.result_map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["1", "2", "3"]);
        assert_eq!(report.select_ms, 2);
        assert_eq!(report.total_ms, 40);
    }

    #[test]
    fn test_entry_shapes() {
        let report = BatchReport::from_outcomes(&outcomes(), Duration::ZERO, Duration::ZERO);
        let json = serde_json::to_value(&report).unwrap();
        let map = &json["result_map"];

        assert_eq!(map["1"]["triangle"], 7);
        assert_eq!(map["1"]["profit"], "6000000");
        assert!(map["2"].is_null());
        assert_eq!(map["3"], "oracle unavailable");
    }

    #[tokio::test]
    async fn test_write_round_trips_through_disk() {
        let report = BatchReport::from_outcomes(&outcomes(), Duration::ZERO, Duration::ZERO);
        let path = std::env::temp_dir().join("mantis-report-test.json");
        let path = path.to_string_lossy().to_string();

        report.write(&path).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["result_map"]["1"]["point"], 1_000);
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
