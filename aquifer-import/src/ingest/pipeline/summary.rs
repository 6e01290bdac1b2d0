//! Per-run report

use std::collections::BTreeSet;

use serde::Serialize;

/// One row that was rolled back
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowFailure {
    /// Spreadsheet row number (header is row 1)
    pub row_number: usize,
    pub message: String,
}

/// Outcome of importing one campaign
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub campaign: String,
    pub processed: usize,
    pub failed: usize,
    /// Trimmed headers that matched no alias
    pub unmapped_columns: BTreeSet<String>,
    pub failures: Vec<RowFailure>,
}

impl RunSummary {
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            ..Default::default()
        }
    }

    pub fn record_success(&mut self) {
        self.processed += 1;
    }

    pub fn record_failure(&mut self, row_number: usize, message: impl Into<String>) {
        self.failed += 1;
        self.failures.push(RowFailure {
            row_number,
            message: message.into(),
        });
    }

    pub fn total_rows(&self) -> usize {
        self.processed + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_for_operators() {
        let mut summary = RunSummary::new("GA_calidad_2001");
        summary.record_success();
        summary.record_failure(5, "storage failure: database is locked");
        summary.unmapped_columns.insert("Turbidez".into());

        assert_eq!(summary.total_rows(), 2);
        assert!(summary.has_failures());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["campaign"], "GA_calidad_2001");
        assert_eq!(json["processed"], 1);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["unmapped_columns"][0], "Turbidez");
        assert_eq!(json["failures"][0]["row_number"], 5);
    }
}
