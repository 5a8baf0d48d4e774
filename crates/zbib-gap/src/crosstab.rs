//! Row-group × column-group count matrix (heat-map data).

use serde::{Deserialize, Serialize};
use zbib_classify::{ClassificationTable, DimensionRegistry};
use zbib_common::DimensionGroup;

/// Row label for records that match a column but no row dimension.
pub const OTHER_ROW: &str = "Other";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_group: DimensionGroup,
    pub col_group: DimensionGroup,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `cells[row][col]`
    pub cells: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn get(&self, row: &str, col: &str) -> usize {
        let r = self.rows.iter().position(|n| n == row);
        let c = self.columns.iter().position(|n| n == col);
        match (r, c) {
            (Some(r), Some(c)) => self.cells[r][c],
            _ => 0,
        }
    }

    pub fn column_total(&self, col: &str) -> usize {
        self.columns
            .iter()
            .position(|n| n == col)
            .map(|c| self.cells.iter().map(|row| row[c]).sum())
            .unwrap_or(0)
    }
}

/// Count records carrying both a row dimension and a column dimension.
///
/// A record matching a column and none of the rows is added to the
/// [`OTHER_ROW`] row when `include_other` is set. Row and column order
/// follow registration order.
pub fn cross_tab(
    registry: &DimensionRegistry,
    table: &ClassificationTable,
    row_group: DimensionGroup,
    col_group: DimensionGroup,
    include_other: bool,
) -> CrossTab {
    let mut rows: Vec<String> = registry.names(row_group).map(str::to_string).collect();
    let columns: Vec<String> = registry.names(col_group).map(str::to_string).collect();
    let other_idx = rows.len();
    if include_other {
        rows.push(OTHER_ROW.to_string());
    }
    let mut cells = vec![vec![0usize; columns.len()]; rows.len()];

    for (_, _, result) in table.iter() {
        let (Some(row_labels), Some(col_labels)) = (result.get(&row_group), result.get(&col_group)) else {
            continue;
        };
        for (ci, col) in columns.iter().enumerate() {
            if !col_labels.contains(col) {
                continue;
            }
            let mut matched_row = false;
            for (ri, row) in rows.iter().take(other_idx).enumerate() {
                if row_labels.contains(row) {
                    cells[ri][ci] += 1;
                    matched_row = true;
                }
            }
            if include_other && !matched_row {
                cells[other_idx][ci] += 1;
            }
        }
    }

    CrossTab { row_group, col_group, rows, columns, cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zbib_classify::PatternClassifier;
    use zbib_test_utils::{sample_definitions, RecordBuilder};

    #[test]
    fn test_cross_tab_with_other_row() {
        let registry = Arc::new(DimensionRegistry::from_definitions(&sample_definitions()).unwrap());
        let classifier = PatternClassifier::new(registry.clone());
        let records = vec![
            RecordBuilder::new("1").title("OFC stimulation for anhedonia").build(),
            RecordBuilder::new("2").title("OFC and working memory with hallucinations").build(),
            RecordBuilder::new("3").title("OFC volume").build(),
            RecordBuilder::new("4").title("DLPFC and anhedonia").build(),
            RecordBuilder::new("5").title("nothing relevant").build(),
        ];
        let groups = [DimensionGroup::Symptom, DimensionGroup::Target];
        let table = classifier.classify_all(&records, &groups);

        let tab = cross_tab(&registry, &table, DimensionGroup::Symptom, DimensionGroup::Target, true);
        assert_eq!(tab.rows.last().map(String::as_str), Some(OTHER_ROW));
        assert_eq!(tab.get("Negative", "OFC"), 1);
        assert_eq!(tab.get("Cognitive", "OFC"), 1);
        assert_eq!(tab.get("Positive", "OFC"), 1);
        assert_eq!(tab.get(OTHER_ROW, "OFC"), 1);
        assert_eq!(tab.get("Negative", "DLPFC"), 1);
        assert_eq!(tab.column_total("OFC"), 4);

        let no_other = cross_tab(&registry, &table, DimensionGroup::Symptom, DimensionGroup::Target, false);
        assert!(!no_other.rows.iter().any(|r| r == OTHER_ROW));
        assert_eq!(no_other.get(OTHER_ROW, "OFC"), 0);
    }
}
