use std::collections::HashSet;

use super::error::CleanError;
use super::model::{Cell, ColumnData, Table};

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

/// Hashable form of a cell. Missing cells compare equal to each other and
/// `-0.0` is folded onto `0.0`.
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Missing,
    Number(u64),
    Text(&'a str),
}

impl<'a> From<Cell<'a>> for CellKey<'a> {
    fn from(cell: Cell<'a>) -> Self {
        match cell {
            Cell::Missing => CellKey::Missing,
            Cell::Number(v) if v == 0.0 => CellKey::Number(0.0f64.to_bits()),
            Cell::Number(v) => CellKey::Number(v.to_bits()),
            Cell::Text(s) => CellKey::Text(s),
        }
    }
}

/// Flags for the rows to keep: the first occurrence of every distinct row.
fn first_occurrences(table: &Table) -> Vec<bool> {
    let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(table.row_count());
    (0..table.row_count())
        .map(|row| seen.insert(table.row(row).map(CellKey::from).collect()))
        .collect()
}

/// Remove rows that exactly repeat an earlier row, keeping first-occurrence
/// order. Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let keep = first_occurrences(table);
    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        table.retain_rows(&keep);
    }
    removed
}

// ---------------------------------------------------------------------------
// Mean fill
// ---------------------------------------------------------------------------

/// One numeric column that received fills.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFill {
    pub column: String,
    pub value: f64,
    pub cells: usize,
}

/// Outcome of [`fill_missing`]: what was filled and which columns were
/// skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillReport {
    pub filled: Vec<ColumnFill>,
    pub errors: Vec<CleanError>,
}

impl FillReport {
    pub fn cells_filled(&self) -> usize {
        self.filled.iter().map(|f| f.cells).sum()
    }
}

/// Mean of the present values, rounded half-to-even. `None` when there are
/// no present values.
fn rounded_mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| (sum / count as f64).round_ties_even())
}

/// Replace missing cells of every numeric column with the column's rounded
/// mean. Columns without any value are reported and left as they are; text
/// columns are never touched.
pub fn fill_missing(table: &mut Table) -> FillReport {
    let mut report = FillReport::default();

    for column in table.columns_mut() {
        let missing = column.data.missing_count();
        if missing == 0 {
            continue;
        }
        let ColumnData::Numeric(values) = &mut column.data else {
            continue;
        };
        let Some(mean) = rounded_mean(values) else {
            report.errors.push(CleanError::UndefinedMean {
                column: column.name.clone(),
            });
            continue;
        };
        for cell in values.iter_mut().filter(|v| v.is_none()) {
            *cell = Some(mean);
        }
        report.filled.push(ColumnFill {
            column: column.name.clone(),
            value: mean,
            cells: missing,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn text(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    fn with_duplicates() -> Table {
        Table::new(vec![
            Column::text(
                "region",
                text(&[Some("n"), Some("s"), Some("n"), None, None, Some("s")]),
            ),
            Column::numeric(
                "sales",
                vec![Some(1.0), Some(2.0), Some(1.0), None, None, Some(3.0)],
            ),
        ])
    }

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let mut table = with_duplicates();
        let removed = remove_duplicates(&mut table);
        assert_eq!(removed, 2);
        assert_eq!(table.row_count(), 4);
        assert_eq!(
            table.column("region").unwrap().data,
            ColumnData::Text(text(&[Some("n"), Some("s"), None, Some("s")]))
        );
        assert_eq!(
            table.column("sales").unwrap().data,
            ColumnData::Numeric(vec![Some(1.0), Some(2.0), None, Some(3.0)])
        );
    }

    #[test]
    fn test_remove_duplicates_is_idempotent() {
        let mut once = with_duplicates();
        remove_duplicates(&mut once);
        let mut twice = once.clone();
        assert_eq!(remove_duplicates(&mut twice), 0);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_negative_zero_is_duplicate() {
        let mut table = Table::new(vec![Column::numeric("v", vec![Some(0.0), Some(-0.0)])]);
        assert_eq!(remove_duplicates(&mut table), 1);
    }

    #[test]
    fn test_number_and_text_differ() {
        let mut table = Table::new(vec![
            Column::numeric("a", vec![Some(1.0), Some(1.0)]),
            Column::text("b", text(&[Some("1"), Some("x")])),
        ]);
        assert_eq!(remove_duplicates(&mut table), 0);
    }

    #[test]
    fn test_fill_missing_uses_rounded_mean() {
        let mut table = Table::new(vec![
            Column::text("region", text(&[Some("a"), Some("b"), None, Some("d"), Some("e")])),
            Column::numeric(
                "sales",
                vec![Some(10.0), Some(20.0), None, Some(40.0), Some(30.0)],
            ),
        ]);
        let report = fill_missing(&mut table);
        assert_eq!(
            report.filled,
            vec![ColumnFill {
                column: "sales".into(),
                value: 25.0,
                cells: 1
            }]
        );
        assert!(report.errors.is_empty());
        assert_eq!(table.cell(2, 1), Cell::Number(25.0));
        // Text columns keep their gaps.
        assert!(table.cell(2, 0).is_missing());
    }

    #[test]
    fn test_fill_rounds_half_to_even() {
        let mut table = Table::new(vec![Column::numeric(
            "v",
            vec![Some(2.0), Some(3.0), None],
        )]);
        fill_missing(&mut table);
        assert_eq!(table.cell(2, 0), Cell::Number(2.0));
    }

    #[test]
    fn test_undefined_mean_skips_only_that_column() {
        let mut table = Table::new(vec![
            Column::numeric("empty", vec![None, None]),
            Column::numeric("v", vec![Some(1.0), None]),
        ]);
        let report = fill_missing(&mut table);
        assert_eq!(
            report.errors,
            vec![CleanError::UndefinedMean {
                column: "empty".into()
            }]
        );
        assert_eq!(report.cells_filled(), 1);
        assert_eq!(table.column("empty").unwrap().data.missing_count(), 2);
        assert_eq!(table.cell(1, 1), Cell::Number(1.0));
    }

    #[test]
    fn test_fill_is_idempotent() {
        let mut table = Table::new(vec![Column::numeric(
            "v",
            vec![Some(1.0), None, Some(4.0)],
        )]);
        fill_missing(&mut table);
        let once = table.clone();
        let report = fill_missing(&mut table);
        assert!(report.filled.is_empty());
        assert_eq!(once, table);
    }
}
