//! Chart data preparation.
//!
//! Turns two numeric columns of a table into plot-ready data. Drawing
//! itself happens in `ui::plot`; nothing here touches the table.

use super::error::ChartError;
use super::model::{Cell, Table};

/// Pie charts with more slices than this are refused by default.
pub const DEFAULT_MAX_PIE_CATEGORIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Line, ChartKind::Pie];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "📊 Bar Chart",
            ChartKind::Line => "📈 Line Chart",
            ChartKind::Pie => "🥧 Pie Chart",
        }
    }
}

/// One bar, labelled with its x value.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// One pie slice: the y total of all rows sharing an x value.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the whole pie, in `0.0..=1.0`.
    pub fraction: f64,
}

impl PieSlice {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bars(Vec<Bar>),
    Line(Vec<[f64; 2]>),
    Pie(Vec<PieSlice>),
}

/// A rendered chart, ready for the plotting layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self.data {
            ChartData::Bars(_) => ChartKind::Bar,
            ChartData::Line(_) => ChartKind::Line,
            ChartData::Pie(_) => ChartKind::Pie,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartAdapter {
    pub max_pie_categories: usize,
}

impl Default for ChartAdapter {
    fn default() -> Self {
        ChartAdapter {
            max_pie_categories: DEFAULT_MAX_PIE_CATEGORIES,
        }
    }
}

impl ChartAdapter {
    pub fn new(max_pie_categories: usize) -> Self {
        ChartAdapter { max_pie_categories }
    }

    /// Plot `y_col` against `x_col`.
    ///
    /// Bar and line charts keep row order and skip rows where either value is
    /// missing. Pie charts group by x, sum y per group and order groups by x.
    pub fn render(
        &self,
        table: &Table,
        x_col: &str,
        y_col: &str,
        kind: ChartKind,
    ) -> Result<Chart, ChartError> {
        let found = table.columns().iter().filter(|c| c.is_numeric()).count();
        if found < 2 {
            return Err(ChartError::TooFewNumericColumns { found });
        }
        if x_col == y_col {
            return Err(ChartError::IdenticalAxes);
        }
        let xs = numeric_values(table, x_col)?;
        let ys = numeric_values(table, y_col)?;

        let pairs = xs.iter().zip(ys);
        let data = match kind {
            ChartKind::Bar => ChartData::Bars(
                pairs
                    .filter_map(|(x, y)| Some(Bar {
                        label: Cell::Number((*x)?).to_string(),
                        value: (*y)?,
                    }))
                    .collect(),
            ),
            ChartKind::Line => ChartData::Line(
                pairs
                    .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
                    .collect(),
            ),
            ChartKind::Pie => ChartData::Pie(self.pie_slices(xs, ys)?),
        };

        Ok(Chart {
            x_label: x_col.to_string(),
            y_label: y_col.to_string(),
            data,
        })
    }

    fn pie_slices(
        &self,
        xs: &[Option<f64>],
        ys: &[Option<f64>],
    ) -> Result<Vec<PieSlice>, ChartError> {
        // Rows with a missing x belong to no group; a missing y adds nothing.
        let mut rows: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| {
                let x = (*x)?;
                let x = if x == 0.0 { 0.0 } else { x };
                Some((x, y.unwrap_or(0.0)))
            })
            .collect();
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut groups: Vec<(f64, f64)> = Vec::new();
        for (x, y) in rows {
            match groups.last_mut() {
                Some((key, sum)) if *key == x => *sum += y,
                _ => groups.push((x, y)),
            }
        }

        if groups.len() > self.max_pie_categories {
            return Err(ChartError::TooManyCategories {
                count: groups.len(),
                max: self.max_pie_categories,
            });
        }
        if let Some((key, _)) = groups.iter().find(|(_, sum)| *sum < 0.0) {
            return Err(ChartError::NegativeSlice(Cell::Number(*key).to_string()));
        }
        let total: f64 = groups.iter().map(|(_, sum)| sum).sum();
        if total <= 0.0 {
            return Err(ChartError::EmptyPie);
        }

        Ok(groups
            .into_iter()
            .map(|(key, sum)| PieSlice {
                label: Cell::Number(key).to_string(),
                value: sum,
                fraction: sum / total,
            })
            .collect())
    }
}

fn numeric_values<'a>(table: &'a Table, name: &str) -> Result<&'a [Option<f64>], ChartError> {
    table
        .column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))?
        .numbers()
        .ok_or_else(|| ChartError::NotNumeric(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table(xs: Vec<Option<f64>>, ys: Vec<Option<f64>>) -> Table {
        Table::new(vec![Column::numeric("x", xs), Column::numeric("y", ys)])
    }

    #[test]
    fn test_bar_chart_keeps_row_order() {
        let t = table(
            vec![Some(3.0), Some(1.0), None, Some(2.5)],
            vec![Some(30.0), Some(10.0), Some(5.0), None],
        );
        let chart = ChartAdapter::default()
            .render(&t, "x", "y", ChartKind::Bar)
            .unwrap();
        assert_eq!(chart.kind(), ChartKind::Bar);
        assert_eq!(
            chart.data,
            ChartData::Bars(vec![
                Bar { label: "3".into(), value: 30.0 },
                Bar { label: "1".into(), value: 10.0 },
            ])
        );
    }

    #[test]
    fn test_line_chart_points() {
        let t = table(vec![Some(1.0), Some(2.0)], vec![Some(5.0), Some(7.0)]);
        let chart = ChartAdapter::default()
            .render(&t, "x", "y", ChartKind::Line)
            .unwrap();
        assert_eq!(chart.x_label, "x");
        assert_eq!(chart.y_label, "y");
        assert_eq!(chart.data, ChartData::Line(vec![[1.0, 5.0], [2.0, 7.0]]));
    }

    #[test]
    fn test_identical_axes_blocked() {
        let t = table(vec![Some(1.0)], vec![Some(2.0)]);
        let err = ChartAdapter::default()
            .render(&t, "x", "x", ChartKind::Line)
            .unwrap_err();
        assert_eq!(err, ChartError::IdenticalAxes);
    }

    #[test]
    fn test_needs_two_numeric_columns() {
        let t = Table::new(vec![
            Column::numeric("x", vec![Some(1.0)]),
            Column::text("label", vec![Some("a".into())]),
        ]);
        let err = ChartAdapter::default()
            .render(&t, "x", "label", ChartKind::Bar)
            .unwrap_err();
        assert_eq!(err, ChartError::TooFewNumericColumns { found: 1 });
    }

    #[test]
    fn test_text_or_unknown_column_rejected() {
        let t = Table::new(vec![
            Column::numeric("x", vec![Some(1.0)]),
            Column::numeric("y", vec![Some(1.0)]),
            Column::text("label", vec![Some("a".into())]),
        ]);
        let adapter = ChartAdapter::default();
        assert_eq!(
            adapter.render(&t, "x", "label", ChartKind::Bar).unwrap_err(),
            ChartError::NotNumeric("label".into())
        );
        assert_eq!(
            adapter.render(&t, "nope", "y", ChartKind::Bar).unwrap_err(),
            ChartError::UnknownColumn("nope".into())
        );
    }

    #[test]
    fn test_pie_groups_and_sums() {
        let t = table(
            vec![Some(2.0), Some(1.0), Some(2.0), None, Some(1.0)],
            vec![Some(30.0), Some(10.0), Some(30.0), Some(99.0), Some(30.0)],
        );
        let chart = ChartAdapter::default()
            .render(&t, "x", "y", ChartKind::Pie)
            .unwrap();
        let ChartData::Pie(slices) = chart.data else {
            panic!("expected pie data");
        };
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].label, "1");
        assert_eq!(slices[0].value, 40.0);
        assert_eq!(slices[1].label, "2");
        assert_eq!(slices[1].value, 60.0);
        assert_eq!(slices[0].percent_label(), "40.0%");
        assert_eq!(slices[1].percent_label(), "60.0%");
    }

    #[test]
    fn test_pie_cardinality_limit() {
        let xs: Vec<Option<f64>> = (0..11).map(|i| Some(i as f64)).collect();
        let ys = vec![Some(1.0); 11];
        let t = table(xs.clone(), ys.clone());
        let err = ChartAdapter::default()
            .render(&t, "x", "y", ChartKind::Pie)
            .unwrap_err();
        assert_eq!(err, ChartError::TooManyCategories { count: 11, max: 10 });

        let t = table(xs[..10].to_vec(), ys[..10].to_vec());
        assert!(ChartAdapter::default()
            .render(&t, "x", "y", ChartKind::Pie)
            .is_ok());
    }

    #[test]
    fn test_pie_limit_is_configurable() {
        let t = table(
            vec![Some(1.0), Some(2.0), Some(3.0)],
            vec![Some(1.0), Some(1.0), Some(1.0)],
        );
        let err = ChartAdapter::new(2)
            .render(&t, "x", "y", ChartKind::Pie)
            .unwrap_err();
        assert_eq!(err, ChartError::TooManyCategories { count: 3, max: 2 });
    }

    #[test]
    fn test_pie_rejects_negative_and_empty() {
        let adapter = ChartAdapter::default();
        let t = table(vec![Some(1.0), Some(2.0)], vec![Some(5.0), Some(-1.0)]);
        assert_eq!(
            adapter.render(&t, "x", "y", ChartKind::Pie).unwrap_err(),
            ChartError::NegativeSlice("2".into())
        );
        let t = table(vec![Some(1.0)], vec![Some(0.0)]);
        assert_eq!(
            adapter.render(&t, "x", "y", ChartKind::Pie).unwrap_err(),
            ChartError::EmptyPie
        );
    }
}
