use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, FontId, Sense, Shape, Stroke, Ui, Vec2};
use egui_plot::{Bar as PlotBar, BarChart, Legend, Line, Plot, PlotPoints};

use crate::color::{generate_palette, SERIES_COLOR};
use crate::data::chart::{Bar, Chart, ChartData, PieSlice};

const PLOT_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Chart rendering (central panel)
// ---------------------------------------------------------------------------

/// Draw a chart produced by the chart adapter.
pub fn chart_view(ui: &mut Ui, chart: &Chart) {
    match &chart.data {
        ChartData::Bars(bars) => bar_plot(ui, chart, bars),
        ChartData::Line(points) => line_plot(ui, chart, points),
        ChartData::Pie(slices) => pie_chart(ui, slices),
    }
}

fn bar_plot(ui: &mut Ui, chart: &Chart, bars: &[Bar]) {
    // One bar per row at positions 0, 1, 2, …; the x value is the bar name.
    let bars: Vec<PlotBar> = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| PlotBar::new(i as f64, bar.value).name(&bar.label).width(0.6))
        .collect();

    Plot::new("bar_chart")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(SERIES_COLOR)
                    .name(&chart.y_label),
            );
        });
}

fn line_plot(ui: &mut Ui, chart: &Chart, points: &[[f64; 2]]) {
    let points: PlotPoints = points.iter().copied().collect();

    Plot::new("line_chart")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.as_str())
        .y_axis_label(chart.y_label.as_str())
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(points)
                    .name(&chart.y_label)
                    .color(SERIES_COLOR)
                    .width(1.5),
            );
        });
}

/// egui_plot has no pie chart, so slices are painted directly.
fn pie_chart(ui: &mut Ui, slices: &[PieSlice]) {
    let colors = generate_palette(slices.len());
    let label_color = ui.visuals().text_color();
    let size = ui.available_width().min(320.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
    let center = response.rect.center();
    let radius = size * 0.35;

    let mut start = -FRAC_PI_2;
    for (slice, color) in slices.iter().zip(colors) {
        let sweep = slice.fraction as f32 * TAU;
        let steps = (sweep / TAU * 90.0).ceil().max(1.0) as usize;
        let arc: Vec<_> = (0..=steps)
            .map(|i| center + radius * Vec2::angled(start + sweep * i as f32 / steps as f32))
            .collect();
        // Slices wider than half the pie are not convex; paint thin wedges.
        for edge in arc.windows(2) {
            painter.add(Shape::convex_polygon(
                vec![center, edge[0], edge[1]],
                color,
                Stroke::NONE,
            ));
        }

        let mid = Vec2::angled(start + sweep / 2.0);
        painter.text(
            center + radius * 0.6 * mid,
            Align2::CENTER_CENTER,
            slice.percent_label(),
            FontId::proportional(12.0),
            Color32::WHITE,
        );
        painter.text(
            center + radius * 1.2 * mid,
            Align2::CENTER_CENTER,
            &slice.label,
            FontId::proportional(13.0),
            label_color,
        );
        start += sweep;
    }
}
