// src/export.rs

use std::error::Error;
use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::ReportError;
use crate::report::{Panel, Report};

const METHOD_COLOR: RGBColor = RGBColor(31, 119, 180);
const EXACT_COLOR: RGBColor = RGBColor(255, 127, 14);

pub fn write_svg(report: &Report, path: &Path, size: (u32, u32)) -> Result<(), ReportError> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_grid(&root, report).map_err(|e| ReportError::Export(e.to_string()))?;
    info!("wrote {}x{} chart grid to {}", size.0, size.1, path.display());
    Ok(())
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    report: &Report,
) -> Result<(), Box<dyn Error>>
where
    <DB as DrawingBackend>::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    // split_evenly yields cells row by row.
    let cells = root.split_evenly((2, 2));
    for panel in &report.panels {
        let (row, col) = panel.method.grid_position();
        draw_panel(&cells[row * 2 + col], panel)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
) -> Result<(), Box<dyn Error>>
where
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let [x_min, x_max] = panel.bounds.x;
    let [y_min, y_max] = panel.bounds.y;

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18.0).into_font())
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()?;

    for (series, color) in panel.series.iter().zip([METHOD_COLOR, EXACT_COLOR]) {
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), color.stroke_width(2)))?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Parses `WIDTHxHEIGHT`, e.g. `1200x900`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;
    if w == 0 || h == 0 {
        return Err("width and height must be positive".to_string());
    }
    Ok((w, h))
}
