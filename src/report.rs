// src/report.rs

use log::{debug, warn};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::result_table::ResultTable;

pub const EXACT_LABEL: &str = "Exact solution";
pub const X_LABEL: &str = "t";
pub const Y_LABEL: &str = "y";

const MARGIN: f64 = 0.05;

/// Bounds never exceed this magnitude, so `hi - lo` stays finite.
pub const BOUND_LIMIT: f64 = f64::MAX / 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, PartialOrd, Ord)]
pub enum Method {
    ExplicitEuler,
    ImplicitEuler,
    RungeKutta2,
    CrankNicolson,
}

impl Method {
    pub fn title(self) -> &'static str {
        match self {
            Method::ExplicitEuler => "Euler forward method",
            Method::ImplicitEuler => "Euler backward method",
            Method::RungeKutta2 => "Runge-Kutta with two stages (RK2) method",
            Method::CrankNicolson => "Crank-Nicolson (CN) method",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Method::ExplicitEuler => "Euler forward",
            Method::ImplicitEuler => "Euler backward",
            Method::RungeKutta2 => "Runge-Kutta",
            Method::CrankNicolson => "Crank-Nicolson",
        }
    }

    pub fn grid_position(self) -> (usize, usize) {
        match self {
            Method::ExplicitEuler => (0, 0),
            Method::RungeKutta2 => (0, 1),
            Method::ImplicitEuler => (1, 0),
            Method::CrankNicolson => (1, 1),
        }
    }

    pub fn at_grid_position(row: usize, col: usize) -> Option<Method> {
        Method::iter().find(|m| m.grid_position() == (row, col))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    fn new(name: &str, time: &[f64], values: &[f64]) -> Self {
        let points: Vec<(f64, f64)> = time
            .iter()
            .zip(values)
            .map(|(&t, &y)| (t, y))
            .filter(|(t, y)| t.is_finite() && y.is_finite())
            .collect();

        let dropped = time.len().min(values.len()) - points.len();
        if dropped > 0 {
            warn!("'{}': {} non-finite points left out of the plot", name, dropped);
        }

        Series {
            name: name.to_string(),
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub x: [f64; 2],
    pub y: [f64; 2],
}

impl Default for AxisBounds {
    fn default() -> Self {
        AxisBounds {
            x: [0.0, 1.0],
            y: [0.0, 1.0],
        }
    }
}

impl AxisBounds {
    pub fn fit<'a>(series: impl IntoIterator<Item = &'a Series>) -> Self {
        let mut x: Option<[f64; 2]> = None;
        let mut y: Option<[f64; 2]> = None;

        for &(px, py) in series.into_iter().flat_map(|s| s.points.iter()) {
            x = Some(extend(x, px));
            y = Some(extend(y, py));
        }

        let default = AxisBounds::default();
        let x = x.map(|r| pad(widen_degenerate(r))).unwrap_or(default.x);
        let y = y.map(|r| pad(widen_degenerate(r))).unwrap_or(default.y);

        AxisBounds { x, y }
    }
}

fn extend(range: Option<[f64; 2]>, v: f64) -> [f64; 2] {
    match range {
        Some([lo, hi]) => [lo.min(v), hi.max(v)],
        None => [v, v],
    }
}

fn pad([lo, hi]: [f64; 2]) -> [f64; 2] {
    // Halved first: the full span of finite values can overflow.
    let pad = (hi / 2.0 - lo / 2.0) * (2.0 * MARGIN);
    [(lo - pad).max(-BOUND_LIMIT), (hi + pad).min(BOUND_LIMIT)]
}

fn widen_degenerate([lo, hi]: [f64; 2]) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        [lo - 0.5, hi + 0.5]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub method: Method,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Approximation first, exact solution second.
    pub series: Vec<Series>,
    pub bounds: AxisBounds,
    pub source_column: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorStats {
    pub max_abs: f64,
    pub rms: f64,
    /// Absolute error at the last row where both values are finite.
    pub final_abs: f64,
}

impl ErrorStats {
    pub fn between(approx: &[f64], exact: &[f64]) -> Option<ErrorStats> {
        let errors: Vec<f64> = approx
            .iter()
            .zip(exact)
            .filter(|(a, e)| a.is_finite() && e.is_finite())
            .map(|(a, e)| (a - e).abs())
            .collect();

        let final_abs = *errors.last()?;
        let max_abs = errors.iter().copied().fold(0.0, f64::max);
        let rms = if max_abs > 0.0 && max_abs.is_finite() {
            let mean_sq = errors.iter().map(|e| (e / max_abs).powi(2)).sum::<f64>()
                / errors.len() as f64;
            max_abs * mean_sq.sqrt()
        } else {
            max_abs
        };

        Some(ErrorStats {
            max_abs,
            rms,
            final_abs,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub panels: Vec<Panel>,
    stats: Vec<(Method, Option<ErrorStats>)>,
}

impl Report {
    pub fn build(table: &ResultTable) -> Report {
        let mut panels: Vec<Panel> = Method::iter()
            .map(|method| Panel {
                method,
                title: method.title().to_string(),
                x_label: X_LABEL.to_string(),
                y_label: Y_LABEL.to_string(),
                series: vec![
                    Series::new(method.label(), &table.time, table.approximation(method)),
                    Series::new(EXACT_LABEL, &table.time, &table.exact_solution),
                ],
                bounds: AxisBounds::default(),
                source_column: table.source_column(method).to_string(),
            })
            .collect();

        // Panels 2..4 share both axes with the top-left panel.
        let shared = AxisBounds::fit(panels.iter().flat_map(|p| p.series.iter()));
        for panel in &mut panels {
            panel.bounds = shared;
        }
        debug!("shared bounds: x={:?} y={:?}", shared.x, shared.y);

        let stats = Method::iter()
            .map(|m| (m, ErrorStats::between(table.approximation(m), &table.exact_solution)))
            .collect();

        Report { panels, stats }
    }

    pub fn panel(&self, method: Method) -> &Panel {
        &self.panels[method as usize]
    }

    pub fn error_stats(&self) -> &[(Method, Option<ErrorStats>)] {
        &self.stats
    }
}
