// src/result_table.rs

use log::warn;

use crate::data_loader::TableData;
use crate::error::ReportError;
use crate::report::Method;

pub const TIME: &str = "time";
pub const EXACT_SOLUTION: &str = "exact_solution";
pub const W_EXPL: &str = "w_expl";
pub const W_IMPL: &str = "w_impl";
pub const W_RK2: &str = "w_RK2";
pub const W_CN: &str = "w_cn";

/// Numeric view of the solver output, one vector per column.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub time: Vec<f64>,
    pub exact_solution: Vec<f64>,
    pub explicit_euler: Vec<f64>,
    pub implicit_euler: Vec<f64>,
    pub runge_kutta2: Vec<f64>,
    /// `None` when the file has no Crank-Nicolson column.
    pub crank_nicolson: Option<Vec<f64>>,
    crank_nicolson_column: String,
}

impl ResultTable {
    pub fn from_table(data: &TableData, cn_column: &str) -> Result<Self, ReportError> {
        let time = numeric_column(data, TIME)?;
        let exact_solution = numeric_column(data, EXACT_SOLUTION)?;
        let explicit_euler = numeric_column(data, W_EXPL)?;
        let implicit_euler = numeric_column(data, W_IMPL)?;
        let runge_kutta2 = numeric_column(data, W_RK2)?;

        let (crank_nicolson, crank_nicolson_column) = match data.column(cn_column) {
            Some(_) => (Some(numeric_column(data, cn_column)?), cn_column.to_string()),
            None => {
                warn!(
                    "column '{}' not found, Crank-Nicolson panel shows '{}' instead",
                    cn_column, W_RK2
                );
                (None, W_RK2.to_string())
            }
        };

        if let Some(row) = time.windows(2).position(|w| w[1] <= w[0]) {
            warn!("'{}' is not strictly increasing at row {}", TIME, row + 2);
        }

        Ok(ResultTable {
            time,
            exact_solution,
            explicit_euler,
            implicit_euler,
            runge_kutta2,
            crank_nicolson,
            crank_nicolson_column,
        })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn approximation(&self, method: Method) -> &[f64] {
        match method {
            Method::ExplicitEuler => &self.explicit_euler,
            Method::ImplicitEuler => &self.implicit_euler,
            Method::RungeKutta2 => &self.runge_kutta2,
            Method::CrankNicolson => self
                .crank_nicolson
                .as_deref()
                .unwrap_or(self.runge_kutta2.as_slice()),
        }
    }

    /// Header of the column actually plotted for `method`.
    pub fn source_column(&self, method: Method) -> &str {
        match method {
            Method::ExplicitEuler => W_EXPL,
            Method::ImplicitEuler => W_IMPL,
            Method::RungeKutta2 => W_RK2,
            Method::CrankNicolson => &self.crank_nicolson_column,
        }
    }
}

fn numeric_column(data: &TableData, name: &str) -> Result<Vec<f64>, ReportError> {
    let raw = data.column(name).ok_or_else(|| ReportError::MissingColumn {
        column: name.to_string(),
    })?;

    raw.iter()
        .enumerate()
        .map(|(i, cell)| {
            cell.trim()
                .parse::<f64>()
                .map_err(|_| ReportError::InvalidNumber {
                    column: name.to_string(),
                    row: i + 1,
                    value: cell.clone(),
                })
        })
        .collect()
}
