// src/main.rs

mod data_loader;
mod error;
mod export;
mod report;
mod result_table;
mod tui_app;

use data_loader::loader_for;
use report::Report;
use result_table::ResultTable;
use tui_app::TuiApp;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{info, warn, LevelFilter};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::rc::Rc;

/// Compare numerical ODE solutions against the exact solution in a 2x2 chart grid.
#[derive(Parser, Debug)]
#[command(name = "odeplot", version, about)]
struct Cli {
    /// Solver output with time, exact_solution, w_expl, w_impl and w_RK2 columns
    #[arg(default_value = "output_P1.csv", value_hint = clap::ValueHint::FilePath)]
    path: PathBuf,

    /// Input format; defaults to the file extension
    #[arg(short, long, value_parser = ["csv", "tsv"], ignore_case = true)]
    format: Option<String>,

    /// Column holding the Crank-Nicolson solution
    #[arg(long, default_value = result_table::W_CN)]
    cn_column: String,

    /// Write the chart grid to this SVG file instead of opening the viewer
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    svg: Option<PathBuf>,

    /// SVG size in pixels, WIDTHxHEIGHT
    #[arg(long, default_value = "1200x900", value_parser = export::parse_size)]
    size: (u32, u32),
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("ODEPLOT_LOG", "warn"))
        .init();

    let cli = Cli::parse();

    let loader = loader_for(&cli.path, cli.format.as_deref())?;

    let data = loader
        .load(&cli.path)
        .with_context(|| format!("failed to load {}", cli.path.display()))?;
    let table = ResultTable::from_table(&data, &cli.cn_column)
        .with_context(|| format!("{} is not a solver output table", cli.path.display()))?;
    if table.is_empty() {
        warn!("{} has no data rows", cli.path.display());
    }
    info!("{} rows loaded from {}", table.len(), cli.path.display());

    let report = Report::build(&table);

    if let Some(svg) = &cli.svg {
        export::write_svg(&report, svg, cli.size)?;
        return Ok(());
    }

    show(TuiApp::new(Rc::new(report)))
}

fn show(app: TuiApp) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    terminal.hide_cursor()?;

    let result = run_views(&mut terminal, app);

    let restored = first_error([
        terminal.show_cursor(),
        disable_raw_mode(),
        execute!(terminal.backend_mut(), LeaveAlternateScreen),
    ]);

    result.context("viewer failed")?;
    restored.context("failed to restore the terminal")
}

/// Every step has already run; reports the earliest failure.
fn first_error<const N: usize>(steps: [io::Result<()>; N]) -> io::Result<()> {
    steps.into_iter().collect()
}

fn run_views(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: TuiApp) -> io::Result<()> {
    let mut app_stack = vec![app];

    while let Some(current_app) = app_stack.last_mut() {
        if let Some(new_app) = current_app.main_loop(terminal)? {
            app_stack.push(new_app);
        } else {
            app_stack.pop();
        }
    }
    Ok(())
}
