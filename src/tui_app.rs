use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, LegendPosition, List,
        ListItem, Row, Table,
    },
    Frame, Terminal,
};

use crate::report::{Method, Panel, Report};

const SERIES_COLORS: [Color; 2] = [Color::Cyan, Color::Yellow];

const KEY_HELP: [(&str, &str); 5] = [
    ("arrows", "select panel"),
    ("Enter", "open selected panel"),
    ("Space", "toggle error statistics"),
    ("?", "toggle this help"),
    ("q / Esc", "close view"),
];

pub enum Transition {
    Stay,
    Push(TuiApp),
    Pop,
}

pub struct TuiApp {
    pub report: Rc<Report>,
    pub selected: Method,
    /// Shows only the selected panel, filling the window.
    pub focused: bool,
    pub show_stats: bool,
    pub show_help: bool,
}

impl TuiApp {
    pub fn new(report: Rc<Report>) -> Self {
        TuiApp {
            report,
            selected: Method::ExplicitEuler,
            focused: false,
            show_stats: false,
            show_help: false,
        }
    }

    pub fn main_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> io::Result<Option<TuiApp>> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    match self.handle_key(key.code) {
                        Transition::Stay => {}
                        Transition::Push(app) => return Ok(Some(app)),
                        Transition::Pop => return Ok(None),
                    }
                }
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Transition {
        if self.show_help {
            if let KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter = code {
                self.show_help = false;
            }
            return Transition::Stay;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Transition::Pop,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char(' ') => self.show_stats = !self.show_stats,
            KeyCode::Enter if !self.focused => return Transition::Push(self.open_focused_view()),
            KeyCode::Left | KeyCode::Right | KeyCode::Up | KeyCode::Down if !self.focused => {
                self.move_selection(code)
            }
            _ => {}
        }
        Transition::Stay
    }

    fn move_selection(&mut self, code: KeyCode) {
        let (row, col) = self.selected.grid_position();
        let (row, col) = match code {
            KeyCode::Left => (row, col.saturating_sub(1)),
            KeyCode::Right => (row, col + 1),
            KeyCode::Up => (row.saturating_sub(1), col),
            KeyCode::Down => (row + 1, col),
            _ => (row, col),
        };
        if let Some(method) = Method::at_grid_position(row, col) {
            self.selected = method;
        }
    }

    fn open_focused_view(&self) -> TuiApp {
        TuiApp {
            report: Rc::clone(&self.report),
            selected: self.selected,
            focused: true,
            show_stats: self.show_stats,
            show_help: false,
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let size = f.area();

        let stats_height = 3 + self.report.error_stats().len() as u16;
        let constraints = if self.show_stats {
            vec![Constraint::Min(0), Constraint::Length(stats_height)]
        } else {
            vec![Constraint::Percentage(100)]
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        if self.focused {
            let panel = self.report.panel(self.selected);
            f.render_widget(panel_chart(panel, false), chunks[0]);
        } else {
            self.render_grid(f, chunks[0]);
        }

        if self.show_stats {
            f.render_widget(self.stats_table(), chunks[1]);
        }

        if self.show_help {
            let popup_area = Self::centered_rect(60, 40, size);
            let block = Block::default()
                .title("Keys (q to close)")
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black));

            let items: Vec<ListItem> = KEY_HELP
                .iter()
                .map(|(key, action)| ListItem::new(format!("{:<8} {}", key, action)))
                .collect();

            f.render_widget(Clear, popup_area);
            f.render_widget(List::new(items).block(block), popup_area);
        }
    }

    fn render_grid(&self, f: &mut Frame, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50); 2])
            .split(area);

        for panel in &self.report.panels {
            let (row, col) = panel.method.grid_position();
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50); 2])
                .split(rows[row]);
            f.render_widget(panel_chart(panel, panel.method == self.selected), cells[col]);
        }
    }

    fn stats_table(&self) -> Table<'static> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(
            ["Method", "Column", "Max |error|", "RMS error", "Final |error|"]
                .into_iter()
                .map(|h| Cell::from(h).style(bold)),
        )
        .height(1)
        .bottom_margin(0);

        let rows = self.report.error_stats().iter().map(|(method, stats)| {
            let mut cells = vec![
                Cell::from(method.label()),
                Cell::from(self.report.panel(*method).source_column.clone()),
            ];
            match stats {
                Some(s) => {
                    for v in [s.max_abs, s.rms, s.final_abs] {
                        cells.push(Cell::from(format!("{:.3e}", v)));
                    }
                }
                None => cells.extend((0..3).map(|_| Cell::from("-"))),
            }
            Row::new(cells).height(1).bottom_margin(0)
        });

        let widths = [
            Constraint::Length(16),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(15),
        ];

        Table::new(rows.collect::<Vec<_>>(), widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Error vs exact solution"))
            .column_spacing(1)
    }

    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }
}

fn panel_chart(panel: &Panel, selected: bool) -> Chart<'_> {
    let datasets = panel
        .series
        .iter()
        .zip(SERIES_COLORS)
        .map(|(series, color)| {
            Dataset::default()
                .name(series.name.as_str())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(&series.points)
        })
        .collect::<Vec<_>>();

    let border_style = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(panel.title.as_str()),
        )
        .x_axis(
            Axis::default()
                .title(panel.x_label.as_str())
                .bounds(panel.bounds.x)
                .labels(axis_labels(panel.bounds.x)),
        )
        .y_axis(
            Axis::default()
                .title(panel.y_label.as_str())
                .bounds(panel.bounds.y)
                .labels(axis_labels(panel.bounds.y)),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Percentage(50), Constraint::Percentage(50)))
}

fn axis_labels([lo, hi]: [f64; 2]) -> Vec<Span<'static>> {
    [lo, lo / 2.0 + hi / 2.0, hi]
        .iter()
        .map(|&v| Span::raw(tick_label(v)))
        .collect()
}

fn tick_label(v: f64) -> String {
    if v != 0.0 && (v.abs() >= 1e5 || v.abs() < 1e-2) {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}
