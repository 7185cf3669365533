use colored::Colorize;

use crate::dashboard::{AppPath, Dispatcher, Host, Resource, Surface, SurfaceId};

/// Widest a single cell is printed
const MAX_CELL_WIDTH: usize = 40;

/// Prints the active surface whenever it changed since the last frame
#[derive(Default)]
pub struct Painter {
    last: Option<(SurfaceId, u64)>,
}

impl Painter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last frame so the next `paint` prints unconditionally
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn paint<D: Dispatcher>(&mut self, host: &Host<D>) {
        let Some(active) = host.active() else {
            return;
        };
        let Some(surface) = active.surface() else {
            return;
        };

        let key = (surface.id(), surface.revision());
        if self.last == Some(key) {
            return;
        }
        self.last = Some(key);

        println!("{}", render_frame(active.path(), surface));
    }
}

/// Text of one frame: header line, table, status line
pub fn render_frame(path: &AppPath, surface: &Surface) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        format!("[{}]", path).blue().bold(),
        surface.title().bold()
    ));

    let rows: &[Vec<String>] = surface.body().success().map(Vec::as_slice).unwrap_or(&[]);
    let widths = column_widths(surface.columns(), rows);

    if !surface.columns().is_empty() {
        out.push_str(&format!("{}\n", format_row(surface.columns(), &widths).bold()));
    }
    for row in rows {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }

    let status = match surface.body() {
        Resource::NotAsked => "waiting for first refresh".dimmed().to_string(),
        Resource::Loading => "loading...".yellow().to_string(),
        Resource::Success(rows) => {
            let stamp = surface
                .updated_at()
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            format!("{} rows, updated {}", rows.len(), stamp).green().to_string()
        }
        Resource::Failure(message) => format!("error: {}", message).red().to_string(),
    };
    out.push_str(&status);
    out
}

fn column_widths(columns: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    let count = rows.iter().map(Vec::len).chain([columns.len()]).max().unwrap_or(0);
    (0..count)
        .map(|i| {
            columns
                .get(i)
                .into_iter()
                .chain(rows.iter().filter_map(|row| row.get(i)))
                .map(|cell| cell.chars().count().min(MAX_CELL_WIDTH))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", truncate(cell), width = *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    short.push('~');
    short
}
