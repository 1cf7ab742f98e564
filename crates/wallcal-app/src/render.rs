use wallcal_board::Board;

/// Receives every recomputed board.
pub trait Renderer: Send {
    fn render(&mut self, board: &Board);
}

/// Writes a one-line summary per cell to the log.
#[derive(Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn render(&mut self, board: &Board) {
        tracing::info!(today = %board.today, "Board updated");
        for cell in board.cells() {
            tracing::debug!(
                row = cell.cell.row,
                col = cell.cell.col,
                date = %cell.date_key,
                anchor = cell.cell.is_anchor,
                moon = cell.moon_symbol(),
                events = cell.events.len(),
                weather = cell.weather.as_ref().map(|w| w.temperature_line.as_str()).unwrap_or(""),
                "{}",
                cell.date_label
            );
        }
    }
}
