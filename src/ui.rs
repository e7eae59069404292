use crate::app::{App, SummaryTab, View};
use crate::map::{Lod, MapLayers, Tint};
use crate::views::{SummaryView, UserView};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Widget},
    Frame,
};

const CHECK: &str = "✔";

/// Header, map, table and status bar of the single-user view
fn user_layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),      // Title and totals
            Constraint::Percentage(60), // Map
            Constraint::Min(3),         // Detail table
            Constraint::Length(1),      // Status bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

fn summary_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

fn map_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Where the map is drawn for a terminal of the given size, inside its border
pub fn map_inner_area(terminal: Rect) -> Rect {
    map_block().inner(user_layout(terminal)[1])
}

pub fn tint_color(tint: Tint) -> Color {
    match tint {
        Tint::Arrival => Color::Red,
        Tint::Departure => Color::Green,
        Tint::ArrivalDeparture => Color::Yellow,
        Tint::Layover => Color::Blue,
        Tint::Unflagged => Color::White,
    }
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    match &app.view {
        View::Summary(view) => {
            let [header, table, status] = summary_layout(area);
            render_header(frame, app, header, "Traveler Summary", None);
            match app.summary_tab {
                SummaryTab::Users => render_user_table(frame, app, view, table),
                SummaryTab::Airports => render_airport_table(frame, app, view, table),
            }
            render_summary_status(frame, view, status);
        }
        View::User(view) => {
            let [header, map, table, status] = user_layout(area);
            render_header(frame, app, header, &view.title(), Some(view));
            render_map(frame, app, view, map);
            render_detail_table(frame, app, view, table);
            render_map_status(frame, app, status);
        }
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect, title: &str, view: Option<&UserView>) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("| user: ", dim),
        Span::styled(
            format!("[{}]", app.current_user().unwrap_or("(all users)")),
            Style::default().fg(Color::Yellow),
        ),
    ];

    if let Some(view) = view {
        spans.push(Span::styled(" | ", dim));
        match &view.load_error {
            Some(e) => spans.push(Span::styled(format!("log unavailable: {e}"), Style::default().fg(Color::Red))),
            None => spans.push(Span::raw(view.totals_line())),
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn table_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn header_row(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
}

fn render_rows(frame: &mut Frame, app: &App, area: Rect, table: Table<'_>) {
    let table = table.row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_user_table(frame: &mut Frame, app: &App, view: &SummaryView, area: Rect) {
    let rows = view.summary.users.iter().map(|row| {
        let style = if row.unavailable {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        let name = if row.unavailable {
            format!("{} (unavailable)", row.user)
        } else {
            row.user.clone()
        };
        Row::new(vec![
            Cell::from(name),
            Cell::from(row.totals.total_visits.to_string()),
            Cell::from(row.totals.arrivals.to_string()),
            Cell::from(row.totals.departures.to_string()),
            Cell::from(row.totals.layovers.to_string()),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(9),
        ],
    )
    .header(header_row(&["User", "Visited", "Arrivals", "Departures", "Layovers"]))
    .block(table_block("Users"));
    render_rows(frame, app, area, table);
}

fn render_airport_table(frame: &mut Frame, app: &App, view: &SummaryView, area: Rect) {
    let rows = view.airports.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.country.clone()),
            Cell::from(row.code.clone()),
            Cell::from(row.name.clone()),
            Cell::from(row.totals.total_visits.to_string()),
            Cell::from(row.totals.arrivals.to_string()),
            Cell::from(row.totals.departures.to_string()),
            Cell::from(row.totals.layovers.to_string()),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(7),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(9),
        ],
    )
    .header(header_row(&["Country", "Code", "Airport", "Visits", "Arrivals", "Departures", "Layovers"]))
    .block(table_block("Airports"));
    render_rows(frame, app, area, table);
}

fn render_detail_table(frame: &mut Frame, app: &App, view: &UserView, area: Rect) {
    let flag = |set: bool| Cell::from(if set { CHECK } else { "" });
    let rows = view.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.country.clone()),
            Cell::from(row.code.clone()),
            Cell::from(row.name.clone()),
            flag(row.visit.arrived),
            flag(row.visit.departed),
            flag(row.visit.layover),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ],
    )
    .header(header_row(&["Country", "Code", "Airport", "A", "D", "L"]))
    .block(table_block("Airports"));
    render_rows(frame, app, area, table);
}

fn render_map(frame: &mut Frame, app: &App, view: &UserView, area: Rect) {
    let block = map_block().title(Span::styled(
        " Map ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        &view.markers,
    );
    frame.render_widget(MapWidget { layers }, inner);
}

/// Braille background with airport markers on top
struct MapWidget {
    layers: MapLayers,
}

impl MapWidget {
    fn render_layer(canvas: &crate::braille::BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                if let Some(ch) = canvas.glyph(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Self::render_layer(&self.layers.coastlines, Color::Cyan, area, buf);
        Self::render_layer(&self.layers.borders, Color::DarkGray, area, buf);

        for placed in &self.layers.markers {
            if placed.col >= area.width || placed.row >= area.height {
                continue;
            }
            let x = area.x + placed.col;
            let y = area.y + placed.row;
            let style = Style::default()
                .fg(tint_color(placed.marker.tint()))
                .add_modifier(Modifier::BOLD);
            buf[(x, y)].set_char(placed.marker.glyph()).set_style(style);

            // Code label to the right when there is room
            for (i, ch) in placed.marker.code.chars().enumerate() {
                let lx = x + 1 + i as u16;
                if lx >= area.right() {
                    break;
                }
                buf[(lx, y)].set_char(ch).set_fg(Color::White);
            }
        }
    }
}

fn render_summary_status(frame: &mut Frame, view: &SummaryView, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(format!(" {} users", view.summary.users.len()), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
        Span::styled(format!("{} airports", view.airports.len()), Style::default().fg(Color::Yellow)),
    ];
    let unavailable = view.summary.unavailable_count();
    if unavailable > 0 {
        spans.push(Span::styled(" | ", dim));
        spans.push(Span::styled(format!("{unavailable} unavailable"), Style::default().fg(Color::Red)));
    }
    spans.push(Span::styled(
        " | Tab:table ↑↓:select Enter:open [/]:user q:quit",
        dim,
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_map_status(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let legend = |glyph: &'static str, tint: Tint| Span::styled(glyph, Style::default().fg(tint_color(tint)));

    let status = Line::from(vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(Lod::from_zoom(app.viewport.zoom).label(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
        legend("▼", Tint::Arrival),
        Span::raw("A "),
        legend("▲", Tint::Departure),
        Span::raw("D "),
        legend("◆", Tint::ArrivalDeparture),
        Span::raw("AD "),
        legend("●", Tint::Layover),
        Span::raw("L "),
        legend("●", Tint::Unflagged),
        Span::raw("-"),
        Span::styled(
            " | hjkl:pan +/-:zoom r:refit b:borders [/]:user Esc:back q:quit",
            dim,
        ),
    ]);
    frame.render_widget(Paragraph::new(status), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::braille::BrailleCanvas;
    use crate::map::{AirportMarker, PlacedMarker};
    use crate::visits::VisitRecord;

    fn placed(col: u16, row: u16, code: &str, visit: VisitRecord) -> PlacedMarker {
        PlacedMarker {
            col,
            row,
            marker: AirportMarker { lon: 0.0, lat: 0.0, code: code.to_string(), visit },
        }
    }

    #[test]
    fn test_map_area_inside_border() {
        let inner = map_inner_area(Rect::new(0, 0, 100, 40));
        assert_eq!(inner.x, 1);
        assert_eq!(inner.y, 2);
        assert_eq!(inner.width, 98);
        assert!(inner.height > 0 && inner.bottom() < 40);
    }

    #[test]
    fn test_map_widget_draws_markers_and_labels() {
        let area = Rect::new(0, 0, 6, 2);
        let arrival = VisitRecord { arrived: true, departed: false, layover: false };
        let layover = VisitRecord { arrived: false, departed: false, layover: true };
        let mut coastlines = BrailleCanvas::new(6, 2);
        coastlines.set_pixel(0, 0);
        let layers = MapLayers {
            coastlines,
            borders: BrailleCanvas::new(6, 2),
            markers: vec![placed(2, 0, "JFK", arrival), placed(4, 1, "LAX", layover)],
        };

        let mut buf = Buffer::empty(area);
        MapWidget { layers }.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "⠁");
        assert_eq!(buf[(0, 0)].fg, Color::Cyan);

        assert_eq!(buf[(2, 0)].symbol(), "▼");
        assert_eq!(buf[(2, 0)].fg, Color::Red);
        assert!(buf[(2, 0)].modifier.contains(Modifier::BOLD));
        let label: String = (3..6).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(label, "JFK");
        assert_eq!(buf[(3, 0)].fg, Color::White);

        // Label stops at the right edge
        assert_eq!(buf[(4, 1)].symbol(), "●");
        assert_eq!(buf[(4, 1)].fg, Color::Blue);
        assert_eq!(buf[(5, 1)].symbol(), "L");
        assert_eq!(buf[(3, 1)].symbol(), " ");
    }

    #[test]
    fn test_map_widget_skips_markers_outside_area() {
        let area = Rect::new(0, 0, 4, 1);
        let layers = MapLayers {
            coastlines: BrailleCanvas::new(4, 1),
            borders: BrailleCanvas::new(4, 1),
            markers: vec![placed(4, 0, "CDG", VisitRecord { arrived: true, departed: true, layover: false })],
        };

        let mut buf = Buffer::empty(area);
        MapWidget { layers }.render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_tint_colors_distinct() {
        let colors = [
            Tint::Arrival,
            Tint::Departure,
            Tint::ArrivalDeparture,
            Tint::Layover,
            Tint::Unflagged,
        ]
        .map(tint_color);
        for (i, a) in colors.iter().enumerate() {
            assert!(colors[i + 1..].iter().all(|b| a != b));
        }
    }
}
