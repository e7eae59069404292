use crate::data::{load_summary, load_user, Dataset, VisitSource};
use crate::map::{MapRenderer, Viewport};
use crate::ui;
use crate::views::{SummaryView, UserView};
use ratatui::layout::Rect;

/// Which table the summary shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryTab {
    Users,
    Airports,
}

/// The two display modes
pub enum View {
    Summary(SummaryView),
    User(UserView),
}

/// Application state
pub struct App {
    pub dataset: Dataset,
    source: Box<dyn VisitSource>,
    pub view: View,
    pub summary_tab: SummaryTab,
    /// Highlighted row of the visible table
    pub selected: usize,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    /// Terminal area the map is drawn into (inside its border)
    pub map_area: Rect,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
}

impl App {
    /// Build the app and open the requested view (`None` is the summary)
    pub fn new(
        dataset: Dataset,
        source: Box<dyn VisitSource>,
        map_renderer: MapRenderer,
        width: u16,
        height: u16,
        user: Option<String>,
    ) -> Self {
        let map_area = ui::map_inner_area(Rect::new(0, 0, width, height));
        let mut app = Self {
            dataset,
            source,
            view: View::Summary(SummaryView::default()),
            summary_tab: SummaryTab::Users,
            selected: 0,
            viewport: Viewport::world(map_area.width as usize * 2, map_area.height as usize * 4),
            map_renderer,
            map_area,
            should_quit: false,
            last_mouse: None,
        };
        app.open(user);
        app
    }

    /// Switch view. A user's log is re-read each time it is opened.
    pub fn open(&mut self, user: Option<String>) {
        self.selected = 0;
        self.last_mouse = None;
        let (width, height) = self.map_pixel_size();

        match user {
            Some(user) => {
                let log = load_user(self.source.as_ref(), &user);
                let view = UserView::new(&user, log, &self.dataset.airports);
                self.viewport = Viewport::focus(&view.marker_points(), width, height);
                self.view = View::User(view);
            }
            None => {
                let summary = load_summary(self.source.as_ref(), &self.dataset.users);
                self.view = View::Summary(SummaryView::new(summary, &self.dataset.airports));
                self.viewport = Viewport::world(width, height);
            }
        }
    }

    /// Currently selected user, if any
    pub fn current_user(&self) -> Option<&str> {
        match &self.view {
            View::User(view) => Some(&view.user),
            View::Summary(_) => None,
        }
    }

    /// Picker position: 0 is "all users", then the manifest in order
    pub fn picker_index(&self) -> usize {
        self.current_user()
            .and_then(|user| self.dataset.users.iter().position(|u| u == user))
            .map_or(0, |idx| idx + 1)
    }

    /// Step the user picker forward or back, wrapping around
    pub fn cycle_user(&mut self, forward: bool) {
        let slots = self.dataset.users.len() + 1;
        let current = self.picker_index();
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        let user = next.checked_sub(1).map(|idx| self.dataset.users[idx].clone());
        self.open(user);
    }

    /// Back to the summary from a user's map
    pub fn back(&mut self) {
        if matches!(self.view, View::User(_)) {
            self.open(None);
        }
    }

    /// Open the user highlighted in the summary's user table
    pub fn open_selected(&mut self) {
        if let View::Summary(view) = &self.view {
            if self.summary_tab == SummaryTab::Users {
                if let Some(row) = view.summary.users.get(self.selected) {
                    let user = row.user.clone();
                    self.open(Some(user));
                }
            }
        }
    }

    pub fn toggle_tab(&mut self) {
        if matches!(self.view, View::Summary(_)) {
            self.summary_tab = match self.summary_tab {
                SummaryTab::Users => SummaryTab::Airports,
                SummaryTab::Airports => SummaryTab::Users,
            };
            self.selected = 0;
        }
    }

    /// Rows in the table currently on screen
    pub fn row_count(&self) -> usize {
        match &self.view {
            View::Summary(view) => match self.summary_tab {
                SummaryTab::Users => view.summary.users.len(),
                SummaryTab::Airports => view.airports.len(),
            },
            View::User(view) => view.rows.len(),
        }
    }

    /// Move the table highlight, clamped to the table
    pub fn move_selection(&mut self, delta: isize) {
        let last = self.row_count().saturating_sub(1);
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.map_area = ui::map_inner_area(Rect::new(0, 0, width, height));
        let (w, h) = self.map_pixel_size();
        self.viewport.width = w;
        self.viewport.height = h;
    }

    /// Braille pixel size of the map area
    fn map_pixel_size(&self) -> (usize, usize) {
        (self.map_area.width as usize * 2, self.map_area.height as usize * 4)
    }

    /// Terminal cell to map pixel, `None` off the map or outside the user view
    fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        if !matches!(self.view, View::User(_)) {
            return None;
        }
        let area = self.map_area;
        if col < area.x || row < area.y || col >= area.right() || row >= area.bottom() {
            return None;
        }
        Some((((col - area.x) as i32) * 2, ((row - area.y) as i32) * 4))
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        if matches!(self.view, View::User(_)) {
            self.viewport.pan(dx, dy);
        }
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom towards a terminal cell
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a terminal cell
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Re-fit the map to the user's airports
    pub fn reset_view(&mut self) {
        let (width, height) = self.map_pixel_size();
        self.viewport = match &self.view {
            View::User(view) => Viewport::focus(&view.marker_points(), width, height),
            View::Summary(_) => Viewport::world(width, height),
        };
    }

    pub fn start_drag(&mut self, col: u16, row: u16) {
        self.last_mouse = self.map_pixel(col, row).map(|_| (col, row));
    }

    /// Pan by the distance dragged since the last event
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = last_col as i32 - col as i32;
            let dy = last_row as i32 - row as i32;
            // Character cells are 2x4 braille pixels
            self.pan(dx * 2, dy * 4);
            self.last_mouse = Some((col, row));
        }
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::parse_airport_directory;
    use anyhow::{anyhow, Result};
    use std::collections::HashMap;

    struct MemorySource(HashMap<&'static str, &'static str>);

    impl VisitSource for MemorySource {
        fn read_log(&self, user: &str) -> Result<String> {
            self.0
                .get(user)
                .map(|s| s.to_string())
                .ok_or_else(|| anyhow!("missing {user}"))
        }
    }

    fn app(user: Option<&str>) -> App {
        let dataset = Dataset {
            airports: parse_airport_directory(
                "c;i;n;lat;lon\nUSA;JFK;Kennedy;40.64;-73.78\nUSA;SFO;San Francisco;37.62;-122.38\n",
            ),
            users: vec!["zoe".to_string(), "ghost".to_string(), "mia".to_string()],
        };
        let source = MemorySource(HashMap::from([("zoe", "JFK A\nSFO D\n"), ("mia", "SFO L\n")]));
        App::new(
            dataset,
            Box::new(source),
            MapRenderer::new(),
            100,
            40,
            user.map(str::to_string),
        )
    }

    #[test]
    fn test_starts_in_summary() {
        let app = app(None);
        let View::Summary(view) = &app.view else {
            panic!("expected summary");
        };
        assert_eq!(view.summary.users.len(), 3);
        assert!(view.summary.users[1].unavailable);
        assert_eq!(app.picker_index(), 0);
    }

    #[test]
    fn test_starts_in_user_view_focused() {
        let app = app(Some("zoe"));
        let View::User(view) = &app.view else {
            panic!("expected user view");
        };
        assert_eq!(view.markers.len(), 2);
        assert!(app.viewport.center_lon < -90.0 && app.viewport.center_lon > -100.0);
        assert_eq!(app.picker_index(), 1);
    }

    #[test]
    fn test_cycle_user_wraps() {
        let mut app = app(None);
        app.cycle_user(true);
        assert_eq!(app.current_user(), Some("zoe"));
        app.cycle_user(false);
        assert_eq!(app.current_user(), None);
        app.cycle_user(false);
        assert_eq!(app.current_user(), Some("mia"));
        app.cycle_user(true);
        assert_eq!(app.current_user(), None);
    }

    #[test]
    fn test_open_selected_and_back() {
        let mut app = app(None);
        app.move_selection(2);
        app.open_selected();
        assert_eq!(app.current_user(), Some("mia"));
        app.back();
        assert_eq!(app.current_user(), None);
    }

    #[test]
    fn test_missing_user_opens_empty_view() {
        let app = app(Some("ghost"));
        let View::User(view) = &app.view else {
            panic!("expected user view");
        };
        assert!(view.load_error.is_some());
        assert_eq!(app.viewport.zoom, 1.0);
    }

    #[test]
    fn test_selection_clamped_and_tab_toggle() {
        let mut app = app(None);
        app.move_selection(10);
        assert_eq!(app.selected, 2);
        app.move_selection(-10);
        assert_eq!(app.selected, 0);

        app.toggle_tab();
        assert_eq!(app.summary_tab, SummaryTab::Airports);
        assert_eq!(app.row_count(), 2);
    }

    #[test]
    fn test_drag_only_on_map() {
        let mut app = app(Some("zoe"));
        let before = app.viewport.center_lon;
        let (x, y) = (app.map_area.x + 10, app.map_area.y + 5);
        app.start_drag(x, y);
        app.handle_drag(x - 5, y);
        assert!(app.viewport.center_lon > before);

        let mut summary = self::app(None);
        summary.start_drag(10, 10);
        assert!(summary.last_mouse.is_none());
    }
}
