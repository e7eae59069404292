use crate::braille::BrailleCanvas;
use crate::map::geometry::draw_line;
use crate::map::marker::AirportMarker;
use crate::map::projection::Viewport;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Level of detail for background data
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }
}

/// A marker resolved to a character cell
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedMarker {
    pub col: u16,
    pub row: u16,
    pub marker: AirportMarker,
}

/// Rendered map layers, back to front
pub struct MapLayers {
    pub coastlines: BrailleCanvas,
    pub borders: BrailleCanvas,
    pub markers: Vec<PlacedMarker>,
}

/// Background geography at several resolutions
#[derive(Default)]
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
    pub show_borders: bool,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            show_borders: true,
            ..Self::default()
        }
    }

    /// Finest coastline set available at or below `lod`
    fn coastlines(&self, lod: Lod) -> &[LineString] {
        let candidates = match lod {
            Lod::High => [&self.coastlines_high, &self.coastlines_medium, &self.coastlines_low],
            Lod::Medium => [&self.coastlines_medium, &self.coastlines_low, &self.coastlines_low],
            Lod::Low => [&self.coastlines_low, &self.coastlines_medium, &self.coastlines_high],
        };
        candidates
            .into_iter()
            .find(|lines| !lines.is_empty())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn borders(&self, lod: Lod) -> &[LineString] {
        if lod == Lod::High && !self.borders_high.is_empty() {
            &self.borders_high
        } else {
            &self.borders_medium
        }
    }

    /// Draw the background and place markers for a canvas of
    /// `width x height` characters
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        markers: &[AirportMarker],
    ) -> MapLayers {
        let lod = Lod::from_zoom(viewport.zoom);

        let mut coastlines = BrailleCanvas::new(width, height);
        for line in self.coastlines(lod) {
            draw_linestring(&mut coastlines, line, viewport);
        }

        let mut borders = BrailleCanvas::new(width, height);
        if self.show_borders {
            for line in self.borders(lod) {
                draw_linestring(&mut borders, line, viewport);
            }
        }

        MapLayers {
            coastlines,
            borders,
            markers: place_markers(markers, viewport),
        }
    }

    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::High => self.borders_high.push(line),
            Lod::Low | Lod::Medium => self.borders_medium.push(line),
        }
    }

    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }

    pub fn toggle_borders(&mut self) {
        self.show_borders = !self.show_borders;
    }
}

/// Project markers to character cells. Where several share a cell the later
/// one in the input wins, keeping the result stable for sorted input.
fn place_markers(markers: &[AirportMarker], viewport: &Viewport) -> Vec<PlacedMarker> {
    let mut placed: Vec<PlacedMarker> = Vec::with_capacity(markers.len());

    for marker in markers {
        let (px, py) = viewport.project(marker.lon, marker.lat);
        if !viewport.contains(px, py) {
            continue;
        }

        let col = (px / 2) as u16;
        let row = (py / 4) as u16;
        match placed.iter_mut().find(|p| p.col == col && p.row == row) {
            Some(existing) => existing.marker = marker.clone(),
            None => placed.push(PlacedMarker {
                col,
                row,
                marker: marker.clone(),
            }),
        }
    }

    placed
}

/// Draw a linestring, skipping segments that are off-canvas or wrap the antimeridian
fn draw_linestring(canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;
    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }
        prev = Some((px, py));
    }
}
