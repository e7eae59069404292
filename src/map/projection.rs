use std::f64::consts::PI;

/// Latitude limit of the Web Mercator square
const MAX_MERCATOR_LAT: f64 = 85.0511;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 100.0;

/// Closest zoom used when focusing on a handful of nearby airports
const FOCUS_MAX_ZOOM: f64 = 8.0;

/// Share of the canvas the focused airports may span
const FOCUS_MARGIN: f64 = 0.8;

/// Normalized Web Mercator coordinates, both in [0, 1]
#[inline]
fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = (lon + 180.0) / 360.0;
    let lat_rad = lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// 1.0 fits the whole world across the canvas width
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Whole-world view
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    /// Center on the average of `points` (lon, lat) and zoom so all of them fit.
    /// Falls back to the world view for an empty set.
    pub fn focus(points: &[(f64, f64)], width: usize, height: usize) -> Self {
        if points.is_empty() || width == 0 || height == 0 {
            return Self::world(width, height);
        }

        let n = points.len() as f64;
        let center_lon = points.iter().map(|p| p.0).sum::<f64>() / n;
        let center_lat = (points.iter().map(|p| p.1).sum::<f64>() / n).clamp(-85.0, 85.0);

        // Widest offset from the center in normalized Mercator units
        let (cx, cy) = mercator(center_lon, center_lat);
        let (mut span_x, mut span_y) = (0.0_f64, 0.0_f64);
        for &(lon, lat) in points {
            let (x, y) = mercator(lon, lat);
            span_x = span_x.max((x - cx).abs() * 2.0);
            span_y = span_y.max((y - cy).abs() * 2.0);
        }

        let w = width as f64;
        let h = height as f64;
        let fit_x = if span_x > 0.0 { FOCUS_MARGIN / span_x } else { FOCUS_MAX_ZOOM };
        let fit_y = if span_y > 0.0 { FOCUS_MARGIN * h / (w * span_y) } else { FOCUS_MAX_ZOOM };
        let zoom = fit_x.min(fit_y).clamp(MIN_ZOOM, FOCUS_MAX_ZOOM);

        Self::new(center_lon, center_lat, zoom, width, height)
    }

    /// Pan by a pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = 360.0 / (self.zoom * self.width.max(1) as f64);
        self.center_lon += dx as f64 * scale;
        self.center_lat -= dy as f64 * scale * 0.5;

        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }
        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in keeping the point under (px, py) fixed
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out keeping the point under (px, py) fixed
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        // Pan so the same coordinate lands back under the cursor
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Pixel position back to (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.zoom * self.width as f64;
        let (center_x, center_y) = mercator(self.center_lon, self.center_lat);

        let x = (px as f64 - self.width as f64 / 2.0) / scale + center_x;
        let y = (py as f64 - self.height as f64 / 2.0) / scale + center_y;

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
        (lon, lat)
    }

    /// (lon, lat) to pixel position
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let (x, y) = mercator(lon, lat);
        let (center_x, center_y) = mercator(self.center_lon, self.center_lat);
        let scale = self.zoom * self.width as f64;

        let px = ((x - center_x) * scale + self.width as f64 / 2.0) as i32;
        let py = ((y - center_y) * scale + self.height as f64 / 2.0) as i32;
        (px, py)
    }

    /// Whether a projected pixel falls on the canvas
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= 0 && py >= 0 && (px as usize) < self.width && (py as usize) < self.height
    }

    /// Rough bounding-box test for a segment
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let (min_x, max_x) = (p1.0.min(p2.0), p1.0.max(p2.0));
        let (min_y, max_y) = (p1.1.min(p2.1), p1.1.max(p2.1));

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}
