use crate::map::{LineString, Lod, MapRenderer};
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use std::fs;
use std::path::Path;

const COASTLINE_FILES: [(&str, Lod); 3] = [
    ("ne_110m_coastline.json", Lod::Low),
    ("ne_50m_coastline.json", Lod::Medium),
    ("ne_10m_coastline.json", Lod::High),
];

const BORDER_FILES: [(&str, Lod); 2] = [
    ("ne_50m_borders.json", Lod::Medium),
    ("ne_10m_borders.json", Lod::High),
];

/// Load whichever Natural Earth files exist in `dir`; a broken file is
/// logged and skipped. Returns how many files were loaded.
pub fn load_all_geojson(renderer: &mut MapRenderer, dir: &Path) -> usize {
    let mut loaded = 0;

    for (filename, lod) in COASTLINE_FILES {
        let path = dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                tracing::debug!(file = filename, lines = lines.len(), "coastlines loaded");
                lines.into_iter().for_each(|line| renderer.add_coastline(line, lod));
                loaded += 1;
            }
            Err(e) => tracing::warn!("skipping {filename}: {e:#}"),
        }
    }

    for (filename, lod) in BORDER_FILES {
        let path = dir.join(filename);
        if !path.exists() {
            continue;
        }
        match read_lines(&path) {
            Ok(lines) => {
                tracing::debug!(file = filename, lines = lines.len(), "borders loaded");
                lines.into_iter().for_each(|line| renderer.add_border(line, lod));
                loaded += 1;
            }
            Err(e) => tracing::warn!("skipping {filename}: {e:#}"),
        }
    }

    loaded
}

fn read_lines(path: &Path) -> Result<Vec<LineString>> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let geojson: GeoJson = content
        .parse()
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(collect_lines(&geojson))
}

/// Every line and polygon exterior ring in a GeoJSON document
fn collect_lines(geojson: &GeoJson) -> Vec<LineString> {
    let mut lines = Vec::new();
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for geometry in fc.features.iter().filter_map(|f| f.geometry.as_ref()) {
                geometry_lines(geometry, &mut lines);
            }
        }
        GeoJson::Feature(f) => {
            if let Some(geometry) = &f.geometry {
                geometry_lines(geometry, &mut lines);
            }
        }
        GeoJson::Geometry(geometry) => geometry_lines(geometry, &mut lines),
    }
    lines
}

fn geometry_lines(geometry: &Geometry, out: &mut Vec<LineString>) {
    let to_line = |coords: &Vec<Vec<f64>>| -> LineString {
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| (c[0], c[1]))
            .collect()
    };

    match &geometry.value {
        Value::LineString(coords) => out.push(to_line(coords)),
        Value::MultiLineString(lines) => out.extend(lines.iter().map(to_line)),
        Value::Polygon(rings) => out.extend(rings.first().map(to_line)),
        Value::MultiPolygon(polygons) => {
            out.extend(polygons.iter().filter_map(|rings| rings.first()).map(to_line))
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                geometry_lines(g, out);
            }
        }
        _ => {}
    }
}

/// Coarse continent outlines used when no map files are available
pub fn generate_simple_world(renderer: &mut MapRenderer) {
    const OUTLINES: [&[(f64, f64)]; 7] = [
        // North America
        &[
            (-166.0, 68.0), (-162.0, 58.0), (-150.0, 60.0), (-135.0, 57.0),
            (-124.0, 47.0), (-123.0, 38.0), (-115.0, 30.0), (-105.0, 20.0),
            (-95.0, 16.0), (-83.0, 9.0), (-88.0, 21.0), (-97.0, 27.0),
            (-89.0, 30.0), (-81.0, 25.0), (-80.0, 32.0), (-75.0, 38.0),
            (-70.0, 42.0), (-66.0, 45.0), (-60.0, 47.0), (-56.0, 52.0),
            (-62.0, 58.0), (-78.0, 62.0), (-94.0, 60.0), (-110.0, 68.0),
            (-140.0, 70.0), (-166.0, 68.0),
        ],
        // South America
        &[
            (-78.0, 8.0), (-62.0, 10.0), (-50.0, 1.0), (-35.0, -7.0),
            (-40.0, -22.0), (-53.0, -34.0), (-65.0, -41.0), (-68.0, -54.0),
            (-75.0, -48.0), (-71.0, -18.0), (-81.0, -5.0), (-78.0, 8.0),
        ],
        // Europe
        &[
            (-9.0, 37.0), (-2.0, 36.5), (3.0, 42.0), (9.0, 44.0),
            (16.0, 38.0), (24.0, 35.5), (28.0, 41.0), (30.0, 46.0),
            (40.0, 47.0), (42.0, 60.0), (30.0, 70.0), (15.0, 69.0),
            (5.0, 61.0), (8.0, 55.0), (-2.0, 49.0), (-9.0, 43.0),
            (-9.0, 37.0),
        ],
        // Africa
        &[
            (-17.0, 21.0), (-10.0, 35.0), (10.0, 37.0), (32.0, 31.0),
            (43.0, 12.0), (51.0, 11.0), (40.0, -3.0), (40.0, -15.0),
            (33.0, -27.0), (20.0, -35.0), (12.0, -18.0), (9.0, 4.0),
            (-8.0, 4.0), (-17.0, 14.0), (-17.0, 21.0),
        ],
        // Asia
        &[
            (30.0, 46.0), (36.0, 36.0), (44.0, 13.0), (58.0, 23.0),
            (67.0, 25.0), (73.0, 16.0), (78.0, 8.0), (82.0, 16.0),
            (92.0, 22.0), (98.0, 9.0), (104.0, 1.5), (109.0, 12.0),
            (108.0, 21.0), (121.0, 31.0), (122.0, 40.0), (129.0, 35.0),
            (131.0, 43.0), (141.0, 53.0), (160.0, 61.0), (180.0, 66.0),
            (140.0, 73.0), (100.0, 77.0), (70.0, 72.0), (42.0, 67.0),
            (42.0, 60.0),
        ],
        // Australia
        &[
            (114.0, -22.0), (123.0, -17.0), (131.0, -12.0), (137.0, -12.0),
            (142.0, -11.0), (146.0, -19.0), (153.0, -27.0), (150.0, -37.0),
            (141.0, -38.0), (131.0, -31.5), (115.0, -34.0), (114.0, -22.0),
        ],
        // Japan
        &[
            (130.0, 31.0), (135.0, 34.0), (140.0, 35.0), (142.0, 40.0),
            (141.0, 45.0), (140.0, 41.0), (136.0, 37.0), (130.0, 33.5),
            (130.0, 31.0),
        ],
    ];

    for outline in OUTLINES {
        renderer.add_coastline(outline.to_vec(), Lod::Low);
    }
}
