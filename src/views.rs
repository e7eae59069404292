//! Table and marker rows for the two display modes, built from parsed data
//! without touching the terminal.

use crate::airports::AirportDirectory;
use crate::map::AirportMarker;
use crate::visits::{user_totals, AirportTally, Summary, UserVisitLog, VisitRecord, VisitTotals};

/// One airport in the all-users airport table
#[derive(Clone, Debug, PartialEq)]
pub struct AirportSummaryRow {
    pub country: String,
    pub code: String,
    pub name: String,
    pub totals: VisitTotals,
}

/// One airport in a single user's detail table
#[derive(Clone, Debug, PartialEq)]
pub struct DetailRow {
    pub country: String,
    pub code: String,
    pub name: String,
    pub visit: VisitRecord,
}

/// Airport-keyed summary rows in code order. Codes missing from the
/// directory are left out.
pub fn airport_rows(tally: &AirportTally, airports: &AirportDirectory) -> Vec<AirportSummaryRow> {
    tally
        .iter()
        .filter_map(|(code, totals)| {
            let airport = airports.get(code)?;
            Some(AirportSummaryRow {
                country: airport.country().to_string(),
                code: code.to_string(),
                name: airport.name.clone(),
                totals: *totals,
            })
        })
        .collect()
}

/// Everything the all-users view shows
#[derive(Clone, Debug, Default)]
pub struct SummaryView {
    pub summary: Summary,
    pub airports: Vec<AirportSummaryRow>,
}

impl SummaryView {
    pub fn new(summary: Summary, directory: &AirportDirectory) -> Self {
        let airports = airport_rows(&summary.airports, directory);
        Self { summary, airports }
    }
}

/// Everything the single-user view shows
#[derive(Clone, Debug, Default)]
pub struct UserView {
    pub user: String,
    /// Counted over the whole log, including codes the directory lacks
    pub totals: VisitTotals,
    /// Known airports in code order
    pub rows: Vec<DetailRow>,
    /// Known airports with usable coordinates
    pub markers: Vec<AirportMarker>,
    /// Set when the log could not be read; the view is then empty
    pub load_error: Option<String>,
    /// Codes in the log that the directory does not know
    pub unknown_codes: Vec<String>,
}

impl UserView {
    pub fn new(user: &str, log: anyhow::Result<UserVisitLog>, directory: &AirportDirectory) -> Self {
        let (log, load_error) = match log {
            Ok(log) => (log, None),
            Err(e) => {
                tracing::warn!(user, "visit log unavailable: {e:#}");
                (UserVisitLog::new(), Some(format!("{e:#}")))
            }
        };

        let mut view = Self {
            user: user.to_string(),
            totals: user_totals(&log),
            load_error,
            ..Self::default()
        };

        for (code, visit) in &log {
            let Some(airport) = directory.get(code) else {
                view.unknown_codes.push(code.clone());
                continue;
            };

            if airport.is_plottable() {
                view.markers.push(AirportMarker {
                    lon: airport.longitude,
                    lat: airport.latitude,
                    code: code.clone(),
                    visit: *visit,
                });
            }
            view.rows.push(DetailRow {
                country: airport.country().to_string(),
                code: code.clone(),
                name: airport.name.clone(),
                visit: *visit,
            });
        }

        if !view.unknown_codes.is_empty() {
            tracing::info!(user, codes = ?view.unknown_codes, "codes missing from airport directory");
        }
        view
    }

    pub fn title(&self) -> String {
        format!("{}'s Visited Airports", self.user)
    }

    pub fn totals_line(&self) -> String {
        format!(
            "Visited: {} | Arrivals: {} | Departures: {} | Layovers: {}",
            self.totals.total_visits,
            self.totals.arrivals,
            self.totals.departures,
            self.totals.layovers
        )
    }

    /// Marker positions as (lon, lat), for focusing the map
    pub fn marker_points(&self) -> Vec<(f64, f64)> {
        self.markers.iter().map(|m| (m.lon, m.lat)).collect()
    }
}
