use super::{UserVisitLog, VisitRecord};
use std::collections::BTreeMap;

/// Visit counts for one user or one airport
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisitTotals {
    pub arrivals: u32,
    pub departures: u32,
    pub layovers: u32,
    pub total_visits: u32,
}

impl VisitTotals {
    /// Count one contributing entry
    #[inline]
    pub fn count(&mut self, record: &VisitRecord) {
        self.arrivals += record.arrived as u32;
        self.departures += record.departed as u32;
        self.layovers += record.layover as u32;
        self.total_visits += 1;
    }
}

/// Totals for a single user's log: one visit per distinct airport
pub fn user_totals(log: &UserVisitLog) -> VisitTotals {
    let mut totals = VisitTotals::default();
    for record in log.values() {
        totals.count(record);
    }
    totals
}

/// Per-airport totals accumulated across users.
///
/// Unlike a single log, where a repeated code replaces the earlier line, every
/// user adds to the airport's counts.
#[derive(Clone, Debug, Default)]
pub struct AirportTally {
    airports: BTreeMap<String, VisitTotals>,
}

impl AirportTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every airport of one user's log
    pub fn add_log(&mut self, log: &UserVisitLog) {
        for (code, record) in log {
            self.airports.entry(code.clone()).or_default().count(record);
        }
    }

    pub fn get(&self, code: &str) -> Option<&VisitTotals> {
        self.airports.get(code)
    }

    /// Airports in ascending code order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VisitTotals)> {
        self.airports.iter().map(|(code, totals)| (code.as_str(), totals))
    }

    pub fn len(&self) -> usize {
        self.airports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }
}

impl<'a> FromIterator<&'a UserVisitLog> for AirportTally {
    fn from_iter<I: IntoIterator<Item = &'a UserVisitLog>>(iter: I) -> Self {
        let mut tally = Self::new();
        for log in iter {
            tally.add_log(log);
        }
        tally
    }
}

/// One row of the all-users table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    pub user: String,
    pub totals: VisitTotals,
    /// The user's log could not be loaded; the row counts as zero visits
    pub unavailable: bool,
}

/// Everything the all-users view shows
#[derive(Clone, Debug, Default)]
pub struct Summary {
    /// Rows in manifest order
    pub users: Vec<UserRow>,
    pub airports: AirportTally,
}

impl Summary {
    pub fn unavailable_count(&self) -> usize {
        self.users.iter().filter(|row| row.unavailable).count()
    }
}

/// Fold per-user load results into a summary.
///
/// A failed load contributes an empty log, so one missing file never blanks
/// the rest of the table. Row order follows the input, not completion order.
pub fn settle<I>(results: I) -> Summary
where
    I: IntoIterator<Item = (String, anyhow::Result<UserVisitLog>)>,
{
    let mut summary = Summary::default();

    for (user, result) in results {
        let (log, unavailable) = match result {
            Ok(log) => (log, false),
            Err(e) => {
                tracing::warn!(user = %user, "visit log unavailable, counting as empty: {e:#}");
                (UserVisitLog::new(), true)
            }
        };

        summary.airports.add_log(&log);
        summary.users.push(UserRow {
            user,
            totals: user_totals(&log),
            unavailable,
        });
    }

    tracing::debug!(
        users = summary.users.len(),
        airports = summary.airports.len(),
        "summary settled"
    );
    summary
}
