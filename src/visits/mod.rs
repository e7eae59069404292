pub mod aggregate;

pub use aggregate::{settle, user_totals, AirportTally, Summary, UserRow, VisitTotals};

use std::collections::BTreeMap;

/// Which kinds of visit a log line recorded for one airport.
/// The flags are independent: a single line can set any subset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisitRecord {
    pub arrived: bool,
    pub departed: bool,
    pub layover: bool,
}

impl VisitRecord {
    /// Build a record from the flag letters of a log line (`A`, `D`, `L`).
    /// Only upper-case letters count; anything else is ignored.
    pub fn from_flags(flags: &str) -> Self {
        Self {
            arrived: flags.contains('A'),
            departed: flags.contains('D'),
            layover: flags.contains('L'),
        }
    }
}

/// One user's visits keyed by upper-case IATA code, iterated in code order
pub type UserVisitLog = BTreeMap<String, VisitRecord>;

/// Parse a visit log.
///
/// Blank lines and `#` comments are skipped, as are lines with fewer than two
/// whitespace-separated tokens. The first token is the airport code; the rest
/// are joined and scanned for flag letters, so `JFK A D` and `JFK AD` mean the
/// same thing. A later line for the same code replaces the earlier one.
pub fn parse_visit_log(text: &str) -> UserVisitLog {
    let mut visits = UserVisitLog::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(code) = tokens.next() else {
            continue;
        };
        let flags: String = tokens.collect();
        if flags.is_empty() {
            continue;
        }

        visits.insert(code.to_uppercase(), VisitRecord::from_flags(&flags));
    }

    visits
}
