//! Plain-text rendition of both views, for `--plain`.

use crate::views::{SummaryView, UserView};
use std::io::{self, Write};

pub fn write_summary<W: Write>(out: &mut W, view: &SummaryView) -> io::Result<()> {
    writeln!(out, "Traveler Summary")?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<24} {:>7} {:>8} {:>10} {:>8}",
        "User", "Visited", "Arrivals", "Departures", "Layovers"
    )?;
    for row in &view.summary.users {
        let name = if row.unavailable {
            format!("{} (unavailable)", row.user)
        } else {
            row.user.clone()
        };
        writeln!(
            out,
            "{:<24} {:>7} {:>8} {:>10} {:>8}",
            name,
            row.totals.total_visits,
            row.totals.arrivals,
            row.totals.departures,
            row.totals.layovers
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:<20} {:<4} {:<32} {:>6} {:>8} {:>10} {:>8}",
        "Country", "Code", "Airport", "Visits", "Arrivals", "Departures", "Layovers"
    )?;
    for row in &view.airports {
        writeln!(
            out,
            "{:<20} {:<4} {:<32} {:>6} {:>8} {:>10} {:>8}",
            row.country,
            row.code,
            row.name,
            row.totals.total_visits,
            row.totals.arrivals,
            row.totals.departures,
            row.totals.layovers
        )?;
    }
    Ok(())
}

pub fn write_user<W: Write>(out: &mut W, view: &UserView) -> io::Result<()> {
    writeln!(out, "{}", view.title())?;
    match &view.load_error {
        Some(e) => writeln!(out, "log unavailable: {e}")?,
        None => writeln!(out, "{}", view.totals_line())?,
    }
    writeln!(out)?;

    let mark = |set: bool| if set { "✔" } else { "" };
    writeln!(out, "{:<20} {:<4} {:<32} {:^3} {:^3} {:^3}", "Country", "Code", "Airport", "A", "D", "L")?;
    for row in &view.rows {
        writeln!(
            out,
            "{:<20} {:<4} {:<32} {:^3} {:^3} {:^3}",
            row.country,
            row.code,
            row.name,
            mark(row.visit.arrived),
            mark(row.visit.departed),
            mark(row.visit.layover)
        )?;
    }

    if !view.unknown_codes.is_empty() {
        writeln!(out)?;
        writeln!(out, "Not in airport directory: {}", view.unknown_codes.join(", "))?;
    }
    Ok(())
}
