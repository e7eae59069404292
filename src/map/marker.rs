use crate::visits::VisitRecord;

/// Marker colour family, mapped to terminal colours by the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Arrival,
    Departure,
    ArrivalDeparture,
    Layover,
    /// Listed without any recognised flag
    Unflagged,
}

/// A visited airport placed on the map
#[derive(Clone, Debug, PartialEq)]
pub struct AirportMarker {
    pub lon: f64,
    pub lat: f64,
    pub code: String,
    pub visit: VisitRecord,
}

impl AirportMarker {
    /// Shape encodes arrival/departure; any layover turns the marker blue
    pub fn glyph(&self) -> char {
        match (self.visit.arrived, self.visit.departed) {
            (true, true) => '◆',
            (true, false) => '▼',
            (false, true) => '▲',
            (false, false) => '●',
        }
    }

    pub fn tint(&self) -> Tint {
        if self.visit.layover {
            return Tint::Layover;
        }
        match (self.visit.arrived, self.visit.departed) {
            (true, true) => Tint::ArrivalDeparture,
            (true, false) => Tint::Arrival,
            (false, true) => Tint::Departure,
            (false, false) => Tint::Unflagged,
        }
    }
}
