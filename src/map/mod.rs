mod geometry;
mod marker;
mod projection;
mod renderer;

pub use marker::{AirportMarker, Tint};
pub use projection::Viewport;
pub use renderer::{LineString, Lod, MapLayers, MapRenderer, PlacedMarker};
