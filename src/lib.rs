//! Travel log viewer: parses per-user airport visit logs, aggregates them,
//! and shows either an all-users summary or one user's airports on a
//! braille world map.

pub mod airports;
pub mod app;
pub mod braille;
pub mod config;
pub mod data;
pub mod map;
pub mod report;
pub mod telemetry;
pub mod ui;
pub mod views;
pub mod visits;
