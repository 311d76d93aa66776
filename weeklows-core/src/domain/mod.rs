//! Domain types for weeklows

pub mod bar;
pub mod week;

pub use bar::Bar;
pub use week::WeekId;
