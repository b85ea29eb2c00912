//! Domain types for Crossline

pub mod bar;
pub mod instrument;
pub mod order;
pub mod position;

pub use bar::{Bar, PriceField};
pub use instrument::Instrument;
pub use order::{OrderKind, OrderSide, StopKind, TargetKind, TimeInForce};
pub use position::{PositionSnapshot, PositionState};
