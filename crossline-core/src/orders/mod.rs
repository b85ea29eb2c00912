//! Order intents: the market entry and its attached stop/target bracket.

pub mod intent;

pub use intent::{build_order_intent, OrderIntent, OrderIntentBuilder};
