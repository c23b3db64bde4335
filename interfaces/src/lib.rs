pub mod defs;

pub use defs::{Ingester, InputItem, LiveSourceSpec, OutboundMessage, WatchRest};
