//! Built-in adapters: the in-memory asset gateway and the manually
//! advanced block clock.

pub mod internal;

pub use internal::{InternalGateway, ManualClock};
