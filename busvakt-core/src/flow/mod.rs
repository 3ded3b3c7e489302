//! Message-flow lifecycle counters.

pub mod channel;
pub mod registry;

pub use channel::ChannelId;
pub use registry::{FlowCounters, FlowRegistry};
