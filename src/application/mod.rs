//! Application layer: orchestrates ports around the pure stage router.

mod process_inbound;

pub use process_inbound::{ProcessError, ProcessInboundHandler};
