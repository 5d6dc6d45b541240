//! Turning connection specs into resolved, dialable descriptors.

pub mod descriptor;
pub mod resolver;

pub use descriptor::{ConnectionDescriptor, NetworkKind, Scheme};
pub use resolver::{ParseOutcome, resolve, resolve_address};
