#![deny(unused_extern_crates)]
#![deny(unused_allocation)]
#![deny(unused_assignments)]
#![deny(unused_comparisons)]
#![allow(clippy::module_name_repetitions)]

//! Forwards container log lines to a fluentd aggregator.
//!
//! Inbound events are normalized into a canonical record, framed per the fluentd
//! forward convention and written, one frame per event, to a long-lived connection.

#[macro_use]
extern crate tracing;

#[macro_use]
pub mod internal_events;

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config;
pub mod event;
pub mod fanout;
pub mod sinks;
pub mod sources;
#[cfg(test)]
pub mod test_util;
pub mod trace;
pub mod transports;

pub use event::{Container, ContainerConfig, LogMessage};

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;
