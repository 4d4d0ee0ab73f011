//! Transports dial the connection an adapter writes to.
//!
//! A transport is looked up by name, `tcp` unless the route's adapter name carries a
//! `+<transport>` suffix, and is handed the route's address and options verbatim.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::config::RouteOptions;

mod tcp;
#[cfg(unix)]
mod unix;

pub use tcp::{TcpError, TcpOptions, TcpTransport};
#[cfg(unix)]
pub use unix::{UnixError, UnixTransport};

/// A live, exclusively owned byte stream to the aggregator.
pub type Connection = Box<dyn AsyncWrite + Send + Unpin>;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Rejects `options` this transport cannot use, before any connection is attempted.
    fn validate(&self, _options: &RouteOptions) -> crate::Result<()> {
        Ok(())
    }

    /// Establishes a connection to `address`.
    async fn dial(&self, address: &str, options: &RouteOptions) -> crate::Result<Connection>;
}

/// Transports available to adapters, keyed by name.
#[derive(Clone, Default)]
pub struct TransportRegistry {
    transports: HashMap<String, Arc<dyn Transport>>,
}

impl TransportRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `tcp` and, on unix, `unix` transports.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("tcp", TcpTransport);
        #[cfg(unix)]
        registry.register("unix", UnixTransport);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, transport: impl Transport + 'static) {
        self.transports.insert(name.into(), Arc::new(transport));
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn Transport>> {
        self.transports.get(name).cloned()
    }
}

impl fmt::Debug for TransportRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.transports.keys().collect();
        names.sort();
        f.debug_struct("TransportRegistry")
            .field("transports", &names)
            .finish()
    }
}
