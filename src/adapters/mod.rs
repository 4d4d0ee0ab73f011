//! Adapters turn a stream of log messages into writes against a remote peer.
//!
//! Factories are registered by name into an [`AdapterRegistry`] owned by the application and
//! are looked up with the adapter type of each configured route.

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use futures::stream::BoxStream;
use snafu::{OptionExt, ResultExt, Snafu};

use crate::{
    config::Route,
    event::LogMessage,
    internal_events::error_type,
    transports::{Connection, TransportRegistry},
};

#[derive(Debug, Snafu)]
pub enum BuildError {
    #[snafu(display("Unknown adapter: {}", adapter))]
    UnknownAdapter { adapter: String },
    #[snafu(display("Unable to find adapter: {} (transport {:?})", adapter, transport))]
    UnknownTransport { adapter: String, transport: String },
    #[snafu(display("Invalid options for transport {:?}: {}", transport, source))]
    InvalidOptions {
        transport: String,
        source: crate::Error,
    },
    #[snafu(display("Unable to connect to {}: {}", address, source))]
    Connect {
        address: String,
        source: crate::Error,
    },
}

impl BuildError {
    /// The `error_type` this failure is reported under.
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Connect { .. } => error_type::CONNECTION_FAILED,
            Self::UnknownAdapter { .. }
            | Self::UnknownTransport { .. }
            | Self::InvalidOptions { .. } => error_type::CONFIGURATION_FAILED,
        }
    }
}

/// Errors that end an adapter's stream. They are not recoverable: the owner is expected to
/// shut the process down.
#[derive(Debug, Snafu)]
pub enum StreamError {
    #[snafu(display("Could not write to connection: {}", source))]
    Write { source: std::io::Error },
}

#[async_trait]
pub trait LogAdapter: Send {
    /// Consumes `input` until it ends or the adapter fails.
    async fn stream(self: Box<Self>, input: BoxStream<'_, LogMessage>) -> Result<(), StreamError>;
}

#[async_trait]
pub trait AdapterFactory: Send + Sync {
    async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> crate::Result<Box<dyn LogAdapter>>;
}

/// Resolves the route's transport, falling back to `default_transport`, and dials the route's
/// address with it.
pub async fn dial_route(
    route: &Route,
    transports: &TransportRegistry,
    default_transport: &str,
) -> Result<Connection, BuildError> {
    let transport_name = route.adapter_transport(default_transport);
    let transport = transports
        .lookup(transport_name)
        .context(UnknownTransportSnafu {
            adapter: route.adapter.as_str(),
            transport: transport_name,
        })?;

    transport
        .validate(&route.options)
        .context(InvalidOptionsSnafu {
            transport: transport_name,
        })?;

    transport
        .dial(&route.address, &route.options)
        .await
        .context(ConnectSnafu {
            address: route.address.as_str(),
        })
}

/// Adapter factories keyed by adapter type.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    factories: HashMap<String, Arc<dyn AdapterFactory>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, factory: impl AdapterFactory + 'static) {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<dyn AdapterFactory>> {
        self.factories.get(name).cloned()
    }

    /// Builds the adapter serving `route`.
    pub async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> crate::Result<Box<dyn LogAdapter>> {
        let factory = self
            .lookup(route.adapter_type())
            .context(UnknownAdapterSnafu {
                adapter: route.adapter.as_str(),
            })?;
        factory.build(route, transports).await
    }
}

impl fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.factories.keys().collect();
        names.sort();
        f.debug_struct("AdapterRegistry")
            .field("factories", &names)
            .finish()
    }
}
