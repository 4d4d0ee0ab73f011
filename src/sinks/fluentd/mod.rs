//! Forwards log messages to fluentd.
//!
//! Every message becomes one newline-terminated JSON frame,
//! `["logspout", <seconds since epoch>, <record>]`, where the record is the line itself (or its
//! fields, when the line is a JSON object) plus the originating container under `docker` and
//! the output stream under `stream`.
//!
//! A failed write is fatal: the adapter stops and reports [`StreamError::Write`] to its owner.
//!
//! [`StreamError::Write`]: crate::adapters::StreamError::Write

use async_trait::async_trait;

use crate::{
    adapters::{AdapterFactory, AdapterRegistry, LogAdapter},
    config::Route,
    transports::TransportRegistry,
};

mod config;
mod encoder;
mod metadata;
mod record;
mod sink;

pub use config::{DEFAULT_TRANSPORT, FluentdConfigError, FluentdSinkConfig};
pub use encoder::{
    EncodeError, FORWARD_TAG, ForwardEncoder, ForwardFrame, FrameFormat, epoch_seconds,
};
pub use metadata::{COMPOSE_SERVICE_LABEL, DockerInfo};
pub use record::{DOCKER_KEY, MESSAGE_KEY, Record, STREAM_KEY, normalize};
pub use sink::FluentdSink;

/// Name the adapter is registered under.
pub const ADAPTER_NAME: &str = "fluentd-tcp";

/// Makes the fluentd adapter available to routes naming `fluentd-tcp`.
pub fn register(registry: &mut AdapterRegistry) {
    registry.register(ADAPTER_NAME, FluentdAdapterFactory);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FluentdAdapterFactory;

#[async_trait]
impl AdapterFactory for FluentdAdapterFactory {
    async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> crate::Result<Box<dyn LogAdapter>> {
        let config = FluentdSinkConfig::from_route(route)?;
        let sink = config.build(route, transports).await?;
        Ok(Box::new(sink))
    }
}
