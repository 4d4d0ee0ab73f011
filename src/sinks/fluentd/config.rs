use snafu::Snafu;

use super::{FluentdSink, ForwardEncoder, FrameFormat};
use crate::{
    adapters::dial_route,
    config::Route,
    transports::{Connection, TransportRegistry},
};

/// Transport used when the adapter name does not carry a `+<transport>` suffix.
pub const DEFAULT_TRANSPORT: &str = "tcp";

#[derive(Debug, Snafu)]
pub enum FluentdConfigError {
    #[snafu(display("Invalid `format` option: {}", reason))]
    InvalidFormat { reason: String },
}

/// Settings of the fluentd adapter, read from a route's options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FluentdSinkConfig {
    /// `format`: `forward` (default) or `json_lines`.
    pub format: FrameFormat,
}

impl FluentdSinkConfig {
    pub fn from_route(route: &Route) -> Result<Self, FluentdConfigError> {
        let format = match route.option("format") {
            Some(format) => format
                .parse()
                .map_err(|reason| FluentdConfigError::InvalidFormat { reason })?,
            None => FrameFormat::default(),
        };

        Ok(Self { format })
    }

    /// Dials the route and returns a sink owning the new connection.
    pub async fn build(
        &self,
        route: &Route,
        transports: &TransportRegistry,
    ) -> crate::Result<FluentdSink<Connection>> {
        let connection = dial_route(route, transports, DEFAULT_TRANSPORT).await?;
        Ok(FluentdSink::new(connection, ForwardEncoder::new(self.format)))
    }
}
