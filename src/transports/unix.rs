use std::path::Path;

use async_trait::async_trait;
use snafu::{ResultExt, Snafu};
use tokio::net::UnixStream;

use super::{Connection, Transport};
use crate::{config::RouteOptions, internal_events::UnixSocketConnectionEstablished};

#[derive(Debug, Snafu)]
pub enum UnixError {
    #[snafu(display("Connect error: {}", source))]
    Connect { source: std::io::Error },
}

/// Dials a unix domain socket; the address is the socket path.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnixTransport;

#[async_trait]
impl Transport for UnixTransport {
    async fn dial(&self, address: &str, _options: &RouteOptions) -> crate::Result<Connection> {
        let path = Path::new(address);
        debug!(message = "Connecting.", ?path);
        let stream = UnixStream::connect(path).await.context(ConnectSnafu)?;

        emit!(UnixSocketConnectionEstablished { path });
        Ok(Box::new(stream))
    }
}
