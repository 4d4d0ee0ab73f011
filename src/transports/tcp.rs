use std::time::Duration;

use async_trait::async_trait;
use snafu::{ResultExt, Snafu};
use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;

use super::{Connection, Transport};
use crate::{config::RouteOptions, internal_events::TcpConnectionEstablished};

#[derive(Debug, Snafu)]
pub enum TcpError {
    #[snafu(display("Invalid value {:?} for option `{}`: {}", value, key, reason))]
    InvalidOption {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[snafu(display("Connect error: {}", source))]
    Connect { source: std::io::Error },
    #[snafu(display("Failed configuring socket: {}", source))]
    Configure { source: std::io::Error },
}

/// Socket settings read from a route's options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TcpOptions {
    /// `keepalive_secs`: idle time before TCP keepalive probes are sent.
    pub keepalive: Option<Duration>,
    /// `send_buffer_bytes`: size of the `SO_SNDBUF` buffer.
    pub send_buffer_bytes: Option<usize>,
    /// `nodelay`: disables Nagle's algorithm.
    pub nodelay: Option<bool>,
}

impl TcpOptions {
    /// Picks the TCP settings out of `options`, ignoring keys that belong to others.
    pub fn from_options(options: &RouteOptions) -> Result<Self, TcpError> {
        Ok(Self {
            keepalive: parse_option(options, "keepalive_secs")?.map(Duration::from_secs),
            send_buffer_bytes: parse_option(options, "send_buffer_bytes")?,
            nodelay: parse_option(options, "nodelay")?,
        })
    }

    fn apply(&self, stream: &TcpStream) -> std::io::Result<()> {
        if let Some(nodelay) = self.nodelay {
            stream.set_nodelay(nodelay)?;
        }

        let socket = SockRef::from(stream);
        if let Some(time) = self.keepalive {
            socket.set_tcp_keepalive(&TcpKeepalive::new().with_time(time))?;
        }
        if let Some(size) = self.send_buffer_bytes {
            socket.set_send_buffer_size(size)?;
        }
        Ok(())
    }
}

fn parse_option<T>(options: &RouteOptions, key: &'static str) -> Result<Option<T>, TcpError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    options
        .get(key)
        .map(|value| {
            value.parse().map_err(|error: T::Err| TcpError::InvalidOption {
                key,
                value: value.clone(),
                reason: error.to_string(),
            })
        })
        .transpose()
}

/// Dials `host:port` addresses over TCP, resolving host names.
#[derive(Clone, Copy, Debug, Default)]
pub struct TcpTransport;

impl TcpTransport {
    pub async fn connect(address: &str, options: &TcpOptions) -> Result<TcpStream, TcpError> {
        debug!(message = "Connecting.", %address);
        let stream = TcpStream::connect(address).await.context(ConnectSnafu)?;
        options.apply(&stream).context(ConfigureSnafu)?;

        emit!(TcpConnectionEstablished {
            peer_addr: stream.peer_addr().ok(),
        });
        Ok(stream)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    fn validate(&self, options: &RouteOptions) -> crate::Result<()> {
        TcpOptions::from_options(options)?;
        Ok(())
    }

    async fn dial(&self, address: &str, options: &RouteOptions) -> crate::Result<Connection> {
        let options = TcpOptions::from_options(options)?;
        let stream = Self::connect(address, &options).await?;
        Ok(Box::new(stream))
    }
}
