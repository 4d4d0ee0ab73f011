use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use url::Url;

use super::{ConfigError, InvalidRouteUriSnafu, MissingAddressSnafu};

/// Separator between the adapter type and the transport in an adapter name, as in
/// `fluentd-tcp+unix`.
const TRANSPORT_SEPARATOR: char = '+';

/// Free-form options attached to a route, handed opaquely to the adapter and its transport.
pub type RouteOptions = IndexMap<String, String>;

/// Where and how log messages get forwarded.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    /// Identifier used in logs. Assigned from the route's position when left empty.
    #[serde(default)]
    pub id: String,

    /// Adapter name, optionally suffixed with `+<transport>`.
    pub adapter: String,

    /// Address handed to the transport: `host:port` for network transports, a path for
    /// `unix`.
    pub address: String,

    #[serde(default)]
    pub options: RouteOptions,
}

impl Route {
    pub fn new(adapter: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            adapter: adapter.into(),
            address: address.into(),
            options: RouteOptions::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Parses a route URI such as `fluentd-tcp://fluentd:24224?format=forward`.
    ///
    /// The scheme names the adapter, the authority (or the path, when there is no host) is the
    /// address and the query string becomes the options.
    pub fn from_uri(uri: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(uri).context(InvalidRouteUriSnafu { uri })?;

        let host = url.host_str().filter(|host| !host.is_empty());
        let address = match (host, url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_owned(),
            (None, _) => Some(url.path())
                .filter(|path| !path.is_empty() && *path != "/")
                .context(MissingAddressSnafu { uri })?
                .to_owned(),
        };

        let options = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            id: String::new(),
            adapter: url.scheme().to_owned(),
            address,
            options,
        })
    }

    /// The adapter name without any transport suffix.
    pub fn adapter_type(&self) -> &str {
        self.adapter
            .split_once(TRANSPORT_SEPARATOR)
            .map_or(self.adapter.as_str(), |(adapter, _)| adapter)
    }

    /// The transport named after the `+` in the adapter name, or `default` when there is none.
    pub fn adapter_transport<'a>(&'a self, default: &'a str) -> &'a str {
        self.adapter
            .split_once(TRANSPORT_SEPARATOR)
            .map_or(default, |(_, transport)| transport)
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}
