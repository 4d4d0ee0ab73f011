use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

mod route;

pub use route::{Route, RouteOptions};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("Could not read config file {:?}: {}", path, source))]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Could not parse config file {:?}: {}", path, source))]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[snafu(display("Invalid route URI {:?}: {}", uri, source))]
    InvalidRouteUri {
        uri: String,
        source: url::ParseError,
    },
    #[snafu(display("Route URI {:?} has no address", uri))]
    MissingAddress { uri: String },
    #[snafu(display("Route {:?} has an empty adapter name", id))]
    EmptyAdapter { id: String },
    #[snafu(display("Duplicate route id {:?}", id))]
    DuplicateRouteId { id: String },
    #[snafu(display("No routes configured"))]
    NoRoutes,
}

/// The set of routes the forwarder runs, each one backed by its own adapter.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl Config {
    /// Reads a TOML config file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
        toml::from_str(&contents).context(ParseFileSnafu { path })
    }

    /// Builds the effective configuration from an optional config file plus route URIs given
    /// on the command line. Routes from the file come first.
    pub fn build(config_path: Option<&Path>, route_uris: &[String]) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::default(),
        };

        for uri in route_uris {
            config.routes.push(Route::from_uri(uri)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Assigns ids to anonymous routes and checks the routes are usable.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }

        let mut seen = HashSet::new();
        for (index, route) in self.routes.iter_mut().enumerate() {
            if route.id.is_empty() {
                route.id = format!("route_{index}");
            }
            if route.adapter.is_empty() {
                return Err(ConfigError::EmptyAdapter {
                    id: route.id.clone(),
                });
            }
            if !seen.insert(route.id.clone()) {
                return Err(ConfigError::DuplicateRouteId {
                    id: route.id.clone(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_routes_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[routes]]
            id = "aggregator"
            adapter = "fluentd-tcp"
            address = "fluentd:24224"

            [routes.options]
            format = "json_lines"
            keepalive_secs = "30"
            "#
        )
        .unwrap();

        let config = Config::build(Some(file.path()), &[]).unwrap();

        assert_eq!(config.routes.len(), 1);
        let route = &config.routes[0];
        assert_eq!(route.id, "aggregator");
        assert_eq!(route.adapter, "fluentd-tcp");
        assert_eq!(route.address, "fluentd:24224");
        assert_eq!(route.option("format"), Some("json_lines"));
        assert_eq!(route.option("keepalive_secs"), Some("30"));
    }

    #[test]
    fn appends_cli_routes_after_file_routes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[routes]]
            adapter = "fluentd-tcp"
            address = "first:24224"
            "#
        )
        .unwrap();

        let config = Config::build(
            Some(file.path()),
            &["fluentd-tcp://second:24224".to_owned()],
        )
        .unwrap();

        let addresses: Vec<_> = config.routes.iter().map(|r| r.address.as_str()).collect();
        let ids: Vec<_> = config.routes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(addresses, vec!["first:24224", "second:24224"]);
        assert_eq!(ids, vec!["route_0", "route_1"]);
    }

    #[test]
    fn requires_at_least_one_route() {
        let error = Config::build(None, &[]).unwrap_err();
        assert!(matches!(error, ConfigError::NoRoutes));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut config = Config {
            routes: vec![
                Route {
                    id: "a".to_owned(),
                    ..Route::new("fluentd-tcp", "one:24224")
                },
                Route {
                    id: "a".to_owned(),
                    ..Route::new("fluentd-tcp", "two:24224")
                },
            ],
        };

        let error = config.validate().unwrap_err();
        assert!(matches!(error, ConfigError::DuplicateRouteId { id } if id == "a"));
    }

    #[test]
    fn reports_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[routes]]\nadapter = \"fluentd-tcp\"\naddress = \"x:1\"\nbogus = 1\n").unwrap();

        let error = Config::load_from_path(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::ParseFile { .. }));
    }

    #[test]
    fn reports_missing_file() {
        let error = Config::load_from_path(Path::new("/nonexistent/forwarder.toml")).unwrap_err();
        assert!(matches!(error, ConfigError::ReadFile { .. }));
    }
}
