use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One log line as delivered by the collection pipeline.
///
/// A message is consumed exactly once by an adapter and is not retained afterwards. The
/// container it originates from is shared between all lines of that container.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LogMessage {
    /// The container the line was read from.
    #[serde(default)]
    pub container: Arc<Container>,

    /// Output stream label, usually `stdout` or `stderr`.
    #[serde(default)]
    pub source: String,

    /// The raw line, without its trailing newline. May itself be JSON.
    #[serde(default)]
    pub data: String,

    /// Time at which the line was produced.
    #[serde(default = "Utc::now")]
    pub time: DateTime<Utc>,
}

impl LogMessage {
    pub fn new(
        container: Arc<Container>,
        source: impl Into<String>,
        data: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            container,
            source: source.into(),
            data: data.into(),
            time,
        }
    }
}

/// Read-only description of the container a log line comes from.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub config: ContainerConfig,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ContainerConfig {
    pub image: String,
    pub hostname: String,
    pub labels: BTreeMap<String, String>,
}

impl Container {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.config.labels.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn deserializes_full_message() {
        let message: LogMessage = serde_json::from_str(
            r#"{
                "data": "hello",
                "source": "stderr",
                "time": "2024-03-01T10:00:00.250Z",
                "container": {
                    "id": "abc123",
                    "name": "web",
                    "config": {
                        "image": "nginx",
                        "hostname": "host1",
                        "labels": {"com.docker.compose.service": "frontend"}
                    }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(message.data, "hello");
        assert_eq!(message.source, "stderr");
        assert_eq!(
            message.time,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
                + chrono::Duration::milliseconds(250)
        );
        assert_eq!(message.container.id, "abc123");
        assert_eq!(message.container.config.image, "nginx");
        assert_eq!(
            message.container.label("com.docker.compose.service"),
            Some("frontend")
        );
    }

    #[test]
    fn missing_container_fields_are_empty() {
        let message: LogMessage =
            serde_json::from_str(r#"{"data": "x", "container": {"name": "web"}}"#).unwrap();

        assert_eq!(message.container.name, "web");
        assert_eq!(message.container.id, "");
        assert_eq!(message.container.config.hostname, "");
        assert!(message.container.config.labels.is_empty());
        assert_eq!(message.source, "");
    }
}
