use serde::Serialize;
use serde_json::Value;

use crate::event::Container;

/// Label set by docker compose on the containers of a service.
pub const COMPOSE_SERVICE_LABEL: &str = "com.docker.compose.service";

/// Identifying attributes of the container a log line comes from, attached to every record
/// under the `docker` key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DockerInfo {
    pub name: String,
    pub id: String,
    pub image: String,
    pub hostname: String,
    /// Compose service name, empty when the container is not part of a compose project.
    pub service: String,
}

impl DockerInfo {
    pub fn from_container(container: &Container) -> Self {
        Self {
            name: container.name.clone(),
            id: container.id.clone(),
            image: container.config.image.clone(),
            hostname: container.config.hostname.clone(),
            service: container
                .label(COMPOSE_SERVICE_LABEL)
                .unwrap_or_default()
                .to_owned(),
        }
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl From<&Container> for DockerInfo {
    fn from(container: &Container) -> Self {
        Self::from_container(container)
    }
}
