use metrics::counter;

use super::{InternalEvent, error_stage, error_type};
use crate::adapters::BuildError;

#[derive(Debug)]
pub struct ForwarderStarted {
    pub routes: usize,
}

impl InternalEvent for ForwarderStarted {
    fn emit(self) {
        info!(
            target: "fluentd_forwarder",
            message = "Forwarder has started.",
            version = env!("CARGO_PKG_VERSION"),
            routes = self.routes,
        );
        counter!("started_total").increment(1);
    }
}

#[derive(Debug)]
pub struct ForwarderStopped;

impl InternalEvent for ForwarderStopped {
    fn emit(self) {
        info!(
            target: "fluentd_forwarder",
            message = "Input closed, forwarder has stopped."
        );
        counter!("stopped_total").increment(1);
    }
}

#[derive(Debug)]
pub struct AdapterStarted<'a> {
    pub route: &'a str,
    pub adapter: &'a str,
    pub address: &'a str,
}

impl InternalEvent for AdapterStarted<'_> {
    fn emit(self) {
        info!(
            message = "Adapter started.",
            route = %self.route,
            adapter = %self.adapter,
            address = %self.address,
        );
    }
}

#[derive(Debug)]
pub struct AdapterBuildFailed<'a> {
    pub route: &'a str,
    pub error: &'a crate::Error,
}

impl InternalEvent for AdapterBuildFailed<'_> {
    fn emit(self) {
        let error_type = self
            .error
            .downcast_ref::<BuildError>()
            .map_or(error_type::CONFIGURATION_FAILED, BuildError::error_type);
        error!(
            message = "Unable to build adapter.",
            route = %self.route,
            error = %self.error,
            error_type,
            stage = error_stage::PROCESSING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type,
            "stage" => error_stage::PROCESSING,
        )
        .increment(1);
    }
}

#[derive(Debug)]
pub struct AdapterCrashed<'a> {
    pub route: &'a str,
    pub error: &'a crate::adapters::StreamError,
}

impl InternalEvent for AdapterCrashed<'_> {
    fn emit(self) {
        error!(
            message = "Adapter terminated with a fatal error, exiting.",
            route = %self.route,
            error = %self.error,
            error_type = error_type::IO_FAILED,
            stage = error_stage::SENDING,
        );
        counter!("crashed_total").increment(1);
    }
}

#[derive(Debug)]
pub struct ConfigLoadFailed<'a> {
    pub error: &'a crate::config::ConfigError,
}

impl InternalEvent for ConfigLoadFailed<'_> {
    fn emit(self) {
        error!(
            message = "Configuration error.",
            error = %self.error,
            error_type = error_type::CONFIGURATION_FAILED,
            stage = error_stage::PROCESSING,
        );
    }
}
