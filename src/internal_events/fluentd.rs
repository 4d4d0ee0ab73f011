use metrics::counter;

use super::{InternalEvent, error_stage, error_type, io_error_code};
use crate::sinks::fluentd::EncodeError;

#[derive(Debug)]
pub struct FluentdEventSent {
    pub byte_size: usize,
}

impl InternalEvent for FluentdEventSent {
    fn emit(self) {
        trace!(message = "Frame sent.", byte_size = %self.byte_size);
        counter!("component_sent_events_total", "protocol" => "fluentd").increment(1);
        counter!("component_sent_bytes_total", "protocol" => "fluentd")
            .increment(self.byte_size as u64);
    }
}

#[derive(Debug)]
pub struct FluentdEncodeError<'a> {
    pub error: &'a EncodeError,
}

impl InternalEvent for FluentdEncodeError<'_> {
    fn emit(self) {
        const REASON: &str = "Failed encoding event, dropping it.";
        error!(
            message = REASON,
            error = %self.error,
            error_code = "encoder_serialize",
            error_type = error_type::ENCODER_FAILED,
            stage = error_stage::PROCESSING,
        );
        counter!(
            "component_errors_total",
            "error_code" => "encoder_serialize",
            "error_type" => error_type::ENCODER_FAILED,
            "stage" => error_stage::PROCESSING,
        )
        .increment(1);
        counter!("component_discarded_events_total", "intentional" => "false").increment(1);
    }
}

#[derive(Debug)]
pub struct FluentdWriteError<'a> {
    pub error: &'a std::io::Error,
}

impl InternalEvent for FluentdWriteError<'_> {
    fn emit(self) {
        error!(
            message = "Failed writing to connection. Stopping forwarder.",
            error = %self.error,
            error_code = io_error_code(self.error),
            error_type = error_type::IO_FAILED,
            stage = error_stage::SENDING,
        );
        counter!(
            "component_errors_total",
            "error_code" => io_error_code(self.error),
            "error_type" => error_type::IO_FAILED,
            "stage" => error_stage::SENDING,
        )
        .increment(1);
    }
}
