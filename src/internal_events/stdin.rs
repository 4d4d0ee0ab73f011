use metrics::counter;

use super::{InternalEvent, error_stage, error_type};

#[derive(Debug)]
pub struct StdinEventsReceived {
    pub byte_size: usize,
}

impl InternalEvent for StdinEventsReceived {
    fn emit(self) {
        trace!(message = "Received one event.", byte_size = %self.byte_size);
        counter!("component_received_events_total", "component_type" => "stdin").increment(1);
        counter!("component_received_event_bytes_total", "component_type" => "stdin")
            .increment(self.byte_size as u64);
    }
}

#[derive(Debug)]
pub struct StdinDecodeError<'a> {
    pub error: &'a serde_json::Error,
}

impl InternalEvent for StdinDecodeError<'_> {
    fn emit(self) {
        error!(
            message = "Failed decoding inbound event, skipping line.",
            error = %self.error,
            error_code = "decoder_deserialize",
            error_type = error_type::PARSER_FAILED,
            stage = error_stage::RECEIVING,
        );
        counter!(
            "component_errors_total",
            "error_code" => "decoder_deserialize",
            "error_type" => error_type::PARSER_FAILED,
            "stage" => error_stage::RECEIVING,
        )
        .increment(1);
    }
}

#[derive(Debug)]
pub struct StdinReadError<'a> {
    pub error: &'a std::io::Error,
}

impl InternalEvent for StdinReadError<'_> {
    fn emit(self) {
        error!(
            message = "Unable to read from stdin.",
            error = %self.error,
            error_type = error_type::IO_FAILED,
            stage = error_stage::RECEIVING,
        );
        counter!(
            "component_errors_total",
            "error_type" => error_type::IO_FAILED,
            "stage" => error_stage::RECEIVING,
        )
        .increment(1);
    }
}
