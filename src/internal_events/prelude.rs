pub(crate) mod error_type {
    /// An error occurred while reading the configuration or building a component from it.
    pub(crate) const CONFIGURATION_FAILED: &str = "configuration_failed";
    /// A connection to a remote peer could not be established.
    pub(crate) const CONNECTION_FAILED: &str = "connection_failed";
    /// An event could not be encoded into its wire representation.
    pub(crate) const ENCODER_FAILED: &str = "encoder_failed";
    /// Reading from or writing to an I/O handle failed.
    pub(crate) const IO_FAILED: &str = "io_failed";
    /// Input could not be parsed.
    pub(crate) const PARSER_FAILED: &str = "parser_failed";
}

pub(crate) mod error_stage {
    pub(crate) const RECEIVING: &str = "receiving";
    pub(crate) const PROCESSING: &str = "processing";
    pub(crate) const SENDING: &str = "sending";
}

pub(crate) fn io_error_code(error: &std::io::Error) -> &'static str {
    use std::io::ErrorKind::*;

    match error.kind() {
        AddrNotAvailable => "address_not_available",
        BrokenPipe => "broken_pipe",
        ConnectionAborted => "connection_aborted",
        ConnectionRefused => "connection_refused",
        ConnectionReset => "connection_reset",
        Interrupted => "operation_interrupted",
        InvalidInput => "invalid_input_parameter",
        NotConnected => "not_connected",
        NotFound => "entity_not_found",
        PermissionDenied => "permission_denied",
        TimedOut => "timed_out",
        UnexpectedEof => "unexpected_end_of_file",
        WriteZero => "write_zero",
        _ => "unknown",
    }
}
