use std::{fmt, str::FromStr};

use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Utc};
use snafu::Snafu;
use tokio_util::codec::Encoder;

use super::Record;

/// Tag leading every forward frame.
pub const FORWARD_TAG: &str = "logspout";

#[derive(Debug, Snafu)]
pub enum EncodeError {
    #[snafu(display("Could not serialize record: {}", source))]
    Serialize { source: serde_json::Error },
    #[snafu(display("I/O error while encoding: {}", source))]
    Io { source: std::io::Error },
}

impl From<std::io::Error> for EncodeError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

/// Layout of the bytes written for each record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameFormat {
    /// `["logspout", <seconds>, <record>]`, the fluentd forward convention.
    #[default]
    Forward,
    /// The bare record, for receivers using a `json_lines` codec.
    JsonLines,
}

impl FrameFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::JsonLines => "json_lines",
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrameFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" => Ok(Self::Forward),
            "json_lines" => Ok(Self::JsonLines),
            other => Err(format!(
                "unknown frame format {other:?}, expected \"forward\" or \"json_lines\""
            )),
        }
    }
}

/// A record ready to be framed, with the time of the line it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct ForwardFrame {
    pub time: DateTime<Utc>,
    pub record: Record,
}

/// Fractional seconds since the unix epoch.
///
/// Precision beyond what an `f64` holds is dropped.
pub fn epoch_seconds(time: DateTime<Utc>) -> f64 {
    match time.timestamp_nanos_opt() {
        Some(nanos) => nanos as f64 / 1e9,
        // Outside of the i64 nanosecond range (before 1677 or after 2262).
        None => time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9,
    }
}

/// Serializes frames as JSON, one per line.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForwardEncoder {
    format: FrameFormat,
}

impl ForwardEncoder {
    pub const fn new(format: FrameFormat) -> Self {
        Self { format }
    }
}

impl Encoder<ForwardFrame> for ForwardEncoder {
    type Error = EncodeError;

    fn encode(&mut self, frame: ForwardFrame, buffer: &mut BytesMut) -> Result<(), Self::Error> {
        let start = buffer.len();
        let writer = (&mut *buffer).writer();
        let result = match self.format {
            FrameFormat::Forward => serde_json::to_writer(
                writer,
                &(FORWARD_TAG, epoch_seconds(frame.time), &frame.record),
            ),
            FrameFormat::JsonLines => serde_json::to_writer(writer, &frame.record),
        };

        if let Err(source) = result {
            buffer.truncate(start);
            return Err(EncodeError::Serialize { source });
        }

        buffer.put_u8(b'\n');
        Ok(())
    }
}
