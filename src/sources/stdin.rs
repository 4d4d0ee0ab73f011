use std::{io, thread};

use snafu::{ResultExt, Snafu};

use crate::{
    event::LogMessage,
    fanout::Fanout,
    internal_events::{StdinDecodeError, StdinEventsReceived, StdinReadError},
};

#[derive(Debug, Snafu)]
pub enum StdinError {
    #[snafu(display("Could not spawn stdin reader thread: {}", source))]
    Spawn { source: io::Error },
}

/// Reads one JSON-encoded [`LogMessage`] per line from `reader` and hands each to `fanout`.
///
/// Lines that do not decode are logged and skipped. Reading stops at end of input, on a read
/// error, or once every output of the fanout has closed; dropping the fanout then closes the
/// outputs' queues.
pub fn read_messages<R>(mut reader: R, mut fanout: Fanout)
where
    R: io::BufRead,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                emit!(StdinReadError { error: &error });
                break;
            }
        }

        let line = buf.trim_ascii();
        if line.is_empty() {
            continue;
        }

        // Invalid UTF-8 is a decode miss, not a read error.
        let message = match serde_json::from_slice::<LogMessage>(line) {
            Ok(message) => message,
            Err(error) => {
                emit!(StdinDecodeError { error: &error });
                continue;
            }
        };

        emit!(StdinEventsReceived {
            byte_size: line.len()
        });

        if !fanout.send(message) {
            debug!(message = "All outputs closed, no longer reading stdin.");
            break;
        }
    }
}

/// Runs [`read_messages`] over the process' stdin on a dedicated thread, since reading stdin
/// blocks.
pub fn stdin_source(fanout: Fanout) -> Result<thread::JoinHandle<()>, StdinError> {
    thread::Builder::new()
        .name("stdin".to_owned())
        .spawn(move || read_messages(io::stdin().lock(), fanout))
        .context(SpawnSnafu)
}
