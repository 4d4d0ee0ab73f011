use async_trait::async_trait;
use bytes::BytesMut;
use futures::{StreamExt, stream::BoxStream};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

use super::{DockerInfo, EncodeError, ForwardEncoder, ForwardFrame, normalize};
use crate::{
    adapters::{LogAdapter, StreamError},
    event::LogMessage,
    internal_events::{FluentdEncodeError, FluentdEventSent, FluentdWriteError},
};

/// Writes one frame per log message to a connection it owns.
///
/// A message that cannot be encoded is dropped. A failed write ends the stream with
/// [`StreamError::Write`]; the connection is never re-established.
pub struct FluentdSink<W, E = ForwardEncoder> {
    connection: W,
    encoder: E,
}

impl<W, E> FluentdSink<W, E>
where
    W: AsyncWrite + Send + Unpin,
    E: Encoder<ForwardFrame, Error = EncodeError> + Send,
{
    pub const fn new(connection: W, encoder: E) -> Self {
        Self {
            connection,
            encoder,
        }
    }

    pub fn into_inner(self) -> W {
        self.connection
    }

    fn encode_message(&mut self, message: &LogMessage) -> Result<BytesMut, EncodeError> {
        let docker = DockerInfo::from_container(&message.container);
        let record = normalize(&message.data, &message.source, &docker)
            .map_err(|source| EncodeError::Serialize { source })?;

        let mut buffer = BytesMut::new();
        self.encoder.encode(
            ForwardFrame {
                time: message.time,
                record,
            },
            &mut buffer,
        )?;
        Ok(buffer)
    }

    /// Consumes `input` in order until it is exhausted or a write fails.
    pub async fn run(&mut self, mut input: BoxStream<'_, LogMessage>) -> Result<(), StreamError> {
        while let Some(message) = input.next().await {
            let frame = match self.encode_message(&message) {
                Ok(frame) => frame,
                Err(error) => {
                    emit!(FluentdEncodeError { error: &error });
                    continue;
                }
            };

            if let Err(error) = self.connection.write_all(&frame).await {
                emit!(FluentdWriteError { error: &error });
                return Err(StreamError::Write { source: error });
            }

            emit!(FluentdEventSent {
                byte_size: frame.len()
            });
        }

        Ok(())
    }
}

#[async_trait]
impl<W, E> LogAdapter for FluentdSink<W, E>
where
    W: AsyncWrite + Send + Unpin,
    E: Encoder<ForwardFrame, Error = EncodeError> + Send,
{
    async fn stream(self: Box<Self>, input: BoxStream<'_, LogMessage>) -> Result<(), StreamError> {
        let mut sink = *self;
        sink.run(input).await
    }
}
