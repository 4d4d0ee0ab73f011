use std::fmt;

use tokio::sync::mpsc;

use crate::event::LogMessage;

/// Copies every message to each registered output, keyed by route id.
///
/// Outputs whose receiving end has gone away are dropped from the fanout; once none are left
/// the fanout reports itself as closed.
#[derive(Default)]
pub struct Fanout {
    outputs: Vec<(String, mpsc::UnboundedSender<LogMessage>)>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an output and returns the receiving end of its queue.
    ///
    /// # Panics
    ///
    /// Panics if an output with the same id already exists.
    pub fn add(&mut self, id: impl Into<String>) -> mpsc::UnboundedReceiver<LogMessage> {
        let id = id.into();
        assert!(
            !self.outputs.iter().any(|(existing, _)| *existing == id),
            "Duplicate output id in fanout"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        self.outputs.push((id, tx));
        rx
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Sends `message` to every output. Returns `false` when no output is left to send to.
    pub fn send(&mut self, message: LogMessage) -> bool {
        let Some(((last_id, last), rest)) = self.outputs.split_last() else {
            return false;
        };

        let mut closed = Vec::new();
        for (id, output) in rest {
            if output.send(message.clone()).is_err() {
                closed.push(id.clone());
            }
        }
        if last.send(message).is_err() {
            closed.push(last_id.clone());
        }

        if !closed.is_empty() {
            for id in &closed {
                debug!(message = "Output closed, removing it from fanout.", output = %id);
            }
            self.outputs.retain(|(id, _)| !closed.contains(id));
        }

        !self.outputs.is_empty()
    }
}

impl fmt::Debug for Fanout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fanout")
            .field(
                "outputs",
                &self.outputs.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::message;

    #[test]
    fn copies_to_every_output() {
        let mut fanout = Fanout::new();
        let mut a = fanout.add("a");
        let mut b = fanout.add("b");

        assert!(fanout.send(message("hello", "stdout")));

        assert_eq!(a.try_recv().unwrap().data, "hello");
        assert_eq!(b.try_recv().unwrap().data, "hello");
    }

    #[test]
    fn drops_closed_outputs() {
        let mut fanout = Fanout::new();
        let a = fanout.add("a");
        let mut b = fanout.add("b");
        drop(a);

        assert!(fanout.send(message("one", "stdout")));
        assert_eq!(fanout.len(), 1);
        assert_eq!(b.try_recv().unwrap().data, "one");

        drop(b);
        assert!(!fanout.send(message("two", "stdout")));
        assert!(fanout.is_empty());
    }

    #[test]
    fn empty_fanout_is_closed() {
        assert!(!Fanout::new().send(message("x", "stdout")));
    }

    #[test]
    #[should_panic(expected = "Duplicate output id in fanout")]
    fn rejects_duplicate_ids() {
        let mut fanout = Fanout::new();
        let _a = fanout.add("a");
        let _b = fanout.add("a");
    }
}
