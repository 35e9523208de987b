//! Operation log sinks
//!
//! The reconciler reports every create, update and remove as one message to
//! a [`LogSink`]. Sinks are infallible from the reconciler's point of view:
//! a sink that cannot write reports the problem through `tracing` instead of
//! failing the pass.

mod rotating;

pub use rotating::{RotatingFileSink, RotationPolicy, format_line};

/// Destination for operation messages.
pub trait LogSink {
    /// Record one operation message, e.g. `Copied file /replica/a.txt`.
    fn record(&mut self, message: &str);
}

impl<S: LogSink + ?Sized> LogSink for &mut S {
    fn record(&mut self, message: &str) {
        (**self).record(message);
    }
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn record(&mut self, message: &str) {
        (**self).record(message);
    }
}

/// Collects messages in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    messages: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Return and clear everything recorded so far.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

impl LogSink for MemorySink {
    fn record(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// Prints each message on its own line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn record(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Forwards every message to two sinks, first `A` then `B`.
#[derive(Debug, Clone, Default)]
pub struct Tee<A, B> {
    pub first: A,
    pub second: B,
}

impl<A, B> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: LogSink, B: LogSink> LogSink for Tee<A, B> {
    fn record(&mut self, message: &str) {
        self.first.record(message);
        self.second.record(message);
    }
}
