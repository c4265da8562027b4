use crate::{Status, StreamMessage, StreamParseErr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Connection state, as reported to [`StreamHandler::on_state_changed`].
pub enum StreamState {
    /// The stream is open and lines are being read.
    Connected,
    /// The run is over and every queued line has been dispatched.
    Disconnected,
}

/// Receives everything a stream produces. Callbacks are invoked one at a time, in the
/// order the lines arrived, and never concurrently.
///
/// Per-line failures arrive in [`StreamHandler::on_exception`]; returning from it
/// continues the stream with the next line.
pub trait StreamHandler {
    fn on_status(&mut self, status: Status);

    fn on_message(&mut self, message: StreamMessage);

    fn on_exception(&mut self, error: StreamParseErr);

    fn on_state_changed(&mut self, _state: StreamState) {}

    /// Free-form notes about the lifecycle of the stream.
    fn log(&mut self, _text: &str) {}
}

impl<H: StreamHandler + ?Sized> StreamHandler for &mut H {
    fn on_status(&mut self, status: Status) {
        (**self).on_status(status)
    }

    fn on_message(&mut self, message: StreamMessage) {
        (**self).on_message(message)
    }

    fn on_exception(&mut self, error: StreamParseErr) {
        (**self).on_exception(error)
    }

    fn on_state_changed(&mut self, state: StreamState) {
        (**self).on_state_changed(state)
    }

    fn log(&mut self, text: &str) {
        (**self).log(text)
    }
}

impl<H: StreamHandler + ?Sized> StreamHandler for Box<H> {
    fn on_status(&mut self, status: Status) {
        (**self).on_status(status)
    }

    fn on_message(&mut self, message: StreamMessage) {
        (**self).on_message(message)
    }

    fn on_exception(&mut self, error: StreamParseErr) {
        (**self).on_exception(error)
    }

    fn on_state_changed(&mut self, state: StreamState) {
        (**self).on_state_changed(state)
    }

    fn log(&mut self, text: &str) {
        (**self).log(text)
    }
}
