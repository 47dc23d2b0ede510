use super::Record;

/// Writes a record to an output destination with [`Recorder::write`].
///
/// The step at which the record is written is given as the value of the key
/// returned by [`Recorder::step_key`]; implementations may ignore records that
/// lack it.
pub trait Recorder {
    /// Write a record to the [`Recorder`].
    fn write(&mut self, record: Record);

    /// Writes a text value, like a table of hyperparameters.
    fn write_text(&mut self, _tag: &str, _text: &str, _step: usize) {}

    /// Key of the step value in records.
    fn step_key(&self) -> &str {
        "global_step"
    }

    /// Flushes buffered values to the destination.
    fn flush(&mut self) {}
}

/// A recorder that ignores any record.
#[derive(Default)]
pub struct NullRecorder {}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _record: Record) {}
}
