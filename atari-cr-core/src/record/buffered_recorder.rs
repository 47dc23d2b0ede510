use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written record in memory. This is used in tests and for
/// inspecting values written during short runs.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    texts: Vec<(String, String)>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Returns the written `(tag, text)` pairs.
    pub fn texts(&self) -> &[(String, String)] {
        &self.texts
    }

    /// Returns the scalar values of the given key in the order they were written.
    pub fn scalars(&self, key: &str) -> Vec<f32> {
        self.buf
            .iter()
            .filter_map(|r| r.get_scalar(key).ok())
            .collect()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn write_text(&mut self, tag: &str, text: &str, _step: usize) {
        self.texts.push((tag.to_string(), text.to_string()));
    }
}
