//! Tensorboard recorder for atari-cr.
use atari_cr_core::record::{Record, RecordValue, Recorder};
use log::warn;
use std::path::{Path, PathBuf};
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    logdir: PathBuf,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`. The step of each record is read from
    /// the step value of key `global_step`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir.as_ref()),
            logdir: logdir.as_ref().to_path_buf(),
            step_key: "global_step".to_string(),
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [`Record`] into a TFRecord.
    ///
    /// Only [`RecordValue::Scalar`] values are written, other variants are ignored.
    /// Records without the step key are discarded.
    fn write(&mut self, record: Record) {
        let step = match record.get_step(&self.step_key) {
            Ok(step) => step,
            Err(_) => {
                warn!("Record without {} was discarded", self.step_key);
                return;
            }
        };

        for (k, v) in record.iter() {
            if *k != self.step_key {
                if let RecordValue::Scalar(v) = v {
                    self.writer.add_scalar(k, *v, step);
                }
            }
        }
    }

    /// TFRecord text summaries are not supported by the writer,
    /// so the text is stored as a markdown file next to the event file.
    fn write_text(&mut self, tag: &str, text: &str, step: usize) {
        let name = format!("{}_{}.md", tag.replace('/', "_"), step);
        if let Err(e) = std::fs::write(self.logdir.join(name), text) {
            warn!("Failed to write text {}: {}", tag, e);
        }
    }

    fn step_key(&self) -> &str {
        &self.step_key
    }

    fn flush(&mut self) {
        self.writer.flush();
    }
}
