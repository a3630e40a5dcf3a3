//! Per-frame annotation records and their sinks.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Error, Result};
use crate::tracker::position::Position;

/// Column names of the annotation stream, in order.
pub const CSV_HEADER: [&str; 4] = ["frame_idx", "centroid_x", "centroid_y", "visible"];

/// Annotation of a single processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame_idx: u64,
    /// Accepted target centroid; `None` when nothing was accepted
    pub centroid: Option<Position>,
}

impl FrameRecord {
    pub fn new(frame_idx: u64, centroid: Option<Position>) -> Self {
        Self {
            frame_idx,
            centroid,
        }
    }

    /// 1 when a target was accepted on this frame, 0 otherwise.
    #[inline]
    pub fn visible(&self) -> u8 {
        u8::from(self.centroid.is_some())
    }
}

/// Destination for the annotation stream.
pub trait RecordSink {
    /// Accept one record. Failing here is fatal for the session.
    fn write(&mut self, record: &FrameRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl RecordSink for Vec<FrameRecord> {
    fn write(&mut self, record: &FrameRecord) -> Result<()> {
        self.push(*record);
        Ok(())
    }
}

/// Flat CSV row; absent centroid coordinates serialize as empty fields.
#[derive(Debug, Serialize)]
struct CsvRow {
    frame_idx: u64,
    centroid_x: Option<i32>,
    centroid_y: Option<i32>,
    visible: u8,
}

impl From<&FrameRecord> for CsvRow {
    fn from(record: &FrameRecord) -> Self {
        Self {
            frame_idx: record.frame_idx,
            centroid_x: record.centroid.map(|p| p.x),
            centroid_y: record.centroid.map(|p| p.y),
            visible: record.visible(),
        }
    }
}

/// Writes records as CSV with a `frame_idx,centroid_x,centroid_y,visible` header.
pub struct CsvRecordSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvRecordSink<W> {
    /// Wrap `inner` and write the header row immediately, so even an empty
    /// session produces a valid file.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        Ok(Self { writer })
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl CsvRecordSink<File> {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn write(&mut self, record: &FrameRecord) -> Result<()> {
        self.writer.serialize(CsvRow::from(record))?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Enforces one record per frame, in frame order, with no gaps.
#[derive(Debug)]
pub struct RecordEmitter<S: RecordSink> {
    sink: S,
    next_frame: u64,
}

impl<S: RecordSink> RecordEmitter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            next_frame: 0,
        }
    }

    /// Emit the record for `frame_idx`.
    ///
    /// `frame_idx` must be exactly the next frame in sequence.
    pub fn emit(&mut self, frame_idx: u64, centroid: Option<Position>) -> Result<FrameRecord> {
        if frame_idx != self.next_frame {
            return Err(Error::FrameOutOfSequence {
                expected: self.next_frame,
                got: frame_idx,
            });
        }

        let record = FrameRecord::new(frame_idx, centroid);
        self.sink.write(&record)?;
        self.next_frame += 1;
        trace!(frame_idx, visible = record.visible(), "record emitted");
        Ok(record)
    }

    /// Index the next emitted record must carry.
    #[inline]
    pub fn next_frame(&self) -> u64 {
        self.next_frame
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Flush the sink and hand it back.
    pub fn finish(mut self) -> Result<S> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
