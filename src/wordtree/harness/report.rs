use crate::wordtree::config::ReportFormat;
use crate::wordtree::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

pub const CSV_HEADER: &str = "operation,node_count,time_us";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Insert,
    Delete,
}

impl Display for OperationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OperationKind::Insert => "insert",
            OperationKind::Delete => "delete",
        })
    }
}

/// One timed tree operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub operation: OperationKind,
    /// Live nodes right after the operation.
    pub node_count: usize,
    pub time_us: u64,
}

/// Somewhere samples are written to. Purely observational, nothing here feeds
/// back into the tree.
pub trait ReportSink {
    fn record(&mut self, sample: &Sample) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

/// Writes `operation,node_count,time_us` rows under a header line.
pub struct CsvSink<W: Write> {
    writer: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{CSV_HEADER}")?;
        Ok(CsvSink { writer })
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl CsvSink<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn record(&mut self, sample: &Sample) -> Result<()> {
        writeln!(
            self.writer,
            "{},{},{}",
            sample.operation, sample.node_count, sample.time_us
        )?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes each sample as a MessagePack map, back to back.
pub struct MsgPackSink<W: Write> {
    writer: W,
}

impl<W: Write> MsgPackSink<W> {
    pub fn new(writer: W) -> Self {
        MsgPackSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl MsgPackSink<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> ReportSink for MsgPackSink<W> {
    fn record(&mut self, sample: &Sample) -> Result<()> {
        rmp_serde::encode::write_named(&mut self.writer, sample)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Opens a file sink in the requested format, truncating whatever was there.
pub fn open_sink(format: ReportFormat, path: impl AsRef<Path>) -> Result<Box<dyn ReportSink>> {
    let path = path.as_ref();
    tracing::debug!(?format, path = %path.display(), "opening report");

    Ok(match format {
        ReportFormat::Csv => Box::new(CsvSink::create(path)?),
        ReportFormat::MsgPack => Box::new(MsgPackSink::create(path)?),
    })
}

/// Times operations in whole microseconds.
///
/// Operations that finish in under a microsecond would all read as zero, so a
/// zero reading is reported as the previous reading plus one. Any non-zero
/// reading is reported as is and becomes the new base.
#[derive(Debug, Default)]
pub struct Stopwatch {
    carry: u64,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time<T>(&mut self, op: impl FnOnce() -> T) -> (T, u64) {
        let start = Instant::now();
        let out = op();
        let micros = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        (out, self.adjust(micros))
    }

    fn adjust(&mut self, micros: u64) -> u64 {
        if micros == 0 {
            self.carry += 1;
        } else {
            self.carry = micros;
        }
        self.carry
    }
}
