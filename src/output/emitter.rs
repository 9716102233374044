use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use noodles::fastq;
use tracing::debug;

use crate::core::read::Read;
use crate::core::readset::ReadsetDefinition;
use crate::output::sink::{suffix, OutputSink};
use crate::parsing::fastq::to_record;

/// Bucket name for reads that matched no readset
pub const UNKNOWNS: &str = "unknowns";

/// Writes reads into per-readset FASTQ files
///
/// Files are opened the first time a read is routed to them and stay open
/// until [`Emitter::finish`]. If the emitter is dropped early, every open
/// file is still flushed and closed.
pub struct Emitter {
    dir: PathBuf,
    compress: bool,
    buckets: BTreeMap<PathBuf, fastq::io::Writer<OutputSink>>,
}

impl Emitter {
    pub fn new(dir: impl Into<PathBuf>, compress: bool) -> Self {
        Self {
            dir: dir.into(),
            compress,
            buckets: BTreeMap::new(),
        }
    }

    /// Destination of reads from an input named `basename` assigned to
    /// `readset`, or to the unknowns bucket when `readset` is `None`
    pub fn bucket_path(&self, basename: &str, readset: Option<&ReadsetDefinition>) -> PathBuf {
        let name = readset
            .and_then(ReadsetDefinition::bucket_suffix)
            .unwrap_or_else(|| UNKNOWNS.to_string());
        self.dir
            .join(format!("{basename}_{name}{}", suffix("fastq", self.compress)))
    }

    /// Append `read` to the bucket at `path`, opening it if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot be created or written.
    pub fn write(&mut self, path: &Path, read: &Read) -> io::Result<()> {
        if !self.buckets.contains_key(path) {
            debug!("Opening output {}", path.display());
            let sink = OutputSink::create(path, self.compress)?;
            self.buckets.insert(path.to_path_buf(), fastq::io::Writer::new(sink));
        }

        match self.buckets.get_mut(path) {
            Some(writer) => writer.write_record(&to_record(read)),
            None => Err(io::Error::other(format!("output {} was not opened", path.display()))),
        }
    }

    /// Number of buckets opened so far
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Flush and close every bucket, returning their paths in sorted order
    ///
    /// # Errors
    ///
    /// Returns the first error from closing a bucket; remaining buckets are
    /// still closed on drop.
    pub fn finish(mut self) -> io::Result<Vec<PathBuf>> {
        let buckets = std::mem::take(&mut self.buckets);
        let mut paths = Vec::with_capacity(buckets.len());
        for (path, mut writer) in buckets {
            writer.get_mut().try_finish()?;
            paths.push(path);
        }
        Ok(paths)
    }
}
