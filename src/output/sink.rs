use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

/// A buffered output file, optionally gzip compressed
///
/// Dropping a sink without calling [`OutputSink::try_finish`] still flushes
/// buffered data and writes the gzip trailer, but errors are lost.
pub enum OutputSink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputSink {
    /// Create (or truncate) `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn create(path: &Path, compress: bool) -> io::Result<Self> {
        let file = BufWriter::new(File::create(path)?);
        Ok(if compress {
            Self::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            Self::Plain(file)
        })
    }

    /// Flush everything to disk, completing the gzip stream if compressed
    ///
    /// # Errors
    ///
    /// Returns any error from the final write or flush.
    pub fn try_finish(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(enc) => {
                enc.try_finish()?;
                enc.get_mut().flush()
            }
        }
    }
}

impl Write for OutputSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            Self::Gzip(enc) => enc.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            Self::Gzip(enc) => enc.flush(),
        }
    }
}

/// File suffix for an output of kind `base` (`fastq`, `txt`)
pub fn suffix(base: &str, compress: bool) -> String {
    if compress {
        format!(".{base}.gz")
    } else {
        format!(".{base}")
    }
}
