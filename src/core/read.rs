/// A single sequencing read
///
/// `sequence` and `quality` always have the same length; the FASTQ reader
/// rejects records where they differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    /// Full header line without the leading `@` (name and description)
    pub header: String,
    pub sequence: Vec<u8>,
    pub quality: Vec<u8>,
}

impl Read {
    pub fn new(header: impl Into<String>, sequence: impl Into<Vec<u8>>, quality: impl Into<Vec<u8>>) -> Self {
        Self {
            header: header.into(),
            sequence: sequence.into(),
            quality: quality.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Copy of this read restricted to `start..stop`.
    ///
    /// Coordinates are clamped to the read; a window with `start >= stop`
    /// yields an empty read.
    #[must_use]
    pub fn slice(&self, start: usize, stop: usize) -> Self {
        let stop = stop.min(self.sequence.len());
        let start = start.min(stop);
        Self {
            header: self.header.clone(),
            sequence: self.sequence[start..stop].to_vec(),
            quality: self.quality[start..stop].to_vec(),
        }
    }
}
