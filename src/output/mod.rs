//! Run outputs: per-readset FASTQ buckets, tab-delimited logs and statistics.
//!
//! | Output | File name |
//! |--------|-----------|
//! | Readset bucket | `{basename}_{mid5}[_{mid3}].fastq[.gz]` |
//! | Unmatched reads | `{basename}_unknowns.fastq[.gz]` |
//! | Detail log | `{basename}.barcode-detailed.txt[.gz]` |
//! | Summary log | `{basename}.barcode-summary.txt[.gz]` |

pub mod emitter;
pub mod logs;
pub mod sink;
pub mod stats;

pub use emitter::Emitter;
pub use logs::{DetailLog, SummaryLog, SummaryRow};
pub use stats::RunStatistics;
