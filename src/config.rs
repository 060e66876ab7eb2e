use std::path::PathBuf;

/// Standard column names expected in the source file.
pub const HEADER_STD: [&str; 6] = ["תאריך", "הגרלה", "תלתן", "יהלום", "לב", "עלה"];

/// Knobs for one split run. The source file's native order is not assumed;
/// rows are re-sorted oldest-first before partitioning.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Source CSV to split.
    pub source: PathBuf,
    /// Directory receiving `chance{N}.csv`, `parts/` and `mini/`.
    pub out_dir: PathBuf,
    /// Maximum rows per chunk file.
    pub part_size: usize,
    /// Keep `chance0.csv` as an empty reservoir (header only), shifting the
    /// real chunks up to suffixes N..1.
    pub reserve_latest_empty: bool,
    /// Tail sizes emitted as `mini/latest_{n}.csv`.
    pub mini_sizes: Vec<usize>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("chance.csv"),
            out_dir: PathBuf::from("."),
            part_size: 10_000,
            reserve_latest_empty: false,
            mini_sizes: vec![1_000, 2_000],
        }
    }
}
