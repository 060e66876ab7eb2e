pub mod order;

use anyhow::{Context, Result};
use std::{
    collections::BTreeMap,
    fs,
    path::Path,
};
use tracing::{info, instrument};

use crate::config::SplitConfig;
use crate::ingest;
use crate::manifest::{self, Manifest, MiniRefs, PartSummary};

/// Write one chunk CSV: the resolved header first, then `rows` in order.
/// Output is always UTF-8 and comma-delimited, regardless of what the
/// source looked like. Missing parent directories are created.
pub fn write_csv(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv");
    Ok(())
}

fn summarize(name: &str, chunk: &[Vec<String>]) -> PartSummary {
    match (chunk.first(), chunk.last()) {
        (Some(first), Some(last)) => PartSummary {
            file: name.to_string(),
            rows: chunk.len(),
            first_date: first.first().cloned(),
            first_draw: first.get(1).cloned(),
            last_date: last.first().cloned(),
            last_draw: last.get(1).cloned(),
        },
        _ => PartSummary::empty(name),
    }
}

/// Tail slices of the sorted data: `mini/latest_{k}.csv` holds the newest
/// `min(k, total)` rows.
fn write_minis(
    cfg: &SplitConfig,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<Option<MiniRefs>> {
    if cfg.mini_sizes.is_empty() {
        return Ok(None);
    }
    let mut refs = BTreeMap::new();
    for &k in &cfg.mini_sizes {
        let tail = &rows[rows.len().saturating_sub(k)..];
        let rel = format!("mini/latest_{}.csv", k);
        write_csv(&cfg.out_dir.join(&rel), header, tail)?;
        refs.insert(format!("latest_{}", k), rel);
    }
    Ok(Some(refs))
}

/// Run the whole split: read, sort OLD→NEW, partition into `part_size`
/// chunks, emit chunk and mini files, and write `parts/index.json`.
/// Returns the manifest that was written.
///
/// Suffix 0 is the newest chunk; the oldest gets the highest suffix. With
/// `reserve_latest_empty`, suffix 0 stays a header-only placeholder and the
/// real chunks shift up by one.
#[instrument(level = "info", skip(cfg), fields(source = %cfg.source.display()))]
pub fn run(cfg: &SplitConfig) -> Result<Manifest> {
    let (header, mut rows) = ingest::read_rows(&cfg.source)?;
    let header = ingest::resolve_header(header);

    if rows.is_empty() {
        info!("empty source; writing placeholder chance0.csv and manifest");
        write_csv(&cfg.out_dir.join("chance0.csv"), &header, &[])?;
        let m = Manifest::new(
            vec!["chance0.csv".to_string()],
            header,
            vec![PartSummary::empty("chance0.csv")],
            None,
        );
        manifest::write(&cfg.out_dir, &m)?;
        return Ok(m);
    }

    order::sort_old_to_new(&mut rows)?;
    info!(total = rows.len(), "sorted OLD\u{2192}NEW");

    let chunks: Vec<&[Vec<String>]> = rows.chunks(cfg.part_size).collect();
    info!(
        parts = chunks.len(),
        part_size = cfg.part_size,
        "partitioned"
    );

    let shift = usize::from(cfg.reserve_latest_empty);
    let mut names = Vec::with_capacity(chunks.len() + shift);
    let mut parts = Vec::with_capacity(chunks.len() + shift);
    for (i, chunk) in chunks.iter().enumerate() {
        let name = format!("chance{}.csv", chunks.len() - 1 - i + shift);
        write_csv(&cfg.out_dir.join(&name), &header, chunk)?;
        parts.push(summarize(&name, chunk));
        names.push(name);
    }
    if cfg.reserve_latest_empty {
        write_csv(&cfg.out_dir.join("chance0.csv"), &header, &[])?;
        parts.push(PartSummary::empty("chance0.csv"));
        names.push("chance0.csv".to_string());
    }

    let mini = write_minis(cfg, &header, &rows)?;

    let m = Manifest::new(names, header, parts, mini);
    manifest::write(&cfg.out_dir, &m)?;
    Ok(m)
}
