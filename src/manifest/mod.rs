use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const SCHEMA_VERSION: &str = "1.2";

const ORDER_NOTE: &str =
    "Order is oldest to newest. All chance{N}.csv files share an identical header.";

/// Logical name ("latest_1000") to relative path ("mini/latest_1000.csv").
pub type MiniRefs = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize)]
pub struct PartSummary {
    pub file: String,
    pub rows: usize,
    pub first_date: Option<String>,
    pub first_draw: Option<String>,
    pub last_date: Option<String>,
    pub last_draw: Option<String>,
}

impl PartSummary {
    /// Entry for a header-only file: zero rows, null date/draw fields.
    pub fn empty(file: &str) -> Self {
        Self {
            file: file.to_string(),
            rows: 0,
            first_date: None,
            first_draw: None,
            last_date: None,
            last_draw: None,
        }
    }
}

/// The JSON side-file written to `parts/index.json`. Built once per run and
/// replaced wholesale; there is no incremental update.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub schema: String,
    /// Chunk file names, oldest to newest.
    pub order: Vec<String>,
    pub header: Vec<String>,
    pub notes: String,
    pub parts: Vec<PartSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mini: Option<MiniRefs>,
}

impl Manifest {
    pub fn new(
        order: Vec<String>,
        header: Vec<String>,
        parts: Vec<PartSummary>,
        mini: Option<MiniRefs>,
    ) -> Self {
        Self {
            schema: SCHEMA_VERSION.to_string(),
            order,
            header,
            notes: ORDER_NOTE.to_string(),
            parts,
            mini,
        }
    }
}

/// Serialize the manifest to `<out_dir>/parts/index.json`.
pub fn write(out_dir: &Path, manifest: &Manifest) -> Result<PathBuf> {
    let dir = out_dir.join("parts");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("index.json");
    let json = serde_json::to_string_pretty(manifest).context("serializing manifest")?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), parts = manifest.parts.len(), "wrote manifest");
    Ok(path)
}
