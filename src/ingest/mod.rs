use anyhow::{anyhow, bail, Context, Result};
use csv::ReaderBuilder;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1255};
use std::{fs, path::Path};
use tracing::{info, warn};

use crate::config::HEADER_STD;

/// Encodings tried in order; the first whole-file parse that succeeds wins.
/// UTF-8 decoding strips a leading BOM if present.
static CANDIDATE_ENCODINGS: [&Encoding; 2] = [UTF_8, WINDOWS_1255];

/// Delimiters the sniffer will consider.
const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// Leading sample (in chars) used for delimiter detection.
const SNIFF_SAMPLE: usize = 4096;

struct Parsed {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    delimiter: u8,
}

/// Trim whitespace + strip one layer of surrounding double quotes.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Pick a delimiter from the leading sample. A candidate is viable when every
/// sampled line contains the same non-zero count of it; the most frequent
/// viable candidate wins. Nothing consistent falls back to comma with
/// standard double-quote quoting.
fn sniff_delimiter(sample: &str) -> u8 {
    let lines: Vec<&str> = sample
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(10)
        .collect();
    let mut best: Option<(u8, usize)> = None;
    for &delim in &CANDIDATE_DELIMITERS {
        let mut counts = lines.iter().map(|l| l.matches(delim as char).count());
        let first = match counts.next() {
            Some(n) => n,
            None => continue,
        };
        if first == 0 || !counts.all(|c| c == first) {
            continue;
        }
        if best.map_or(true, |(_, n)| first > n) {
            best = Some((delim, first));
        }
    }
    best.map_or(b',', |(d, _)| d)
}

/// One full parse attempt with a single candidate encoding. Any decode error
/// or CSV error fails the whole attempt so the caller can move on to the
/// next encoding.
fn parse_with(bytes: &[u8], enc: &'static Encoding) -> Result<Parsed> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        bail!("input is not valid {}", enc.name());
    }

    let sample: String = text.chars().take(SNIFF_SAMPLE).collect();
    let delimiter = sniff_delimiter(&sample);

    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("CSV parse error at record {}", idx))?;
        let fields: Vec<String> = record.iter().map(clean_field).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        match header {
            None => header = Some(fields),
            Some(_) => rows.push(fields),
        }
    }

    let header = header.ok_or_else(|| anyhow!("no header row found"))?;
    Ok(Parsed {
        header,
        rows,
        delimiter,
    })
}

/// Read `(header, rows)` from `path`. Each candidate encoding gets exactly
/// one attempt; the first success is returned. All candidates failing is
/// fatal, and nothing has been written at that point.
pub fn read_rows(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    for &enc in &CANDIDATE_ENCODINGS {
        match parse_with(&bytes, enc) {
            Ok(parsed) => {
                info!(
                    rows = parsed.rows.len(),
                    encoding = enc.name(),
                    delimiter = %(parsed.delimiter as char),
                    "read source csv"
                );
                return Ok((parsed.header, parsed.rows));
            }
            Err(err) => {
                warn!(encoding = enc.name(), "candidate failed: {:#}", err);
            }
        }
    }

    bail!(
        "cannot read {} with any candidate encoding/delimiter",
        path.display()
    )
}

/// The detected header is authoritative for all outputs; differing from the
/// standard column names is only worth a warning.
pub fn resolve_header(detected: Vec<String>) -> Vec<String> {
    if detected.len() != HEADER_STD.len() || detected[..] != HEADER_STD {
        warn!(
            header = ?detected,
            "header differs from standard; using detected header"
        );
    }
    detected
}
