use anyhow::{Context, Result};
use chrono::NaiveDate;

/// Draw-identifier sort component. Integer ids order numerically and before
/// any non-integer id, which orders as text. Mixed ids in one dataset are an
/// accepted edge case, not an error.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum DrawId {
    Num(i64),
    Text(String),
}

impl DrawId {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) => DrawId::Num(n),
            Err(_) => DrawId::Text(raw.to_string()),
        }
    }
}

/// Sort key for one record: draw date, then draw id.
fn sort_key(row: &[String]) -> Result<(NaiveDate, DrawId)> {
    let date_str = row.first().map(String::as_str).unwrap_or_default();
    let date = NaiveDate::parse_from_str(date_str, "%d/%m/%Y")
        .with_context(|| format!("malformed draw date {:?}", date_str))?;
    let draw = DrawId::parse(row.get(1).map(String::as_str).unwrap_or_default());
    Ok((date, draw))
}

/// Stable sort OLD→NEW by (date, draw id). A row whose date field does not
/// parse as DD/MM/YYYY aborts the run.
pub fn sort_old_to_new(rows: &mut Vec<Vec<String>>) -> Result<()> {
    let mut keyed = Vec::with_capacity(rows.len());
    for row in rows.drain(..) {
        let key = sort_key(&row)?;
        keyed.push((key, row));
    }
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    rows.extend(keyed.into_iter().map(|(_, row)| row));
    Ok(())
}
