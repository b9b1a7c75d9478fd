use std::fmt::{self, Write};
use std::sync::Arc;

use super::entry::NotificationEntry;
use super::ranking::RankingSnapshot;
use super::types::Importance;

/// Writes the operator report: visible entries in display order, then every
/// stored entry that is not visible, in key order.
pub fn write_dump<W: Write>(
    out: &mut W,
    indent: &str,
    active: &[Arc<NotificationEntry>],
    all: &[Arc<NotificationEntry>],
    ranking: Option<&RankingSnapshot>,
) -> fmt::Result {
    let importance_of = |key: &str| ranking.map_or(Importance::Unspecified, |r| r.importance(key));

    writeln!(out, "{}active notifications: {}", indent, active.len())?;
    for (index, entry) in active.iter().enumerate() {
        write_entry(out, indent, index, entry, importance_of(entry.key()))?;
    }

    let inactive: Vec<_> = all
        .iter()
        .filter(|entry| !active.iter().any(|a| Arc::ptr_eq(a, entry)))
        .collect();
    writeln!(out, "{}inactive notifications: {}", indent, inactive.len())?;
    for (index, entry) in inactive.into_iter().enumerate() {
        write_entry(out, indent, index, entry, importance_of(entry.key()))?;
    }
    Ok(())
}

fn write_entry<W: Write>(
    out: &mut W,
    indent: &str,
    index: usize,
    entry: &NotificationEntry,
    importance: Importance,
) -> fmt::Result {
    let notification = entry.notification();
    writeln!(out, "{}  [{}] key={}", indent, index, entry.key())?;
    writeln!(
        out,
        "{}      pkg={} id={} importance={}",
        indent, notification.package_name, notification.id, importance
    )?;
    writeln!(
        out,
        "{}      title=\"{}\"",
        indent,
        notification.title.as_deref().unwrap_or_default()
    )?;
    writeln!(
        out,
        "{}      tickerText=\"{}\"",
        indent,
        notification.ticker_text.as_deref().unwrap_or_default()
    )
}
