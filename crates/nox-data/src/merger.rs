//! Concatenation of per-file tables into one indexed table.

use std::collections::BTreeSet;

use nox_core::error::{NoxError, Result};
use nox_core::models::{IndexedRow, MergedTable, RawTable};
use tracing::debug;

/// Concatenate `tables` in order under the first table's header.
///
/// Rows get a fresh contiguous index `0..N`; in-file positions are
/// discarded. Tables whose column set differs from the first table's fail
/// with [`NoxError::SchemaMismatch`]. A table with the same columns in a
/// different order is realigned to the first table's order.
pub fn merge_tables(tables: Vec<RawTable>) -> Result<MergedTable> {
    let mut tables = tables.into_iter();
    let Some(first) = tables.next() else {
        return Ok(MergedTable::default());
    };

    let headers = first.headers.clone();
    let expected: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
    let mut rows: Vec<IndexedRow> = Vec::with_capacity(first.len());
    push_rows(&mut rows, first.rows, None);

    for table in tables {
        if table.column_set() != expected {
            return Err(NoxError::SchemaMismatch {
                path: table.source.clone(),
                expected: headers.join(", "),
                found: table.headers.join(", "),
            });
        }

        let order = column_order(&headers, &table.headers);
        let source = table.source;
        let count = table.rows.len();
        push_rows(&mut rows, table.rows, order.as_deref());
        debug!("Merged {} rows from {}", count, source.display());
    }

    debug!("Merged table has {} rows", rows.len());
    Ok(MergedTable { headers, rows })
}

/// Positions in `found` of each column of `canonical`, or `None` when the
/// two orders already agree.
fn column_order(canonical: &[String], found: &[String]) -> Option<Vec<usize>> {
    if canonical == found {
        return None;
    }
    canonical
        .iter()
        .map(|name| found.iter().position(|h| h == name))
        .collect()
}

fn push_rows(rows: &mut Vec<IndexedRow>, source: Vec<Vec<String>>, order: Option<&[usize]>) {
    for values in source {
        let values = match order {
            Some(order) => order.iter().map(|&i| values[i].clone()).collect(),
            None => values,
        };
        rows.push(IndexedRow {
            index: rows.len(),
            values,
        });
    }
}
