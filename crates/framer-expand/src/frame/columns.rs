//! Dashboard box placement.

use std::collections::BTreeMap;

/// Where a new dashboard box goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Target column.
    pub column: usize,
    /// Box the new one sits below, or `top` for an empty column.
    pub below: String,
}

/// Boxes placed so far, per column, in placement order.
#[derive(Debug, Default, Clone)]
pub struct ColumnBoxStack {
    columns: BTreeMap<usize, Vec<String>>,
    last_column: Option<usize>,
}

impl ColumnBoxStack {
    /// Record a box named `name`.
    ///
    /// Without an explicit `column` the box goes to the last used column, or
    /// column 0 for the first box.
    pub fn place(&mut self, name: &str, column: Option<usize>) -> Placement {
        let column = column.or(self.last_column).unwrap_or(0);
        let boxes = self.columns.entry(column).or_default();
        let below = boxes.last().map_or_else(|| "top".to_owned(), Clone::clone);
        boxes.push(name.to_owned());
        self.last_column = Some(column);
        Placement { column, below }
    }

    /// Box names in `column`, top to bottom.
    #[must_use]
    pub fn boxes(&self, column: usize) -> &[String] {
        self.columns.get(&column).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of boxes placed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    /// True before the first box is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
