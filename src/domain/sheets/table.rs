use std::collections::{HashMap, HashSet};

/// Anything that can be flattened into named display cells.
pub trait SheetRecord {
    /// `(column name, display value)` pairs, in the record's own order.
    fn cells(&self) -> Vec<(String, String)>;
}

impl SheetRecord for Vec<(String, String)> {
    fn cells(&self) -> Vec<(String, String)> {
        self.clone()
    }
}

/// A header row plus data rows, every cell already converted to its display string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    missing_columns: Vec<String>,
}

impl Table {
    /// Builds the table with `canonical` columns first (only those present in some record),
    /// followed by any other column in the order it was first encountered.
    pub fn from_records<R: SheetRecord>(records: &[R], canonical: &[&str]) -> Self {
        let records_cells = records.iter().map(SheetRecord::cells).collect::<Vec<_>>();

        let mut encountered = Vec::new();
        let mut seen = HashSet::new();
        for (name, _) in records_cells.iter().flatten() {
            if seen.insert(name.as_str()) {
                encountered.push(name.as_str());
            }
        }

        let (present, missing): (Vec<&str>, Vec<&str>) =
            canonical.iter().partition(|name| seen.contains(*name));

        let header = present
            .into_iter()
            .chain(
                encountered
                    .into_iter()
                    .filter(|name| !canonical.contains(name)),
            )
            .map(str::to_owned)
            .collect::<Vec<_>>();

        let rows = records_cells
            .iter()
            .map(|cells| {
                let by_name = cells
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect::<HashMap<_, _>>();
                header
                    .iter()
                    .map(|name| by_name.get(name.as_str()).copied().unwrap_or("").to_owned())
                    .collect()
            })
            .collect();

        Table {
            header,
            rows,
            missing_columns: if records.is_empty() {
                Vec::new()
            } else {
                missing.into_iter().map(str::to_owned).collect()
            },
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<String>] {
        &mut self.rows
    }

    /// Canonical columns that no record carried.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|header| header == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Header row followed by the data rows.
    pub fn into_values(self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.header);
        values.extend(self.rows);
        values
    }
}
