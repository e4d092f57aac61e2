//! Plain-text tables for listings and reports.

/// A table of text cells rendered with aligned columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// A table with the given column headers.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Missing cells render empty.
    pub fn row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render header, separator and rows. Cells are separated by two spaces;
    /// trailing padding is trimmed.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                if i < widths.len() && len > widths[i] {
                    widths[i] = len;
                }
            }
        }

        let mut out = String::new();
        let mut line = |cells: &mut dyn Iterator<Item = String>| {
            let text = cells
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:width$}"))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(text.trim_end());
            out.push('\n');
        };

        line(&mut self.columns.iter().cloned());
        line(&mut widths.iter().map(|w| "-".repeat(*w)));
        for row in &self.rows {
            line(
                &mut (0..widths.len()).map(|i| row.get(i).cloned().unwrap_or_default()),
            );
        }
        out.pop();
        out
    }
}
