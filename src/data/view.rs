use super::model::{ShowRecord, Value};

// ---------------------------------------------------------------------------
// View – a derived, read-only table
// ---------------------------------------------------------------------------

/// Column-named table produced by the aggregation layer and consumed by the
/// chart builders, which address columns by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl View {
    pub fn new(columns: &[&str]) -> Self {
        View {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Project records onto the named fields.  Unknown fields become `Null`.
    pub fn from_records<'a, I>(records: I, fields: &[&str]) -> Self
    where
        I: IntoIterator<Item = &'a ShowRecord>,
    {
        let mut view = View::new(fields);
        view.rows = records
            .into_iter()
            .map(|rec| {
                fields
                    .iter()
                    .map(|f| rec.get(f).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        view
    }

    pub fn push(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column, `None` if the column does not exist.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// First `n` rows, like `DataFrame.head(n)`.
    pub fn head(&self, n: usize) -> View {
        View {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}
