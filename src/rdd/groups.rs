use crate::dataframe::DataFrame;
use crate::error::{Error, Result};

/// Named subsets of a table, in the order the names were given
///
/// Each entry owns an independent copy of its rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupDict {
    entries: Vec<(String, DataFrame)>,
}

impl GroupDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a group; a repeated name replaces the earlier table at its position
    pub fn insert(&mut self, name: impl Into<String>, table: DataFrame) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = table,
            None => self.entries.push((name, table)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, table)| table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Group names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.entries.iter().map(|(key, table)| (key.as_str(), table))
    }
}

/// Split a table into groups defined by indicator columns
///
/// `keys[i]` names the subset of rows where `columns[i] == 1`. Missing
/// indicator values never select a row.
pub fn create_groups_dict<K, C>(data: &DataFrame, keys: &[K], columns: &[C]) -> Result<GroupDict>
where
    K: AsRef<str>,
    C: AsRef<str>,
{
    if keys.len() != columns.len() {
        return Err(Error::InvalidArgument(format!(
            "{} group keys but {} indicator columns",
            keys.len(),
            columns.len()
        )));
    }

    let mut groups = GroupDict::new();
    for (key, column) in keys.iter().zip(columns) {
        let subset = data.filter_float(column.as_ref(), |v| v == 1.0)?;
        groups.insert(key.as_ref(), subset);
    }
    Ok(groups)
}
