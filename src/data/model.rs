use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Value – a single cell in a view
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, used by views and chart construction.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` for numeric axes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<Option<&str>> for Value {
    fn from(s: Option<&str>) -> Self {
        s.map(Value::from).unwrap_or(Value::Null)
    }
}

// ---------------------------------------------------------------------------
// ShowRecord – one row of the flattened show table
// ---------------------------------------------------------------------------

/// Column names every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "show_id",
    "name",
    "genre_name",
    "status_name",
    "network_name",
    "spoken_language_name",
    "number_of_seasons",
    "vote_average",
    "vote_count",
    "popularity",
];

/// Language value excluded from the language control's choices.
pub const NO_LANGUAGE: &str = "No Language";

/// One show × genre × network × language combination.
///
/// The source table is denormalised: a show with two genres appears twice,
/// differing only in `genre_name`. Use `show_id` to count shows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShowRecord {
    pub show_id: i64,
    pub name: String,
    pub genre_name: String,
    pub status_name: String,
    pub network_name: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub spoken_language_name: Option<String>,
    pub number_of_seasons: u32,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl ShowRecord {
    /// Unrated rows carry the zero sentinel in either rating column.
    pub fn is_rated(&self) -> bool {
        self.vote_average != 0.0 && self.vote_count != 0
    }

    /// Look up a column by name.
    pub fn get(&self, field: &str) -> Option<Value> {
        let value = match field {
            "show_id" => Value::Integer(self.show_id),
            "name" => Value::from(self.name.as_str()),
            "genre_name" => Value::from(self.genre_name.as_str()),
            "status_name" => Value::from(self.status_name.as_str()),
            "network_name" => Value::from(self.network_name.as_str()),
            "spoken_language_name" => Value::from(self.spoken_language_name.as_deref()),
            "number_of_seasons" => Value::Integer(i64::from(self.number_of_seasons)),
            "vote_average" => Value::Float(self.vote_average),
            "vote_count" => Value::Integer(self.vote_count as i64),
            "popularity" => Value::Float(self.popularity),
            _ => return None,
        };
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// ShowTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Distinct values of each filterable column, used to populate the controls.
#[derive(Debug, Clone, Default)]
pub struct Domains {
    pub genres: BTreeSet<String>,
    pub statuses: BTreeSet<String>,
    pub networks: BTreeSet<String>,
    /// Excludes [`NO_LANGUAGE`] and missing values.
    pub languages: BTreeSet<String>,
    pub seasons: BTreeSet<u32>,
    /// `(min, max)` of `vote_average`, `None` for an empty table.
    pub rating_range: Option<(f64, f64)>,
}

/// The full parsed table with pre-computed value domains.
#[derive(Debug, Clone)]
pub struct ShowTable {
    pub rows: Vec<ShowRecord>,
    pub domains: Domains,
}

impl ShowTable {
    /// Build the value domains from the loaded rows.
    pub fn from_rows(rows: Vec<ShowRecord>) -> Self {
        let mut domains = Domains::default();

        for row in &rows {
            domains.genres.insert(row.genre_name.clone());
            domains.statuses.insert(row.status_name.clone());
            domains.networks.insert(row.network_name.clone());
            if let Some(lang) = &row.spoken_language_name {
                if lang != NO_LANGUAGE {
                    domains.languages.insert(lang.clone());
                }
            }
            domains.seasons.insert(row.number_of_seasons);
            domains.rating_range = Some(match domains.rating_range {
                Some((lo, hi)) => (lo.min(row.vote_average), hi.max(row.vote_average)),
                None => (row.vote_average, row.vote_average),
            });
        }

        ShowTable { rows, domains }
    }

    /// Number of rows (not shows).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of distinct `show_id`s.
    pub fn show_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.show_id)
            .collect::<BTreeSet<_>>()
            .len()
    }
}
