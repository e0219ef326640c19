use std::fmt;
use std::str::FromStr;

/// Ordering applied to the filtered view. Selecting a key replaces any
/// previous ordering; keys do not combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Metacritic score, highest first.
    Rating,
    /// Steam release date, newest first.
    Recent,
    /// Title, alphabetical.
    Name,
    /// Cache order.
    #[default]
    None,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "recent" => Ok(SortKey::Recent),
            "name" => Ok(SortKey::Name),
            "" | "none" => Ok(SortKey::None),
            other => Err(format!(
                "unknown sort key '{other}' (expected rating, recent, name or none)"
            )),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Rating => "rating",
            SortKey::Recent => "recent",
            SortKey::Name => "name",
            SortKey::None => "none",
        };
        f.write_str(name)
    }
}

/// Search term plus ordering, the two inputs of a refinement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub term: String,
    pub sort: SortKey,
}

impl Query {
    pub fn new(term: impl Into<String>, sort: SortKey) -> Self {
        Self {
            term: term.into(),
            sort,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.term.trim().is_empty() || self.sort != SortKey::None
    }
}
