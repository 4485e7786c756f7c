use serde::{Deserialize, Serialize};

/// Identifier for a measured substance within a data response
/// (e.g. "no2", "hcho", "o3", "pm25").
///
/// Keys sort lexicographically so per-pollutant maps keyed by
/// `PollutantKey` traverse in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollutantKey(pub String);

impl PollutantKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PollutantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PollutantKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::PollutantKey;

    #[test]
    fn keys_sort_lexicographically() {
        let mut keys = vec![
            PollutantKey::new("pm25"),
            PollutantKey::new("hcho"),
            PollutantKey::new("no2"),
        ];
        keys.sort();
        let names: Vec<_> = keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["hcho", "no2", "pm25"]);
    }
}
