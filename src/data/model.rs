use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Outcome – success/failure indicator behind the 0/1 `class` column
// ---------------------------------------------------------------------------

/// Binary launch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Parse from the dataset's integer `class` column (0 or 1).
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(Outcome::Failure),
            1 => Some(Outcome::Success),
            _ => None,
        }
    }

    /// 1.0 for success, 0.0 for failure – the value summed and averaged
    /// by the aggregation views.
    pub fn as_f64(self) -> f64 {
        match self {
            Outcome::Failure => 0.0,
            Outcome::Success => 1.0,
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Failure => write!(f, "0"),
            Outcome::Success => write!(f, "1"),
        }
    }
}

/// Serializes as the source 0/1 class value.
impl serde::Serialize for Outcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(*self as u8)
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single observed launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    /// Launch-site name.
    pub site: String,
    /// Payload mass in kilograms, non-negative.
    pub payload_mass_kg: f64,
    /// Booster version category label.
    pub booster_category: String,
    /// Success/failure outcome.
    pub outcome: Outcome,
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
/// Immutable after construction; the views only ever read it.
#[derive(Debug, Clone)]
pub struct LaunchDataset {
    /// All launches (rows), in source order.
    pub records: Vec<LaunchRecord>,
    /// Sorted distinct launch-site names.
    pub sites: Vec<String>,
    /// Sorted distinct booster version categories.
    pub booster_categories: Vec<String>,
    /// Smallest payload mass in the dataset (0.0 when empty).
    pub payload_min: f64,
    /// Largest payload mass in the dataset (0.0 when empty).
    pub payload_max: f64,
}

impl LaunchDataset {
    /// Build the distinct-value indices and payload span from the rows.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        let mut sites: BTreeSet<&str> = BTreeSet::new();
        let mut categories: BTreeSet<&str> = BTreeSet::new();
        let mut payload_min = f64::INFINITY;
        let mut payload_max = f64::NEG_INFINITY;

        for rec in &records {
            sites.insert(&rec.site);
            categories.insert(&rec.booster_category);
            payload_min = payload_min.min(rec.payload_mass_kg);
            payload_max = payload_max.max(rec.payload_mass_kg);
        }
        if records.is_empty() {
            payload_min = 0.0;
            payload_max = 0.0;
        }

        let sites = sites.into_iter().map(str::to_string).collect();
        let booster_categories = categories.into_iter().map(str::to_string).collect();

        LaunchDataset {
            records,
            sites,
            booster_categories,
            payload_min,
            payload_max,
        }
    }

    /// Whether the given name is a known launch site.
    pub fn has_site(&self, site: &str) -> bool {
        self.sites.iter().any(|s| s == site)
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(site: &str, payload: f64, booster: &str, class: i64) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: payload,
            booster_category: booster.to_string(),
            outcome: Outcome::from_class(class).unwrap(),
        }
    }

    #[test]
    fn test_outcome_from_class() {
        assert_eq!(Outcome::from_class(0), Some(Outcome::Failure));
        assert_eq!(Outcome::from_class(1), Some(Outcome::Success));
        assert_eq!(Outcome::from_class(2), None);
        assert_eq!(Outcome::from_class(-1), None);
    }

    #[test]
    fn test_outcome_display_matches_class_labels() {
        assert_eq!(Outcome::Success.to_string(), "1");
        assert_eq!(Outcome::Failure.to_string(), "0");
        assert_eq!(Outcome::Success.as_f64(), 1.0);
        assert_eq!(Outcome::Failure.as_f64(), 0.0);
    }

    #[test]
    fn test_from_records_indices() {
        let ds = LaunchDataset::from_records(vec![
            record("KSC LC-39A", 3000.0, "FT", 1),
            record("CCAFS LC-40", 500.0, "v1.0", 0),
            record("CCAFS LC-40", 1500.0, "v1.1", 1),
        ]);

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.sites, vec!["CCAFS LC-40", "KSC LC-39A"]);
        assert_eq!(ds.booster_categories, vec!["FT", "v1.0", "v1.1"]);
        assert_eq!(ds.payload_min, 500.0);
        assert_eq!(ds.payload_max, 3000.0);
        assert!(ds.has_site("KSC LC-39A"));
        assert!(!ds.has_site("VAFB SLC-4E"));
    }

    #[test]
    fn test_empty_dataset() {
        let ds = LaunchDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert_eq!(ds.payload_min, 0.0);
        assert_eq!(ds.payload_max, 0.0);
        assert!(ds.sites.is_empty());
    }
}
