use super::model::LaunchDataset;

// ---------------------------------------------------------------------------
// Selection state: which site and payload range the user has picked
// ---------------------------------------------------------------------------

/// Site choice from the dropdown: every site, or one specific site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteSelection {
    All,
    Site(String),
}

impl SiteSelection {
    /// Whether a record at the given site passes this selection.
    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(s) => s == site,
        }
    }
}

/// Closed payload-mass interval `[lo, hi]`, inclusive at both ends.
/// `lo > hi` is tolerated and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PayloadRange {
    pub lo: f64,
    pub hi: f64,
}

impl PayloadRange {
    pub fn contains(&self, payload_kg: f64) -> bool {
        payload_kg >= self.lo && payload_kg <= self.hi
    }
}

/// The full user selection, passed by reference into every view computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub site: SiteSelection,
    /// `None` means "no filtering by payload".
    pub payload: Option<PayloadRange>,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            site: SiteSelection::All,
            payload: None,
        }
    }
}

/// Return indices of launches that pass the site and payload filters.
///
/// A record passes when:
/// * the site selection is `All`, or its site equals the selected one
/// * no payload range is set, or its payload lies inside the closed interval
///
/// Output preserves dataset order.
pub fn filtered_indices(dataset: &LaunchDataset, selection: &Selection) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| {
            if !selection.site.matches(&rec.site) {
                return false;
            }
            match &selection.payload {
                Some(range) => range.contains(rec.payload_mass_kg),
                None => true,
            }
        })
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{LaunchRecord, Outcome};

    fn dataset() -> LaunchDataset {
        let rows = [
            ("CCAFS", 500.0, "v1.0", 1),
            ("CCAFS", 1500.0, "v1.0", 0),
            ("KSC", 3000.0, "FT", 1),
        ];
        LaunchDataset::from_records(
            rows.iter()
                .map(|&(site, payload, booster, class)| LaunchRecord {
                    site: site.to_string(),
                    payload_mass_kg: payload,
                    booster_category: booster.to_string(),
                    outcome: Outcome::from_class(class).unwrap(),
                })
                .collect(),
        )
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let ds = dataset();
        assert_eq!(filtered_indices(&ds, &Selection::default()), vec![0, 1, 2]);
    }

    #[test]
    fn test_site_filter() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::Site("CCAFS".to_string()),
            payload: None,
        };
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1]);
    }

    #[test]
    fn test_payload_range_inclusive_bounds() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::All,
            payload: Some(PayloadRange { lo: 500.0, hi: 1500.0 }),
        };
        // Records sitting exactly on lo and hi must both survive.
        assert_eq!(filtered_indices(&ds, &sel), vec![0, 1]);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::All,
            payload: Some(PayloadRange { lo: 2000.0, hi: 100.0 }),
        };
        assert!(filtered_indices(&ds, &sel).is_empty());
    }

    #[test]
    fn test_unknown_site_matches_nothing() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::Site("VAFB".to_string()),
            payload: None,
        };
        assert!(filtered_indices(&ds, &sel).is_empty());
    }
}
