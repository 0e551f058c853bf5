use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::{filtered_indices, Selection, SiteSelection};
use super::model::{LaunchDataset, Outcome};

// ---------------------------------------------------------------------------
// Chart specs – plain (label, value) sequences handed to the renderer.
// Serializable so views can be exported for any charting frontend.
// ---------------------------------------------------------------------------

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

/// Pie chart input: slices in deterministic label order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PieSpec {
    pub slices: Vec<PieSlice>,
}

impl PieSpec {
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// One bar: a categorical key and its measured value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub category: String,
    pub measure: f64,
}

/// Bar chart input: bars in deterministic category order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BarSpec {
    pub bars: Vec<BarEntry>,
}

impl BarSpec {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// One scatter point: payload on x, outcome on y, booster category as the
/// colour/grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_category: String,
}

/// Scatter chart input, in dataset order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ScatterSpec {
    pub points: Vec<ScatterPoint>,
}

impl ScatterSpec {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Group-by reduction
// ---------------------------------------------------------------------------

/// Per-group success tally: (successes, total).
#[derive(Debug, Clone, Copy, Default)]
struct OutcomeTally {
    successes: u64,
    total: u64,
}

impl OutcomeTally {
    fn add(&mut self, outcome: Outcome) {
        if outcome.is_success() {
            self.successes += 1;
        }
        self.total += 1;
    }

    fn success_rate(&self) -> f64 {
        self.successes as f64 / self.total as f64
    }
}

/// Fold records into per-key tallies. BTreeMap keeps group keys sorted, so
/// every view comes out in a deterministic order.
fn tally_by<K, I>(items: I) -> BTreeMap<K, OutcomeTally>
where
    K: Ord,
    I: Iterator<Item = (K, Outcome)>,
{
    let mut groups: BTreeMap<K, OutcomeTally> = BTreeMap::new();
    for (key, outcome) in items {
        groups.entry(key).or_default().add(outcome);
    }
    groups
}

// ---------------------------------------------------------------------------
// Site views: success pie + success-rate bar
// ---------------------------------------------------------------------------

/// Compute the two site-oriented charts for the current site selection.
///
/// * `All` – pie: successes per site; bar: success rate per site.
/// * one site – both charts group the site's launches by outcome class
///   instead (within one site the only remaining dimension is
///   success/failure): pie and bar both carry the per-class launch counts.
///
/// A site name not present in the dataset yields empty specs, not an error.
pub fn site_views(dataset: &LaunchDataset, site: &SiteSelection) -> (PieSpec, BarSpec) {
    match site {
        SiteSelection::All => {
            let groups = tally_by(
                dataset
                    .records
                    .iter()
                    .map(|rec| (rec.site.as_str(), rec.outcome)),
            );

            let slices = groups
                .iter()
                .map(|(site, tally)| PieSlice {
                    label: site.to_string(),
                    value: tally.successes as f64,
                })
                .collect();
            let bars = groups
                .iter()
                .map(|(site, tally)| BarEntry {
                    category: site.to_string(),
                    measure: tally.success_rate(),
                })
                .collect();

            (PieSpec { slices }, BarSpec { bars })
        }
        SiteSelection::Site(selected) => {
            let groups = tally_by(
                dataset
                    .records
                    .iter()
                    .filter(|rec| rec.site == *selected)
                    .map(|rec| (rec.outcome, rec.outcome)),
            );

            let slices = groups
                .iter()
                .map(|(outcome, tally)| PieSlice {
                    label: outcome.to_string(),
                    value: tally.total as f64,
                })
                .collect();
            let bars = groups
                .iter()
                .map(|(outcome, tally)| BarEntry {
                    category: outcome.to_string(),
                    measure: tally.total as f64,
                })
                .collect();

            (PieSpec { slices }, BarSpec { bars })
        }
    }
}

// ---------------------------------------------------------------------------
// Payload scatter
// ---------------------------------------------------------------------------

/// Launches passing the site and payload filters, as scatter points in
/// dataset order. An empty result is a valid empty spec.
pub fn payload_scatter(dataset: &LaunchDataset, selection: &Selection) -> ScatterSpec {
    let points = filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| {
            let rec = &dataset.records[i];
            ScatterPoint {
                payload_mass_kg: rec.payload_mass_kg,
                outcome: rec.outcome,
                booster_category: rec.booster_category.clone(),
            }
        })
        .collect();
    ScatterSpec { points }
}

// ---------------------------------------------------------------------------
// Static booster view
// ---------------------------------------------------------------------------

/// Mean outcome per booster version category over the whole dataset.
/// Independent of the selection; computed once at dataset ingest.
pub fn booster_success(dataset: &LaunchDataset) -> BarSpec {
    let groups = tally_by(
        dataset
            .records
            .iter()
            .map(|rec| (rec.booster_category.as_str(), rec.outcome)),
    );

    let bars = groups
        .iter()
        .map(|(category, tally)| BarEntry {
            category: category.to_string(),
            measure: tally.success_rate(),
        })
        .collect();
    BarSpec { bars }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::PayloadRange;
    use crate::data::model::LaunchRecord;

    fn record(site: &str, payload: f64, booster: &str, class: i64) -> LaunchRecord {
        LaunchRecord {
            site: site.to_string(),
            payload_mass_kg: payload,
            booster_category: booster.to_string(),
            outcome: Outcome::from_class(class).unwrap(),
        }
    }

    /// The worked example dataset: (CCAFS,500,v1,1), (CCAFS,1500,v1,0),
    /// (KSC,3000,v2,1).
    fn dataset() -> LaunchDataset {
        LaunchDataset::from_records(vec![
            record("CCAFS", 500.0, "v1", 1),
            record("CCAFS", 1500.0, "v1", 0),
            record("KSC", 3000.0, "v2", 1),
        ])
    }

    #[test]
    fn test_all_sites_pie_counts_successes_per_site() {
        let (pie, _) = site_views(&dataset(), &SiteSelection::All);
        assert_eq!(
            pie.slices,
            vec![
                PieSlice { label: "CCAFS".to_string(), value: 1.0 },
                PieSlice { label: "KSC".to_string(), value: 1.0 },
            ]
        );
        // Slice total equals the number of successful launches overall.
        assert_eq!(pie.total(), 2.0);
    }

    #[test]
    fn test_all_sites_bar_is_success_rate() {
        let (_, bar) = site_views(&dataset(), &SiteSelection::All);
        assert_eq!(
            bar.bars,
            vec![
                BarEntry { category: "CCAFS".to_string(), measure: 0.5 },
                BarEntry { category: "KSC".to_string(), measure: 1.0 },
            ]
        );
        for entry in &bar.bars {
            assert!((0.0..=1.0).contains(&entry.measure));
        }
    }

    #[test]
    fn test_single_site_groups_by_outcome() {
        let site = SiteSelection::Site("CCAFS".to_string());
        let (pie, bar) = site_views(&dataset(), &site);

        // One slice per outcome class, value = launch count for that class.
        assert_eq!(
            pie.slices,
            vec![
                PieSlice { label: "0".to_string(), value: 1.0 },
                PieSlice { label: "1".to_string(), value: 1.0 },
            ]
        );
        // Slice total equals the number of launches at the site.
        assert_eq!(pie.total(), 2.0);
        assert_eq!(
            bar.bars,
            vec![
                BarEntry { category: "0".to_string(), measure: 1.0 },
                BarEntry { category: "1".to_string(), measure: 1.0 },
            ]
        );
    }

    #[test]
    fn test_single_site_all_successes() {
        let (pie, bar) = site_views(&dataset(), &SiteSelection::Site("KSC".to_string()));
        assert_eq!(pie.slices, vec![PieSlice { label: "1".to_string(), value: 1.0 }]);
        assert_eq!(bar.bars.len(), 1);
    }

    #[test]
    fn test_unknown_site_yields_empty_views() {
        let site = SiteSelection::Site("VAFB".to_string());
        let (pie, bar) = site_views(&dataset(), &site);
        assert!(pie.is_empty());
        assert!(bar.is_empty());

        let sel = Selection { site, payload: None };
        assert!(payload_scatter(&dataset(), &sel).is_empty());
    }

    #[test]
    fn test_scatter_worked_example() {
        let sel = Selection {
            site: SiteSelection::Site("CCAFS".to_string()),
            payload: Some(PayloadRange { lo: 0.0, hi: 1000.0 }),
        };
        let scatter = payload_scatter(&dataset(), &sel);
        assert_eq!(
            scatter.points,
            vec![ScatterPoint {
                payload_mass_kg: 500.0,
                outcome: Outcome::Success,
                booster_category: "v1".to_string(),
            }]
        );
    }

    #[test]
    fn test_scatter_preserves_dataset_order() {
        let sel = Selection::default();
        let scatter = payload_scatter(&dataset(), &sel);
        let payloads: Vec<f64> = scatter.points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(payloads, vec![500.0, 1500.0, 3000.0]);
    }

    #[test]
    fn test_scatter_bounds_inclusive() {
        let sel = Selection {
            site: SiteSelection::All,
            payload: Some(PayloadRange { lo: 500.0, hi: 3000.0 }),
        };
        // Records at exactly lo and exactly hi are both included.
        assert_eq!(payload_scatter(&dataset(), &sel).points.len(), 3);
    }

    #[test]
    fn test_scatter_inverted_range_is_empty() {
        let sel = Selection {
            site: SiteSelection::All,
            payload: Some(PayloadRange { lo: 1000.0, hi: 500.0 }),
        };
        assert!(payload_scatter(&dataset(), &sel).is_empty());
    }

    #[test]
    fn test_scatter_idempotent() {
        let ds = dataset();
        let sel = Selection {
            site: SiteSelection::Site("CCAFS".to_string()),
            payload: Some(PayloadRange { lo: 0.0, hi: 2000.0 }),
        };
        assert_eq!(payload_scatter(&ds, &sel), payload_scatter(&ds, &sel));
    }

    #[test]
    fn test_booster_success_means() {
        let bar = booster_success(&dataset());
        assert_eq!(
            bar.bars,
            vec![
                BarEntry { category: "v1".to_string(), measure: 0.5 },
                BarEntry { category: "v2".to_string(), measure: 1.0 },
            ]
        );
    }

    #[test]
    fn test_scatter_serializes_class_as_number() {
        let sel = Selection {
            site: SiteSelection::Site("KSC".to_string()),
            payload: None,
        };
        let scatter = payload_scatter(&dataset(), &sel);
        let json = serde_json::to_string(&scatter).unwrap();
        assert_eq!(
            json,
            r#"{"points":[{"payload_mass_kg":3000.0,"outcome":1,"booster_category":"v2"}]}"#
        );
    }

    #[test]
    fn test_empty_dataset_views() {
        let ds = LaunchDataset::from_records(Vec::new());
        let (pie, bar) = site_views(&ds, &SiteSelection::All);
        assert!(pie.is_empty());
        assert!(bar.is_empty());
        assert!(booster_success(&ds).is_empty());
        assert!(payload_scatter(&ds, &Selection::default()).is_empty());
    }
}
