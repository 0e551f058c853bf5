use crate::color::ColorMap;
use crate::data::filter::{PayloadRange, Selection, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::data::views::{booster_success, payload_scatter, site_views, BarSpec, PieSpec, ScatterSpec};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<LaunchDataset>,

    /// Current site + payload selection.
    pub selection: Selection,

    /// Slider positions for the payload filter, kept even while the
    /// filter is switched off.
    pub payload_slider: (f64, f64),

    /// Whether the payload range filter is active.
    pub payload_filter_on: bool,

    /// Latest outputs of the view computers (refreshed on every
    /// selection change).
    pub site_pie: PieSpec,
    pub site_bar: BarSpec,
    pub scatter: ScatterSpec,

    /// Booster category → mean outcome, computed once per dataset.
    pub booster_bar: BarSpec,

    /// Colour per booster category for the scatter chart.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: Selection::default(),
            payload_slider: (0.0, 0.0),
            payload_filter_on: false,
            site_pie: PieSpec::default(),
            site_bar: BarSpec::default(),
            scatter: ScatterSpec::default(),
            booster_bar: BarSpec::default(),
            color_map: None,
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset: reset the selection, compute the
    /// static booster view, build the colour map, refresh everything else.
    pub fn set_dataset(&mut self, dataset: LaunchDataset) {
        self.selection = Selection::default();
        self.payload_slider = (dataset.payload_min, dataset.payload_max);
        self.payload_filter_on = false;
        self.booster_bar = booster_success(&dataset);
        self.color_map = Some(ColorMap::new(&dataset.booster_categories));

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
        self.recompute_views();
    }

    /// Re-run the view computers against the current selection snapshot.
    pub fn recompute_views(&mut self) {
        match &self.dataset {
            Some(ds) => {
                let (pie, bar) = site_views(ds, &self.selection.site);
                self.site_pie = pie;
                self.site_bar = bar;
                self.scatter = payload_scatter(ds, &self.selection);
            }
            None => {
                self.site_pie = PieSpec::default();
                self.site_bar = BarSpec::default();
                self.scatter = ScatterSpec::default();
            }
        }
    }

    /// Change the site selection and refresh the views.
    pub fn set_site(&mut self, site: SiteSelection) {
        if self.selection.site != site {
            self.selection.site = site;
            self.recompute_views();
        }
    }

    /// Push the slider / checkbox state into the selection and refresh.
    pub fn apply_payload_filter(&mut self) {
        let payload = self.payload_filter_on.then(|| PayloadRange {
            lo: self.payload_slider.0,
            hi: self.payload_slider.1,
        });
        if self.selection.payload != payload {
            self.selection.payload = payload;
            self.recompute_views();
        }
    }
}
