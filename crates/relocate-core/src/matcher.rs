//! Locating the chart's own values file inside an archive

use regex::Regex;
use std::sync::LazyLock;

/// One directory deep, named exactly `values.yaml`. Sub-chart values under
/// `chart/charts/<dep>/values.yaml` are deeper and never match.
static MAIN_VALUES_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\\/]+[\\/]values\.yaml$").expect("values file pattern is a valid regex")
});

/// Whether an archive entry path is the chart's top-level `values.yaml`
#[must_use]
pub fn is_main_values_file(path: &str) -> bool {
    MAIN_VALUES_FILE.is_match(path)
}
