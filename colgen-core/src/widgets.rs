use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::search::find_best_position;
use crate::{Region, ScoreGrid};

/// Built-in widget footprint, in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultWidget {
    pub kind: &'static str,
    pub width: usize,
    pub height: usize,
}

/// Widgets placed even when no prior state mentions them, in priority order.
pub const DEFAULT_WIDGETS: &[DefaultWidget] = &[
    DefaultWidget {
        kind: "clock",
        width: 6,
        height: 3,
    },
    DefaultWidget {
        kind: "weather",
        width: 5,
        height: 4,
    },
];

/// Size for widget types that are neither in prior state nor the default table.
pub const FALLBACK_SIZE: (usize, usize) = (4, 3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSpec {
    pub kind: String,
    pub width: usize,
    pub height: usize,
}

/// A widget as recorded in the widget state file. Only the type and the
/// footprint matter here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorWidget {
    pub kind: String,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

impl PriorWidget {
    fn from_value(value: &Value) -> Option<Self> {
        let kind = value.get("type")?.as_str()?.to_string();
        let dim = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| usize::try_from(v).ok())
        };
        Some(Self {
            kind,
            width: dim("gridWidth"),
            height: dim("gridHeight"),
        })
    }
}

/// Where previously saved widget sizes come from.
pub trait WidgetStateSource {
    /// Returns the saved widgets. Missing or unreadable state is empty.
    fn load(&self) -> Vec<PriorWidget>;
}

impl WidgetStateSource for Vec<PriorWidget> {
    fn load(&self) -> Vec<PriorWidget> {
        self.clone()
    }
}

/// Widget state kept as a JSON array on disk (the desktop shell owns the file).
#[derive(Debug, Clone)]
pub struct JsonWidgetState {
    path: PathBuf,
}

impl JsonWidgetState {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<PriorWidget>> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&content).context("Failed to parse widget state")?;
        let entries = value.as_array().context("Widget state is not an array")?;
        Ok(entries.iter().filter_map(PriorWidget::from_value).collect())
    }
}

impl WidgetStateSource for JsonWidgetState {
    fn load(&self) -> Vec<PriorWidget> {
        if !self.path.exists() {
            return Vec::new();
        }
        match self.read() {
            Ok(widgets) => widgets,
            Err(e) => {
                log::debug!("ignoring widget state: {e:#}");
                Vec::new()
            }
        }
    }
}

/// Decides which widgets to place and how big they are.
///
/// Saved widget types keep their saved sizes and go first; default types that
/// were never saved are appended so new widgets still get a spot.
pub fn resolve_widget_specs(prior: &[PriorWidget], defaults: &[DefaultWidget]) -> Vec<WidgetSpec> {
    // Later duplicates override earlier ones but keep the first position.
    let mut by_kind: Vec<&PriorWidget> = Vec::new();
    for widget in prior {
        match by_kind.iter_mut().find(|w| w.kind == widget.kind) {
            Some(slot) => *slot = widget,
            None => by_kind.push(widget),
        }
    }

    let default_size = |kind: &str| {
        defaults
            .iter()
            .find(|d| d.kind == kind)
            .map_or(FALLBACK_SIZE, |d| (d.width, d.height))
    };

    let mut specs: Vec<WidgetSpec> = by_kind
        .into_iter()
        .map(|w| {
            let (dw, dh) = default_size(&w.kind);
            WidgetSpec {
                kind: w.kind.clone(),
                width: w.width.unwrap_or(dw),
                height: w.height.unwrap_or(dh),
            }
        })
        .collect();

    for d in defaults {
        if !specs.iter().any(|s| s.kind == d.kind) {
            specs.push(WidgetSpec {
                kind: d.kind.to_string(),
                width: d.width,
                height: d.height,
            });
        }
    }
    specs
}

/// A widget with the spot chosen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub spec: WidgetSpec,
    pub x: usize,
    pub y: usize,
    /// Mean score of the covered cells.
    pub score: f64,
}

impl Placement {
    pub fn region(&self) -> Region {
        Region::new(self.x, self.y, self.spec.width, self.spec.height)
    }
}

/// Places widgets one at a time, in order, each avoiding the ones before it.
///
/// This is greedy: an early widget may take the spot a later one needed.
/// Widgets that do not fit anywhere are skipped.
pub fn place_widgets(grid: &ScoreGrid, specs: &[WidgetSpec]) -> Vec<Placement> {
    let mut placements = Vec::with_capacity(specs.len());
    let mut exclude: Vec<Region> = Vec::with_capacity(specs.len());

    for spec in specs {
        match find_best_position(grid, spec.width, spec.height, &exclude) {
            Some((region, score)) => {
                log::debug!(
                    "placed {} at ({},{}) {}x{}, score {:.1}",
                    spec.kind,
                    region.x,
                    region.y,
                    region.width,
                    region.height,
                    score
                );
                exclude.push(region);
                placements.push(Placement {
                    spec: spec.clone(),
                    x: region.x,
                    y: region.y,
                    score,
                });
            }
            None => log::warn!("Could not place {} widget", spec.kind),
        }
    }
    placements
}

/// Resolves widget sizes from `state` and the default table, then places them.
pub fn suggest_widgets(grid: &ScoreGrid, state: &dyn WidgetStateSource) -> Vec<Placement> {
    let specs = resolve_widget_specs(&state.load(), DEFAULT_WIDGETS);
    place_widgets(grid, &specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prior(kind: &str, width: Option<usize>, height: Option<usize>) -> PriorWidget {
        PriorWidget {
            kind: kind.to_string(),
            width,
            height,
        }
    }

    fn spec(kind: &str, width: usize, height: usize) -> WidgetSpec {
        WidgetSpec {
            kind: kind.to_string(),
            width,
            height,
        }
    }

    #[test]
    fn defaults_without_prior_state() {
        let specs = resolve_widget_specs(&[], DEFAULT_WIDGETS);
        assert_eq!(specs, vec![spec("clock", 6, 3), spec("weather", 5, 4)]);
    }

    #[test]
    fn prior_sizes_win_and_come_first() {
        let specs = resolve_widget_specs(
            &[prior("weather", Some(3), Some(2)), prior("notes", None, Some(5))],
            DEFAULT_WIDGETS,
        );
        assert_eq!(
            specs,
            vec![spec("weather", 3, 2), spec("notes", 4, 5), spec("clock", 6, 3)]
        );
    }

    #[test]
    fn missing_dimension_falls_back_to_default_entry() {
        let specs = resolve_widget_specs(&[prior("clock", Some(8), None)], DEFAULT_WIDGETS);
        assert_eq!(specs[0], spec("clock", 8, 3));
    }

    #[test]
    fn duplicate_prior_entries_keep_first_slot_last_size() {
        let specs = resolve_widget_specs(
            &[
                prior("clock", Some(2), Some(2)),
                prior("weather", Some(1), Some(1)),
                prior("clock", Some(3), Some(1)),
            ],
            DEFAULT_WIDGETS,
        );
        assert_eq!(specs, vec![spec("clock", 3, 1), spec("weather", 1, 1)]);
    }

    #[test]
    fn later_widgets_avoid_earlier_ones() {
        let grid = ScoreGrid::from_rows(vec![vec![1.0, 1.0, 9.0, 9.0], vec![1.0, 1.0, 9.0, 9.0]]).unwrap();
        let placements = place_widgets(&grid, &[spec("a", 2, 2), spec("b", 2, 2)]);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].region(), Region::new(0, 0, 2, 2));
        assert_eq!(placements[1].region(), Region::new(2, 0, 2, 2));
        assert_eq!(placements[1].score, 9.0);
    }

    #[test]
    fn unplaceable_widgets_are_skipped() {
        let grid = ScoreGrid::new(4, 2, vec![0.0; 8]).unwrap();
        let placements = place_widgets(
            &grid,
            &[spec("big", 5, 5), spec("a", 4, 1), spec("b", 4, 2), spec("c", 4, 1)],
        );
        let kinds: Vec<&str> = placements.iter().map(|p| p.spec.kind.as_str()).collect();
        assert_eq!(kinds, vec!["a", "c"]);
    }

    #[test]
    fn suggest_widgets_reads_injected_state() {
        let grid = ScoreGrid::new(16, 9, vec![0.0; 16 * 9]).unwrap();
        let state = vec![prior("weather", Some(2), Some(2))];
        let placements = suggest_widgets(&grid, &state);
        assert_eq!(placements.len(), 2);
        assert_eq!(placements[0].spec, spec("weather", 2, 2));
        assert_eq!(placements[0].region(), Region::new(0, 0, 2, 2));
        assert_eq!(placements[1].region(), Region::new(2, 0, 6, 3));
    }

    #[test]
    fn prior_widget_parsing_is_lenient() {
        let value: Value = serde_json::json!({"type": "clock", "gridWidth": 7, "gridHeight": "x"});
        assert_eq!(PriorWidget::from_value(&value), Some(prior("clock", Some(7), None)));
        assert_eq!(PriorWidget::from_value(&serde_json::json!({"gridWidth": 1})), None);
    }
}
