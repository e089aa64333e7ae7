use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Placement, PlacementError, ScoreGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub grid_x: usize,
    pub grid_y: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    pub reason: String,
}

impl From<&Placement> for WidgetSuggestion {
    fn from(p: &Placement) -> Self {
        Self {
            kind: p.spec.kind.clone(),
            grid_x: p.x,
            grid_y: p.y,
            grid_width: p.spec.width,
            grid_height: p.spec.height,
            reason: format!("score: {:.1}", p.score),
        }
    }
}

/// Entry in the widget state file, as the desktop shell expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub grid_x: usize,
    pub grid_y: usize,
    pub grid_width: usize,
    pub grid_height: usize,
    pub title: String,
}

/// The placement report written after analysing a wallpaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestions {
    pub image: String,
    pub grid: GridSize,
    pub widgets: Vec<WidgetSuggestion>,
}

impl Suggestions {
    pub fn new(image: &Path, grid: &ScoreGrid, placements: &[Placement]) -> Self {
        Self {
            image: image.display().to_string(),
            grid: GridSize {
                cols: grid.cols(),
                rows: grid.rows(),
            },
            widgets: placements.iter().map(WidgetSuggestion::from).collect(),
        }
    }

    /// Writes the report as indented JSON, creating parent directories.
    pub fn write(&self, path: &Path) -> Result<(), PlacementError> {
        create_parent(path)?;
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Normalized widget list: ids `w1`, `w2`, ... and capitalized titles.
    pub fn widget_entries(&self) -> Vec<WidgetEntry> {
        self.widgets
            .iter()
            .enumerate()
            .map(|(i, w)| WidgetEntry {
                id: format!("w{}", i + 1),
                kind: w.kind.clone(),
                grid_x: w.grid_x,
                grid_y: w.grid_y,
                grid_width: w.grid_width,
                grid_height: w.grid_height,
                title: capitalize(&w.kind),
            })
            .collect()
    }

    /// Replaces the widget state file with these placements.
    pub fn apply(&self, widgets_file: &Path) -> Result<(), PlacementError> {
        create_parent(widgets_file)?;
        fs::write(widgets_file, serde_json::to_string(&self.widget_entries())?)?;
        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<(), PlacementError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
