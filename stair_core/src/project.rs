//! # Design Document
//!
//! The `Project` struct is the root container for a set of stair designs.
//! Projects serialize to `.stw` (Stairwise) files as human-readable JSON.
//!
//! A project stores the current inputs of each stair. Geometry and warnings
//! are always recomputed from those inputs and never written to disk.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, designer, job info, timestamps)
//! ├── settings: GlobalSettings (theme, presentation options)
//! └── items: HashMap<Uuid, CalculationItem> (all stairs)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use stair_core::project::Project;
//!
//! let project = Project::new("Jane Designer", "26-042", "ACME Homes");
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("26-042"));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, StairInput};

/// Current schema version for .stw files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map so labels can be edited freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, designer, job info)
    pub meta: ProjectMetadata,

    /// Global settings (theme, presentation defaults)
    #[serde(default)]
    pub settings: GlobalSettings,

    /// All calculation items, keyed by UUID
    pub items: HashMap<Uuid, CalculationItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stair_core::project::Project;
    ///
    /// let project = Project::new("John Doe", "26-001", "Client Corp");
    /// assert_eq!(project.meta.designer, "John Doe");
    /// ```
    pub fn new(designer: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                designer: designer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add a calculation item to the project.
    ///
    /// Returns the UUID assigned to the item.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stair_core::project::Project;
    /// use stair_core::calculations::{CalculationItem, StairInput};
    ///
    /// let mut project = Project::new("Designer", "26-001", "Client");
    /// let id = project.add_item(CalculationItem::Stair(StairInput::new("ST-1", 2700.0)));
    /// assert!(project.items.contains_key(&id));
    /// ```
    pub fn add_item(&mut self, item: CalculationItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove a calculation item by UUID.
    ///
    /// Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<CalculationItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get a calculation item by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&CalculationItem> {
        self.items.get(id)
    }

    /// Get a mutable reference to a calculation item by UUID.
    ///
    /// Marks the project as modified when the item exists.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut CalculationItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of items in the project
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// All stairs, sorted by label for stable report order.
    pub fn stairs(&self) -> Vec<&StairInput> {
        let mut stairs: Vec<&StairInput> = self
            .items
            .values()
            .map(|item| match item {
                CalculationItem::Stair(s) => s,
            })
            .collect();
        stairs.sort_by(|a, b| a.label.cmp(&b.label));
        stairs
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible designer
    pub designer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
///
/// Passed explicitly to presentation code (CLI, PDF report); nothing reads
/// these from ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Color theme for rendered output
    pub theme: Theme,

    /// Finish options shown alongside the geometry
    pub presentation: PresentationOptions,

    /// Label of the norm profile printed on reports
    pub norm_profile: String,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            theme: Theme::default(),
            presentation: PresentationOptions::default(),
            norm_profile: "Comfort heuristics (Blondel / DIN 18065)".to_string(),
        }
    }
}

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Page background and text colors as hex strings
    pub fn colors(&self) -> (&'static str, &'static str) {
        match self {
            Theme::Light => ("#ffffff", "#1a1a1a"),
            Theme::Dark => ("#1e1f22", "#e6e6e6"),
        }
    }

    /// Accent fill for title blocks and table headers
    pub fn accent(&self) -> &'static str {
        match self {
            Theme::Light => "#f0f0f0",
            Theme::Dark => "#2b2d31",
        }
    }
}

/// Stair construction material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StairMaterial {
    #[default]
    Wood,
    Steel,
    Concrete,
    Glass,
}

impl StairMaterial {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            StairMaterial::Wood => "Wood",
            StairMaterial::Steel => "Steel",
            StairMaterial::Concrete => "Concrete",
            StairMaterial::Glass => "Glass",
        }
    }
}

/// Balustrade infill style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalustradeStyle {
    None,
    #[default]
    Vertical,
    Horizontal,
    Glass,
}

impl BalustradeStyle {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            BalustradeStyle::None => "None",
            BalustradeStyle::Vertical => "Vertical balusters",
            BalustradeStyle::Horizontal => "Horizontal rails",
            BalustradeStyle::Glass => "Glass panels",
        }
    }
}

/// Finish options consumed by renderers and reports.
///
/// These never feed back into the geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationOptions {
    /// Construction material
    pub material: StairMaterial,

    /// Balustrade infill
    pub balustrade: BalustradeStyle,

    /// Clear spacing between balusters (mm)
    pub baluster_spacing_mm: f64,

    /// Handrail height above tread nosing (mm)
    pub handrail_height_mm: f64,
}

impl Default for PresentationOptions {
    fn default() -> Self {
        PresentationOptions {
            material: StairMaterial::Wood,
            balustrade: BalustradeStyle::Vertical,
            baluster_spacing_mm: 110.0,
            handrail_height_mm: 900.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "26-001", "Acme Corp");
        assert_eq!(project.meta.designer, "John Doe");
        assert_eq!(project.meta.job_id, "26-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.settings.theme, Theme::Light);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Designer", "26-042", "Test Client");
        project.settings.theme = Theme::Dark;
        project.add_item(CalculationItem::Stair(StairInput::new("ST-1", 2700.0)));

        let json = serde_json::to_string_pretty(&project).unwrap();
        assert!(json.contains("Jane Designer"));
        assert!(json.contains("\"theme\": \"dark\""));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.designer, "Jane Designer");
        assert_eq!(roundtrip.settings.theme, Theme::Dark);
        assert_eq!(roundtrip.item_count(), 1);
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = Project::new("Designer", "26-001", "Client");

        let id = project.add_item(CalculationItem::Stair(StairInput::new("ST-1", 2700.0)));
        assert_eq!(project.item_count(), 1);
        assert!(project.get_item(&id).is_some());

        if let Some(CalculationItem::Stair(stair)) = project.get_item_mut(&id) {
            stair.total_rise_mm = 3000.0;
        }
        assert_eq!(project.stairs()[0].total_rise_mm, 3000.0);

        let removed = project.remove_item(&id);
        assert!(removed.is_some());
        assert_eq!(project.item_count(), 0);
        assert!(project.remove_item(&id).is_none());
    }

    #[test]
    fn test_stairs_sorted_by_label() {
        let mut project = Project::default();
        project.add_item(CalculationItem::Stair(StairInput::new("ST-2", 3000.0)));
        project.add_item(CalculationItem::Stair(StairInput::new("ST-1", 2700.0)));

        let labels: Vec<_> = project.stairs().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["ST-1", "ST-2"]);
    }

    #[test]
    fn test_settings_missing_fields_use_defaults() {
        let settings: GlobalSettings =
            serde_json::from_str(r#"{ "presentation": { "material": "steel" } }"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.presentation.material, StairMaterial::Steel);
        assert_eq!(settings.presentation.handrail_height_mm, 900.0);
    }
}
