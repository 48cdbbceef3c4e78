use serde::{Deserialize, Serialize};

const TABLEAU10: [&str; 10] = [
    "#4e79a7", "#f28e2c", "#e15759", "#76b7b2", "#59a14f", "#edc949", "#af7aa1", "#ff9da7",
    "#9c755f", "#bab0ab",
];

const PAIRED: [&str; 12] = [
    "#a6cee3", "#1f78b4", "#b2df8a", "#33a02c", "#fb9a99", "#e31a1c", "#fdbf6f", "#ff7f00",
    "#cab2d6", "#6a3d9a", "#ffff99", "#b15928",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub title_color: String,
    pub subtitle_color: String,
    pub muted_text_color: String,
    pub axis_text_color: String,
    pub axis_line_color: String,
    pub axis_label_background: String,
    pub grid_color: String,
    pub column_line_color: String,
    pub dot_stroke: String,
    pub bubble_fill: String,
    pub bubble_text_color: String,
    pub distribution_fill: String,
    pub distribution_stroke: String,
    pub palette: Vec<String>,
}

impl Theme {
    /// Dark canvas the compensation charts are designed for.
    pub fn dark() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#1a1a1a".to_string(),
            title_color: "#e0e0e0".to_string(),
            subtitle_color: "#bbbbbb".to_string(),
            muted_text_color: "#999999".to_string(),
            axis_text_color: "#cccccc".to_string(),
            axis_line_color: "#666666".to_string(),
            axis_label_background: "#1a1a1a".to_string(),
            grid_color: "#555555".to_string(),
            column_line_color: "#cccccc".to_string(),
            dot_stroke: "#1a1a1a".to_string(),
            bubble_fill: "#ffffff".to_string(),
            bubble_text_color: "#333333".to_string(),
            distribution_fill: "#4A90E2".to_string(),
            distribution_stroke: "#6BA8E5".to_string(),
            palette: default_palette(),
        }
    }

    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            title_color: "#1c2430".to_string(),
            subtitle_color: "#4a5568".to_string(),
            muted_text_color: "#718096".to_string(),
            axis_text_color: "#2d3748".to_string(),
            axis_line_color: "#a0aec0".to_string(),
            axis_label_background: "#ffffff".to_string(),
            grid_color: "#cbd5e0".to_string(),
            column_line_color: "#a0aec0".to_string(),
            dot_stroke: "#ffffff".to_string(),
            ..Self::dark()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    /// Ordinal color for `key` within a sorted `domain`; keys outside the
    /// domain are appended after it, the way an ordinal scale grows.
    pub fn color_for(&self, key: &str, domain: &[String]) -> String {
        if self.palette.is_empty() {
            return self.title_color.clone();
        }
        let idx = match domain.binary_search_by(|probe| probe.as_str().cmp(key)) {
            Ok(idx) => idx,
            Err(_) => domain.len(),
        };
        self.palette[idx % self.palette.len()].clone()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

fn default_palette() -> Vec<String> {
    TABLEAU10
        .iter()
        .chain(PAIRED.iter())
        .map(|color| color.to_string())
        .collect()
}
