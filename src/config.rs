use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geometry and typography of the slope chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlopeChartConfig {
    pub left_margin: f32,
    pub right_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// Share of the canvas width the chart spans.
    pub width_ratio: f32,
    pub dot_radius: f32,
    pub line_width: f32,
    pub line_opacity: f32,
    pub highlight_line_width: f32,
    pub highlight_line_opacity: f32,
    pub dimmed_line_opacity: f32,
    pub dimmed_item_opacity: f32,
    pub connector_opacity: f32,
    pub active_connector_opacity: f32,
    pub dimmed_connector_opacity: f32,
    pub bubble_height: f32,
    pub bubble_padding: f32,
    pub bubble_font_size: f32,
    pub bubble_corner_radius: f32,
    pub bubble_connector_gap: f32,
    pub bubble_min_spacing: f32,
    pub axis_ticks: usize,
    pub axis_font_size: f32,
    pub title_font_size: f32,
    pub chart_main_title: String,
    pub chart_main_title_font_size: f32,
    pub chart_subtitle_font_size: f32,
    pub chart_title_spacing: f32,
    pub instructional_text_font_size: f32,
    pub instructional_text_line_spacing: f32,
    pub instructions_company: [String; 2],
    pub instructions_role: [String; 2],
    pub distribution_samples: usize,
    pub distribution_bandwidth_divisor: f32,
    pub distribution_width: f32,
    /// Skip font lookup and use built-in glyph width estimates.
    pub fast_text_metrics: bool,
}

impl Default for SlopeChartConfig {
    fn default() -> Self {
        Self {
            left_margin: 300.0,
            right_margin: 300.0,
            top_margin: 80.0,
            bottom_margin: 120.0,
            width_ratio: 0.91,
            dot_radius: 6.0,
            line_width: 1.5,
            line_opacity: 0.5,
            highlight_line_width: 2.5,
            highlight_line_opacity: 0.8,
            dimmed_line_opacity: 0.05,
            dimmed_item_opacity: 0.2,
            connector_opacity: 0.4,
            active_connector_opacity: 0.6,
            dimmed_connector_opacity: 0.1,
            bubble_height: 18.0,
            bubble_padding: 7.0,
            bubble_font_size: 12.0,
            bubble_corner_radius: 8.0,
            bubble_connector_gap: 20.0,
            bubble_min_spacing: 5.0,
            axis_ticks: 10,
            axis_font_size: 11.0,
            title_font_size: 16.0,
            chart_main_title: "Pay progression slope chart".to_string(),
            chart_main_title_font_size: 26.0,
            chart_subtitle_font_size: 18.0,
            chart_title_spacing: 27.0,
            instructional_text_font_size: 15.0,
            instructional_text_line_spacing: 23.0,
            instructions_company: [
                "Click a role to see ranks".to_string(),
                "Double-click a role to see breakdown by company".to_string(),
            ],
            instructions_role: [
                "Click a company to see ranks".to_string(),
                "Double-click a company to see breakdown by role".to_string(),
            ],
            distribution_samples: 150,
            distribution_bandwidth_divisor: 15.0,
            distribution_width: 300.0,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600.0,
            height: 900.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub chart: SlopeChartConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    background: Option<String>,
    title_color: Option<String>,
    bubble_fill: Option<String>,
    bubble_text_color: Option<String>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    chart: Option<SlopeChartConfig>,
    width: Option<f32>,
    height: Option<f32>,
}

/// Loads a JSON config file on top of the defaults. Files that are not
/// strict JSON (comments, trailing commas) are retried as JSON5.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    log::info!("loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = match serde_json::from_str(contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(contents).map_err(|json5_err| {
            anyhow::anyhow!("invalid config: {json_err} (as JSON5: {json5_err})")
        })?,
    };
    let mut config = Config::default();

    if let Some(name) = parsed.theme.as_deref() {
        config.theme =
            Theme::by_name(name).ok_or_else(|| anyhow::anyhow!("unknown theme \"{name}\""))?;
    }
    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.title_color {
            config.theme.title_color = v;
        }
        if let Some(v) = vars.bubble_fill {
            config.theme.bubble_fill = v;
        }
        if let Some(v) = vars.bubble_text_color {
            config.theme.bubble_text_color = v;
        }
        if let Some(v) = vars.palette.filter(|palette| !palette.is_empty()) {
            config.theme.palette = v;
        }
    }
    if let Some(chart) = parsed.chart {
        config.chart = chart;
    }
    if let Some(width) = parsed.width {
        config.render.width = width;
    }
    if let Some(height) = parsed.height {
        config.render.height = height;
    }
    Ok(config)
}
