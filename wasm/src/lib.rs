use payslope::layout::label_placement::{Label, resolve_group_positions, validate_labels};
use payslope::{ChartOptions, Config, config::parse_config, render_chart_svg};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SlopeRenderOptions {
    #[serde(flatten)]
    chart: ChartOptions,
    companies_csv: Option<String>,
    /// Same document the CLI reads with `--configFile`.
    config: Option<String>,
    fast_text: Option<bool>,
}

fn build_config(options: &SlopeRenderOptions) -> Result<Config, String> {
    let mut config = match options.config.as_deref() {
        Some(raw) => parse_config(raw).map_err(|error| error.to_string())?,
        None => Config::default(),
    };
    // No system fonts in the browser.
    config.chart.fast_text_metrics = options.fast_text.unwrap_or(true);
    Ok(config)
}

fn resolve_labels_json(labels_json: &str, min_spacing: f32, selected: Option<&str>) -> Result<String, String> {
    let labels: Vec<Label> = serde_json::from_str(labels_json).map_err(|error| error.to_string())?;
    validate_labels(&labels, min_spacing).map_err(|error| error.to_string())?;
    let resolved = resolve_group_positions(&labels, min_spacing, selected);
    serde_json::to_string(&resolved).map_err(|error| error.to_string())
}

fn render_svg_with_options(csv: &str, options_json: Option<&str>) -> Result<String, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<SlopeRenderOptions>(raw).map_err(|error| error.to_string())?,
        None => SlopeRenderOptions::default(),
    };
    let config = build_config(&options)?;
    render_chart_svg(csv, options.companies_csv.as_deref(), &options.chart, &config)
        .map_err(|error| error.to_string())
}

/// Resolves label positions for a browser host. `labels_json` is an array
/// of `{id, anchor, size, group?}`; the result is an array of
/// `{id, anchor, position, size, group?, visible}` in input order.
#[wasm_bindgen]
pub fn resolve_labels(
    labels_json: &str,
    min_spacing: f32,
    selected_group: Option<String>,
) -> Result<String, JsValue> {
    resolve_labels_json(labels_json, min_spacing, selected_group.as_deref())
        .map_err(|error| JsValue::from_str(&error))
}

#[wasm_bindgen]
pub fn render_slope_svg(csv: &str, options_json: Option<String>) -> Result<String, JsValue> {
    render_svg_with_options(csv, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}
