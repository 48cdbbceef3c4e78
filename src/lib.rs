#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dataset;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, SlopeChartConfig};
pub use dataset::Dataset;
pub use ir::{Selection, SlopeView, ViewMode};
pub use layout::compute_slope_layout;
pub use layout::label_placement::{
    Label, ResolvedLabel, resolve_group_positions, resolve_label_positions,
};

use serde::Deserialize;

/// Which chart to draw from a dataset. Unset fields fall back to the
/// first item of the view and no selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub view: ViewMode,
    pub item: Option<String>,
    pub industry: Option<String>,
    pub select: Option<String>,
}

/// Builds the view named by `options` and turns `options.select` into a
/// selection. The selection may name a left item by key or by its
/// display name.
pub fn select_view(dataset: &Dataset, options: &ChartOptions) -> anyhow::Result<(SlopeView, Selection)> {
    let industry = options.industry.as_deref();
    let item = match &options.item {
        Some(item) => item.clone(),
        None => dataset.default_item(options.view, industry)?,
    };
    let view = dataset.view(options.view, &item, industry)?;

    let selection = match options.select.as_deref() {
        None => Selection::none(),
        Some(wanted) => {
            let found = view
                .left
                .iter()
                .find(|left| left.name == wanted || left.display_name == wanted)
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "\"{wanted}\" is not an item of the {} view for {item}",
                        options.view.as_str()
                    )
                })?;
            Selection::group(found.name.clone())
        }
    };
    Ok((view, selection))
}

/// Parses the compensation table (plus optional company info), lays out
/// the chart and returns the SVG document.
pub fn render_chart_svg(
    comp_csv: &str,
    companies_csv: Option<&str>,
    options: &ChartOptions,
    config: &Config,
) -> anyhow::Result<String> {
    let rows = parser::parse_comp_csv(comp_csv)?;
    let companies = match companies_csv {
        Some(input) => parser::parse_company_info_csv(input)?,
        None => Vec::new(),
    };
    let dataset = Dataset::new(rows, companies);
    let (view, selection) = select_view(&dataset, options)?;
    let layout = compute_slope_layout(
        &view,
        &selection,
        &config.theme,
        &config.chart,
        &config.render,
    );
    Ok(render::render_svg(&layout, &config.theme, &config.chart))
}
