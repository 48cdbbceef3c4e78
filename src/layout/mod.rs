mod density;
pub mod label_placement;
pub mod scale;
mod text;
mod types;
pub use text::text_width;
pub use types::*;

use crate::config::{RenderConfig, SlopeChartConfig};
use crate::ir::{RankItem, Selection, SlopeView, ViewMode};
use crate::theme::Theme;
use label_placement::{
    GroupResolvedLabel, Label, ResolvedLabel, resolve_group_positions, resolve_label_positions,
};
use scale::{LinearScale, format_pay_tick};

const TITLE_TOP: f32 = 22.0;
const INSTRUCTIONS_OFFSET: f32 = 40.0;
const INSTRUCTIONS_TAIL: f32 = 5.0;
const RANK_COLUMN_TITLE: &str = "Ranks (Total Comp)";

/// Vertical frame of the plot, shared by every element.
struct Frame {
    left_x: f32,
    right_x: f32,
    axis_x: f32,
    offset: f32,
    plot_top: f32,
    plot_bottom: f32,
    scale: LinearScale,
}

impl Frame {
    fn new(view: &SlopeView, config: &SlopeChartConfig, render: &RenderConfig) -> (Self, f32) {
        let width = render.width;
        let height = render.height;
        let chart_width = width * config.width_ratio;
        let center_x = width / 2.0;
        let left_x = center_x - chart_width / 2.0 + config.left_margin;
        let right_x = center_x + chart_width / 2.0 - config.right_margin;

        // Center everything from the main title down to the second
        // instruction line.
        let instructions_bottom = height - config.bottom_margin
            + INSTRUCTIONS_OFFSET
            + config.instructional_text_line_spacing
            + INSTRUCTIONS_TAIL;
        let content_height = instructions_bottom - TITLE_TOP;
        let offset = (height - content_height) / 2.0 - TITLE_TOP;

        let plot_top = config.top_margin + offset;
        let plot_height = height - config.top_margin - config.bottom_margin;
        let plot_bottom = plot_top + plot_height;

        let max_left = view.left.iter().map(|item| item.avg_pay).fold(0.0, f32::max);
        let max_right = view.right.iter().map(|rank| rank.total_pay).fold(0.0, f32::max);
        let max_pay = max_left.max(max_right);
        let scale = LinearScale::new()
            .domain(0.0, max_pay)
            .range(plot_bottom, plot_top);

        (
            Self {
                left_x,
                right_x,
                axis_x: (left_x + right_x) / 2.0,
                offset,
                plot_top,
                plot_bottom,
                scale,
            },
            max_pay,
        )
    }
}

/// Lays out one slope chart. `selection` names the left item whose ranks
/// are shown; it is recomputed from scratch on every call.
pub fn compute_slope_layout(
    view: &SlopeView,
    selection: &Selection,
    theme: &Theme,
    config: &SlopeChartConfig,
    render: &RenderConfig,
) -> SlopeLayout {
    let selection = effective_selection(view, selection);
    let (frame, max_pay) = Frame::new(view, config, render);
    let color = |key: &str| theme.color_for(key, &view.color_domain);

    let ticks = frame
        .scale
        .ticks(config.axis_ticks)
        .into_iter()
        .map(|value| AxisTick {
            value,
            y: frame.scale.scale(value),
            label: format_pay_tick(value),
        })
        .collect();

    let left_dots = view
        .left
        .iter()
        .map(|item| DotLayout {
            key: item.name.clone(),
            x: frame.left_x,
            y: frame.scale.scale(item.avg_pay),
            radius: config.dot_radius,
            color: color(&item.name),
            opacity: item_opacity(&selection, &item.name, config),
        })
        .collect();

    let right_dots = view
        .right
        .iter()
        .map(|rank| {
            let key = rank.group_key(view.mode);
            let opacity = if selection.is_dimmed(key) { 0.0 } else { 1.0 };
            DotLayout {
                key: key.to_string(),
                x: frame.right_x,
                y: frame.scale.scale(rank.total_pay),
                radius: config.dot_radius,
                color: color(key),
                opacity,
            }
        })
        .collect();

    let lines = connection_lines(view, &selection, &frame, config, &color);
    let (left_bubbles, left_connectors) =
        left_bubbles(view, &selection, &frame, theme, config, &color);
    let (rank_bubbles, rank_connectors) =
        rank_bubbles(view, &selection, &frame, theme, config, &color);

    let distribution = distribution(&view.right, &frame, config);
    let texts = chart_texts(view, &frame, theme, config, render);

    log::debug!(
        "slope layout: {} left bubbles, {} rank bubbles ({} visible), selection {:?}",
        left_bubbles.len(),
        rank_bubbles.len(),
        rank_bubbles.iter().filter(|bubble| bubble.visible).count(),
        selection.group
    );

    SlopeLayout {
        mode: view.mode,
        selection,
        width: render.width,
        height: render.height,
        left_x: frame.left_x,
        right_x: frame.right_x,
        axis_x: frame.axis_x,
        plot_top: frame.plot_top,
        plot_bottom: frame.plot_bottom,
        max_pay,
        ticks,
        texts,
        distribution,
        lines,
        left_dots,
        right_dots,
        left_bubbles,
        left_connectors,
        rank_bubbles,
        rank_connectors,
    }
}

/// A selection naming no left item of this view is dropped.
fn effective_selection(view: &SlopeView, selection: &Selection) -> Selection {
    match selection.group.as_deref() {
        Some(key) if view.left.iter().any(|item| item.name == key) => selection.clone(),
        Some(key) => {
            log::warn!("selection \"{key}\" is not part of this view, ignoring it");
            Selection::none()
        }
        None => Selection::none(),
    }
}

fn item_opacity(selection: &Selection, key: &str, config: &SlopeChartConfig) -> f32 {
    if selection.is_dimmed(key) {
        config.dimmed_item_opacity
    } else {
        1.0
    }
}

/// One line per rank, from its left item's dot to the rank's dot.
fn connection_lines(
    view: &SlopeView,
    selection: &Selection,
    frame: &Frame,
    config: &SlopeChartConfig,
    color: &dyn Fn(&str) -> String,
) -> Vec<ConnectionLine> {
    view.right
        .iter()
        .enumerate()
        .filter_map(|(rank_index, rank)| {
            let key = rank.group_key(view.mode);
            let item = view.left.iter().find(|item| item.name == key)?;
            let (opacity, width) = if selection.is_selected(key) {
                (config.highlight_line_opacity, config.highlight_line_width)
            } else if selection.is_dimmed(key) {
                (config.dimmed_line_opacity, config.line_width)
            } else {
                (config.line_opacity, config.line_width)
            };
            Some(ConnectionLine {
                group: item.name.clone(),
                rank_index,
                from: (frame.left_x, frame.scale.scale(item.avg_pay)),
                to: (frame.right_x, frame.scale.scale(rank.total_pay)),
                color: color(key),
                opacity,
                width,
            })
        })
        .collect()
}

fn left_bubbles(
    view: &SlopeView,
    selection: &Selection,
    frame: &Frame,
    theme: &Theme,
    config: &SlopeChartConfig,
    color: &dyn Fn(&str) -> String,
) -> (Vec<BubbleLayout>, Vec<ConnectorLayout>) {
    let right_edge = frame.left_x - config.bubble_connector_gap;
    let labels: Vec<Label> = view
        .left
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            Label::new(idx, frame.scale.scale(item.avg_pay), config.bubble_height)
                .with_group(item.name.clone())
        })
        .collect();
    let resolved = resolve_label_positions(&labels, config.bubble_min_spacing);

    let mut bubbles = Vec::with_capacity(resolved.len());
    let mut connectors = Vec::with_capacity(resolved.len());
    for (item, label) in view.left.iter().zip(resolved) {
        let text = item.display_name.clone();
        let width = text::bubble_width(&text, theme, config);
        let item_color = color(&item.name);
        bubbles.push(BubbleLayout {
            id: label.id,
            group: item.name.clone(),
            text,
            x: right_edge - width,
            y: label.position,
            anchor_y: label.anchor,
            width,
            height: config.bubble_height,
            color: item_color.clone(),
            opacity: item_opacity(selection, &item.name, config),
            visible: true,
        });
        let mut connector = ConnectorLayout::between(
            label.id,
            item.name.clone(),
            (right_edge, label.position),
            (frame.left_x, label.anchor),
        );
        connector.color = item_color;
        connector.opacity = if selection.is_selected(&item.name) {
            config.active_connector_opacity
        } else if selection.is_dimmed(&item.name) {
            config.dimmed_connector_opacity
        } else {
            config.connector_opacity
        };
        connectors.push(connector);
    }
    (bubbles, connectors)
}

/// Rank bubbles stay hidden at their anchors until a left item is
/// selected; then only that item's ranks are resolved and shown.
fn rank_bubbles(
    view: &SlopeView,
    selection: &Selection,
    frame: &Frame,
    theme: &Theme,
    config: &SlopeChartConfig,
    color: &dyn Fn(&str) -> String,
) -> (Vec<BubbleLayout>, Vec<ConnectorLayout>) {
    let left_edge = frame.right_x + config.bubble_connector_gap;
    let labels: Vec<Label> = view
        .right
        .iter()
        .enumerate()
        .map(|(idx, rank)| {
            Label::new(idx, frame.scale.scale(rank.total_pay), config.bubble_height)
                .with_group(rank.group_key(view.mode))
        })
        .collect();

    let resolved: Vec<GroupResolvedLabel> = match selection.group.as_deref() {
        Some(key) => resolve_group_positions(&labels, config.bubble_min_spacing, Some(key)),
        None => labels
            .iter()
            .map(|label| GroupResolvedLabel {
                label: ResolvedLabel::at_anchor(label),
                visible: false,
            })
            .collect(),
    };

    let mut bubbles = Vec::with_capacity(resolved.len());
    let mut connectors = Vec::with_capacity(resolved.len());
    for (rank, placed) in view.right.iter().zip(resolved) {
        let key = rank.group_key(view.mode).to_string();
        let width = text::bubble_width(&rank.rank_name, theme, config);
        let rank_color = color(&key);
        let label = placed.label;
        bubbles.push(BubbleLayout {
            id: label.id,
            group: key.clone(),
            text: rank.rank_name.clone(),
            x: left_edge,
            y: label.position,
            anchor_y: label.anchor,
            width,
            height: config.bubble_height,
            color: rank_color.clone(),
            opacity: if placed.visible { 1.0 } else { 0.0 },
            visible: placed.visible,
        });
        let mut connector = ConnectorLayout::between(
            label.id,
            key,
            (frame.right_x, label.anchor),
            (left_edge, label.position),
        );
        connector.color = rank_color;
        connector.opacity = if placed.visible {
            config.active_connector_opacity
        } else {
            0.0
        };
        connectors.push(connector);
    }
    (bubbles, connectors)
}

fn distribution(
    ranks: &[RankItem],
    frame: &Frame,
    config: &SlopeChartConfig,
) -> Option<DistributionLayout> {
    let pays: Vec<f32> = ranks.iter().map(|rank| rank.total_pay).collect();
    let max = pays.iter().copied().fold(0.0, f32::max);
    let thresholds = density::thresholds(max, config.distribution_samples);
    if thresholds.is_empty() {
        return None;
    }
    let bandwidth = max / config.distribution_bandwidth_divisor.max(1.0);
    let samples = density::kernel_density(&pays, &thresholds, bandwidth);
    let max_density = samples.iter().map(|(_, d)| *d).fold(0.0, f32::max);
    if max_density <= 0.0 {
        return None;
    }
    let density_x = LinearScale::new()
        .domain(0.0, max_density)
        .range(frame.right_x, frame.right_x - config.distribution_width);

    let outline: Vec<(f32, f32)> = samples
        .iter()
        .map(|&(pay, d)| (density_x.scale(d), frame.scale.scale(pay)))
        .collect();
    let mut path = density::basis_path(&outline);
    if let (Some(first), Some(last)) = (outline.first(), outline.last()) {
        path.push_str(&format!(
            "L{:.2},{:.2}L{:.2},{:.2}Z",
            frame.right_x, last.1, frame.right_x, first.1
        ));
    }
    Some(DistributionLayout { samples, path })
}

fn chart_texts(
    view: &SlopeView,
    frame: &Frame,
    theme: &Theme,
    config: &SlopeChartConfig,
    render: &RenderConfig,
) -> Vec<TextLayout> {
    let title = |x: f32, y: f32, text: &str| TextLayout {
        x,
        y,
        text: text.to_string(),
        font_size: config.title_font_size,
        anchor: TextAnchor::Middle,
        bold: true,
        italic: false,
        color: theme.title_color.clone(),
    };
    let column_y = config.top_margin - 30.0 + frame.offset;
    let mut texts = Vec::new();

    match view.mode {
        ViewMode::Company => texts.push(title(frame.left_x, column_y, "Roles (Avg Comp)")),
        ViewMode::Role => {
            texts.push(title(
                frame.left_x,
                config.top_margin - 38.0 + frame.offset,
                "Top 10 Companies",
            ));
            texts.push(title(
                frame.left_x,
                config.top_margin - 20.0 + frame.offset,
                "(Avg Comp)",
            ));
        }
    }
    texts.push(title(frame.right_x, column_y, RANK_COLUMN_TITLE));

    let main_y = TITLE_TOP + frame.offset;
    texts.push(TextLayout {
        font_size: config.chart_main_title_font_size,
        ..title(frame.axis_x, main_y, &config.chart_main_title)
    });
    texts.push(TextLayout {
        font_size: config.chart_subtitle_font_size,
        bold: false,
        color: theme.subtitle_color.clone(),
        ..title(frame.axis_x, main_y + config.chart_title_spacing, &view.title)
    });

    let instructions = match view.mode {
        ViewMode::Company => &config.instructions_company,
        ViewMode::Role => &config.instructions_role,
    };
    let bottom_y = render.height - config.bottom_margin + INSTRUCTIONS_OFFSET + frame.offset;
    for (idx, line) in instructions.iter().enumerate() {
        texts.push(TextLayout {
            x: frame.left_x,
            y: bottom_y + idx as f32 * config.instructional_text_line_spacing,
            text: line.clone(),
            font_size: config.instructional_text_font_size,
            anchor: TextAnchor::Start,
            bold: false,
            italic: true,
            color: theme.muted_text_color.clone(),
        });
    }
    texts
}
