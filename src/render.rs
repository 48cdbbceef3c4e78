use crate::config::{RenderConfig, SlopeChartConfig};
use crate::layout::{
    BubbleLayout, ConnectorLayout, DotLayout, SlopeLayout, TextLayout, text_width,
};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

/// Serializes a computed layout. Drawing order: background, grid,
/// distribution, column lines, axis, connection lines, dots, connectors,
/// bubbles, titles.
pub fn render_svg(layout: &SlopeLayout, theme: &Theme, config: &SlopeChartConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"{}\">",
        escape_xml(&theme.font_family)
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    for tick in &layout.ticks {
        svg.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"2,2\"/>",
            layout.left_x, tick.y, layout.right_x, tick.y, theme.grid_color
        ));
    }

    if let Some(distribution) = &layout.distribution {
        svg.push_str(&format!(
            "<path class=\"rank-distribution\" d=\"{}\" fill=\"{}\" fill-opacity=\"0.3\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            distribution.path, theme.distribution_fill, theme.distribution_stroke
        ));
    }

    for x in [layout.left_x, layout.right_x] {
        svg.push_str(&format!(
            "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
            layout.plot_top, layout.plot_bottom, theme.column_line_color
        ));
    }

    svg.push_str(&axis_svg(layout, theme, config));

    for line in &layout.lines {
        svg.push_str(&format!(
            "<line class=\"connection-line\" data-group=\"{}\" x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"/>",
            escape_xml(&line.group),
            line.from.0,
            line.from.1,
            line.to.0,
            line.to.1,
            line.color,
            line.width,
            line.opacity
        ));
    }

    for dot in &layout.left_dots {
        svg.push_str(&dot_svg("left-dot", dot, theme));
    }
    for dot in &layout.right_dots {
        svg.push_str(&dot_svg("right-dot", dot, theme));
    }

    for connector in &layout.left_connectors {
        svg.push_str(&connector_svg("role-connector", connector, config));
    }
    for bubble in &layout.left_bubbles {
        svg.push_str(&bubble_svg("role-label-bubble", bubble, theme, config));
    }
    for connector in &layout.rank_connectors {
        svg.push_str(&connector_svg("rank-connector", connector, config));
    }
    for bubble in &layout.rank_bubbles {
        svg.push_str(&bubble_svg("rank-label-bubble", bubble, theme, config));
    }

    for text in &layout.texts {
        svg.push_str(&text_svg(text));
    }

    svg.push_str("</svg>");
    svg
}

fn axis_svg(layout: &SlopeLayout, theme: &Theme, config: &SlopeChartConfig) -> String {
    let mut out = format!(
        "<g class=\"y-axis\"><line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        layout.plot_top,
        layout.plot_bottom,
        theme.axis_line_color,
        x = layout.axis_x
    );
    let font_size = config.axis_font_size;
    for tick in &layout.ticks {
        let label_width =
            text_width(&tick.label, font_size, &theme.font_family, config.fast_text_metrics);
        let text_x = layout.axis_x - 9.0;
        out.push_str(&format!(
            "<line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            layout.axis_x - 6.0,
            layout.axis_x,
            theme.axis_line_color,
            y = tick.y
        ));
        out.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
            text_x - label_width - 2.0,
            tick.y - font_size / 2.0 - 1.0,
            label_width + 4.0,
            font_size + 2.0,
            theme.axis_label_background
        ));
        out.push_str(&format!(
            "<text x=\"{text_x:.2}\" y=\"{:.2}\" text-anchor=\"end\" dominant-baseline=\"middle\" font-size=\"{font_size}\" fill=\"{}\">{}</text>",
            tick.y,
            theme.axis_text_color,
            escape_xml(&tick.label)
        ));
    }
    out.push_str("</g>");
    out
}

fn dot_svg(class: &str, dot: &DotLayout, theme: &Theme) -> String {
    format!(
        "<circle class=\"{class}\" data-group=\"{}\" cx=\"{:.2}\" cy=\"{:.2}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"2\" opacity=\"{}\"/>",
        escape_xml(&dot.key),
        dot.x,
        dot.y,
        dot.radius,
        dot.color,
        theme.dot_stroke,
        dot.opacity
    )
}

fn connector_svg(class: &str, connector: &ConnectorLayout, config: &SlopeChartConfig) -> String {
    format!(
        "<path class=\"{class}\" data-group=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"/>",
        escape_xml(&connector.group),
        connector.path(),
        connector.color,
        config.line_width,
        connector.opacity
    )
}

fn bubble_svg(class: &str, bubble: &BubbleLayout, theme: &Theme, config: &SlopeChartConfig) -> String {
    let visibility = if bubble.visible { "" } else { " visibility=\"hidden\"" };
    format!(
        "<g class=\"{class}\" data-group=\"{}\" opacity=\"{}\"{visibility}><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\"/><text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
        escape_xml(&bubble.group),
        bubble.opacity,
        bubble.x,
        bubble.top(),
        bubble.width,
        bubble.height,
        config.bubble_corner_radius,
        theme.bubble_fill,
        bubble.color,
        bubble.x + bubble.width / 2.0,
        bubble.y,
        config.bubble_font_size,
        theme.bubble_text_color,
        escape_xml(&bubble.text)
    )
}

fn text_svg(text: &TextLayout) -> String {
    let weight = if text.bold { " font-weight=\"bold\"" } else { "" };
    let style = if text.italic { " font-style=\"italic\"" } else { "" };
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"{}\" font-size=\"{}\" fill=\"{}\"{weight}{style}>{}</text>",
        text.x,
        text.y,
        text.anchor.as_svg(),
        text.font_size,
        text.color,
        escape_xml(&text.text)
    )
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid canvas size {}x{}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the \"png\" feature"))
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::ir::{CompRow, Selection};
    use crate::layout::compute_slope_layout;

    fn row(ticker: &str, role: &str, rank: i32, total: f32) -> CompRow {
        CompRow {
            ticker: ticker.to_string(),
            role: role.to_string(),
            rank_name: format!("L{rank}"),
            rank,
            total_pay: total,
            base_pay: total,
            stock: 0.0,
            bonus: 0.0,
        }
    }

    fn render(selection: &Selection) -> String {
        let dataset = Dataset::new(
            vec![
                row("R&D", "software-engineer", 1, 180_000.0),
                row("R&D", "software-engineer", 2, 260_000.0),
                row("R&D", "product-manager", 1, 210_000.0),
            ],
            Vec::new(),
        );
        let view = dataset.company_view("R&D").unwrap();
        let theme = Theme::dark();
        let config = SlopeChartConfig {
            fast_text_metrics: true,
            ..SlopeChartConfig::default()
        };
        let layout =
            compute_slope_layout(&view, selection, &theme, &config, &RenderConfig::default());
        render_svg(&layout, &theme, &config)
    }

    #[test]
    fn render_svg_basic() {
        let svg = render(&Selection::none());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Software Engineer"));
        assert!(svg.contains("Roles (Avg Comp)"));
        assert!(svg.contains("rank-distribution"));
        assert_eq!(svg.matches("class=\"left-dot\"").count(), 2);
        assert_eq!(svg.matches("class=\"right-dot\"").count(), 3);
    }

    #[test]
    fn text_is_escaped() {
        let svg = render(&Selection::none());
        assert!(svg.contains("R&amp;D"));
        assert!(!svg.contains(">R&D<"));
    }

    #[test]
    fn hidden_rank_bubbles_are_marked() {
        let svg = render(&Selection::none());
        assert_eq!(
            svg.matches("class=\"rank-label-bubble\"").count(),
            svg.matches("visibility=\"hidden\"").count()
        );
        let selected = render(&Selection::group("software-engineer"));
        assert_eq!(selected.matches("visibility=\"hidden\"").count(), 1);
    }

    #[test]
    fn escape_xml_covers_markup() {
        assert_eq!(escape_xml("<a href='x'>&\"</a>"), "&lt;a href=&apos;x&apos;&gt;&amp;&quot;&lt;/a&gt;");
    }
}
