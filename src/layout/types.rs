use serde::Serialize;

use crate::ir::{Selection, ViewMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
}

impl TextAnchor {
    pub fn as_svg(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLayout {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub font_size: f32,
    pub anchor: TextAnchor,
    pub bold: bool,
    pub italic: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DotLayout {
    pub key: String,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: String,
    pub opacity: f32,
}

/// A rounded label box. `y` is the resolved center, `anchor_y` the center
/// of the dot it labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleLayout {
    pub id: usize,
    pub group: String,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub anchor_y: f32,
    pub width: f32,
    pub height: f32,
    pub color: String,
    pub opacity: f32,
    pub visible: bool,
}

impl BubbleLayout {
    pub fn top(&self) -> f32 {
        self.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Quadratic curve joining a bubble to its dot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorLayout {
    pub id: usize,
    pub group: String,
    pub start: (f32, f32),
    pub control: (f32, f32),
    pub end: (f32, f32),
    pub color: String,
    pub opacity: f32,
}

impl ConnectorLayout {
    /// Control point sits halfway along x and halfway between both ends on y.
    pub fn between(id: usize, group: String, start: (f32, f32), end: (f32, f32)) -> Self {
        Self {
            id,
            group,
            start,
            control: ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0),
            end,
            color: String::new(),
            opacity: 1.0,
        }
    }

    pub fn path(&self) -> String {
        format!(
            "M {:.2} {:.2} Q {:.2} {:.2}, {:.2} {:.2}",
            self.start.0, self.start.1, self.control.0, self.control.1, self.end.0, self.end.1
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionLine {
    pub group: String,
    pub rank_index: usize,
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: String,
    pub opacity: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub value: f32,
    pub y: f32,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionLayout {
    /// `(pay, density)` samples.
    pub samples: Vec<(f32, f32)>,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeLayout {
    pub mode: ViewMode,
    pub selection: Selection,
    pub width: f32,
    pub height: f32,
    pub left_x: f32,
    pub right_x: f32,
    pub axis_x: f32,
    pub plot_top: f32,
    pub plot_bottom: f32,
    pub max_pay: f32,
    pub ticks: Vec<AxisTick>,
    pub texts: Vec<TextLayout>,
    pub distribution: Option<DistributionLayout>,
    pub lines: Vec<ConnectionLine>,
    pub left_dots: Vec<DotLayout>,
    pub right_dots: Vec<DotLayout>,
    pub left_bubbles: Vec<BubbleLayout>,
    pub left_connectors: Vec<ConnectorLayout>,
    pub rank_bubbles: Vec<BubbleLayout>,
    pub rank_connectors: Vec<ConnectorLayout>,
}
