use crate::layout::SlopeLayout;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Flat, stable JSON view of a layout for debugging and regression
/// snapshots.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub mode: String,
    pub selection: Option<String>,
    pub width: f32,
    pub height: f32,
    pub left_x: f32,
    pub right_x: f32,
    pub plot_top: f32,
    pub plot_bottom: f32,
    pub max_pay: f32,
    pub left_bubbles: Vec<BubbleDump>,
    pub rank_bubbles: Vec<BubbleDump>,
    pub lines: Vec<LineDump>,
    pub ticks: Vec<TickDump>,
}

#[derive(Debug, Serialize)]
pub struct BubbleDump {
    pub id: usize,
    pub group: String,
    pub text: String,
    pub anchor: f32,
    pub position: f32,
    pub displacement: f32,
    pub x: f32,
    pub width: f32,
    pub visible: bool,
}

#[derive(Debug, Serialize)]
pub struct LineDump {
    pub group: String,
    pub rank_index: usize,
    pub points: [[f32; 2]; 2],
    pub opacity: f32,
}

#[derive(Debug, Serialize)]
pub struct TickDump {
    pub value: f32,
    pub y: f32,
    pub label: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &SlopeLayout) -> Self {
        let bubbles = |bubbles: &[crate::layout::BubbleLayout]| -> Vec<BubbleDump> {
            bubbles
                .iter()
                .map(|bubble| BubbleDump {
                    id: bubble.id,
                    group: bubble.group.clone(),
                    text: bubble.text.clone(),
                    anchor: bubble.anchor_y,
                    position: bubble.y,
                    displacement: bubble.y - bubble.anchor_y,
                    x: bubble.x,
                    width: bubble.width,
                    visible: bubble.visible,
                })
                .collect()
        };

        let lines = layout
            .lines
            .iter()
            .map(|line| LineDump {
                group: line.group.clone(),
                rank_index: line.rank_index,
                points: [[line.from.0, line.from.1], [line.to.0, line.to.1]],
                opacity: line.opacity,
            })
            .collect();

        let ticks = layout
            .ticks
            .iter()
            .map(|tick| TickDump {
                value: tick.value,
                y: tick.y,
                label: tick.label.clone(),
            })
            .collect();

        LayoutDump {
            mode: layout.mode.as_str().to_string(),
            selection: layout.selection.group.clone(),
            width: layout.width,
            height: layout.height,
            left_x: layout.left_x,
            right_x: layout.right_x,
            plot_top: layout.plot_top,
            plot_bottom: layout.plot_bottom,
            max_pay: layout.max_pay,
            left_bubbles: bubbles(&layout.left_bubbles),
            rank_bubbles: bubbles(&layout.rank_bubbles),
            lines,
            ticks,
        }
    }
}

/// Writes the dump to `path`, or stdout when no path is given.
pub fn write_layout_dump(path: Option<&Path>, layout: &SlopeLayout) -> anyhow::Result<()> {
    let dump = LayoutDump::from_layout(layout);
    match path {
        Some(path) => {
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, &dump)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer_pretty(&mut stdout, &dump)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}
