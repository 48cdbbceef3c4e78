// Bubble label placement along a single (vertical) axis.
// Pure geometry: callers hand in anchors already mapped through the pay
// scale and get back collision-free positions, one per input label.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// A label anchored to a data point on the collision axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: usize,
    pub anchor: f32,
    pub size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Label {
    pub fn new(id: usize, anchor: f32, size: f32) -> Self {
        Self {
            id,
            anchor,
            size,
            group: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLabel {
    pub id: usize,
    pub anchor: f32,
    pub position: f32,
    pub size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl ResolvedLabel {
    pub(crate) fn at_anchor(label: &Label) -> Self {
        Self {
            id: label.id,
            anchor: label.anchor,
            position: label.anchor,
            size: label.size,
            group: label.group.clone(),
        }
    }

    pub fn displacement(&self) -> f32 {
        self.position - self.anchor
    }

    pub fn half_extent(&self) -> f32 {
        half_extent(self.size)
    }

    /// Smallest coordinate covered by the label.
    pub fn top(&self) -> f32 {
        self.position - self.half_extent()
    }

    /// Largest coordinate covered by the label.
    pub fn bottom(&self) -> f32 {
        self.position + self.half_extent()
    }
}

/// Result of a grouped pass: labels outside the selected group keep their
/// anchor and are reported hidden.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResolvedLabel {
    #[serde(flatten)]
    pub label: ResolvedLabel,
    pub visible: bool,
}

#[derive(Debug, Error, PartialEq)]
pub enum LabelError {
    #[error("label {id} has a non-finite anchor ({anchor})")]
    NonFiniteAnchor { id: usize, anchor: f32 },
    #[error("label {id} has a non-finite size ({size})")]
    NonFiniteSize { id: usize, size: f32 },
    #[error("minimum spacing must be finite, got {0}")]
    NonFiniteSpacing(f32),
}

// Zero, negative and NaN sizes all collapse to a point label.
fn half_extent(size: f32) -> f32 {
    if size > 0.0 { size / 2.0 } else { 0.0 }
}

/// Rejects input the resolver is not defined for. The resolver itself
/// never fails, so hosts feeding it untrusted numbers run this first.
pub fn validate_labels(labels: &[Label], min_spacing: f32) -> Result<(), LabelError> {
    if !min_spacing.is_finite() {
        return Err(LabelError::NonFiniteSpacing(min_spacing));
    }
    for label in labels {
        if !label.anchor.is_finite() {
            return Err(LabelError::NonFiniteAnchor {
                id: label.id,
                anchor: label.anchor,
            });
        }
        if !label.size.is_finite() {
            return Err(LabelError::NonFiniteSize {
                id: label.id,
                size: label.size,
            });
        }
    }
    Ok(())
}

/// Indices of `labels` from the packed end (largest anchor) outward.
/// The sort is stable, so equal anchors keep their input order; the
/// grouped pass relies on the same rule.
pub fn packed_order(labels: &[Label]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by(|&a, &b| {
        labels[b]
            .anchor
            .partial_cmp(&labels[a].anchor)
            .unwrap_or(Ordering::Equal)
    });
    order
}

/// Bottom-justified sweep: walk labels from the largest anchor toward the
/// smallest and push each one up just far enough to clear its
/// predecessor by `min_spacing`. Single forward pass, earlier pairs are
/// never revisited.
///
/// The output is in input order and has the same length as the input.
pub fn resolve_label_positions(labels: &[Label], min_spacing: f32) -> Vec<ResolvedLabel> {
    let mut resolved: Vec<ResolvedLabel> = labels.iter().map(ResolvedLabel::at_anchor).collect();
    if resolved.len() < 2 {
        return resolved;
    }

    let spacing = min_spacing.max(0.0);
    let order = packed_order(labels);
    let mut pushed = 0usize;
    for pair in order.windows(2) {
        let current_top = resolved[pair[0]].top();
        let next = &mut resolved[pair[1]];
        if next.bottom() + spacing > current_top {
            next.position = current_top - spacing - next.half_extent();
            pushed += 1;
        }
    }

    log::debug!(
        "resolved {} labels (min spacing {spacing}), {pushed} pushed",
        resolved.len()
    );
    resolved
}

/// Resolves only the labels whose group matches `selected`, leaving the
/// rest at their anchors and hidden. With no selection every label takes
/// part and stays visible.
///
/// Positions are always derived from `anchor`, so calling this again after
/// a selection change never compounds earlier displacement.
pub fn resolve_group_positions(
    labels: &[Label],
    min_spacing: f32,
    selected: Option<&str>,
) -> Vec<GroupResolvedLabel> {
    let Some(key) = selected else {
        return resolve_label_positions(labels, min_spacing)
            .into_iter()
            .map(|label| GroupResolvedLabel {
                label,
                visible: true,
            })
            .collect();
    };

    let members: Vec<usize> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| label.group.as_deref() == Some(key))
        .map(|(idx, _)| idx)
        .collect();
    let subset: Vec<Label> = members.iter().map(|&idx| labels[idx].clone()).collect();
    let resolved_subset = resolve_label_positions(&subset, min_spacing);

    let mut out: Vec<GroupResolvedLabel> = labels
        .iter()
        .map(|label| GroupResolvedLabel {
            label: ResolvedLabel::at_anchor(label),
            visible: false,
        })
        .collect();
    for (slot, label) in members.into_iter().zip(resolved_subset) {
        out[slot] = GroupResolvedLabel {
            label,
            visible: true,
        };
    }
    out
}
