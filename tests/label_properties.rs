use payslope::layout::label_placement::{
    Label, ResolvedLabel, packed_order, resolve_group_positions, resolve_label_positions,
};
use proptest::prelude::*;

const EPS: f32 = 1e-2;

fn labels_strategy() -> impl Strategy<Value = Vec<Label>> {
    prop::collection::vec((-1000.0f32..1000.0, 0.0f32..40.0, 0usize..3), 0..40).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(id, (anchor, size, group))| {
                Label::new(id, anchor, size).with_group(format!("g{group}"))
            })
            .collect()
    })
}

fn as_labels(resolved: &[ResolvedLabel]) -> Vec<Label> {
    resolved
        .iter()
        .map(|label| Label::new(label.id, label.position, label.size))
        .collect()
}

proptest! {
    #[test]
    fn output_keeps_input_order(labels in labels_strategy(), spacing in 0.0f32..20.0) {
        let resolved = resolve_label_positions(&labels, spacing);
        prop_assert_eq!(resolved.len(), labels.len());
        for (input, output) in labels.iter().zip(&resolved) {
            prop_assert_eq!(input.id, output.id);
            prop_assert_eq!(input.anchor, output.anchor);
            prop_assert_eq!(input.size, output.size);
        }
    }

    #[test]
    fn neighbours_in_packed_order_never_overlap(labels in labels_strategy(), spacing in 0.0f32..20.0) {
        let resolved = resolve_label_positions(&labels, spacing);
        for pair in packed_order(&labels).windows(2) {
            let lower = &resolved[pair[0]];
            let upper = &resolved[pair[1]];
            prop_assert!(
                upper.bottom() + spacing <= lower.top() + EPS,
                "label {} ({}..{}) overlaps label {} ({}..{})",
                upper.id, upper.top(), upper.bottom(), lower.id, lower.top(), lower.bottom()
            );
        }
    }

    #[test]
    fn labels_never_swap_order(labels in labels_strategy(), spacing in 0.0f32..20.0) {
        let resolved = resolve_label_positions(&labels, spacing);
        for pair in packed_order(&labels).windows(2) {
            prop_assert!(resolved[pair[1]].position <= resolved[pair[0]].position + EPS);
        }
    }

    #[test]
    fn labels_only_move_toward_smaller_coordinates(labels in labels_strategy(), spacing in 0.0f32..20.0) {
        for label in resolve_label_positions(&labels, spacing) {
            prop_assert!(label.position <= label.anchor);
        }
    }

    #[test]
    fn separated_labels_stay_put(
        gaps in prop::collection::vec(0.0f32..50.0, 1..30),
        size in 0.0f32..30.0,
        spacing in 0.0f32..10.0,
    ) {
        let mut anchor = 0.0f32;
        let labels: Vec<Label> = gaps
            .iter()
            .enumerate()
            .map(|(id, gap)| {
                anchor += size + spacing + gap + 1.0;
                Label::new(id, anchor, size)
            })
            .collect();
        for label in resolve_label_positions(&labels, spacing) {
            prop_assert_eq!(label.position, label.anchor);
        }
    }

    #[test]
    fn resolving_twice_changes_nothing(labels in labels_strategy(), spacing in 0.0f32..20.0) {
        let first = resolve_label_positions(&labels, spacing);
        let second = resolve_label_positions(&as_labels(&first), spacing);
        for (a, b) in first.iter().zip(&second) {
            prop_assert!((a.position - b.position).abs() <= EPS, "{} vs {}", a.position, b.position);
        }
    }

    #[test]
    fn grouped_pass_matches_resolving_the_group_alone(
        labels in labels_strategy(),
        spacing in 0.0f32..20.0,
        group in 0usize..3,
    ) {
        let key = format!("g{group}");
        let grouped = resolve_group_positions(&labels, spacing, Some(key.as_str()));
        let members: Vec<Label> = labels
            .iter()
            .filter(|label| label.group.as_deref() == Some(key.as_str()))
            .cloned()
            .collect();
        let alone = resolve_label_positions(&members, spacing);

        let mut alone = alone.iter();
        for (input, output) in labels.iter().zip(&grouped) {
            if input.group.as_deref() == Some(key.as_str()) {
                let expected = alone.next().expect("member");
                prop_assert!(output.visible);
                prop_assert_eq!(output.label.position, expected.position);
            } else {
                prop_assert!(!output.visible);
                prop_assert_eq!(output.label.position, input.anchor);
            }
        }
    }
}
