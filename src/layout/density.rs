// Rank pay distribution drawn behind the right column: a Gaussian kernel
// density estimate, rotated so density grows leftward from the rank line.

use std::f32::consts::PI;

/// Density of `values` at every threshold.
pub(super) fn kernel_density(values: &[f32], thresholds: &[f32], bandwidth: f32) -> Vec<(f32, f32)> {
    let norm = 1.0 / (bandwidth * (2.0 * PI).sqrt());
    thresholds
        .iter()
        .map(|&t| {
            let sum: f32 = values
                .iter()
                .map(|v| {
                    let z = (t - v) / bandwidth;
                    norm * (-0.5 * z * z).exp()
                })
                .sum();
            (t, sum)
        })
        .collect()
}

/// `count` evenly spaced thresholds in `[0, max)`.
pub(super) fn thresholds(max: f32, count: usize) -> Vec<f32> {
    if max <= 0.0 || count == 0 {
        return Vec::new();
    }
    let step = max / count as f32;
    (0..count).map(|idx| idx as f32 * step).collect()
}

/// Uniform cubic B-spline through `points` as SVG path data. The curve
/// starts and ends on the first and last points and is pulled toward the
/// interior ones without passing through them.
pub(super) fn basis_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    match points {
        [] => return d,
        [only] => {
            d.push_str(&format!("M{:.2},{:.2}", only.0, only.1));
            return d;
        }
        [a, b] => {
            d.push_str(&format!("M{:.2},{:.2}L{:.2},{:.2}", a.0, a.1, b.0, b.1));
            return d;
        }
        _ => {}
    }

    let (p0, p1) = (points[0], points[1]);
    d.push_str(&format!("M{:.2},{:.2}", p0.0, p0.1));
    d.push_str(&format!(
        "L{:.2},{:.2}",
        (5.0 * p0.0 + p1.0) / 6.0,
        (5.0 * p0.1 + p1.1) / 6.0
    ));
    let (mut a, mut b) = (p0, p1);
    for &c in &points[2..] {
        push_basis_segment(&mut d, a, b, c);
        a = b;
        b = c;
    }
    push_basis_segment(&mut d, a, b, b);
    d.push_str(&format!("L{:.2},{:.2}", b.0, b.1));
    d
}

fn push_basis_segment(d: &mut String, a: (f32, f32), b: (f32, f32), c: (f32, f32)) {
    d.push_str(&format!(
        "C{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
        (2.0 * a.0 + b.0) / 3.0,
        (2.0 * a.1 + b.1) / 3.0,
        (a.0 + 2.0 * b.0) / 3.0,
        (a.1 + 2.0 * b.1) / 3.0,
        (a.0 + 4.0 * b.0 + c.0) / 6.0,
        (a.1 + 4.0 * b.1 + c.1) / 6.0
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_peaks_at_the_sample() {
        let ts = thresholds(200.0, 20);
        let density = kernel_density(&[100.0], &ts, 10.0);
        let peak = density
            .iter()
            .copied()
            .fold((0.0f32, f32::MIN), |best, item| if item.1 > best.1 { item } else { best });
        assert_eq!(peak.0, 100.0);
        // Unit-area kernel: peak height is 1 / (bw * sqrt(2 pi)).
        assert!((peak.1 - 1.0 / (10.0 * (2.0 * PI).sqrt())).abs() < 1e-6);
    }

    #[test]
    fn thresholds_exclude_the_maximum() {
        let ts = thresholds(150.0, 150);
        assert_eq!(ts.len(), 150);
        assert_eq!(ts[0], 0.0);
        assert!(*ts.last().unwrap() < 150.0);
        assert!(thresholds(0.0, 10).is_empty());
    }

    #[test]
    fn basis_path_shapes() {
        assert_eq!(basis_path(&[]), "");
        assert_eq!(basis_path(&[(0.0, 0.0), (6.0, 6.0)]), "M0.00,0.00L6.00,6.00");
        let d = basis_path(&[(0.0, 0.0), (6.0, 0.0), (12.0, 0.0)]);
        assert!(d.starts_with("M0.00,0.00L1.00,0.00C"));
        assert!(d.ends_with("L12.00,0.00"));
        assert_eq!(d.matches('C').count(), 2);
    }
}
