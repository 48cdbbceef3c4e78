/// Continuous linear mapping from a pay domain onto a screen axis.
/// The slope chart uses an inverted range (larger pay, smaller y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f32, f32),
    range: (f32, f32),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f32, max: f32) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, start: f32, end: f32) -> Self {
        self.range = (start, end);
        self
    }

    pub fn scale(&self, value: f32) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / span * (r1 - r0)
    }

    /// Round tick values (1, 2 or 5 times a power of ten) inside the domain,
    /// roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        if count == 0 || !(hi - lo).is_finite() {
            return Vec::new();
        }
        if hi == lo {
            return vec![lo];
        }
        let step = tick_step(lo as f64, hi as f64, count);
        let first = (lo as f64 / step).ceil() as i64;
        let last = (hi as f64 / step).floor() as i64;
        (first..=last).map(|idx| (idx as f64 * step) as f32).collect()
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let rough = (hi - lo) / count.max(1) as f64;
    let magnitude = 10f64.powf(rough.log10().floor());
    let residual = rough / magnitude;
    let factor = if residual >= 7.07 {
        10.0
    } else if residual >= 3.16 {
        5.0
    } else if residual >= 1.41 {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

/// Axis label for a pay amount: `$1.2M` from a million up, `$150k` below.
pub fn format_pay_tick(value: f32) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else {
        format!("${:.0}k", value / 1_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_maps_max_to_top() {
        let scale = LinearScale::new().domain(0.0, 400.0).range(500.0, 100.0);
        assert_eq!(scale.scale(0.0), 500.0);
        assert_eq!(scale.scale(400.0), 100.0);
        assert_eq!(scale.scale(100.0), 400.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_middle() {
        let scale = LinearScale::new().domain(5.0, 5.0).range(0.0, 10.0);
        assert_eq!(scale.scale(5.0), 5.0);
        assert_eq!(scale.ticks(10), vec![5.0]);
    }

    #[test]
    fn ticks_use_round_steps() {
        let scale = LinearScale::new().domain(0.0, 430_000.0);
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first(), Some(&0.0));
        assert_eq!(ticks[1], 50_000.0);
        assert_eq!(ticks.last(), Some(&400_000.0));
    }

    #[test]
    fn ticks_stay_inside_domain() {
        let scale = LinearScale::new().domain(3.0, 97.0);
        let ticks = scale.ticks(10);
        assert!(ticks.iter().all(|tick| (3.0..=97.0).contains(tick)));
        assert_eq!(ticks, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]);
    }

    #[test]
    fn formats_axis_labels() {
        assert_eq!(format_pay_tick(150_000.0), "$150k");
        assert_eq!(format_pay_tick(1_260_000.0), "$1.3M");
        assert_eq!(format_pay_tick(0.0), "$0k");
    }
}
