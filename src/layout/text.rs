use crate::config::SlopeChartConfig;
use crate::text_metrics;
use crate::theme::Theme;

/// Width of a bubble holding `text`: measured text plus horizontal padding
/// on both sides.
pub(super) fn bubble_width(text: &str, theme: &Theme, config: &SlopeChartConfig) -> f32 {
    let text_w = text_width(
        text,
        config.bubble_font_size,
        theme.font_family.as_str(),
        config.fast_text_metrics,
    );
    text_w + config.bubble_padding * 2.0
}

pub fn text_width(text: &str, font_size: f32, font_family: &str, fast_metrics: bool) -> f32 {
    if fast_metrics {
        return fallback_text_width(text, font_size);
    }
    text_metrics::measure_text_width(text, font_size, font_family)
        .unwrap_or_else(|| fallback_text_width(text, font_size))
}

// Rough proportional widths for a sans-serif face, in ems.
fn char_width_factor(ch: char) -> f32 {
    match ch {
        ' ' | 'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '!' | '|' | '\'' => 0.28,
        'f' | 't' | 'r' | '(' | ')' | '[' | ']' | '-' => 0.36,
        'm' | 'w' => 0.84,
        'M' | 'W' | '@' | '%' => 0.92,
        'I' => 0.28,
        c if c.is_ascii_digit() => 0.6,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii_lowercase() => 0.56,
        c if c.is_ascii() => 0.5,
        // CJK and other wide scripts
        _ => 1.0,
    }
}

fn fallback_text_width(text: &str, font_size: f32) -> f32 {
    text.chars().map(char_width_factor).sum::<f32>() * font_size
}
