// src/plotting/utils.rs
//
// Utility functions for plotting module

use plotters::style::RGBColor;

use crate::plotting::themes::ColorTheme;

/// Format a number with thousands separators
///
/// # Arguments
/// * `num` - Number to format
///
/// # Returns
/// * String with formatted number (e.g., "1,234,567")
pub fn format_number(num: u64) -> String {
    let num_str = num.to_string();
    let mut result = String::new();
    let len = num_str.len();

    for (i, c) in num_str.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Blend two colors based on a factor (0.0 to 1.0)
pub fn blend_colors(color1: &RGBColor, color2: &RGBColor, factor: f64) -> RGBColor {
    let factor = factor.clamp(0.0, 1.0);

    RGBColor(
        ((color1.0 as f64) * (1.0 - factor) + (color2.0 as f64) * factor) as u8,
        ((color1.1 as f64) * (1.0 - factor) + (color2.1 as f64) * factor) as u8,
        ((color1.2 as f64) * (1.0 - factor) + (color2.2 as f64) * factor) as u8,
    )
}

/// Bar color for a bin relative to the panel maximum
pub fn color_for_depth(depth: f64, max_depth: f64, theme: &ColorTheme) -> RGBColor {
    if max_depth <= 0.0 {
        return theme.low;
    }
    let rel = depth / max_depth;
    if rel < 0.3 {
        blend_colors(&theme.low, &theme.primary, rel / 0.3)
    } else if rel > 0.7 {
        blend_colors(&theme.primary, &theme.high, (rel - 0.7) / 0.3)
    } else {
        theme.primary
    }
}

/// Calculate appropriate bin size for a genomic range
///
/// # Arguments
/// * `range_size` - Size of the range in base pairs
///
/// # Returns
/// * Appropriate bin size in base pairs
pub fn calculate_bin_size(range_size: u32) -> u32 {
    if range_size > 100_000_000 {
        1_000_000     // 1Mb bins for very large regions (>100Mb)
    } else if range_size > 10_000_000 {
        100_000       // 100kb bins for large regions (>10Mb)
    } else if range_size > 1_000_000 {
        10_000        // 10kb bins for medium regions (>1Mb)
    } else if range_size > 100_000 {
        1_000         // 1kb bins for smaller regions (>100kb)
    } else if range_size > 10_000 {
        100           // 100bp bins for tiny regions (>10kb)
    } else {
        1             // No binning for very small regions
    }
}

/// Next width on the bin ladder used by `calculate_bin_size`.
///
/// Every width divides the next one, so merged bins stay exact.
pub fn next_bin_size(bin_size: u32) -> u32 {
    if bin_size < 100 {
        100
    } else {
        bin_size.saturating_mul(10)
    }
}

/// Format bin size for display (kb or Mb for large bins)
pub fn format_bin_size(bin_size: u32) -> String {
    if bin_size >= 1_000_000 {
        format!("{} Mb", bin_size / 1_000_000)
    } else if bin_size >= 1_000 {
        format!("{} kb", bin_size / 1_000)
    } else {
        format!("{} bp", bin_size)
    }
}
