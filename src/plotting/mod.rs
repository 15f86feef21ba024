// src/plotting/mod.rs
// Coverage plot drawn from the samtools depth table

pub mod stats;
pub mod themes;
pub mod utils;

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, warn};

use crate::io::ReferenceDepth;
use crate::plotting::stats::{calculate_coverage_stats, calculate_histogram_stats};
use crate::plotting::themes::ColorTheme;
use crate::plotting::utils::{calculate_bin_size, color_for_depth, format_bin_size, format_number};

/// References drawn at most; the deepest ones are kept
pub const MAX_PANELS: usize = 12;

const WIDTH: u32 = 2000;
const PANEL_HEIGHT: u32 = 320;
const TITLE_HEIGHT: u32 = 80;

/// Pick the references to draw: those with data, at most `MAX_PANELS`
/// of the deepest, kept in file order.
pub fn select_references(references: &[ReferenceDepth]) -> Vec<&ReferenceDepth> {
    let mut ranked: Vec<(usize, f64)> = references
        .iter()
        .enumerate()
        .filter(|(_, r)| !r.is_empty())
        .map(|(i, r)| (i, r.mean()))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(MAX_PANELS);

    let mut keep: Vec<usize> = ranked.into_iter().map(|(i, _)| i).collect();
    keep.sort_unstable();
    keep.into_iter().map(|i| &references[i]).collect()
}

/// Draw one depth panel per reference into a PNG.
///
/// Each panel is binned to suit the reference span, colored by relative
/// depth and overlaid with the panel mean.
pub fn plot_coverage(
    references: &[ReferenceDepth],
    output_path: &Path,
    theme: &ColorTheme,
) -> Result<(), Box<dyn std::error::Error>> {
    let selected = select_references(references);
    if selected.is_empty() {
        return Err("no depth data to plot".into());
    }
    let with_data = references.iter().filter(|r| !r.is_empty()).count();
    if with_data > selected.len() {
        warn!(
            "plotting the {} deepest of {} references",
            selected.len(),
            with_data
        );
    }

    let height = TITLE_HEIGHT + PANEL_HEIGHT * selected.len() as u32;
    let root = BitMapBackend::new(output_path, (WIDTH, height)).into_drawing_area();
    root.fill(&theme.base)?;

    let (title_area, body) = root.split_vertically(TITLE_HEIGHT as i32);
    title_area.draw_text(
        &format!("Per-base depth ({} references)", selected.len()),
        &("sans-serif", 36).into_font().color(&theme.text),
        (40, 20),
    )?;

    let panels = body.split_evenly((selected.len(), 1));
    for (panel, reference) in panels.iter().zip(selected.iter()) {
        draw_panel(panel, reference, theme)?;
    }

    root.present()?;
    Ok(())
}

fn draw_panel(
    panel: &DrawingArea<BitMapBackend<'_>, Shift>,
    reference: &ReferenceDepth,
    theme: &ColorTheme,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some((start, end)) = reference.span() else {
        return Ok(());
    };
    let bin_size = calculate_bin_size(end - start).max(reference.bin_size());
    let points = reference.binned(bin_size);

    let per_base = calculate_histogram_stats(reference.histogram());
    let binned = calculate_coverage_stats(&points);
    debug!(
        "{}: {} positions, bin {}, max binned depth {:.2}",
        reference.name,
        reference.positions(),
        bin_size,
        binned.max
    );

    let y_max = if binned.max < 3.0 { 3.0 } else { binned.max * 1.1 };
    let x_start = (start / bin_size * bin_size) as i64;
    let x_end = end as i64 + bin_size as i64;

    panel.fill(&theme.overlay)?;
    let mut chart = ChartBuilder::on(panel)
        .margin(20)
        .caption(
            format!(
                "{}  |  mean {:.2} (sd {:.2})  median {:.1}  range {:.0}-{:.0}  |  bin {}",
                reference.name,
                per_base.mean,
                per_base.stddev,
                per_base.median,
                per_base.min,
                per_base.max,
                format_bin_size(bin_size)
            ),
            ("sans-serif", 24).into_font().color(&theme.text),
        )
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(x_start..x_end, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Position (bp)")
        .y_desc("Depth")
        .axis_desc_style(("sans-serif", 18).into_font().color(&theme.text))
        .x_label_formatter(&|x| format_number((*x).max(0) as u64))
        .x_labels(12)
        .label_style(("sans-serif", 14).into_font().color(&theme.text))
        .axis_style(&theme.text)
        .draw()?;

    chart.draw_series(points.iter().map(|&(x, y)| {
        let color = color_for_depth(y, binned.max, theme);
        Rectangle::new([(x, 0.0), (x + bin_size as i64, y)], color.filled())
    }))?;

    chart.draw_series(LineSeries::new(
        vec![(x_start, per_base.mean), (x_end, per_base.mean)],
        theme.accent.stroke_width(2),
    ))?;

    Ok(())
}
