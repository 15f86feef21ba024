// src/plotting/stats.rs
//
// Depth statistics shown in plot captions

use std::collections::BTreeMap;

/// Structure for storing depth statistics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverageStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// Calculate statistics from binned (position, depth) points
pub fn calculate_coverage_stats(points: &[(i64, f64)]) -> CoverageStats {
    let values: Vec<f64> = points.iter().map(|&(_, y)| y).collect();
    stats_from_values(values)
}

/// Calculate per-base statistics from a depth histogram (depth -> positions)
pub fn calculate_histogram_stats(histogram: &BTreeMap<u32, u64>) -> CoverageStats {
    let count: u64 = histogram.values().sum();
    if count == 0 {
        return CoverageStats::default();
    }

    let sum: f64 = histogram.iter().map(|(&d, &n)| d as f64 * n as f64).sum();
    let mean = sum / count as f64;

    let median = (value_at(histogram, (count - 1) / 2) + value_at(histogram, count / 2)) / 2.0;

    let min = histogram.keys().next().copied().unwrap_or(0) as f64;
    let max = histogram.keys().next_back().copied().unwrap_or(0) as f64;

    // Sample standard deviation
    let variance = if count > 1 {
        histogram
            .iter()
            .map(|(&d, &n)| (d as f64 - mean).powi(2) * n as f64)
            .sum::<f64>()
            / (count - 1) as f64
    } else {
        0.0
    };

    CoverageStats {
        mean,
        median,
        min,
        max,
        stddev: variance.sqrt(),
    }
}

/// Depth at the 0-based `index` of the sorted per-base values
fn value_at(histogram: &BTreeMap<u32, u64>, index: u64) -> f64 {
    let mut seen = 0;
    for (&depth, &n) in histogram {
        seen += n;
        if seen > index {
            return depth as f64;
        }
    }
    0.0
}

fn stats_from_values(mut values: Vec<f64>) -> CoverageStats {
    if values.is_empty() {
        return CoverageStats::default();
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mean = values.iter().sum::<f64>() / values.len() as f64;

    let median = if values.len() % 2 == 0 {
        let mid = values.len() / 2;
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[values.len() / 2]
    };

    let min = values[0];
    let max = values[values.len() - 1];

    // Sample standard deviation
    let variance = if values.len() > 1 {
        values.iter().map(|&v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64
    } else {
        0.0
    };

    CoverageStats {
        mean,
        median,
        min,
        max,
        stddev: variance.sqrt(),
    }
}
