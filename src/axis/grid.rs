//! Background grid subdivision between major ticks.

/// Largest subdivision factor `m` such that splitting each major interval
/// into `m` parts yields at most `grid_max` grid lines.
///
/// Never returns less than 1. With fewer than two major ticks there is no
/// interval to split.
pub fn highest_minor_mod(major_count: usize, grid_max: usize) -> usize {
    if major_count < 2 {
        return 1;
    }
    (grid_max.saturating_sub(1) / (major_count - 1)).max(1)
}

/// Major tick positions plus `m - 1` evenly interpolated positions between
/// each consecutive pair, where `m = highest_minor_mod(majors.len(), grid_max)`.
///
/// The output length is `(majors.len() - 1) * m + 1` and always ends with the
/// last major tick. Major values are copied through unchanged so callers can
/// match them exactly when styling.
pub fn minor_grid_ticks(majors: &[f64], grid_max: usize) -> Vec<f64> {
    let Some(&last) = majors.last() else {
        return Vec::new();
    };

    let m = highest_minor_mod(majors.len(), grid_max);
    let mut grid = Vec::with_capacity((majors.len() - 1) * m + 1);
    for pair in majors.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        grid.push(start);
        let distance = end - start;
        for i in 1..m {
            grid.push(start + (i as f64 / m as f64) * distance);
        }
    }
    grid.push(last);
    grid
}
