use serde::{Deserialize, Serialize};

use crate::core::binding::SeriesBinding;
use crate::core::{LinearScale, TimeScale};
use crate::render::PathCommand;

/// One contiguous run of defined samples, drawn as a single path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRun {
    /// Bound index of the first sample in the run.
    pub start_index: usize,
    pub points: Vec<(f64, f64)>,
    pub commands: Vec<PathCommand>,
}

impl SeriesRun {
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.start_index + self.points.len() - 1
    }
}

/// A sample with no defined neighbour on either side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesMarker {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Pixel geometry for one declared series.
///
/// Runs are disjoint: a missing sample always ends the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesGeometry {
    pub series_index: usize,
    pub key: String,
    pub runs: Vec<SeriesRun>,
    pub markers: Vec<SeriesMarker>,
}

/// Projects one series of `binding` into runs and isolated markers.
#[must_use]
pub fn project_series(
    binding: &SeriesBinding,
    series_index: usize,
    time_scale: TimeScale,
    value_scale: LinearScale,
) -> SeriesGeometry {
    let mut runs = Vec::new();
    let mut markers = Vec::new();
    let mut current: Option<(usize, Vec<(f64, f64)>)> = None;

    for (index, point) in binding.points.iter().enumerate() {
        match point.values.get(series_index).copied().flatten() {
            Some(value) => {
                let xy = (
                    time_scale.project_millis(point.time_ms),
                    value_scale.project(value),
                );
                current
                    .get_or_insert_with(|| (index, Vec::new()))
                    .1
                    .push(xy);
            }
            None => {
                if let Some((start, points)) = current.take() {
                    close_run(start, points, &mut runs, &mut markers);
                }
            }
        }
    }
    if let Some((start, points)) = current.take() {
        close_run(start, points, &mut runs, &mut markers);
    }

    SeriesGeometry {
        series_index,
        key: binding.keys.get(series_index).cloned().unwrap_or_default(),
        runs,
        markers,
    }
}

/// Projects every declared series.
///
/// With the `parallel-projection` feature each series is built on the rayon
/// pool; output order and content match the sequential build.
#[must_use]
pub fn project_all_series(
    binding: &SeriesBinding,
    time_scale: TimeScale,
    value_scale: LinearScale,
) -> Vec<SeriesGeometry> {
    #[cfg(feature = "parallel-projection")]
    {
        use rayon::prelude::*;

        (0..binding.keys.len())
            .into_par_iter()
            .map(|series_index| project_series(binding, series_index, time_scale, value_scale))
            .collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        (0..binding.keys.len())
            .map(|series_index| project_series(binding, series_index, time_scale, value_scale))
            .collect()
    }
}

fn close_run(
    start: usize,
    points: Vec<(f64, f64)>,
    runs: &mut Vec<SeriesRun>,
    markers: &mut Vec<SeriesMarker>,
) {
    match points.as_slice() {
        [] => {}
        [(x, y)] => markers.push(SeriesMarker {
            index: start,
            x: *x,
            y: *y,
        }),
        _ => {
            let commands = monotone_path(&points);
            runs.push(SeriesRun {
                start_index: start,
                points,
                commands,
            });
        }
    }
}

/// Monotone cubic interpolation along x (Steffen-style tangents).
///
/// Tangents are limited by the neighbouring secants, so every control point
/// stays within the y-range of its own segment: the curve never overshoots
/// a local extremum. Two points produce a straight line.
#[must_use]
pub fn monotone_path(points: &[(f64, f64)]) -> Vec<PathCommand> {
    let Some(&(x0, y0)) = points.first() else {
        return Vec::new();
    };
    let mut commands = Vec::with_capacity(points.len());
    commands.push(PathCommand::MoveTo { x: x0, y: y0 });

    if points.len() < 2 {
        return commands;
    }
    if points.len() == 2 {
        let (x, y) = points[1];
        commands.push(PathCommand::LineTo { x, y });
        return commands;
    }

    let last = points.len() - 1;
    let mut tangents = vec![0.0; points.len()];
    for i in 1..last {
        tangents[i] = interior_tangent(points[i - 1], points[i], points[i + 1]);
    }
    tangents[0] = endpoint_tangent(points[0], points[1], tangents[1]);
    tangents[last] = endpoint_tangent(points[last - 1], points[last], tangents[last - 1]);

    for i in 0..last {
        let (xa, ya) = points[i];
        let (xb, yb) = points[i + 1];
        let dx = (xb - xa) / 3.0;
        commands.push(PathCommand::CubicTo {
            c1x: xa + dx,
            c1y: ya + dx * tangents[i],
            c2x: xb - dx,
            c2y: yb - dx * tangents[i + 1],
            x: xb,
            y: yb,
        });
    }
    commands
}

fn secant(a: (f64, f64), b: (f64, f64)) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 { 0.0 } else { (b.1 - a.1) / h }
}

fn sign(value: f64) -> f64 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

fn interior_tangent(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64)) -> f64 {
    let h0 = p1.0 - p0.0;
    let h1 = p2.0 - p1.0;
    if h0 + h1 == 0.0 {
        return 0.0;
    }
    let s0 = secant(p0, p1);
    let s1 = secant(p1, p2);
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let tangent = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if tangent.is_finite() { tangent } else { 0.0 }
}

fn endpoint_tangent(a: (f64, f64), b: (f64, f64), neighbour: f64) -> f64 {
    let h = b.0 - a.0;
    if h == 0.0 {
        return neighbour;
    }
    (3.0 * (b.1 - a.1) / h - neighbour) / 2.0
}
