use chrono::DateTime;
use dash_chart::core::{
    LineConfig, LinearScale, SeriesPoint, TimeScale, bind_series, monotone_path, project_series,
};
use dash_chart::render::{Color, PathCommand};
use proptest::prelude::*;

const DAY_SECONDS: i64 = 86_400;

fn records(samples: &[Option<f64>]) -> Vec<SeriesPoint> {
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let date = DateTime::from_timestamp(1_700_000_000 + i as i64 * DAY_SECONDS, 0)
                .expect("valid timestamp");
            let point = SeriesPoint::new(date);
            match sample {
                Some(value) => point.with_value("v", *value),
                None => point.with_missing("v"),
            }
        })
        .collect()
}

fn within(value: f64, a: f64, b: f64) -> bool {
    let eps = 1e-9 * (a.abs() + b.abs()).max(1.0);
    value >= a.min(b) - eps && value <= a.max(b) + eps
}

proptest! {
    #[test]
    fn missing_samples_always_split_runs(
        samples in prop::collection::vec(prop::option::weighted(0.75, -500.0f64..500.0), 1..120)
    ) {
        let lines = [LineConfig::new("v", Color::rgb(0.0, 0.0, 0.0))];
        let binding = bind_series(&records(&samples), &lines);
        let (start, end) = binding.time_domain.expect("non-empty");
        let time_scale = TimeScale::from_millis(start, end, (0.0, 1000.0));
        let value_scale = LinearScale::new((-500.0, 500.0), (400.0, 0.0));

        let geometry = project_series(&binding, 0, time_scale, value_scale);

        for run in &geometry.runs {
            prop_assert!(run.points.len() >= 2);
            for index in run.start_index..=run.end_index() {
                prop_assert!(samples[index].is_some(), "run bridges missing index {}", index);
            }
            let moves = run
                .commands
                .iter()
                .filter(|command| matches!(command, PathCommand::MoveTo { .. }))
                .count();
            prop_assert_eq!(moves, 1);
        }
        for marker in &geometry.markers {
            prop_assert!(samples[marker.index].is_some());
            let left_missing = marker.index == 0 || samples[marker.index - 1].is_none();
            let right_missing = samples.get(marker.index + 1).is_none_or(Option::is_none);
            prop_assert!(left_missing && right_missing);
        }

        let drawn: usize = geometry.runs.iter().map(|run| run.points.len()).sum::<usize>()
            + geometry.markers.len();
        prop_assert_eq!(drawn, samples.iter().flatten().count());
    }

    #[test]
    fn monotone_curve_never_overshoots_its_segment(
        ys in prop::collection::vec(-1_000.0f64..1_000.0, 3..64),
        gaps in prop::collection::vec(0.5f64..50.0, 64)
    ) {
        let mut x = 0.0;
        let points: Vec<(f64, f64)> = ys
            .iter()
            .zip(&gaps)
            .map(|(y, gap)| {
                x += gap;
                (x, *y)
            })
            .collect();

        let commands = monotone_path(&points);
        prop_assert_eq!(commands.len(), points.len());

        for (segment, command) in commands.iter().skip(1).enumerate() {
            let (xa, ya) = points[segment];
            let (xb, yb) = points[segment + 1];
            match *command {
                PathCommand::CubicTo { c1x, c1y, c2x, c2y, x, y } => {
                    prop_assert_eq!((x, y), (xb, yb));
                    prop_assert!(within(c1y, ya, yb), "c1y {} outside [{}, {}]", c1y, ya, yb);
                    prop_assert!(within(c2y, ya, yb), "c2y {} outside [{}, {}]", c2y, ya, yb);
                    prop_assert!(within(c1x, xa, xb) && within(c2x, xa, xb));
                }
                other => prop_assert!(false, "unexpected command {:?}", other),
            }
        }
    }
}

#[test]
fn single_defined_sample_renders_marker_only() {
    let lines = [LineConfig::new("v", Color::rgb(0.0, 0.0, 0.0))];
    let binding = bind_series(&records(&[None, Some(3.0), None]), &lines);
    let (start, end) = binding.time_domain.expect("non-empty");
    let geometry = project_series(
        &binding,
        0,
        TimeScale::from_millis(start, end, (0.0, 100.0)),
        LinearScale::new((0.0, 10.0), (100.0, 0.0)),
    );

    assert!(geometry.runs.is_empty());
    assert_eq!(geometry.markers.len(), 1);
    assert_eq!(geometry.markers[0].index, 1);
    assert_eq!(geometry.markers[0].x, 50.0);
}
