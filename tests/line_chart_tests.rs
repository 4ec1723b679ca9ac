use std::sync::{Arc, Mutex};

use approx::assert_abs_diff_eq;
use chrono::{DateTime, TimeZone, Utc};
use dash_chart::api::{DateFormatterFn, SeriesTooltipFormatterFn};
use dash_chart::core::{LineConfig, ReferenceLine, SeriesPoint};
use dash_chart::render::{Color, LineStrokeStyle, NullRenderer, PathCommand};
use dash_chart::{
    ChartError, ChartEvent, ChartLayoutConfig, ChartNotification, ChartObserver, LineChart,
    LineChartOptions,
};

const BLUE: Color = Color::rgb(0.2, 0.4, 0.9);
const ORANGE: Color = Color::rgb(0.95, 0.5, 0.1);

struct Recorder {
    seen: Arc<Mutex<Vec<ChartNotification>>>,
}

impl ChartObserver for Recorder {
    fn id(&self) -> &str {
        "line-recorder"
    }

    fn on_notification(&mut self, notification: &ChartNotification) {
        self.seen
            .lock()
            .expect("recorder lock")
            .push(notification.clone());
    }
}

fn two_series() -> LineChartOptions {
    LineChartOptions::new(vec![
        LineConfig::new("a", BLUE).with_name("Series A"),
        LineConfig::new("b", ORANGE).with_name("Series B"),
    ])
}

/// B has no sample on the middle date.
fn rows() -> Vec<SeriesPoint> {
    vec![
        SeriesPoint::new("2024-01-01").with_value("a", 10.0).with_value("b", 5.0),
        SeriesPoint::new("2024-01-02").with_value("a", 20.0).with_missing("b"),
        SeriesPoint::new("2024-01-03").with_value("a", 30.0).with_value("b", 15.0),
    ]
}

/// 800x300 with the default margins and the legend strip: plot x in 60..770.
fn chart(options: LineChartOptions) -> LineChart<NullRenderer> {
    let mut chart = LineChart::new(
        NullRenderer::default(),
        ChartLayoutConfig::new(800, 300),
        options,
    )
    .expect("chart init");
    chart.set_data(rows());
    chart
}

#[test]
fn series_share_one_time_axis() {
    let chart = chart(two_series());
    let layout = chart.layout();

    assert_eq!(layout.times.len(), 3);
    assert_abs_diff_eq!(layout.time_scale.project_millis(layout.times[0]), 60.0, epsilon = 1e-9);
    assert_abs_diff_eq!(layout.time_scale.project_millis(layout.times[1]), 415.0, epsilon = 1e-9);
    assert_abs_diff_eq!(layout.time_scale.project_millis(layout.times[2]), 770.0, epsilon = 1e-9);
    let (min, max) = layout.value_scale.domain();
    assert!(min <= 0.0 && max >= 30.0);
}

#[test]
fn missing_sample_breaks_the_line() {
    let chart = chart(two_series());
    let series = chart.series();

    assert_eq!(series[0].runs.len(), 1);
    assert_eq!(series[0].runs[0].points.len(), 3);
    assert!(series[0].markers.is_empty());

    // B's samples are isolated by the gap, so each becomes a marker.
    assert!(series[1].runs.is_empty());
    assert_eq!(
        series[1].markers.iter().map(|m| m.index).collect::<Vec<_>>(),
        [0, 2]
    );
}

#[test]
fn gap_splits_longer_series_into_separate_paths() {
    let mut chart = chart(LineChartOptions::new(vec![LineConfig::new("v", BLUE)]));
    chart.set_data(
        [Some(1.0), Some(4.0), None, Some(2.0), Some(3.0)]
            .iter()
            .enumerate()
            .map(|(day, value)| {
                let date = Utc.with_ymd_and_hms(2024, 5, day as u32 + 1, 0, 0, 0).unwrap();
                match value {
                    Some(value) => SeriesPoint::new(date).with_value("v", *value),
                    None => SeriesPoint::new(date),
                }
            })
            .collect(),
    );

    let scene = chart.scene();
    assert_eq!(scene.paths.len(), 2);
    for path in &scene.paths {
        assert_eq!(path.commands.len(), 2);
        assert!(matches!(path.commands[1], PathCommand::LineTo { .. }));
    }
    assert!(scene.circles.is_empty());
}

#[test]
fn hover_lists_only_series_with_a_sample() {
    let mut chart = chart(two_series());
    let seen = Arc::new(Mutex::new(Vec::new()));
    chart
        .register_observer(Box::new(Recorder {
            seen: Arc::clone(&seen),
        }))
        .expect("register observer");

    let tooltip = chart.pointer_move(420.0, 100.0).expect("tooltip");
    assert_eq!(tooltip.label, "Jan 02");
    assert_eq!(tooltip.rows.len(), 1);
    assert_eq!(tooltip.rows[0].series_name, "Series A");
    assert_eq!(tooltip.rows[0].formatted_value, "20");
    assert_eq!(tooltip.rows[0].color, BLUE);

    let expected_y = chart.layout().value_scale.project(20.0) + 10.0;
    assert_abs_diff_eq!(tooltip.position.x, 425.0, epsilon = 1e-9);
    assert_abs_diff_eq!(tooltip.position.y, expected_y, epsilon = 1e-9);

    let scene = chart.scene();
    // One cursor line and a single active dot for series A.
    assert_eq!(scene.circles.len(), 3);
    assert!(
        scene
            .lines
            .iter()
            .any(|line| line.x1 == 415.0 && line.x2 == 415.0 && line.y1 == 20.0)
    );

    assert!(!chart.handle_event(ChartEvent::PointerMove { x: 410.0, y: 150.0 }));
    assert!(chart.handle_event(ChartEvent::PointerMove { x: 765.0, y: 150.0 }));
    assert_eq!(chart.hover().map(|state| state.nearest_index), Some(2));
    assert_eq!(chart.tooltip().map(|tooltip| tooltip.rows.len()), Some(2));
    assert!(chart.handle_event(ChartEvent::PointerLeave));

    let seen = seen.lock().expect("recorder lock");
    assert_eq!(seen.len(), 3);
    assert!(matches!(
        seen[0],
        ChartNotification::HoverChanged { index: 1, .. }
    ));
    assert!(matches!(
        seen[1],
        ChartNotification::HoverChanged { index: 2, .. }
    ));
    assert_eq!(seen[2], ChartNotification::HoverCleared);
}

#[test]
fn series_tooltip_formatter_controls_value_and_name() {
    let formatter: SeriesTooltipFormatterFn =
        Arc::new(|value: f64, name: &str| (format!("{value:.1} pts"), name.to_uppercase()));
    let mut chart = chart(two_series().with_tooltip_formatter(formatter));

    let tooltip = chart.pointer_move(61.0, 100.0).expect("tooltip");
    assert_eq!(tooltip.label, "Jan 01");
    assert_eq!(
        tooltip
            .rows
            .iter()
            .map(|row| (row.series_name.as_str(), row.formatted_value.as_str()))
            .collect::<Vec<_>>(),
        [("SERIES A", "10.0 pts"), ("SERIES B", "5.0 pts")]
    );
}

#[test]
fn date_formatter_labels_axis_and_tooltip() {
    let iso: DateFormatterFn =
        Arc::new(|date: DateTime<Utc>| date.format("%Y-%m-%d").to_string());
    let mut chart = chart(two_series().with_date_formatter(iso));

    let tooltip = chart.pointer_move(765.0, 100.0).expect("tooltip");
    assert_eq!(tooltip.label, "2024-01-03");
    assert!(chart.scene().texts.iter().any(|text| text.text.starts_with("2024-01-0")));
}

#[test]
fn clicks_and_outside_pointers_do_nothing() {
    let mut chart = chart(two_series());
    assert!(!chart.handle_event(ChartEvent::Click { x: 415.0, y: 100.0 }));
    assert!(chart.pointer_move(30.0, 100.0).is_none());
    assert!(chart.pointer_move(415.0, 290.0).is_none());
    assert!(chart.hover().is_none());
}

#[test]
fn render_counts_primitives() {
    let red = Color::rgb(0.8, 0.1, 0.1);
    let mut chart = chart(
        two_series()
            .with_y_domain(0.0, 40.0)
            .with_reference_line(ReferenceLine::new(25.0, red).with_label("goal"))
            .with_reference_line(ReferenceLine::new(80.0, red)),
    );
    chart.render().expect("render");

    let renderer = chart.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_path_count, 1);
    assert_eq!(renderer.last_circle_count, 2);
    // Two legend swatches.
    assert_eq!(renderer.last_rect_count, 2);

    let scene = chart.scene();
    let dashed = scene
        .lines
        .iter()
        .filter(|line| line.stroke_style == LineStrokeStyle::Dashed)
        .count();
    assert_eq!(dashed, 1);
    assert!(scene.texts.iter().any(|text| text.text == "goal"));
    assert!(scene.texts.iter().any(|text| text.text == "Series B"));
}

#[test]
fn legend_can_be_hidden() {
    let with_legend = chart(two_series());
    let without = chart(two_series().with_legend(false));

    assert!(without.layout().plot.height > with_legend.layout().plot.height);
    assert!(without.scene().rects.is_empty());
}

#[test]
fn empty_rows_render_nothing() {
    let mut chart = chart(two_series());
    chart.set_data(Vec::new());

    assert!(chart.scene().is_empty());
    assert!(chart.pointer_move(415.0, 100.0).is_none());
    chart.render().expect("render");
    assert_eq!(chart.renderer().last_path_count, 0);
}

#[test]
fn invalid_options_are_rejected() {
    let duplicate =
        LineChartOptions::new(vec![LineConfig::new("a", BLUE), LineConfig::new("a", ORANGE)]);
    assert!(matches!(
        LineChart::new(NullRenderer::default(), ChartLayoutConfig::default(), duplicate),
        Err(ChartError::InvalidConfig(_))
    ));

    let mut chart = chart(two_series());
    let bad_width =
        LineChartOptions::new(vec![LineConfig::new("a", BLUE).with_stroke_width(0.0)]);
    assert!(chart.set_options(bad_width).is_err());
    assert_eq!(chart.options().lines.len(), 2);
}

#[test]
fn container_narrower_than_margins_has_no_hover() {
    let mut chart = LineChart::new(
        NullRenderer::default(),
        ChartLayoutConfig::new(80, 300),
        two_series(),
    )
    .expect("chart init");
    chart.set_data(rows());

    assert_eq!(chart.layout().plot.width, 0.0);
    assert!(chart.scene().is_empty());
    assert!(chart.pointer_move(60.0, 100.0).is_none());
    assert!(chart.tooltip().is_none());
}
