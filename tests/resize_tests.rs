use std::sync::{Arc, Mutex};
use std::thread;

use approx::assert_abs_diff_eq;
use dash_chart::core::{BarPoint, LineConfig, SeriesPoint};
use dash_chart::render::{Color, NullRenderer};
use dash_chart::{
    BarChart, BarChartOptions, ChartEvent, ChartLayoutConfig, ChartNotification, ChartObserver,
    LineChart, LineChartOptions,
};

struct Recorder(Arc<Mutex<Vec<ChartNotification>>>);

impl ChartObserver for Recorder {
    fn id(&self) -> &str {
        "resize-recorder"
    }

    fn on_notification(&mut self, notification: &ChartNotification) {
        self.0.lock().expect("recorder lock").push(notification.clone());
    }
}

fn bar_chart() -> BarChart<NullRenderer> {
    let mut chart = BarChart::new(
        NullRenderer::default(),
        ChartLayoutConfig::new(800, 300),
        BarChartOptions::default().with_max_value(100.0),
    )
    .expect("chart init");
    chart.set_data(vec![
        BarPoint::new("Docker", 68.0),
        BarPoint::new("AWS", 55.0),
        BarPoint::new("GraphQL", 23.0),
    ]);
    chart
}

fn line_chart() -> LineChart<NullRenderer> {
    let mut chart = LineChart::new(
        NullRenderer::default(),
        ChartLayoutConfig::new(800, 300),
        LineChartOptions::new(vec![LineConfig::new("v", Color::rgb(0.1, 0.5, 0.3))]),
    )
    .expect("chart init");
    chart.set_data(vec![
        SeriesPoint::new("2024-01-01").with_value("v", 3.0),
        SeriesPoint::new("2024-01-02").with_value("v", 9.0),
        SeriesPoint::new("2024-01-03").with_value("v", 6.0),
    ]);
    chart
}

#[test]
fn same_width_produces_identical_scene() {
    let mut chart = bar_chart();
    assert!(chart.resize(640.0));
    let first = chart.scene();

    assert!(chart.resize(900.0));
    assert_ne!(chart.scene(), first);
    assert!(chart.resize(640.0));
    assert_eq!(chart.scene(), first);

    let mut lines = line_chart();
    lines.resize(500.0);
    let first = lines.scene();
    lines.resize(1200.0);
    lines.resize(500.0);
    assert_eq!(lines.scene(), first);
}

#[test]
fn bars_rescale_with_container_width() {
    let mut chart = bar_chart();
    assert!(chart.handle_event(ChartEvent::Resize { width: 1000.0 }));

    assert_eq!(chart.viewport().width, 1000);
    assert_abs_diff_eq!(chart.bars()[0].width, 0.68 * 910.0, epsilon = 1e-9);
}

#[test]
fn repeated_or_tiny_changes_do_not_relayout() {
    let mut chart = bar_chart();
    assert!(!chart.resize(800.0));
    assert!(!chart.resize(800.3));
    assert!(!chart.resize(f64::NAN));
    assert!(!chart.resize(-20.0));
    assert_eq!(chart.config().width, 800);
}

#[test]
fn queued_widths_from_another_thread_collapse_to_the_last() {
    let mut chart = bar_chart();
    let seen = Arc::new(Mutex::new(Vec::new()));
    chart
        .register_observer(Box::new(Recorder(Arc::clone(&seen))))
        .expect("register observer");

    let sender = chart.resize_sender();
    thread::spawn(move || {
        for width in [640.0, 700.0, 720.0] {
            assert!(sender.notify(width));
        }
    })
    .join()
    .expect("sender thread");

    assert!(chart.process_pending_resize());
    assert!(!chart.process_pending_resize());
    assert_eq!(chart.config().width, 720);
    assert_eq!(
        *seen.lock().expect("recorder lock"),
        vec![ChartNotification::Relayout {
            width: 720,
            height: 300,
        }]
    );
}

#[test]
fn bar_hover_survives_relayout_with_fresh_position() {
    let mut chart = bar_chart();
    let before = chart.pointer_move(100.0, 40.0).expect("tooltip");
    let seen = Arc::new(Mutex::new(Vec::new()));
    chart
        .register_observer(Box::new(Recorder(Arc::clone(&seen))))
        .expect("register observer");

    assert!(chart.resize(1000.0));

    let after = chart.tooltip().expect("hover kept");
    assert_eq!(after.label, before.label);
    assert_eq!(chart.hover().map(|state| state.nearest_index), Some(0));
    assert_abs_diff_eq!(after.position.x, 60.0 + 0.68 * 910.0 + 10.0, epsilon = 1e-9);
    assert_eq!(
        *seen.lock().expect("recorder lock"),
        vec![
            ChartNotification::HoverChanged {
                index: 0,
                tooltip: after,
            },
            ChartNotification::Relayout {
                width: 1000,
                height: 300,
            },
        ]
    );
}

#[test]
fn line_hover_survives_relayout() {
    let mut chart = line_chart();
    let before = chart.pointer_move(415.0, 100.0).expect("tooltip");
    assert_eq!(before.label, "Jan 02");

    let seen = Arc::new(Mutex::new(Vec::new()));
    chart
        .register_observer(Box::new(Recorder(Arc::clone(&seen))))
        .expect("register observer");

    assert!(chart.resize(600.0));

    let after = chart.tooltip().expect("hover kept");
    assert_eq!(after.label, "Jan 02");
    assert_abs_diff_eq!(after.position.x, 60.0 + 255.0 + 10.0, epsilon = 1e-9);
    let seen = seen.lock().expect("recorder lock");
    assert_eq!(seen.len(), 2);
    assert_eq!(
        seen[0],
        ChartNotification::HoverChanged {
            index: 1,
            tooltip: after,
        }
    );
}
