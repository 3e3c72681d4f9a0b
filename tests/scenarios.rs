use std::ops::ControlFlow;

use filterplot::{
    Axis, AxisScale, CoordinateMapper, DrawStyle, FixedMetrics, FnSource, InitError,
    LOG_TOLERANCE, PlotDescriptor, PlotError, PointSource, RenderCommand, RenderList,
    SampleSource, ScreenRect, WithProgress, plot, plot_status,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    Init,
    Sample,
    Progress,
    End,
}

/// Source that logs every callback.
struct Recorder {
    calls: Vec<Call>,
    fail_init: bool,
    stop_after: Option<usize>,
    function: fn(f64) -> f64,
}

impl Recorder {
    fn new(function: fn(f64) -> f64) -> Self {
        Self {
            calls: Vec::new(),
            fail_init: false,
            stop_after: None,
            function,
        }
    }

    fn count(&self, call: Call) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }
}

impl SampleSource for Recorder {
    fn init(&mut self, _start: f64, _stop: f64) -> Result<Option<usize>, InitError> {
        self.calls.push(Call::Init);
        if self.fail_init {
            Err(InitError::new("filter not designed"))
        } else {
            Ok(None)
        }
    }

    fn sample(&mut self, x: &mut f64) -> f64 {
        self.calls.push(Call::Sample);
        (self.function)(*x)
    }

    fn end(&mut self) {
        self.calls.push(Call::End);
    }

    fn progress(&mut self, _fraction: f64) -> ControlFlow<()> {
        self.calls.push(Call::Progress);
        if Some(self.count(Call::Progress)) == self.stop_after {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

fn area() -> ScreenRect {
    ScreenRect::from_origin_size(0.0, 0.0, 480.0, 320.0)
}

fn descriptor(x: Axis, y: Axis) -> PlotDescriptor {
    PlotDescriptor::builder().x_axis(x).y_axis(y).area(area()).build()
}

#[test]
fn linear_mapping_of_frequency_axis() {
    let mapper = CoordinateMapper::new(0.0, 350.0, 0.0, 10_000.0, AxisScale::Linear);
    assert_eq!(mapper.forward(5_000.0), 175.0);
    assert_eq!(mapper.forward(0.0), 0.0);
    assert_eq!(mapper.forward(10_000.0), 350.0);
}

#[test]
fn log_mapping_onto_flipped_screen_axis() {
    let mapper = CoordinateMapper::new(240.0, 0.0, 1.0, 1000.0, AxisScale::Log10);
    assert!((mapper.forward(10.0) - 160.0).abs() < 1e-9);
    assert!((mapper.inverse(160.0) - 10.0).abs() < 1e-9);
}

#[test]
fn callback_order_is_init_samples_end() {
    let mut desc = descriptor(Axis::new("x", 0.0, 1.0), Axis::new("y", 0.0, 1.0));
    desc.samples = 3;
    let mut source = Recorder::new(|x| x);
    let taken = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source);
    assert_eq!(taken, Ok(3));
    assert_eq!(
        source.calls,
        vec![
            Call::Init,
            Call::Sample,
            Call::Progress,
            Call::Sample,
            Call::Progress,
            Call::Sample,
            Call::Progress,
            Call::End,
        ]
    );
}

#[test]
fn cancelled_plot_reports_partial_count() {
    let mut desc = descriptor(Axis::new("x", 0.0, 1.0), Axis::new("y", -2.0, 2.0));
    desc.samples = 50;
    let mut source = Recorder::new(f64::sin);
    source.stop_after = Some(7);
    let result = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source);
    assert_eq!(result, Ok(7));
    assert_eq!(plot_status(&result), 7);
    assert_eq!(source.count(Call::Sample), 7);
    assert_eq!(source.count(Call::End), 1);
    assert_eq!(source.calls.last(), Some(&Call::End));
}

#[test]
fn closure_source_with_progress_hook() {
    let mut desc = descriptor(Axis::new("x", 0.0, 1.0), Axis::new("y", 0.0, 1.0));
    desc.samples = 20;
    let mut fractions = Vec::new();
    let mut source = WithProgress::new(FnSource::new(|x: f64| x * x), |fraction| {
        fractions.push(fraction);
        ControlFlow::Continue(())
    });
    let taken = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source);
    drop(source);
    assert_eq!(taken, Ok(20));
    assert_eq!(fractions.len(), 20);
    assert_eq!(fractions.last(), Some(&1.0));
    assert!(fractions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn init_failure_is_reported_without_drawing() {
    let mut desc = descriptor(Axis::new("x", 0.0, 1.0), Axis::new("y", 0.0, 1.0));
    let mut source = Recorder::new(|x| x);
    source.fail_init = true;
    let mut list = RenderList::new();
    let result = plot(&mut list, &FixedMetrics::default(), &mut desc, &mut source);
    assert!(matches!(result, Err(PlotError::Init(_))));
    assert_eq!(plot_status(&result), -5);
    assert_eq!(source.calls, vec![Call::Init]);
    assert!(list.is_empty());
}

#[test]
fn invalid_log_axis_fails_before_init() {
    let mut desc = descriptor(
        Axis::new("f", -10.0, 0.0).logarithmic(true),
        Axis::new("y", 0.0, 1.0),
    );
    let mut source = Recorder::new(|x| x);
    let result = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source);
    assert_eq!(result.as_ref().map_err(PlotError::code), Err(-2));
    assert!(source.calls.is_empty());
}

#[test]
fn log_axis_clamps_zero_start() {
    let mut desc = descriptor(
        Axis::new("f", 0.0, 1000.0).logarithmic(true),
        Axis::new("y", 0.0, 2.0),
    );
    let mut source = FnSource::new(|x: f64| 1.0 / (1.0 + x));
    let taken = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source);
    assert!(taken.is_ok());
    assert_eq!(desc.x.start, LOG_TOLERANCE);
}

#[test]
fn log_autoscale_ignores_non_positive_samples() {
    let mut desc = descriptor(
        Axis::new("x", 0.0, 1.0),
        Axis::new("y", 1.0, 10.0).logarithmic(true).autoscaled(true),
    );
    let mut source = FnSource::new(|x: f64| if x < 0.5 { -1.0 } else { 10.0 * x });
    plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source).unwrap();
    assert!(desc.y.start > 0.0 && desc.y.start < 5.0);
    assert!(desc.y.stop > 10.0);
}

#[test]
fn singular_sample_splits_line_but_counts() {
    let mut desc = descriptor(Axis::new("x", -4.5, 4.5), Axis::new("y", -10.0, 10.0));
    desc.samples = 10;
    let mut source = FnSource::new(|x: f64| if x.abs() < 1.0 { f64::INFINITY } else { 1.0 / x });
    let mut list = RenderList::new();
    let taken = plot(&mut list, &FixedMetrics::default(), &mut desc, &mut source).unwrap();
    assert_eq!(taken, 10);
    // x = -0.5 and 0.5 are singular, leaving two runs of four points.
    let curve = list
        .commands()
        .iter()
        .rev()
        .find_map(|command| match command {
            RenderCommand::LineSegments { segments, .. } => Some(segments.len()),
            _ => None,
        })
        .unwrap();
    assert_eq!(curve, 6);
}

#[test]
fn circle_samples_without_connecting_line() {
    let mut desc = descriptor(Axis::new("n", 0.0, 4.0), Axis::new("h", -1.0, 1.0));
    desc.style = DrawStyle::CircleSample;
    desc.samples = 5;
    let mut source = FnSource::new(|n: f64| 0.8_f64.powf(n));
    let mut list = RenderList::new();
    assert_eq!(plot(&mut list, &FixedMetrics::default(), &mut desc, &mut source), Ok(5));

    let clip = list
        .commands()
        .iter()
        .position(|command| matches!(command, RenderCommand::ClipRect(_)))
        .unwrap();
    let curve = &list.commands()[clip + 1..list.commands().len() - 1];
    let mut stems = Vec::new();
    let mut markers = 0;
    for command in curve {
        match command {
            RenderCommand::LineSegments { segments, .. } => stems.extend(segments.iter().copied()),
            RenderCommand::Markers { points, .. } => markers += points.len(),
            other => panic!("unexpected curve command {other:?}"),
        }
    }
    assert_eq!(markers, 5);
    assert_eq!(stems.len(), 5);
    assert!(stems.iter().all(|stem| stem.is_vertical()));
}

#[test]
fn autoscale_is_idempotent() {
    let mut desc = descriptor(
        Axis::new("t", 0.0, 10.0),
        Axis::new("y", 0.0, 1.0).autoscaled(true),
    );
    let metrics = FixedMetrics::default();
    let mut source = FnSource::new(|t: f64| (-0.3 * t).exp() * (3.0 * t).cos());
    plot(&mut RenderList::new(), &metrics, &mut desc, &mut source).unwrap();
    let first = (desc.y.start, desc.y.stop);

    desc.area = area();
    plot(&mut RenderList::new(), &metrics, &mut desc, &mut source).unwrap();
    assert_eq!((desc.y.start, desc.y.stop), first);
    assert!(first.0 < -0.5 && first.1 > 1.0);
}

#[test]
fn markup_in_axis_names_is_not_drawn() {
    let mut desc = descriptor(
        Axis::new("<i>f</i>", 0.0, 1.0).with_unit(filterplot::units::FREQUENCY_UNITS[0]),
        Axis::new("|H|", 0.0, 1.0),
    );
    let mut list = RenderList::new();
    plot(&mut list, &FixedMetrics::default(), &mut desc, &mut FnSource::new(|x: f64| x)).unwrap();
    let texts: Vec<&str> = list.texts().collect();
    assert!(texts.contains(&"f [Hz]"));
    assert!(!texts.iter().any(|text| text.contains('<')));
}

#[test]
fn empty_point_list_takes_no_samples() {
    let mut desc = descriptor(Axis::new("re", -1.0, 1.0), Axis::new("im", -1.0, 1.0));
    desc.style = DrawStyle::Cross;
    let mut list = RenderList::new();
    let mut source = PointSource::new(Vec::new());
    assert_eq!(plot(&mut list, &FixedMetrics::default(), &mut desc, &mut source), Ok(0));
    assert!(!list
        .commands()
        .iter()
        .any(|command| matches!(command, RenderCommand::Markers { .. })));
}

/// Source that remembers every x it was asked for.
struct Positions {
    xs: Vec<f64>,
}

impl SampleSource for Positions {
    fn sample(&mut self, x: &mut f64) -> f64 {
        self.xs.push(*x);
        narrow_peak(*x)
    }
}

fn narrow_peak(x: f64) -> f64 {
    (-(x - 0.3).powi(2) * 1e5).exp()
}

#[test]
fn autoscale_dry_run_sees_the_rendered_positions() {
    let mut desc = descriptor(
        Axis::new("x", 0.0, 1.0),
        Axis::new("y", 0.0, 1.0).autoscaled(true),
    );
    let mut source = Positions { xs: Vec::new() };
    let taken = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut desc, &mut source)
        .unwrap();
    assert_eq!(taken, desc.area.width().round() as usize + 1);

    let xs = &source.xs;
    assert!(xs.len() >= 2 * taken);
    let rendered = &xs[xs.len() - taken..];
    let last_dry_run = &xs[xs.len() - 2 * taken..xs.len() - taken];
    assert_eq!(last_dry_run, rendered);
    assert!(rendered.iter().all(|x| narrow_peak(*x) <= desc.y.stop));
}

#[test]
fn autoscaled_axis_ignores_placeholder_range() {
    let mut flat = descriptor(
        Axis::new("x", 0.0, 1.0),
        Axis::new("y", 0.0, 0.0).autoscaled(true),
    );
    let mut source = FnSource::new(|x: f64| 2.0 * x - 1.0);
    assert!(plot(&mut RenderList::new(), &FixedMetrics::default(), &mut flat, &mut source).is_ok());
    assert!(flat.y.start < -1.0 && flat.y.stop > 1.0);

    let mut negative_log = descriptor(
        Axis::new("x", 0.0, 1.0),
        Axis::new("y", -1.0, 0.0).logarithmic(true).autoscaled(true),
    );
    let mut source = FnSource::new(|x: f64| 1.0 + 9.0 * x);
    let result = plot(&mut RenderList::new(), &FixedMetrics::default(), &mut negative_log, &mut source);
    assert!(result.is_ok());
    assert!(negative_log.y.start > 0.0 && negative_log.y.start < 1.0);
    assert!(negative_log.y.stop > 10.0);
}

#[test]
fn overflowing_autoscale_is_rejected_and_keeps_descriptor() {
    let mut desc = descriptor(
        Axis::new("x", 0.0, 1.0),
        Axis::new("y", 0.0, 1.0).autoscaled(true),
    );
    let mut source = Recorder::new(|x| if x < 0.5 { -f64::MAX } else { f64::MAX });
    let mut list = RenderList::new();
    let result = plot(&mut list, &FixedMetrics::default(), &mut desc, &mut source);
    assert!(matches!(result, Err(PlotError::NonFiniteBound { .. })));
    assert!(list.is_empty());
    assert_eq!(source.count(Call::End), 1);
    assert_eq!((desc.y.start, desc.y.stop), (0.0, 1.0));

    let mut near_top = descriptor(
        Axis::new("x", 0.0, 1.0),
        Axis::new("y", 0.0, 1.0).autoscaled(true),
    );
    let mut source = FnSource::new(|x: f64| f64::MAX - (1.0 - x) * (f64::MAX / 10.0));
    plot(&mut RenderList::new(), &FixedMetrics::default(), &mut near_top, &mut source).unwrap();
    assert_eq!(near_top.y.stop, f64::MAX);
    assert!(near_top.y.start.is_finite());
}
