use std::f64::consts::{PI, TAU};

use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

use filterplot::{
    FilterPlotView, InitError, ResponseKind, ResponseModel, ResponseSource, ScreenRect,
};

/// Second-order lowpass (RBJ cookbook).
struct Biquad {
    rate: f64,
    b: [f64; 3],
    a: [f64; 3],
    impulse: Vec<f64>,
}

impl Biquad {
    fn lowpass(rate: f64, cutoff: f64, q: f64) -> Self {
        let w0 = TAU * cutoff / rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos = w0.cos();
        let a0 = 1.0 + alpha;
        Self {
            rate,
            b: [
                (1.0 - cos) / 2.0 / a0,
                (1.0 - cos) / a0,
                (1.0 - cos) / 2.0 / a0,
            ],
            a: [1.0, -2.0 * cos / a0, (1.0 - alpha) / a0],
            impulse: Vec::new(),
        }
    }

    fn response(&self, frequency: f64) -> (f64, f64) {
        let w = TAU * frequency / self.rate;
        let eval = |c: &[f64; 3]| {
            let re = c[0] + c[1] * w.cos() + c[2] * (2.0 * w).cos();
            let im = -c[1] * w.sin() - c[2] * (2.0 * w).sin();
            (re, im)
        };
        let (nr, ni) = eval(&self.b);
        let (dr, di) = eval(&self.a);
        let den = dr * dr + di * di;
        ((nr * dr + ni * di) / den, (ni * dr - nr * di) / den)
    }

    fn phase(&self, frequency: f64) -> f64 {
        let (re, im) = self.response(frequency);
        im.atan2(re)
    }
}

impl ResponseModel for Biquad {
    fn sample_rate(&self) -> f64 {
        self.rate
    }

    fn prepare(&mut self, kind: ResponseKind) -> Result<(), InitError> {
        if kind.is_time_domain() {
            let mut state = [0.0; 4];
            self.impulse = (0..1024)
                .map(|n| {
                    let x = if n == 0 { 1.0 } else { 0.0 };
                    let y = self.b[0] * x + self.b[1] * state[0] + self.b[2] * state[1]
                        - self.a[1] * state[2]
                        - self.a[2] * state[3];
                    state = [x, state[0], y, state[2]];
                    y
                })
                .collect();
        }
        Ok(())
    }

    fn evaluate(&mut self, kind: ResponseKind, x: f64) -> f64 {
        let step = 1.0 / self.rate;
        match kind {
            ResponseKind::Magnitude => {
                let (re, im) = self.response(x);
                re.hypot(im)
            }
            ResponseKind::Attenuation => {
                let (re, im) = self.response(x);
                -20.0 * re.hypot(im).log10()
            }
            ResponseKind::Phase => self.phase(x),
            ResponseKind::PhaseDelay => {
                if x <= 0.0 {
                    f64::INFINITY
                } else {
                    -self.phase(x) / (TAU * x)
                }
            }
            ResponseKind::GroupDelay => {
                let h = self.rate * 1e-6;
                let mut delta = self.phase(x + h) - self.phase(x - h);
                if delta > PI {
                    delta -= TAU;
                } else if delta < -PI {
                    delta += TAU;
                }
                -delta / (TAU * 2.0 * h)
            }
            ResponseKind::Impulse => {
                let n = (x / step).round() as usize;
                self.impulse.get(n).copied().unwrap_or(0.0)
            }
            ResponseKind::Step => {
                let n = (x / step).round() as usize;
                self.impulse.iter().take(n + 1).sum()
            }
        }
    }

    fn release(&mut self, _kind: ResponseKind) {
        self.impulse.clear();
    }
}

fn main() {
    let kind = std::env::args()
        .nth(1)
        .and_then(|arg| {
            ResponseKind::ALL
                .into_iter()
                .find(|kind| kind.title().eq_ignore_ascii_case(&arg.replace('-', " ")))
        })
        .unwrap_or(ResponseKind::Magnitude);

    Application::new().run(move |cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(720.0), px(480.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, move |_window, cx| {
            let rate = 48_000.0;
            let model = Biquad::lowpass(rate, 4_000.0, 0.707);
            let mut descriptor =
                kind.descriptor(rate, ScreenRect::from_origin_size(0.0, 0.0, 720.0, 480.0));
            descriptor.thickness = 2.0;
            let view = FilterPlotView::new(descriptor, ResponseSource::new(model, kind));
            cx.new(|_| view)
        })
        .unwrap();
    });
}
