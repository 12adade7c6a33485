pub const DISTANCE_TO_HEIGHT_RATIO: f64 = 2.0; // x:y data window ratio for flight paths
pub const GEAR_ASPECT_RATIO: f64 = 1.0;

const X_PADDING_RATIO: f64 = 0.06;
const Y_PADDING_RATIO: f64 = 0.10;

/// Data-space rectangle a chart or the viewer draws into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotWindow {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

/// Pixel-space plot area; `top < bottom` as on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl PlotWindow {
    /// Smallest window containing the origin and every finite point, padded
    /// and then widened on one axis until `x_span / y_span == aspect`.
    /// Neither span drops below `min_span`.
    pub fn fit<I>(points: I, aspect: f64, min_span: f64) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (mut x_min, mut x_max, mut y_min, mut y_max) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for (x, y) in points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
        {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }

        let x_pad = (x_max - x_min).max(min_span) * X_PADDING_RATIO;
        let y_pad = (y_max - y_min).max(min_span) * Y_PADDING_RATIO;
        if x_min < 0.0 {
            x_min -= x_pad;
        }
        if y_min < 0.0 {
            y_min -= y_pad;
        }

        let mut x_span = (x_max + x_pad - x_min).max(min_span);
        let mut y_span = (y_max + y_pad - y_min).max(min_span);
        if x_span / y_span < aspect {
            x_span = y_span * aspect;
        } else {
            y_span = x_span / aspect;
        }

        Self {
            x_min,
            x_max: x_min + x_span,
            y_min,
            y_max: y_min + y_span,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn to_screen(&self, x: f64, y: f64, rect: ScreenRect) -> (f64, f64) {
        let plot_w = (rect.right - rect.left).max(1.0);
        let plot_h = (rect.bottom - rect.top).max(1.0);
        (
            rect.left + ((x - self.x_min) / self.width()) * plot_w,
            rect.bottom - ((y - self.y_min) / self.height()) * plot_h,
        )
    }

    /// Evenly spaced tick values from the low to the high edge, inclusive.
    pub fn ticks(low: f64, high: f64, intervals: usize) -> Vec<f64> {
        let intervals = intervals.max(1);
        (0..=intervals)
            .map(|i| low + (high - low) * i as f64 / intervals as f64)
            .collect()
    }
}

pub fn format_axis_value(value: f64, axis_span: f64) -> String {
    if axis_span >= 1000.0 {
        format!("{value:.0}")
    } else if axis_span >= 100.0 {
        format!("{value:.1}")
    } else if axis_span >= 1.0 {
        format!("{value:.2}")
    } else {
        format!("{value:.3}")
    }
}
