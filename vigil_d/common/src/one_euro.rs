/// One-euro filter over a scalar signal, driven by the caller's frame
/// delta rather than a fixed sample rate.
#[derive(Debug, Clone, Copy)]
pub struct OneEuroFilter {
    min_cutoff: f32,
    beta: f32,
    d_cutoff: f32,
    x_prev: f32,
    dx_prev: f32,
    raw_x_prev: f32,
    primed: bool,
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self {
            min_cutoff: 1.0,
            beta: 0.5,
            d_cutoff: 0.1,
            x_prev: 0.0,
            dx_prev: 0.0,
            raw_x_prev: 0.0,
            primed: false,
        }
    }
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f32, beta: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            ..Default::default()
        }
    }

    /// Maps the config's single smoothness knob to filter parameters the
    /// same way the tracking mutator does: 0.0 is effectively pass-through.
    pub fn from_smoothness(smoothness: f32) -> Self {
        let (min_cutoff, beta) = if smoothness <= 0.0 {
            (10.0, 1.0)
        } else {
            (1.0 / (smoothness * 10.0), 0.5 * (1.0 - smoothness))
        };
        Self::new(min_cutoff, beta)
    }

    fn alpha(dt: f32, cutoff: f32) -> f32 {
        let tau = 1.0 / (2.0 * std::f32::consts::PI * cutoff);
        1.0 / (1.0 + tau / dt)
    }

    fn low_pass(hat_x_prev: &mut f32, x: f32, alpha: f32) -> f32 {
        let hat_x = alpha * x + (1.0 - alpha) * *hat_x_prev;
        *hat_x_prev = hat_x;
        hat_x
    }

    pub fn filter(&mut self, x: f32, dt: f32) -> f32 {
        if x.is_nan() {
            return 0.0;
        }

        if !self.primed || dt <= 0.0 {
            self.primed = true;
            self.raw_x_prev = x;
            self.x_prev = x;
            self.dx_prev = 0.0;
            return x;
        }

        let dx = (x - self.raw_x_prev) / dt;
        self.raw_x_prev = x;

        let edx = Self::low_pass(&mut self.dx_prev, dx, Self::alpha(dt, self.d_cutoff));
        let cutoff = self.min_cutoff + self.beta * edx.abs();

        Self::low_pass(&mut self.x_prev, x, Self::alpha(dt, cutoff))
    }

    pub fn reset(&mut self) {
        self.primed = false;
    }
}
