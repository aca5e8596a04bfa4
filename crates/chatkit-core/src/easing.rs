#![forbid(unsafe_code)]

//! Easing curves and timed layout transitions.
//!
//! Hosts describe panel animations with a curve name (`"keyboard"`,
//! `"easeInEaseOut"`, ...). [`EasingCurve`] maps those names onto easing
//! functions, and [`LayoutTransition`] pairs a curve with a duration so a
//! host without native layout animation can interpolate the offset itself.
//!
//! # Invariants
//!
//! 1. Every curve maps `0.0 -> 0.0` and `1.0 -> 1.0`.
//! 2. Inputs are clamped to `[0.0, 1.0]` before evaluation.
//! 3. Unknown curve names resolve to [`EasingCurve::Keyboard`].

use web_time::Duration;

/// An easing function mapping linear progress to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// Identity easing.
#[must_use]
pub fn linear(t: f32) -> f32 {
    t
}

/// Quadratic ease-in.
#[must_use]
pub fn ease_in(t: f32) -> f32 {
    t * t
}

/// Quadratic ease-out.
#[must_use]
pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

/// Cubic ease-out; approximates the system keyboard curve.
#[must_use]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Lightly damped spring that settles exactly at `1.0`.
#[must_use]
pub fn spring(t: f32) -> f32 {
    if t >= 1.0 {
        return 1.0;
    }
    let decay = (-6.0 * t).exp();
    let wobble = (t * std::f32::consts::PI * 2.5).cos();
    // Scale the residual so it vanishes at t = 1.
    1.0 - decay * wobble * (1.0 - t)
}

/// Named easing curve understood by the layout animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EasingCurve {
    /// Constant velocity.
    Linear,
    /// Accelerating.
    EaseIn,
    /// Decelerating.
    EaseOut,
    /// Accelerate then decelerate.
    EaseInEaseOut,
    /// Damped spring.
    Spring,
    /// The platform keyboard curve.
    #[default]
    Keyboard,
}

impl EasingCurve {
    /// Look up a curve by its host name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "easeIn" => Some(Self::EaseIn),
            "easeOut" => Some(Self::EaseOut),
            "easeInEaseOut" => Some(Self::EaseInEaseOut),
            "spring" => Some(Self::Spring),
            "keyboard" => Some(Self::Keyboard),
            _ => None,
        }
    }

    /// Look up a curve by name, falling back to [`EasingCurve::Keyboard`].
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_default()
    }

    /// Host name of this curve.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "easeIn",
            Self::EaseOut => "easeOut",
            Self::EaseInEaseOut => "easeInEaseOut",
            Self::Spring => "spring",
            Self::Keyboard => "keyboard",
        }
    }

    /// The easing function backing this curve.
    #[must_use]
    pub fn function(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInEaseOut => ease_in_out,
            Self::Spring => spring,
            Self::Keyboard => ease_out_cubic,
        }
    }

    /// Evaluate the curve at `t`, clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn sample(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        (self.function())(t)
    }
}

/// A timed, eased transition between two layout offsets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTransition {
    /// Total animation time.
    pub duration: Duration,
    /// Curve applied to progress.
    pub easing: EasingCurve,
}

impl LayoutTransition {
    /// Create a transition.
    #[must_use]
    pub const fn new(duration: Duration, easing: EasingCurve) -> Self {
        Self { duration, easing }
    }

    /// Eased progress after `elapsed`, in `[0.0, 1.0]`.
    ///
    /// A zero duration is treated as already complete.
    #[must_use]
    pub fn progress(&self, elapsed: Duration) -> f32 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return 1.0;
        }
        let linear = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.easing.sample(linear)
    }

    /// Interpolated value between `from` and `to` after `elapsed`.
    #[must_use]
    pub fn interpolate(&self, from: f64, to: f64, elapsed: Duration) -> f64 {
        let p = f64::from(self.progress(elapsed));
        from + (to - from) * p
    }

    /// Whether the transition has finished after `elapsed`.
    #[must_use]
    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}
