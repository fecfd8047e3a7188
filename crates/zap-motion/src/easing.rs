// easing.rs
//
// Time-remap functions for process progress. Pure math, no scene access.
// Every curve maps 0 to exactly 0 and 1 to exactly 1, which the phase logic of
// multi-stage processes relies on.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    QuartIn,
    QuartOut,
    QuartInOut,
    SineIn,
    SineOut,
    SineInOut,
    ExpoIn,
    ExpoOut,
    ExpoInOut,
    /// Overshoots past 1 before settling.
    BackOut,
    BounceOut,
    ElasticOut,
}

impl Easing {
    /// Remap `t` (clamped to [0, 1]).
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match self {
            Easing::Linear => t,
            Easing::QuadIn => power_in(t, 2),
            Easing::QuadOut => power_out(t, 2),
            Easing::QuadInOut => power_in_out(t, 2),
            Easing::CubicIn => power_in(t, 3),
            Easing::CubicOut => power_out(t, 3),
            Easing::CubicInOut => power_in_out(t, 3),
            Easing::QuartIn => power_in(t, 4),
            Easing::QuartOut => power_out(t, 4),
            Easing::QuartInOut => power_in_out(t, 4),
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => (1.0 - (PI * t).cos()) / 2.0,
            Easing::ExpoIn => 2.0_f32.powf(10.0 * t - 10.0),
            Easing::ExpoOut => 1.0 - 2.0_f32.powf(-10.0 * t),
            Easing::ExpoInOut => {
                if t < 0.5 {
                    2.0_f32.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
            Easing::BounceOut => bounce_out(t),
            Easing::ElasticOut => {
                const C4: f32 = (2.0 * PI) / 3.0;
                2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
            }
        }
    }
}

#[inline]
fn power_in(t: f32, n: i32) -> f32 {
    t.powi(n)
}

#[inline]
fn power_out(t: f32, n: i32) -> f32 {
    1.0 - (1.0 - t).powi(n)
}

#[inline]
fn power_in_out(t: f32, n: i32) -> f32 {
    if t < 0.5 {
        2.0_f32.powi(n - 1) * t.powi(n)
    } else {
        1.0 - (2.0 - 2.0 * t).powi(n) / 2.0
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;

    let (offset, base) = if t < 1.0 / D1 {
        (0.0, 0.0)
    } else if t < 2.0 / D1 {
        (1.5 / D1, 0.75)
    } else if t < 2.5 / D1 {
        (2.25 / D1, 0.9375)
    } else {
        (2.625 / D1, 0.984375)
    };
    let t = t - offset;
    N1 * t * t + base
}

/// Linearly interpolate between two scalars.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two points.
#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing applied to `t`.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 19] = [
        Easing::Linear,
        Easing::QuadIn,
        Easing::QuadOut,
        Easing::QuadInOut,
        Easing::CubicIn,
        Easing::CubicOut,
        Easing::CubicInOut,
        Easing::QuartIn,
        Easing::QuartOut,
        Easing::QuartInOut,
        Easing::SineIn,
        Easing::SineOut,
        Easing::SineInOut,
        Easing::ExpoIn,
        Easing::ExpoOut,
        Easing::ExpoInOut,
        Easing::BackOut,
        Easing::BounceOut,
        Easing::ElasticOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{:?} at 0", easing);
            assert_eq!(easing.apply(1.0), 1.0, "{:?} at 1", easing);
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::CubicInOut.apply(3.0), 1.0);
        assert_eq!(Easing::CubicInOut.apply(-1.0), 0.0);
    }

    #[test]
    fn cubic_in_out_is_symmetric() {
        assert!((Easing::CubicInOut.apply(0.5) - 0.5).abs() < 1e-6);
        let a = Easing::CubicInOut.apply(0.25);
        let b = Easing::CubicInOut.apply(0.75);
        assert!((a + b - 1.0).abs() < 1e-6);
        assert!((a - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn quad_out_faster_start() {
        assert!(Easing::QuadOut.apply(0.5) > 0.5);
    }

    #[test]
    fn monotonic_curves_do_not_decrease() {
        for easing in [Easing::Linear, Easing::CubicInOut, Easing::QuartOut, Easing::SineInOut] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = easing.apply(i as f32 / 100.0);
                assert!(v >= prev, "{:?} decreased at step {}", easing, i);
                prev = v;
            }
        }
    }

    #[test]
    fn ease_interpolates() {
        assert!((ease(100.0, 200.0, 0.5, Easing::Linear) - 150.0).abs() < 1e-4);
    }

    #[test]
    fn parses_snake_case_names() {
        let e: Easing = serde_json::from_str("\"cubic_in_out\"").unwrap();
        assert_eq!(e, Easing::CubicInOut);
    }

    #[test]
    fn vec2_lerp_hits_endpoints() {
        let (a, b) = (Vec2::new(-2.0, 4.0), Vec2::new(6.0, 0.0));
        assert_eq!(lerp_vec2(a, b, 0.0), a);
        assert_eq!(lerp_vec2(a, b, 0.5), Vec2::new(2.0, 2.0));
        assert_eq!(lerp_vec2(Vec2::ZERO, b, 1.0), b);
    }
}
