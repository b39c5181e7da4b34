//! Numeric conversion helpers centralizing safe casts at the DOM boundary.
//!
//! Viewport dimensions arrive from the shell as f64 and positions leave as
//! integer pixels; both crossings are clamped here so the simulation never
//! sees a non-finite extent.

use num_traits::cast::cast;

/// Downcast a viewport dimension to the f32 extent used by the simulation.
///
/// Non-finite input collapses to 0.0 so the caller's floor/default logic
/// takes over.
#[must_use]
pub fn viewport_to_extent(value: f64) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let max = cast::<f32, f64>(f32::MAX).unwrap_or(f64::MAX);
    cast::<f64, f32>(value.clamp(-max, max)).unwrap_or(0.0)
}

/// Round a simulation coordinate to the integer pixel grid, clamping to the
/// i32 range and mapping NaN to 0.
#[must_use]
pub fn position_to_pixel(value: f32) -> i32 {
    let value = f64::from(value);
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    cast::<f64, i32>(value.clamp(min, max).round()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_collapses_non_finite_input() {
        assert!((viewport_to_extent(f64::NAN) - 0.0).abs() < f32::EPSILON);
        assert!((viewport_to_extent(f64::INFINITY) - 0.0).abs() < f32::EPSILON);
        assert!((viewport_to_extent(640.25) - 640.25).abs() < f32::EPSILON);
    }

    #[test]
    fn pixel_rounding_clamps_and_handles_nan() {
        assert_eq!(position_to_pixel(12.6), 13);
        assert_eq!(position_to_pixel(-0.4), 0);
        assert_eq!(position_to_pixel(f32::NAN), 0);
        assert_eq!(position_to_pixel(f32::MAX), i32::MAX);
    }
}
