//! Orthographic size calculation.
//!
//! An orthographic camera's "size" is half of the vertical world extent it shows. Given the world
//! bounds of a target and the viewport resolution, [`compute_ortho_size`] returns the size that
//! makes the target fit according to a [`FittingMode`].
use std::str::FromStr;

use bevy::camera::primitives::Aabb;
use bevy::prelude::*;
use thiserror::Error;

use crate::camera::constants::ORTHO_SIZE_OFFSET_MAX;
use crate::camera::constants::ORTHO_SIZE_OFFSET_MIN;

/// Everything that can stop an orthographic fit from being applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrthoSizeError {
    /// A fitting mode name or discriminant matched no variant.
    #[error("unknown fitting mode `{0}` (expected width, height or bounds)")]
    InvalidMode(String),
    /// The viewport is zero pixels wide or tall.
    #[error("viewport resolution {width}x{height} has a zero dimension")]
    DegenerateResolution {
        /// pixels
        width:  u32,
        /// pixels
        height: u32,
    },
    /// The target has no usable extent.
    #[error("target bounds {width}x{height} must be finite and positive")]
    DegenerateBounds {
        /// world units
        width:  f32,
        /// world units
        height: f32,
    },
    /// Offset outside [`ORTHO_SIZE_OFFSET_MIN`]..=[`ORTHO_SIZE_OFFSET_MAX`].
    #[error("ortho size offset {0} is outside [-5, 5]")]
    OffsetOutOfRange(f32),
    /// The offset pulled the size to zero or below.
    #[error("fitted ortho size {0} is not positive")]
    NonPositiveSize(f32),
    /// Extreme bounds overflowed `f32`.
    #[error("fitted ortho size {0} is not finite")]
    NonFiniteSize(f32),
    /// The setter was asked for a size before a resolution was captured.
    #[error("screen resolution was never captured")]
    ResolutionNotCaptured,
    /// No single `PrimaryWindow` existed when the setter was added.
    #[error("no primary window to capture the screen resolution from")]
    MissingPrimaryWindow,
    /// The target entity is gone or is not a spatial entity.
    #[error("target {0} is missing or has no transform")]
    MissingTarget(Entity),
    /// The setter sits on an entity without an orthographic `Projection`.
    #[error("camera {0} has no orthographic projection")]
    MissingOrthographicCamera(Entity),
}

/// Which axis of the target drives the fit.
#[derive(Reflect, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FittingMode {
    /// The target's width fills the viewport width.
    #[default]
    ByWidth,
    /// The target's height fills the viewport height.
    ByHeight,
    /// The whole target is visible; whichever axis is tighter wins.
    ByBounds,
}

impl TryFrom<u8> for FittingMode {
    type Error = OrthoSizeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::ByWidth),
            1 => Ok(Self::ByHeight),
            2 => Ok(Self::ByBounds),
            other => Err(OrthoSizeError::InvalidMode(other.to_string())),
        }
    }
}

impl FromStr for FittingMode {
    type Err = OrthoSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "width" | "bywidth" => Ok(Self::ByWidth),
            "height" | "byheight" => Ok(Self::ByHeight),
            "bounds" | "bybounds" => Ok(Self::ByBounds),
            other => other.parse::<u8>().map_or_else(
                |_| Err(OrthoSizeError::InvalidMode(s.to_string())),
                Self::try_from,
            ),
        }
    }
}

/// Viewport size in physical pixels.
///
/// `new` rejects a zero dimension. Reflection can still write one, so consumers that accept a
/// reflected value re-check it with [`ViewportResolution::validated`].
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportResolution {
    width:  u32,
    height: u32,
}

impl ViewportResolution {
    /// Fails with [`OrthoSizeError::DegenerateResolution`] on a zero dimension.
    pub const fn new(width: u32, height: u32) -> Result<Self, OrthoSizeError> {
        if width == 0 || height == 0 {
            return Err(OrthoSizeError::DegenerateResolution { width, height });
        }
        Ok(Self { width, height })
    }

    /// Runs `self` back through [`ViewportResolution::new`].
    pub const fn validated(self) -> Result<Self, OrthoSizeError> {
        Self::new(self.width, self.height)
    }

    /// pixels
    pub const fn width(&self) -> u32 { self.width }

    /// pixels
    pub const fn height(&self) -> u32 { self.height }

    /// width / height
    pub const fn aspect_ratio(&self) -> f32 { self.width_f32() / self.height_f32() }

    #[allow(
        clippy::cast_precision_loss,
        reason = "screen dimensions are far below f32's exact integer range"
    )]
    const fn width_f32(&self) -> f32 { self.width as f32 }

    #[allow(
        clippy::cast_precision_loss,
        reason = "screen dimensions are far below f32's exact integer range"
    )]
    const fn height_f32(&self) -> f32 { self.height as f32 }
}

/// World-space width and height of the target's axis-aligned bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBounds {
    width:  f32,
    height: f32,
}

impl TargetBounds {
    /// Fails with [`OrthoSizeError::DegenerateBounds`] unless both sides are finite and positive.
    pub fn new(width: f32, height: f32) -> Result<Self, OrthoSizeError> {
        let valid = |d: f32| d.is_finite() && d > 0.0;
        if !valid(width) || !valid(height) {
            return Err(OrthoSizeError::DegenerateBounds { width, height });
        }
        Ok(Self { width, height })
    }

    /// World-space extent of a local `Aabb` after `transform`'s rotation and scale.
    ///
    /// Rotated boxes are re-enclosed by a world axis-aligned box, so a 45 degree rotated square
    /// reports a larger extent than its sides.
    pub fn from_aabb(aabb: &Aabb, transform: &GlobalTransform) -> Result<Self, OrthoSizeError> {
        let matrix = transform.affine().matrix3;
        let half = aabb.half_extents;
        let world_half = matrix.x_axis.abs() * half.x
            + matrix.y_axis.abs() * half.y
            + matrix.z_axis.abs() * half.z;

        Self::new(world_half.x * 2.0, world_half.y * 2.0)
    }

    /// world units
    pub const fn width(&self) -> f32 { self.width }

    /// world units
    pub const fn height(&self) -> f32 { self.height }

    /// width / height
    pub const fn aspect_ratio(&self) -> f32 { self.width / self.height }
}

/// Offset added to the computed size, limited to
/// [`ORTHO_SIZE_OFFSET_MIN`]..=[`ORTHO_SIZE_OFFSET_MAX`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SizeOffset(f32);

impl SizeOffset {
    /// Fails with [`OrthoSizeError::OffsetOutOfRange`] outside the limits, and on NaN.
    pub fn new(offset: f32) -> Result<Self, OrthoSizeError> {
        if (ORTHO_SIZE_OFFSET_MIN..=ORTHO_SIZE_OFFSET_MAX).contains(&offset) {
            Ok(Self(offset))
        } else {
            Err(OrthoSizeError::OffsetOutOfRange(offset))
        }
    }

    /// The offset in world units
    pub const fn value(self) -> f32 { self.0 }
}

/// Half-height that fits `bounds` into a viewport of `resolution`, before any offset.
pub const fn compute_ortho_size(
    bounds: TargetBounds,
    resolution: ViewportResolution,
    mode: FittingMode,
) -> f32 {
    match mode {
        FittingMode::ByHeight => size_by_height(bounds),
        FittingMode::ByWidth => size_by_width(bounds, resolution),
        FittingMode::ByBounds => size_by_bounds(bounds, resolution),
    }
}

/// [`compute_ortho_size`] plus `offset`, rejected unless the result is finite and positive.
pub fn fitted_ortho_size(
    bounds: TargetBounds,
    resolution: ViewportResolution,
    mode: FittingMode,
    offset: SizeOffset,
) -> Result<f32, OrthoSizeError> {
    let size = compute_ortho_size(bounds, resolution, mode) + offset.value();
    if !size.is_finite() {
        return Err(OrthoSizeError::NonFiniteSize(size));
    }
    if size <= 0.0 {
        return Err(OrthoSizeError::NonPositiveSize(size));
    }
    Ok(size)
}

const fn size_by_height(bounds: TargetBounds) -> f32 { bounds.height / 2.0 }

const fn size_by_width(bounds: TargetBounds, resolution: ViewportResolution) -> f32 {
    // ratio first so wide bounds don't overflow before the divide
    bounds.width * (resolution.height_f32() / resolution.width_f32()) * 0.5
}

const fn size_by_bounds(bounds: TargetBounds, resolution: ViewportResolution) -> f32 {
    let screen_ratio = resolution.aspect_ratio();
    let target_ratio = bounds.aspect_ratio();

    // viewport at least as wide as the target: height binds
    if screen_ratio >= target_ratio {
        return size_by_height(bounds);
    }

    size_by_height(bounds) * (target_ratio / screen_ratio)
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3A;

    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn fit(
        bounds: (f32, f32),
        resolution: (u32, u32),
        mode: FittingMode,
        offset: f32,
    ) -> Result<f32, OrthoSizeError> {
        fitted_ortho_size(
            TargetBounds::new(bounds.0, bounds.1)?,
            ViewportResolution::new(resolution.0, resolution.1)?,
            mode,
            SizeOffset::new(offset)?,
        )
    }

    #[test]
    fn by_height_on_full_hd() -> Result<(), OrthoSizeError> {
        assert_close(fit((10.0, 4.0), (1920, 1080), FittingMode::ByHeight, 0.0)?, 2.0);
        Ok(())
    }

    #[test]
    fn by_width_on_full_hd() -> Result<(), OrthoSizeError> {
        assert_close(fit((10.0, 4.0), (1920, 1080), FittingMode::ByWidth, 0.0)?, 2.8125);
        Ok(())
    }

    #[test]
    fn by_bounds_equal_ratios_uses_height() -> Result<(), OrthoSizeError> {
        assert_close(fit((16.0, 9.0), (16, 9), FittingMode::ByBounds, 0.0)?, 4.5);
        Ok(())
    }

    #[test]
    fn by_bounds_wide_target_scales_up() -> Result<(), OrthoSizeError> {
        // target ratio 5.0 vs screen 16/9: 2.0 * 5.0 / (16/9) = 5.625
        assert_close(fit((20.0, 4.0), (16, 9), FittingMode::ByBounds, 1.0)?, 6.625);
        Ok(())
    }

    #[test]
    fn modes_match_closed_forms() -> Result<(), OrthoSizeError> {
        let resolutions = [(1920, 1080), (1080, 1920), (800, 600), (1, 1), (3840, 1600)];
        let bounds = [(10.0, 4.0), (4.0, 10.0), (1.0, 1.0), (0.25, 7.5), (300.0, 2.0)];

        for &(rw, rh) in &resolutions {
            for &(bw, bh) in &bounds {
                let resolution = ViewportResolution::new(rw, rh)?;
                let target = TargetBounds::new(bw, bh)?;
                let by_height = compute_ortho_size(target, resolution, FittingMode::ByHeight);
                let by_width = compute_ortho_size(target, resolution, FittingMode::ByWidth);
                let by_bounds = compute_ortho_size(target, resolution, FittingMode::ByBounds);

                assert_close(by_height, bh / 2.0);
                assert_close(by_width, bw * rh as f32 / rw as f32 * 0.5);

                let screen_ratio = rw as f32 / rh as f32;
                let target_ratio = bw / bh;
                if screen_ratio >= target_ratio {
                    assert_close(by_bounds, by_height);
                } else {
                    assert_close(by_bounds, by_height * (target_ratio / screen_ratio));
                    // the target's width exactly fills the viewport
                    assert!((by_bounds * 2.0 * screen_ratio - bw).abs() < 1e-3);
                }
            }
        }
        Ok(())
    }

    #[test]
    fn by_bounds_never_crops_the_target() -> Result<(), OrthoSizeError> {
        for (rw, rh) in [(1920, 1080), (1080, 1920), (500, 500)] {
            let resolution = ViewportResolution::new(rw, rh)?;
            for (bw, bh) in [(10.0, 4.0), (4.0, 10.0), (7.0, 7.0)] {
                let target = TargetBounds::new(bw, bh)?;
                let size = compute_ortho_size(target, resolution, FittingMode::ByBounds);
                let visible_height = size * 2.0;
                let visible_width = visible_height * resolution.aspect_ratio();
                assert!(visible_height + EPSILON >= bh);
                assert!(visible_width + 1e-3 >= bw);
            }
        }
        Ok(())
    }

    #[test]
    fn offset_is_added_after_the_fit() -> Result<(), OrthoSizeError> {
        assert_close(fit((10.0, 4.0), (1920, 1080), FittingMode::ByHeight, 1.5)?, 3.5);
        assert_close(fit((10.0, 4.0), (1920, 1080), FittingMode::ByHeight, -1.5)?, 0.5);
        Ok(())
    }

    #[test]
    fn repeated_computation_is_stable() -> Result<(), OrthoSizeError> {
        let first = fit((20.0, 4.0), (16, 9), FittingMode::ByBounds, 0.25)?;
        let second = fit((20.0, 4.0), (16, 9), FittingMode::ByBounds, 0.25)?;
        assert_eq!(first.to_bits(), second.to_bits());
        Ok(())
    }

    #[test]
    fn offset_limits_are_inclusive() {
        assert!(SizeOffset::new(ORTHO_SIZE_OFFSET_MIN).is_ok());
        assert!(SizeOffset::new(ORTHO_SIZE_OFFSET_MAX).is_ok());
        assert_eq!(
            SizeOffset::new(5.01),
            Err(OrthoSizeError::OffsetOutOfRange(5.01))
        );
        assert_eq!(
            SizeOffset::new(-5.01),
            Err(OrthoSizeError::OffsetOutOfRange(-5.01))
        );
        assert!(SizeOffset::new(f32::NAN).is_err());
    }

    #[test]
    fn offset_that_collapses_the_view_is_rejected() {
        assert_eq!(
            fit((10.0, 4.0), (1920, 1080), FittingMode::ByHeight, -2.0),
            Err(OrthoSizeError::NonPositiveSize(0.0))
        );
        assert!(matches!(
            fit((10.0, 4.0), (1920, 1080), FittingMode::ByHeight, -5.0),
            Err(OrthoSizeError::NonPositiveSize(_))
        ));
    }

    #[test]
    fn extreme_bounds_are_rejected_instead_of_overflowing() -> Result<(), OrthoSizeError> {
        // width 1e36 on full HD stays finite once the ratio is taken first
        let wide = fit((1e36, 1.0), (1920, 1080), FittingMode::ByWidth, 0.0)?;
        assert!(wide.is_finite());

        assert!(matches!(
            fit((f32::MAX, 1.0), (1, 1000), FittingMode::ByWidth, 0.0),
            Err(OrthoSizeError::NonFiniteSize(_))
        ));
        // target ratio overflows to infinity
        assert!(matches!(
            fit((1e30, 1e-10), (16, 9), FittingMode::ByBounds, 0.0),
            Err(OrthoSizeError::NonFiniteSize(_))
        ));
        Ok(())
    }

    #[test]
    fn zero_resolution_is_rejected() {
        assert_eq!(
            ViewportResolution::new(0, 1080),
            Err(OrthoSizeError::DegenerateResolution {
                width:  0,
                height: 1080,
            })
        );
        assert!(ViewportResolution::new(1920, 0).is_err());
    }

    #[test]
    fn validated_catches_a_reflected_zero_width() -> Result<(), OrthoSizeError> {
        use bevy::reflect::Struct;

        let mut resolution = ViewportResolution::new(1920, 1080)?;
        if let Some(width) = resolution
            .field_mut("width")
            .and_then(|field| field.try_downcast_mut::<u32>())
        {
            *width = 0;
        }
        assert_eq!(resolution.width(), 0);
        assert_eq!(
            resolution.validated(),
            Err(OrthoSizeError::DegenerateResolution {
                width:  0,
                height: 1080,
            })
        );
        Ok(())
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        assert!(TargetBounds::new(0.0, 4.0).is_err());
        assert!(TargetBounds::new(10.0, -1.0).is_err());
        assert!(TargetBounds::new(f32::INFINITY, 4.0).is_err());
        assert!(TargetBounds::new(10.0, f32::NAN).is_err());
    }

    #[test]
    fn parses_fitting_modes() -> Result<(), OrthoSizeError> {
        assert_eq!("width".parse::<FittingMode>()?, FittingMode::ByWidth);
        assert_eq!("ByHeight".parse::<FittingMode>()?, FittingMode::ByHeight);
        assert_eq!(" bounds ".parse::<FittingMode>()?, FittingMode::ByBounds);
        assert_eq!("2".parse::<FittingMode>()?, FittingMode::ByBounds);
        assert_eq!(FittingMode::try_from(1)?, FittingMode::ByHeight);
        assert_eq!(FittingMode::default(), FittingMode::ByWidth);
        Ok(())
    }

    #[test]
    fn unknown_fitting_mode_is_an_error() {
        assert_eq!(
            "diagonal".parse::<FittingMode>(),
            Err(OrthoSizeError::InvalidMode("diagonal".to_string()))
        );
        assert_eq!(
            FittingMode::try_from(3),
            Err(OrthoSizeError::InvalidMode("3".to_string()))
        );
    }

    #[test]
    fn bounds_from_scaled_aabb() -> Result<(), OrthoSizeError> {
        let aabb = Aabb {
            center:       Vec3A::ZERO,
            half_extents: Vec3A::new(0.5, 0.5, 0.0),
        };
        let transform = GlobalTransform::from(Transform::from_scale(Vec3::new(10.0, 4.0, 1.0)));
        let bounds = TargetBounds::from_aabb(&aabb, &transform)?;
        assert_close(bounds.width(), 10.0);
        assert_close(bounds.height(), 4.0);
        Ok(())
    }

    #[test]
    fn bounds_from_rotated_aabb_enclose_the_box() -> Result<(), OrthoSizeError> {
        let aabb = Aabb {
            center:       Vec3A::ZERO,
            half_extents: Vec3A::new(5.0, 2.0, 0.0),
        };
        let quarter_turn =
            GlobalTransform::from(Transform::from_rotation(Quat::from_rotation_z(
                std::f32::consts::FRAC_PI_2,
            )));
        let bounds = TargetBounds::from_aabb(&aabb, &quarter_turn)?;
        assert!((bounds.width() - 4.0).abs() < 1e-4);
        assert!((bounds.height() - 10.0).abs() < 1e-4);
        Ok(())
    }
}
