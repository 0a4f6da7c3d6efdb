use bevy::camera::ScalingMode;
use bevy::camera::primitives::Aabb;
use bevy::camera::visibility::VisibilitySystems;
use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy::window::PrimaryWindow;
use bevy_inspector_egui::inspector_options::std_options::NumberDisplay;
use bevy_inspector_egui::prelude::*;

use crate::camera::ortho_size::FittingMode;
use crate::camera::ortho_size::OrthoSizeError;
use crate::camera::ortho_size::SizeOffset;
use crate::camera::ortho_size::TargetBounds;
use crate::camera::ortho_size::ViewportResolution;
use crate::camera::ortho_size::fitted_ortho_size;

/// Captures the screen resolution for each `OrthoSizeSetter` and applies pending fits.
pub struct OrthoSizePlugin;

impl Plugin for OrthoSizePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<OrthoSizeSetter>()
            .add_observer(capture_screen_resolution)
            .add_systems(
                PostUpdate,
                apply_pending_ortho_fits
                    .after(VisibilitySystems::CalculateBounds)
                    .after(TransformSystems::Propagate),
            );
    }
}

/// Sizes the orthographic projection of the camera it sits on so that `target`'s render bounds
/// fit the screen.
///
/// The primary window's resolution is captured once, when the component is inserted. It is not
/// re-sampled on later window resizes or on a manual refit; inserting the component again
/// (without [`OrthoSizeSetter::with_screen_resolution`]) captures a fresh one and refits.
#[derive(Component, Reflect, InspectorOptions, Debug, Clone, PartialEq)]
#[reflect(Component, InspectorOptions)]
pub struct OrthoSizeSetter {
    /// Which axis of the target drives the fit
    pub size_match:        FittingMode,
    /// Added to the fitted size, within [-5, 5]
    #[inspector(min = -5.0, max = 5.0, display = NumberDisplay::Slider)]
    pub ortho_size_offset: f32,
    target:                Entity,
    screen_resolution:     Option<ViewportResolution>,
}

impl OrthoSizeSetter {
    /// Fits `target` by width with no offset.
    pub fn new(target: Entity) -> Self {
        Self {
            size_match: FittingMode::default(),
            ortho_size_offset: 0.0,
            target,
            screen_resolution: None,
        }
    }

    /// Replaces the fitting mode.
    pub const fn with_size_match(mut self, size_match: FittingMode) -> Self {
        self.size_match = size_match;
        self
    }

    /// Fails with [`OrthoSizeError::OffsetOutOfRange`] outside [-5, 5].
    pub fn with_offset(mut self, offset: f32) -> Result<Self, OrthoSizeError> {
        self.ortho_size_offset = SizeOffset::new(offset)?.value();
        Ok(self)
    }

    /// Skips the window capture and fits against `resolution` instead.
    pub const fn with_screen_resolution(mut self, resolution: ViewportResolution) -> Self {
        self.screen_resolution = Some(resolution);
        self
    }

    /// Entity whose render bounds are fitted
    pub const fn target(&self) -> Entity { self.target }

    /// Resolution captured at insertion, if any
    pub const fn screen_resolution(&self) -> Option<ViewportResolution> { self.screen_resolution }

    /// The size this setter would apply for `bounds`, offset included.
    pub fn ortho_size(&self, bounds: TargetBounds) -> Result<f32, OrthoSizeError> {
        // the snapshot is reflected, so the inspector or BRP may have zeroed it
        let resolution = self
            .screen_resolution
            .ok_or(OrthoSizeError::ResolutionNotCaptured)?
            .validated()?;
        let offset = SizeOffset::new(self.ortho_size_offset)?;
        fitted_ortho_size(bounds, resolution, self.size_match, offset)
    }
}

/// Marks a camera whose `OrthoSizeSetter` should be (re)applied on the next `PostUpdate`.
/// Removed once the fit has been attempted, whether it succeeded or not.
#[derive(Component, Debug, Default)]
pub struct PendingOrthoFit;

fn primary_window_resolution(
    windows: &Query<&Window, With<PrimaryWindow>>,
) -> Result<ViewportResolution, OrthoSizeError> {
    let window = windows
        .single()
        .map_err(|_| OrthoSizeError::MissingPrimaryWindow)?;
    ViewportResolution::new(window.physical_width(), window.physical_height())
}

fn validate_setter(
    camera: Entity,
    setter: &OrthoSizeSetter,
    projections: &Query<&Projection>,
    spatial: &Query<(), With<GlobalTransform>>,
) -> Result<(), OrthoSizeError> {
    if !matches!(projections.get(camera), Ok(Projection::Orthographic(_))) {
        return Err(OrthoSizeError::MissingOrthographicCamera(camera));
    }
    if !spatial.contains(setter.target) {
        return Err(OrthoSizeError::MissingTarget(setter.target));
    }
    SizeOffset::new(setter.ortho_size_offset)?;
    Ok(())
}

/// Snapshots the screen resolution for an inserted setter and queues its fit.
fn capture_screen_resolution(
    insert: On<Insert, OrthoSizeSetter>,
    mut commands: Commands,
    mut setters: Query<&mut OrthoSizeSetter>,
    projections: Query<&Projection>,
    spatial: Query<(), With<GlobalTransform>>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let camera = insert.entity;
    let Ok(mut setter) = setters.get_mut(camera) else {
        return;
    };

    if let Err(e) = validate_setter(camera, &setter, &projections, &spatial) {
        error!("OrthoSizeSetter on {camera} is misconfigured: {e}");
        return;
    }

    if setter.screen_resolution.is_none() {
        match primary_window_resolution(&windows) {
            Ok(resolution) => {
                debug!(
                    "OrthoSizeSetter on {camera} captured {}x{}",
                    resolution.width(),
                    resolution.height()
                );
                setter.screen_resolution = Some(resolution);
            }
            Err(e) => {
                error!("OrthoSizeSetter on {camera} could not capture the screen: {e}");
                return;
            }
        }
    }

    commands.entity(camera).insert(PendingOrthoFit);
}

fn apply_pending_ortho_fits(
    mut commands: Commands,
    mut cameras: Query<
        (Entity, &OrthoSizeSetter, Option<&mut Projection>),
        With<PendingOrthoFit>,
    >,
    targets: Query<(Option<&Aabb>, &GlobalTransform)>,
) {
    for (camera, setter, projection) in &mut cameras {
        let bounds = match targets.get(setter.target) {
            Ok((Some(aabb), transform)) => TargetBounds::from_aabb(aabb, transform),
            // bounds are computed after the target's first frame
            Ok((None, _)) => continue,
            Err(_) => Err(OrthoSizeError::MissingTarget(setter.target)),
        };

        match bounds.and_then(|bounds| fit_projection(camera, setter, bounds, projection)) {
            Ok(size) => info!(
                "Fitted {camera} to {} with {:?}: ortho size {size:.3}",
                setter.target(), setter.size_match
            ),
            Err(e) => error!("Could not fit {camera} to {}: {e}", setter.target()),
        }

        commands.entity(camera).remove::<PendingOrthoFit>();
    }
}

/// Writes the fitted size into an orthographic projection. Nothing is written on error.
fn fit_projection(
    camera: Entity,
    setter: &OrthoSizeSetter,
    bounds: TargetBounds,
    projection: Option<Mut<Projection>>,
) -> Result<f32, OrthoSizeError> {
    let mut projection = projection
        .filter(|projection| matches!(**projection, Projection::Orthographic(_)))
        .ok_or(OrthoSizeError::MissingOrthographicCamera(camera))?;
    let size = setter.ortho_size(bounds)?;

    if let Projection::Orthographic(ortho) = projection.as_mut() {
        // ortho size is a half extent
        ortho.scaling_mode = ScalingMode::FixedVertical {
            viewport_height: size * 2.0,
        };
    }
    Ok(size)
}
