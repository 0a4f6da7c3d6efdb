use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use bevy_inspector_egui::quick::FilterQueryInspectorPlugin;

use crate::camera::constants::INSPECTOR_KEY;
use crate::camera::constants::REFIT_KEY;
use crate::camera::ortho_size_setter::OrthoSizeSetter;
use crate::camera::ortho_size_setter::PendingOrthoFit;

/// Keyboard refit and the live `OrthoSizeSetter` inspector
pub struct OrthoFitControlsPlugin;

impl Plugin for OrthoFitControlsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(EnhancedInputPlugin)
            .add_input_context::<OrthoFitControls>()
            .init_resource::<InspectorVisible>()
            .add_plugins(
                FilterQueryInspectorPlugin::<With<OrthoSizeSetter>>::default()
                    .run_if(|visible: Res<InspectorVisible>| visible.0),
            )
            .add_systems(Startup, spawn_controls)
            .add_observer(refit_all)
            .add_observer(toggle_inspector);
    }
}

#[derive(Component)]
struct OrthoFitControls;

#[derive(InputAction)]
#[action_output(bool)]
struct RefitOrthoSize;

#[derive(InputAction)]
#[action_output(bool)]
struct ToggleOrthoInspector;

#[derive(Resource, Default)]
struct InspectorVisible(bool);

fn spawn_controls(mut commands: Commands) {
    commands.spawn((
        Name::new("OrthoFitControls"),
        OrthoFitControls,
        actions!(OrthoFitControls[
            (Action::<RefitOrthoSize>::new(), bindings![REFIT_KEY]),
            (Action::<ToggleOrthoInspector>::new(), bindings![INSPECTOR_KEY]),
        ]),
    ));
}

/// Same as the editor button: refits with the already captured resolution.
fn refit_all(
    _refit: On<Start<RefitOrthoSize>>,
    mut commands: Commands,
    setters: Query<Entity, With<OrthoSizeSetter>>,
) {
    for camera in &setters {
        commands.entity(camera).insert(PendingOrthoFit);
    }
    info!("Refit requested for {} camera(s)", setters.iter().count());
}

fn toggle_inspector(_toggle: On<Start<ToggleOrthoInspector>>, mut visible: ResMut<InspectorVisible>) {
    visible.0 = !visible.0;
}
