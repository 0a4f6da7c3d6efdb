//! ortho_fit - fits an orthographic camera to a target's render bounds
//!
//! The demo fits a 2D camera to a tiled board. Pass `width`, `height` or `bounds` as the first
//! argument to pick the fitting mode; `F` refits, `F2` toggles the inspector.
//! Bevy Remote Protocol (BRP) is enabled for debugging.

mod demo;

use bevy::prelude::*;
use bevy_brp_extras::BrpExtrasPlugin;
use bevy_inspector_egui::bevy_egui::EguiPlugin;
use ortho_fit::camera::CameraPlugin;
use ortho_fit::camera::FittingMode;

use crate::demo::DemoPlugin;

fn main() -> AppExit {
    let size_match = match std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<FittingMode>())
        .transpose()
    {
        Ok(size_match) => size_match.unwrap_or_default(),
        Err(e) => {
            eprintln!("ortho_fit: {e}");
            return AppExit::error();
        }
    };

    let mut app = App::new();

    // Get effective port from BrpExtrasPlugin to include in window title if non-default
    let brp_plugin = BrpExtrasPlugin::default();
    let (effective_port, _) = brp_plugin.get_effective_port();
    let window_title = if effective_port == bevy_brp_extras::DEFAULT_REMOTE_PORT {
        "ortho_fit".to_string()
    } else {
        format!("ortho_fit - {effective_port}")
    };

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: window_title,
            ..default()
        }),
        ..default()
    }))
    .add_plugins((
        EguiPlugin::default(),
        brp_plugin,
        CameraPlugin,
        DemoPlugin { size_match },
    ))
    .run()
}
