use bevy::color::palettes::tailwind;
use bevy::prelude::*;
use ortho_fit::camera::FittingMode;
use ortho_fit::camera::OrthoSizeSetter;

const BOARD_COLUMNS: u8 = 10;
const BOARD_ROWS: u8 = 4;
/// Board the camera is fitted to, one world unit per tile
const BOARD_SIZE: Vec2 = Vec2::new(BOARD_COLUMNS as f32, BOARD_ROWS as f32);
const TILE_SIZE: f32 = 0.9;

/// Spawns a tiled board and a 2D camera fitted to it
pub struct DemoPlugin {
    /// Fitting mode for the demo camera
    pub size_match: FittingMode,
}

impl Plugin for DemoPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::from(tailwind::SLATE_900)))
            .insert_resource(DemoSizeMatch(self.size_match))
            .add_systems(Startup, spawn_board_and_camera);
    }
}

#[derive(Resource)]
struct DemoSizeMatch(FittingMode);

fn spawn_board_and_camera(mut commands: Commands, size_match: Res<DemoSizeMatch>) {
    let board = commands
        .spawn((
            Name::new("Board"),
            Sprite::from_color(Color::from(tailwind::SLATE_600), BOARD_SIZE),
            Transform::default(),
        ))
        .with_children(|board| {
            for column in 0..BOARD_COLUMNS {
                for row in 0..BOARD_ROWS {
                    let color = if (column + row) % 2 == 0 {
                        tailwind::AMBER_400
                    } else {
                        tailwind::SKY_400
                    };
                    let x = f32::from(column) - BOARD_SIZE.x / 2.0 + 0.5;
                    let y = f32::from(row) - BOARD_SIZE.y / 2.0 + 0.5;
                    board.spawn((
                        Sprite::from_color(Color::from(color), Vec2::splat(TILE_SIZE)),
                        Transform::from_xyz(x, y, 1.0),
                    ));
                }
            }
        })
        .id();

    commands.spawn((
        Name::new("OrthoCamera"),
        Camera2d,
        OrthoSizeSetter::new(board).with_size_match(size_match.0),
    ));
    info!("Fitting camera to board using {:?}", size_match.0);
}
