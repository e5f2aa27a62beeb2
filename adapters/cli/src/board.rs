//! Plain-text rendering of the battlefield.

use glam::Vec2;
use tanx_system_ballistics::Game;
use tanx_world::Tank;

const TERRAIN: char = '#';
const FLOOR: char = 'B';
const RUBBLE: char = '%';
const WRECK: char = 'x';
const EMPTY: char = ' ';
const TANK_GLYPHS: [char; 2] = ['T', 't'];

/// Draws one character per world cell, top row first.
pub(crate) fn render(game: &Game) -> String {
    let world = game.world();
    let width = world.width() as i32;
    let height = world.height() as i32;
    let mut out = String::with_capacity(((width + 1) * height) as usize);

    for row in (0..height).rev() {
        for column in 0..width {
            let center = Vec2::new(column as f32 + 0.5, row as f32 + 0.5);
            let glyph = game
                .tanks()
                .iter()
                .enumerate()
                .find(|(_, tank)| occupies(tank, column, row))
                .map(|(index, tank)| tank_glyph(index, tank))
                .unwrap_or_else(|| {
                    if world.building_hit_test(center).is_some() {
                        FLOOR
                    } else if world.rubble_hit_test(center).is_some() {
                        RUBBLE
                    } else if center.y <= world.terrain_height(center.x) {
                        TERRAIN
                    } else {
                        EMPTY
                    }
                });
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn occupies(tank: &Tank, column: i32, row: i32) -> bool {
    tank.column() == column && tank.y().floor() as i32 == row
}

fn tank_glyph(index: usize, tank: &Tank) -> char {
    if tank.is_alive() {
        TANK_GLYPHS[index % TANK_GLYPHS.len()]
    } else {
        WRECK
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanx_core::{TankId, TerrainSettings, TerrainStyle};

    fn flat_game() -> Game {
        let settings = TerrainSettings {
            width: 16,
            height: 12,
            min_height: 4.0,
            max_height: 4.0,
            smoothing: 0,
            detail: 2,
            style: TerrainStyle::Classic,
            seed: Some(9),
        };
        Game::new(&settings).expect("game")
    }

    fn rows(board: &str) -> Vec<&str> {
        board.lines().collect()
    }

    #[test]
    fn flat_worlds_render_solid_ground_and_both_tanks() {
        let board = render(&flat_game());
        let rows = rows(&board);

        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|row| row.chars().count() == 16));
        assert!(rows[8..].iter().all(|row| row.chars().all(|c| c == TERRAIN)));
        assert_eq!(rows[7].chars().nth(2), Some('T'));
        assert_eq!(rows[7].chars().nth(13), Some('t'));
        assert!(rows[0].chars().all(|c| c == EMPTY));
    }

    #[test]
    fn buildings_and_wrecks_have_their_own_glyphs() {
        let mut game = flat_game();
        let _ = game
            .world_mut()
            .place_building(6, 2, 2)
            .expect("building");
        let _ = game
            .tank_mut(TankId::new(1))
            .expect("tank")
            .apply_damage(100);

        let board = render(&game);
        let rows = rows(&board);

        assert_eq!(&rows[6][6..8], "BB");
        assert_eq!(&rows[5][6..8], "BB");
        assert_eq!(rows[7].chars().nth(13), Some(WRECK));
    }
}
