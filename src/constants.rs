//! This module contains all the constants used in the game.

use std::time::Duration;

/// The fixed simulation step, 60 ticks per second.
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The size of each tile, in pixels.
pub const TILE_SIZE: i32 = 20;

/// Pixels per tick every entity interpolates at on level 1.
pub const BASE_MOVE_SPEED: i32 = 3;

/// Lives granted at the start of a session.
pub const STARTING_LIVES: u8 = 3;

/// Score values awarded for consuming things.
pub mod score {
    pub const PELLET: u32 = 10;
    pub const POWER_PELLET: u32 = 50;
    pub const GHOST: u32 = 200;
}

/// Tick-based timings, all measured at 60 ticks per second.
pub mod timing {
    /// How long power mode lasts after eating a power pellet.
    pub const POWER_MODE_TICKS: u32 = 360;
    /// Power mode flashes for this many ticks before it runs out.
    pub const POWER_FLASH_TICKS: u32 = 60;
    /// How long a defeated ghost stays inert before respawning.
    pub const DEFEATED_RESPAWN_TICKS: u32 = 120;
    /// How long a bonus fruit stays on the board.
    pub const FRUIT_LIFETIME_TICKS: u32 = 600;
    /// A fruit blinks for this many ticks before it disappears.
    pub const FRUIT_BLINK_TICKS: u32 = 120;
    /// Frozen overlay ticks before the restart/continue prompt may show.
    pub const OVERLAY_PROMPT_DELAY: u32 = 60;
    /// Delay before the background music resumes after a lost life (600ms).
    pub const LIFE_LOST_MUSIC_DELAY: u32 = 36;
    /// The player's mouth toggles every this many ticks.
    pub const MOUTH_TOGGLE_TICKS: u64 = 6;
}

/// Ghost behaviour tunables.
pub mod ghost {
    /// A ghost attempts a step decision once every this many ticks.
    pub const NORMAL_CADENCE: u32 = 2;
    pub const FRIGHTENED_CADENCE: u32 = 3;
    /// How far ahead of the player Pinky aims.
    pub const AMBUSH_LOOKAHEAD: i32 = 4;
    /// How far ahead of the player Inky aims.
    pub const FLANK_LOOKAHEAD: i32 = 2;
    /// The chance Inky ignores targeting and wanders instead.
    pub const FLANK_WANDER_CHANCE: f64 = 0.3;
    /// Clyde retreats once within this Manhattan distance of the player.
    pub const SHY_RADIUS: i32 = 8;
}

/// Bonus fruit spawning.
pub mod fruit {
    /// A fruit spawns when this many pellets (and twice as many) have been eaten in a level.
    pub const SPAWN_THRESHOLD: u32 = 70;
}

/// The raw layouts of the playable mazes, selected cyclically by level.
///
/// `#` wall, `.` pellet, `o` power pellet, ` ` empty path, `=` ghost den,
/// `X` player start, `1`-`4` ghost starts, `F` fruit spawn.
pub const LEVEL_TEMPLATES: [&[&str]; 2] = [
    &[
        "####################",
        "#X.......##........#",
        "#.##.###.##.###.##.#",
        "#o................o#",
        "#.##.#.######.#.##.#",
        "#....#...##...#....#",
        "####.###.  .###.####",
        "####.#        #.####",
        "####.# ==  == #.####",
        "    .  = 34 =  .    ",
        "####.# = 12 = #.####",
        "####.# ====== #.####",
        "####.#        #.####",
        "####.# ###### #.####",
        "#........F.........#",
        "#.##.###.##.###.##.#",
        "#o.#............#.o#",
        "##.#.#.######.#.#.##",
        "#....#...##...#....#",
        "#..................#",
        "####################",
    ],
    &[
        "####################",
        "#X.......##........#",
        "#.#.####.##.####.#.#",
        "#o................o#",
        "#.####.#.##.#.####.#",
        "#......#....#......#",
        "####.###.  .###.####",
        "####.#        #.####",
        "####.# ==  == #.####",
        "    .  = 34 =  .    ",
        "####.# = 12 = #.####",
        "####.# ====== #.####",
        "####.#        #.####",
        "####.# ###### #.####",
        "#........F.........#",
        "#.#.####.##.####.#.#",
        "#o.#............#.o#",
        "##.#.#.######.#.#.##",
        "#....#...##...#....#",
        "#..................#",
        "####################",
    ],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_time() {
        // 60 FPS = 16.67ms per frame
        let expected_nanos = (1_000_000_000.0 / 60.0) as u64;
        assert_eq!(LOOP_TIME.as_nanos() as u64, expected_nanos);
    }

    #[test]
    fn test_capture_box_is_half_a_tile() {
        assert_eq!(TILE_SIZE % 2, 0);
    }

    #[test]
    fn test_level_template_dimensions() {
        for template in LEVEL_TEMPLATES.iter() {
            assert_eq!(template.len(), 21);
            for row in template.iter() {
                assert_eq!(row.len(), 20);
            }
        }
    }

    #[test]
    fn test_level_template_boundaries() {
        for template in LEVEL_TEMPLATES.iter() {
            assert!(template[0].chars().all(|c| c == '#'));
            assert!(template[template.len() - 1].chars().all(|c| c == '#'));
        }
    }

    #[test]
    fn test_level_template_tunnel_row() {
        for template in LEVEL_TEMPLATES.iter() {
            let tunnel_row = template[9];
            assert_eq!(tunnel_row.chars().next().unwrap(), ' ');
            assert_eq!(tunnel_row.chars().last().unwrap(), ' ');
        }
    }

    #[test]
    fn test_level_template_power_pellets() {
        for template in LEVEL_TEMPLATES.iter() {
            let count: usize = template.iter().map(|row| row.chars().filter(|&c| c == 'o').count()).sum();
            assert_eq!(count, 4);
        }
    }

    #[test]
    fn test_level_template_markers_are_unique() {
        for template in LEVEL_TEMPLATES.iter() {
            for marker in ['X', '1', '2', '3', '4', 'F'] {
                let count: usize = template.iter().map(|row| row.chars().filter(|&c| c == marker).count()).sum();
                assert_eq!(count, 1, "marker {marker} should appear exactly once");
            }
        }
    }

    #[test]
    fn test_fruit_threshold_fits_in_levels() {
        for template in LEVEL_TEMPLATES.iter() {
            let pellets: usize = template.iter().map(|row| row.chars().filter(|&c| c == '.').count()).sum();
            assert!(pellets as u32 >= fruit::SPAWN_THRESHOLD * 2);
        }
    }
}
