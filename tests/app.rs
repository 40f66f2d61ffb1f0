use std::sync::Arc;

use mazechase::{
    app::{App, Autopilot, InputSource},
    config::GameConfig,
    error::GameResult,
    events::GameCommand,
    game::Game,
    render::{Frame, Renderer},
    systems::GameStage,
};
use parking_lot::Mutex;
use speculoos::prelude::*;

mod common;

/// Keeps every rendered frame's tick and stage.
#[derive(Clone, Default)]
struct CapturingRenderer {
    frames: Arc<Mutex<Vec<(u64, GameStage)>>>,
}

impl Renderer for CapturingRenderer {
    fn render(&mut self, frame: &Frame) -> GameResult<()> {
        self.frames.lock().push((frame.tick, frame.stage));
        Ok(())
    }
}

/// Replays a fixed script, one batch of commands per tick.
struct ScriptedInput {
    script: Vec<Vec<GameCommand>>,
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _frame: &Frame) -> Vec<GameCommand> {
        if self.script.is_empty() {
            Vec::new()
        } else {
            self.script.remove(0)
        }
    }
}

#[test]
fn test_run_for_stops_at_tick_limit() {
    let renderer = CapturingRenderer::default();
    let game = Game::new(GameConfig::default().with_seed(1)).expect("game");
    let mut app = App::new(game, Autopilot::default(), renderer.clone(), 10, false).expect("app");

    let ticks = app.run_for(Some(50)).expect("run");
    assert_that(&ticks).is_equal_to(50);
    assert_that(&app.game.stage()).is_equal_to(GameStage::Playing);

    let rendered: Vec<u64> = renderer.frames.lock().iter().map(|(tick, _)| *tick).collect();
    assert_that(&rendered).is_equal_to(vec![10, 20, 30, 40, 50]);
}

#[test]
fn test_exit_command_stops_the_loop() {
    let renderer = CapturingRenderer::default();
    let input = ScriptedInput {
        script: vec![vec![GameCommand::Start], vec![], vec![GameCommand::Exit]],
    };
    let mut app = App::new(common::test_game(), input, renderer.clone(), 100, false).expect("app");

    let ticks = app.run_for(Some(1_000)).expect("run");
    assert_that(&ticks).is_equal_to(3);
    // The final frame is always drawn.
    assert_that(&renderer.frames.lock().last().copied()).is_equal_to(Some((3, GameStage::Playing)));
}

#[test]
fn test_autopilot_scores() {
    let game = Game::new(GameConfig::default().with_seed(11)).expect("game");
    let mut app = App::new(game, Autopilot::default(), CapturingRenderer::default(), 60, false).expect("app");

    app.run_for(Some(600)).expect("run");
    assert_that(&app.game.score()).is_greater_than(0);
}

#[test]
fn test_autopilot_continues_after_level_clear() {
    let game = common::create_game(common::fast_config(), common::ONE_PELLET_MAZE);
    let mut app = App::new(game, Autopilot::default(), CapturingRenderer::default(), 60, false).expect("app");

    app.run_for(Some(300)).expect("run");
    assert_that(&app.game.level()).is_greater_than(1);
}

#[test]
fn test_autopilot_exits_after_game_over() {
    let mut game = common::test_game();
    game.world.insert_resource(GameStage::GameOver { overlay_ticks: 0 });
    let mut app = App::new(game, Autopilot::default(), CapturingRenderer::default(), 60, false).expect("app");

    let ticks = app.run_for(Some(1_000)).expect("run");
    assert_that(&ticks).is_less_than(200);
}
