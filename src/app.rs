//! The interactive session: terminal setup, the cooperative tick driver,
//! and the wiring between key presses, the engine, and the renderer.

use std::io::{stderr, Stderr};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, info};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::time::{interval, interval_at, Instant, Interval, MissedTickBehavior};

use crate::game::{Direction, GameConfig, GameEngine, GameState, GameStatus};
use crate::input::{InputHandler, KeyAction};
use crate::prefs::PrefsStore;
use crate::render::{Hud, Renderer};

/// Frames are drawn at 30 FPS regardless of the simulation speed
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

/// One interactive session: owns the engine, the current game state, and
/// the preference store, and drives all three from a single select loop.
pub struct App {
    engine: GameEngine,
    state: GameState,
    prefs: PrefsStore,
    renderer: Renderer,
    input_handler: InputHandler,
    pending_steer: Option<Direction>,
    should_quit: bool,
}

impl App {
    pub fn new(config: GameConfig, prefs: PrefsStore) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            prefs,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            pending_steer: None,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run the event loop with cleanup
        let result = self.run_event_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = Self::tick_timer(self.prefs.speed());
        let mut render_timer = interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &hud);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// The delay between simulation steps is `1000 / speed` ms, measured
    /// from the end of the previous step (no catch-up for slow ticks).
    fn tick_timer(speed: u16) -> Interval {
        let period = Duration::from_millis(1000 / u64::from(speed));
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        timer
    }

    fn hud(&self) -> Hud {
        Hud {
            best_score: self.prefs.best_score(),
            speed: self.prefs.speed(),
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);
            self.apply_action(action, tick_timer);
        }
    }

    fn apply_action(&mut self, action: KeyAction, tick_timer: &mut Interval) {
        match action {
            KeyAction::Steer(direction) => {
                if self.state.status == GameStatus::Idle {
                    // Steering an idle board starts the run, and the
                    // pressed direction wins over the Right default.
                    self.state.snake.turn(direction);
                    self.engine.start(&mut self.state);
                    tick_timer.reset();
                } else {
                    // Validated against the travel direction at the next
                    // tick; the last press before a tick wins.
                    self.pending_steer = Some(direction);
                }
            }
            KeyAction::Start => {
                if matches!(self.state.status, GameStatus::Idle | GameStatus::Over) {
                    self.pending_steer = None;
                    self.engine.start(&mut self.state);
                    tick_timer.reset();
                }
            }
            KeyAction::TogglePause => {
                self.engine.toggle_pause(&mut self.state);
                if self.state.status == GameStatus::Running {
                    // Resuming re-arms a full period from now.
                    tick_timer.reset();
                }
            }
            KeyAction::Restart => {
                self.pending_steer = None;
                self.engine.restart(&mut self.state);
            }
            KeyAction::SpeedUp => {
                self.change_speed(self.prefs.speed().saturating_add(1), tick_timer);
            }
            KeyAction::SpeedDown => {
                self.change_speed(self.prefs.speed().saturating_sub(1), tick_timer);
            }
            KeyAction::Quit => {
                self.should_quit = true;
            }
            KeyAction::None => {}
        }
    }

    /// Persist the new speed and rebuild the tick timer with it. The
    /// in-flight delay is abandoned; the new period applies from now.
    fn change_speed(&mut self, speed: u16, tick_timer: &mut Interval) {
        let speed = self.prefs.set_speed(speed);
        *tick_timer = Self::tick_timer(speed);
        debug!("speed set to {speed}");
    }

    fn update_game(&mut self) {
        // Paused and Over cancel the driver cooperatively: the tick fires
        // but the state is left untouched.
        if self.state.status != GameStatus::Running {
            return;
        }

        let steer = self.pending_steer.take();
        let result = self.engine.step(&mut self.state, steer);

        if result.ate_food && self.prefs.record_score(self.state.score) {
            debug!("new best score: {}", self.state.score);
        }

        if result.game_over {
            info!("game over at score {}", self.state.score);
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
