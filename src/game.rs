use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use std::{
    io,
    time::{Duration, Instant},
};

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    game_theme::{GameTheme, ThemeColors},
    helpers::centered_in,
    scores::{HighScore, ScoreStore},
    wall::{BrickKind, Wall, LEVEL_COUNT, PADDLE_Y, STARTING_BALLS},
};

/// Fixed board update cadence.
const TICK_MS: u64 = 10;

const PAUSE_TITLE: &str = "Pause Menu";
const PAUSE_LABELS: [&str; 4] = ["Continue", "Restart", "Home", "Exit"];
const DEFAULT_PLAYER_NAME: &str = "Player";

/// What the App should do after a frame on the board screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardSignal {
    Continue,
    /// Hand control back to the main menu.
    ToMenu,
    /// Quit the application.
    Exit,
    /// A run just ended with a score that beats the stored record; collect a
    /// player name and call `commit_high_score` with it.
    NewRecord(u32),
}

#[derive(Debug, Clone, Copy)]
enum PauseAction {
    Continue,
    Restart,
    Home,
    Exit,
}

/// The pause overlay and its four click regions, computed whenever the board
/// area changes rather than during paint.
#[derive(Debug, Default, Clone, Copy)]
struct PauseMenu {
    area: Rect,
    buttons: [Rect; 4],
}

impl PauseMenu {
    fn layout(board: Rect) -> Self {
        let area = centered_in(board, 30, 11);
        let mut buttons = [Rect::default(); 4];
        for (i, label) in PAUSE_LABELS.iter().enumerate() {
            let w = (label.len() as u16 + 2).min(area.width);
            buttons[i] = Rect::new(
                area.x + area.width.saturating_sub(w) / 2,
                area.y + 2 + i as u16 * 2,
                w,
                1,
            );
        }
        Self { area, buttons }
    }

    fn hit(&self, column: u16, row: u16) -> Option<PauseAction> {
        const ACTIONS: [PauseAction; 4] = [
            PauseAction::Continue,
            PauseAction::Restart,
            PauseAction::Home,
            PauseAction::Exit,
        ];
        let pos = Position::new(column, row);
        self.buttons
            .iter()
            .position(|b| b.contains(pos))
            .map(|i| ACTIONS[i])
    }
}

/// The game board controller: owns the session (score, status message, pause
/// and timer flags), drives the wall model on a fixed tick and routes input.
pub struct Game {
    wall: Wall,
    score: u32,
    message: String,
    highscore_line: String,
    cached_record: Option<HighScore>,
    store: ScoreStore,
    show_pause_menu: bool,
    timer_running: bool,
    timer_before_pause: bool,
    last_tick: Instant,
    board_area: Rect,
    pause_menu: PauseMenu,
    theme: GameTheme,
}

impl Game {
    pub fn new(theme: GameTheme, speed_scale: f32, store: ScoreStore) -> Self {
        let cached_record = store.load();
        let mut game = Self {
            wall: Wall::new(speed_scale),
            score: 0,
            message: "Press Space to launch".to_string(),
            highscore_line: String::new(),
            cached_record,
            store,
            show_pause_menu: false,
            timer_running: false,
            timer_before_pause: false,
            last_tick: Instant::now(),
            board_area: Rect::default(),
            pause_menu: PauseMenu::default(),
            theme,
        };
        game.refresh_highscore_line();
        game
    }

    /// One pass of the board screen: drain input, then run the fixed-cadence
    /// update if it is due. Drawing happens afterwards in the App loop.
    pub fn frame(&mut self) -> io::Result<BoardSignal> {
        let signal = self.handle_events()?;
        if signal != BoardSignal::Continue {
            return Ok(signal);
        }
        if self.timer_running && self.last_tick.elapsed() >= Duration::from_millis(TICK_MS) {
            self.last_tick = Instant::now();
            return Ok(self.advance_tick(TICK_MS as f32 / 1000.0));
        }
        Ok(BoardSignal::Continue)
    }

    /// One fixed-interval board update. Pure state transition: anything that
    /// needs the App (name prompt, screen change) comes back as the signal.
    fn advance_tick(&mut self, dt: f32) -> BoardSignal {
        self.wall.move_entities(dt);
        let impacts = self.wall.find_impacts();
        self.score += impacts.points;

        self.message = format!(
            "Bricks: {} Score: {} Balls: {}",
            self.wall.brick_count(),
            self.score,
            self.wall.ball_count()
        );
        self.refresh_highscore_line();

        if self.wall.is_ball_lost() {
            let mut signal = BoardSignal::Continue;
            if self.wall.ball_ended() {
                // the run's score, captured before any reset touches it
                let final_score = self.score;
                self.wall.wall_reset();
                self.score = 0;
                self.message = "Game over".to_string();
                if self.beats_record(final_score) {
                    signal = BoardSignal::NewRecord(final_score);
                }
            }
            self.wall.ball_reset();
            self.timer_running = false;
            return signal;
        }

        if self.wall.is_done() {
            if self.wall.ball_count() == STARTING_BALLS {
                // flawless level: double the run score
                self.score *= 2;
            }
            if self.wall.has_next_level() {
                self.message = "Go to Next Level".to_string();
                self.timer_running = false;
                self.wall.ball_reset();
                self.wall.next_level();
            } else {
                self.message = "ALL WALLS DESTROYED".to_string();
                self.timer_running = false;
                self.score = 0;
            }
        }

        BoardSignal::Continue
    }

    fn beats_record(&self, candidate: u32) -> bool {
        candidate > self.cached_record.as_ref().map_or(0, |r| r.score)
    }

    /// Persist a freshly-earned record under `name` and refresh the cached
    /// display line. A write failure is logged, never fatal.
    pub fn commit_high_score(&mut self, name: &str, score: u32) {
        if !self.store.qualifies(score) {
            return;
        }
        let name = name.trim();
        let record = HighScore {
            name: if name.is_empty() {
                DEFAULT_PLAYER_NAME.to_string()
            } else {
                name.to_string()
            },
            score,
        };
        match self.store.persist(&record) {
            Ok(()) => {
                log::info!("new high score: {}:{}", record.name, record.score);
                self.cached_record = Some(record);
            }
            Err(err) => log::warn!("failed to persist high score: {err}"),
        }
        self.refresh_highscore_line();
    }

    fn refresh_highscore_line(&mut self) {
        self.highscore_line = match &self.cached_record {
            Some(record) => format!("HighScore: {}:{}", record.name, record.score),
            None => "HighScore: none yet".to_string(),
        };
    }

    fn handle_events(&mut self) -> io::Result<BoardSignal> {
        let mut signal = BoardSignal::Continue;
        // process all pending events for better responsiveness
        while event::poll(Duration::from_millis(5))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_press(key),
                Event::Key(key) if key.kind == KeyEventKind::Release => {
                    // key release only arrives on kitty-protocol terminals
                    self.wall.paddle.stop();
                }
                Event::Mouse(mouse) => {
                    if let Some(s) = self.handle_mouse_event(mouse) {
                        signal = s;
                    }
                }
                Event::FocusLost => self.on_focus_lost(),
                _ => {}
            }
        }
        Ok(signal)
    }

    fn handle_key_press(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => {
                self.wall.paddle.move_left()
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => {
                self.wall.paddle.move_right()
            }
            KeyCode::Esc => {
                if self.show_pause_menu {
                    self.show_pause_menu = false;
                    self.timer_running = self.timer_before_pause;
                    if self.timer_running {
                        self.last_tick = Instant::now();
                    }
                } else {
                    self.show_pause_menu = true;
                    self.timer_before_pause = self.timer_running;
                    self.timer_running = false;
                }
            }
            KeyCode::Char(' ') => {
                if !self.show_pause_menu {
                    self.timer_running = !self.timer_running;
                    if self.timer_running {
                        self.last_tick = Instant::now();
                    }
                }
            }
            // any other key halts the paddle, same as a key release
            _ => self.wall.paddle.stop(),
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Option<BoardSignal> {
        if !self.show_pause_menu {
            return None;
        }
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        match self.pause_menu.hit(mouse.column, mouse.row)? {
            PauseAction::Continue => {
                // back to the board; the resume key restarts the clock
                self.show_pause_menu = false;
                self.timer_before_pause = false;
            }
            PauseAction::Restart => {
                self.message = "Restarting Game...".to_string();
                self.wall.ball_reset();
                self.wall.wall_reset();
                self.score = 0;
                self.show_pause_menu = false;
                self.timer_before_pause = false;
            }
            PauseAction::Home => {
                self.show_pause_menu = false;
                return Some(BoardSignal::ToMenu);
            }
            PauseAction::Exit => return Some(BoardSignal::Exit),
        }
        None
    }

    /// Losing terminal focus halts play without opening the pause menu.
    fn on_focus_lost(&mut self) {
        self.timer_running = false;
        self.message = "Focus Lost".to_string();
    }

    fn set_area(&mut self, area: Rect) {
        if area != self.board_area {
            self.board_area = area;
            self.pause_menu = PauseMenu::layout(area);
        }
    }

    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let colors = self.theme.colors();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Fill(1),   // board
                Constraint::Length(3), // controls footer
            ])
            .split(area);

        let board_area = layout[0];
        self.set_area(board_area);

        let block = Block::default()
            .title(self.board_title(board_area))
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .style(Style::default().fg(colors.border).bg(colors.background))
            .title_alignment(Alignment::Center);
        frame.render_widget(block, board_area);

        let inner = Rect::new(
            board_area.x + 1,
            board_area.y + 1,
            board_area.width.saturating_sub(2),
            board_area.height.saturating_sub(2),
        );
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        // Ratatui alternates two buffers and never resets them between
        // draws; wipe the field each frame so stale ball/paddle cells don't
        // bleed back in as ghosts.
        frame.render_widget(Clear, inner);

        for brick in self.wall.bricks.iter().filter(|b| !b.is_broken()) {
            let mut cells = Wall::court_rect_to_cells(inner, brick.x, brick.y, brick.w, brick.h);
            if cells.width > 1 {
                // one-cell gap between neighbours
                cells.width -= 1;
            }
            let color = if brick.is_damaged() {
                colors.brick_damaged
            } else {
                match brick.kind {
                    BrickKind::Clay => colors.brick_clay,
                    BrickKind::Cement => colors.brick_cement,
                    BrickKind::Steel => colors.brick_steel,
                }
            };
            frame.render_widget(Block::default().style(Style::default().bg(color)), cells);
        }

        let paddle = &self.wall.paddle;
        let paddle_cells = Wall::court_rect_to_cells(
            inner,
            paddle.x - paddle.width / 2.0,
            PADDLE_Y,
            paddle.width,
            0.0,
        );
        frame.render_widget(
            Block::default().style(Style::default().bg(colors.paddle)),
            paddle_cells,
        );

        let ball_cells =
            Wall::court_rect_to_cells(inner, self.wall.ball.x, self.wall.ball.y, 0.0, 0.0);
        frame.render_widget(
            Paragraph::new("█").style(Style::default().fg(colors.ball)),
            ball_cells,
        );

        // status + high score, centered mid-board
        let mid_y = inner.y + inner.height / 2;
        let status_area = Rect::new(
            inner.x,
            mid_y,
            inner.width,
            inner.bottom().saturating_sub(mid_y).min(2),
        );
        let status = Paragraph::new(format!("{}\n{}", self.message, self.highscore_line))
            .style(Style::default().fg(colors.text))
            .alignment(Alignment::Center);
        frame.render_widget(status, status_area);

        if self.show_pause_menu {
            self.draw_pause_menu(frame, &colors);
        }

        let controls =
            Paragraph::new(" A/← and D/→ move  |  Space = run/stop  |  Esc = pause menu ")
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .style(Style::default().fg(colors.border)),
                )
                .style(Style::default().fg(colors.text))
                .alignment(Alignment::Center);
        frame.render_widget(controls, layout[1]);
    }

    fn draw_pause_menu(&self, frame: &mut Frame, colors: &ThemeColors) {
        let menu = &self.pause_menu;
        frame.render_widget(Clear, menu.area);
        let block = Block::default()
            .title(PAUSE_TITLE)
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .style(Style::default().fg(colors.accent))
            .title_alignment(Alignment::Center);
        frame.render_widget(block, menu.area);

        for (label, rect) in PAUSE_LABELS.iter().zip(menu.buttons) {
            let button = Paragraph::new(*label)
                .style(Style::default().fg(colors.accent).bold())
                .alignment(Alignment::Center);
            frame.render_widget(button, rect);
        }
    }

    fn board_title(&self, area: Rect) -> String {
        let left = format!("Level {}/{}", self.wall.level(), LEVEL_COUNT);
        let right = format!("Balls {}", self.wall.ball_count());
        let name = "terminal.breakout";
        let used = left.len() + name.len() + right.len() + 6; // spaces + separators
        let dashes = (area.width as usize).saturating_sub(used) / 2;
        format!(
            " {} {} {} {} {} ",
            left,
            "─".repeat(dashes),
            name,
            "─".repeat(dashes),
            right
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wall::COURT_HEIGHT;
    use crossterm::event::KeyModifiers;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn game_in(dir: &TempDir) -> Game {
        let store = ScoreStore::new(dir.path().join("highscore.txt"));
        let mut game = Game::new(GameTheme::Monokai, 1.0, store);
        // stationary ball keeps ticks fully predictable
        game.wall.ball.vx = 0.0;
        game.wall.ball.vy = 0.0;
        game
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn left_click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn lose_ball(game: &mut Game) -> BoardSignal {
        game.wall.ball.x = 5.0;
        game.wall.ball.y = COURT_HEIGHT + 1.0;
        game.advance_tick(0.01)
    }

    #[test]
    fn quiet_ticks_update_the_message_and_keep_running() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.timer_running = true;

        for _ in 0..5 {
            assert_eq!(game.advance_tick(0.01), BoardSignal::Continue);
        }
        assert_eq!(game.message, "Bricks: 30 Score: 0 Balls: 3");
        assert_eq!(game.highscore_line, "HighScore: none yet");
        assert!(game.timer_running);
    }

    #[test]
    fn losing_a_ball_stops_the_clock_but_keeps_the_run() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.timer_running = true;
        game.score = 70;

        assert_eq!(lose_ball(&mut game), BoardSignal::Continue);
        assert!(!game.timer_running);
        assert_eq!(game.score, 70);
        // the ball was replaced on the paddle, ready for a relaunch
        assert!(!game.wall.is_ball_lost());
        assert_eq!(game.wall.ball_count(), STARTING_BALLS - 1);
    }

    #[test]
    fn game_over_resets_the_board_and_reports_a_new_record() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("highscore.txt"), "Alice:120").unwrap();
        let mut game = game_in(&dir);
        game.timer_running = true;
        game.score = 150;
        game.wall.drain_balls_to(1);

        assert_eq!(lose_ball(&mut game), BoardSignal::NewRecord(150));
        assert_eq!(game.message, "Game over");
        assert_eq!(game.score, 0);
        assert!(!game.timer_running);
        assert_eq!(game.wall.ball_count(), STARTING_BALLS);

        game.commit_high_score("Bob", 150);
        assert_eq!(
            fs::read_to_string(dir.path().join("highscore.txt"))
                .unwrap()
                .trim(),
            "Bob:150"
        );
        assert_eq!(game.highscore_line, "HighScore: Bob:150");
    }

    #[test]
    fn game_over_below_the_record_leaves_the_store_alone() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("highscore.txt"), "Alice:120").unwrap();
        let mut game = game_in(&dir);
        game.score = 100;
        game.wall.drain_balls_to(1);

        assert_eq!(lose_ball(&mut game), BoardSignal::Continue);
        assert_eq!(game.message, "Game over");
        assert_eq!(
            fs::read_to_string(dir.path().join("highscore.txt")).unwrap(),
            "Alice:120"
        );
    }

    #[test]
    fn committing_a_non_qualifying_score_is_a_no_op() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("highscore.txt"), "Alice:120").unwrap();
        let mut game = game_in(&dir);
        game.commit_high_score("Bob", 120);
        assert_eq!(
            fs::read_to_string(dir.path().join("highscore.txt")).unwrap(),
            "Alice:120"
        );
    }

    #[test]
    fn empty_name_falls_back_to_the_default() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.commit_high_score("   ", 50);
        assert_eq!(
            fs::read_to_string(dir.path().join("highscore.txt"))
                .unwrap()
                .trim(),
            "Player:50"
        );
    }

    #[test]
    fn flawless_level_doubles_the_score_exactly_once() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.timer_running = true;
        game.score = 40;
        game.wall.smash_all_bricks();

        assert_eq!(game.advance_tick(0.01), BoardSignal::Continue);
        assert_eq!(game.score, 80);
        assert_eq!(game.message, "Go to Next Level");
        assert!(!game.timer_running);
        assert_eq!(game.wall.level(), 2);

        // the rebuilt wall must not double again
        game.advance_tick(0.01);
        assert_eq!(game.score, 80);
    }

    #[test]
    fn damaged_level_clear_skips_the_bonus() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.score = 40;
        game.wall.drain_balls_to(STARTING_BALLS - 1);
        game.wall.smash_all_bricks();

        game.advance_tick(0.01);
        assert_eq!(game.score, 40);
        assert_eq!(game.message, "Go to Next Level");
    }

    #[test]
    fn clearing_the_last_level_ends_the_run() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        for _ in 0..LEVEL_COUNT - 1 {
            game.wall.next_level();
        }
        game.score = 10;
        game.wall.drain_balls_to(STARTING_BALLS - 1);
        game.wall.smash_all_bricks();

        game.advance_tick(0.01);
        assert_eq!(game.message, "ALL WALLS DESTROYED");
        assert_eq!(game.score, 0);
        assert!(!game.timer_running);
    }

    #[test]
    fn pause_toggle_restores_the_pre_pause_state() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);

        // from a running board
        game.timer_running = true;
        game.handle_key_press(key(KeyCode::Esc));
        assert!(game.show_pause_menu);
        assert!(!game.timer_running);
        game.handle_key_press(key(KeyCode::Esc));
        assert!(!game.show_pause_menu);
        assert!(game.timer_running);

        // from a stopped board
        game.timer_running = false;
        game.handle_key_press(key(KeyCode::Esc));
        game.handle_key_press(key(KeyCode::Esc));
        assert!(!game.show_pause_menu);
        assert!(!game.timer_running);
    }

    #[test]
    fn space_toggles_the_clock_unless_paused() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);

        game.handle_key_press(key(KeyCode::Char(' ')));
        assert!(game.timer_running);
        game.handle_key_press(key(KeyCode::Char(' ')));
        assert!(!game.timer_running);

        game.handle_key_press(key(KeyCode::Esc));
        game.handle_key_press(key(KeyCode::Char(' ')));
        assert!(!game.timer_running);
    }

    #[test]
    fn unrecognized_keys_halt_the_paddle() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);

        game.handle_key_press(key(KeyCode::Char('d')));
        game.wall.move_entities(0.1);
        let moved = game.wall.paddle.x;
        assert!(moved > crate::wall::COURT_WIDTH / 2.0);

        game.handle_key_press(key(KeyCode::Char('x')));
        game.wall.move_entities(0.1);
        assert_eq!(game.wall.paddle.x, moved);
    }

    #[test]
    fn focus_loss_halts_play_without_pausing() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.timer_running = true;
        game.on_focus_lost();
        assert!(!game.timer_running);
        assert!(!game.show_pause_menu);
        assert_eq!(game.message, "Focus Lost");
    }

    #[test]
    fn pause_menu_clicks_route_to_their_actions() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.set_area(Rect::new(0, 0, 80, 30));
        game.score = 55;
        game.show_pause_menu = true;

        // a click outside every button does nothing
        assert_eq!(game.handle_mouse_event(left_click(0, 0)), None);
        assert!(game.show_pause_menu);

        // restart clears the session
        let restart = game.pause_menu.buttons[1];
        assert_eq!(
            game.handle_mouse_event(left_click(restart.x, restart.y)),
            None
        );
        assert_eq!(game.score, 0);
        assert_eq!(game.message, "Restarting Game...");
        assert!(!game.show_pause_menu);

        // home hands control back to the menu
        game.show_pause_menu = true;
        let home = game.pause_menu.buttons[2];
        assert_eq!(
            game.handle_mouse_event(left_click(home.x, home.y)),
            Some(BoardSignal::ToMenu)
        );

        // exit quits
        game.show_pause_menu = true;
        let exit = game.pause_menu.buttons[3];
        assert_eq!(
            game.handle_mouse_event(left_click(exit.x, exit.y)),
            Some(BoardSignal::Exit)
        );
    }

    #[test]
    fn clicks_are_ignored_while_playing() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.set_area(Rect::new(0, 0, 80, 30));
        let cont = game.pause_menu.buttons[0];
        assert_eq!(game.handle_mouse_event(left_click(cont.x, cont.y)), None);
    }

    #[test]
    fn continue_leaves_the_clock_stopped() {
        let dir = tempdir().unwrap();
        let mut game = game_in(&dir);
        game.set_area(Rect::new(0, 0, 80, 30));
        game.timer_running = true;
        game.handle_key_press(key(KeyCode::Esc));

        let cont = game.pause_menu.buttons[0];
        game.handle_mouse_event(left_click(cont.x, cont.y));
        assert!(!game.show_pause_menu);
        // resuming play after Continue takes the resume key
        assert!(!game.timer_running);
    }
}
