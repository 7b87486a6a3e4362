use std::{
    fs::File,
    io::{self},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    ExecutableCommand,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Flex, Layout, Margin, Rect},
    style::{Color, Style, Stylize},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    DefaultTerminal, Frame,
};
use tui_big_text::{BigText, PixelSize};

mod game;
mod game_theme;
mod helpers;
mod scores;
mod wall;

use crate::{
    game::{BoardSignal, Game},
    game_theme::GameTheme,
    helpers::centered_percent,
    scores::{ScoreStore, DEFAULT_SCORE_FILE},
};

const MIN_WIDTH: u16 = 70;
const MIN_HEIGHT: u16 = 24;

const MAIN_MENU_OPTIONS: [&str; 3] = ["Start Game", "Settings", "Exit"];
const MAX_NAME_LEN: usize = 16;

#[derive(Debug)]
struct MainMenu {
    options: Vec<&'static str>,
    selected: usize,
}

#[derive(Debug)]
enum AppScreen {
    MainMenu,
    Game,
    /// Collect a name for a run that just beat the stored record.
    NameInput {
        score: u32,
    },
    Settings,
}

struct App {
    exit: bool,
    main_menu: MainMenu,
    current_game: Option<Game>,
    screen: AppScreen,
    name_input: String,
    // Settings
    ball_speed_scale: f32,
    selected_theme: GameTheme,
    settings_selected: usize, // 0: ball speed, 1: theme, 2: back
}

impl App {
    fn new() -> Self {
        let main_menu = MainMenu {
            options: MAIN_MENU_OPTIONS.to_vec(),
            selected: 0,
        };

        Self {
            exit: false,
            main_menu,
            current_game: None,
            screen: AppScreen::MainMenu,
            name_input: String::new(),
            ball_speed_scale: 1.0,
            selected_theme: GameTheme::Monokai,
            settings_selected: 0,
        }
    }

    pub fn run(&mut self, mut terminal: DefaultTerminal) -> io::Result<()> {
        while !self.exit {
            let size = terminal.size()?;
            if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
                self.handle_resize_wait_events()?;
                terminal.draw(|frame| self.show_terminal_resize_warning(frame))?;
                continue;
            }

            match self.screen {
                AppScreen::MainMenu => {
                    self.handle_menu_events()?;
                    let _ = terminal.draw(|frame| self.draw_menu(frame));
                }
                AppScreen::Game => match self.current_game.as_mut() {
                    Some(game) => match game.frame()? {
                        BoardSignal::Continue => {
                            let _ = terminal.draw(|frame| game.draw(frame));
                        }
                        BoardSignal::ToMenu => {
                            self.current_game = None;
                            self.screen = AppScreen::MainMenu;
                        }
                        BoardSignal::Exit => self.exit = true,
                        BoardSignal::NewRecord(score) => {
                            self.name_input.clear();
                            self.screen = AppScreen::NameInput { score };
                        }
                    },
                    None => {
                        self.screen = AppScreen::MainMenu;
                    }
                },
                AppScreen::NameInput { score } => {
                    self.handle_name_input_events(score)?;
                    let _ = terminal.draw(|frame| {
                        // keep the finished board visible behind the prompt
                        if let Some(game) = self.current_game.as_mut() {
                            game.draw(frame);
                        }
                        self.draw_name_input(frame);
                    });
                }
                AppScreen::Settings => {
                    self.handle_settings_events()?;
                    let _ = terminal.draw(|frame| self.draw_settings(frame));
                }
            }
        }

        Ok(())
    }

    fn show_terminal_resize_warning(&mut self, frame: &mut Frame) {
        let colors = self.selected_theme.colors();
        let popup_area = centered_percent(frame.area(), 60, 20);
        let popup = Paragraph::new("Terminal too small!\nPlease resize.")
            .block(
                Block::default()
                    .title("Warning")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick),
            )
            .style(Style::default().fg(colors.ball))
            .alignment(Alignment::Center);
        frame.render_widget(popup, popup_area);
    }

    fn handle_resize_wait_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    self.exit = true;
                }
            }
        }
        Ok(())
    }

    fn draw_menu(&mut self, frame: &mut Frame) {
        let vertical_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Length(12),
                Constraint::Length(11),
                Constraint::Max(5),
            ])
            .flex(Flex::Center)
            .split(frame.area());

        let big_text = BigText::builder()
            .pixel_size(PixelSize::Sextant)
            .style(Style::new().blue())
            .lines(vec![
                "".into(),
                "terminal".cyan().into(),
                "BREAKOUT".white().into(),
                "▀▀▀▀▀▀▀▀".light_red().into(),
            ])
            .alignment(Alignment::Center)
            .build();
        frame.render_widget(big_text, vertical_layout[0]);

        let options_block_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(30)])
            .flex(Flex::Center)
            .split(vertical_layout[1]);
        frame.render_widget(
            Block::default()
                .style(Style::default().fg(Color::Cyan))
                .borders(Borders::ALL)
                .border_type(BorderType::Double),
            options_block_layout[0],
        );

        let inner_options = options_block_layout[0].inner(Margin::new(1, 1));
        let option_areas = Layout::vertical(vec![Constraint::Max(1); 2 * self.main_menu.options.len()])
            .flex(Flex::Center)
            .split(inner_options);

        for (i, &option) in self.main_menu.options.iter().enumerate() {
            let mut option_widget = Paragraph::new(option)
                .style(Style::default().fg(Color::Green).bold())
                .alignment(Alignment::Center);

            if i == self.main_menu.selected {
                option_widget = option_widget.style(
                    Style::default()
                        .bg(Color::Reset)
                        .fg(Color::White)
                        .bold()
                        .italic(),
                );
            }

            frame.render_widget(option_widget, option_areas[i * 2]);
        }

        let hint = Paragraph::new("↑/↓ select  Enter confirm  q quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(hint, vertical_layout[2]);
    }

    fn handle_menu_events(&mut self) -> io::Result<()> {
        // Non-blocking event polling with short timeout
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    let last = self.main_menu.options.len() - 1;
                    match key_event.code {
                        KeyCode::Char('q') => self.exit = true,
                        KeyCode::Up => {
                            if self.main_menu.selected > 0 {
                                self.main_menu.selected -= 1;
                            } else {
                                self.main_menu.selected = last;
                            }
                        }
                        KeyCode::Down => {
                            if self.main_menu.selected < last {
                                self.main_menu.selected += 1;
                            } else {
                                self.main_menu.selected = 0;
                            }
                        }
                        KeyCode::Enter => match self.main_menu.selected {
                            0 => {
                                let store = ScoreStore::new(DEFAULT_SCORE_FILE);
                                self.current_game = Some(Game::new(
                                    self.selected_theme,
                                    self.ball_speed_scale,
                                    store,
                                ));
                                self.screen = AppScreen::Game;
                            }
                            1 => {
                                self.settings_selected = 0;
                                self.screen = AppScreen::Settings;
                            }
                            2 => self.exit = true,
                            _ => {}
                        },
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn draw_name_input(&self, frame: &mut Frame) {
        let popup_area = centered_percent(frame.area(), 60, 20);
        frame.render_widget(Clear, popup_area);
        let input = format!(
            "You broke the record! What's your name? (max {} chars)\n> {}",
            MAX_NAME_LEN, self.name_input
        );
        let popup = Paragraph::new(input)
            .block(
                Block::default()
                    .title("New High Score")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick),
            )
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center);
        frame.render_widget(popup, popup_area);
    }

    fn handle_name_input_events(&mut self, score: u32) -> io::Result<()> {
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    match key_event.code {
                        KeyCode::Enter => {
                            if let Some(game) = self.current_game.as_mut() {
                                game.commit_high_score(&self.name_input, score);
                            }
                            self.name_input.clear();
                            self.screen = AppScreen::Game;
                        }
                        KeyCode::Esc => {
                            // player waves the record away
                            self.name_input.clear();
                            self.screen = AppScreen::Game;
                        }
                        KeyCode::Backspace => {
                            self.name_input.pop();
                        }
                        KeyCode::Char(c) => {
                            if self.name_input.len() < MAX_NAME_LEN
                                && (c.is_ascii_graphic() || c == ' ')
                            {
                                self.name_input.push(c);
                            }
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    // --- Settings Screen ---
    fn draw_settings(&mut self, frame: &mut Frame) {
        let colors = self.selected_theme.colors();
        let settings = [
            format!("Ball Speed: {:.1}x", self.ball_speed_scale),
            format!("Theme: {}", self.selected_theme.name()),
            "Back".to_string(),
        ];

        let [settings_area] = Layout::horizontal([Constraint::Percentage(50)])
            .flex(Flex::Center)
            .areas(frame.area());
        let [settings_block_area, preview_area] =
            Layout::vertical([Constraint::Length(10), Constraint::Length(3)])
                .flex(Flex::Center)
                .areas(settings_area);
        let settings_block = Block::default()
            .title("Settings")
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .style(Style::default().fg(colors.accent));
        frame.render_widget(settings_block, settings_block_area);

        let line_height = 2;
        let start_y = settings_block_area.y
            + settings_block_area
                .height
                .saturating_sub((settings.len() * line_height) as u16)
                / 2;
        for (i, setting) in settings.iter().enumerate() {
            let para = if i == self.settings_selected {
                Paragraph::new(format!("> {} <", setting))
                    .style(Style::default().fg(Color::White).bold())
                    .alignment(Alignment::Center)
            } else {
                Paragraph::new(format!("  {}  ", setting))
                    .style(Style::default().fg(colors.text))
                    .alignment(Alignment::Center)
            };
            let line_area = Rect {
                x: settings_block_area.x + 2,
                y: start_y + (i * line_height) as u16,
                width: settings_block_area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(para, line_area);
        }

        // swatch bar previewing the selected theme's board colors
        let preview_colors = [
            ("Paddle", colors.paddle),
            ("Ball", colors.ball),
            ("Clay", colors.brick_clay),
            ("Cement", colors.brick_cement),
            ("Steel", colors.brick_steel),
            ("Accent", colors.accent),
        ];
        let bar_width = preview_area.width.saturating_sub(4);
        let block_width = (bar_width / preview_colors.len() as u16).max(1);
        for (i, (_, color)) in preview_colors.iter().enumerate() {
            let color_rect = Rect {
                x: preview_area.x + 2 + (i as u16) * block_width,
                y: preview_area.y + 1,
                width: block_width,
                height: 1,
            };
            frame.render_widget(
                Paragraph::new("").style(Style::default().bg(*color)),
                color_rect,
            );
        }
        let label_text = preview_colors
            .iter()
            .map(|(label, _)| format!("{:^width$}", label, width = block_width as usize))
            .collect::<Vec<_>>()
            .join("");
        let label_area = Rect {
            x: preview_area.x + 2,
            y: preview_area.y + 2,
            width: bar_width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(label_text)
                .style(Style::default().fg(colors.text))
                .alignment(Alignment::Left),
            label_area,
        );
    }

    fn handle_settings_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    match key_event.code {
                        KeyCode::Up => {
                            if self.settings_selected > 0 {
                                self.settings_selected -= 1;
                            } else {
                                self.settings_selected = 2;
                            }
                        }
                        KeyCode::Down => {
                            if self.settings_selected < 2 {
                                self.settings_selected += 1;
                            } else {
                                self.settings_selected = 0;
                            }
                        }
                        KeyCode::Left => match self.settings_selected {
                            0 => {
                                self.ball_speed_scale =
                                    (self.ball_speed_scale - 0.1).clamp(0.5, 2.0)
                            }
                            1 => self.selected_theme = self.selected_theme.prev(),
                            _ => {}
                        },
                        KeyCode::Right => match self.settings_selected {
                            0 => {
                                self.ball_speed_scale =
                                    (self.ball_speed_scale + 0.1).clamp(0.5, 2.0)
                            }
                            1 => self.selected_theme = self.selected_theme.next(),
                            _ => {}
                        },
                        KeyCode::Enter => {
                            if self.settings_selected == 2 {
                                self.screen = AppScreen::MainMenu;
                            }
                        }
                        KeyCode::Esc => {
                            self.screen = AppScreen::MainMenu;
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Route logs to a file when RUST_LOG is set; stderr belongs to the TUI.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    if let Ok(file) = File::create("terminal-breakout.log") {
        let _ = env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();
    }
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let terminal = ratatui::init();

    let mut stdout = io::stdout();
    stdout.execute(EnableMouseCapture)?;
    stdout.execute(EnableFocusChange)?;
    // Terminals speaking the kitty keyboard protocol report key releases;
    // everywhere else the push is ignored and movement stops on other keys.
    let enhanced = stdout
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    let mut app = App::new();
    let app_result = app.run(terminal);

    if enhanced {
        let _ = io::stdout().execute(PopKeyboardEnhancementFlags);
    }
    let _ = io::stdout().execute(DisableFocusChange);
    let _ = io::stdout().execute(DisableMouseCapture);
    ratatui::restore();

    app_result.context("game ended with an error")?;

    println!("Thanks for playing terminal.breakout!");
    if let Some(record) = ScoreStore::new(DEFAULT_SCORE_FILE).load() {
        println!("High score to beat: {} ({})", record.score, record.name);
    }

    Ok(())
}
