use std::io;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use sortscope_core::AppConfig;
use sortscope_tui::{
    app::{App, Mode},
    event::{spawn_explanation, spawn_quiz, AdvisoryResult, AppEvent, EventHandler},
    input::{handle_key_event, Action},
    keymap::Keymap,
    widgets::{AlgorithmsWidget, BarsWidget, PopupWidget, StatusBarWidget},
    Theme,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);
    let theme = Theme::from_overrides(&config.ui.colors);
    let mut app = App::new(config.clone(), theme);
    info!(algorithm = app.algorithm().id(), "starting TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("sortscope"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = main_loop(&mut terminal, &mut app, &keymap);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    keymap: &Keymap,
) -> Result<()> {
    let event_handler = EventHandler::new(app.config.ui.tick_rate_ms);

    // Create channel for async advisory results
    let (advisory_tx, mut advisory_rx) = mpsc::unbounded_channel::<AdvisoryResult>();

    loop {
        // Process any finished advisory requests (non-blocking)
        while let Ok(result) = advisory_rx.try_recv() {
            app.handle_advisory_result(result);
        }

        app.tick(Instant::now());

        terminal.draw(|frame| draw(frame, app, keymap))?;

        if let Some(AppEvent::Key(key)) = event_handler.next()? {
            let action = handle_key_event(key, app, keymap);
            handle_action(app, action, &advisory_tx);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn draw(frame: &mut Frame, app: &App, keymap: &Keymap) {
    let size = frame.area();

    // Main layout: content + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(10)])
        .split(main_layout[0]);

    AlgorithmsWidget::render(frame, columns[0], app);
    BarsWidget::render(frame, columns[1], app);
    StatusBarWidget::render(frame, main_layout[1], app, keymap);

    match &app.mode {
        Mode::CustomInput(input) => PopupWidget::render_custom_input(frame, input, &app.theme),
        Mode::Explanation => PopupWidget::render_explanation(frame, app),
        Mode::Quiz => PopupWidget::render_quiz(frame, app),
        Mode::Help => PopupWidget::render_help(frame, keymap, &app.theme),
        Mode::Normal => {}
    }
}

fn handle_action(app: &mut App, action: Action, advisory_tx: &mpsc::UnboundedSender<AdvisoryResult>) {
    match action {
        Action::Quit => app.should_quit = true,
        Action::Generate => app.generate_array(&mut rand::rng()),
        Action::Start => app.start_sort(),
        Action::TogglePause => app.toggle_pause(),
        Action::NextAlgorithm => app.cycle_algorithm(true),
        Action::PrevAlgorithm => app.cycle_algorithm(false),
        Action::SizeUp => app.resize_array(true, &mut rand::rng()),
        Action::SizeDown => app.resize_array(false, &mut rand::rng()),
        Action::SpeedUp => app.change_speed(true),
        Action::SpeedDown => app.change_speed(false),
        Action::CustomArray => app.open_custom_input(),
        Action::Explain => {
            if let Some((advisor, algorithm)) = app.request_explanation() {
                spawn_explanation(advisor, algorithm, advisory_tx.clone());
            }
        }
        Action::Quiz => {
            if let Some((advisor, algorithm)) = app.request_quiz() {
                spawn_quiz(advisor, algorithm, advisory_tx.clone());
            }
        }
        Action::Help => app.toggle_help(),
        Action::Answer(option) => app.answer_quiz(option),
        Action::ExitMode => app.exit_mode(),
        Action::Confirm => app.submit_custom_input(),
        Action::InputChar(c) => {
            if let Mode::CustomInput(ref mut input) = app.mode {
                input.push(c);
            }
        }
        Action::Backspace => {
            if let Mode::CustomInput(ref mut input) = app.mode {
                input.pop();
            }
        }
        Action::None => {}
    }
}
