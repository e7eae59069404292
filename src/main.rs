use airlog::app::App;
use airlog::config::{Command, Config, USAGE};
use airlog::data::{self, load_summary, load_user, Dataset, DirSource};
use airlog::map::MapRenderer;
use airlog::telemetry::{self, LogTarget};
use airlog::views::{SummaryView, UserView};
use airlog::{report, ui};
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::time::Duration;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args)? {
        Command::Run(config) => config,
        Command::Help => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    let target = match (&config.log_file, config.plain) {
        (Some(path), _) => LogTarget::File(path),
        (None, true) => LogTarget::Stderr,
        (None, false) => LogTarget::Discard,
    };
    telemetry::init(target)?;

    // Directory and manifest are required; fail before touching the terminal
    let dataset = Dataset::load(&config.data_dir)?;
    let source = DirSource::new(&config.data_dir);

    if config.plain {
        return print_plain(&dataset, &source, config.user.as_deref());
    }

    let mut map_renderer = MapRenderer::new();
    if data::load_all_geojson(&mut map_renderer, &config.maps_dir) == 0 {
        tracing::info!(dir = %config.maps_dir.display(), "no map files, using built-in outlines");
    }
    if !map_renderer.has_data() {
        data::generate_simple_world(&mut map_renderer);
    }

    let mut terminal = ratatui::init();
    with_restore(
        |terminal: &mut DefaultTerminal| {
            terminal.clear()?;
            execute!(std::io::stdout(), EnableMouseCapture)?;
            run(terminal, dataset, source, map_renderer, config.user)
        },
        &mut terminal,
        || {
            let _ = execute!(std::io::stdout(), DisableMouseCapture);
            ratatui::restore();
        },
    )
}

/// Run `body`, then `restore` whether or not any step of `body` failed
fn with_restore<T, S>(
    body: impl FnOnce(&mut S) -> Result<T>,
    state: &mut S,
    restore: impl FnOnce(),
) -> Result<T> {
    let result = body(state);
    restore();
    result
}

fn print_plain(dataset: &Dataset, source: &DirSource, user: Option<&str>) -> Result<()> {
    let mut out = std::io::stdout().lock();
    match user {
        Some(user) => {
            let view = UserView::new(user, load_user(source, user), &dataset.airports);
            report::write_user(&mut out, &view)?;
        }
        None => {
            let summary = load_summary(source, &dataset.users);
            report::write_summary(&mut out, &SummaryView::new(summary, &dataset.airports))?;
        }
    }
    Ok(())
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        MouseEventKind::Down(MouseButton::Left) => app.start_drag(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn handle_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc | KeyCode::Backspace => {
            if app.current_user().is_some() {
                app.back();
            } else if code == KeyCode::Esc {
                app.quit();
            }
        }

        // User picker
        KeyCode::Char(']') => app.cycle_user(true),
        KeyCode::Char('[') => app.cycle_user(false),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Tab => app.toggle_tab(),

        // Table selection
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.move_selection(-10),
        KeyCode::PageDown => app.move_selection(10),

        // Map navigation
        KeyCode::Char('h') | KeyCode::Left => app.pan(-10, 0),
        KeyCode::Char('l') | KeyCode::Right => app.pan(10, 0),
        KeyCode::Char('k') => app.pan(0, -6),
        KeyCode::Char('j') => app.pan(0, 6),
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    dataset: Dataset,
    source: DirSource,
    map_renderer: MapRenderer,
    user: Option<String>,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(dataset, Box::new(source), map_renderer, size.width, size.height, user);

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key.code),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
