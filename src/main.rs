use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::info;

use quake_dash::app::App;
use quake_dash::catalog::Catalog;
use quake_dash::cli::Args;
use quake_dash::data::{generate_simple_world, load_basemap};
use quake_dash::map::MapRenderer;
use quake_dash::{logging, ui};

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = logging::init(args.log_file.as_deref())?;

    // Load before touching the terminal so errors reach stderr intact
    let catalog = Catalog::load(&args.data)
        .with_context(|| format!("failed to load earthquake catalog {}", args.data.display()))?;

    let mut map_renderer = MapRenderer::new();
    load_basemap(&mut map_renderer, &args.basemap_dir);
    if !map_renderer.has_data() {
        info!("no base map data found, using built-in outline");
        generate_simple_world(&mut map_renderer);
    }

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, catalog, map_renderer, &args);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => app.close_popup(),

        // Selection in the focused pane
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Enter => app.pin_selected_row(),

        // Pan
        KeyCode::Char('a') | KeyCode::Left => app.pan(-10, 0),
        KeyCode::Char('d') | KeyCode::Right => app.pan(10, 0),
        KeyCode::Char('w') => app.pan(0, -6),
        KeyCode::Char('s') => app.pan(0, 6),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        KeyCode::Char('b') | KeyCode::Char('B') => app.map_renderer.toggle_borders(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.map_renderer.toggle_coastlines(),

        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

/// Handle mouse events for picking, panning and zooming
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel zooms towards the cursor
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan(-15, 0),
        MouseEventKind::ScrollRight => app.pan(15, 0),
        // Drag from a map pans; press and release in place picks a marker
        MouseEventKind::Down(MouseButton::Left) => app.press(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.release(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Right) => app.close_popup(),
        _ => {}
    }
}

fn run(
    terminal: &mut DefaultTerminal,
    catalog: Catalog,
    map_renderer: MapRenderer,
    args: &Args,
) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(catalog, map_renderer, args.lang, size.width, size.height);

    // Nothing changes between events, so only redraw after one
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| ui::render(frame, &app))?;
            dirty = false;
        }

        // Handle events with ~60fps target
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(&mut app, key),
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Moved,
                    ..
                }) => continue,
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width, height),
                _ => continue,
            }
            dirty = true;
        }

        if app.should_quit {
            break;
        }
    }

    info!("dashboard closed");
    Ok(())
}
