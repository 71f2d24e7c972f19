mod audio;
mod driver;
mod playlist;
mod renderer;
mod session;
mod ui;
mod utils;

use audio::CpalPlayer;
use log::{debug, error, info};
use nannou::prelude::*;
use renderer::Resolution;
use session::{Session, SessionSettings};
use spectrum_draw::{window_to_canvas, CanvasSize, NannouSurface};
use std::cell::RefCell;
use std::env;
use std::path::PathBuf;
use std::time::Instant;
use ui::bindings::{parse_click, parse_key, Action};
use ui::StyleButton;
use utils::Config;

fn main() {
    let args: Vec<String> = env::args().collect();

    let debug_enabled = args.iter().any(|a| a == "--debug" || a == "-d");
    let default_filter = if debug_enabled { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.iter().any(|a| a == "--audio-info") {
        utils::log_audio_info();
        return;
    }

    nannou::app(model).update(update).run();
}

struct Model {
    session: RefCell<Session<CpalPlayer>>,
    /// Paths dropped (or passed on the command line) since the last update
    pending: Vec<PathBuf>,
    last_title: String,
}

fn model(app: &App) -> Model {
    let args: Vec<String> = env::args().collect();
    let windowed = args.iter().any(|a| a == "--windowed" || a == "-w");
    let resolution = Resolution::current(windowed);
    app.set_exit_on_escape(false);

    let mut win = app
        .new_window()
        .title(session::BASE_TITLE)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .dropped_file(dropped_file)
        .size(resolution.width, resolution.height)
        .min_size(400, 300);

    if resolution.fullscreen {
        win = win.fullscreen();
    }

    if let Err(e) = win.build() {
        error!("Failed to open window: {:?}", e);
        app.quit();
    }

    let config = Config::load();
    let transport = CpalPlayer::new(&config);
    let session = Session::new(transport, SessionSettings::from_config(&config));

    let pending: Vec<PathBuf> = args
        .iter()
        .skip(1)
        .filter(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .collect();
    if !pending.is_empty() {
        info!("{} file(s) from the command line", pending.len());
    }

    Model {
        session: RefCell::new(session),
        pending,
        last_title: session::BASE_TITLE.to_string(),
    }
}

fn window_canvas(app: &App) -> CanvasSize {
    let rect = app.window_rect();
    CanvasSize::new(rect.w(), rect.h())
}

/// The session's fixed canvas while playing, the live window otherwise
fn active_canvas(app: &App, session: &Session<CpalPlayer>) -> CanvasSize {
    if session.is_idle() {
        window_canvas(app)
    } else {
        session.canvas()
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    let session = model.session.get_mut();
    session.update(Instant::now());

    if !model.pending.is_empty() {
        let paths = std::mem::take(&mut model.pending);
        if !session.start(&paths, window_canvas(app)) {
            debug!("Ignoring {} dropped file(s)", paths.len());
        }
    }

    if session.title() != model.last_title {
        model.last_title = session.title().to_string();
        app.main_window().set_title(&model.last_title);
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window = app.window_rect();
    let mut session = model.session.borrow_mut();

    let canvas = active_canvas(app, &session);
    let surface = NannouSurface::new(&draw, window, canvas);

    draw.background().color(BLACK);
    if session.is_idle() || !session.render_frame(&surface) {
        ui::drop_zone::draw(canvas, &surface);
    }
    if let Some(button) = StyleButton::shown(session.is_idle(), canvas) {
        button.draw(session.style(), &surface);
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        error!("Failed to render frame: {:?}", e);
    }
}

fn apply(app: &App, model: &mut Model, action: Action) {
    let session = model.session.get_mut();
    match action {
        Action::Quit => app.quit(),
        Action::CycleStyle => session.advance_style(),
        Action::TogglePlayback => session.toggle_playback(),
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    if let Some(action) = parse_key(key) {
        apply(app, model, action);
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    let (x, y) = window_to_canvas(app.window_rect(), app.mouse.position());
    let session = model.session.get_mut();
    let canvas = active_canvas(app, session);
    let on_button = StyleButton::shown(session.is_idle(), canvas).is_some_and(|b| b.hit(x, y));

    if let Some(action) = parse_click(button, on_button) {
        apply(app, model, action);
    }
}

fn dropped_file(_app: &App, model: &mut Model, path: PathBuf) {
    debug!("Dropped {}", path.display());
    model.pending.push(path);
}
