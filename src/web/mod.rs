//! Browser shell: mounts the overlay, wires input, and drives the machine from
//! `requestAnimationFrame`.
//!
//! Everything lives in a thread-local so the `'static` event closures can reach
//! it. Each frame turns the rAF timestamp delta into one [`Event::Tick`]; UI
//! events go through the same [`GameState::apply`] path, so phase side effects
//! (canvas visibility, music level) are handled in exactly one place.

mod canvas;
mod hud;
mod music;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent, window};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::input::key_event;
use crate::round::{Event, Phase, RoundMachine};

use canvas::BirdCanvas;
use hud::Hud;
use music::AmbientMusic;

struct GameState {
    machine: RoundMachine,
    canvas: BirdCanvas,
    hud: Hud,
    music: AmbientMusic,
    last_frame_ms: Option<f64>,
}

impl GameState {
    fn apply(&mut self, event: Event) {
        let changed = self.machine.apply(event);
        if let Some(phase) = changed {
            self.on_phase_change(phase);
        }
        if self.machine.phase() == Phase::Presenting {
            if let Err(e) = self.canvas.draw(&self.machine.poses()) {
                log::warn!("bird draw failed: {e:?}");
            }
        }
        self.hud.sync(&self.machine, self.music.is_enabled());
    }

    fn on_phase_change(&mut self, phase: Phase) {
        if phase == Phase::Presenting {
            self.canvas.fit_to_container();
            self.canvas.set_active(true);
        } else {
            self.canvas.clear();
            self.canvas.set_active(false);
        }
        self.music.set_phase(phase);
    }

    fn frame(&mut self, ts: f64) {
        let dt = self.last_frame_ms.map_or(0.0, |prev| (ts - prev).max(0.0));
        self.last_frame_ms = Some(ts);
        self.apply(Event::Tick(dt));
        self.music.pump();
    }
}

// --- Frame loop ---

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn start() -> Self {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let next = callback.clone();
        let next_handle = handle.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            with_game(|state| state.frame(ts));
            next_handle.set(request_frame(&next));
        }) as Box<dyn FnMut(f64)>));
        handle.set(request_frame(&callback));
        Self { callback, handle }
    }

    /// Cancel the pending frame and drop the closure, breaking its Rc cycle.
    fn cancel(self) {
        if let (Some(id), Some(win)) = (self.handle.take(), window()) {
            let _ = win.cancel_animation_frame(id);
        }
        self.callback.borrow_mut().take();
    }
}

fn request_frame(callback: &FrameCallback) -> Option<i32> {
    let win = window()?;
    let slot = callback.borrow();
    let f = slot.as_ref()?;
    win.request_animation_frame(f.as_ref().unchecked_ref()).ok()
}

thread_local! {
    static GAME: RefCell<Option<GameState>> = const { RefCell::new(None) };
    static FRAME_LOOP: RefCell<Option<FrameLoop>> = const { RefCell::new(None) };
    static LISTENERS_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

fn with_game(f: impl FnOnce(&mut GameState)) {
    GAME.with(|cell| {
        if let Some(state) = cell.borrow_mut().as_mut() {
            f(state);
        }
    });
}

// --- Lifecycle ---

/// Mount the game into the page and start the frame loop. Replaces a running session.
pub fn start_game_with(config: GameConfig) -> GameResult<()> {
    config.validate()?;
    stop_game();

    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;
    let body = doc.body().ok_or(GameError::NoBody)?;

    let music = AmbientMusic::new(&config);
    let mut machine = RoundMachine::new(config);
    let mut hud = Hud::mount(&doc, &body, machine.config().input_secs)?;
    let canvas = match attach_session(&doc, &hud) {
        Ok(canvas) => canvas,
        Err(e) => {
            hud.unmount();
            return Err(e.into());
        }
    };
    machine.apply(Event::Resize(canvas.fit_to_container()));
    hud.sync(&machine, music.is_enabled());
    let viewport = machine.viewport();

    GAME.with(|cell| {
        cell.replace(Some(GameState {
            machine,
            canvas,
            hud,
            music,
            last_frame_ms: None,
        }))
    });
    FRAME_LOOP.with(|cell| cell.replace(Some(FrameLoop::start())));
    log::info!("flock count mounted ({}x{})", viewport.width, viewport.height);
    Ok(())
}

/// Everything after the overlay exists that can still fail.
fn attach_session(doc: &Document, hud: &Hud) -> Result<BirdCanvas, JsValue> {
    let canvas = BirdCanvas::attach(doc, hud.stage())?;
    wire_buttons(hud)?;
    install_page_listeners()?;
    Ok(canvas)
}

/// Stop the loop, silence the music, and remove the overlay. Safe to call when idle.
pub fn stop_game() {
    if let Some(frames) = FRAME_LOOP.with(|cell| cell.borrow_mut().take()) {
        frames.cancel();
    }
    if let Some(mut state) = GAME.with(|cell| cell.borrow_mut().take()) {
        state.music.shutdown();
        state.hud.unmount();
        log::info!("flock count stopped");
    }
}

// --- Input wiring ---

fn on_click(target: &HtmlElement, mut handler: impl FnMut(&mut GameState) + 'static) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |_evt: MouseEvent| {
        with_game(|state| handler(state));
    }) as Box<dyn FnMut(_)>);
    target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Buttons are rebuilt with each session, so they are wired per session.
fn wire_buttons(hud: &Hud) -> Result<(), JsValue> {
    let buttons = hud.buttons();
    for start in [&buttons.start, &buttons.restart] {
        // Starting is a user gesture, which browsers require before audio may play.
        on_click(start, |state| {
            state.music.enable();
            state.apply(Event::StartGame);
        })?;
    }
    on_click(&buttons.music, |state| {
        state.music.toggle();
        let phase = state.machine.phase();
        state.music.set_phase(phase);
        state.hud.sync(&state.machine, state.music.is_enabled());
    })?;
    for (digit, button) in &buttons.pad {
        let digit = *digit;
        on_click(button, move |state| state.apply(Event::Digit(digit)))?;
    }
    on_click(&buttons.clear, |state| state.apply(Event::Clear))?;
    on_click(&buttons.confirm, |state| state.apply(Event::Confirm))?;
    Ok(())
}

/// Keyboard and resize listeners live on the page and outlast sessions; add them once.
fn install_page_listeners() -> Result<(), JsValue> {
    if LISTENERS_INSTALLED.with(Cell::get) {
        return Ok(());
    }
    let win = window().ok_or(GameError::NoWindow)?;
    let doc = win.document().ok_or(GameError::NoDocument)?;

    {
        let closure = Closure::wrap(Box::new(move |evt: KeyboardEvent| {
            let Some(event) = key_event(&evt.key()) else {
                return;
            };
            with_game(|state| {
                if state.machine.phase() == Phase::Input {
                    evt.prevent_default();
                }
                state.apply(event);
            });
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            with_game(|state| {
                let viewport = state.canvas.fit_to_container();
                state.apply(Event::Resize(viewport));
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    LISTENERS_INSTALLED.with(|flag| flag.set(true));
    Ok(())
}
