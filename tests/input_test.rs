//! Input system tests
//!
//! Tests the handler stack, key bindings and the form they drive

mod common;

use common::FakeEngine;
use pdf2audio::conversion::{Controller, Phase};
use pdf2audio::input::{
    create_default_keymap, dispatch, BufferHandler, FormKeyHandler, HandlerAction, HandlerStack,
    KeyAction, KeyHandler,
};
use pdf2audio::state::config::Config;
use pdf2audio::state::{Field, State};
use pdf2audio::terminal::render_form;
use pdf2audio::Result;
use std::time::{Duration, Instant};

struct TestHandler {
    handled: bool,
}

impl KeyHandler for TestHandler {
    fn process(&mut self, key: &[u8], _state: &mut State) -> Result<HandlerAction> {
        if key == b"x" {
            self.handled = true;
            Ok(HandlerAction::Remove)
        } else {
            Ok(HandlerAction::Handled)
        }
    }
}

fn test_state() -> State {
    let (engine, _calls) = FakeEngine::new();
    state_with(engine)
}

fn state_with(engine: FakeEngine) -> State {
    State::new(Config::defaults(), Controller::new(engine.shared()), None)
}

fn press(state: &mut State, form: &mut FormKeyHandler, keys: &[&str]) {
    for key in keys {
        dispatch(key.as_bytes(), state, form).unwrap();
    }
}

#[test]
fn test_handler_stack() {
    let mut stack = HandlerStack::new();
    assert_eq!(stack.len(), 0);
    assert!(stack.prompt().is_none());

    stack.push(Box::new(TestHandler { handled: false }));
    assert_eq!(stack.len(), 1);
    // Plain handlers draw no prompt
    assert!(stack.prompt().is_none());

    stack.push(Box::new(BufferHandler::new(
        "Name",
        "abc",
        Box::new(|_, _| Ok(())),
    )));
    let prompt = stack.prompt().unwrap();
    assert_eq!(prompt.label, "Name");
    assert_eq!(prompt.text, "abc");

    assert!(stack.pop().is_some());
    assert!(stack.pop().is_some());
    assert!(stack.is_empty());
}

#[test]
fn test_default_keymap() {
    let keymap = create_default_keymap();

    assert_eq!(keymap.get(&b"\t"[..]), Some(&KeyAction::FocusNext));
    assert_eq!(keymap.get(&b"\x1b[Z"[..]), Some(&KeyAction::FocusPrev));
    assert_eq!(keymap.get(&b"\x1b[C"[..]), Some(&KeyAction::Increase));
    assert_eq!(keymap.get(&b"\x1bOD"[..]), Some(&KeyAction::Decrease));
    assert_eq!(keymap.get(&b"\r"[..]), Some(&KeyAction::Activate));
    assert_eq!(keymap.get(&b"\x1bs"[..]), Some(&KeyAction::Start));
    assert_eq!(keymap.get(&b"\x1bx"[..]), Some(&KeyAction::Stop));
    assert_eq!(keymap.get(&b"\x1bw"[..]), Some(&KeyAction::Save));
    assert_eq!(keymap.get(&b"\x03"[..]), Some(&KeyAction::Quit));
    assert_eq!(keymap.get(&b"z"[..]), None);
}

#[test]
fn test_modal_handler_takes_keys_first() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());
    state.handlers.push(Box::new(TestHandler { handled: false }));

    // Tab goes to the modal handler, not the form
    assert_eq!(
        dispatch(b"\t", &mut state, &mut form).unwrap(),
        HandlerAction::Handled
    );
    assert_eq!(state.focus, Field::Path);
    assert_eq!(state.handlers.len(), 1);

    assert_eq!(
        dispatch(b"x", &mut state, &mut form).unwrap(),
        HandlerAction::Remove
    );
    assert!(state.handlers.is_empty());

    dispatch(b"\t", &mut state, &mut form).unwrap();
    assert_eq!(state.focus, Field::Rate);
}

#[test]
fn test_focus_wraps() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());

    press(&mut state, &mut form, &["\x1b[Z"]);
    assert_eq!(state.focus, Field::Save);
    press(&mut state, &mut form, &["\t"]);
    assert_eq!(state.focus, Field::Path);
    press(&mut state, &mut form, &["\x1b[B", "\x1b[B"]);
    assert_eq!(state.focus, Field::Volume);
}

#[test]
fn test_sliders_adjust_and_clamp() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());

    // Nothing to adjust on the path row
    press(&mut state, &mut form, &["+"]);
    assert_eq!(state.settings.rate, 150);

    press(&mut state, &mut form, &["\t", "\x1b[C", "\x1b[C"]);
    assert_eq!(state.settings.rate, 170);
    for _ in 0..50 {
        press(&mut state, &mut form, &["\x1b[C"]);
    }
    assert_eq!(state.settings.rate, 300);

    press(&mut state, &mut form, &["\t", "-"]);
    assert!((state.settings.volume - 0.85).abs() < 1e-6);
    for _ in 0..50 {
        press(&mut state, &mut form, &["-"]);
    }
    assert_eq!(state.settings.volume, 0.0);
}

#[test]
fn test_path_entry() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());

    press(&mut state, &mut form, &["\r", "/tmp/boo", "x", "\x7f", "k.pdf"]);
    assert_eq!(state.handlers.prompt().unwrap().text, "/tmp/book.pdf");
    // Arrows do nothing while typing
    press(&mut state, &mut form, &["\x1b[A"]);
    assert_eq!(state.focus, Field::Path);

    press(&mut state, &mut form, &["\r"]);
    assert!(state.handlers.is_empty());
    assert_eq!(state.pdf_path, "/tmp/book.pdf");

    // Escape leaves the path alone
    press(&mut state, &mut form, &["\x1bo", "\x15", "other.pdf", "\x1b"]);
    assert!(state.handlers.is_empty());
    assert_eq!(state.pdf_path, "/tmp/book.pdf");
}

#[test]
fn test_start_without_path_shows_message() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());

    press(&mut state, &mut form, &["\x1bs"]);
    assert_eq!(state.controller.phase(), Phase::Idle);
    assert_eq!(
        state.controller.status().status,
        "Please select a PDF file first"
    );
}

#[test]
fn test_save_prompt_needs_completed_conversion() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());

    press(&mut state, &mut form, &["\x1bw"]);
    assert!(state.handlers.is_empty());
}

#[test]
fn test_convert_and_save_from_the_keyboard() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::pdf_in(dir.path(), "story.pdf", &["Once upon a time"]);
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());
    state.set_pdf_path(pdf.display().to_string());

    press(&mut state, &mut form, &["\x1bs"]);
    assert_eq!(state.focus, Field::Stop);
    state.controller.wait();
    assert!(!state.tick());
    assert_eq!(state.controller.phase(), Phase::Completed);

    press(&mut state, &mut form, &["\x1bw"]);
    let suggested = state.handlers.prompt().unwrap().text.to_string();
    assert_eq!(suggested, dir.path().join("story.mp3").display().to_string());

    // A name without an extension gets the default one
    let target = dir.path().join("chapter1");
    press(&mut state, &mut form, &["\x15"]);
    let typed = target.display().to_string();
    press(&mut state, &mut form, &[typed.as_str(), "\r"]);
    state.controller.wait();

    assert!(dir.path().join("chapter1.mp3").exists());
    assert_eq!(
        state.controller.status().status,
        "Audio file saved successfully!"
    );
}

#[test]
fn test_quit() {
    let mut state = test_state();
    let mut form = FormKeyHandler::new(create_default_keymap());
    assert!(!state.should_quit);
    press(&mut state, &mut form, &["\x03"]);
    assert!(state.should_quit);
}

#[test]
fn test_form_rendering() {
    let mut state = test_state();
    let screen = render_form(&state, 80);
    assert!(screen.contains("PDF to AudioBook Converter"));
    assert!(screen.contains("speech: fake"));
    assert!(screen.contains("Ready"));
    assert!(screen.contains("150 wpm"));
    assert!(screen.contains(" 90%"));
    assert!(screen.contains("Start Conversion"));

    state.edit_path();
    let screen = render_form(&state, 80);
    assert!(screen.contains("PDF file:"));
    assert!(screen.contains("Esc cancel"));
}

#[test]
fn test_form_stays_responsive_while_a_page_plays() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::pdf_in(dir.path(), "slow.pdf", &["first", "second"]);
    let (mut engine, calls) = FakeEngine::new();
    engine.speak_delay = Duration::from_secs(3);
    let mut state = state_with(engine);
    let mut form = FormKeyHandler::new(create_default_keymap());
    state.set_pdf_path(pdf.display().to_string());

    state.start();
    let deadline = Instant::now() + Duration::from_secs(5);
    while calls.lock().unwrap().spoken.is_empty() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }

    // The worker now holds the engine for the length of the page
    let started = Instant::now();
    state.tick();
    let screen = render_form(&state, 80);
    press(&mut state, &mut form, &["\x1bx"]);
    assert!(started.elapsed() < Duration::from_millis(500));

    assert!(screen.contains("Converting to speech"));
    assert!(screen.contains("speech: fake"));
    assert_eq!(state.controller.phase(), Phase::Stopped);
    state.controller.wait();
    assert_eq!(calls.lock().unwrap().spoken.len(), 1);
}
