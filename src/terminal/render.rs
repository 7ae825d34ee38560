//! Drawing the form
//!
//! The whole form is redrawn as one string of ANSI sequences; lines end in
//! CRLF because the terminal is in raw mode.

use crate::speech::settings::{MAX_RATE, MIN_RATE};
use crate::state::{Field, State};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CLEAR: &str = "\x1b[H\x1b[2J";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const REVERSE: &str = "\x1b[7m";
const RESET: &str = "\x1b[0m";
const NEWLINE: &str = "\r\n";

/// Width of the slider and progress bars, in cells
const BAR_WIDTH: usize = 30;

/// Render the form and conversion status for a terminal `cols` wide
pub fn render_form(state: &State, cols: u16) -> String {
    let width = (cols as usize).max(40);
    let status = state.controller.status();
    let buttons = state.buttons();
    let mut out = String::from(CLEAR);

    line(
        &mut out,
        &format!(
            "{}PDF to AudioBook Converter{}  {}(speech: {}){}",
            BOLD,
            RESET,
            DIM,
            state.controller.engine_name(),
            RESET
        ),
    );
    line(&mut out, "");

    line(&mut out, "Select PDF File:");
    let path = if state.pdf_path.is_empty() {
        format!("{}(press Enter to type a path){}", DIM, RESET)
    } else {
        fit_to_width(&state.pdf_path, width.saturating_sub(6))
    };
    line(&mut out, &row(state, Field::Path, &format!("[ {} ]", path)));
    line(&mut out, "");

    line(&mut out, "Voice Settings:");
    let rate_fraction = (state.settings.rate - MIN_RATE) as f64 / (MAX_RATE - MIN_RATE) as f64;
    line(
        &mut out,
        &row(
            state,
            Field::Rate,
            &format!(
                "Speed:  [{}] {:>3} wpm",
                bar(rate_fraction, BAR_WIDTH, '=', '-'),
                state.settings.rate
            ),
        ),
    );
    line(
        &mut out,
        &row(
            state,
            Field::Volume,
            &format!(
                "Volume: [{}] {:>3}%",
                bar(state.settings.volume as f64, BAR_WIDTH, '=', '-'),
                state.settings.volume_percent()
            ),
        ),
    );
    line(&mut out, "");

    line(
        &mut out,
        &format!(
            "  [{}] {:>3}%",
            bar(status.progress as f64 / 100.0, BAR_WIDTH, '#', ' '),
            status.progress
        ),
    );
    line(&mut out, &format!("  {}", fit_to_width(&status.status, width - 2)));
    line(&mut out, &format!("  {}", fit_to_width(&status.detail, width - 2)));
    line(&mut out, "");

    let button_row = [
        button(state, Field::Start, "Start Conversion", buttons.start),
        button(state, Field::Stop, "Stop", buttons.stop),
        button(state, Field::Save, "Save Audio", buttons.save),
    ]
    .join("  ");
    line(&mut out, &format!("  {}", button_row));
    line(&mut out, "");

    match state.handlers.prompt() {
        Some(prompt) => {
            let text = fit_to_width(prompt.text, width.saturating_sub(prompt.label.width() + 4));
            line(&mut out, &format!("{}{}:{} {}_", BOLD, prompt.label, RESET, text));
            line(
                &mut out,
                &format!("{}Enter accept  Esc cancel  Ctrl-U clear{}", DIM, RESET),
            );
        }
        None => {
            line(
                &mut out,
                &format!(
                    "{}Tab/Up/Down move  Left/Right adjust  Enter select  \
                     Alt-s start  Alt-x stop  Alt-w save  Alt-q quit{}",
                    DIM, RESET
                ),
            );
        }
    }

    out
}

fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push_str(NEWLINE);
}

/// A form row with a focus marker
fn row(state: &State, field: Field, body: &str) -> String {
    let marker = if state.focus == field { "> " } else { "  " };
    format!("{}{}", marker, body)
}

/// A button, reversed when focused and dimmed when disabled
fn button(state: &State, field: Field, label: &str, enabled: bool) -> String {
    let text = format!("[ {} ]", label);
    match (state.focus == field, enabled) {
        (true, true) => format!("{}{}{}", REVERSE, text, RESET),
        (true, false) => format!("{}{}{}{}", REVERSE, DIM, text, RESET),
        (false, true) => text,
        (false, false) => format!("{}{}{}", DIM, text, RESET),
    }
}

/// A bar `width` cells wide, filled to `fraction`
pub fn bar(fraction: f64, width: usize, fill: char, empty: char) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let filled = (fraction * width as f64).round() as usize;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat(fill).take(filled));
    out.extend(std::iter::repeat(empty).take(width - filled));
    out
}

/// Fit `text` into `width` terminal cells, keeping the end
///
/// Paths are more recognisable by their file name, so the start is dropped
/// and replaced by an ellipsis.
pub fn fit_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut kept = Vec::new();
    let mut used = 1; // the ellipsis
    for ch in text.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        kept.push(ch);
    }
    kept.push('…');
    kept.into_iter().rev().collect()
}
