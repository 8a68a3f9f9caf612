//! DOM overlay: header, one screen per phase, numpad, footer.
//!
//! Elements are built once per session. `sync` reads the machine every frame
//! but only touches the DOM when a value actually changed.

use rand::Rng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement};

use crate::input::PAD_DIGITS;
use crate::labels;
use crate::levels::LEVELS;
use crate::round::{Phase, RoundMachine};

const ROOT_ID: &str = "fc-root";
const STAGE_ID: &str = "fc-stage";

const ROOT_STYLE: &str = "position:fixed; inset:0; display:flex; flex-direction:column; background:linear-gradient(180deg,#0f172a,#1e293b); color:#e2e8f0; font-family:'Noto Sans SC', system-ui, sans-serif; user-select:none;";
const HEADER_STYLE: &str = "display:flex; align-items:center; justify-content:space-between; padding:12px 20px; background:rgba(15,23,42,0.8); border-bottom:1px solid #334155; z-index:30;";
const STAGE_STYLE: &str = "position:relative; flex:1; overflow:hidden;";
const SCREEN_STYLE: &str = "position:absolute; inset:0; flex-direction:column; align-items:center; justify-content:center; gap:16px; z-index:20;";
const BUTTON_STYLE: &str = "padding:12px 28px; font-size:18px; border:none; border-radius:12px; background:#38bdf8; color:#0f172a; cursor:pointer; font-weight:600;";
const PAD_BUTTON_STYLE: &str = "width:64px; height:64px; font-size:24px; border:1px solid #475569; border-radius:12px; background:#1e293b; color:#e2e8f0; cursor:pointer;";
const FOOTER_STYLE: &str = "padding:8px; text-align:center; font-size:12px; color:#64748b; z-index:30;";

/// Handles the event wiring needs; everything else stays private.
pub struct HudButtons {
    pub start: HtmlElement,
    pub restart: HtmlElement,
    pub music: HtmlElement,
    pub clear: HtmlElement,
    pub confirm: HtmlElement,
    pub pad: Vec<(u8, HtmlElement)>,
}

pub struct Hud {
    root: HtmlElement,
    stage: HtmlElement,
    buttons: HudButtons,

    level_value: HtmlElement,
    level_desc: HtmlElement,
    score_value: HtmlElement,

    start_screen: HtmlElement,
    countdown_screen: HtmlElement,
    input_screen: HtmlElement,
    feedback_screen: HtmlElement,
    gameover_screen: HtmlElement,

    countdown_value: HtmlElement,
    input_timer: HtmlElement,
    answer: HtmlElement,
    feedback_glyph: HtmlElement,
    feedback_headline: HtmlElement,
    feedback_actual: HtmlElement,
    feedback_guessed: HtmlElement,
    feedback_gained: HtmlElement,
    feedback_streak: HtmlElement,
    final_score: HtmlElement,

    shown_phase: Option<Phase>,
    music_on: Option<bool>,
}

impl Hud {
    /// Build the overlay under `parent`, replacing one left by an earlier session.
    pub fn mount(doc: &Document, parent: &HtmlElement, input_secs: u32) -> Result<Self, JsValue> {
        if let Some(old) = doc.get_element_by_id(ROOT_ID) {
            old.remove();
        }
        let root = element(doc, "div", ROOT_STYLE, "")?;
        root.set_id(ROOT_ID);

        // --- Header ---
        let header = element(doc, "div", HEADER_STYLE, "")?;
        let title = element(doc, "div", "font-size:20px; font-weight:700; color:#38bdf8;", labels::TITLE)?;
        let level_box = element(doc, "div", "display:flex; flex-direction:column; align-items:center;", "")?;
        let level_caption = element(doc, "span", "font-size:12px; color:#94a3b8;", labels::LEVEL_CAPTION)?;
        let level_value = element(doc, "span", "font-size:18px; font-weight:700;", "")?;
        let level_desc = element(doc, "span", "font-size:12px; color:#cbd5e1;", "")?;
        append_all(&level_box, &[&level_caption, &level_value, &level_desc])?;
        let score_box = element(doc, "div", "display:flex; flex-direction:column; align-items:center;", "")?;
        let score_caption = element(doc, "span", "font-size:12px; color:#94a3b8;", labels::SCORE_CAPTION)?;
        let score_value = element(doc, "span", "font-size:22px; font-weight:700; color:#fbbf24;", "0")?;
        append_all(&score_box, &[&score_caption, &score_value])?;
        let music = element(
            doc,
            "button",
            "width:40px; height:40px; border-radius:50%; border:1px solid #475569; background:#1e293b; color:#e2e8f0; cursor:pointer;",
            "",
        )?;
        append_all(&header, &[&title, &level_box, &score_box, &music])?;

        // --- Stage ---
        let stage = element(doc, "div", STAGE_STYLE, "")?;
        stage.set_id(STAGE_ID);

        let start_screen = screen(doc)?;
        let headline = element(doc, "h2", "margin:0; font-size:28px;", labels::START_HEADLINE)?;
        let rules = element(
            doc,
            "div",
            "max-width:520px; padding:16px 20px; border-radius:12px; background:rgba(30,41,59,0.8); font-size:14px; line-height:1.7;",
            "",
        )?;
        let rules_heading = element(doc, "div", "font-weight:700; margin-bottom:4px;", labels::RULES_HEADING)?;
        rules.append_child(&rules_heading)?;
        for (name, text) in labels::rules(input_secs) {
            let row = element(doc, "div", "", "")?;
            let rule_name = element(doc, "b", "color:#38bdf8;", name)?;
            let rule_text = element(doc, "span", "", &text)?;
            append_all(&row, &[&rule_name, &rule_text])?;
            rules.append_child(&row)?;
        }
        let start = element(doc, "button", BUTTON_STYLE, labels::START_BUTTON)?;
        append_all(&start_screen, &[&headline, &rules, &start])?;

        let countdown_screen = screen(doc)?;
        let countdown_value = element(doc, "div", "font-size:120px; font-weight:800; color:#38bdf8;", "")?;
        let countdown_hint = element(doc, "div", "font-size:18px; color:#94a3b8;", labels::COUNTDOWN_HINT)?;
        append_all(&countdown_screen, &[&countdown_value, &countdown_hint])?;

        let input_screen = screen(doc)?;
        let input_timer = element(doc, "div", "font-size:16px; color:#f87171;", "")?;
        let prompt = element(doc, "div", "font-size:22px;", labels::INPUT_PROMPT)?;
        let answer = element(
            doc,
            "div",
            "min-width:160px; padding:8px 16px; text-align:center; font-size:48px; font-weight:700; border-bottom:2px solid #38bdf8;",
            "?",
        )?;
        let grid = element(doc, "div", "display:grid; grid-template-columns:repeat(3,64px); gap:10px;", "")?;
        let mut pad = Vec::with_capacity(PAD_DIGITS.len());
        for digit in PAD_DIGITS {
            let b = element(doc, "button", PAD_BUTTON_STYLE, &digit.to_string())?;
            grid.append_child(&b)?;
            pad.push((digit, b));
        }
        let clear = element(doc, "button", PAD_BUTTON_STYLE, labels::CLEAR_BUTTON)?;
        grid.append_child(&clear)?;
        let confirm = element(doc, "button", BUTTON_STYLE, labels::CONFIRM_BUTTON)?;
        append_all(&input_screen, &[&input_timer, &prompt, &answer, &grid, &confirm])?;

        let feedback_screen = screen(doc)?;
        let feedback_glyph = element(doc, "div", "font-size:72px; font-weight:800;", "")?;
        let feedback_headline = element(doc, "div", "font-size:28px; font-weight:700;", "")?;
        let feedback_actual = element(doc, "div", "font-size:18px;", "")?;
        let feedback_guessed = element(doc, "div", "font-size:18px; color:#94a3b8;", "")?;
        let feedback_gained = element(doc, "div", "font-size:24px; font-weight:700; color:#fbbf24;", "")?;
        let feedback_streak = element(
            doc,
            "div",
            "padding:4px 12px; border-radius:999px; background:#f97316; color:white; font-weight:700;",
            "",
        )?;
        append_all(
            &feedback_screen,
            &[
                &feedback_glyph,
                &feedback_headline,
                &feedback_actual,
                &feedback_guessed,
                &feedback_gained,
                &feedback_streak,
            ],
        )?;

        let gameover_screen = screen(doc)?;
        let over_headline = element(doc, "h2", "margin:0; font-size:32px;", labels::GAMEOVER_HEADLINE)?;
        let over_caption = element(doc, "div", "font-size:14px; color:#94a3b8;", labels::GAMEOVER_CAPTION)?;
        let final_score = element(doc, "div", "font-size:64px; font-weight:800; color:#fbbf24;", "")?;
        let restart = element(doc, "button", BUTTON_STYLE, labels::RESTART_BUTTON)?;
        append_all(&gameover_screen, &[&over_headline, &over_caption, &final_score, &restart])?;

        append_all(
            &stage,
            &[&start_screen, &countdown_screen, &input_screen, &feedback_screen, &gameover_screen],
        )?;

        let footer = element(doc, "div", FOOTER_STYLE, labels::FOOTER)?;
        append_all(&root, &[&header, &stage, &footer])?;
        parent.append_child(&root)?;

        Ok(Self {
            root,
            stage,
            buttons: HudButtons {
                start,
                restart,
                music,
                clear,
                confirm,
                pad,
            },
            level_value,
            level_desc,
            score_value,
            start_screen,
            countdown_screen,
            input_screen,
            feedback_screen,
            gameover_screen,
            countdown_value,
            input_timer,
            answer,
            feedback_glyph,
            feedback_headline,
            feedback_actual,
            feedback_guessed,
            feedback_gained,
            feedback_streak,
            final_score,
            shown_phase: None,
            music_on: None,
        })
    }

    /// Container the bird canvas lives in.
    pub fn stage(&self) -> &HtmlElement {
        &self.stage
    }

    pub fn buttons(&self) -> &HudButtons {
        &self.buttons
    }

    pub fn unmount(&self) {
        self.root.remove();
    }

    pub fn sync<R: Rng>(&mut self, machine: &RoundMachine<R>, music_on: bool) {
        let phase = machine.phase();
        if self.shown_phase != Some(phase) {
            self.show_screen(phase);
            self.shown_phase = Some(phase);
        }
        if self.music_on != Some(music_on) {
            set_text(&self.buttons.music, if music_on { "🔊" } else { "🔇" });
            let title = if music_on { labels::MUSIC_ON_TITLE } else { labels::MUSIC_OFF_TITLE };
            self.buttons.music.set_title(title);
            self.music_on = Some(music_on);
        }

        let level = machine.level();
        set_text(&self.level_value, &labels::level_progress(level.id, LEVELS.len()));
        set_text(&self.level_desc, level.description);
        set_text(&self.score_value, &labels::format_score(machine.score()));

        match phase {
            Phase::Countdown => set_text(&self.countdown_value, &machine.countdown().to_string()),
            Phase::Input => {
                set_text(&self.input_timer, &labels::input_timer(machine.input_timer()));
                set_text(&self.answer, labels::answer_display(machine.user_input()));
            }
            Phase::Feedback => {
                if let Some(result) = machine.last_result() {
                    let color = labels::verdict_color(result.verdict);
                    set_style_once(&self.feedback_glyph, &format!("font-size:72px; font-weight:800; color:{color};"));
                    set_style_once(&self.feedback_headline, &format!("font-size:28px; font-weight:700; color:{color};"));
                    set_text(&self.feedback_glyph, labels::verdict_glyph(result.verdict));
                    set_text(&self.feedback_headline, labels::verdict_headline(result.verdict));
                    set_text(&self.feedback_actual, &labels::actual_line(result));
                    set_text(&self.feedback_guessed, &labels::guessed_line(result));
                    set_text(&self.feedback_gained, &labels::gained_line(result));
                    match labels::streak_badge(result) {
                        Some(badge) => {
                            set_text(&self.feedback_streak, &badge);
                            set_hidden(&self.feedback_streak, false);
                        }
                        None => set_hidden(&self.feedback_streak, true),
                    }
                }
            }
            Phase::Gameover => set_text(&self.final_score, &labels::format_score(machine.score())),
            Phase::Start | Phase::Presenting => {}
        }
    }

    fn show_screen(&self, phase: Phase) {
        let screens = [
            (Phase::Start, &self.start_screen),
            (Phase::Countdown, &self.countdown_screen),
            (Phase::Input, &self.input_screen),
            (Phase::Feedback, &self.feedback_screen),
            (Phase::Gameover, &self.gameover_screen),
        ];
        for (owner, el) in screens {
            let display = if owner == phase { "flex" } else { "none" };
            el.set_attribute("style", &format!("{SCREEN_STYLE} display:{display};")).ok();
        }
    }
}

fn element(doc: &Document, tag: &str, style: &str, text: &str) -> Result<HtmlElement, JsValue> {
    let el: HtmlElement = doc.create_element(tag)?.dyn_into()?;
    if !style.is_empty() {
        el.set_attribute("style", style)?;
    }
    if !text.is_empty() {
        el.set_text_content(Some(text));
    }
    Ok(el)
}

fn screen(doc: &Document) -> Result<HtmlElement, JsValue> {
    element(doc, "div", &format!("{SCREEN_STYLE} display:none;"), "")
}

fn append_all(parent: &HtmlElement, children: &[&HtmlElement]) -> Result<(), JsValue> {
    for child in children {
        parent.append_child(child)?;
    }
    Ok(())
}

fn set_text(el: &HtmlElement, text: &str) {
    if el.text_content().as_deref() != Some(text) {
        el.set_text_content(Some(text));
    }
}

fn set_style_once(el: &HtmlElement, style: &str) {
    if el.get_attribute("style").as_deref() != Some(style) {
        el.set_attribute("style", style).ok();
    }
}

fn set_hidden(el: &HtmlElement, hidden: bool) {
    if el.hidden() != hidden {
        el.set_hidden(hidden);
    }
}
