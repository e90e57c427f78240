use crate::audio::CueAudio;
use crate::keys::{action_for_key, suppresses_default, KeyAction};
use crate::WebShow;
use hanabi_core::constants::RANDOM_PALETTE_SIZE;
use hanabi_core::{
    BurstType, ColorPreset, FireworkCategory, FireworkColor, FrameClock, LaunchMode, Selection,
};
use rand::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// A catalogue shape with a random look. Bursts get a random palette.
pub fn random_selection(rng: &mut impl Rng, mode: LaunchMode) -> Selection {
    let category = FireworkCategory::ALL
        .into_iter()
        .filter(|c| !c.uses_model_positions())
        .choose(rng)
        .unwrap_or(FireworkCategory::Kiku);
    let color = match mode {
        LaunchMode::Solo => FireworkColor::Preset(ColorPreset::random(rng)),
        LaunchMode::Burst(_) => {
            FireworkColor::Random(ColorPreset::random_palette(rng, RANDOM_PALETTE_SIZE))
        }
    };
    Selection::new(category)
        .with_mode(mode)
        .with_color(color)
        .with_launch_height(rng.gen_range(160.0..260.0))
}

// Browsers only allow audio to start from a user gesture, so the first key
// press creates the context.
fn ensure_audio(audio: &Rc<RefCell<Option<CueAudio>>>) {
    if audio.borrow().is_some() {
        return;
    }
    match CueAudio::new() {
        Ok(a) => *audio.borrow_mut() = Some(a),
        Err(e) => log::warn!("[audio] {e:#}"),
    }
}

pub fn handle_keydown(
    ev: &web::KeyboardEvent,
    show: &Rc<RefCell<WebShow>>,
    audio: &Rc<RefCell<Option<CueAudio>>>,
    clock: &FrameClock,
) {
    ensure_audio(audio);
    let Some(action) = action_for_key(&ev.key()) else {
        return;
    };
    if suppresses_default(action) {
        ev.prevent_default();
    }
    let now_ms = clock.now_ms();
    let mut show = show.borrow_mut();
    let mut rng = rand::thread_rng();
    let added = match action {
        KeyAction::TogglePlayback => {
            show.toggle_playback(now_ms);
            None
        }
        KeyAction::AddRandom => Some(
            show.add_selection(random_selection(&mut rng, LaunchMode::Solo), now_ms),
        ),
        KeyAction::AddStaggeredBurst => Some(show.add_selection(
            random_selection(&mut rng, LaunchMode::Burst(BurstType::Staggered)),
            now_ms,
        )),
        KeyAction::DeleteLast => {
            let len = show.timeline().scheduler().len();
            if let Some(last) = len.checked_sub(1) {
                if let Err(e) = show.delete_selection(last, now_ms) {
                    log::warn!("[keys] delete failed: {e}");
                }
            }
            None
        }
        KeyAction::Clear => {
            show.clear_timeline(now_ms);
            None
        }
        KeyAction::ToggleLooping => {
            let looping = !show.timeline().is_looping();
            show.set_looping(looping);
            None
        }
        KeyAction::ToggleFreeze => {
            show.toggle_freeze(now_ms);
            None
        }
    };
    if let Some(Err(e)) = added {
        log::warn!("[keys] {e}");
    }
}

pub fn wire_keydown(
    show: Rc<RefCell<WebShow>>,
    audio: Rc<RefCell<Option<CueAudio>>>,
    clock: FrameClock,
) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_keydown(&ev, &show, &audio, &clock);
            }) as Box<dyn FnMut(_)>);
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
