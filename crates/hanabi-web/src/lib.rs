#![cfg(target_arch = "wasm32")]
mod audio;
mod dom;
mod events;
mod frame;
mod keys;

use hanabi_core::{FireworkShow, FrameClock, RandomPlacement, ShowConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

pub(crate) type WebShow = FireworkShow<RandomPlacement>;

thread_local! {
    static RENDER_BUF: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("hanabi-web starting");

    if let Err(e) = init() {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let clock = FrameClock::new();
    let mut show = FireworkShow::new(ShowConfig::default(), RandomPlacement::from_entropy());
    show.start_ambient(clock.now_ms());
    let show = Rc::new(RefCell::new(show));
    let audio = Rc::new(RefCell::new(None));

    events::wire_keydown(show.clone(), audio.clone(), clock);

    let status = dom::status_element(&document);
    if status.is_none() {
        log::warn!("[dom] missing #{}; status line disabled", dom::STATUS_ELEMENT_ID);
    }
    let render_buf = RENDER_BUF.with(Rc::clone);
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        show, clock, audio, status, render_buf,
    )));
    frame::start_loop(frame_ctx);
    log::info!("[init] show running; keys: space a b backspace c l f");
    Ok(())
}

/// Latest frame's instances for the renderer, `render_stride()` floats each.
#[wasm_bindgen]
pub fn render_block() -> Vec<f32> {
    RENDER_BUF.with(|buf| buf.borrow().clone())
}

#[wasm_bindgen]
pub fn render_stride() -> usize {
    frame::RENDER_STRIDE
}
