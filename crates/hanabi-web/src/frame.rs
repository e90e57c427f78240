use crate::audio::CueAudio;
use crate::dom;
use crate::WebShow;
use hanabi_core::{FrameClock, RenderItem, StageCue};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Floats per instance in the render block: a column-major placement
/// matrix followed by the parameter block.
pub const RENDER_STRIDE: usize = 16 + std::mem::size_of::<hanabi_core::RenderParams>() / 4;

pub struct FrameContext {
    pub show: Rc<RefCell<WebShow>>,
    pub clock: FrameClock,
    pub audio: Rc<RefCell<Option<CueAudio>>>,
    pub status: Option<web::Element>,
    pub render_buf: Rc<RefCell<Vec<f32>>>,
    cues: Vec<StageCue>,
}

impl FrameContext {
    pub fn new(
        show: Rc<RefCell<WebShow>>,
        clock: FrameClock,
        audio: Rc<RefCell<Option<CueAudio>>>,
        status: Option<web::Element>,
        render_buf: Rc<RefCell<Vec<f32>>>,
    ) -> Self {
        Self {
            show,
            clock,
            audio,
            status,
            render_buf,
            cues: Vec::new(),
        }
    }

    pub fn frame(&mut self) {
        let now_ms = self.clock.now_ms();
        let cues = &mut self.cues;
        cues.clear();
        let mut show = self.show.borrow_mut();
        let report = show.frame(now_ms, &mut |ev| {
            if let Some(cue) = ev.cue() {
                cues.push(cue);
            }
        });
        if report.timeline.finished {
            log::info!("[frame] timeline finished");
        }

        if let Some(audio) = self.audio.borrow().as_ref() {
            for cue in self.cues.iter().copied() {
                audio.play(cue);
            }
        }

        {
            let mut buf = self.render_buf.borrow_mut();
            buf.clear();
            for item in show.render_list() {
                write_item(&mut buf, &item);
            }
        }

        if let Some(el) = &self.status {
            let text = dom::status_text(
                show.playback_state(),
                show.timeline().is_looping(),
                show.is_frozen(),
                show.timeline().scheduler().len(),
                &report,
            );
            dom::set_status(el, &text);
        }
    }
}

fn write_item(buf: &mut Vec<f32>, item: &RenderItem) {
    buf.extend_from_slice(&item.placement.to_cols_array());
    buf.extend_from_slice(bytemuck::cast_slice(std::slice::from_ref(&item.params)));
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        if let Some(w) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }
    }) as Box<dyn FnMut()>));
    if let Some(w) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}
