use hanabi_core::{FrameReport, PlaybackState};
use web_sys as web;

pub const STATUS_ELEMENT_ID: &str = "show-status";

pub fn status_element(document: &web::Document) -> Option<web::Element> {
    document.get_element_by_id(STATUS_ELEMENT_ID)
}

pub fn status_text(
    state: PlaybackState,
    looping: bool,
    frozen: bool,
    count: usize,
    report: &FrameReport,
) -> String {
    let label = match state {
        PlaybackState::Stopped => "stopped",
        PlaybackState::Playing => "playing",
        PlaybackState::Paused { .. } => "paused",
    };
    let mut text = format!(
        "{label} {:>3.0}% | {count} selections",
        report.timeline.progress_ratio * 100.0
    );
    if let Some(card) = report.card {
        text.push_str(&format!(
            " | card {}/{count} {:.0}%",
            card.index + 1,
            card.slot_progress * 100.0
        ));
    }
    if looping {
        text.push_str(" | loop");
    }
    if frozen {
        text.push_str(" | frozen");
    }
    text
}

#[inline]
pub fn set_status(el: &web::Element, text: &str) {
    if el.text_content().as_deref() != Some(text) {
        el.set_text_content(Some(text));
    }
}
