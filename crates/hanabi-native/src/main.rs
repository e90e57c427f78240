use std::thread;
use std::time::Duration;

use anyhow::Context;
use hanabi_core::{
    BurstType, ColorPreset, FireworkColor, FireworkShow, FrameClock, LaunchMode, RandomPlacement,
    Selection, ShowConfig, StageCue,
};

const FRAME_MS: f64 = 1_000.0 / 60.0;
const DEFAULT_RUN_SECONDS: f64 = 40.0;

/// Scripted user actions, keyed by show time in milliseconds.
#[derive(Clone, Copy, Debug)]
enum Action {
    Play,
    Pause,
    DeleteSecond,
    Resume,
    Freeze,
    Thaw,
}

const SCRIPT: &[(f64, Action)] = &[
    (1_000.0, Action::Play),
    (6_000.0, Action::Pause),
    (7_000.0, Action::DeleteSecond),
    (9_000.0, Action::Resume),
    (14_000.0, Action::Freeze),
    (15_500.0, Action::Thaw),
];

#[derive(Default)]
struct CueCounts {
    whizz: usize,
    bloom: usize,
}

fn playlist() -> anyhow::Result<Vec<Selection>> {
    let color: ColorPreset = "purple".parse()?;
    Ok(vec![
        Selection::new("kiku".parse()?).with_color(FireworkColor::Preset(color)),
        Selection::new("botan".parse()?).with_mode(LaunchMode::Burst(BurstType::Staggered)),
        Selection::new("poka".parse()?)
            .with_mode(LaunchMode::Burst(BurstType::Simultaneous))
            .with_color(FireworkColor::Random(
                [ColorPreset::Red, ColorPreset::Cream, ColorPreset::Green]
                    .into_iter()
                    .collect(),
            )),
        Selection::new("meshibe".parse()?).with_launch_height(260.0),
    ])
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let run_seconds = match args.next() {
        Some(s) => s
            .parse::<f64>()
            .with_context(|| format!("invalid run length {s:?}"))?,
        None => DEFAULT_RUN_SECONDS,
    };
    let realtime = args.any(|a| a == "--realtime");

    let mut show = FireworkShow::new(ShowConfig::default(), RandomPlacement::from_entropy());
    show.start_ambient(0.0);
    for selection in playlist()? {
        let index = show.add_selection(selection, 0.0)?;
        log::info!("[native] queued selection {index}");
    }

    let clock = FrameClock::new();
    let end_ms = run_seconds * 1_000.0;
    let mut script = SCRIPT.iter().peekable();
    let mut cues = CueCounts::default();
    let mut frames: u64 = 0;
    let mut now_ms = 0.0;

    while now_ms <= end_ms {
        while let Some(&&(at_ms, action)) = script.peek() {
            if at_ms > now_ms {
                break;
            }
            apply(&mut show, action, now_ms)?;
            script.next();
        }

        let report = show.frame(now_ms, &mut |ev| match ev.cue() {
            Some(StageCue::Whizz) => cues.whizz += 1,
            Some(StageCue::Bloom) => cues.bloom += 1,
            None => {}
        });
        if report.timeline.launched > 0 {
            log::info!(
                "[native] t={:.2}s launched {} ({:.0}% through the timeline)",
                now_ms / 1_000.0,
                report.timeline.launched,
                report.timeline.progress_ratio * 100.0
            );
        }
        if report.timeline.looped {
            log::info!("[native] timeline looped at t={:.2}s", now_ms / 1_000.0);
        }
        if report.ambient_cycled {
            log::debug!("[native] ambient cycle at t={:.2}s", now_ms / 1_000.0);
        }

        frames += 1;
        if realtime {
            thread::sleep(Duration::from_secs_f64(FRAME_MS / 1_000.0));
            now_ms = clock.now_ms();
        } else {
            now_ms += FRAME_MS;
        }
    }

    log::info!(
        "[native] {frames} frames, {} whizz cues, {} bloom cues, {} entities on screen",
        cues.whizz,
        cues.bloom,
        show.render_list().len()
    );
    Ok(())
}

fn apply(
    show: &mut FireworkShow<RandomPlacement>,
    action: Action,
    now_ms: f64,
) -> anyhow::Result<()> {
    log::info!("[native] t={:.2}s {action:?}", now_ms / 1_000.0);
    match action {
        Action::Play => {
            show.play(now_ms);
        }
        Action::Pause => {
            show.pause(now_ms);
        }
        Action::DeleteSecond => {
            let removed = show.delete_selection(1, now_ms)?;
            log::info!("[native] removed {}", removed.category.key());
        }
        Action::Resume => {
            show.resume(now_ms);
        }
        Action::Freeze => show.freeze_all(now_ms),
        Action::Thaw => show.thaw_all(now_ms),
    }
    Ok(())
}
