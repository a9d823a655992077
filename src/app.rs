use crate::animator::{AnimatorState, FieldAnimator};
use crate::config::{default_settings_path, load_settings, save_settings_atomic, Args, Settings};
use crate::input::{collect_actions, Action};
use crate::render::{RenderTarget, TerminalTarget, WriterTarget};
use crate::scheduler::{FramePacer, ImmediateHost};
use crate::title::TitleRotator;
use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let settings_path = match &args.settings {
        Some(p) => p.clone(),
        None => default_settings_path()?,
    };
    let mut settings = load_settings(&settings_path);
    args.apply(&mut settings);
    if args.save_settings {
        save_settings_atomic(&settings_path, &settings)?;
    }

    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::debug!("seed {seed}");
    let animator = FieldAnimator::seeded(settings.field.clone(), seed)
        .context("invalid field configuration")?;

    if args.headless {
        let stdout = io::stdout();
        let mut target = WriterTarget::new(stdout.lock());
        run_headless(animator, &mut target, args.frames.unwrap_or(1))
    } else {
        run_terminal(animator, &settings, args.frames)
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos() as u64
}

/// Runs `frames` ticks as fast as possible through `target`.
pub fn run_headless<T: RenderTarget>(
    mut animator: FieldAnimator,
    target: &mut T,
    frames: u64,
) -> Result<()> {
    let mut host = ImmediateHost::new();
    animator.start(&mut host);
    let mut shown = 0u64;
    while shown < frames {
        let Some(token) = host.take_due() else {
            break;
        };
        if animator.on_frame(token, &mut host, target)? {
            shown += 1;
        }
    }
    animator.stop(&mut host);
    Ok(())
}

fn run_terminal(
    mut animator: FieldAnimator,
    settings: &Settings,
    frames: Option<u64>,
) -> Result<()> {
    let mut term = TerminalTarget::begin()?;
    let cfg = animator.config();
    log::debug!(
        "field {}x{} at {} fps, dt {}",
        cfg.width,
        cfg.height,
        settings.fps_cap,
        cfg.dt
    );
    let mut host = FramePacer::new(settings.fps_cap);
    let mut titles = TitleRotator::new(
        settings.titles.clone(),
        Duration::from_millis(settings.title_interval_ms),
    );
    if settings.show_title {
        titles.start(Instant::now());
    }
    term.set_caption(caption(&titles));

    animator.start(&mut host);
    let result = drive(&mut animator, &mut host, &mut term, &mut titles, frames);
    animator.stop(&mut host);
    term.end()?;
    result
}

fn drive(
    animator: &mut FieldAnimator,
    host: &mut FramePacer,
    term: &mut TerminalTarget,
    titles: &mut TitleRotator,
    frames: Option<u64>,
) -> Result<()> {
    let mut shown = 0u64;
    loop {
        let idle = animator.pending().is_none();
        let timeout = if idle {
            Duration::from_millis(50)
        } else {
            Duration::ZERO
        };
        for action in collect_actions(timeout)? {
            match action {
                Action::Quit => return Ok(()),
                Action::TogglePause => match animator.state() {
                    AnimatorState::Running => animator.stop(host),
                    AnimatorState::Stopped => animator.start(host),
                },
                Action::ToggleTitle => {
                    if titles.is_running() {
                        titles.stop();
                        term.set_caption(None);
                    } else {
                        titles.start(Instant::now());
                        term.set_caption(caption(titles));
                    }
                }
                Action::Resize(w, h) => term.resize(w, h),
            }
        }

        if titles.poll(Instant::now()) {
            term.set_caption(caption(titles));
        }

        if let Some(token) = host.wait(Duration::from_millis(4)) {
            if animator.on_frame(token, host, term)? {
                shown += 1;
                if frames.is_some_and(|n| shown >= n) {
                    return Ok(());
                }
            }
        }
    }
}

fn caption(titles: &TitleRotator) -> Option<String> {
    if !titles.is_running() {
        return None;
    }
    titles.current().map(str::to_owned)
}
