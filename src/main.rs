use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use tally_client::animation::{ManualScheduler, TrickleAnimator};
use tally_client::display::{ScoreDisplay, ScoreLabels};
use tally_core::counter::Counter;
use tally_core::levels::LevelTracker;
use tally_core::sound::ClipBank;
use tally_utils::config::TallyConfig;
use tally_utils::format::group_thousands;
use tally_utils::notification::{CounterEvent, CounterKind, LevelEvent};

#[derive(Parser, Debug)]
#[clap(
    name = "tally",
    version,
    about = "Apply score adjustments and watch the display trickle toward them"
)]
#[clap(allow_negative_numbers = true)]
struct CliArgs {
    /// JSON configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Apply adjustments to the display immediately
    #[clap(long)]
    no_trickle: bool,

    /// Delay between trickle steps, e.g. "50ms"
    #[clap(long, value_parser = humantime::parse_duration)]
    step_delay: Option<Duration>,

    /// Counter to adjust: "score" or "experience" ("xp")
    #[clap(long, default_value = "score", value_parser = parse_counter_kind)]
    counter: CounterKind,

    /// Shorthand for `--counter experience`; takes precedence
    #[clap(long)]
    experience: bool,

    /// Display width in characters
    #[clap(long, default_value = "40", value_parser)]
    width: usize,

    /// Point adjustments, applied in order
    #[clap(required = true, value_parser)]
    adjustments: Vec<i64>,
}

fn parse_counter_kind(arg: &str) -> Result<CounterKind, String> {
    CounterKind::from_str(arg)
        .ok_or_else(|| format!("unknown counter '{}', expected score or experience", arg))
}

impl CliArgs {
    fn counter_kind(&self) -> CounterKind {
        if self.experience {
            CounterKind::Experience
        } else {
            self.counter
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => TallyConfig::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => TallyConfig::default(),
    };
    if args.no_trickle {
        config.trickle.should_trickle = false;
    }
    if let Some(delay) = args.step_delay {
        config.trickle.step_delay_secs = delay.as_secs_f64();
    }
    config.validate()?;

    run(&config, &args)
}

fn run(config: &TallyConfig, args: &CliArgs) -> anyhow::Result<()> {
    let kind = args.counter_kind();
    let counter_config = match kind {
        CounterKind::Score => config.score.clone(),
        CounterKind::Experience => config.experience.clone(),
    };
    let mut counter = Counter::new(kind, counter_config);
    counter.subscribe(move |event: &CounterEvent| match event {
        CounterEvent::ReachedMinimum(_) | CounterEvent::ReachedMaximum(_) => {
            info!("{} {}", kind, event)
        },
        _ => debug!("{}: {}", event.message_names(kind).join("/"), event),
    });

    let scheduler = Rc::new(ManualScheduler::new());
    let animator = TrickleAnimator::new(&config.trickle, counter.value(), scheduler.clone())?;
    animator
        .borrow_mut()
        .set_cue_player(Box::new(ClipBank::new(&config.sounds)));
    TrickleAnimator::attach(&animator, &mut counter);

    let tracker = Rc::new(RefCell::new(LevelTracker::new(&config.levels)?));
    {
        let mut tracker = tracker.borrow_mut();
        tracker.set_cue_player(Box::new(ClipBank::new(&config.sounds)));
        tracker.subscribe(|event: &LevelEvent| info!("{}", event));
    }
    LevelTracker::attach(&tracker, &mut *animator.borrow_mut());

    let display = ScoreDisplay::new(args.width);
    let level_view = tracker.clone();
    animator
        .borrow_mut()
        .subscribe(move |event: &CounterEvent| {
            println!(
                "{}",
                display_line(&display, event.value(), level_view.borrow().level())
            );
        });

    println!(
        "{}",
        display_line(&display, counter.value(), tracker.borrow().level())
    );

    for delta in &args.adjustments {
        counter
            .adjust(*delta)
            .with_context(|| format!("adjusting {} by {}", kind, delta))?;
        drive(&scheduler);
    }

    info!(
        "Final {}: {} at level {}",
        kind,
        group_thousands(counter.value()),
        tracker.borrow().level()
    );
    Ok(())
}

fn display_line(display: &ScoreDisplay, value: i64, level: u32) -> String {
    display.layout(&ScoreLabels::new(Some(value), Some(level)))
}

/// Run scheduled work in real time until nothing is pending
fn drive(scheduler: &ManualScheduler) {
    while let Some(due) = scheduler.next_due() {
        let wait = due.saturating_sub(scheduler.now());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        scheduler.advance(wait);
    }
}
