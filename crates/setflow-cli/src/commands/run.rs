//! Interactive workout session.
//!
//! Owns the engine for the whole session and serializes every mutation
//! through one `select!` loop: periodic wake-up ticks for cue
//! evaluation, stdin lines for user intents. The engine state is
//! re-rendered after every accepted command.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use setflow_core::{Config, CoreError, CueKind, CueSink, Event, Phase, SystemClock, WorkoutEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::debug;

#[derive(Args)]
pub struct RunArgs {
    /// Config file path (defaults to ~/.config/setflow/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the wake-up interval in milliseconds
    #[arg(long)]
    pub tick_ms: Option<u64>,
    /// Start with audio cues disabled
    #[arg(long)]
    pub no_audio: bool,
    /// Emit events as JSON lines instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// Terminal stand-in for device feedback: audible cues ring the bell,
/// everything else is rendered by the event printer.
#[derive(Debug, Default, Clone, Copy)]
struct TerminalCues;

impl CueSink for TerminalCues {
    fn play_cue(&self, kind: CueKind) {
        if matches!(kind, CueKind::AudioTick | CueKind::Notification) {
            eprint!("\x07");
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), CoreError> {
    let path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let cfg = Config::load(&path)?;
    let tick_ms = args.tick_ms.unwrap_or(cfg.tick_interval_ms).max(10);

    let mut engine = WorkoutEngine::with_parts(Arc::new(SystemClock), Box::new(TerminalCues));
    engine.set_audio_enabled(cfg.audio_enabled && !args.no_audio);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session_loop(
        engine,
        Duration::from_millis(tick_ms),
        args.json,
    ))?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Complete,
    Next,
    Reset,
    Stop,
    Audio,
    Quit,
    Help,
    Snapshot,
}

enum Dispatch {
    Quit,
    Handled(Option<Event>),
    Unavailable,
    Help,
    Snapshot,
    Unknown,
}

fn parse(input: &str) -> Option<Command> {
    match input {
        "q" | "quit" => Some(Command::Quit),
        "s" | "start" => Some(Command::Start),
        "c" | "complete" => Some(Command::Complete),
        "n" | "next" => Some(Command::Next),
        "r" | "reset" => Some(Command::Reset),
        "x" | "stop" => Some(Command::Stop),
        "a" | "audio" => Some(Command::Audio),
        "?" | "help" => Some(Command::Help),
        "" => Some(Command::Snapshot),
        _ => None,
    }
}

/// Mirrors the engine's own operation preconditions. Both the help
/// line and command acceptance go through this one gate.
fn available_in(phase: Phase, cmd: Command) -> bool {
    match cmd {
        Command::Start => phase != Phase::Exercising,
        Command::Complete => phase == Phase::Exercising,
        Command::Next => phase == Phase::Resting,
        _ => true,
    }
}

const LABELS: &[(Command, &str)] = &[
    (Command::Start, "s start set"),
    (Command::Complete, "c complete set"),
    (Command::Next, "n next set"),
    (Command::Stop, "x stop"),
    (Command::Reset, "r reset"),
    (Command::Audio, "a audio"),
    (Command::Quit, "q quit"),
];

/// Commands offered for the current phase.
fn available(phase: Phase) -> String {
    LABELS
        .iter()
        .filter(|(cmd, _)| available_in(phase, *cmd))
        .map(|(_, label)| *label)
        .collect::<Vec<_>>()
        .join(" | ")
}

fn dispatch(engine: &mut WorkoutEngine, input: &str) -> Dispatch {
    debug!(input, phase = ?engine.phase(), "dispatch");
    let Some(cmd) = parse(input) else {
        return Dispatch::Unknown;
    };
    if !available_in(engine.phase(), cmd) {
        return Dispatch::Unavailable;
    }
    match cmd {
        Command::Quit => Dispatch::Quit,
        Command::Start => Dispatch::Handled(engine.start_exercise()),
        Command::Complete => Dispatch::Handled(engine.complete_set()),
        Command::Next => Dispatch::Handled(engine.start_next_set()),
        Command::Reset => Dispatch::Handled(engine.reset()),
        Command::Stop => Dispatch::Handled(engine.stop()),
        Command::Audio => Dispatch::Handled(engine.toggle_audio()),
        Command::Help => Dispatch::Help,
        Command::Snapshot => Dispatch::Snapshot,
    }
}

async fn session_loop(
    mut engine: WorkoutEngine,
    tick: Duration,
    json: bool,
) -> std::io::Result<()> {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_snapshot(&engine, json);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for event in engine.tick() {
                    debug!(?event, "cue fired");
                    print_event(&event, json);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match dispatch(&mut engine, line.trim()) {
                    Dispatch::Quit => break,
                    Dispatch::Handled(Some(event)) => {
                        print_event(&event, json);
                        print_snapshot(&engine, json);
                    }
                    Dispatch::Handled(None) | Dispatch::Unavailable => {
                        println!("(not available in the current phase)")
                    }
                    Dispatch::Help => println!("commands: {}", available(engine.phase())),
                    Dispatch::Snapshot => print_snapshot(&engine, json),
                    Dispatch::Unknown => println!("unknown command, ? for help"),
                }
            }
        }
    }
    Ok(())
}

fn print_event(event: &Event, json: bool) {
    if json {
        if let Ok(line) = serde_json::to_string(event) {
            println!("{line}");
        }
        return;
    }
    match event {
        Event::SetStarted { set, .. } => println!("set {set} started"),
        Event::SetCompleted { set, .. } => println!("set {set} complete, resting"),
        Event::Stopped { set, .. } => println!("stopped after {set} set(s)"),
        Event::EngineReset { .. } => println!("reset"),
        Event::AudioToggled { enabled, .. } => {
            println!("audio {}", if *enabled { "on" } else { "off" })
        }
        Event::CueFired {
            kind,
            elapsed_ms,
            at,
        } => println!(
            "{} cue {kind:?} at {}s",
            at.with_timezone(&chrono::Local).format("%H:%M:%S"),
            elapsed_ms / 1000
        ),
        Event::StateSnapshot { .. } => {}
    }
}

fn print_snapshot(engine: &WorkoutEngine, json: bool) {
    let snap = engine.snapshot();
    if json {
        if let Ok(line) = serde_json::to_string(&snap) {
            println!("{line}");
        }
        return;
    }
    if let Event::StateSnapshot {
        phase,
        current_set,
        elapsed_ms,
        audio_enabled,
        ..
    } = snap
    {
        println!(
            "[{phase:?}] set {current_set} | {}s elapsed | audio {}",
            elapsed_ms / 1000,
            if audio_enabled { "on" } else { "off" }
        );
        println!("commands: {}", available(phase));
    }
}
