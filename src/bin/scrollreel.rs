use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{
    FixedGeometry, FrameReport, RecordingExecutor, RecordingSink, Script, ScrollEngine,
    ScrollGeometry,
};
use tracing_subscriber::EnvFilter;

/// Timestamp step assumed for trace entries without an explicit time.
const FRAME_MS: u64 = 16;

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a script and report construction errors.
    Validate(ValidateArgs),
    /// Replay a recorded input trace and print one JSON line per frame.
    Replay(ReplayArgs),
    /// Print the built-in ocean script as JSON.
    Preset(PresetArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Trace JSON: a list of deltas or `{"op": ...}` events.
    #[arg(long)]
    trace: PathBuf,

    /// Viewport height in pixels; every scene is one viewport tall.
    #[arg(long, default_value_t = 900.0)]
    viewport_height: f64,
}

#[derive(Parser, Debug)]
struct PresetArgs {
    /// Write to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(untagged)]
enum TraceStep {
    Delta(f64),
    Event(TraceEvent),
}

#[derive(serde::Deserialize, Debug)]
#[serde(tag = "op", rename_all = "snake_case")]
enum TraceEvent {
    Delta {
        delta: f64,
        at_ms: Option<u64>,
    },
    Seek {
        progress: f64,
        at_ms: Option<u64>,
    },
    Resize {
        at_ms: Option<u64>,
        viewport_height: Option<f64>,
    },
}

#[derive(serde::Serialize)]
struct ReplayLine<'a> {
    #[serde(flatten)]
    report: &'a FrameReport,
    executed: &'a [scrollreel::SideEffect],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Replay(args) => cmd_replay(args),
        Command::Preset(args) => cmd_preset(args),
    }
}

fn read_script(path: &Path) -> anyhow::Result<Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let script = Script::from_reader(BufReader::new(f))
        .with_context(|| format!("parse script '{}'", path.display()))?;
    Ok(script)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let script = read_script(&args.script)?;
    let compiled = script
        .compile()
        .with_context(|| format!("validate '{}'", args.script.display()))?;
    println!(
        "ok: {} scenes, {} cues, extent {}",
        compiled.machine.len(),
        compiled.timeline.len(),
        compiled.extent
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let script = read_script(&args.script)?;
    let f = File::open(&args.trace)
        .with_context(|| format!("open trace '{}'", args.trace.display()))?;
    let trace: Vec<TraceStep> =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse trace JSON")?;

    let geometry = FixedGeometry::new(ScrollGeometry::uniform(
        script.scenes.len(),
        args.viewport_height,
    ));
    let mut engine = ScrollEngine::new(
        &script,
        RecordingSink::new(),
        RecordingExecutor::new(),
        geometry,
    )?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let report = engine.start(Duration::ZERO);
    write_line(&mut out, &report, engine.executor().log())?;

    for (i, step) in trace.into_iter().enumerate() {
        let frame = i as u64 + 1;
        let default_at = Duration::from_millis(frame * FRAME_MS);
        let at = |ms: Option<u64>| ms.map_or(default_at, Duration::from_millis);
        let seen = engine.executor().log().len();
        let report = match step {
            TraceStep::Delta(delta) => engine.tick(delta, default_at),
            TraceStep::Event(TraceEvent::Delta { delta, at_ms }) => engine.tick(delta, at(at_ms)),
            TraceStep::Event(TraceEvent::Seek { progress, at_ms }) => {
                engine.seek(progress, at(at_ms))
            }
            TraceStep::Event(TraceEvent::Resize {
                at_ms,
                viewport_height,
            }) => {
                if let Some(vh) = viewport_height {
                    engine
                        .geometry_provider_mut()
                        .set(ScrollGeometry::uniform(script.scenes.len(), vh));
                }
                engine.notify_resize(at(at_ms));
                continue;
            }
        };
        write_line(&mut out, &report, &engine.executor().log()[seen..])?;
    }
    out.flush().with_context(|| "flush stdout")?;
    Ok(())
}

fn write_line(
    out: &mut impl std::io::Write,
    report: &FrameReport,
    executed: &[scrollreel::SideEffect],
) -> anyhow::Result<()> {
    let line = serde_json::to_string(&ReplayLine { report, executed })?;
    writeln!(out, "{line}").with_context(|| "write frame report")?;
    Ok(())
}

fn cmd_preset(args: PresetArgs) -> anyhow::Result<()> {
    let script = scrollreel::narrative::ocean_script()?;
    let json = script.to_json_pretty()?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("write script '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
