//! dippymap -- render Diplomacy phases onto an SVG map.
//!
//! Usage:
//!   dippymap --map MAP.svg --unit Army=ARMY.svg --unit Fleet=FLEET.svg \
//!            --phase PHASE.json [OPTIONS]
//!
//! Options:
//!   --map FILE          Map document with provinces/highlights/orders/units layers
//!   --unit TYPE=FILE    Unit artwork for TYPE (Army, Fleet); repeatable
//!   --phase FILE        Phase JSON to render; repeatable
//!   --config FILE       Render config JSON
//!   --color PREF        Color preference (#RRGGBB, Nation/#RRGGBB, ...); repeatable
//!   --threads N         Worker threads for several phases (default: 4)
//!   --output PATH       Output file for one phase, directory for several
//!                       (default: stdout, one phase only)

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{error, info};

use dippymap::config::RenderConfig;
use dippymap::map::{DippyMap, UnitType};
use dippymap::palette::{assign_colors, ColorPreferences};
use dippymap::phase::{render_history, render_phase, PhaseView};
use dippymap::scene::{Assets, Scene};

type BoxError = Box<dyn std::error::Error>;

#[derive(Debug, Default)]
struct Options {
    map: Option<PathBuf>,
    units: Vec<(UnitType, PathBuf)>,
    phases: Vec<PathBuf>,
    config: Option<PathBuf>,
    colors: Vec<String>,
    threads: Option<usize>,
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(msg) => {
            eprintln!("{}", msg);
            print_usage();
            std::process::exit(2);
        }
    };
    if let Err(e) = run(opts) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut opts = Options::default();
    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("missing value for {}", flag))
        };
        match flag {
            "--map" => opts.map = Some(value()?.into()),
            "--unit" => {
                let spec = value()?;
                let (name, path) = spec
                    .split_once('=')
                    .ok_or_else(|| format!("invalid --unit value '{}', expected TYPE=FILE", spec))?;
                let unit_type =
                    UnitType::from_name(name).ok_or_else(|| format!("unknown unit type '{}'", name))?;
                opts.units.push((unit_type, path.into()));
            }
            "--phase" => opts.phases.push(value()?.into()),
            "--config" => opts.config = Some(value()?.into()),
            "--color" => opts.colors.push(value()?),
            "--threads" => {
                let v = value()?;
                opts.threads = Some(v.parse().map_err(|_| format!("invalid --threads value '{}'", v))?);
            }
            "--output" => opts.output = Some(value()?.into()),
            "--help" | "-h" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
        i += 1;
    }
    if opts.map.is_none() {
        return Err("--map is required".to_string());
    }
    if opts.phases.is_empty() {
        return Err("at least one --phase is required".to_string());
    }
    if opts.phases.len() > 1 && opts.output.is_none() {
        return Err("--output DIR is required with several phases".to_string());
    }
    Ok(Some(opts))
}

fn run(opts: Options) -> Result<(), BoxError> {
    let mut config = match &opts.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    config.colors.extend(opts.colors.iter().cloned());
    if let Some(threads) = opts.threads {
        if threads == 0 {
            return Err("--threads must be at least 1".into());
        }
        config.threads = threads;
    }

    let map_path = opts.map.as_deref().ok_or("--map is required")?;
    let base = Scene::load(map_path)?;
    let mut assets = Assets::new();
    for (unit_type, path) in &opts.units {
        assets.load(unit_type.template_id(), path)?;
    }

    let phases = opts
        .phases
        .iter()
        .map(|path| load_phase(path))
        .collect::<Result<Vec<_>, _>>()?;
    let prefs = ColorPreferences::parse(&config.colors);
    let colors = assign_colors(&phases[0].variant, &phases[0].nations, &prefs);

    if let [phase] = phases.as_slice() {
        let mut scene = base;
        let mut map = DippyMap::new(&mut scene, &assets);
        render_phase(&mut map, phase, &colors, &config)?;
        let svg = scene.to_svg();
        match &opts.output {
            Some(path) => {
                fs::write(path, svg)?;
                info!(path = %path.display(), "wrote map");
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                out.write_all(svg.as_bytes())?;
                out.flush()?;
            }
        }
        return Ok(());
    }

    let dir = opts.output.as_deref().ok_or("--output DIR is required with several phases")?;
    fs::create_dir_all(dir)?;
    let rendered = render_history(&base, &assets, &phases, &colors, &config)?;
    let mut failed = 0;
    for (i, result) in rendered.into_iter().enumerate() {
        match result {
            Ok(svg) => fs::write(dir.join(format!("phase-{:03}.svg", i)), svg)?,
            Err(e) => {
                error!(phase = %opts.phases[i].display(), "{}", e);
                failed += 1;
            }
        }
    }
    info!(written = phases.len() - failed, failed, dir = %dir.display(), "wrote maps");
    if failed > 0 {
        return Err(format!("{} of {} phases failed to render", failed, phases.len()).into());
    }
    Ok(())
}

fn load_phase(path: &Path) -> Result<PhaseView, BoxError> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("failed to read phase {}: {}", path.display(), e))?;
    PhaseView::from_json(&data)
        .map_err(|e| format!("failed to parse phase {}: {}", path.display(), e).into())
}

fn print_usage() {
    eprintln!(
        "Usage: dippymap --map MAP.svg --unit TYPE=FILE... --phase PHASE.json... [OPTIONS]

Options:
  --map FILE          Map document
  --unit TYPE=FILE    Unit artwork for TYPE (Army, Fleet); repeatable
  --phase FILE        Phase JSON to render; repeatable
  --config FILE       Render config JSON
  --color PREF        Color preference; repeatable
  --threads N         Worker threads for several phases
  --output PATH       Output file (one phase) or directory (several)"
    );
}
