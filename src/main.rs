use std::{env, io::Write, time::Duration};

use anyhow::{bail, Context};
use log::info;
use neuroflow::{
    model::RandomSource, LocalLoopView, NetworkInputs, NetworkView, Phase, SampleSource, Variant,
    Viewport, VizConfig,
};

const USAGE: &str = "\
Usage: neuroflow [options]

Renders one frame of a diagram as SVG on stdout.

Options:
  --view <network|loop>        diagram to render (default: network)
  --variant <backprop|predictive>
  --phase <idle|phase1|phase2>
  --width <px>                 (default: 900)
  --height <px>                (default: 400)
  --advance-ms <ms>            animation time to play before rendering (default: 0)
  --config <path>              JSON configuration
  --seed <n>                   seed for sample data and edge weights
  --paused                     render without launching particles
  -h, --help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Diagram {
    Network,
    Loop,
}

#[derive(Debug)]
struct Options {
    diagram: Diagram,
    variant: Variant,
    phase: Phase,
    viewport: Viewport,
    advance: Duration,
    config: Option<String>,
    seed: Option<u64>,
    paused: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            diagram: Diagram::Network,
            variant: Variant::Backprop,
            phase: Phase::Phase1,
            viewport: Viewport::new(900.0, 400.0),
            advance: Duration::ZERO,
            config: None,
            seed: None,
            paused: false,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Options>> {
    let mut opts = Options::default();

    while let Some(flag) = args.next() {
        if flag == "-h" || flag == "--help" {
            return Ok(None);
        }
        if flag == "--paused" {
            opts.paused = true;
            continue;
        }

        let value = args.next().with_context(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--view" => {
                opts.diagram = match value.as_str() {
                    "network" => Diagram::Network,
                    "loop" => Diagram::Loop,
                    other => bail!("unknown view: {other}"),
                }
            }
            "--variant" => opts.variant = value.parse()?,
            "--phase" => opts.phase = value.parse()?,
            "--width" => opts.viewport.width = value.parse().context("--width")?,
            "--height" => opts.viewport.height = value.parse().context("--height")?,
            "--advance-ms" => {
                opts.advance = Duration::from_millis(value.parse().context("--advance-ms")?)
            }
            "--config" => opts.config = Some(value),
            "--seed" => opts.seed = Some(value.parse().context("--seed")?),
            other => bail!("unknown option: {other}\n\n{USAGE}"),
        }
    }

    Ok(Some(opts))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Some(opts) = parse_args(env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    let mut config = match &opts.config {
        Some(path) => VizConfig::from_json_file(path)?,
        None => VizConfig::default(),
    };
    if opts.seed.is_some() {
        config.seed = opts.seed;
    }

    let svg = match opts.diagram {
        Diagram::Network => {
            let topology = config.topology()?;
            let data = RandomSource::new(config.seed).sample(&topology);
            let inputs = NetworkInputs {
                topology,
                variant: opts.variant,
                phase: opts.phase,
                animating: !opts.paused,
                data,
            };
            let mut view = NetworkView::new(
                inputs,
                opts.viewport,
                config.palette,
                config.network_breakpoints,
                config.seed,
            );
            view.tick(opts.advance);
            info!("{}: {}", view.caption(), view.status());
            view.svg()
        }
        Diagram::Loop => {
            let mut view = LocalLoopView::from_config(&config, opts.viewport);
            view.tick(config.timing.mount_delay());
            view.tick(opts.advance);
            view.svg()
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(svg.as_bytes()).context("writing SVG")?;
    Ok(())
}
