use std::convert::Infallible;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use car_core::mk_static;
use car_core::utils::controllers::{Car, CarBuilder, CarOp, Engine, Horn, Steering};
use car_core::utils::drivers::LedStrip;
use car_core::utils::CarConfig;
use clap::Parser;
use futures_lite::future::block_on;
use smart_leds_trait::{SmartLedsWrite, RGB8};
use tracing::{error, info, warn};

#[derive(Parser)]
#[clap(version = "1.0")]
struct Opts {
    /// JSON file with timing overrides (see `CarConfig`)
    #[clap(long)]
    config: Option<PathBuf>,
    /// hold time of a left/right impulse, in milliseconds
    #[clap(long)]
    turn_settle_ms: Option<u64>,
    /// length of each blink phase, in milliseconds
    #[clap(long)]
    blink_period_ms: Option<u64>,
    /// honk every N seconds from a scheduler thread
    #[clap(long)]
    honk_every: Option<u64>,
    /// build the car without a horn
    #[clap(long)]
    no_horn: bool,
}

// Console drivers: every actuator call is logged instead of touching pins.

struct ConsoleEngine;

impl Engine for ConsoleEngine {
    type Error = Infallible;

    fn forward(&mut self) -> Result<(), Infallible> {
        info!("engine: forward");
        Ok(())
    }
    fn backward(&mut self) -> Result<(), Infallible> {
        info!("engine: backward");
        Ok(())
    }
    fn left(&mut self) -> Result<(), Infallible> {
        info!("engine: left");
        Ok(())
    }
    fn right(&mut self) -> Result<(), Infallible> {
        info!("engine: right");
        Ok(())
    }
    fn stop(&mut self) -> Result<(), Infallible> {
        info!("engine: stop");
        Ok(())
    }
}

struct ConsoleServo;

impl Steering for ConsoleServo {
    type Error = Infallible;

    fn roll(
        &mut self,
        angle: i32,
    ) -> Result<(), Infallible> {
        info!(angle, "servo: roll");
        Ok(())
    }
}

struct ConsoleBuzzer;

impl Horn for ConsoleBuzzer {
    type Error = Infallible;

    fn whistle(&mut self) -> Result<(), Infallible> {
        info!("buzzer: beep");
        Ok(())
    }
}

// LED driver that logs to console
struct SerialLedDriver;

impl SmartLedsWrite for SerialLedDriver {
    type Error = Infallible;
    type Color = RGB8;

    fn write<T, I>(
        &mut self,
        iterator: T,
    ) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        for c in iterator {
            info!("LED: {:?}", c.into());
        }
        Ok(())
    }
}

type DemoCar = Car<ConsoleEngine, ConsoleServo, Option<ConsoleBuzzer>, LedStrip<SerialLedDriver, 2>>;

fn load_config(opts: &Opts) -> anyhow::Result<CarConfig> {
    let mut config = match &opts.config {
        Some(path) => {
            let raw = std::fs::read(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_slice(&raw)
                .with_context(|| format!("invalid car config in {}", path.display()))?
        }
        None => CarConfig::default(),
    };
    if let Some(ms) = opts.turn_settle_ms {
        config.turn_settle_ms = ms;
    }
    if let Some(ms) = opts.blink_period_ms {
        config.blink_period_ms = ms;
    }
    Ok(config)
}

/// Remote control: one command per line, either a bare tag (`honk`) or a JSON
/// body (`{"op":"honk"}`). `quit` or end of input hands control back.
fn remote(
    car: &'static DemoCar,
    input: impl BufRead,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line.context("failed to read command")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let op = if line.starts_with('{') {
            match CarOp::from_json(line.as_bytes()) {
                Ok(op) => op,
                Err(e) => {
                    warn!("ignoring command: {}", e);
                    continue;
                }
            }
        } else {
            CarOp::from_wire(line)
        };
        block_on(car.do_op(op))?;
    }
    Ok(())
}

/// Periodic producer racing the remote for the same queue.
fn scheduler(
    car: &'static DemoCar,
    period: Duration,
) {
    loop {
        thread::sleep(period);
        if let Err(e) = block_on(car.do_op(CarOp::Honk)) {
            info!("scheduler done: {}", e);
            break;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opts: Opts = Opts::parse();
    let config = load_config(&opts)?;

    let horn = (!opts.no_horn).then_some(ConsoleBuzzer);
    if horn.is_none() {
        warn!("building the car without a horn");
    }

    let car: &'static DemoCar = mk_static!(
        DemoCar,
        CarBuilder::new()
            .engine(ConsoleEngine)
            .steering(ConsoleServo)
            .horn(horn)
            .light(LedStrip::new(SerialLedDriver))
            .config(config)
            .build()
    );

    car.start()?;
    info!("car started, type commands (forward, left, honk, ...) or quit");

    let runner = thread::spawn(move || block_on(car.run()));
    if let Some(secs) = opts.honk_every.filter(|s| *s > 0) {
        thread::spawn(move || scheduler(car, Duration::from_secs(secs)));
    }

    if let Err(e) = remote(car, io::stdin().lock()) {
        error!("remote failed: {:?}", e);
    }

    block_on(car.stop())?;
    runner
        .join()
        .map_err(|_| anyhow!("control loop panicked"))??;
    info!("car stopped");
    Ok(())
}
