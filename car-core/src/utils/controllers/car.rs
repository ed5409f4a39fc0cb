//! The car dispatcher.
//!
//! A [`Car`] owns a bounded command queue and the actuators. [`Car::run`]
//! drives three cooperating loops on the caller's executor:
//!
//! - the control loop, the only consumer of the queue, which applies engine
//!   and steering commands one at a time;
//! - the blink worker, which toggles the light until it is superseded or the
//!   car stops;
//! - the honk worker, which plays one finite whistle sequence per trigger.
//!
//! Producers call [`Car::do_op`] from any task or thread; it suspends while
//! the queue is full.

use core::{
    cell::Cell,
    convert::Infallible,
    fmt::Debug,
    future::poll_fn,
    sync::atomic::{AtomicBool, AtomicI32, AtomicU8, Ordering},
};

use embassy_futures::{
    join::join3,
    select::{select, Either},
};
use embassy_sync::{
    blocking_mutex::{raw::CriticalSectionRawMutex, Mutex as BlockingMutex},
    channel::Channel,
    mutex::Mutex,
    signal::Signal,
};
use embassy_time::{Duration, Timer};

use super::{Absent, CarOp, Engine, Horn, Light, Steering, SteeringAngle};
use crate::utils::{config::CarConfig, error::CarError};

/// Capacity of the command queue.
pub const QUEUE_DEPTH: usize = 8;

type RawMutex = CriticalSectionRawMutex;

/// Lifecycle of a [`Car`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CarState {
    /// Assembled, not yet accepting commands.
    Built = 0,
    Running = 1,
    /// `stop` was called; the control loop is draining the queue.
    Stopping = 2,
    Stopped = 3,
}

impl CarState {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => CarState::Built,
            1 => CarState::Running,
            2 => CarState::Stopping,
            _ => CarState::Stopped,
        }
    }
}

/// Message for an accessory worker. A new `Start` replaces whatever the
/// worker is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    Start,
    Halt,
}

/// Assembles a [`Car`] from the parts that are fitted.
///
/// Every slot starts out [`Absent`]; setting a slot changes the builder's type.
pub struct CarBuilder<E = Absent, S = Absent, H = Absent, L = Absent> {
    engine: E,
    steering: S,
    horn: H,
    light: L,
    config: CarConfig,
}

impl CarBuilder {
    pub fn new() -> Self {
        CarBuilder {
            engine: Absent,
            steering: Absent,
            horn: Absent,
            light: Absent,
            config: CarConfig::default(),
        }
    }
}

impl Default for CarBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, S, H, L> CarBuilder<E, S, H, L> {
    pub fn engine<E2: Engine>(
        self,
        engine: E2,
    ) -> CarBuilder<E2, S, H, L> {
        CarBuilder {
            engine,
            steering: self.steering,
            horn: self.horn,
            light: self.light,
            config: self.config,
        }
    }

    pub fn steering<S2: Steering>(
        self,
        steering: S2,
    ) -> CarBuilder<E, S2, H, L> {
        CarBuilder {
            engine: self.engine,
            steering,
            horn: self.horn,
            light: self.light,
            config: self.config,
        }
    }

    pub fn horn<H2: Horn>(
        self,
        horn: H2,
    ) -> CarBuilder<E, S, H2, L> {
        CarBuilder {
            engine: self.engine,
            steering: self.steering,
            horn,
            light: self.light,
            config: self.config,
        }
    }

    pub fn light<L2: Light>(
        self,
        light: L2,
    ) -> CarBuilder<E, S, H, L2> {
        CarBuilder {
            engine: self.engine,
            steering: self.steering,
            horn: self.horn,
            light,
            config: self.config,
        }
    }

    pub fn config(
        mut self,
        config: CarConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Produce a car that is not yet started.
    pub fn build(self) -> Car<E, S, H, L>
    where
        E: Engine,
        S: Steering,
        H: Horn,
        L: Light,
    {
        Car {
            config: self.config,
            queue: Channel::new(),
            engine: Mutex::new(self.engine),
            steering: Mutex::new(self.steering),
            horn: Mutex::new(self.horn),
            light: Mutex::new(self.light),
            angle: AtomicI32::new(0),
            state: AtomicU8::new(CarState::Built as u8),
            looping: AtomicBool::new(false),
            closed: BlockingMutex::new(Cell::new(false)),
            shutdown: Signal::new(),
            halted: Signal::new(),
            blink: Signal::new(),
            honk: Signal::new(),
        }
    }
}

/// The command dispatcher for one car.
pub struct Car<E, S, H, L> {
    config: CarConfig,
    queue: Channel<RawMutex, CarOp, QUEUE_DEPTH>,
    engine: Mutex<RawMutex, E>,
    steering: Mutex<RawMutex, S>,
    horn: Mutex<RawMutex, H>,
    light: Mutex<RawMutex, L>,
    /// Mirror of the control loop's steering angle for readers.
    angle: AtomicI32,
    state: AtomicU8,
    looping: AtomicBool,
    /// Set by the control loop before its final drain. Enqueueing happens
    /// under the same lock, so nothing lands in the queue after the drain.
    closed: BlockingMutex<RawMutex, Cell<bool>>,
    shutdown: Signal<RawMutex, ()>,
    halted: Signal<RawMutex, ()>,
    blink: Signal<RawMutex, Trigger>,
    honk: Signal<RawMutex, Trigger>,
}

impl<E, S, H, L> Car<E, S, H, L>
where
    E: Engine,
    S: Steering,
    H: Horn,
    L: Light,
{
    pub fn state(&self) -> CarState {
        CarState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// Last angle sent to the steering servo.
    pub fn steering_angle(&self) -> i32 {
        self.angle.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &CarConfig {
        &self.config
    }

    /// Commands waiting in the queue.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Begin accepting commands.
    ///
    /// Queues a steering reset and the initial blink. Returns immediately;
    /// the commands are applied once [`run`](Self::run) is being driven.
    pub fn start(&self) -> Result<(), CarError> {
        self.state
            .compare_exchange(
                CarState::Built as u8,
                CarState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| CarError::AlreadyStarted)?;
        tracing::info!("car: started");

        for op in [CarOp::SteerReset, CarOp::Blink] {
            self.queue.try_send(op).map_err(|_| CarError::QueueFull)?;
        }
        Ok(())
    }

    /// Queue one command, waiting for space while the queue is full.
    ///
    /// Fails with [`CarError::Stopped`] if the car stops while waiting; the
    /// command is then not applied.
    pub async fn do_op(
        &self,
        op: CarOp,
    ) -> Result<(), CarError> {
        self.accepting()?;
        loop {
            match self.enqueue(op) {
                Err(CarError::QueueFull) => {
                    // the final drain wakes parked producers
                    poll_fn(|cx| self.queue.poll_ready_to_send(cx)).await;
                }
                result => return result,
            }
        }
    }

    /// Queue one command without waiting.
    pub fn try_do(
        &self,
        op: CarOp,
    ) -> Result<(), CarError> {
        self.accepting()?;
        self.enqueue(op)
    }

    /// Close the queue and bring the car to a halt.
    ///
    /// The control loop applies the commands still queued, cancels the
    /// blinker and the horn, and stops the engine. Resolves once that is done,
    /// so [`run`](Self::run) must be driven concurrently.
    pub async fn stop(&self) -> Result<(), CarError> {
        if let Err(raw) = self.state.compare_exchange(
            CarState::Running as u8,
            CarState::Stopping as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            return Err(match CarState::from_raw(raw) {
                CarState::Built => CarError::NotStarted,
                _ => CarError::Stopped,
            });
        }
        tracing::info!("car: stopping");
        self.shutdown.signal(());
        self.halted.wait().await;
        Ok(())
    }

    /// Drive the control loop and the accessory workers until the car stops.
    ///
    /// Only one `run` may be active per car.
    pub async fn run(&self) -> Result<(), CarError> {
        if self.looping.swap(true, Ordering::AcqRel) {
            return Err(CarError::AlreadyRunning);
        }

        join3(self.control_loop(), self.blink_worker(), self.honk_worker()).await;

        self.state
            .store(CarState::Stopped as u8, Ordering::Release);
        tracing::info!("car: stopped");
        self.halted.signal(());
        Ok(())
    }

    fn enqueue(
        &self,
        op: CarOp,
    ) -> Result<(), CarError> {
        self.closed.lock(|closed| {
            if closed.get() {
                return Err(CarError::Stopped);
            }
            self.queue.try_send(op).map_err(|_| CarError::QueueFull)
        })
    }

    fn accepting(&self) -> Result<(), CarError> {
        match self.state() {
            CarState::Running => Ok(()),
            CarState::Built => Err(CarError::NotStarted),
            CarState::Stopping | CarState::Stopped => Err(CarError::Stopped),
        }
    }

    async fn control_loop(&self) {
        let mut engine = self.engine.lock().await;
        let mut steering = self.steering.lock().await;
        let mut angle = SteeringAngle::from_config(&self.config);

        loop {
            match select(self.queue.receive(), self.shutdown.wait()).await {
                Either::First(op) => {
                    self.dispatch(op, &mut *engine, &mut *steering, &mut angle)
                        .await
                }
                Either::Second(()) => break,
            }
        }

        self.closed.lock(|closed| closed.set(true));
        while let Ok(op) = self.queue.try_receive() {
            self.dispatch(op, &mut *engine, &mut *steering, &mut angle)
                .await;
        }

        self.blink.signal(Trigger::Halt);
        self.honk.signal(Trigger::Halt);
        tracing::info!("car: engine stop");
        report("engine", engine.stop());
    }

    async fn dispatch(
        &self,
        op: CarOp,
        engine: &mut E,
        steering: &mut S,
        angle: &mut SteeringAngle,
    ) {
        match op {
            CarOp::Forward => {
                tracing::info!("car: forward");
                report("engine", engine.forward());
            }
            CarOp::Backward => {
                tracing::info!("car: backward");
                report("engine", engine.backward());
            }
            CarOp::Left => {
                tracing::info!("car: left");
                report("engine", engine.left());
                Timer::after(self.config.turn_settle()).await;
                report("engine", engine.stop());
            }
            CarOp::Right => {
                tracing::info!("car: right");
                report("engine", engine.right());
                Timer::after(self.config.turn_settle()).await;
                report("engine", engine.stop());
            }
            CarOp::Brake => {
                tracing::info!("car: brake");
                report("engine", engine.stop());
            }
            CarOp::Honk => {
                tracing::info!("car: honk");
                self.honk.signal(Trigger::Start);
            }
            CarOp::Blink => {
                tracing::info!("car: blink");
                self.blink.signal(Trigger::Start);
            }
            CarOp::SteerLeft => self.steer(angle.left(), steering),
            CarOp::SteerRight => self.steer(angle.right(), steering),
            CarOp::SteerReset => self.steer(angle.reset(), steering),
        }
    }

    fn steer(
        &self,
        angle: i32,
        steering: &mut S,
    ) {
        self.angle.store(angle, Ordering::Release);
        tracing::info!("car: steering {}", angle);
        report("steering", steering.roll(angle));
    }

    async fn blink_worker(&self) {
        let mut light = self.light.lock().await;
        let period = self.config.blink_period();

        let mut trigger = self.blink.wait().await;
        while trigger == Trigger::Start {
            if !light.is_fitted() {
                tracing::debug!("car: no light fitted");
                trigger = self.blink.wait().await;
                continue;
            }

            let mut lit = false;
            trigger = match select(
                blink_forever(&mut *light, &mut lit, period),
                self.blink.wait(),
            )
            .await
            {
                Either::First(never) => match never {},
                Either::Second(next) => next,
            };
            if lit {
                report("light", light.off());
            }
        }
    }

    async fn honk_worker(&self) {
        let mut horn = self.horn.lock().await;
        let pulses = self.config.honk_pulses;
        let interval = self.config.honk_interval();

        let mut trigger = self.honk.wait().await;
        while trigger == Trigger::Start {
            if !horn.is_fitted() {
                tracing::debug!("car: no horn fitted");
                trigger = self.honk.wait().await;
                continue;
            }

            trigger = match select(
                honk_sequence(&mut *horn, pulses, interval),
                self.honk.wait(),
            )
            .await
            {
                Either::First(()) => self.honk.wait().await,
                Either::Second(next) => next,
            };
        }
    }
}

/// Toggle the light forever. `lit` tracks the last state written.
async fn blink_forever<L: Light>(
    light: &mut L,
    lit: &mut bool,
    period: Duration,
) -> Infallible {
    loop {
        report("light", light.on());
        *lit = true;
        Timer::after(period).await;
        report("light", light.off());
        *lit = false;
        Timer::after(period).await;
    }
}

async fn honk_sequence<H: Horn>(
    horn: &mut H,
    pulses: u8,
    interval: Duration,
) {
    for _ in 0..pulses {
        report("horn", horn.whistle());
        Timer::after(interval).await;
    }
}

fn report<Err: Debug>(
    part: &'static str,
    result: Result<(), Err>,
) {
    if let Err(error) = result {
        tracing::error!(part, ?error, "actuator command failed");
    }
}
