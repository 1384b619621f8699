// In crates/engine/src/handle.rs

use crate::session::{DayOutcome, Session};
use crate::{Error, Result};
use core_types::{MarketScenario, SimulationState};
use events::{PositionClosed, PositionOpened, SessionEvent};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Interval, MissedTickBehavior};

const COMMAND_QUEUE_CAPACITY: usize = 64;

/// A manual action sent to the session task.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Open,
    Close,
    NextDay,
    SkipToMaturity,
    Reset(Option<MarketScenario>),
    SetScenario(MarketScenario),
    SetRunning(bool),
    SetTickInterval(Duration),
}

/// The result of a successfully applied command.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Opened(PositionOpened),
    Closed(PositionClosed),
    Day(DayOutcome),
    Skipped { days: u32 },
    Done,
}

enum Envelope {
    Command {
        command: SessionCommand,
        reply: oneshot::Sender<Result<CommandOutcome>>,
    },
    Shutdown,
}

/// A cloneable handle on a session owned by a background task.
///
/// Manual commands and timer ticks are applied one at a time by the task, so
/// they can never interleave. After every transition the task publishes a
/// fresh snapshot, which `state()` returns, and only then sends the
/// transition's events. A subscriber woken by an event always sees at least
/// the state that produced it.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Envelope>,
    state: watch::Receiver<Arc<SimulationState>>,
    running: watch::Receiver<bool>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Moves `session` onto a new task that advances it every
    /// `tick_interval` while running.
    ///
    /// # Returns
    ///
    /// The handle and the task's `JoinHandle`. The task ends when every
    /// handle is dropped or `shutdown` is called.
    pub fn spawn(mut session: Session, tick_interval: Duration) -> (Self, JoinHandle<()>) {
        session.hold_events();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (state_tx, state_rx) = watch::channel(session.snapshot());
        let (running_tx, running_rx) = watch::channel(session.is_running());
        let events = session.event_sender();

        let actor = SessionActor {
            session,
            commands: command_rx,
            state: state_tx,
            running: running_tx,
            ticker: new_ticker(tick_interval),
        };
        let task = tokio::spawn(actor.run());

        let handle = Self {
            commands: command_tx,
            state: state_rx,
            running: running_rx,
            events,
        };
        (handle, task)
    }

    /// The latest published state.
    pub fn state(&self) -> Arc<SimulationState> {
        self.state.borrow().clone()
    }

    /// A receiver that is notified of every new state.
    pub fn watch_state(&self) -> watch::Receiver<Arc<SimulationState>> {
        self.state.clone()
    }

    pub fn is_running(&self) -> bool {
        *self.running.borrow()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Sends a command and waits for the task to apply it.
    pub async fn send(&self, command: SessionCommand) -> Result<CommandOutcome> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope::Command { command, reply })
            .await
            .map_err(|_| Error::Closed)?;
        response.await.map_err(|_| Error::Closed)?
    }

    pub async fn open_positions(&self) -> Result<PositionOpened> {
        match self.send(SessionCommand::Open).await? {
            CommandOutcome::Opened(opened) => Ok(opened),
            other => Err(unexpected("open_positions", other)),
        }
    }

    pub async fn close_positions(&self) -> Result<PositionClosed> {
        match self.send(SessionCommand::Close).await? {
            CommandOutcome::Closed(closed) => Ok(closed),
            other => Err(unexpected("close_positions", other)),
        }
    }

    pub async fn next_day(&self) -> Result<DayOutcome> {
        match self.send(SessionCommand::NextDay).await? {
            CommandOutcome::Day(outcome) => Ok(outcome),
            other => Err(unexpected("next_day", other)),
        }
    }

    pub async fn skip_to_maturity(&self) -> Result<u32> {
        match self.send(SessionCommand::SkipToMaturity).await? {
            CommandOutcome::Skipped { days } => Ok(days),
            other => Err(unexpected("skip_to_maturity", other)),
        }
    }

    pub async fn reset(&self, scenario: Option<MarketScenario>) -> Result<()> {
        self.send(SessionCommand::Reset(scenario)).await.map(|_| ())
    }

    pub async fn set_scenario(&self, scenario: MarketScenario) -> Result<()> {
        self.send(SessionCommand::SetScenario(scenario)).await.map(|_| ())
    }

    pub async fn set_running(&self, running: bool) -> Result<()> {
        self.send(SessionCommand::SetRunning(running)).await.map(|_| ())
    }

    pub async fn set_tick_interval(&self, interval: Duration) -> Result<()> {
        self.send(SessionCommand::SetTickInterval(interval)).await.map(|_| ())
    }

    /// Asks the task to stop. Pending commands queued earlier are applied
    /// first.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Envelope::Shutdown).await;
    }
}

fn unexpected(command: &'static str, outcome: CommandOutcome) -> Error {
    tracing::error!(command, ?outcome, "Session task replied with the wrong outcome.");
    Error::UnexpectedReply { command }
}

fn new_ticker(period: Duration) -> Interval {
    let mut ticker = time::interval(period.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

/// The task that owns the session.
struct SessionActor {
    session: Session,
    commands: mpsc::Receiver<Envelope>,
    state: watch::Sender<Arc<SimulationState>>,
    running: watch::Sender<bool>,
    ticker: Interval,
}

impl SessionActor {
    async fn run(mut self) {
        tracing::info!(scenario = %self.session.state().scenario, "Starting session task.");

        loop {
            let running = self.session.is_running();
            tokio::select! {
                envelope = self.commands.recv() => match envelope {
                    Some(Envelope::Command { command, reply }) => {
                        let outcome = self.apply(command);
                        self.publish();
                        // The caller may have given up waiting.
                        let _ = reply.send(outcome);
                    }
                    Some(Envelope::Shutdown) | None => break,
                },
                _ = self.ticker.tick(), if running => {
                    self.session.tick();
                    self.publish();
                }
            }
        }

        tracing::info!("Session task stopped.");
    }

    fn apply(&mut self, command: SessionCommand) -> Result<CommandOutcome> {
        tracing::debug!(?command, "Applying session command.");
        let was_running = self.session.is_running();

        let outcome = match command {
            SessionCommand::Open => self.session.open_positions().map(CommandOutcome::Opened),
            SessionCommand::Close => self.session.close_positions().map(CommandOutcome::Closed),
            SessionCommand::NextDay => self.session.next_day().map(CommandOutcome::Day),
            SessionCommand::SkipToMaturity => self
                .session
                .skip_to_maturity()
                .map(|days| CommandOutcome::Skipped { days }),
            SessionCommand::Reset(scenario) => {
                self.session.reset(scenario);
                Ok(CommandOutcome::Done)
            }
            SessionCommand::SetScenario(scenario) => {
                self.session.set_scenario(scenario).map(|_| CommandOutcome::Done)
            }
            SessionCommand::SetRunning(running) => {
                self.session.set_running(running).map(|_| CommandOutcome::Done)
            }
            SessionCommand::SetTickInterval(period) => {
                self.ticker = new_ticker(period);
                self.ticker.reset();
                Ok(CommandOutcome::Done)
            }
        };

        // A freshly armed timer waits a full period before its first tick.
        if !was_running && self.session.is_running() {
            self.ticker.reset();
        }
        outcome
    }

    /// Publishes the current state and running flag, then releases the
    /// events of the transition that produced them.
    fn publish(&mut self) {
        let snapshot = self.session.snapshot();
        self.state.send_if_modified(|current| {
            if Arc::ptr_eq(current, &snapshot) {
                false
            } else {
                *current = snapshot;
                true
            }
        });
        self.running.send_if_modified(|current| {
            let running = self.session.is_running();
            if *current == running {
                false
            } else {
                *current = running;
                true
            }
        });
        self.session.flush_events();
    }
}
