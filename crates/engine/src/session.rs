// In crates/engine/src/session.rs

use crate::simulate::{DayStep, simulate_day};
use crate::{Error, Result};
use accounting::SessionSummary;
use core_types::{
    HistoryPoint, MarginStatus, MarketScenario, PnlBreakdown, SessionParams, SimulationState,
};
use events::{DayUpdate, Liquidation, Notice, PositionClosed, PositionOpened, SessionEvent};
use market::MarketModel;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use risk::{MaintenanceMarginMonitor, MarginMonitor, MarginSettings};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What a single `next_day` call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    /// One day was simulated.
    Advanced { day: u32, liquidated: bool },
    /// The session is at maturity or liquidated; nothing changed.
    Halted,
}

/// One basis-trading session: the current state plus everything needed to
/// advance it.
///
/// All transitions take `&mut self` and replace the state with a freshly
/// built value. A rejected transition returns an error, publishes a notice
/// and leaves the state as it was.
pub struct Session {
    params: SessionParams,
    market: MarketModel,
    monitor: Box<dyn MarginMonitor>,
    rng: Box<dyn RngCore + Send>,
    state: Arc<SimulationState>,
    running: bool,
    events: broadcast::Sender<SessionEvent>,
    /// Events held back until the owner has published the matching state.
    held: Option<Vec<SessionEvent>>,
}

impl Session {
    /// Creates a session in its initial state.
    ///
    /// # Arguments
    ///
    /// * `params`: The starting conditions every reset returns to.
    /// * `scenario`: The market regime of the first run.
    /// * `rng`: The random source that drives every price path.
    /// * `events`: Where transition events are published.
    pub fn new(
        params: SessionParams,
        scenario: MarketScenario,
        rng: Box<dyn RngCore + Send>,
        events: broadcast::Sender<SessionEvent>,
    ) -> Result<Self> {
        params.validate()?;
        let monitor = MaintenanceMarginMonitor::new(MarginSettings::from_params(&params))
            .map_err(|e| core_types::Error::InvalidParameters(e.to_string()))?;

        Ok(Self {
            market: MarketModel::from_params(&params),
            monitor: Box::new(monitor),
            rng,
            state: Arc::new(SimulationState::initial(&params, scenario)),
            running: false,
            events,
            held: None,
            params,
        })
    }

    /// Creates a session with a seeded generator and its own event channel.
    pub fn seeded(params: SessionParams, scenario: MarketScenario, seed: u64) -> Result<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self::new(
            params,
            scenario,
            Box::new(ChaCha8Rng::seed_from_u64(seed)),
            events,
        )
    }

    /// Creates a session seeded from OS entropy with its own event channel.
    pub fn from_entropy(params: SessionParams, scenario: MarketScenario) -> Result<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self::new(params, scenario, Box::new(ChaCha8Rng::from_entropy()), events)
    }

    /// Swaps in a different margin monitor.
    pub fn with_monitor(mut self, monitor: Box<dyn MarginMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    /// Queues events instead of sending them, until `flush_events` is called.
    pub(crate) fn hold_events(&mut self) {
        self.held.get_or_insert_with(Vec::new);
    }

    /// Sends every queued event in order.
    pub(crate) fn flush_events(&mut self) {
        if let Some(held) = self.held.as_mut() {
            for event in held.drain(..) {
                // No subscribers is not an error.
                let _ = self.events.send(event);
            }
        }
    }

    // --- Read views ---

    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// A shared handle on the current state. It never changes after it is
    /// handed out.
    pub fn snapshot(&self) -> Arc<SimulationState> {
        Arc::clone(&self.state)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pnl(&self) -> PnlBreakdown {
        accounting::mark_to_market(&self.state)
    }

    pub fn basis(&self) -> Decimal {
        accounting::current_basis(&self.state)
    }

    pub fn margin_status(&self) -> MarginStatus {
        self.monitor.check_margin(&self.state, self.pnl().futures_pnl)
    }

    pub fn margin_utilization(&self) -> Decimal {
        accounting::margin_utilization(&self.margin_status())
    }

    pub fn total_equity(&self) -> Decimal {
        accounting::total_equity(&self.state, &self.pnl())
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_state(&self.state, &self.params)
    }

    // --- Transitions ---

    /// Buys one lot of spot and shorts the same quantity of futures.
    pub fn open_positions(&mut self) -> Result<PositionOpened> {
        self.try_open().map_err(|err| self.reject("open_positions", err))
    }

    fn try_open(&mut self) -> Result<PositionOpened> {
        let state = &self.state;
        if state.is_liquidated {
            return Err(Error::Liquidated);
        }
        if state.has_open_position() {
            return Err(Error::PositionAlreadyOpen);
        }
        if state.is_expired() {
            return Err(Error::ContractExpired);
        }

        let quantity = self.params.lot_size;
        let spot_cost = quantity * state.current_spot_price;
        self.monitor.check_open(state.cash, spot_cost)?;

        let mut next = SimulationState::clone(state);
        next.cash -= spot_cost;
        next.spot_position = quantity;
        next.futures_position = -quantity;
        next.entry_spot_price = state.current_spot_price;
        next.entry_futures_price = state.current_futures_price;
        next.history.push(HistoryPoint {
            day: self.params.horizon_days.saturating_sub(state.time_to_maturity),
            spot: state.current_spot_price,
            futures: state.current_futures_price,
            pnl: Decimal::ZERO,
            basis: accounting::current_basis(state),
        });

        let opened = PositionOpened {
            quantity,
            entry_spot_price: next.entry_spot_price,
            entry_futures_price: next.entry_futures_price,
            cash_after: next.cash,
        };
        tracing::info!(
            %quantity,
            entry_spot = %opened.entry_spot_price,
            entry_futures = %opened.entry_futures_price,
            cash = %opened.cash_after,
            "Opened cash-and-carry position."
        );

        self.state = Arc::new(next);
        self.publish(SessionEvent::PositionOpened(opened.clone()));
        Ok(opened)
    }

    /// Sells the spot leg and settles the futures leg, realizing the PnL
    /// into cash.
    pub fn close_positions(&mut self) -> Result<PositionClosed> {
        self.try_close().map_err(|err| self.reject("close_positions", err))
    }

    fn try_close(&mut self) -> Result<PositionClosed> {
        let state = &self.state;
        if !state.has_open_position() {
            return Err(Error::NoOpenPosition);
        }

        let pnl = accounting::mark_to_market(state);
        let mut next = SimulationState::clone(state);
        next.cash = state.cash + state.spot_position * state.current_spot_price + pnl.futures_pnl;
        next.spot_position = Decimal::ZERO;
        next.futures_position = Decimal::ZERO;
        next.entry_spot_price = Decimal::ZERO;
        next.entry_futures_price = Decimal::ZERO;
        next.is_liquidated = false;

        let closed = PositionClosed {
            exit_spot_price: state.current_spot_price,
            exit_futures_price: state.current_futures_price,
            realized_pnl: pnl.total_pnl,
            cash_after: next.cash,
        };
        tracing::info!(
            realized_pnl = %closed.realized_pnl,
            cash = %closed.cash_after,
            "Closed position."
        );

        self.state = Arc::new(next);
        self.set_running_flag(false);
        self.publish(SessionEvent::PositionClosed(closed.clone()));
        Ok(closed)
    }

    /// Simulates one day of an open position. At maturity or after
    /// liquidation this is a no-op that stops the timer. A flat session
    /// cannot advance.
    pub fn next_day(&mut self) -> Result<DayOutcome> {
        if self.state.is_terminal() {
            self.set_running_flag(false);
            return Ok(DayOutcome::Halted);
        }
        if !self.state.has_open_position() {
            return Err(self.reject("next_day", Error::NoOpenPosition));
        }

        let step = simulate_day(
            &self.state,
            &self.market,
            self.monitor.as_ref(),
            self.rng.as_mut(),
        );
        let outcome = self.record_day(&step);
        self.state = Arc::new(step.state);

        if self.state.is_terminal() {
            self.set_running_flag(false);
        }
        Ok(outcome)
    }

    /// Simulates days back to back until maturity or liquidation.
    ///
    /// Stops running first. The loop is capped at `max_skip_iterations`.
    /// Returns the number of days simulated, which is 0 for a terminal
    /// session. A flat session is rejected like `next_day`.
    pub fn skip_to_maturity(&mut self) -> Result<u32> {
        self.set_running_flag(false);
        if !self.state.is_terminal() && !self.state.has_open_position() {
            return Err(self.reject("skip_to_maturity", Error::NoOpenPosition));
        }

        let mut current = SimulationState::clone(&self.state);
        let mut days = 0;
        while !current.is_terminal() && days < self.params.max_skip_iterations {
            let step = simulate_day(&current, &self.market, self.monitor.as_ref(), self.rng.as_mut());
            self.record_day(&step);
            current = step.state;
            days += 1;
        }

        if days > 0 {
            tracing::info!(
                days,
                time_to_maturity = current.time_to_maturity,
                is_liquidated = current.is_liquidated,
                "Skipped to maturity."
            );
            self.state = Arc::new(current);
        }
        Ok(days)
    }

    /// Restores the initial state. `None` also restores the default scenario.
    pub fn reset(&mut self, scenario: Option<MarketScenario>) {
        let scenario = scenario.unwrap_or_default();
        self.set_running_flag(false);
        self.state = Arc::new(SimulationState::initial(&self.params, scenario));
        tracing::info!(%scenario, "Session reset.");
        self.publish(SessionEvent::Reset { scenario });
    }

    /// Switches the market regime, which starts a fresh run.
    pub fn set_scenario(&mut self, scenario: MarketScenario) -> Result<()> {
        if self.state.has_open_position() {
            return Err(self.reject("set_scenario", Error::ScenarioLocked));
        }
        self.reset(Some(scenario));
        Ok(())
    }

    /// Starts or stops timer-driven day advancement.
    pub fn set_running(&mut self, running: bool) -> Result<()> {
        if running {
            let refusal = if self.state.is_liquidated {
                Some(Error::Liquidated)
            } else if self.state.is_expired() {
                Some(Error::ContractExpired)
            } else if !self.state.has_open_position() {
                Some(Error::NotRunnable)
            } else {
                None
            };
            if let Some(err) = refusal {
                return Err(self.reject("set_running", err));
            }
        }
        self.set_running_flag(running);
        Ok(())
    }

    /// Advances one day if the session is running. This is the only entry
    /// point a scheduler should call.
    pub fn tick(&mut self) -> Option<DayOutcome> {
        if !self.running {
            return None;
        }
        match self.next_day() {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                self.set_running_flag(false);
                Some(DayOutcome::Halted)
            }
        }
    }

    // --- Internals ---

    fn record_day(&mut self, step: &DayStep) -> DayOutcome {
        let Some(point) = step.point().copied() else {
            return DayOutcome::Halted;
        };

        tracing::debug!(
            day = point.day,
            spot = %point.spot,
            futures = %point.futures,
            pnl = %point.pnl,
            "Simulated day."
        );
        self.publish(SessionEvent::DayAdvanced(DayUpdate {
            point,
            time_to_maturity: step.state.time_to_maturity,
            pnl: step.pnl,
            margin: step.margin,
        }));

        if step.liquidated {
            tracing::warn!(
                day = point.day,
                required_margin = %step.margin.required_margin,
                equity = %step.margin.equity,
                "Margin call. Position liquidated."
            );
            self.publish(SessionEvent::Liquidated(Liquidation {
                day: point.day,
                required_margin: step.margin.required_margin,
                equity: step.margin.equity,
            }));
        } else if step.state.is_expired() {
            tracing::info!(day = point.day, "Contract reached maturity.");
            self.publish(SessionEvent::Matured { day: point.day });
        }

        DayOutcome::Advanced {
            day: point.day,
            liquidated: step.liquidated,
        }
    }

    fn set_running_flag(&mut self, running: bool) {
        if self.running != running {
            self.running = running;
            tracing::debug!(running, "Running state changed.");
            self.publish(SessionEvent::RunningChanged { running });
        }
    }

    fn reject(&mut self, action: &str, err: Error) -> Error {
        tracing::warn!(action, error = %err, "Action rejected.");
        self.publish(SessionEvent::Notice(Notice::warn(err.to_string())));
        err
    }

    fn publish(&mut self, event: SessionEvent) {
        match self.held.as_mut() {
            Some(held) => held.push(event),
            None => {
                // No subscribers is not an error.
                let _ = self.events.send(event);
            }
        }
    }
}
