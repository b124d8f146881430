//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. The reducer mutates state and returns
//! effects; this module turns them into spawned handlers whose results
//! come back through the inbox.
//!
//! - `mod.rs`: `TuiRuntime`, event loop, effect dispatch
//! - `inbox.rs`: inbox channel types
//! - `handlers/`: async effect handlers (API calls, session persistence)

mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use wsreg_core::api::ApiClient;
use wsreg_core::session::SessionStore;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Frame cadence while requests are in flight (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: terminal::Tui,
    pub state: AppState,
    client: ApiClient,
    store: SessionStore,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Enters the alternate screen and restores any persisted session.
    pub fn new(client: ApiClient, store: SessionStore) -> Result<Self> {
        // Hook first so a failing setup still restores the terminal.
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let session = store.restore();
        if let Some(identity) = &session {
            tracing::info!(ticket = %identity.ticket_id, "restored session");
        }

        let (inbox_tx, inbox_rx) = inbox::channel();
        Ok(Self {
            terminal,
            state: AppState::new(session),
            client,
            store,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs until the user quits.
    pub fn run(&mut self) -> Result<()> {
        let effects = update::init(&mut self.state);
        self.execute_effects(effects);
        self.event_loop()
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let events = self.collect_events()?;

            for event in events {
                // Input and results redraw immediately; ticks only redraw
                // while the spinner is visible.
                dirty |= match &event {
                    UiEvent::Tick => self.state.tui.tasks.is_any_running(),
                    _ => true,
                };
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty && !self.state.tui.should_quit {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    /// Collects inbox results and terminal input, then a Tick when due.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tui.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        self.collect_inbox_events(&mut events);

        // Don't block when results are already waiting to be applied.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    fn collect_inbox_events(&mut self, events: &mut Vec<UiEvent>) {
        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }
    }

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns a handler and posts its result event to the inbox.
    fn spawn_effect<Fut>(&self, fut: Fut)
    where
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(fut.await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::ClearSession => {
                handlers::clear_session(&self.store);
            }
            UiEffect::LoadCatalog { task } => {
                self.spawn_effect(handlers::catalog_load(self.client.clone(), task));
            }
            UiEffect::LoadPersonal { task, ticket_id } => {
                self.spawn_effect(handlers::personal_load(self.client.clone(), task, ticket_id));
            }
            UiEffect::Login { task, ticket_id } => {
                self.spawn_effect(handlers::login(
                    self.client.clone(),
                    self.store.clone(),
                    task,
                    ticket_id,
                ));
            }
            UiEffect::Registration {
                ticket_id,
                workshop_id,
                action,
            } => {
                self.spawn_effect(handlers::registration(
                    self.client.clone(),
                    ticket_id,
                    workshop_id,
                    action,
                ));
            }
            UiEffect::SubmitRating {
                task,
                ticket_id,
                workshop_id,
                draft,
            } => {
                self.spawn_effect(handlers::submit_rating(
                    self.client.clone(),
                    task,
                    ticket_id,
                    workshop_id,
                    draft,
                ));
            }
            UiEffect::LoadAdmin {
                task,
                admin,
                fallback_catalog,
            } => {
                self.spawn_effect(handlers::admin_load(
                    self.client.clone(),
                    task,
                    admin,
                    fallback_catalog,
                ));
            }
            UiEffect::AdminWithdraw {
                task,
                admin,
                ticket_id,
                workshop_id,
                participant,
                fallback_catalog,
            } => {
                self.spawn_effect(handlers::admin_withdraw(
                    self.client.clone(),
                    task,
                    admin,
                    ticket_id,
                    workshop_id,
                    participant,
                    fallback_catalog,
                ));
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
