//! Keeps the playback model in sync with the player.
//!
//! After an initial `/api/status` fetch the client loops forever: it waits on
//! `/api/idle` until the player reports a change, then fetches `/api/status`.
//! Both steps run strictly one after the other and a failed request never
//! breaks the loop; it simply moves on to the next step. There is no backoff.
//!
//! Commands are sent without waiting for or applying their answer. The model
//! only changes when a later status document confirms the new state.

use crate::album_art::AlbumArtClient;
use crate::api::{ApiError, Command, PlayerApi, PlayerStatus};
use crate::config::AppConfig;
use crate::playback::{ArtChange, ModelHandle};
use dioxus::logger::tracing::{debug, info, warn};
use futures_util::future::{FutureExt, LocalBoxFuture};
use std::cell::Cell;
use std::rc::Rc;

/// Runs detached tasks on the UI event loop.
pub trait Spawner: Clone + 'static {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

/// Spawns onto the Dioxus runtime of the calling scope.
#[derive(Debug, Clone, Copy, Default)]
pub struct DioxusSpawner;

impl Spawner for DioxusSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        dioxus::prelude::spawn(task);
    }
}

/// Stops a running poll loop at its next step.
#[derive(Debug, Clone, Default)]
pub struct PollHandle(Rc<Cell<bool>>);

impl PollHandle {
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Counts consecutive status failures so an unreachable player warns once
/// instead of on every cycle.
#[derive(Debug, Default)]
struct FailureStreak(u32);

impl FailureStreak {
    /// Returns whether this failure starts a new streak.
    fn fail(&mut self) -> bool {
        self.0 = self.0.saturating_add(1);
        self.0 == 1
    }

    /// Ends the streak and returns how many failures it had.
    fn succeed(&mut self) -> u32 {
        std::mem::take(&mut self.0)
    }
}

pub struct StatusClient<A, M, S> {
    api: Rc<A>,
    model: M,
    spawner: S,
    art: AlbumArtClient<A, M>,
    poll: PollHandle,
}

impl<A, M: Clone, S: Clone> Clone for StatusClient<A, M, S> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            model: self.model.clone(),
            spawner: self.spawner.clone(),
            art: self.art.clone(),
            poll: self.poll.clone(),
        }
    }
}

impl<A, M, S> StatusClient<A, M, S>
where
    A: PlayerApi + 'static,
    M: ModelHandle,
    S: Spawner,
{
    pub fn new(api: A, model: M, spawner: S, config: &AppConfig) -> Self {
        let api = Rc::new(api);
        let art = AlbumArtClient::new(api.clone(), model.clone(), config.art_retry_delay_ms);
        Self {
            api,
            model,
            spawner,
            art,
            poll: PollHandle::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn poll_handle(&self) -> PollHandle {
        self.poll.clone()
    }

    /// Fetches `/api/status` once and applies it. Returns whether it succeeded.
    pub async fn refresh(&self) -> bool {
        match self.fetch_status().await {
            Ok(()) => true,
            Err(err) => {
                warn!("status fetch failed: {err}");
                false
            }
        }
    }

    async fn fetch_status(&self) -> Result<(), ApiError> {
        let status = self.api.status().await?;
        self.apply(status);
        Ok(())
    }

    /// Waits on `/api/idle` and applies the state it returns, if any.
    pub async fn idle(&self) -> bool {
        match self.api.idle().await {
            Ok(status) => {
                self.apply(status);
                true
            }
            Err(err) => {
                debug!("idle request ended without a status: {err}");
                false
            }
        }
    }

    /// The idle/status loop. Runs until the poll handle is cancelled.
    pub async fn run(&self) {
        info!("status polling started");
        let mut cycles: u64 = 0;
        let mut streak = FailureStreak::default();
        loop {
            if self.poll.is_cancelled() {
                break;
            }
            self.idle().await;
            if self.poll.is_cancelled() {
                break;
            }
            match self.fetch_status().await {
                Ok(()) => {
                    let failures = streak.succeed();
                    if failures > 0 {
                        info!(failures, "status fetch recovered");
                    }
                }
                Err(err) => {
                    if streak.fail() {
                        warn!("status fetch failed: {err}");
                    } else {
                        debug!(failures = streak.0, "status fetch still failing: {err}");
                    }
                }
            }
            cycles = cycles.saturating_add(1);
        }
        info!(cycles, "status polling stopped");
    }

    /// Loads the current status, then keeps polling in a background task.
    pub fn start_polling(&self) -> PollHandle {
        let client = self.clone();
        self.spawner.spawn(
            async move {
                client.refresh().await;
                client.run().await;
            }
            .boxed_local(),
        );
        self.poll.clone()
    }

    fn apply(&self, status: PlayerStatus) {
        let change = self.model.update_model(|model| model.apply_status(status));
        match change {
            ArtChange::Unchanged => {}
            ArtChange::Fetch(generation) => {
                debug!(generation, "track changed, fetching album art");
                let art = self.art.clone();
                self.spawner.spawn(
                    async move {
                        art.fetch(generation).await;
                    }
                    .boxed_local(),
                );
            }
            ArtChange::Cleared => debug!("no track loaded, album art cleared"),
        }
    }

    /// Sends `command` in the background. Failures are logged and otherwise
    /// ignored.
    pub fn send(&self, command: Command) {
        info!(?command, "sending command");
        let api = self.api.clone();
        self.spawner.spawn(
            async move {
                if let Err(err) = api.command(command).await {
                    warn!(?command, "command failed: {err}");
                }
            }
            .boxed_local(),
        );
    }

    pub fn play(&self) {
        self.send(Command::Play);
    }

    pub fn toggle(&self) {
        self.send(Command::Toggle);
    }

    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    pub fn prev(&self) {
        self.send(Command::Prev);
    }

    pub fn next(&self) {
        self.send(Command::Next);
    }

    pub fn toggle_shuffle(&self) {
        self.send(Command::Shuffle);
    }

    pub fn toggle_repeat(&self) {
        self.send(Command::Repeat);
    }

    pub fn seek(&self, seconds: u32) {
        self.send(Command::Seek(seconds));
    }
}
