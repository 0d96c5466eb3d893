//! In-memory doubles for the player API, the model and the task spawner.

use crate::api::{AlbumArt, ApiError, ArtLoadStatus, Command, PlaybackState, PlayerApi, PlayerStatus};
use crate::playback::{ModelHandle, PlaybackModel};
use crate::status_sync::{PollHandle, Spawner};
use futures_util::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Status,
    Idle,
    Image,
    Command(Command),
}

/// Replays queued responses. An exhausted queue answers HTTP 503.
#[derive(Default)]
pub struct ScriptedApi {
    pub calls: RefCell<Vec<Call>>,
    statuses: RefCell<VecDeque<Result<PlayerStatus, u16>>>,
    idles: RefCell<VecDeque<Result<PlayerStatus, u16>>>,
    images: RefCell<VecDeque<Result<AlbumArt, u16>>>,
    in_flight: Cell<usize>,
    pub max_in_flight: Cell<usize>,
    stop_after: RefCell<Option<(usize, PollHandle)>>,
}

impl ScriptedApi {
    pub fn push_status(&self, response: Result<PlayerStatus, u16>) -> &Self {
        self.statuses.borrow_mut().push_back(response);
        self
    }

    pub fn push_idle(&self, response: Result<PlayerStatus, u16>) -> &Self {
        self.idles.borrow_mut().push_back(response);
        self
    }

    pub fn push_image(&self, response: Result<AlbumArt, u16>) -> &Self {
        self.images.borrow_mut().push_back(response);
        self
    }

    /// Cancels `handle` once `calls` requests have been issued.
    pub fn cancel_after(&self, calls: usize, handle: PollHandle) {
        *self.stop_after.borrow_mut() = Some((calls, handle));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    async fn request<T>(&self, call: Call, queue: &RefCell<VecDeque<Result<T, u16>>>) -> Result<T, ApiError> {
        self.calls.borrow_mut().push(call);
        if let Some((limit, handle)) = self.stop_after.borrow().as_ref() {
            if self.calls.borrow().len() >= *limit {
                handle.cancel();
            }
        }

        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));
        tokio::task::yield_now().await;
        self.in_flight.set(self.in_flight.get() - 1);

        queue
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(503))
            .map_err(ApiError::Status)
    }
}

impl PlayerApi for ScriptedApi {
    async fn status(&self) -> Result<PlayerStatus, ApiError> {
        self.request(Call::Status, &self.statuses).await
    }

    async fn idle(&self) -> Result<PlayerStatus, ApiError> {
        self.request(Call::Idle, &self.idles).await
    }

    async fn image(&self) -> Result<AlbumArt, ApiError> {
        self.request(Call::Image, &self.images).await
    }

    async fn command(&self, command: Command) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::Command(command));
        Ok(())
    }
}

pub type SharedModel = Rc<RefCell<PlaybackModel>>;

impl ModelHandle for SharedModel {
    fn peek_model<R>(&self, f: impl FnOnce(&PlaybackModel) -> R) -> R {
        f(&self.borrow())
    }

    fn update_model<R>(&self, f: impl FnOnce(&mut PlaybackModel) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

/// Holds spawned tasks until the test drives them.
#[derive(Clone, Default)]
pub struct QueuedSpawner {
    tasks: Rc<RefCell<Vec<LocalBoxFuture<'static, ()>>>>,
}

impl QueuedSpawner {
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub async fn run_all(&self) {
        loop {
            let batch: Vec<_> = self.tasks.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            futures_util::future::join_all(batch).await;
        }
    }
}

impl Spawner for QueuedSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.tasks.borrow_mut().push(task);
    }
}

pub fn playing(uri: &str, artist: &str, title: &str) -> PlayerStatus {
    PlayerStatus {
        status: PlaybackState::Playing,
        artist: Some(artist.to_string()),
        title: Some(title.to_string()),
        uri: Some(uri.to_string()),
        ..PlayerStatus::default()
    }
}

pub fn stopped() -> PlayerStatus {
    PlayerStatus::default()
}

pub fn art(status: ArtLoadStatus, data: Option<&str>) -> AlbumArt {
    AlbumArt {
        status,
        data: data.map(str::to_string),
    }
}
