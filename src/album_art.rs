//! Album art fetching.
//!
//! The player encodes art lazily, so `/api/image` may answer `not-loaded` for a
//! while after a track change. Each answer of that kind schedules exactly one
//! new request after a fixed delay.

use crate::api::PlayerApi;
use crate::playback::ModelHandle;
use dioxus::logger::tracing::{debug, warn};
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
async fn art_retry_delay_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(target_arch = "wasm32")]
async fn art_retry_delay_ms(ms: u64) {
    gloo_timers::future::TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await;
}

pub struct AlbumArtClient<A, M> {
    api: Rc<A>,
    model: M,
    retry_delay_ms: u64,
}

impl<A, M: Clone> Clone for AlbumArtClient<A, M> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            model: self.model.clone(),
            retry_delay_ms: self.retry_delay_ms,
        }
    }
}

impl<A: PlayerApi, M: ModelHandle> AlbumArtClient<A, M> {
    pub fn new(api: Rc<A>, model: M, retry_delay_ms: u64) -> Self {
        Self {
            api,
            model,
            retry_delay_ms,
        }
    }

    /// Fetches the art for `generation` until the player reports it loaded,
    /// the request fails, or a newer track supersedes it. Returns the number
    /// of requests issued.
    pub async fn fetch(&self, generation: u64) -> usize {
        let mut requests = 0;
        loop {
            if !self
                .model
                .peek_model(|model| model.is_current_generation(generation))
            {
                debug!(generation, "album art superseded before request");
                return requests;
            }

            requests += 1;
            let art = match self.api.image().await {
                Ok(art) => art,
                Err(err) => {
                    warn!(generation, "album art request failed: {err}");
                    return requests;
                }
            };

            let pending = !art.is_loaded();
            if !self
                .model
                .update_model(|model| model.apply_art(generation, art))
            {
                debug!(generation, "dropping album art for a previous track");
                return requests;
            }
            if !pending {
                return requests;
            }

            art_retry_delay_ms(self.retry_delay_ms).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ArtLoadStatus;
    use crate::playback::PlaybackModel;
    use crate::testing::{art, playing, Call, ScriptedApi, SharedModel};
    use std::cell::RefCell;

    fn setup(uri: &str) -> (Rc<ScriptedApi>, SharedModel, u64) {
        let api = Rc::new(ScriptedApi::default());
        let model = Rc::new(RefCell::new(PlaybackModel::default()));
        model
            .borrow_mut()
            .apply_status(playing(uri, "Air", "Talisman"));
        let generation = model.borrow().art_generation;
        (api, model, generation)
    }

    #[tokio::test]
    async fn loaded_art_stops_after_one_request() {
        let (api, model, generation) = setup("spotify:track:a");
        api.push_image(Ok(art(ArtLoadStatus::Loaded, Some("AAAA"))));

        let client = AlbumArtClient::new(api.clone(), model.clone(), 0);
        let requests = client.fetch(generation).await;

        assert_eq!(requests, 1);
        assert_eq!(api.count(&Call::Image), 1);
        assert_eq!(model.borrow().img.as_deref(), Some("AAAA"));
    }

    #[tokio::test]
    async fn each_not_loaded_answer_schedules_one_retry() {
        let (api, model, generation) = setup("spotify:track:a");
        api.push_image(Ok(art(ArtLoadStatus::NotLoaded, None)))
            .push_image(Ok(art(ArtLoadStatus::NotLoaded, None)))
            .push_image(Ok(art(ArtLoadStatus::Loaded, Some("AAAA"))));

        let client = AlbumArtClient::new(api.clone(), model.clone(), 0);
        let requests = client.fetch(generation).await;

        assert_eq!(requests, 3);
        assert_eq!(api.count(&Call::Image), 3);
        assert_eq!(model.borrow().img.as_deref(), Some("AAAA"));
    }

    #[tokio::test]
    async fn request_failure_ends_the_chain() {
        let (api, model, generation) = setup("spotify:track:a");
        api.push_image(Err(500));

        let client = AlbumArtClient::new(api.clone(), model.clone(), 0);

        assert_eq!(client.fetch(generation).await, 1);
        assert_eq!(model.borrow().img, None);
    }

    #[tokio::test]
    async fn superseded_generation_never_requests() {
        let (api, model, generation) = setup("spotify:track:a");
        model
            .borrow_mut()
            .apply_status(playing("spotify:track:b", "Air", "Sexy Boy"));

        let client = AlbumArtClient::new(api.clone(), model.clone(), 0);

        assert_eq!(client.fetch(generation).await, 0);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn stale_answer_does_not_overwrite_current_art() {
        let (api, model, stale) = setup("spotify:track:a");
        api.push_image(Ok(art(ArtLoadStatus::Loaded, Some("AAAA"))));
        let client = AlbumArtClient::new(api.clone(), model.clone(), 0);

        // The track changes while the request is in flight.
        let (requests, ()) = futures_util::join!(client.fetch(stale), async {
            model
                .borrow_mut()
                .apply_status(playing("spotify:track:b", "Air", "Sexy Boy"));
        });

        assert_eq!(requests, 1);
        assert_eq!(model.borrow().img, None);
        assert_eq!(model.borrow().art, None);
    }
}
