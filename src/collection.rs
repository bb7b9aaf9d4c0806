//! The image collection manager.
//!
//! Holds the current user's image list and coordinates the three storage
//! tiers: the remote row store is always tried first, the in-memory
//! fallback cache absorbs what the remote cannot take, and static demo
//! content papers over total failure. Observers (the UI) watch immutable
//! snapshots through a `tokio::sync::watch` channel.
//!
//! Update discipline is deliberately asymmetric and part of the contract:
//! a save prepends to the list as soon as the owning tier reports success,
//! while a delete touches the list only after the owning tier confirms the
//! removal.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::generate::{GeneratedImage, GenerationClient};
use crate::model::{sort_by_created, ImageRecord, Origin, SortOrder};
use crate::notify::{Notice, Notifier};
use crate::session::CurrentUser;
use crate::store::{demo_records, FallbackCache, RemoteStore};

/// Lifecycle of the collection list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch has run yet
    Uninitialized,
    /// A fetch is in flight
    Loading,
    /// The list holds at least one record
    Populated,
    /// The list is confirmed empty (or there is no user)
    Empty,
    /// Every tier failed and demo substitution is disabled
    Errored,
}

/// Immutable view of the collection published to observers
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub phase: Phase,
    pub images: Vec<ImageRecord>,
    /// A save or delete is in flight; the list is still the last good one
    pub mutating: bool,
    /// Last surfaced error, kept for observability; never blocks rendering
    pub last_error: Option<String>,
    /// The most recent generation, independent of persistence outcome
    pub latest_generation: Option<GeneratedImage>,
}

impl Snapshot {
    fn initial() -> Self {
        Self {
            phase: Phase::Uninitialized,
            images: Vec::new(),
            mutating: false,
            last_error: None,
            latest_generation: None,
        }
    }
}

/// Aggregate numbers over the current list
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionStats {
    pub total: usize,
    pub most_recent: Option<ImageRecord>,
}

struct Inner {
    user: Option<CurrentUser>,
    /// Bumped on every user change and refresh; a fetch completing under a
    /// stale epoch discards its result instead of clobbering newer state
    epoch: u64,
    snapshot: Snapshot,
}

/// Stateful orchestrator over the storage tiers
pub struct ImageCollection {
    remote: RemoteStore,
    fallback: FallbackCache,
    generator: GenerationClient,
    notifier: Arc<dyn Notifier>,
    demo_fallback: bool,
    inner: Mutex<Inner>,
    tx: watch::Sender<Snapshot>,
}

impl ImageCollection {
    /// Create a manager over the given tiers.
    ///
    /// The fallback cache is injected rather than owned globally so hosts
    /// and tests control its lifetime and sharing.
    pub fn new(
        remote: RemoteStore,
        fallback: FallbackCache,
        generator: GenerationClient,
        notifier: Arc<dyn Notifier>,
        demo_fallback: bool,
    ) -> Arc<Self> {
        let (tx, _rx) = watch::channel(Snapshot::initial());
        Arc::new(Self {
            remote,
            fallback,
            generator,
            notifier,
            demo_fallback,
            inner: Mutex::new(Inner {
                user: None,
                epoch: 0,
                snapshot: Snapshot::initial(),
            }),
            tx,
        })
    }

    /// Watch state transitions; the receiver always holds the latest snapshot
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Current snapshot without subscribing
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().unwrap().snapshot.clone()
    }

    /// The current list in the requested date order
    pub fn images(&self, order: SortOrder) -> Vec<ImageRecord> {
        let mut images = self.snapshot().images;
        sort_by_created(&mut images, order);
        images
    }

    /// Aggregate numbers over the current list
    pub fn stats(&self) -> CollectionStats {
        let images = self.images(SortOrder::Recent);
        CollectionStats {
            total: images.len(),
            most_recent: images.first().cloned(),
        }
    }

    /// Switch the active user (or sign out with `None`) and refetch.
    ///
    /// Any fetch still in flight for the previous identity is invalidated.
    pub async fn set_user(&self, user: Option<CurrentUser>) {
        let epoch = {
            let mut inner = self.inner.lock().unwrap();
            inner.epoch += 1;
            inner.user = user;
            inner.snapshot.latest_generation = None;
            inner.epoch
        };
        self.fetch(epoch).await;
    }

    /// Re-run the fetch pipeline for the current user; the manual recovery
    /// affordance, and the only one
    pub async fn refresh(&self) {
        let epoch = {
            let mut inner = self.inner.lock().unwrap();
            inner.epoch += 1;
            inner.epoch
        };
        self.fetch(epoch).await;
    }

    /// Forward identity changes from a session channel into `set_user`
    pub fn attach_session(
        self: &Arc<Self>,
        mut sessions: watch::Receiver<Option<CurrentUser>>,
    ) -> tokio::task::JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                let user = sessions.borrow_and_update().clone();
                this.set_user(user).await;
                if sessions.changed().await.is_err() {
                    break;
                }
            }
        })
    }

    /// Generate an image for a prompt and park it in the un-persisted
    /// `latest_generation` slot.
    ///
    /// Empty and whitespace-only prompts are rejected here, synchronously,
    /// before any generation work starts. The result is not saved; that is
    /// a separate, explicit step.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            self.notifier
                .notify(Notice::error(
                    "Empty prompt",
                    "Please enter a description to generate an image",
                ))
                .await;
            return Err(Error::validation("prompt must not be empty"));
        }

        match self.generator.generate(trimmed).await {
            Ok(generated) => {
                {
                    let mut inner = self.inner.lock().unwrap();
                    inner.snapshot.latest_generation = Some(generated.clone());
                    self.tx.send_replace(inner.snapshot.clone());
                }
                self.notifier
                    .notify(Notice::info("Image generated!", "Your image is ready"))
                    .await;
                Ok(generated)
            }
            Err(err) => {
                self.record_error(&err);
                self.notifier
                    .notify(Notice::error("Error", "Failed to generate the image"))
                    .await;
                Err(err)
            }
        }
    }

    /// Persist a generated image for the current user.
    ///
    /// Tries the remote tier first; a remote outage or missing schema
    /// diverts the write to the fallback cache instead of failing. On
    /// success from either tier the record is prepended to the list.
    pub async fn save(&self, url: &str, prompt: &str) -> Result<ImageRecord> {
        let user = self
            .current_user()
            .ok_or_else(|| Error::validation("no authenticated user"))?;

        self.set_mutating(true);
        let result = self.save_for(&user, url, prompt).await;
        self.set_mutating(false);
        result
    }

    async fn save_for(&self, user: &CurrentUser, url: &str, prompt: &str) -> Result<ImageRecord> {
        let record = match self.remote.create(&user.id, url, prompt).await {
            Ok(record) => record,
            Err(err) if err.triggers_fallback() => {
                log::warn!("remote save diverted to fallback cache: {}", err);
                self.fallback.create(&user.id, url, prompt)
            }
            Err(err) => {
                self.record_error(&err);
                self.notifier
                    .notify(Notice::error("Error", "Failed to save your image"))
                    .await;
                return Err(err);
            }
        };

        {
            let mut inner = self.inner.lock().unwrap();
            // the user may have switched while the write was in flight;
            // a record for someone else never enters the visible list
            let same_user = inner.user.as_ref().map(|u| u.id.as_str()) == Some(user.id.as_str());
            if same_user {
                inner.snapshot.images.insert(0, record.clone());
                inner.snapshot.phase = Phase::Populated;
                self.tx.send_replace(inner.snapshot.clone());
            }
        }

        let description = match record.origin {
            Origin::Fallback => "Saved for this session; the server is unreachable",
            _ => "Your creation has been saved to your collection",
        };
        self.notifier
            .notify(Notice::info("Image saved", description))
            .await;
        Ok(record)
    }

    /// Delete a record by id.
    ///
    /// Demo records report success without touching anything. Real records
    /// are removed from the list only after their owning tier confirms the
    /// deletion; an id the tier does not know (or an owner mismatch) is a
    /// silent no-op returning `false`.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let target = {
            let inner = self.inner.lock().unwrap();
            inner
                .snapshot
                .images
                .iter()
                .find(|r| r.id == id)
                .cloned()
        };
        let Some(target) = target else {
            return Ok(false);
        };

        if target.origin == Origin::Demo {
            self.notifier
                .notify(Notice::info(
                    "Image deleted",
                    "Your image has been deleted successfully",
                ))
                .await;
            return Ok(true);
        }

        let user = self
            .current_user()
            .ok_or_else(|| Error::validation("no authenticated user"))?;

        self.set_mutating(true);
        let result = match target.origin {
            Origin::Remote => self.remote.delete(id, &user.id).await,
            Origin::Fallback => Ok(self.fallback.delete(id, &user.id)),
            Origin::Demo => unreachable!("demo deletes short-circuit above"),
        };
        self.set_mutating(false);

        match result {
            Ok(true) => {
                {
                    let mut inner = self.inner.lock().unwrap();
                    inner.snapshot.images.retain(|r| r.id != id);
                    if inner.snapshot.images.is_empty() && inner.snapshot.phase == Phase::Populated
                    {
                        inner.snapshot.phase = Phase::Empty;
                    }
                    self.tx.send_replace(inner.snapshot.clone());
                }
                self.notifier
                    .notify(Notice::info(
                        "Image deleted",
                        "Your image has been deleted successfully",
                    ))
                    .await;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(err) => {
                self.record_error(&err);
                self.notifier
                    .notify(Notice::error("Error", "Failed to delete the image"))
                    .await;
                Err(err)
            }
        }
    }

    /// The fetch pipeline.
    ///
    /// Remote first. A successful empty response is a genuine empty gallery
    /// and is shown as such; demo content substitutes only when the remote
    /// tier errors and the fallback cache has nothing either.
    async fn fetch(&self, epoch: u64) {
        let user = {
            let mut inner = self.inner.lock().unwrap();
            if inner.epoch != epoch {
                return;
            }
            inner.snapshot.phase = Phase::Loading;
            inner.snapshot.last_error = None;
            self.tx.send_replace(inner.snapshot.clone());
            inner.user.clone()
        };

        let Some(user) = user else {
            self.apply(epoch, Phase::Empty, Vec::new(), None);
            return;
        };

        match self.remote.list(&user.id).await {
            Ok(records) if !records.is_empty() => {
                self.apply(epoch, Phase::Populated, records, None);
            }
            Ok(_) => {
                let cached = self.fallback.list(&user.id);
                if cached.is_empty() {
                    self.apply(epoch, Phase::Empty, Vec::new(), None);
                } else {
                    self.apply(epoch, Phase::Populated, cached, None);
                }
            }
            Err(err) => {
                log::warn!("remote list failed, falling through tiers: {}", err);
                let cached = self.fallback.list(&user.id);
                let applied = if !cached.is_empty() {
                    self.apply(epoch, Phase::Populated, cached, Some(err.to_string()))
                } else if self.demo_fallback {
                    self.apply(
                        epoch,
                        Phase::Populated,
                        demo_records(),
                        Some(err.to_string()),
                    )
                } else {
                    self.apply(epoch, Phase::Errored, Vec::new(), Some(err.to_string()))
                };

                if applied {
                    self.notifier
                        .notify(Notice::error("Error", "Failed to load your images"))
                        .await;
                }
            }
        }
    }

    /// Commit a fetch result unless a newer fetch has superseded it
    fn apply(
        &self,
        epoch: u64,
        phase: Phase,
        images: Vec<ImageRecord>,
        error: Option<String>,
    ) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.epoch != epoch {
            log::debug!("discarding stale fetch result (epoch {})", epoch);
            return false;
        }
        inner.snapshot.phase = phase;
        inner.snapshot.images = images;
        inner.snapshot.last_error = error;
        self.tx.send_replace(inner.snapshot.clone());
        true
    }

    fn current_user(&self) -> Option<CurrentUser> {
        self.inner.lock().unwrap().user.clone()
    }

    fn set_mutating(&self, value: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot.mutating = value;
        self.tx.send_replace(inner.snapshot.clone());
    }

    fn record_error(&self, err: &Error) {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot.last_error = Some(err.to_string());
        self.tx.send_replace(inner.snapshot.clone());
    }
}
