//! artbox
//!
//! Client-side collection state for a text-to-image gallery. The heart of
//! the crate is [`collection::ImageCollection`], which keeps a user's image
//! list consistent across three storage tiers consulted in fixed order:
//! the remote row store (Supabase/PostgREST), a process-lifetime in-memory
//! fallback cache, and static demo content as last-resort filler.

pub mod collection;
pub mod config;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod model;
pub mod notify;
pub mod session;
pub mod store;

use std::sync::Arc;

use reqwest::Client;

use crate::collection::ImageCollection;
use crate::config::ClientOptions;
use crate::error::{Error, Result};
use crate::generate::GenerationClient;
use crate::notify::{LogNotifier, Notifier};
use crate::store::{FallbackCache, RemoteStore};

/// The main entry point for the artbox client
pub struct Artbox {
    /// The base URL for the backing Supabase project
    pub url: String,
    /// The anonymous API key for the backing project
    pub key: String,
    /// HTTP client shared by all sub-clients
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
}

impl Artbox {
    /// Create a new client
    ///
    /// # Example
    ///
    /// ```
    /// use artbox::Artbox;
    ///
    /// let artbox = Artbox::new("https://your-project-url.supabase.co", "your-anon-key");
    /// ```
    pub fn new(url: &str, key: &str) -> Self {
        Self::new_with_options(url, key, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use artbox::{Artbox, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_demo_fallback(false);
    /// let artbox = Artbox::new_with_options(
    ///     "https://your-project-url.supabase.co",
    ///     "your-anon-key",
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(url: &str, key: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_else(|_| Client::new());

        Self {
            url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            http_client,
            options,
        }
    }

    /// Create a client from `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    pub fn from_env() -> Result<Self> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| Error::validation("SUPABASE_URL environment variable not found"))?;
        let key = std::env::var("SUPABASE_ANON_KEY")
            .map_err(|_| Error::validation("SUPABASE_ANON_KEY environment variable not found"))?;
        Ok(Self::new(&url, &key))
    }

    /// Remote store adapter over the images table
    pub fn images(&self) -> RemoteStore {
        RemoteStore::new(
            &self.url,
            &self.key,
            &self.options.table,
            self.http_client.clone(),
        )
    }

    /// Placeholder image generation client
    pub fn generator(&self) -> GenerationClient {
        GenerationClient::new(self.options.generation_latency)
    }

    /// Build a collection manager over the given fallback cache, with
    /// notices routed to the `log` crate
    pub fn collection(&self, fallback: FallbackCache) -> Arc<ImageCollection> {
        self.collection_with(fallback, Arc::new(LogNotifier))
    }

    /// Build a collection manager with a custom notification sink
    pub fn collection_with(
        &self,
        fallback: FallbackCache,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<ImageCollection> {
        ImageCollection::new(
            self.images(),
            fallback,
            self.generator(),
            notifier,
            self.options.demo_fallback,
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::collection::{ImageCollection, Phase, Snapshot};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::model::{ImageRecord, Origin, SortOrder};
    pub use crate::session::CurrentUser;
    pub use crate::store::FallbackCache;
    pub use crate::Artbox;
}
