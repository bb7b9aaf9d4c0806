//! Placeholder image generation.
//!
//! Stands in for a real text-to-image backend: it synthesizes a
//! deterministic placeholder URL from the prompt and simulates bounded
//! request latency so loading states stay honest. Swapping in a real
//! generative API means replacing this module only; the collection manager
//! consumes nothing but the returned URL.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use url::Url;

use crate::error::{Error, Result};

const IMAGE_SIZE: u32 = 1024;
const MAX_SLUG_LEN: usize = 48;

/// Source of "now", injectable so tests can pin the generated URL
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// A freshly generated image, not yet persisted anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
    pub prompt: String,
    pub seed: String,
}

/// Client for turning a text prompt into an image URL
#[derive(Clone)]
pub struct GenerationClient {
    latency: Duration,
    clock: Clock,
}

impl GenerationClient {
    /// Create a client with the given simulated latency
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to derive the URL seed
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Generate an image URL for a prompt.
    ///
    /// The caller is responsible for rejecting empty prompts before this
    /// point. Given the same prompt and clock output, the returned URL is
    /// identical.
    pub async fn generate(&self, prompt: &str) -> Result<GeneratedImage> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let now = (self.clock)();
        let seed = format!("{}-{}", slug(prompt), now.timestamp());
        let url = format!(
            "https://picsum.photos/seed/{}/{}/{}",
            seed, IMAGE_SIZE, IMAGE_SIZE
        );

        // A malformed URL here means the prompt produced something the
        // placeholder service cannot address; surface it, fabricate nothing.
        Url::parse(&url).map_err(|e| Error::generation(format!("bad image url: {}", e)))?;

        log::debug!("generated image for prompt {:?} -> {}", prompt, url);

        Ok(GeneratedImage {
            url,
            prompt: prompt.to_string(),
            seed,
        })
    }
}

/// Reduce a prompt to a stable url-safe seed fragment
fn slug(prompt: &str) -> String {
    let mut out = String::with_capacity(prompt.len());
    let mut last_dash = true;
    for c in prompt.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
        if out.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("img");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_clock() -> Clock {
        Arc::new(|| Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn slug_is_stable_and_url_safe() {
        assert_eq!(slug("a red bicycle"), "a-red-bicycle");
        assert_eq!(slug("  Weird!!  Prompt?? "), "weird-prompt");
        assert_eq!(slug("???"), "img");
    }

    #[tokio::test]
    async fn same_prompt_same_clock_same_url() {
        let client = GenerationClient::new(Duration::ZERO).with_clock(fixed_clock());
        let a = client.generate("a red bicycle").await.unwrap();
        let b = client.generate("a red bicycle").await.unwrap();
        assert_eq!(a.url, b.url);
        assert!(a.url.contains("a-red-bicycle"));
        assert!(a.url.starts_with("https://picsum.photos/seed/"));
    }

    #[tokio::test]
    async fn latency_is_bounded() {
        let client = GenerationClient::new(Duration::from_millis(10)).with_clock(fixed_clock());
        let start = std::time::Instant::now();
        client.generate("quick").await.unwrap();
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
