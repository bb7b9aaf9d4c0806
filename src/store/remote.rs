//! Remote row-store tier, spoken over the PostgREST API.
//!
//! Holds no state of its own; every call is scoped to an owner id at this
//! boundary so cross-account reads and deletes are impossible regardless of
//! what the UI asks for.

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fetch::Fetch;
use crate::model::{ImageRecord, Origin};

/// Reference DDL for provisioning the backing table, including the
/// row-level-security policies that enforce ownership server-side.
/// Run as a migration when setting the project up; the client only needs
/// the table to exist.
pub const IMAGES_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS images (
  id UUID PRIMARY KEY DEFAULT uuid_generate_v4(),
  user_id UUID NOT NULL REFERENCES auth.users(id) ON DELETE CASCADE,
  url TEXT NOT NULL,
  prompt TEXT NOT NULL,
  created_at TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);

ALTER TABLE images ENABLE ROW LEVEL SECURITY;

CREATE POLICY "Allow users to select their own images"
  ON images FOR SELECT USING (auth.uid() = user_id);

CREATE POLICY "Allow users to insert their own images"
  ON images FOR INSERT WITH CHECK (auth.uid() = user_id);

CREATE POLICY "Allow users to delete their own images"
  ON images FOR DELETE USING (auth.uid() = user_id);
"#;

/// PostgREST error codes that mean the table itself is absent
const MISSING_RELATION_CODES: [&str; 2] = ["42P01", "PGRST205"];

/// Wire representation of one row in the images table
#[derive(Debug, Clone, Deserialize)]
struct ImageRow {
    id: String,
    user_id: String,
    url: String,
    prompt: String,
    created_at: DateTime<Utc>,
}

impl From<ImageRow> for ImageRecord {
    fn from(row: ImageRow) -> Self {
        ImageRecord {
            id: row.id,
            url: row.url,
            prompt: row.prompt,
            owner_id: row.user_id,
            created_at: row.created_at,
            origin: Origin::Remote,
        }
    }
}

/// Insert payload; id and created_at are server-assigned
#[derive(Debug, Serialize)]
struct NewImageRow<'a> {
    user_id: &'a str,
    url: &'a str,
    prompt: &'a str,
}

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

/// Client for the remote images table
#[derive(Clone)]
pub struct RemoteStore {
    url: String,
    key: String,
    table: String,
    client: Client,
}

impl RemoteStore {
    /// Create a new RemoteStore
    pub(crate) fn new(url: &str, key: &str, table: &str, client: Client) -> Self {
        Self {
            url: url.to_string(),
            key: key.to_string(),
            table: table.to_string(),
            client,
        }
    }

    /// Get the base URL for REST API requests
    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    /// Insert one row for the owner; returns the server's representation
    pub async fn create(&self, owner_id: &str, url: &str, prompt: &str) -> Result<ImageRecord> {
        let payload = NewImageRow {
            user_id: owner_id,
            url,
            prompt,
        };

        let response = Fetch::post(&self.client, &self.rest_url())
            .api_key(&self.key)
            .prefer("return=representation")
            .json(&payload)?
            .execute_raw()
            .await?;

        let rows: Vec<ImageRow> = Self::parse(response).await?;
        rows.into_iter()
            .next()
            .map(ImageRecord::from)
            .ok_or_else(|| Error::remote_unavailable("insert returned no representation"))
    }

    /// All rows for the owner, newest first
    pub async fn list(&self, owner_id: &str) -> Result<Vec<ImageRecord>> {
        let response = Fetch::get(&self.client, &self.rest_url())
            .api_key(&self.key)
            .query("select", "*")
            .query("user_id", &format!("eq.{}", owner_id))
            .query("order", "created_at.desc")
            .execute_raw()
            .await?;

        let rows: Vec<ImageRow> = Self::parse(response).await?;
        Ok(rows.into_iter().map(ImageRecord::from).collect())
    }

    /// Delete the row matching both id and owner.
    ///
    /// Returns whether a row was actually removed; an owner mismatch looks
    /// identical to a missing id (nothing deleted, no error).
    pub async fn delete(&self, id: &str, owner_id: &str) -> Result<bool> {
        let response = Fetch::delete(&self.client, &self.rest_url())
            .api_key(&self.key)
            .prefer("return=representation")
            .query("id", &format!("eq.{}", id))
            .query("user_id", &format!("eq.{}", owner_id))
            .execute_raw()
            .await?;

        let rows: Vec<ImageRow> = Self::parse(response).await?;
        Ok(!rows.is_empty())
    }

    /// Parse a successful response as rows, or classify the failure
    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        Err(Self::classify(status, &text))
    }

    /// Map a non-success status to the error taxonomy.
    ///
    /// A missing relation (first-run, table not provisioned) must be
    /// distinguishable from a service outage; both divert to the fallback
    /// tier but they are logged apart.
    fn classify(status: StatusCode, body: &str) -> Error {
        let parsed: Option<PostgrestErrorBody> = serde_json::from_str(body).ok();
        let code = parsed.as_ref().and_then(|b| b.code.clone());
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .unwrap_or_else(|| body.to_string());

        let missing_relation = code
            .as_deref()
            .map(|c| MISSING_RELATION_CODES.contains(&c))
            .unwrap_or(false);

        if missing_relation || status == StatusCode::NOT_FOUND {
            log::warn!("images table not provisioned: {}", message);
            Error::schema_missing(code, message)
        } else {
            log::error!("remote store error {}: {}", status, message);
            Error::remote_unavailable(format!("status {}: {}", status, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_relation_code_classifies_as_schema_missing() {
        let body = r#"{"code":"42P01","message":"relation \"public.images\" does not exist"}"#;
        let err = RemoteStore::classify(StatusCode::BAD_REQUEST, body);
        assert!(matches!(err, Error::SchemaMissing { .. }));
    }

    #[test]
    fn plain_404_classifies_as_schema_missing() {
        let err = RemoteStore::classify(StatusCode::NOT_FOUND, "");
        assert!(matches!(err, Error::SchemaMissing { .. }));
    }

    #[test]
    fn server_error_classifies_as_unavailable() {
        let err = RemoteStore::classify(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert!(matches!(err, Error::RemoteUnavailable(_)));
        assert!(err.triggers_fallback());
    }
}
