pub mod error;
pub mod query;

pub use error::{Result, SupabaseError};
pub use query::Query;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Client for one Supabase project.
///
/// Every call takes an optional bearer token. Passing the caller's access
/// token lets row-level security see the real actor; `None` falls back to
/// the project key the client was built with.
#[derive(Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize(&self, req: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(bearer.unwrap_or(&self.api_key))
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `GET /rest/v1/{table}`
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
        bearer: Option<&str>,
    ) -> Result<Vec<T>> {
        let req = self
            .client
            .get(self.table_url(table))
            .query(query.params());
        let resp = self.authorize(req, bearer).send().await?;
        let rows: Vec<T> = Self::read_json(resp).await?;
        tracing::debug!(table, rows = rows.len(), "Supabase select");
        Ok(rows)
    }

    /// `POST /rest/v1/{table}` returning the inserted rows.
    pub async fn insert<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
        query: &Query,
        bearer: Option<&str>,
    ) -> Result<Vec<T>> {
        let req = self
            .client
            .post(self.table_url(table))
            .query(query.params())
            .header("Prefer", "return=representation")
            .json(body);
        let resp = self.authorize(req, bearer).send().await?;
        Self::read_json(resp).await
    }

    /// `PATCH /rest/v1/{table}?{filters}` returning the updated rows.
    ///
    /// Rows hidden by row-level security are silently skipped by PostgREST,
    /// so an empty result means nothing matched for this actor.
    pub async fn update<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &Query,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<Vec<T>> {
        let req = self
            .client
            .patch(self.table_url(table))
            .query(filters.params())
            .header("Prefer", "return=representation")
            .json(body);
        let resp = self.authorize(req, bearer).send().await?;
        Self::read_json(resp).await
    }

    /// `DELETE /rest/v1/{table}?{filters}`. Returns the number of rows removed.
    pub async fn delete(&self, table: &str, filters: &Query, bearer: Option<&str>) -> Result<usize> {
        let req = self
            .client
            .delete(self.table_url(table))
            .query(filters.params())
            .header("Prefer", "return=representation");
        let resp = self.authorize(req, bearer).send().await?;
        let rows: Vec<serde_json::Value> = Self::read_json(resp).await?;
        Ok(rows.len())
    }

    /// Upload an object to storage and return its public URL.
    pub async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        bearer: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path);
        let size = bytes.len();
        let req = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        let resp = self.authorize(req, bearer).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        tracing::info!(bucket, path, size, "Uploaded storage object");
        Ok(self.public_url(bucket, path))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let client = SupabaseClient::new("https://demo.supabase.co/", "key");
        assert_eq!(client.base_url(), "https://demo.supabase.co");
        assert_eq!(
            client.table_url("sightings"),
            "https://demo.supabase.co/rest/v1/sightings"
        );
    }

    #[test]
    fn public_url_points_at_public_bucket() {
        let client = SupabaseClient::new("https://demo.supabase.co", "key");
        assert_eq!(
            client.public_url("sighting-photos", "u1/abc.jpg"),
            "https://demo.supabase.co/storage/v1/object/public/sighting-photos/u1/abc.jpg"
        );
    }
}
