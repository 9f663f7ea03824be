use crate::core::matcher::{FetchError, ReviewSource};
use crate::models::{DogProfile, Review};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub dogs: String,
    pub reviews: String,
}

/// Read-only Supabase (PostgREST) client
///
/// Fetches dog profiles and reviews for the ranking pipeline. All scoring
/// happens on already-fetched data; this client owns the only record-store
/// transport in the service.
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: SupabaseTables,
}

impl SupabaseClient {
    pub fn new(base_url: String, api_key: String, tables: SupabaseTables) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            client,
            tables,
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    async fn fetch_rows(&self, url: &str) -> Result<Vec<Value>, SupabaseError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SupabaseError::ApiError(format!(
                "Request to {} failed: {}",
                url,
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        json.as_array()
            .cloned()
            .ok_or_else(|| SupabaseError::InvalidResponse("Expected a JSON array".into()))
    }

    /// Fetch a single dog profile by ID
    pub async fn get_dog(&self, dog_id: &str) -> Result<DogProfile, SupabaseError> {
        let url = format!(
            "{}?id=eq.{}&select=*&limit=1",
            self.table_url(&self.tables.dogs),
            urlencoding::encode(dog_id)
        );

        tracing::debug!("Fetching dog profile: {}", dog_id);

        let rows = self.fetch_rows(&url).await?;
        let row = rows
            .first()
            .ok_or_else(|| SupabaseError::NotFound(format!("Dog not found: {}", dog_id)))?;

        serde_json::from_value(row.clone())
            .map_err(|e| SupabaseError::InvalidResponse(format!("Failed to parse dog: {}", e)))
    }

    /// Fetch every dog profile
    pub async fn list_dogs(&self) -> Result<Vec<DogProfile>, SupabaseError> {
        let url = format!("{}?select=*", self.table_url(&self.tables.dogs));
        let rows = self.fetch_rows(&url).await?;

        // Tolerate the odd malformed row rather than failing the listing
        let dogs: Vec<DogProfile> = rows
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect();

        tracing::debug!("Listed {} dogs ({} rows)", dogs.len(), rows.len());

        Ok(dogs)
    }

    /// Fetch every dog profile in one state
    pub async fn list_dogs_by_state(&self, state: &str) -> Result<Vec<DogProfile>, SupabaseError> {
        let url = format!(
            "{}?state=eq.{}&select=*",
            self.table_url(&self.tables.dogs),
            urlencoding::encode(state)
        );
        let rows = self.fetch_rows(&url).await?;

        let dogs: Vec<DogProfile> = rows
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect();

        tracing::debug!("Listed {} dogs in {}", dogs.len(), state);

        Ok(dogs)
    }

    /// Fetch all reviews written for one dog
    pub async fn reviews_for_dog(&self, dog_id: &str) -> Result<Vec<Review>, SupabaseError> {
        let url = format!(
            "{}?dog_id=eq.{}&select=*",
            self.table_url(&self.tables.reviews),
            urlencoding::encode(dog_id)
        );
        let rows = self.fetch_rows(&url).await?;

        let reviews: Vec<Review> = rows
            .iter()
            .filter_map(|row| serde_json::from_value(row.clone()).ok())
            .collect();

        tracing::debug!("Fetched {} reviews for dog {}", reviews.len(), dog_id);

        Ok(reviews)
    }
}

#[async_trait]
impl ReviewSource for SupabaseClient {
    async fn reviews_for(&self, dog_id: &str) -> Result<Vec<Review>, FetchError> {
        self.reviews_for_dog(dog_id)
            .await
            .map_err(|e| FetchError::Lookup(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> SupabaseClient {
        SupabaseClient::new(
            "https://project.supabase.co/".to_string(),
            "test_key".to_string(),
            SupabaseTables {
                dogs: "dogs".to_string(),
                reviews: "reviews".to_string(),
            },
        )
    }

    #[test]
    fn test_client_creation() {
        let client = test_client();
        assert_eq!(client.base_url, "https://project.supabase.co/");
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_table_url_strips_trailing_slash() {
        let client = test_client();
        assert_eq!(
            client.table_url("dogs"),
            "https://project.supabase.co/rest/v1/dogs"
        );
    }
}
