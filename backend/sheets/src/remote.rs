use chrono::Utc;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    credential::{Credential, READONLY_SCOPE},
    error::FetchError,
};

pub const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4/";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Body of `spreadsheets.values.get`. Google leaves `values` out entirely
/// when the range is empty.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: String,
    #[serde(default)]
    pub values: Option<Vec<Vec<String>>>,
}

/// Read-only view of the Sheets values API.
pub struct SheetsClient {
    http: Client,
    api_base: Url,
    credential: Credential,
}

impl SheetsClient {
    pub fn new(http: Client, api_base: Url, credential: Credential) -> Self {
        Self {
            http,
            api_base,
            credential,
        }
    }

    pub async fn access_token(&self) -> Result<String, FetchError> {
        let assertion = self.credential.assertion(READONLY_SCOPE, Utc::now())?;

        let response = self
            .http
            .post(self.credential.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(FetchError::AuthFailure(format!(
                "token endpoint returned {status}: {}",
                body.trim()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FetchError::AuthFailure(e.to_string()))?;

        Ok(token.access_token)
    }

    pub async fn values_get(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, FetchError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(self.values_url(spreadsheet_id, range))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(FetchError::unexpected_status("values.get", status, &body));
        }

        let value_range: ValueRange = response.json().await?;

        Ok(value_range.values.unwrap_or_default())
    }

    pub fn values_url(&self, spreadsheet_id: &str, range: &str) -> Url {
        let mut url = self.api_base.clone();

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["spreadsheets", spreadsheet_id, "values", range]);
        }

        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::tests::{service_account_json, test_key};

    fn client(base: &str) -> SheetsClient {
        let credential = Credential::from_json(&service_account_json(&test_key(), None)).unwrap();

        SheetsClient::new(Client::new(), Url::parse(base).unwrap(), credential)
    }

    #[test]
    fn test_values_url() {
        let client = client(DEFAULT_API_BASE);

        assert_eq!(
            client.values_url("sheet-1", "Entries").as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-1/values/Entries"
        );
        assert_eq!(
            client.values_url("sheet-1", "Entries!A2:C100").as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-1/values/Entries!A2:C100"
        );
    }

    #[test]
    fn test_values_url_escapes_spaces() {
        let client = client("http://127.0.0.1:9000/v4");

        assert_eq!(
            client.values_url("abc", "Sheet 1").as_str(),
            "http://127.0.0.1:9000/v4/spreadsheets/abc/values/Sheet%201"
        );
    }

    #[test]
    fn test_missing_values_is_empty() {
        let body: ValueRange =
            serde_json::from_str(r#"{"range":"Entries!A1:Z1000","majorDimension":"ROWS"}"#)
                .unwrap();

        assert_eq!(body.range, "Entries!A1:Z1000");
        assert!(body.values.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_token_endpoint_is_transport_failure() {
        let key = test_key();
        let credential =
            Credential::from_json(&service_account_json(&key, Some("http://127.0.0.1:1/token")))
                .unwrap();
        let client = SheetsClient::new(
            Client::new(),
            Url::parse(DEFAULT_API_BASE).unwrap(),
            credential,
        );

        let error = client.values_get("sheet", "Entries").await.unwrap_err();
        assert_eq!(error.kind(), "transport");
    }
}
