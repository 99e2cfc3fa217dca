use reqwest::{Client, Url};
use tracing::debug;

use crate::{credential::Credential, error::FetchError, remote::SheetsClient};

pub const HEADER_SENTINEL: &str = "HolderAddress";

pub type RawRow = Vec<String>;

/// Where the entries live and how to recognise their header.
pub struct SheetSource {
    pub spreadsheet_id: String,
    pub range: String,
    pub header_sentinel: String,
    pub api_base: Url,
    pub credential: Credential,
}

pub struct EntryFetcher {
    client: SheetsClient,
    spreadsheet_id: String,
    range: String,
    header_sentinel: String,
}

impl EntryFetcher {
    pub fn new(source: SheetSource) -> Self {
        Self {
            client: SheetsClient::new(Client::new(), source.api_base, source.credential),
            spreadsheet_id: source.spreadsheet_id,
            range: source.range,
            header_sentinel: source.header_sentinel,
        }
    }

    pub fn range(&self) -> &str {
        &self.range
    }

    /// One read of the configured range, header row removed.
    pub async fn fetch_entries(&self) -> Result<Vec<RawRow>, FetchError> {
        let rows = self
            .client
            .values_get(&self.spreadsheet_id, &self.range)
            .await?;

        let fetched = rows.len();
        let rows = strip_header(rows, &self.header_sentinel);

        debug!(
            range = %self.range,
            fetched,
            header_stripped = fetched != rows.len(),
            "Fetched entries"
        );

        Ok(rows)
    }
}

pub fn strip_header(mut rows: Vec<RawRow>, sentinel: &str) -> Vec<RawRow> {
    let is_header = rows
        .first()
        .and_then(|row| row.first())
        .is_some_and(|cell| cell == sentinel);

    if is_header {
        rows.remove(0);
    }

    rows
}
