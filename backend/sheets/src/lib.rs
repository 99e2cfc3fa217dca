//! # Sheets
//!
//! Read-only access to the spreadsheet holding sweepstakes entries.
//!
//! ## Flow
//! - Sign a JWT assertion with the service account key (RS256)
//! - Trade it at the token endpoint for a bearer token, scoped to `spreadsheets.readonly`
//! - `GET spreadsheets/{id}/values/{range}` once
//! - Drop the first row if its first cell is the header sentinel (`HolderAddress`)
//! - Hand every other row back untouched
//!
//! No retries, no pagination, no token caching. A fetch either returns rows or
//! one [`FetchError`].
pub mod credential;
pub mod error;
pub mod fetcher;
pub mod remote;

pub use credential::Credential;
pub use error::{CredentialError, FetchError};
pub use fetcher::{EntryFetcher, HEADER_SENTINEL, RawRow, SheetSource, strip_header};
pub use remote::{DEFAULT_API_BASE, SheetsClient};
