use serde::Serialize;
use thiserror::Error;

pub const WALLET_FIELD: usize = 0;
pub const TOKEN_FIELD: usize = 1;
pub const QUANTITY_FIELD: usize = 2;

/// One row of the entries sheet: who entered, with which token, how many tickets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub wallet: String,
    pub token_id: String,
    pub quantity: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("expected at least 3 cells, found {0}")]
    TooShort(usize),

    #[error("wallet address is empty")]
    EmptyWallet,

    #[error("quantity {0:?} is not a whole number")]
    InvalidQuantity(String),
}

impl TryFrom<&[String]> for EntryRow {
    type Error = RowError;

    fn try_from(cells: &[String]) -> Result<Self, Self::Error> {
        if cells.len() <= QUANTITY_FIELD {
            return Err(RowError::TooShort(cells.len()));
        }

        let wallet = cells[WALLET_FIELD].trim();
        if wallet.is_empty() {
            return Err(RowError::EmptyWallet);
        }

        let raw_quantity = &cells[QUANTITY_FIELD];
        let quantity = raw_quantity
            .trim()
            .parse::<u64>()
            .map_err(|_| RowError::InvalidQuantity(raw_quantity.clone()))?;

        Ok(Self {
            wallet: wallet.to_string(),
            token_id: cells[TOKEN_FIELD].clone(),
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRow {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedRows {
    pub rows: Vec<EntryRow>,
    pub rejected: Vec<RejectedRow>,
}

/// Validates every raw row. Bad rows are set aside with their position
/// instead of leaking garbage into the totals.
pub fn parse_rows<R: AsRef<[String]>>(raw: &[R]) -> ParsedRows {
    let mut parsed = ParsedRows::default();

    for (index, cells) in raw.iter().enumerate() {
        match EntryRow::try_from(cells.as_ref()) {
            Ok(row) => parsed.rows.push(row),
            Err(e) => parsed.rejected.push(RejectedRow {
                index,
                reason: e.to_string(),
            }),
        }
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn test_valid_row() {
        let row = EntryRow::try_from(cells(&["0xAB12", "tok1", " 42 "]).as_slice()).unwrap();

        assert_eq!(row.wallet, "0xAB12");
        assert_eq!(row.token_id, "tok1");
        assert_eq!(row.quantity, 42);
    }

    #[test]
    fn test_extra_cells_ignored() {
        let row = EntryRow::try_from(cells(&["0xAB", "t", "1", "note"]).as_slice()).unwrap();
        assert_eq!(row.quantity, 1);
    }

    #[test]
    fn test_rejections() {
        assert_eq!(
            EntryRow::try_from(cells(&["0xAB", "t"]).as_slice()),
            Err(RowError::TooShort(2))
        );
        assert_eq!(
            EntryRow::try_from(cells(&["  ", "t", "1"]).as_slice()),
            Err(RowError::EmptyWallet)
        );
        assert_eq!(
            EntryRow::try_from(cells(&["0xAB", "t", "five"]).as_slice()),
            Err(RowError::InvalidQuantity("five".to_string()))
        );
        assert_eq!(
            EntryRow::try_from(cells(&["0xAB", "t", "-3"]).as_slice()),
            Err(RowError::InvalidQuantity("-3".to_string()))
        );
        assert_eq!(
            EntryRow::try_from(cells(&["0xAB", "t", "1.5"]).as_slice()),
            Err(RowError::InvalidQuantity("1.5".to_string()))
        );
    }

    #[test]
    fn test_parse_rows_keeps_indices() {
        let raw = vec![
            cells(&["0xAB", "t", "1"]),
            cells(&["0xCD", "t", "x"]),
            cells(&["0xEF"]),
            cells(&["0x12", "t", "7"]),
        ];

        let parsed = parse_rows(&raw);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].wallet, "0x12");
        assert_eq!(
            parsed.rejected.iter().map(|r| r.index).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }
}
