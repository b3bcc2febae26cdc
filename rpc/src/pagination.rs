//! Offset pagination for the report listing.

use serde::Deserialize;

/// Query parameters accepted by `GET /api/reports`.
///
/// `limit` is clamped by the assessor; `offset` counts back from the newest report.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl PaginationParams {
    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}
