/// Paged list envelope used by the media API
use serde::{Deserialize, Serialize};

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// Total number of items across all pages
    #[serde(default)]
    pub total: u64,
}

impl<T> ListResponse<T> {
    /// Whether more pages exist after the items already received
    pub fn has_more(&self, received: u64) -> bool {
        received < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_more_compares_against_total() {
        let page: ListResponse<u8> = ListResponse {
            items: vec![1, 2],
            total: 3,
        };
        assert!(page.has_more(2));
        assert!(!page.has_more(3));
    }
}
