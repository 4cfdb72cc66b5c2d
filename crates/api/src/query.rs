//! Query parameter types shared by list handlers.

use figtree_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use figtree_core::types::DbId;
use serde::Deserialize;

/// `?limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        clamp_limit(self.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        clamp_offset(self.offset)
    }
}

/// `?tree_id=&limit=&offset=` for collections that belong to trees.
///
/// Fields are spelled out rather than flattened: query strings carry every
/// value as text, which `#[serde(flatten)]` cannot coerce into numbers.
#[derive(Debug, Default, Deserialize)]
pub struct TreeListParams {
    pub tree_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TreeListParams {
    pub fn page(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}
