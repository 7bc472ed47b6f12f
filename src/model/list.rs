use serde::{Deserialize, Serialize};

use crate::model::notice::NoticeDto;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PaginationDto {
    pub page: u64,
    pub items: u64,
    pub total: u64,
    pub pages: u64,
}

/// Paginated index document.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ListDto<T> {
    pub records: Vec<T>,
    pub pagination: PaginationDto,
    pub notice: Option<NoticeDto>,
}

/// Single record document.
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecordDto<T> {
    pub record: T,
    pub notice: Option<NoticeDto>,
}

/// Entry of an autocomplete variant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AutocompleteItemDto {
    pub value: String,
    pub label: String,
}
