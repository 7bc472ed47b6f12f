use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::{
    data::listing::{BulkIds, ListQuery, DEFAULT_ITEMS},
    error::{validation::ValidationErrors, Error},
    util::validation::{BLANK, INVALID},
};

pub const AUTOCOMPLETE_ITEMS: u64 = 50;

/// Query string of index and bulk action routes.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Case-insensitive text searched in the resource's main columns
    pub search: Option<String>,
    /// Column key, prefixed with `-` for descending order
    pub order: Option<String>,
    pub page: Option<u64>,
    /// Records per page, between 1 and 100
    pub items: Option<u64>,
    /// `all` or comma-separated record IDs, used by bulk actions
    pub ids: Option<String>,
    /// List discarded records instead of kept ones
    pub discarded: Option<bool>,
    /// Local path to redirect to after a bulk action
    pub redirect: Option<String>,
}

impl ListParams {
    /// Index query built from the parameters
    pub fn list_query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            order: self.order.clone(),
            page: self.page.unwrap_or(1),
            items: self.items.unwrap_or(DEFAULT_ITEMS),
            discarded: self.discarded.unwrap_or(false),
        }
    }

    /// Query of the autocomplete variant: first page of matching records only
    pub fn autocomplete_query(&self) -> ListQuery {
        ListQuery {
            page: 1,
            items: AUTOCOMPLETE_ITEMS,
            ..self.list_query()
        }
    }

    /// Targets of a bulk action, resolved among kept (`discarded = false`) or discarded
    /// records matching the search
    ///
    /// # Returns
    /// - `Ok((BulkIds, ListQuery))`: the parsed `ids` and the query selecting candidates
    /// - `Err(Error::ValidationErrors(_))`: `ids` is missing or holds a malformed UUID
    pub fn bulk(&self, discarded: bool) -> Result<(BulkIds, ListQuery), Error> {
        let ids = match self.ids.as_deref() {
            None => return Err(ValidationErrors::single("ids", BLANK).into()),
            Some(ids) => BulkIds::parse(ids).ok_or_else(|| ValidationErrors::single("ids", INVALID))?,
        };

        let query = ListQuery {
            search: self.search.clone(),
            order: None,
            page: 1,
            items: DEFAULT_ITEMS,
            discarded,
        };

        Ok((ids, query))
    }
}

/// Query string of single record actions.
#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RedirectParams {
    /// Local path to redirect to after the action
    pub redirect: Option<String>,
}
