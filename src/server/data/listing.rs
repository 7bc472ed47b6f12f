//! Search, ordering and pagination helpers shared by index queries.

use sea_orm::{
    sea_query::{Expr, Func},
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, ExprTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::server::data::discard::DiscardableEntity;

pub const DEFAULT_ITEMS: u64 = 50;
pub const MAX_ITEMS: u64 = 100;

/// Index parameters once parsed from the query string.
#[derive(Clone, Debug, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    /// Column key, `-` prefix for descending order
    pub order: Option<String>,
    /// 1-based page number
    pub page: u64,
    pub items: u64,
    /// List discarded records instead of kept ones
    pub discarded: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: None,
            order: None,
            page: 1,
            items: DEFAULT_ITEMS,
            discarded: false,
        }
    }
}

/// Records targeted by a bulk action.
#[derive(Clone, Debug, PartialEq)]
pub enum BulkIds {
    /// Every record matching the current filter
    All,
    List(Vec<Uuid>),
}

impl BulkIds {
    /// Parses `all` or a comma-separated list of UUIDs, `None` when a UUID is malformed
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim() == "all" {
            return Some(Self::All);
        }

        value
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Uuid::parse_str(id).ok())
            .collect::<Option<Vec<_>>>()
            .map(Self::List)
    }

    /// Restricts the targeted IDs to `matching`, the IDs matched by the current filter
    pub fn resolve(self, matching: Vec<Uuid>) -> Vec<Uuid> {
        match self {
            Self::All => matching,
            Self::List(ids) => ids.into_iter().filter(|id| matching.contains(id)).collect(),
        }
    }
}

/// One page of records.
#[derive(Clone, Debug, PartialEq)]
pub struct Page<M> {
    pub records: Vec<M>,
    pub page: u64,
    pub items: u64,
    pub total: u64,
    pub pages: u64,
}

impl<M> Page<M> {
    pub fn map<T>(self, f: impl FnMut(M) -> T) -> Page<T> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            page: self.page,
            items: self.items,
            total: self.total,
            pages: self.pages,
        }
    }
}

/// Case-insensitive substring match of `search` on any of `columns`.
pub fn search_condition<C>(columns: &[C], search: &str) -> Condition
where
    C: ColumnTrait,
{
    let pattern = format!("%{}%", search.trim().to_lowercase());

    columns.iter().fold(Condition::any(), |condition, column| {
        condition.add(Expr::expr(Func::lower(Expr::col(*column))).like(pattern.as_str()))
    })
}

/// Keep the default kept/discarded scope and apply the search.
pub fn filter<E>(select: Select<E>, query: &ListQuery, search_columns: &[E::Column]) -> Select<E>
where
    E: DiscardableEntity,
{
    let select = if query.discarded {
        select.filter(E::discarded_at_column().is_not_null())
    } else {
        select.filter(E::discarded_at_column().is_null())
    };

    filter_search(select, query, search_columns)
}

/// Apply the search only, for tables without soft delete.
pub fn filter_search<E>(
    select: Select<E>,
    query: &ListQuery,
    search_columns: &[E::Column],
) -> Select<E>
where
    E: EntityTrait,
{
    match query.search.as_deref().map(str::trim) {
        Some(search) if !search.is_empty() => {
            select.filter(search_condition(search_columns, search))
        }
        _ => select,
    }
}

/// Order by the column matching `query.order`, falling back to `default`.
pub fn order<E>(
    select: Select<E>,
    query: &ListQuery,
    columns: &[(&str, E::Column)],
    default: E::Column,
) -> Select<E>
where
    E: EntityTrait,
{
    let requested = query.order.as_deref().unwrap_or_default();
    let (key, direction) = match requested.strip_prefix('-') {
        Some(key) => (key, Order::Desc),
        None => (requested, Order::Asc),
    };

    match columns.iter().find(|(name, _)| *name == key) {
        Some((_, column)) => select.order_by(*column, direction),
        None => select.order_by(default, Order::Asc),
    }
}

/// Fetch the requested page of `select`.
pub async fn paginate<E, C>(
    select: Select<E>,
    query: &ListQuery,
    db: &C,
) -> Result<Page<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let items = query.items.clamp(1, MAX_ITEMS);
    let page = std::cmp::max(query.page, 1);

    let paginator = select.paginate(db, items);
    let counts = paginator.num_items_and_pages().await?;
    // Pages past the last one are empty, the offset is never computed for them
    let records = if page > counts.number_of_pages {
        Vec::new()
    } else {
        paginator.fetch_page(page - 1).await?
    };

    Ok(Page {
        records,
        page,
        items,
        total: counts.number_of_items,
        pages: counts.number_of_pages,
    })
}

/// IDs of every record matched by `select`, used by `ids=all` bulk actions.
pub async fn select_ids<E, C>(select: Select<E>, id: E::Column, db: &C) -> Result<Vec<Uuid>, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    select
        .select_only()
        .column(id)
        .into_tuple()
        .all(db)
        .await
}

#[cfg(test)]
mod tests {
    use passerelle_test_utils::prelude::*;
    use sea_orm::{EntityTrait, QueryFilter};

    use uuid::Uuid;

    use crate::server::data::listing::{
        filter, order, paginate, search_condition, BulkIds, ListQuery,
    };

    /// Expect listed IDs to be intersected with the filtered IDs
    #[test]
    fn resolves_bulk_ids() {
        let kept = Uuid::new_v4();
        let other = Uuid::new_v4();

        let ids = BulkIds::parse(&format!("{}, {}", kept, other)).unwrap();
        assert_eq!(ids.resolve(vec![kept]), vec![kept]);
        assert_eq!(BulkIds::parse("all"), Some(BulkIds::All));
        assert_eq!(BulkIds::All.resolve(vec![kept, other]), vec![kept, other]);
        assert_eq!(BulkIds::parse("all,nope"), None);
    }

    /// Expect search to ignore case and match substrings
    #[tokio::test]
    async fn searches_case_insensitively() -> Result<(), TestError> {
        let test = TestBuilder::new().with_tables().build().await?;
        test.organization()
            .save_publisher(entity::publisher::Model {
                name: "ACME Logiciels".to_string(),
                ..factory::publisher("511022394")
            })
            .await?;
        test.organization().insert_publisher("732829320").await?;

        let found = entity::prelude::Publisher::find()
            .filter(search_condition(
                &[entity::publisher::Column::Name, entity::publisher::Column::Siren],
                "acme log",
            ))
            .all(&test.db)
            .await?;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].siren, "511022394");

        Ok(())
    }

    /// Expect the page size to be clamped and totals to be reported
    #[tokio::test]
    async fn clamps_items_per_page() -> Result<(), TestError> {
        let test = TestBuilder::new().with_tables().build().await?;
        for siren in ["511022394", "732829320", "552100554"] {
            test.organization().insert_publisher(siren).await?;
        }

        let query = ListQuery {
            items: 0,
            order: Some("-siren".to_string()),
            ..Default::default()
        };
        let select = filter(entity::prelude::Publisher::find(), &query, &[]);
        let select = order(
            select,
            &query,
            &[("siren", entity::publisher::Column::Siren)],
            entity::publisher::Column::Name,
        );
        let page = paginate(select, &query, &test.db).await?;

        assert_eq!(page.items, 1);
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 3);
        assert_eq!(page.records[0].siren, "732829320");

        Ok(())
    }

    /// Expect a page past the last one to be empty, however large it is
    #[tokio::test]
    async fn returns_empty_page_past_the_end() -> Result<(), TestError> {
        let test = TestBuilder::new().with_tables().build().await?;
        test.organization().insert_publisher("511022394").await?;

        let query = ListQuery {
            page: u64::MAX,
            ..Default::default()
        };
        let page = paginate(entity::prelude::Publisher::find(), &query, &test.db).await?;

        assert!(page.records.is_empty());
        assert_eq!(page.page, u64::MAX);
        assert_eq!(page.total, 1);
        assert_eq!(page.pages, 1);

        Ok(())
    }
}
