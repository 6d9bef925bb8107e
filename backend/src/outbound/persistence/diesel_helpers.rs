//! Declarative helpers for the common single-table read paths.
//!
//! Both macros check out a connection, run a filtered `as_select` query and
//! pass each row through a fallible converter. Callers supply the pool and
//! Diesel error mappers so each repository keeps its own error type.

/// Collect row conversion results, mapping the first error through `map_err`.
pub fn collect_rows<T, E>(
    results: impl Iterator<Item = Result<T, String>>,
    map_err: impl FnOnce(String) -> E,
) -> Result<Vec<T>, E> {
    results.collect::<Result<Vec<_>, _>>().map_err(map_err)
}

/// Query at most one row and convert it into a domain value.
///
/// The converter returns `Result<T, String>`; conversion failures are passed
/// to the query error constructor.
#[macro_export]
macro_rules! query_optional {
    (
        $self:ident,
        errors: ($map_pool:expr, $map_diesel:expr, $invalid_row:expr),
        $table:expr,
        $filter:expr,
        $row_type:ty,
        $converter:expr
    ) => {{
        use diesel::prelude::*;
        use diesel_async::RunQueryDsl;

        let mut conn = $self.pool.get().await.map_err($map_pool)?;

        let row: Option<$row_type> = $table
            .filter($filter)
            .select(<$row_type>::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err($map_diesel)?;

        row.map($converter).transpose().map_err($invalid_row)
    }};
}

/// Query an ordered list of rows and convert each into a domain value.
#[macro_export]
macro_rules! query_vec {
    (
        $self:ident,
        errors: ($map_pool:expr, $map_diesel:expr, $invalid_row:expr),
        $table:expr,
        $filter:expr,
        $order_by:expr,
        $row_type:ty,
        $converter:expr
    ) => {{
        use diesel::prelude::*;
        use diesel_async::RunQueryDsl;

        let mut conn = $self.pool.get().await.map_err($map_pool)?;

        let rows: Vec<$row_type> = $table
            .filter($filter)
            .select(<$row_type>::as_select())
            .order_by($order_by)
            .load(&mut conn)
            .await
            .map_err($map_diesel)?;

        $crate::outbound::persistence::diesel_helpers::collect_rows(
            rows.into_iter().map($converter),
            $invalid_row,
        )
    }};
}
