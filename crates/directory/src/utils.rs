//! Query helpers shared by the services.

use std::collections::HashSet;

use sea_orm::{
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
    ColumnTrait,
};

/// Escape LIKE wildcards (% and _) and the escape character itself
pub fn escape_like_wildcards(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring match of `column` against `search`.
///
/// Lower-cases both sides so the result is the same on SQLite and PostgreSQL.
pub fn icontains<C: ColumnTrait>(column: C, search: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_wildcards(&search.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column.as_column_ref()))).like(LikeExpr::new(pattern).escape('\\'))
}

/// Drop repeated ids, keeping the first occurrence order
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Render ids as `1, 2, 3` for error messages
pub fn format_ids(ids: &[i32]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
