//! SQL helpers Diesel's DSL doesn't cover.
//!
//! All user input that reaches these expressions is passed as a bound
//! parameter, never interpolated.

diesel::define_sql_function! {
    /// SQLite's built-in `lower()`. SQLite's `LIKE` is only
    /// case-insensitive for ASCII when neither side is folded explicitly,
    /// so search lowercases both the column and the pattern.
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}
