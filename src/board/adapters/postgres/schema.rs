//! Diesel schema for board persistence.

diesel::table! {
    /// Board columns, left to right by `ord`.
    #[sql_name = "columns"]
    board_columns (id) {
        /// Column identifier.
        id -> Int8,
        /// Display name.
        name -> Text,
        /// Board position, unique across columns.
        ord -> Int4,
    }
}

diesel::table! {
    /// Task cards.
    tasks (id) {
        /// Task identifier.
        id -> Int8,
        /// Trimmed, non-empty title.
        title -> Text,
        /// Owning column.
        col_id -> Int8,
        /// Position within the owning column.
        ord -> Int4,
    }
}

diesel::joinable!(tasks -> board_columns (col_id));
diesel::allow_tables_to_appear_in_same_query!(board_columns, tasks);
