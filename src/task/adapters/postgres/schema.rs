//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Store-assigned task identifier.
        id -> Int8,
        /// Task title; unique under `lower(title)`.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Task status label.
        #[max_length = 20]
        status -> Varchar,
    }
}
