//! Diesel schema for task board persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Caller-supplied task identifier.
        id -> Text,
        /// Task title.
        title -> Text,
        /// Task description, empty when never set.
        description -> Text,
        /// Optional assignee.
        assignee -> Nullable<Text>,
        /// Workflow column display name.
        column_name -> Text,
    }
}

diesel::table! {
    /// Directed dependency edges between tasks.
    task_dependencies (task_id, depends_on_id) {
        /// Dependent task identifier.
        task_id -> Text,
        /// Depended-on task identifier.
        depends_on_id -> Text,
    }
}

diesel::table! {
    /// Append-only column transition log.
    task_transitions (id) {
        /// Sequence number assigned on append.
        id -> BigInt,
        /// Task whose column changed.
        task_id -> Text,
        /// Column left behind, null for the creation record.
        from_column -> Nullable<Text>,
        /// Column entered.
        to_column -> Text,
        /// UTC instant of the change, stored as text with full precision.
        timestamp -> TimestamptzSqlite,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, task_dependencies, task_transitions);
