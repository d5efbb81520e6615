//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts created through Google sign-in.
    users (id) {
        /// Primary key.
        id -> Uuid,
        /// Google account identifier; unique.
        google_subject -> Varchar,
        /// Email address; unique.
        email -> Varchar,
        /// Display name from the Google profile.
        name -> Varchar,
        /// Avatar URL.
        picture_url -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last profile refresh.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Story sessions.
    chats (id) {
        /// Primary key.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Title derived from the first input.
        title -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Time of the latest message.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Chat transcript entries.
    messages (id) {
        /// Primary key.
        id -> Uuid,
        /// Insertion order tie-breaker.
        seq -> Int8,
        /// Owning chat.
        chat_id -> Uuid,
        /// `user` or `assistant`.
        role -> Varchar,
        /// Message body.
        content -> Text,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(chats -> users (user_id));
diesel::joinable!(messages -> chats (chat_id));

diesel::allow_tables_to_appear_in_same_query!(chats, messages, users);
