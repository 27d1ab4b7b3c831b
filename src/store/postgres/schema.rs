//! Diesel schema for workboard persistence.

diesel::table! {
    /// User accounts with their role labels.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Lowercased unique email address.
        #[max_length = 255]
        email -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Text,
        /// Optional phone number.
        #[max_length = 20]
        phone -> Nullable<Varchar>,
        /// Whether the account may act.
        is_active -> Bool,
        /// JSON array of role labels.
        roles -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Projects.
    projects (id) {
        /// Project identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// First scheduled day.
        start_date -> Date,
        /// Last scheduled day.
        end_date -> Date,
        /// Status label.
        #[max_length = 50]
        status -> Varchar,
        /// Creating user.
        created_by -> Uuid,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project membership rows.
    project_members (project_id, user_id) {
        /// Project.
        project_id -> Uuid,
        /// Member user.
        user_id -> Uuid,
    }
}

diesel::table! {
    /// Tasks inside projects.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 255]
        title -> Varchar,
        /// Description.
        description -> Text,
        /// First scheduled day.
        start_date -> Date,
        /// Last scheduled day.
        end_date -> Date,
        /// Status label.
        #[max_length = 50]
        status -> Varchar,
        /// Parent project.
        project_id -> Uuid,
        /// Assigned user.
        assigned_user_id -> Uuid,
        /// Creating user.
        created_by -> Uuid,
        /// Optimistic concurrency revision.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Uploaded file records with a polymorphic owner.
    attachments (id) {
        /// Attachment identifier.
        id -> Uuid,
        /// Owner discriminator: `project` or `task`.
        #[max_length = 20]
        owner_type -> Varchar,
        /// Owner identifier.
        owner_id -> Uuid,
        /// Generated storage name.
        #[max_length = 255]
        name -> Varchar,
        /// Uploader-supplied name.
        #[max_length = 255]
        original_name -> Varchar,
        /// Storage path.
        #[max_length = 255]
        path -> Varchar,
        /// Size in bytes.
        size -> Int8,
        /// Detected mime type.
        #[max_length = 255]
        mime_type -> Varchar,
        /// Hex SHA-256 of the content.
        #[max_length = 64]
        checksum -> Varchar,
        /// Uploading user.
        uploaded_by -> Uuid,
        /// Upload timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::joinable!(project_members -> users (user_id));
diesel::joinable!(tasks -> projects (project_id));

diesel::allow_tables_to_appear_in_same_query!(users, projects, project_members, tasks, attachments);
