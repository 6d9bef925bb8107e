//! Diesel table definitions for the template store.
//!
//! Kept in step with `backend/migrations` by hand.

diesel::table! {
    members (id) {
        id -> Int8,
        #[max_length = 255]
        email -> Varchar,
        #[max_length = 255]
        username -> Varchar,
        password_digest -> Text,
        created_at -> Timestamptz,
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        member_id -> Int8,
        #[max_length = 255]
        name -> Varchar,
        is_default -> Bool,
        created_at -> Timestamptz,
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        #[max_length = 30]
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    templates (id) {
        id -> Int8,
        member_id -> Int8,
        category_id -> Int8,
        #[max_length = 255]
        title -> Varchar,
        description -> Text,
        created_at -> Timestamptz,
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    snippets (id) {
        id -> Int8,
        template_id -> Int8,
        #[max_length = 255]
        filename -> Varchar,
        content -> Text,
        ordinal -> Int4,
        created_at -> Timestamptz,
        modified_at -> Timestamptz,
    }
}

diesel::table! {
    thumbnail_snippets (template_id) {
        template_id -> Int8,
        snippet_id -> Int8,
    }
}

diesel::table! {
    template_tags (template_id, tag_id) {
        template_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::joinable!(categories -> members (member_id));
diesel::joinable!(templates -> categories (category_id));
diesel::joinable!(snippets -> templates (template_id));
diesel::joinable!(thumbnail_snippets -> snippets (snippet_id));
diesel::joinable!(template_tags -> templates (template_id));
diesel::joinable!(template_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(
    members,
    categories,
    tags,
    templates,
    snippets,
    thumbnail_snippets,
    template_tags,
);
