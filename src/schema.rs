// Tally schema - the document table backing the record store

diesel::table! {
    documents (key) {
        key -> Text,
        content -> Text,
        updated_at -> Text,
    }
}
