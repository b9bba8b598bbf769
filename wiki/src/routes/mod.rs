pub mod entry;

/// Where an entry is served, with the title percent-encoded.
pub fn entry_location(title: &str) -> String {
    format!("/v1/wiki/{}", urlencoding::encode(title))
}
