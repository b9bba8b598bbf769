pub const ENTRY_SUFFIX: &str = ".md";
/// Longest file name most filesystems accept, in bytes.
pub const MAX_NAME_BYTES: usize = 255;
pub const DEFAULT_ENTRIES_DIR: &str = "entries";
pub const DEFAULT_S3_PREFIX: &str = "entries/";
pub const ENTRY_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";
