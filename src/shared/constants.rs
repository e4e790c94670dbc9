/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum length for an evidence image URL
pub const MAX_IMAGE_URL_LENGTH: usize = 2048;

/// Maximum length of a stored name or last name, after normalization
pub const MAX_NAME_LENGTH: usize = 100;
