/// Error code registry for ganymede-aggregations
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Shape configuration errors
/// - 3000-3999: Output identifier errors
/// - 4000-4999: Store execution errors
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_YAML: u16 = 1002;
    pub const CONFIG_INVALID_JSON: u16 = 1003;
    pub const CONFIG_INVALID_TOML: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;
    pub const CONFIG_READ_FAILED: u16 = 1006;

    // Shape configuration errors (2000-2999)
    pub const SHAPE_UNKNOWN: u16 = 2001;
    pub const SHAPE_DUPLICATE: u16 = 2002;
    pub const SHAPE_EMPTY_FIELD: u16 = 2003;
    pub const SHAPE_INVALID_PATH: u16 = 2004;
    pub const SHAPE_PATH_COLLISION: u16 = 2005;
    pub const SHAPE_IDENTITY_PROJECTED: u16 = 2006;
    pub const SHAPE_INVALID_TEMPLATE: u16 = 2007;

    // Output identifier errors (3000-3999)
    pub const IDENTIFIER_REJECTED: u16 = 3001;

    // Store execution errors (4000-4999)
    pub const STORE_IO_ERROR: u16 = 4001;
    pub const STORE_SERIALIZATION_ERROR: u16 = 4002;
    pub const STORE_INVALID_FILTER: u16 = 4003;
    pub const STORE_INVALID_PIPELINE: u16 = 4004;
    pub const STORE_BACKEND_ERROR: u16 = 4005;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid YAML syntax",
        1003 => "Invalid JSON syntax",
        1004 => "Invalid TOML syntax",
        1005 => "Invalid value in configuration",
        1006 => "Failed to read configuration input",

        2001 => "Unknown aggregation job",
        2002 => "Duplicate aggregation job name",
        2003 => "Required shape field is empty",
        2004 => "Invalid field path in shape",
        2005 => "Projected field paths collide",
        2006 => "Identity field cannot be projected",
        2007 => "Invalid output collection template",

        3001 => "Output collection name rejected by the store",

        4001 => "Store I/O error",
        4002 => "Store serialization error",
        4003 => "Filter expression rejected by the store",
        4004 => "Pipeline rejected by the store",
        4005 => "Store backend error",

        9000 => "Generic error",
        _ => "Unknown error code",
    }
}
