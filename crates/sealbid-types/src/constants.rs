//! System-wide constants for the Sealbid matcher.

/// Default commit window: seconds from a session's first bid to its deadline.
pub const DEFAULT_COMMIT_WINDOW_SECS: u64 = 15;

/// Default grace buffer after the deadline before decryption is attempted.
pub const DEFAULT_DECRYPT_BUFFER_SECS: u64 = 5;

/// Default API listen address.
pub const DEFAULT_API_ADDR: &str = "0.0.0.0:3000";

/// Default SQLite database path.
pub const DEFAULT_DB_PATH: &str = "sealbid_otc.db";

/// Default time-lock oracle base URL (NanoShutter staging).
pub const DEFAULT_ORACLE_URL: &str = "https://nanoshutter.staging.shutter.network";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Sealbid";
