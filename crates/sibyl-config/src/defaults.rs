//! Default values shared by the component configs

/// Default chat model when none is configured
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature; 0 keeps generated SQL reproducible
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Default cap on generated tokens
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default deadline for one backend call
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default deadline for one embedding call
pub const DEFAULT_EMBED_TIMEOUT_SECS: u64 = 60;

/// Default top-k per collection
pub const DEFAULT_N_RESULTS: usize = 10;

/// Default prompt budget, in characters (not tokens)
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 24_000;

/// Default context index path
pub const DEFAULT_STORE_PATH: &str = ".sibyl/context.db";

/// Default SQLite database for query execution
pub const DEFAULT_SQLITE_PATH: &str = "demo.db";

/// Default MySQL port
pub const DEFAULT_MYSQL_PORT: u16 = 3306;
