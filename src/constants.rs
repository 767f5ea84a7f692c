//! Constants used throughout the application
//!
//! This module centralizes note markup, defaults and user-facing messages.

// Note markup
/// Heading of the section new task lines are appended to
pub const DEFAULT_TASK_SECTION: &str = "## Tasks";
/// Marker preceding the completion date on a checked line
pub const COMPLETION_MARKER: &str = "✅";
/// Prefix of the hidden comment linking a line to its remote task
pub const REMOTE_ID_PREFIX: &str = "todo-id:";
/// Template for a freshly created daily note; `{date}` is replaced with the note date
pub const DEFAULT_NOTE_TEMPLATE: &str = "# {date}\n\n## Tasks\n";
/// Filename format of daily notes, without extension
pub const DEFAULT_FILENAME_FORMAT: &str = "%Y-%m-%d";

// Remote defaults
pub const DEFAULT_BACKEND_TYPE: &str = "microsoft_todo";
pub const DEFAULT_API_TOKEN_ENV: &str = "MS_TODO_ACCESS_TOKEN";
/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound accepted for the request timeout
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

// Log Messages
pub const LOG_PHASE_REMOTE_TO_LOCAL: &str = "⬇️  Syncing remote tasks into today's note";
pub const LOG_PHASE_LOCAL_TO_REMOTE: &str = "⬆️  Syncing note tasks to the remote list";
pub const LOG_PHASE_COMPLETIONS: &str = "✔️  Propagating completions";

// Sync messages
pub const ERROR_SYNC_IN_PROGRESS: &str = "Sync already in progress for";
pub const SUCCESS_SYNC_COMPLETE: &str = "✅ Sync complete";
pub const ERROR_SYNC_PARTIAL: &str = "⚠️  Sync finished with errors";

// CLI Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";
pub const ERROR_NO_API_TOKEN: &str = "❌ Error: access token environment variable not set";
