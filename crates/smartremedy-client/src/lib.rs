//! smartremedy-client: Everything the dashboard keeps on the client side of
//! the SmartRemedy REST API:
//!   - `api`: typed REST client with bearer injection and 401 handling
//!   - `storage`: key/value local storage (file-backed or in-memory)
//!   - `session`: auth session state machine and session events
//!   - `theme`: light/dark preference

pub mod api;
pub mod storage;
pub mod session;
pub mod theme;

pub use api::{ApiClient, UploadFile};
pub use session::{AuthState, Session, SessionEvent, TOKEN_KEY};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use theme::{Theme, ThemePreference, THEME_KEY};
