//! Local Storage Stores
//!
//! Browser-side implementations of the core's token and scratch stores.

use shopdesk::canvas::{ScratchDraft, ScratchError, ScratchResult, ScratchStore, SCRATCH_KEY};
use shopdesk::gateway::AuthTokens;
use shopdesk::session::TOKEN_KEY;
use shopdesk::{SessionError, SessionResult, TokenStore};

fn storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| "no window".to_string())?
        .local_storage()
        .map_err(|_| "local storage denied".to_string())?
        .ok_or_else(|| "local storage missing".to_string())
}

fn read(key: &str) -> Result<Option<String>, String> {
    storage()?
        .get_item(key)
        .map_err(|_| format!("failed to read {}", key))
}

fn write(key: &str, value: &str) -> Result<(), String> {
    storage()?
        .set_item(key, value)
        .map_err(|_| format!("failed to write {}", key))
}

/// Session tokens under [`TOKEN_KEY`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTokenStore;

impl TokenStore for LocalTokenStore {
    fn load(&self) -> SessionResult<Option<AuthTokens>> {
        match read(TOKEN_KEY).map_err(SessionError::Store)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, tokens: &AuthTokens) -> SessionResult<()> {
        write(TOKEN_KEY, &serde_json::to_string(tokens)?).map_err(SessionError::Store)
    }

    fn clear(&self) -> SessionResult<()> {
        storage()
            .map_err(SessionError::Store)?
            .remove_item(TOKEN_KEY)
            .map_err(|_| SessionError::Store("failed to clear session".to_string()))
    }
}

/// Canvas scratch slot under [`SCRATCH_KEY`]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalScratchStore;

impl ScratchStore for LocalScratchStore {
    fn save(&self, draft: &ScratchDraft) -> ScratchResult<()> {
        write(SCRATCH_KEY, &serde_json::to_string(draft)?).map_err(ScratchError::Unavailable)
    }

    fn load(&self) -> ScratchResult<Option<ScratchDraft>> {
        match read(SCRATCH_KEY).map_err(ScratchError::Unavailable)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }
}
