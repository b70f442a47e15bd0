//! Keeps the service session cookie across restarts, so reopening the app
//! behaves like reloading the page.

use crawlchat_engine::StateStore;
use crawlchat_logging::{chat_error, chat_info, chat_warn};
use serde::{Deserialize, Serialize};

const SESSION_FILENAME: &str = ".crawlchat_session.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
struct PersistedSession {
    base_url: String,
    cookie: Option<String>,
}

/// Cookie saved for `base_url`. A session saved against another service is ignored.
pub(crate) fn load_session_cookie(store: &StateStore, base_url: &str) -> Option<String> {
    let content = match store.read(SESSION_FILENAME) {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            chat_warn!("Failed to read saved session in {:?}: {}", store.dir(), err);
            return None;
        }
    };

    let session: PersistedSession = match ron::from_str(&content) {
        Ok(session) => session,
        Err(err) => {
            chat_warn!("Failed to parse saved session in {:?}: {}", store.dir(), err);
            return None;
        }
    };

    if session.base_url != base_url {
        chat_info!("Saved session belongs to {}; starting fresh", session.base_url);
        return None;
    }
    session.cookie
}

pub(crate) fn save_session_cookie(store: &StateStore, base_url: &str, cookie: Option<&str>) {
    let session = PersistedSession {
        base_url: base_url.to_string(),
        cookie: cookie.map(str::to_string),
    };

    let content = match ron::ser::to_string_pretty(&session, ron::ser::PrettyConfig::new()) {
        Ok(text) => text,
        Err(err) => {
            chat_error!("Failed to serialize session: {}", err);
            return;
        }
    };

    if let Err(err) = store.write(SESSION_FILENAME, &content) {
        chat_error!("Failed to save session to {:?}: {}", store.dir(), err);
    }
}
