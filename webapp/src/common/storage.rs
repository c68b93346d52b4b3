use gloo_console::error as console_error;
use gloo_storage::{LocalStorage, Storage};
use tracing::warn;

use folio_common::theme::{PreferenceStore, Theme};

// the theme is kept as the bare string "dark"/"light" rather than gloo's json encoding, so
// that values written by earlier versions of the pages keep working
#[derive(Clone, Debug)]
pub struct LocalPreferenceStore {
    key: String,
}

impl LocalPreferenceStore {
    pub fn new(key: &str) -> Self {
        LocalPreferenceStore {
            key: key.to_owned(),
        }
    }
}

impl PreferenceStore for LocalPreferenceStore {
    fn load(&self) -> Option<Theme> {
        let key = &self.key;

        let raw = match LocalStorage::raw().get_item(key) {
            Ok(raw) => raw?,
            Err(err) => {
                console_error!(format!("Failed to fetch local storage {key}: {err:?}"));
                return None;
            }
        };

        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                warn!("ignoring stored theme: {err}");
                None
            }
        }
    }

    fn save(&self, theme: Theme) {
        let key = &self.key;

        LocalStorage::raw()
            .set_item(key, theme.as_str())
            .unwrap_or_else(|err| {
                console_error!(format!("Failed to set local storage {key}: {err:?}"))
            })
    }
}
