use crate::config::Settings;
use crate::store::RecordStore;

/// Mutable state shared by the menu commands of one interactive run.
///
/// - `store`: the phonebook, reloaded by the interpreter before every menu cycle.
/// - `settings`: where the phonebook lives and how many records fit on a page.
/// - `should_exit`: set by the exit command to stop the menu loop.
#[derive(Debug)]
pub struct Session {
    pub store: RecordStore,
    pub settings: Settings,
    pub should_exit: bool,
}

impl Session {
    /// Bind a fresh, not yet loaded store to `settings.data_file`.
    pub fn new(settings: Settings) -> Self {
        Self {
            store: RecordStore::new(settings.data_file.clone()),
            settings,
            should_exit: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.settings.page_size
    }
}
