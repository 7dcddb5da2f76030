use super::media::MediaHandle;

/// The now-playing slot: at most one live handle and the catalog index it
/// was opened for.
pub struct Session<H> {
    handle: Option<H>,
    current_index: Option<usize>,
}

impl<H: MediaHandle> Session<H> {
    pub fn new() -> Self {
        Self {
            handle: None,
            current_index: None,
        }
    }

    pub fn handle(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    pub fn handle_mut(&mut self) -> Option<&mut H> {
        self.handle.as_mut()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Stop and drop the live handle, if any. The index is kept.
    pub fn release(&mut self) {
        if let Some(mut old) = self.handle.take() {
            old.stop();
        }
    }

    /// Install `handle` as the live handle for `index`, stopping whatever
    /// was there first.
    pub fn install(&mut self, handle: H, index: usize) {
        self.release();
        self.handle = Some(handle);
        self.current_index = Some(index);
    }

    /// Forget the selection (used when the catalog is replaced).
    pub fn clear_index(&mut self) {
        self.current_index = None;
    }
}

impl<H: MediaHandle> Default for Session<H> {
    fn default() -> Self {
        Self::new()
    }
}
