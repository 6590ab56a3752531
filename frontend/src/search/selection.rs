use crate::config::DEFAULT_MAX_SELECTED_CHANNELS;
use crate::dialogs::Confirm;
use crate::models::SelectedChannel;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("'{0}' is already added")]
    AlreadyAdded(String),

    #[error("You can select at most {0} channels")]
    CapacityReached(usize),
}

/// Channels chosen for the next search: unique by id, insertion ordered,
/// bounded by `capacity`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSelection {
    channels: Vec<SelectedChannel>,
    capacity: usize,
}

impl Default for ChannelSelection {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SELECTED_CHANNELS)
    }
}

impl ChannelSelection {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Vec::new(),
            capacity,
        }
    }

    /// Restores a saved selection, dropping duplicates and overflow.
    pub fn with_channels(capacity: usize, channels: Vec<SelectedChannel>) -> Self {
        let mut selection = Self::new(capacity);
        selection.replace_with(channels);
        selection
    }

    pub fn add(&mut self, channel: SelectedChannel) -> Result<(), SelectionError> {
        if self.contains(&channel.id) {
            return Err(SelectionError::AlreadyAdded(channel.title));
        }
        if self.channels.len() >= self.capacity {
            return Err(SelectionError::CapacityReached(self.capacity));
        }
        self.channels.push(channel);
        Ok(())
    }

    pub fn remove(&mut self, channel_id: &str) -> bool {
        let before = self.channels.len();
        self.channels.retain(|c| c.id != channel_id);
        self.channels.len() != before
    }

    /// Empties the selection if the user agrees.
    pub fn clear(&mut self, confirm: &dyn Confirm) -> bool {
        if self.channels.is_empty() {
            return false;
        }
        let prompt = format!("Remove all {} selected channels?", self.channels.len());
        if !confirm.confirm(&prompt) {
            return false;
        }
        self.channels.clear();
        true
    }

    /// Replaces the selection, e.g. with a category's channels. Returns how
    /// many channels did not fit.
    pub fn replace_with(&mut self, channels: Vec<SelectedChannel>) -> usize {
        self.channels.clear();
        let mut skipped = 0;
        for channel in channels {
            match self.add(channel) {
                Ok(()) => {}
                Err(SelectionError::AlreadyAdded(_)) => {}
                Err(SelectionError::CapacityReached(_)) => skipped += 1,
            }
        }
        skipped
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.channels.iter().any(|c| c.id == channel_id)
    }

    pub fn channels(&self) -> &[SelectedChannel] {
        &self.channels
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
