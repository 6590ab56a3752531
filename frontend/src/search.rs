pub mod api;
pub mod card;
pub mod channel_picker;
pub mod components;
pub mod debounce;
pub mod form;
pub mod history;
pub mod results;
pub mod search_options;
pub mod selection;
pub mod session;
