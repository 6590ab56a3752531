use web_sys::window;

/// Asks the user to confirm an irreversible action.
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// `window.confirm()`; answers "no" when there is no window.
pub struct BrowserDialog;

impl Confirm for BrowserDialog {
    fn confirm(&self, message: &str) -> bool {
        window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
