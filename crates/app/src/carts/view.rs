//! Page-side effects of cart actions.

use mockall::automock;

/// The page surface the cart controller drives.
#[automock]
pub trait CartView: Send + Sync {
    /// Navigate the shopper to `path`.
    fn navigate(&self, path: &str);

    /// Show a transient success notification.
    fn notify_success(&self, message: &str);

    /// Show or hide the "remove all" affordance.
    fn set_remove_all_visible(&self, visible: bool);
}
