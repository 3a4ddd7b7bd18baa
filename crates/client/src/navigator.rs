//! View navigation seam
//!
//! The service navigates back to the post list after a successful create or
//! update. Hosts plug in their own router; headless use gets `NoopNavigator`.

/// Route of the post list view
pub const LIST_ROUTE: &str = "/";

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &str);
}

/// Navigator that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, route: &str) {
        tracing::debug!(route, "Navigation requested");
    }
}
