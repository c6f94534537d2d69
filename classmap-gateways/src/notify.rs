use classmap_core::gateways::notify::{UserNotification, UserNotificationGateway};

/// Shows user notifications as log messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl UserNotificationGateway for LogNotifier {
    fn notify(&self, notification: UserNotification) {
        log::warn!("{notification}");
    }
}
