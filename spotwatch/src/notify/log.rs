//! Notifier that only writes to the log.

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use tracing::info;

use super::{Notification, Notifier, NotifyError};
use crate::model::Subscriber;

/// Logs notifications instead of delivering them.
///
/// Used when no push endpoint is configured, and handy for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify<'a>(
        &'a self,
        subscriber: &'a Subscriber,
        notification: &'a Notification,
    ) -> BoxFuture<'a, Result<(), NotifyError>> {
        info!(
            subscriber_id = %subscriber.id,
            title = %notification.title,
            body = %notification.body,
            "Notification (log only)"
        );
        future::ready(Ok(())).boxed()
    }
}
