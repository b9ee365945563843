use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn, Instrument};

use super::notifier::{RegistrationNotice, RegistrationNotifier};

/// Sends a registration notice on its own task.
///
/// The caller does not wait on the outcome; a failed send is logged and
/// dropped. The handle is returned so tests can await completion.
pub fn dispatch_registration_notice(
    notifier: Arc<dyn RegistrationNotifier>,
    notice: RegistrationNotice,
) -> JoinHandle<()> {
    let span = tracing::info_span!("registration_notice", email = %notice.email);

    tokio::spawn(
        async move {
            match notifier.send_registration_notice(&notice).await {
                Ok(()) => info!("Registration notice delivered"),
                Err(e) => warn!(error = %e, "Registration notice failed, not retrying"),
            }
        }
        .instrument(span),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotifyError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingNotifier {
        sent: Mutex<Vec<RegistrationNotice>>,
    }

    #[async_trait]
    impl RegistrationNotifier for RecordingNotifier {
        async fn send_registration_notice(
            &self,
            notice: &RegistrationNotice,
        ) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(notice.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl RegistrationNotifier for FailingNotifier {
        async fn send_registration_notice(
            &self,
            _notice: &RegistrationNotice,
        ) -> Result<(), NotifyError> {
            Err(NotifyError::Transport("connection refused".to_string()))
        }
    }

    fn notice() -> RegistrationNotice {
        RegistrationNotice {
            email: "a@x.com".to_string(),
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_delivers_notice() {
        let notifier = Arc::new(RecordingNotifier {
            sent: Mutex::new(Vec::new()),
        });

        dispatch_registration_notice(notifier.clone(), notice())
            .await
            .unwrap();

        assert_eq!(notifier.sent.lock().unwrap().as_slice(), &[notice()]);
    }

    #[tokio::test]
    async fn test_dispatch_swallows_failure() {
        let handle = dispatch_registration_notice(Arc::new(FailingNotifier), notice());

        // The task completes normally even though the send failed
        assert!(handle.await.is_ok());
    }
}
