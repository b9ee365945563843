use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use rentcar::notify::{NotifyError, RegistrationNotice, RegistrationNotifier};

/// Notifier that records every notice it is asked to send
pub struct RecordingNotifier {
    sent: Mutex<Vec<RegistrationNotice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<RegistrationNotice> {
        self.sent.lock().unwrap().clone()
    }

    /// Polls until `count` notices have been recorded; delivery runs on its own task
    pub async fn wait_for(&self, count: usize) -> Vec<RegistrationNotice> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
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

/// Notifier whose relay is always down
pub struct FailingNotifier;

#[async_trait]
impl RegistrationNotifier for FailingNotifier {
    async fn send_registration_notice(
        &self,
        _notice: &RegistrationNotice,
    ) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}
