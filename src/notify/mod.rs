// Public API - what other modules can use
pub use dispatch::dispatch_registration_notice;
pub use notifier::{
    LoggingNotifier, NotifyError, RegistrationNotice, RegistrationNotifier, SmtpNotifier,
};

// Internal modules
mod dispatch;
mod notifier;
