pub mod connector;
pub mod notifier;

pub use connector::Connector;
pub use notifier::Notifier;
