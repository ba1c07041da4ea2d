//! Alerting collaborators for qualifying arbitrage results.

/// Slack notifier
mod slack;

pub use slack::SlackNotifier;
