pub mod billing_window;
pub mod calendar_month;
pub mod pagination;
pub mod subscriptions;
