pub mod ports;
pub mod event_bus;
pub mod history;
pub mod exchange;
pub mod coordinator;
