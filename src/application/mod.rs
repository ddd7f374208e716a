// Application layer - Gateway port, entity cache, form sessions and views
pub mod edit_session;
pub mod entity_store;
pub mod error;
pub mod gateway;
pub mod view_selector;
pub mod views;

#[cfg(test)]
pub(crate) mod fake_gateway;
