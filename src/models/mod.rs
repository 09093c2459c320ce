pub mod client;
pub mod transaction;
pub mod transaction_item;
