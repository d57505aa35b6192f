pub mod asset;
pub mod class;
pub mod event;
pub mod ledger;
pub mod position;
pub mod price;
pub mod report;
pub mod settings;
