pub mod position_service;
pub mod price_service;
pub mod taxonomy_service;
pub mod valuation_service;
