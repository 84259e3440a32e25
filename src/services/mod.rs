pub mod booking_api;
pub mod funnel;
pub mod payment_service;
pub mod pricing_service;
pub mod session_store;
pub mod validation;
