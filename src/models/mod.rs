pub mod provider;
pub mod vehicle;
pub mod waybill;
