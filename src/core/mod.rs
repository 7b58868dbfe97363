pub mod pricing;
pub mod risk;
