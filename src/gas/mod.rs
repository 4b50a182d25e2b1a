pub mod bips;
pub mod error;
pub mod gas_config;
pub mod pricing;

pub use bips::{
    Bips, ONE_IN_BIPS, approx_exp_basis_points, mul_by_bips, natural_to_bips, percent_to_bips,
};
pub use error::*;
pub use gas_config::*;
pub use pricing::*;
