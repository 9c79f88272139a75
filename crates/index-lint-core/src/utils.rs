//! Utility functions shared by the resolver, the boundary walk and rules.

pub mod paths;

#[doc(inline)]
pub use paths::{ancestors_of, is_relative_specifier, normalize, relative_specifier};
