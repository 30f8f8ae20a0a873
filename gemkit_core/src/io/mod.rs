//! Module for reading gene protein reaction rules into a Model
pub mod gpr_parse;
