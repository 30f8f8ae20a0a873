//! Core rust implementation of gemkit, a crate for curating genome scale metabolic models.
//!
//! The [`metabolic_model`] module holds the model and the gene-reaction association graph,
//! [`io::gpr_parse`] reads textual gene protein reaction rules into it, [`evidence`] attaches
//! literature backed assertions to the entities of the model, and [`model_test`] provides
//! reversible settings for what-if tests.
pub mod configuration;
pub mod evidence;
pub mod io;
pub mod metabolic_model;
pub mod model_test;
