//! Tangent vector fields on closed triangle surfaces.
//!
//! Trivial connections with prescribed singularities and the discrete
//! Hodge decomposition of 1-forms, both built on discrete exterior calculus
//! over a half-edge mesh.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod cochain;
pub mod config;
pub mod connection;
pub mod error;
pub mod hodge;
pub mod homology;
pub mod linalg;
pub mod mesh;
pub mod operators;
pub mod problems;
pub mod sign;
pub mod sparse;
pub mod whitney;

pub use config::SolverConfig;
pub use error::{Error, Result};

pub type Dim = usize;
