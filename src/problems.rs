//! Classic geometry processing problems built on the vertex operators.

pub mod curvature_flow;
pub mod poisson;
