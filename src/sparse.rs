//! Sparse matrices for the mostly-zero TF-IDF features.
//!
//! Dense tables are first converted into the coordinate format,
//! which is then compressed by rows for the solver.

pub use self::coo::CooMatrix;
pub use self::csr::CsrMatrix;

pub mod coo;
pub mod csr;
