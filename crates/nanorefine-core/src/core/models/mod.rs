//! # Core Models Module
//!
//! Data structures representing candidate structures and the support they are built on.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom: element symbol, Cartesian position and integer tag
//! - [`constraint`] - Geometric constraints carried by a structure during relaxation
//! - [`structure`] - A periodic structure with an optional attached potential energy
//! - [`template`] - The clean support (surface slab) onto which cluster atoms are added
//!
//! ## Usage
//!
//! ```ignore
//! use nanorefine::core::models::{atom::Atom, structure::Structure, template::Template};
//! use nalgebra::Point3;
//!
//! let template = Template::fcc111("Pt", (3, 3, 3), 3.92, 20.0)?;
//! let structure = template
//!     .structure()
//!     .clone()
//!     .with_atom(Atom::new("O", Point3::new(1.0, 1.0, 12.0)));
//! ```

pub mod atom;
pub mod constraint;
pub mod structure;
pub mod template;
