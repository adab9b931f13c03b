mod cycle;
mod error;
mod hasher;
mod mix;
mod plan;
mod region;
mod shape;

pub use error::ShapeError;
pub use hasher::Hasher;
pub use plan::Plan;
pub use region::{HeaderFn, RawRegion};
pub use shape::{FieldShape, Shape, ShapeKind, TypeShape};
pub use shapehash_derive::Shape;
