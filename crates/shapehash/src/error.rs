use thiserror::Error;

/// Every error is terminal for the compilation attempt that produced it: no
/// partial plan is returned and nothing is retried. Hashing itself cannot
/// fail once a plan exists.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    #[error("declaration cycle through type {0}")]
    CycleDeclaration(&'static str),
    #[error("type {type_name} of kind {kind} cannot be hashed")]
    UnsupportedKind { type_name: &'static str, kind: &'static str },
    #[error("reference to aggregate {0} cannot be hashed")]
    RefToAggregate(&'static str),
    #[error(
        "element of array or slice must be a scalar or an aggregate without indirections, got {0}"
    )]
    InvalidSequenceElement(&'static str),
}
