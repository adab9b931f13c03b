use tracing::debug;

use crate::{
    cycle::CycleDeclChecker,
    error::ShapeError,
    mix,
    region::{RegionDescriptor, RegionKind},
    shape::{ShapeKind, TypeShape},
};

/// Compiled, immutable region sequence for one type shape. Carries no
/// per-call state, so a plan can be shared across threads freely.
#[derive(Debug, Clone)]
pub struct Plan {
    regions: Vec<RegionDescriptor>,
}

impl Plan {
    /// Walks `root` and compiles it into an ordered region sequence.
    pub fn compile(root: &'static TypeShape) -> Result<Self, ShapeError> {
        let mut builder =
            PlanBuilder { regions: Vec::new(), cycles: CycleDeclChecker::default(), root };
        builder.fill(root, 0, None, 0)?;
        let plan = Self { regions: builder.regions };
        debug!("compiled plan for {}: {} regions", root.name, plan.regions.len());
        Ok(plan)
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Folds every region of the value rooted at `base` into `seed` and
    /// returns the result, in plan order.
    ///
    /// # Safety
    /// `base` must point at a live, initialized value of the exact type this
    /// plan was compiled from.
    #[inline]
    pub unsafe fn hash_base(&self, base: *const u8, seed: usize) -> usize {
        let mut seed = seed;
        for region in &self.regions {
            let resolved = unsafe { region.resolve(base) };
            seed = unsafe { mix::fold(resolved.ptr, seed, resolved.len) };
        }
        seed
    }
}

struct PlanBuilder {
    regions: Vec<RegionDescriptor>,
    cycles: CycleDeclChecker,
    root: &'static TypeShape,
}

impl PlanBuilder {
    fn fill(
        &mut self,
        shape: &'static TypeShape,
        offset: usize,
        parent: Option<&'static TypeShape>,
        ref_depth: usize,
    ) -> Result<(), ShapeError> {
        self.cycles.note_node(shape);
        if let Some(parent) = parent {
            self.cycles.add_edge(parent, shape);
            if self.cycles.is_cycle(self.root) {
                return Err(ShapeError::CycleDeclaration(shape.name));
            }
        }

        match shape.kind {
            ShapeKind::Scalar => {
                self.push(offset, ref_depth, RegionKind::Scalar { size: shape.size });
            }
            ShapeKind::Text { read_header } => {
                self.push(offset, ref_depth, RegionKind::Text { read_header });
            }
            ShapeKind::Array { len, elem } => {
                let (len, elem) = flatten_array(len, elem);
                check_sequence_elem(elem)?;
                self.push(offset, ref_depth, RegionKind::FixedSeq { len, elem_size: elem.size });
            }
            ShapeKind::Slice { elem, read_header } => {
                check_sequence_elem(elem)?;
                self.push(offset, ref_depth, RegionKind::VarSeq { read_header });
            }
            ShapeKind::Struct { fields } => {
                for field in fields {
                    self.fill(field.shape, offset + field.offset, Some(shape), ref_depth)?;
                }
            }
            ShapeKind::Ref { target } => {
                if matches!(target.kind, ShapeKind::Struct { .. }) {
                    return Err(ShapeError::RefToAggregate(target.name));
                }
                self.fill(target, offset, Some(shape), ref_depth + 1)?;
            }
            ShapeKind::Map
            | ShapeKind::Channel
            | ShapeKind::Function
            | ShapeKind::Dynamic
            | ShapeKind::RawPointer => {
                return Err(ShapeError::UnsupportedKind {
                    type_name: shape.name,
                    kind: shape.kind.kind_name(),
                });
            }
        }
        Ok(())
    }

    fn push(&mut self, offset: usize, ref_depth: usize, kind: RegionKind) {
        self.regions.push(RegionDescriptor { offset, ref_depth, kind });
    }
}

/// Collapses nested fixed-size sequences into one length over the innermost
/// non-array element.
fn flatten_array(len: usize, elem: &'static TypeShape) -> (usize, &'static TypeShape) {
    let mut len = len;
    let mut elem = elem;
    while let ShapeKind::Array { len: inner, elem: inner_elem } = elem.kind {
        len *= inner;
        elem = inner_elem;
    }
    (len, elem)
}

/// A sequence is hashed as one contiguous run, so every element byte must be
/// in-line: no headers, no pointers, not even buried inside an aggregate or
/// a nested array.
fn elem_breaks_contiguity(shape: &TypeShape) -> bool {
    match shape.kind {
        ShapeKind::Ref { .. }
        | ShapeKind::Text { .. }
        | ShapeKind::Slice { .. }
        | ShapeKind::Map
        | ShapeKind::Channel
        | ShapeKind::Function
        | ShapeKind::Dynamic
        | ShapeKind::RawPointer => true,
        ShapeKind::Scalar => false,
        ShapeKind::Array { elem, .. } => elem_breaks_contiguity(elem),
        ShapeKind::Struct { fields } => fields.iter().any(|f| elem_breaks_contiguity(f.shape)),
    }
}

fn check_sequence_elem(elem: &TypeShape) -> Result<(), ShapeError> {
    if elem_breaks_contiguity(elem) {
        return Err(ShapeError::InvalidSequenceElement(elem.name));
    }
    Ok(())
}
