use std::{
    fmt::{Display, Formatter},
    num::NonZeroU32,
};

/// The id associated to a package variant in a
/// [`Repository`](crate::Repository).
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct PackageId(pub u32);

impl PackageId {
    pub(crate) fn from_usize(x: usize) -> Self {
        Self(x as u32)
    }

    pub(crate) fn to_usize(self) -> usize {
        self.0 as usize
    }
}

/// The SAT variable assigned to a package the first time it enters the
/// discovered closure.
///
/// Ids are unique, dense and start at 1, matching the DIMACS convention of
/// the solver backend. A signed occurrence of a variable is a
/// [`Literal`](crate::Literal).
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct VariableId(NonZeroU32);

impl VariableId {
    pub(crate) fn from_usize(x: usize) -> Self {
        // Variable ids are offset by one so that id 0 never exists and the
        // DIMACS sign encoding stays unambiguous.
        let id = u32::try_from(x + 1).expect("variable id too big");
        Self(NonZeroU32::new(id).expect("variable id is offset by one"))
    }

    pub(crate) fn to_usize(self) -> usize {
        (self.0.get() - 1) as usize
    }

    /// The signed-integer magnitude of this variable in DIMACS terms.
    pub fn to_dimacs(self) -> i32 {
        self.0.get() as i32
    }
}

impl Display for VariableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_id_is_dense_from_one() {
        assert_eq!(VariableId::from_usize(0).to_dimacs(), 1);
        assert_eq!(VariableId::from_usize(41).to_dimacs(), 42);
        assert_eq!(VariableId::from_usize(7).to_usize(), 7);
    }

    #[test]
    fn variable_id_niche() {
        // An Option<VariableId> should not grow beyond the id itself.
        assert_eq!(
            std::mem::size_of::<VariableId>(),
            std::mem::size_of::<Option<VariableId>>()
        );
    }
}
