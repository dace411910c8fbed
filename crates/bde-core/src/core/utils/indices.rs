use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid atom index {value}: expected an integer in the range [1, {atom_count}]")]
pub struct InvalidIndexError {
    pub value: String,
    pub atom_count: usize,
}

/// A value that can be interpreted as a 1-based atom index.
///
/// Implemented for the primitive integer types and for `f64`, so that indices
/// coming from numeric arrays can be validated without a lossy cast.
pub trait AtomIndex: Copy + fmt::Display {
    /// Returns the value as a 1-based index, or `None` if it is negative,
    /// non-integral or not representable.
    fn to_one_based(self) -> Option<usize>;
}

macro_rules! impl_atom_index_for_int {
    ($($t:ty),*) => {
        $(
            impl AtomIndex for $t {
                #[inline]
                fn to_one_based(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }
            }
        )*
    };
}

impl_atom_index_for_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl AtomIndex for f64 {
    fn to_one_based(self) -> Option<usize> {
        if self.is_finite() && self.fract() == 0.0 && self >= 0.0 && self <= usize::MAX as f64 {
            Some(self as usize)
        } else {
            None
        }
    }
}

impl AtomIndex for f32 {
    fn to_one_based(self) -> Option<usize> {
        f64::from(self).to_one_based()
    }
}

/// Converts 1-based atom indices into a sorted, duplicate-free array of 0-based indices.
///
/// `values` may be any iterable, including one-shot iterators; a single index can be
/// passed as `[i]` or `Some(i)`.
///
/// # Errors
///
/// Returns [`InvalidIndexError`] for the first value that is non-integral or lies
/// outside `[1, atom_count]`.
pub fn coerce_indices<I>(values: I, atom_count: usize) -> Result<Vec<usize>, InvalidIndexError>
where
    I: IntoIterator,
    I::Item: AtomIndex,
{
    let mut indices = values
        .into_iter()
        .map(|value| match value.to_one_based() {
            Some(i) if (1..=atom_count).contains(&i) => Ok(i - 1),
            _ => Err(InvalidIndexError {
                value: value.to_string(),
                atom_count,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}
