use crate::{
    error::Error,
    mapping::{RowBinding, TypeRegistry},
    row::{Row, RowView},
    traits::FromRow,
};
use std::ops::Range;

///
/// RowParts
///
/// Tuple of row shapes a joined row is split into: `(A, B)` or `(A, B, C)`.
///

pub trait RowParts: Sized + Send + 'static {
    const ARITY: usize;

    /// Register every part type.
    fn ensure_registered(registry: &TypeRegistry);

    /// Bind each part against its own column segment.
    fn bindings(
        registry: &TypeRegistry,
        columns: &[String],
        bounds: &[Range<usize>],
    ) -> Vec<Option<RowBinding>>;

    fn from_segments(row: &Row, segments: &Segments) -> Result<Self, Error>;
}

macro_rules! impl_row_parts {
    ($arity:literal; $($part:ident $idx:tt),+) => {
        impl<$($part: FromRow),+> RowParts for ($($part,)+) {
            const ARITY: usize = $arity;

            fn ensure_registered(registry: &TypeRegistry) {
                $(registry.ensure_registered::<$part>();)+
            }

            fn bindings(
                registry: &TypeRegistry,
                columns: &[String],
                bounds: &[Range<usize>],
            ) -> Vec<Option<RowBinding>> {
                vec![$(
                    bounds
                        .get($idx)
                        .and_then(|range| columns.get(range.clone()))
                        .and_then(|segment| registry.binding_for::<$part>(segment)),
                )+]
            }

            fn from_segments(row: &Row, segments: &Segments) -> Result<Self, Error> {
                Ok(($($part::from_row(segments.view(row, $idx))?,)+))
            }
        }
    };
}

impl_row_parts!(2; A 0, B 1);
impl_row_parts!(3; A 0, B 1, C 2);

///
/// Segments
///
/// Column ranges and bindings for each part of a split row.
/// Planned once per result set and reused for every row.
///

#[derive(Clone, Debug)]
pub struct Segments {
    bounds: Vec<Range<usize>>,
    bindings: Vec<Option<RowBinding>>,
}

impl Segments {
    pub fn plan<P: RowParts>(
        registry: &TypeRegistry,
        columns: &[String],
        split_on: &[&str],
    ) -> Result<Self, Error> {
        let bounds = split_bounds(columns, split_on, P::ARITY)?;
        let bindings = P::bindings(registry, columns, &bounds);

        Ok(Self { bounds, bindings })
    }

    #[must_use]
    pub fn bounds(&self) -> &[Range<usize>] {
        &self.bounds
    }

    /// View of `row` restricted to part `part`.
    #[must_use]
    pub fn view<'a>(&'a self, row: &'a Row, part: usize) -> RowView<'a> {
        let range = self.bounds.get(part).cloned().unwrap_or(0..0);

        RowView::new(
            row.columns().get(range.clone()).unwrap_or_default(),
            row.values().get(range).unwrap_or_default(),
            self.bindings.get(part).and_then(Option::as_ref),
        )
    }
}

// Each split column is searched left to right, starting after the previous
// part's first column.
fn split_bounds(
    columns: &[String],
    split_on: &[&str],
    arity: usize,
) -> Result<Vec<Range<usize>>, Error> {
    let mut starts = vec![0];

    for part in 1..arity {
        let name = split_on
            .get(part - 1)
            .or_else(|| split_on.last())
            .copied()
            .unwrap_or("id");
        let from = starts.last().map_or(0, |s| s + 1);

        let at = columns
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, c)| c.eq_ignore_ascii_case(name))
            .map(|(i, _)| i)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "split column '{name}' not found at or after ordinal {from}; check split_on and column order"
                ))
            })?;

        starts.push(at);
    }

    let ends = starts.iter().skip(1).copied().chain([columns.len()]);

    Ok(starts.iter().zip(ends).map(|(&s, e)| s..e).collect())
}
