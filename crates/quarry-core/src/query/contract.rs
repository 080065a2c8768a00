use crate::{
    args::Arguments,
    error::Error,
    query::{facet::Facets, grid::GridReader, split::RowParts},
    traits::FromRow,
};
use async_trait::async_trait;

///
/// SqlQuery
///
/// Single- and multi-row query whose rows map onto `Output`.
/// Used by the `query_*` family and, with `Output = u64`, by `execute`.
///

pub trait SqlQuery: Send + Sync {
    type Output: FromRow;

    fn sql(&self) -> &str;

    fn arguments(&self) -> Arguments {
        Arguments::new()
    }

    fn facets(&self) -> Facets {
        Facets::new()
    }
}

///
/// MapQuery
///
/// Join query whose rows are split into two or three parts and combined into
/// `Output` by [`MapQuery::map`].
///

pub trait MapQuery: Send + Sync {
    type Parts: RowParts;
    type Output: Clone + Send + Sync + 'static;

    fn sql(&self) -> &str;

    fn arguments(&self) -> Arguments {
        Arguments::new()
    }

    fn facets(&self) -> Facets {
        Facets::new()
    }

    /// Column names where each part after the first begins.
    ///
    /// Matched case-insensitively; the last name repeats when fewer names
    /// than split points are given.
    fn split_on(&self) -> &[&str] {
        &["id"]
    }

    fn map(&self, parts: Self::Parts) -> Self::Output;
}

///
/// MultipleQuery
/// Query returning several result sets, assembled into one value.
///

#[async_trait]
pub trait MultipleQuery: Send + Sync {
    type Output: Clone + Send + Sync + 'static;

    fn sql(&self) -> &str;

    fn arguments(&self) -> Arguments {
        Arguments::new()
    }

    fn facets(&self) -> Facets {
        Facets::new()
    }

    async fn assemble(&self, grid: &mut GridReader<'_>) -> Result<Self::Output, Error>;
}

///
/// StreamQuery
/// Reads the first column of the first row as a live byte stream.
///

pub trait StreamQuery: Send + Sync {
    fn sql(&self) -> &str;

    fn arguments(&self) -> Arguments {
        Arguments::new()
    }

    fn facets(&self) -> Facets {
        Facets::new()
    }
}
