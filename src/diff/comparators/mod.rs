//! One comparator per value category.

mod lazy;
mod mapping;
mod null;
mod numeric;
mod scalar;
mod sequence;
mod unordered;

pub use lazy::LazyComparator;
pub use mapping::MappingComparator;
pub use null::NullComparator;
pub use numeric::{numbers_equal, NumericComparator};
pub use scalar::ScalarComparator;
pub use sequence::SequenceComparator;
pub use unordered::UnorderedComparator;

use super::walker::GraphWalker;
use super::{Category, CategoryComparator};

/// The comparator responsible for `category`.
pub(crate) fn comparator_for(category: Category) -> &'static dyn CategoryComparator {
    match category {
        Category::Numeric => &NumericComparator,
        Category::Scalar => &ScalarComparator,
        Category::Lazy => &LazyComparator,
        Category::Sequence => &SequenceComparator,
        Category::Unordered => &UnorderedComparator,
        Category::Mapping => &MappingComparator,
        Category::Record => &GraphWalker,
        Category::Null => &NullComparator,
    }
}
