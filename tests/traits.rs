use std::{fmt::Debug, hash::Hash, rc::Rc};

use oneof::{Variant, markers::Monostate};
use static_assertions::{assert_impl_all, assert_not_impl_any, const_assert, const_assert_eq};

// Copying, comparing and formatting are available exactly when every
// alternative supports them.
assert_impl_all!(Variant<(u8, String)>: Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash);
assert_impl_all!(Variant<(Monostate, f64)>: Clone, Debug, PartialEq, PartialOrd);
assert_not_impl_any!(Variant<(Monostate, f64)>: Eq, Ord, Hash);

struct Opaque;

assert_impl_all!(Variant<(u8, Opaque)>: Send, Sync);
assert_not_impl_any!(Variant<(u8, Opaque)>: Clone, Debug, PartialEq);
assert_impl_all!(Variant<(u8, Opaque)>: Default);
assert_impl_all!(Variant<(Opaque, u8)>: Send);
assert_not_impl_any!(Variant<(Opaque, u8)>: Default);

// Thread safety follows the alternatives.
assert_not_impl_any!(Variant<(u8, Rc<u8>)>: Send, Sync);
assert_impl_all!(Variant<(u8, std::sync::Arc<u8>)>: Send, Sync);

// The storage is as large as the largest alternative, plus the discriminant.
const_assert!(size_of::<Variant<(u8, u64)>>() <= 2 * size_of::<u64>());
const_assert_eq!(align_of::<Variant<(u8, u128)>>(), align_of::<u128>());
const_assert_eq!(Variant::<(u8, u16, u32, u64, i8, i16, i32, i64)>::LEN, 8);
