//! Memoization cells for the selector graph.
//!
//! Each cell caches one output keyed by the identity of its inputs. Shared
//! data behind an [`Arc`] is keyed by pointer, so replacing the data
//! invalidates every cell that reads it while untouched data stays cached.
//! Small settings types are keyed by value.

use std::sync::Arc;

use chrono::TimeDelta;
use wdh_series::series::{Period, TimeRange, TsKey};

use crate::state::ShowSeries;

/// An input a memo cell can key on.
pub trait SelectorInput {
    type Key: PartialEq;

    fn key(&self) -> Self::Key;
}

/// Pointer-identity key for shared data. Holding a clone of the `Arc`
/// keeps the cached input alive, so its address can never be reused by a
/// later allocation and compare equal to a different value.
pub struct ArcKey<T: ?Sized>(Arc<T>);

impl<T: ?Sized> PartialEq for ArcKey<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Shared data keys on pointer identity, not content.
impl<T: ?Sized> SelectorInput for Arc<T> {
    type Key = ArcKey<T>;

    fn key(&self) -> ArcKey<T> {
        ArcKey(Arc::clone(self))
    }
}

impl<T: SelectorInput> SelectorInput for Option<T> {
    type Key = Option<T::Key>;

    fn key(&self) -> Self::Key {
        self.as_ref().map(SelectorInput::key)
    }
}

macro_rules! value_input {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SelectorInput for $ty {
                type Key = $ty;

                fn key(&self) -> $ty {
                    self.clone()
                }
            }
        )*
    };
}

value_input!(
    bool,
    u32,
    i64,
    String,
    TimeDelta,
    TimeRange,
    Period,
    ShowSeries,
);

macro_rules! define_memo {
    ($name:ident, $(($p:ident, $arg:ident)),+) => {
        pub struct $name<$($p: SelectorInput,)+ T> {
            cached: Option<(($($p::Key,)+), Arc<T>)>,
        }

        impl<$($p: SelectorInput,)+ T> Default for $name<$($p,)+ T> {
            fn default() -> Self {
                $name { cached: None }
            }
        }

        impl<$($p: SelectorInput,)+ T> $name<$($p,)+ T> {
            /// Return the cached output when every input key matches the
            /// previous call, otherwise recompute and cache.
            pub fn get(&mut self, $($arg: &$p,)+ compute: impl FnOnce() -> T) -> Arc<T> {
                let key = ($($arg.key(),)+);
                if let Some((cached_key, out)) = &self.cached {
                    if *cached_key == key {
                        return Arc::clone(out);
                    }
                }
                let out = Arc::new(compute());
                self.cached = Some((key, Arc::clone(&out)));
                out
            }
        }
    };
}

define_memo!(Memo1, (A, a));
define_memo!(Memo2, (A, a), (B, b));
define_memo!(Memo3, (A, a), (B, b), (C, c));
define_memo!(Memo4, (A, a), (B, b), (C, c), (D, d));
define_memo!(Memo5, (A, a), (B, b), (C, c), (D, d), (E, e));

/// One value per series slot.
#[derive(Default)]
pub struct PerTsKey<T> {
    pub current: T,
    pub compare: T,
    pub median: T,
}

impl<T> PerTsKey<T> {
    pub fn get_mut(&mut self, ts_key: TsKey) -> &mut T {
        match ts_key {
            TsKey::Current => &mut self.current,
            TsKey::Compare => &mut self.compare,
            TsKey::Median => &mut self.median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memo1_caches_on_equal_key() {
        let mut cell: Memo1<u32, u32> = Memo1::default();
        let mut calls = 0;
        let first = cell.get(&7, || {
            calls += 1;
            7 * 2
        });
        let second = cell.get(&7, || {
            calls += 1;
            7 * 2
        });
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, 14);
    }

    #[test]
    fn test_memo1_recomputes_on_new_key() {
        let mut cell: Memo1<u32, u32> = Memo1::default();
        let mut calls = 0;
        cell.get(&1, || {
            calls += 1;
            1
        });
        let out = cell.get(&2, || {
            calls += 1;
            4
        });
        assert_eq!(calls, 2);
        assert_eq!(*out, 4);
    }

    #[test]
    fn test_arc_input_keys_on_pointer() {
        let mut cell: Memo1<Arc<Vec<u32>>, usize> = Memo1::default();
        let data = Arc::new(vec![1, 2, 3]);
        let same_content = Arc::new(vec![1, 2, 3]);
        let mut calls = 0;
        cell.get(&data, || {
            calls += 1;
            data.len()
        });
        cell.get(&data, || {
            calls += 1;
            data.len()
        });
        assert_eq!(calls, 1);
        cell.get(&same_content, || {
            calls += 1;
            same_content.len()
        });
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_dropped_input_never_hits_the_cache() {
        let mut cell: Memo1<Arc<Vec<u32>>, u32> = Memo1::default();
        let first = Arc::new(vec![1, 2, 3]);
        assert_eq!(*cell.get(&first, || first.iter().sum()), 6);
        drop(first);
        // The cached key keeps the old input alive, so this fresh
        // allocation cannot land at the old address and alias it.
        let second = Arc::new(vec![100, 200, 300]);
        assert_eq!(*cell.get(&second, || second.iter().sum()), 600);
    }

    #[test]
    fn test_memo2_invalidates_on_either_input() {
        let mut cell: Memo2<u32, bool, u32> = Memo2::default();
        let mut calls = 0;
        cell.get(&1, &true, || {
            calls += 1;
            1
        });
        cell.get(&1, &false, || {
            calls += 1;
            2
        });
        cell.get(&2, &false, || {
            calls += 1;
            3
        });
        assert_eq!(calls, 3);
    }
}
