//! Benchmarks comparing [`skipset::SkipSet`] with the standard library's
//! [`BTreeSet`](std::collections::BTreeSet).

#[macro_use]
extern crate criterion;


criterion_group!(
    benches,
    crate::skipset::insert,
    crate::skipset::find,
    crate::skipset::erase,
    crate::skipset::bounds,
    crate::skipset::iter,
    crate::btreeset::insert,
    crate::btreeset::find,
    crate::btreeset::iter
);
criterion_main!(benches);
