#[rustfmt::skip]
macro_rules! all_the_tuples {
    ($name:ident) => {
        $name!([]);
        $name!([T1]);
        $name!([T1, T2]);
        $name!([T1, T2, T3]);
        $name!([T1, T2, T3, T4]);
        $name!([T1, T2, T3, T4, T5]);
        $name!([T1, T2, T3, T4, T5, T6]);
        $name!([T1, T2, T3, T4, T5, T6, T7]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15]);
        $name!([T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15, T16]);
    };
}

/// Creates an [`Alias`](crate::Alias) that indexes a definition of `Type` under a trait object.
///
/// # Syntax
/// ```text
/// alias!(Type => dyn Trait [+ SuperTrait1 [+ SuperTrait2 ...]])
/// ```
///
/// # Examples
/// ```rust
/// use trellis::{alias, Alias};
///
/// trait UserRepo: Send + Sync {}
///
/// struct PostgresUserRepo;
///
/// impl UserRepo for PostgresUserRepo {}
///
/// let alias: Alias = alias!(PostgresUserRepo => dyn UserRepo);
/// let with_supertraits: Alias = alias!(PostgresUserRepo => dyn UserRepo + Send + Sync);
/// ```
#[macro_export]
macro_rules! alias {
    ($ty:ty => dyn $($bounds:tt)+) => {{
        $crate::Alias::new::<$ty, dyn $($bounds)+>(
            |value: ::std::sync::Arc<$ty>| -> ::std::sync::Arc<dyn $($bounds)+> { value },
        )
    }};
}
