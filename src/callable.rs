use crate::{dependency_resolver::Dependencies, errors::InstantiateErrorKind};

/// Function invoked by [`crate::Container::call`] with injected arguments
pub trait Callable<Deps>
where
    Deps: Dependencies,
{
    type Output;

    fn call(self, dependencies: Deps) -> Result<Self::Output, InstantiateErrorKind>;
}

/// Return type of a [`Callable`]: nothing, or a result whose error is propagated to the caller
pub trait CallResult {
    type Output;

    fn into_result(self) -> Result<Self::Output, InstantiateErrorKind>;
}

impl CallResult for () {
    type Output = ();

    #[inline]
    fn into_result(self) -> Result<Self::Output, InstantiateErrorKind> {
        Ok(())
    }
}

impl<T, E> CallResult for Result<T, E>
where
    E: Into<InstantiateErrorKind>,
{
    type Output = T;

    #[inline]
    fn into_result(self) -> Result<Self::Output, InstantiateErrorKind> {
        self.map_err(Into::into)
    }
}

macro_rules! impl_callable {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, R, $($ty,)*> Callable<($($ty,)*)> for F
        where
            F: FnOnce($($ty,)*) -> R,
            R: CallResult,
            $( $ty: crate::DependencyResolver, )*
        {
            type Output = R::Output;

            #[inline]
            fn call(self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Output, InstantiateErrorKind> {
                self($($ty,)*).into_result()
            }
        }
    };
}

all_the_tuples!(impl_callable);
