use crate::{closer::Closer, dependency_resolver::Dependencies, errors::InstantiateErrorKind};

/// Constructor function of a definition.
///
/// Implemented for closures `FnMut(T1, .., Tn) -> Result<Provides, Error>` with every `Ti` injectable.
/// Constructors that allocate a resource return it together with a [`Closer`] and are wrapped with [`with_closer`].
pub trait Instantiator<Deps>: Clone + Send + Sync + 'static
where
    Deps: Dependencies,
{
    type Provides: Send + Sync + 'static;
    type Error: Into<InstantiateErrorKind>;

    fn instantiate(&mut self, dependencies: Deps) -> Result<(Self::Provides, Option<Closer>), Self::Error>;
}

/// Constructor that returns a teardown callback alongside the instance
#[derive(Clone)]
pub struct WithCloser<F>(F);

/// Wraps a constructor `FnMut(T1, .., Tn) -> Result<(Provides, Closer), Error>`
#[inline]
#[must_use]
pub const fn with_closer<F>(f: F) -> WithCloser<F> {
    WithCloser(f)
}

macro_rules! impl_instantiator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for F
        where
            F: FnMut($($ty,)*) -> Result<Response, Err> + Clone + Send + Sync + 'static,
            Response: Send + Sync + 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: crate::DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            #[inline]
            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<(Self::Provides, Option<Closer>), Self::Error> {
                self($($ty,)*).map(|provides| (provides, None))
            }
        }

        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> Instantiator<($($ty,)*)> for WithCloser<F>
        where
            F: FnMut($($ty,)*) -> Result<(Response, Closer), Err> + Clone + Send + Sync + 'static,
            Response: Send + Sync + 'static,
            Err: Into<InstantiateErrorKind>,
            $( $ty: crate::DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            #[inline]
            fn instantiate(&mut self, ($($ty,)*): ($($ty,)*)) -> Result<(Self::Provides, Option<Closer>), Self::Error> {
                (self.0)($($ty,)*).map(|(provides, closer)| (provides, Some(closer)))
            }
        }
    };
}

all_the_tuples!(impl_instantiator);

#[cfg(test)]
mod tests {
    use super::{with_closer, Instantiator};
    use crate::{closer::Closer, dependency_resolver::Dependencies, errors::InstantiateErrorKind};

    use alloc::sync::Arc;

    fn instantiate<Deps: Dependencies, Inst: Instantiator<Deps>>(
        mut instantiator: Inst,
        dependencies: Deps,
    ) -> (Inst::Provides, bool) {
        let result: Result<_, InstantiateErrorKind> = instantiator.instantiate(dependencies).map_err(Into::into);
        let (provides, closer) = result.unwrap();
        (provides, closer.is_some())
    }

    #[test]
    fn test_closure_instantiator() {
        let (provides, has_closer) = instantiate(
            |a: Arc<u32>, b: Arc<u32>| Ok::<_, InstantiateErrorKind>(*a + *b),
            (Arc::new(1), Arc::new(2)),
        );

        assert_eq!(provides, 3);
        assert!(!has_closer);
    }

    #[test]
    fn test_with_closer_instantiator() {
        let (provides, has_closer) = instantiate(
            with_closer(|| Ok::<_, InstantiateErrorKind>(("connection", Closer::infallible(|| {})))),
            (),
        );

        assert_eq!(provides, "connection");
        assert!(has_closer);
    }

    #[test]
    fn test_instantiator_error() {
        let mut instantiator = |value: Arc<i32>| {
            if *value < 0 {
                return Err(anyhow::anyhow!("negative value"));
            }
            Ok(*value)
        };

        let err = instantiator.instantiate((Arc::new(-1),)).unwrap_err();
        assert_eq!(err.to_string(), "negative value");
    }
}
