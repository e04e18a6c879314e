//! Mocked contract entrypoints for `TestHost` based tests. Built with `std`
//! so the tests of dependent contracts can use them too.
#[cfg(feature = "std")]
pub use inner::*;

#[cfg(feature = "std")]
mod inner {
    use concordium_std::test_infrastructure::MockFn;
    use concordium_std::*;

    pub fn parse_and_check_mock<D: Deserial, S>(
        check: impl Fn(&D) -> bool + 'static,
        return_value: impl Clone + Serial + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            let value =
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            if !check(&value) {
                return Err(CallContractError::Trap);
            };
            Ok((false, Some(return_value.clone())))
        })
    }

    pub fn parse_and_map_mock<D: Deserial, T: Serial, S>(
        f: impl Fn(&D) -> Option<T> + 'static,
    ) -> MockFn<S> {
        MockFn::new(move |parameter, _, _, _state| {
            let value =
                D::deserial(&mut Cursor::new(parameter)).map_err(|_| CallContractError::Trap)?;
            f(&value)
                .map(|r| (false, Some(r)))
                .ok_or(CallContractError::Trap)
        })
    }

    /// Entrypoint that always fails with the error `make_error` returns.
    pub fn failing_mock<S>(make_error: fn() -> CallContractError<Option<()>>) -> MockFn<S> {
        MockFn::new(move |_, _, _, _state| Err::<(bool, Option<Option<()>>), _>(make_error()))
    }
}
