use super::instantiate::InstantiateErrorKind;

#[derive(thiserror::Error, Debug)]
pub enum CloseErrorKind {
    #[error("unable to close container: {0}")]
    Closer(#[source] InstantiateErrorKind),
}
