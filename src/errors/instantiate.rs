/// Error of user-supplied construction logic: a constructor, a closer or a called function
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}
