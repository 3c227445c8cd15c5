use crate::{BoxError, Command};

pub fn default_factory<C: Command + Default + 'static>() -> Result<Box<dyn Command>, BoxError> {
    Ok(Box::new(C::default()))
}

/// Lets a custom setter return either `()` or a `Result`.
pub trait IntoSetterResult {
    fn into_setter_result(self) -> Result<(), BoxError>;
}

impl IntoSetterResult for () {
    fn into_setter_result(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E: Into<BoxError>> IntoSetterResult for Result<(), E> {
    fn into_setter_result(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}
