use flowline_core::{Parameters, Tool, ToolFactory};

/// A [`ToolFactory`] backed by a closure.
///
/// Handy for registering tools that need nothing beyond their static
/// parameters, or for wiring test doubles.
pub struct FnToolFactory<F> {
    build: F,
}

impl<F> FnToolFactory<F>
where
    F: Fn(&Parameters) -> Box<dyn Tool> + Send + Sync,
{
    /// Wrap a closure as a factory.
    pub fn new(build: F) -> Self {
        Self { build }
    }
}

impl<F> ToolFactory for FnToolFactory<F>
where
    F: Fn(&Parameters) -> Box<dyn Tool> + Send + Sync,
{
    fn create(&self, static_parameters: &Parameters) -> Box<dyn Tool> {
        (self.build)(static_parameters)
    }
}

impl<F> std::fmt::Debug for FnToolFactory<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnToolFactory").finish_non_exhaustive()
    }
}
