//! Host extension points for per-feature styling on `custom_style` layers.
//!
//! Returning `None` falls back to the built-in resolver.

use foundation::View;
use futures_util::future::BoxFuture;
use layers::StyleLayer;
use scene::Shape;

pub trait StyleCallback {
    fn style(&mut self, shape: &Shape, view: &View) -> Option<Vec<StyleLayer>>;
}

impl<F> StyleCallback for F
where
    F: FnMut(&Shape, &View) -> Option<Vec<StyleLayer>>,
{
    fn style(&mut self, shape: &Shape, view: &View) -> Option<Vec<StyleLayer>> {
        self(shape, view)
    }
}

pub type StyleFuture = BoxFuture<'static, Option<Vec<StyleLayer>>>;

/// Asynchronous variant; the returned future owns its inputs.
pub trait AsyncStyleCallback: Send + Sync {
    fn style(&self, shape: Shape, view: View) -> StyleFuture;
}

impl<F> AsyncStyleCallback for F
where
    F: Fn(Shape, View) -> StyleFuture + Send + Sync,
{
    fn style(&self, shape: Shape, view: View) -> StyleFuture {
        self(shape, view)
    }
}
