use foundation::LayerId;
use layers::LayerOptions;
use serde_json::Value;

use crate::native::NativeFeature;
use crate::protocol::NativeEvent;

/// The externally owned rendering engine, as seen by the bridge.
///
/// Calls are fire-and-forget. Notifications are queued by the renderer and
/// collected with [`NativeRenderer::take_events`]; while a layer's listeners
/// are detached the renderer should not queue events for it.
pub trait NativeRenderer {
    fn create_layer(&mut self, options: &LayerOptions);

    fn remove_layer(&mut self, layer: LayerId);

    fn add_feature(&mut self, layer: LayerId, feature: NativeFeature);

    fn update_feature(&mut self, layer: LayerId, feature: NativeFeature);

    fn remove_feature(&mut self, layer: LayerId, id: &str);

    fn clear_layer(&mut self, layer: LayerId);

    fn detach_listeners(&mut self, layer: LayerId);

    fn attach_listeners(&mut self, layer: LayerId);

    /// Answers a `StyleRequest`; `style` is serialized style layers.
    fn respond_style(&mut self, request_id: u64, style: Value);

    fn take_events(&mut self) -> Vec<NativeEvent>;
}
