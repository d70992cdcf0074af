use std::collections::BTreeMap;

use foundation::LayerId;
use layers::LayerOptions;
use serde_json::Value;

use crate::native::NativeFeature;
use crate::protocol::NativeEvent;
use crate::renderer::NativeRenderer;

/// One call the bridge made into the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererOp {
    CreateLayer(LayerId),
    RemoveLayer(LayerId),
    AddFeature { layer: LayerId, id: String },
    UpdateFeature { layer: LayerId, id: String },
    RemoveFeature { layer: LayerId, id: String },
    ClearLayer(LayerId),
    DetachListeners(LayerId),
    AttachListeners(LayerId),
    RespondStyle { request_id: u64 },
}

#[derive(Debug)]
struct MemoryLayer {
    options: LayerOptions,
    features: Vec<NativeFeature>,
    listening: bool,
}

/// In-process renderer that keeps features in memory, logs every call and
/// queues the change notifications a real engine would fire.
///
/// Programmatic writes to a layer with attached listeners queue an event
/// just like user edits do.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    layers: BTreeMap<LayerId, MemoryLayer>,
    ops: Vec<RendererOp>,
    outbox: Vec<NativeEvent>,
    style_responses: BTreeMap<u64, Value>,
    next_request_id: u64,
    ignore_detach: bool,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep firing events while listeners are detached, like an engine
    /// whose listener removal does not take effect until the next tick.
    pub fn with_ignored_detach(mut self) -> Self {
        self.ignore_detach = true;
        self
    }

    pub fn ops(&self) -> &[RendererOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn has_layer(&self, layer: LayerId) -> bool {
        self.layers.contains_key(&layer)
    }

    pub fn layer_options(&self, layer: LayerId) -> Option<&LayerOptions> {
        self.layers.get(&layer).map(|l| &l.options)
    }

    pub fn is_listening(&self, layer: LayerId) -> bool {
        self.layers.get(&layer).is_some_and(|l| l.listening)
    }

    pub fn features(&self, layer: LayerId) -> &[NativeFeature] {
        self.layers
            .get(&layer)
            .map(|l| l.features.as_slice())
            .unwrap_or_default()
    }

    pub fn feature(&self, layer: LayerId, id: &str) -> Option<&NativeFeature> {
        self.features(layer).iter().find(|f| f.id == id)
    }

    pub fn pending_events(&self) -> &[NativeEvent] {
        &self.outbox
    }

    pub fn style_response(&self, request_id: u64) -> Option<&Value> {
        self.style_responses.get(&request_id)
    }

    /// Queues an arbitrary notification (map clicks, zoom, center).
    pub fn push_event(&mut self, event: NativeEvent) {
        self.outbox.push(event);
    }

    /// A user drew a new feature.
    pub fn draw(&mut self, layer: LayerId, feature: NativeFeature) {
        if let Some(l) = self.layers.get_mut(&layer) {
            l.features.push(feature.clone());
            if l.listening {
                self.outbox.push(NativeEvent::FeatureAdded { layer, feature });
            }
        }
    }

    /// A user edited an existing feature.
    pub fn modify(&mut self, layer: LayerId, feature: NativeFeature) {
        if let Some(l) = self.layers.get_mut(&layer) {
            upsert(&mut l.features, feature.clone());
            if l.listening {
                self.outbox
                    .push(NativeEvent::FeatureChanged { layer, feature });
            }
        }
    }

    /// A user deleted a feature.
    pub fn erase(&mut self, layer: LayerId, id: &str) {
        if let Some(l) = self.layers.get_mut(&layer) {
            l.features.retain(|f| f.id != id);
            if l.listening {
                self.outbox.push(NativeEvent::FeatureRemoved {
                    layer,
                    id: id.to_string(),
                });
            }
        }
    }

    pub fn click(&mut self, layer: LayerId, id: &str) {
        if self.is_listening(layer) {
            self.outbox.push(NativeEvent::FeatureClick {
                layer,
                id: id.to_string(),
            });
        }
    }

    /// Asks the host for the style of a feature. Returns the request id.
    pub fn request_style(&mut self, layer: LayerId, id: &str) -> Option<u64> {
        let feature = self.feature(layer, id)?.clone();
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.outbox.push(NativeEvent::StyleRequest {
            request_id,
            layer,
            feature,
        });
        Some(request_id)
    }

    fn emits(&self, layer: LayerId) -> bool {
        self.ignore_detach || self.is_listening(layer)
    }
}

fn upsert(features: &mut Vec<NativeFeature>, feature: NativeFeature) {
    match features.iter_mut().find(|f| f.id == feature.id) {
        Some(slot) => *slot = feature,
        None => features.push(feature),
    }
}

impl NativeRenderer for MemoryRenderer {
    fn create_layer(&mut self, options: &LayerOptions) {
        self.ops.push(RendererOp::CreateLayer(options.id));
        self.layers.insert(
            options.id,
            MemoryLayer {
                options: options.clone(),
                features: Vec::new(),
                listening: false,
            },
        );
    }

    fn remove_layer(&mut self, layer: LayerId) {
        self.ops.push(RendererOp::RemoveLayer(layer));
        self.layers.remove(&layer);
    }

    fn add_feature(&mut self, layer: LayerId, feature: NativeFeature) {
        self.ops.push(RendererOp::AddFeature {
            layer,
            id: feature.id.clone(),
        });
        let emits = self.emits(layer);
        if let Some(l) = self.layers.get_mut(&layer) {
            l.features.push(feature.clone());
            if emits {
                self.outbox.push(NativeEvent::FeatureAdded { layer, feature });
            }
        }
    }

    fn update_feature(&mut self, layer: LayerId, feature: NativeFeature) {
        self.ops.push(RendererOp::UpdateFeature {
            layer,
            id: feature.id.clone(),
        });
        let emits = self.emits(layer);
        if let Some(l) = self.layers.get_mut(&layer) {
            upsert(&mut l.features, feature.clone());
            if emits {
                self.outbox
                    .push(NativeEvent::FeatureChanged { layer, feature });
            }
        }
    }

    fn remove_feature(&mut self, layer: LayerId, id: &str) {
        self.ops.push(RendererOp::RemoveFeature {
            layer,
            id: id.to_string(),
        });
        let emits = self.emits(layer);
        if let Some(l) = self.layers.get_mut(&layer) {
            l.features.retain(|f| f.id != id);
            if emits {
                self.outbox.push(NativeEvent::FeatureRemoved {
                    layer,
                    id: id.to_string(),
                });
            }
        }
    }

    fn clear_layer(&mut self, layer: LayerId) {
        self.ops.push(RendererOp::ClearLayer(layer));
        let emits = self.emits(layer);
        if let Some(l) = self.layers.get_mut(&layer) {
            for f in l.features.drain(..) {
                if emits {
                    self.outbox
                        .push(NativeEvent::FeatureRemoved { layer, id: f.id });
                }
            }
        }
    }

    fn detach_listeners(&mut self, layer: LayerId) {
        self.ops.push(RendererOp::DetachListeners(layer));
        if let Some(l) = self.layers.get_mut(&layer) {
            l.listening = false;
        }
    }

    fn attach_listeners(&mut self, layer: LayerId) {
        self.ops.push(RendererOp::AttachListeners(layer));
        if let Some(l) = self.layers.get_mut(&layer) {
            l.listening = true;
        }
    }

    fn respond_style(&mut self, request_id: u64, style: Value) {
        self.ops.push(RendererOp::RespondStyle { request_id });
        self.style_responses.insert(request_id, style);
    }

    fn take_events(&mut self) -> Vec<NativeEvent> {
        std::mem::take(&mut self.outbox)
    }
}
