//! Keeps per-layer host shape lists and the renderer in sync.
//!
//! Host writes flow host → renderer; renderer notifications flow renderer →
//! host. A host write never re-enters through the renderer's change events:
//! listeners are detached for the duration of the write and any event the
//! renderer still emits meanwhile is dropped as an echo.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;

use foundation::{FeatureId, LayerId, View};
use layers::{LayerOptions, StyleDefaults, StyleLayer, resolve};
use runtime::{EventBus, MapEvent, MapListener, PendingRequests, RequestTicket, Scope, SubscriptionId};
use scene::Shape;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::BridgeConfig;
use crate::convert::{ConversionContext, native_to_shape, shape_to_native, shape_to_native_styled};
use crate::error::BridgeError;
use crate::native::NativeFeature;
use crate::protocol::{NativeEvent, ShapeRecord};
use crate::renderer::NativeRenderer;
use crate::style_callback::{AsyncStyleCallback, StyleCallback, StyleFuture};

type StyleKey = (LayerId, FeatureId);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BridgeStats {
    pub host_writes: u64,
    pub native_events_applied: u64,
    pub native_events_dropped: u64,
    pub echoes_dropped: u64,
    pub translation_issues: u64,
    pub styles_answered: u64,
    pub stale_styles_dropped: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Arrived while a host write was in progress.
    Suspended,
    UnknownLayer,
    UnknownShape,
    Disposed,
}

#[derive(Debug)]
pub enum EventOutcome {
    Applied,
    Dropped(DropReason),
    StyleAnswered,
    /// An async style callback is computing the answer; run the job and hand
    /// the result to [`Bridge::complete_style`].
    StylePending(StyleJob),
}

/// An outstanding asynchronous style computation.
pub struct StyleJob {
    ticket: RequestTicket<StyleKey>,
    request_id: u64,
    shape: Shape,
    future: StyleFuture,
}

impl std::fmt::Debug for StyleJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleJob")
            .field("request_id", &self.request_id)
            .field("shape", self.shape.id())
            .field("generation", &self.ticket.generation)
            .finish_non_exhaustive()
    }
}

impl StyleJob {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub async fn run(self) -> StyleCompletion {
        let layers = self.future.await;
        StyleCompletion {
            ticket: self.ticket,
            request_id: self.request_id,
            shape: self.shape,
            layers,
        }
    }
}

#[derive(Debug)]
pub struct StyleCompletion {
    ticket: RequestTicket<StyleKey>,
    request_id: u64,
    shape: Shape,
    pub layers: Option<Vec<StyleLayer>>,
}

impl StyleCompletion {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }
}

#[derive(Debug)]
struct HostLayer {
    options: LayerOptions,
    shapes: Vec<Shape>,
    disposed: bool,
}

struct Prepared {
    shape: Shape,
    native: NativeFeature,
    previous_owner: Option<LayerId>,
}

pub struct Bridge<R: NativeRenderer> {
    renderer: R,
    config: BridgeConfig,
    defaults: StyleDefaults,
    view: View,
    layers: BTreeMap<LayerId, HostLayer>,
    bus: EventBus,
    pending: PendingRequests<StyleKey>,
    style_callback: Option<Box<dyn StyleCallback>>,
    async_style_callback: Option<Arc<dyn AsyncStyleCallback>>,
    disposed_shapes: HashSet<FeatureId>,
    // Renderer events parked while a host write runs.
    backlog: VecDeque<NativeEvent>,
    suspended: bool,
    stats: BridgeStats,
}

impl<R: NativeRenderer> Bridge<R> {
    pub fn new(renderer: R, config: BridgeConfig) -> Self {
        Self {
            renderer,
            config,
            defaults: StyleDefaults::default(),
            view: View::default(),
            layers: BTreeMap::new(),
            bus: EventBus::new(),
            pending: PendingRequests::new(),
            style_callback: None,
            async_style_callback: None,
            disposed_shapes: HashSet::new(),
            backlog: VecDeque::new(),
            suspended: false,
            stats: BridgeStats::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: StyleDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.view = view;
        self
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn defaults(&self) -> &StyleDefaults {
        &self.defaults
    }

    pub fn set_defaults(&mut self, defaults: StyleDefaults) {
        self.defaults = defaults;
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// True while a host write is being applied to the renderer.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn layer_options(&self, layer: LayerId) -> Option<&LayerOptions> {
        self.layers.get(&layer).map(|l| &l.options)
    }

    pub fn shapes(&self, layer: LayerId) -> Option<&[Shape]> {
        self.layers.get(&layer).map(|l| l.shapes.as_slice())
    }

    pub fn shape(&self, layer: LayerId, id: &FeatureId) -> Option<&Shape> {
        self.shapes(layer)?.iter().find(|s| s.id() == id)
    }

    /// Host-facing records of a layer's shapes, with resolved style values.
    pub fn records(&self, layer: LayerId) -> Vec<ShapeRecord> {
        self.shapes(layer)
            .unwrap_or_default()
            .iter()
            .map(|s| ShapeRecord::from_shape(s, &self.defaults))
            .collect()
    }

    pub fn events(&self) -> &[MapEvent] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.bus.drain()
    }

    pub fn subscribe(&mut self, scope: Scope, listener: Box<dyn MapListener>) -> SubscriptionId {
        self.bus.subscribe(scope, listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    pub fn set_style_callback(&mut self, callback: impl StyleCallback + 'static) {
        self.style_callback = Some(Box::new(callback));
    }

    pub fn set_async_style_callback(&mut self, callback: impl AsyncStyleCallback + 'static) {
        self.async_style_callback = Some(Arc::new(callback));
    }

    pub fn clear_style_callbacks(&mut self) {
        self.style_callback = None;
        self.async_style_callback = None;
    }

    pub fn pending_styles(&self) -> usize {
        self.pending.len()
    }

    pub fn is_disposed(&self, id: &FeatureId) -> bool {
        self.disposed_shapes.contains(id)
    }

    /// Registers a layer with the renderer. Re-adding a known layer updates
    /// its options and revives it if it was disposed.
    pub fn add_layer(&mut self, options: LayerOptions) {
        let id = options.id;
        match self.layers.get_mut(&id) {
            Some(layer) => {
                layer.options = options;
                layer.disposed = false;
            }
            None => {
                self.renderer.create_layer(&options);
                self.layers.insert(
                    id,
                    HostLayer {
                        options,
                        shapes: Vec::new(),
                        disposed: false,
                    },
                );
            }
        }
        self.renderer.attach_listeners(id);
        debug!(layer = %id, "layer added");
    }

    /// Removes a layer and returns its shapes, no longer owned by any layer.
    pub fn remove_layer(&mut self, layer: LayerId) -> Result<Vec<Shape>, BridgeError> {
        let host = self
            .layers
            .remove(&layer)
            .ok_or(BridgeError::UnknownLayer(layer))?;

        self.park_queued_events();
        self.renderer.detach_listeners(layer);
        self.renderer.remove_layer(layer);
        self.drop_echoes(layer);
        self.purge_backlog(layer, |_| true);

        self.bus.unsubscribe_layer(layer);
        self.pending.cancel_where(|(l, _)| *l == layer);

        let mut acks = Vec::with_capacity(host.shapes.len());
        let mut shapes = host.shapes;
        for shape in &mut shapes {
            acks.push(MapEvent::ShapeRemoved(shape.clone()));
            self.disposed_shapes.remove(shape.id());
            shape.detach();
        }
        self.stats.host_writes += 1;
        self.acknowledge(acks);
        Ok(shapes)
    }

    pub fn add_shape(&mut self, layer: LayerId, shape: Shape) -> Result<FeatureId, BridgeError> {
        let id = shape.id().clone();
        self.add_shapes(layer, [shape])?;
        Ok(id)
    }

    /// Adds shapes in one write. Either every shape converts and is added,
    /// or nothing changes. A shape already in the layer is replaced.
    pub fn add_shapes(
        &mut self,
        layer: LayerId,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> Result<Vec<FeatureId>, BridgeError> {
        let prepared = self.prepare(layer, shapes)?;
        self.release_from_previous_owners(layer, &prepared)?;

        let ids: Vec<FeatureId> = prepared.iter().map(|p| p.shape.id().clone()).collect();
        let mut acks = Vec::with_capacity(prepared.len());

        self.begin_write(layer);
        for Prepared { shape, native, .. } in prepared {
            self.disposed_shapes.remove(shape.id());
            let Some(host) = self.layers.get_mut(&layer) else {
                continue;
            };
            match host.shapes.iter_mut().find(|s| s.id() == shape.id()) {
                Some(slot) => {
                    *slot = shape.clone();
                    self.renderer.update_feature(layer, native);
                    acks.push(MapEvent::ShapeChanged(shape));
                }
                None => {
                    host.shapes.push(shape.clone());
                    self.renderer.add_feature(layer, native);
                    acks.push(MapEvent::ShapeAdded(shape));
                }
            }
        }
        self.end_write(layer);
        self.purge_backlog(layer, |id| ids.iter().any(|w| w.as_str() == id));

        self.acknowledge(acks);
        Ok(ids)
    }

    /// Removes a shape: native feature first, then ownership.
    pub fn remove_shape(&mut self, layer: LayerId, id: &FeatureId) -> Result<Shape, BridgeError> {
        let index = self.index_of(layer, id)?;

        self.begin_write(layer);
        self.renderer.remove_feature(layer, id.as_str());
        let mut shape = match self.layers.get_mut(&layer) {
            Some(host) => host.shapes.remove(index),
            None => {
                self.end_write(layer);
                return Err(BridgeError::UnknownLayer(layer));
            }
        };
        let snapshot = shape.clone();
        shape.detach();
        self.end_write(layer);
        self.purge_backlog(layer, |f| f == id.as_str());

        self.disposed_shapes.remove(id);
        self.pending.cancel(&(layer, id.clone()));
        self.acknowledge(vec![MapEvent::ShapeRemoved(snapshot)]);
        Ok(shape)
    }

    /// Re-resolves and replaces an existing shape.
    pub fn update_shape(&mut self, layer: LayerId, mut shape: Shape) -> Result<(), BridgeError> {
        let index = self.index_of(layer, shape.id())?;
        shape.attach(layer);
        let native = self.native_for(layer, &shape)?;

        self.begin_write(layer);
        self.renderer.update_feature(layer, native);
        if let Some(host) = self.layers.get_mut(&layer) {
            host.shapes[index] = shape.clone();
        }
        self.end_write(layer);
        self.purge_backlog(layer, |f| f == shape.id().as_str());

        self.acknowledge(vec![MapEvent::ShapeChanged(shape)]);
        Ok(())
    }

    /// Clears the layer and rebuilds it from `shapes`. Returns the old shapes.
    pub fn reset(
        &mut self,
        layer: LayerId,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> Result<Vec<Shape>, BridgeError> {
        let prepared = self.prepare(layer, shapes)?;
        self.release_from_previous_owners(layer, &prepared)?;

        let mut acks = Vec::new();
        self.begin_write(layer);
        self.renderer.clear_layer(layer);
        let mut old = match self.layers.get_mut(&layer) {
            Some(host) => std::mem::take(&mut host.shapes),
            None => Vec::new(),
        };
        for shape in &mut old {
            acks.push(MapEvent::ShapeRemoved(shape.clone()));
            self.disposed_shapes.remove(shape.id());
            shape.detach();
        }
        for Prepared { shape, native, .. } in prepared {
            self.disposed_shapes.remove(shape.id());
            self.renderer.add_feature(layer, native);
            if let Some(host) = self.layers.get_mut(&layer) {
                host.shapes.push(shape.clone());
            }
            acks.push(MapEvent::ShapeAdded(shape));
        }
        self.end_write(layer);
        self.purge_backlog(layer, |_| true);

        self.pending.cancel_where(|(l, _)| *l == layer);
        self.acknowledge(acks);
        Ok(old)
    }

    /// Stops delivering anything about `id`: its scoped listeners are
    /// removed, outstanding style requests cancelled, and later renderer
    /// events for it dropped. Adding the shape again revives it.
    pub fn dispose_shape(&mut self, id: &FeatureId) {
        self.bus.unsubscribe_shape(id);
        self.pending.cancel_where(|(_, f)| f == id);
        self.disposed_shapes.insert(id.clone());
        debug!(shape = %id, "shape disposed");
    }

    /// Detaches renderer listeners for the layer and drops its later events.
    pub fn dispose_layer(&mut self, layer: LayerId) -> Result<(), BridgeError> {
        let host = self
            .layers
            .get_mut(&layer)
            .ok_or(BridgeError::UnknownLayer(layer))?;
        host.disposed = true;
        self.renderer.detach_listeners(layer);
        self.bus.unsubscribe_layer(layer);
        self.pending.cancel_where(|(l, _)| *l == layer);
        debug!(layer = %layer, "layer disposed");
        Ok(())
    }

    /// Handles queued renderer events, at most `max_events_per_pump` per call.
    /// Returns the style jobs async callbacks produced.
    pub fn pump(&mut self) -> Vec<StyleJob> {
        self.park_queued_events();
        let take = self.backlog.len().min(self.config.max_events_per_pump);
        let events: Vec<NativeEvent> = self.backlog.drain(..take).collect();

        let mut jobs = Vec::new();
        for event in events {
            if let EventOutcome::StylePending(job) = self.handle_native_event(event) {
                jobs.push(job);
            }
        }
        jobs
    }

    /// Applies one renderer notification to the host side.
    pub fn handle_native_event(&mut self, event: NativeEvent) -> EventOutcome {
        let outcome = self.apply_native_event(event);
        match &outcome {
            EventOutcome::Dropped(reason) => {
                self.stats.native_events_dropped += 1;
                debug!(?reason, "native event dropped");
            }
            _ => self.stats.native_events_applied += 1,
        }
        outcome
    }

    /// Delivers an async style result. Returns false when the request was
    /// superseded or cancelled; the result is then dropped.
    pub fn complete_style(&mut self, completion: StyleCompletion) -> bool {
        if !self.pending.complete(&completion.ticket) {
            self.stats.stale_styles_dropped += 1;
            debug!(
                request_id = completion.request_id,
                "stale style result dropped"
            );
            return false;
        }
        let layers = match completion.layers {
            Some(layers) => Ok(layers),
            None => resolve(&completion.shape, &self.defaults, &self.view),
        };
        self.respond_style(completion.request_id, layers.map_err(BridgeError::from));
        true
    }

    fn apply_native_event(&mut self, event: NativeEvent) -> EventOutcome {
        if self.suspended {
            self.stats.echoes_dropped += 1;
            return EventOutcome::Dropped(DropReason::Suspended);
        }
        if let Some(layer) = event.layer() {
            match self.layers.get(&layer) {
                None => return EventOutcome::Dropped(DropReason::UnknownLayer),
                Some(host) if host.disposed => return EventOutcome::Dropped(DropReason::Disposed),
                Some(_) => {}
            }
        }
        if let Some(id) = event.feature_id()
            && self.disposed_shapes.contains(&FeatureId::from(id))
        {
            // The renderer no longer holds it; nothing further can arrive.
            if let NativeEvent::FeatureRemoved { id, .. } = &event {
                self.disposed_shapes.remove(&FeatureId::from(id.as_str()));
            }
            return EventOutcome::Dropped(DropReason::Disposed);
        }

        match event {
            NativeEvent::FeatureAdded { layer, feature }
            | NativeEvent::FeatureChanged { layer, feature } => {
                let shape = self.translate(layer, &feature);
                let Some(host) = self.layers.get_mut(&layer) else {
                    return EventOutcome::Dropped(DropReason::UnknownLayer);
                };
                let event = match host.shapes.iter_mut().find(|s| s.id() == shape.id()) {
                    Some(slot) => {
                        *slot = shape.clone();
                        MapEvent::ShapeChanged(shape)
                    }
                    None => {
                        host.shapes.push(shape.clone());
                        MapEvent::ShapeAdded(shape)
                    }
                };
                self.bus.emit(event);
                EventOutcome::Applied
            }
            NativeEvent::FeatureRemoved { layer, id } => {
                let id = FeatureId::from(id);
                let Some(host) = self.layers.get_mut(&layer) else {
                    return EventOutcome::Dropped(DropReason::UnknownLayer);
                };
                let Some(index) = host.shapes.iter().position(|s| s.id() == &id) else {
                    return EventOutcome::Dropped(DropReason::UnknownShape);
                };
                let snapshot = host.shapes.remove(index);
                self.pending.cancel(&(layer, id));
                self.bus.emit(MapEvent::ShapeRemoved(snapshot));
                EventOutcome::Applied
            }
            NativeEvent::FeatureClick { layer, id } => {
                let Some(shape) = self.shape(layer, &FeatureId::from(id)).cloned() else {
                    return EventOutcome::Dropped(DropReason::UnknownShape);
                };
                self.bus.emit(MapEvent::FeatureClick(shape.clone()));
                if shape.marker_kind().is_some() {
                    self.bus.emit(MapEvent::MarkerClick(shape));
                } else {
                    self.bus.emit(MapEvent::ShapeClick(shape));
                }
                EventOutcome::Applied
            }
            NativeEvent::MapClick { coordinate } => {
                let at = self.view.from_native(coordinate);
                self.bus.emit(MapEvent::MapClick(at));
                EventOutcome::Applied
            }
            NativeEvent::PointerMove { coordinate } => {
                let at = self.view.from_native(coordinate);
                self.bus.emit(MapEvent::PointerMove(at));
                EventOutcome::Applied
            }
            NativeEvent::ZoomChanged { zoom, resolution } => {
                self.view.zoom = zoom;
                self.view.resolution = resolution;
                self.bus.emit(MapEvent::ZoomChanged(zoom));
                EventOutcome::Applied
            }
            NativeEvent::CenterChanged { center } => {
                let center = self.view.from_native(center);
                self.view.center = center;
                self.bus.emit(MapEvent::CenterChanged(center));
                EventOutcome::Applied
            }
            NativeEvent::StyleRequest {
                request_id,
                layer,
                feature,
            } => self.answer_style_request(request_id, layer, &feature),
        }
    }

    fn answer_style_request(
        &mut self,
        request_id: u64,
        layer: LayerId,
        feature: &NativeFeature,
    ) -> EventOutcome {
        let known = self
            .shape(layer, &FeatureId::from(feature.id.as_str()))
            .cloned();
        let shape = match known {
            Some(shape) => shape,
            None => self.translate(layer, feature),
        };
        let custom = self
            .layers
            .get(&layer)
            .is_some_and(|l| l.options.custom_style);

        if custom {
            if let Some(callback) = self.style_callback.as_mut() {
                if let Some(layers) = callback.style(&shape, &self.view) {
                    self.respond_style(request_id, Ok(layers));
                    return EventOutcome::StyleAnswered;
                }
            } else if let Some(callback) = self.async_style_callback.clone() {
                let ticket = self.pending.begin((layer, shape.id().clone()));
                let future = callback.style(shape.clone(), self.view.clone());
                return EventOutcome::StylePending(StyleJob {
                    ticket,
                    request_id,
                    shape,
                    future,
                });
            }
        }

        let layers = resolve(&shape, &self.defaults, &self.view).map_err(BridgeError::from);
        self.respond_style(request_id, layers);
        EventOutcome::StyleAnswered
    }

    fn respond_style(&mut self, request_id: u64, layers: Result<Vec<StyleLayer>, BridgeError>) {
        let style = match layers {
            Ok(layers) => serde_json::to_value(layers).unwrap_or_default(),
            Err(e) => {
                warn!(request_id, error = %e, "answering style request with renderer default");
                Value::Null
            }
        };
        self.renderer.respond_style(request_id, style);
        self.stats.styles_answered += 1;
    }

    fn translate(&mut self, layer: LayerId, feature: &NativeFeature) -> Shape {
        let translation = native_to_shape(feature, &self.context());
        if !translation.issues.is_empty() {
            self.stats.translation_issues += translation.issues.len() as u64;
            for issue in &translation.issues {
                warn!(layer = %layer, id = %feature.id, %issue, "native feature translated with issue");
            }
        }
        let mut shape = translation.shape;
        shape.attach(layer);
        shape
    }

    fn context(&self) -> ConversionContext<'_> {
        ConversionContext {
            view: &self.view,
            defaults: &self.defaults,
            serialization_limit: self.config.serialization_limit,
        }
    }

    fn native_for(&mut self, layer: LayerId, shape: &Shape) -> Result<NativeFeature, BridgeError> {
        let custom = self
            .layers
            .get(&layer)
            .is_some_and(|l| l.options.custom_style);
        let custom_layers = match self.style_callback.as_mut() {
            Some(callback) if custom => callback.style(shape, &self.view),
            _ => None,
        };
        let ctx = self.context();
        match custom_layers {
            Some(layers) => shape_to_native_styled(shape, &ctx, &layers),
            None => shape_to_native(shape, &ctx),
        }
    }

    fn prepare(
        &mut self,
        layer: LayerId,
        shapes: impl IntoIterator<Item = Shape>,
    ) -> Result<Vec<Prepared>, BridgeError> {
        if !self.layers.contains_key(&layer) {
            return Err(BridgeError::UnknownLayer(layer));
        }
        let mut prepared = Vec::new();
        for mut shape in shapes {
            let previous_owner = shape.layer();
            shape.attach(layer);
            let native = self.native_for(layer, &shape)?;
            prepared.push(Prepared {
                shape,
                native,
                previous_owner,
            });
        }
        Ok(prepared)
    }

    /// A shape moving between layers leaves its old layer first.
    fn release_from_previous_owners(
        &mut self,
        layer: LayerId,
        prepared: &[Prepared],
    ) -> Result<(), BridgeError> {
        for p in prepared {
            if let Some(owner) = p.previous_owner
                && owner != layer
                && self.shape(owner, p.shape.id()).is_some()
            {
                self.remove_shape(owner, p.shape.id())?;
            }
        }
        Ok(())
    }

    fn index_of(&self, layer: LayerId, id: &FeatureId) -> Result<usize, BridgeError> {
        let host = self
            .layers
            .get(&layer)
            .ok_or(BridgeError::UnknownLayer(layer))?;
        host.shapes
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| BridgeError::UnknownShape {
                layer,
                id: id.clone(),
            })
    }

    fn begin_write(&mut self, layer: LayerId) {
        self.park_queued_events();
        self.suspended = true;
        self.renderer.detach_listeners(layer);
    }

    fn end_write(&mut self, layer: LayerId) {
        self.drop_echoes(layer);
        let disposed = self.layers.get(&layer).is_none_or(|l| l.disposed);
        if !disposed {
            self.renderer.attach_listeners(layer);
        }
        self.suspended = false;
        self.stats.host_writes += 1;
    }

    // Events queued before a write are genuine; keep them for the next pump.
    fn park_queued_events(&mut self) {
        let queued = self.renderer.take_events();
        self.backlog.extend(queued);
    }

    // Only the written layer's events are echoes; anything else the renderer
    // queued meanwhile is genuine.
    fn drop_echoes(&mut self, layer: LayerId) {
        let (echoes, others): (Vec<_>, Vec<_>) = self
            .renderer
            .take_events()
            .into_iter()
            .partition(|event| event.layer() == Some(layer));
        self.backlog.extend(others);
        if !echoes.is_empty() {
            debug!(count = echoes.len(), "dropping renderer echoes of a host write");
            self.stats.echoes_dropped += echoes.len() as u64;
        }
    }

    /// Parked edits of features a host write has since replaced or removed
    /// no longer describe the renderer.
    fn purge_backlog(&mut self, layer: LayerId, stale: impl Fn(&str) -> bool) {
        let before = self.backlog.len();
        self.backlog.retain(|event| {
            let edit = matches!(
                event,
                NativeEvent::FeatureAdded { .. }
                    | NativeEvent::FeatureChanged { .. }
                    | NativeEvent::FeatureRemoved { .. }
            );
            !(edit && event.layer() == Some(layer) && event.feature_id().is_some_and(|id| stale(id)))
        });
        let purged = before - self.backlog.len();
        if purged > 0 {
            debug!(layer = %layer, purged, "dropping renderer edits superseded by a host write");
            self.stats.native_events_dropped += purged as u64;
        }
    }

    fn acknowledge(&mut self, acks: Vec<MapEvent>) {
        if !self.config.acknowledge_host_writes {
            return;
        }
        for event in acks {
            self.bus.emit(event);
        }
    }
}

impl<R: NativeRenderer + std::fmt::Debug> std::fmt::Debug for Bridge<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("renderer", &self.renderer)
            .field("layers", &self.layers.len())
            .field("suspended", &self.suspended)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
