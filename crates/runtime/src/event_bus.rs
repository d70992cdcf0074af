use foundation::{Coordinate, FeatureId, LayerId};
use scene::Shape;

/// Event delivered to host listeners.
///
/// Shape-carrying variants hold a snapshot of the shape as the host sees it.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    FeatureClick(Shape),
    MarkerClick(Shape),
    ShapeClick(Shape),
    MapClick(Coordinate),
    PointerMove(Coordinate),
    ZoomChanged(f64),
    CenterChanged(Coordinate),
    ShapeAdded(Shape),
    ShapeChanged(Shape),
    ShapeRemoved(Shape),
}

impl MapEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MapEvent::FeatureClick(_) => "feature_click",
            MapEvent::MarkerClick(_) => "marker_click",
            MapEvent::ShapeClick(_) => "shape_click",
            MapEvent::MapClick(_) => "map_click",
            MapEvent::PointerMove(_) => "pointer_move",
            MapEvent::ZoomChanged(_) => "zoom_changed",
            MapEvent::CenterChanged(_) => "center_changed",
            MapEvent::ShapeAdded(_) => "shape_added",
            MapEvent::ShapeChanged(_) => "shape_changed",
            MapEvent::ShapeRemoved(_) => "shape_removed",
        }
    }

    pub fn shape(&self) -> Option<&Shape> {
        match self {
            MapEvent::FeatureClick(s)
            | MapEvent::MarkerClick(s)
            | MapEvent::ShapeClick(s)
            | MapEvent::ShapeAdded(s)
            | MapEvent::ShapeChanged(s)
            | MapEvent::ShapeRemoved(s) => Some(s),
            _ => None,
        }
    }
}

/// Host-side receiver. Every method defaults to a no-op.
pub trait MapListener {
    fn on_feature_click(&mut self, _shape: &Shape) {}
    fn on_marker_click(&mut self, _shape: &Shape) {}
    fn on_shape_click(&mut self, _shape: &Shape) {}
    fn on_map_click(&mut self, _at: Coordinate) {}
    fn on_pointer_move(&mut self, _at: Coordinate) {}
    fn on_zoom_changed(&mut self, _zoom: f64) {}
    fn on_center_changed(&mut self, _center: Coordinate) {}
    fn on_shape_added(&mut self, _shape: &Shape) {}
    fn on_shape_changed(&mut self, _shape: &Shape) {}
    fn on_shape_removed(&mut self, _shape: &Shape) {}

    fn dispatch(&mut self, event: &MapEvent) {
        match event {
            MapEvent::FeatureClick(s) => self.on_feature_click(s),
            MapEvent::MarkerClick(s) => self.on_marker_click(s),
            MapEvent::ShapeClick(s) => self.on_shape_click(s),
            MapEvent::MapClick(c) => self.on_map_click(*c),
            MapEvent::PointerMove(c) => self.on_pointer_move(*c),
            MapEvent::ZoomChanged(z) => self.on_zoom_changed(*z),
            MapEvent::CenterChanged(c) => self.on_center_changed(*c),
            MapEvent::ShapeAdded(s) => self.on_shape_added(s),
            MapEvent::ShapeChanged(s) => self.on_shape_changed(s),
            MapEvent::ShapeRemoved(s) => self.on_shape_removed(s),
        }
    }
}

/// What a subscription listens to. Map-level events only reach `All`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    All,
    Layer(LayerId),
    Shape(FeatureId),
}

impl Scope {
    fn matches(&self, event: &MapEvent) -> bool {
        match self {
            Scope::All => true,
            Scope::Layer(layer) => event.shape().and_then(Shape::layer) == Some(*layer),
            Scope::Shape(id) => event.shape().map(Shape::id) == Some(id),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

struct Subscription {
    id: SubscriptionId,
    scope: Scope,
    listener: Box<dyn MapListener>,
}

/// Records emitted events and fans them out to scoped listeners in
/// subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    events: Vec<MapEvent>,
    subscriptions: Vec<Subscription>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("events", &self.events.len())
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, scope: Scope, listener: Box<dyn MapListener>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.subscriptions.push(Subscription {
            id,
            scope,
            listener,
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Drops every subscription scoped to `id`. Returns how many were removed.
    pub fn unsubscribe_shape(&mut self, id: &FeatureId) -> usize {
        self.unsubscribe_where(|scope| matches!(scope, Scope::Shape(s) if s == id))
    }

    /// Drops every subscription scoped to `layer`.
    pub fn unsubscribe_layer(&mut self, layer: LayerId) -> usize {
        self.unsubscribe_where(|scope| *scope == Scope::Layer(layer))
    }

    fn unsubscribe_where(&mut self, pred: impl Fn(&Scope) -> bool) -> usize {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| !pred(&s.scope));
        before - self.subscriptions.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn emit(&mut self, event: MapEvent) {
        for sub in &mut self.subscriptions {
            if sub.scope.matches(&event) {
                sub.listener.dispatch(&event);
            }
        }
        self.events.push(event);
    }

    pub fn events(&self) -> &[MapEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{EventBus, MapEvent, MapListener, Scope};
    use foundation::{Coordinate, LayerId};
    use scene::Shape;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<&'static str>>>);

    impl Recorder {
        fn seen(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    impl MapListener for Recorder {
        fn on_shape_added(&mut self, _shape: &Shape) {
            self.0.lock().unwrap().push("added");
        }

        fn on_map_click(&mut self, _at: Coordinate) {
            self.0.lock().unwrap().push("map_click");
        }
    }

    fn shape_in(layer: u64) -> Shape {
        let mut shape = Shape::point(Coordinate::new(1.0, 1.0));
        shape.attach(LayerId(layer));
        shape
    }

    #[test]
    fn records_events_in_order() {
        let mut bus = EventBus::new();
        bus.emit(MapEvent::ZoomChanged(3.0));
        bus.emit(MapEvent::MapClick(Coordinate::new(0.0, 0.0)));
        let kinds: Vec<_> = bus.events().iter().map(MapEvent::kind).collect();
        assert_eq!(kinds, ["zoom_changed", "map_click"]);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(MapEvent::ZoomChanged(1.0));
        assert_eq!(bus.drain().len(), 1);
        assert!(bus.events().is_empty());
    }

    #[test]
    fn scopes_filter_delivery() {
        let mut bus = EventBus::new();
        let all = Recorder::default();
        let layer_one = Recorder::default();
        let other_shape = Recorder::default();
        bus.subscribe(Scope::All, Box::new(all.clone()));
        bus.subscribe(Scope::Layer(LayerId(1)), Box::new(layer_one.clone()));
        bus.subscribe(
            Scope::Shape("someone-else".into()),
            Box::new(other_shape.clone()),
        );

        bus.emit(MapEvent::ShapeAdded(shape_in(1)));
        bus.emit(MapEvent::ShapeAdded(shape_in(2)));
        bus.emit(MapEvent::MapClick(Coordinate::new(0.0, 0.0)));

        assert_eq!(all.seen(), ["added", "added", "map_click"]);
        assert_eq!(layer_one.seen(), ["added"]);
        assert!(other_shape.seen().is_empty());
    }

    #[test]
    fn unsubscribe_by_shape_and_layer() {
        let mut bus = EventBus::new();
        let shape = shape_in(7);
        let id = bus.subscribe(Scope::All, Box::new(Recorder::default()));
        bus.subscribe(Scope::Shape(shape.id().clone()), Box::new(Recorder::default()));
        bus.subscribe(Scope::Layer(LayerId(7)), Box::new(Recorder::default()));

        assert_eq!(bus.unsubscribe_shape(shape.id()), 1);
        assert_eq!(bus.unsubscribe_layer(LayerId(7)), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscription_count(), 0);
    }
}
