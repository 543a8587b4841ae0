//! In-memory back-ends that record every call.
//!
//! Used by the replay tool and by presenter tests. Scene transitions can be
//! left pending and settled by hand, which is how supersession is exercised
//! without a real engine.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use foundation::math::Vec3;
use futures::channel::oneshot;
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};

use crate::components::Transform;
use crate::graph::{NodeWriteError, SceneGraph, SceneGraphNode};
use crate::input::InputBinding;
use crate::map::{MapCenter, MapError, MapRenderer, MapView};
use crate::view::{
    GoToOptions, GoToTarget, SceneError, SceneRenderer, SceneView, SceneViewParams,
    TransitionError,
};

#[derive(Debug, Default)]
struct NodeRecord {
    transform: Transform,
    writes: usize,
    refuse: Option<String>,
}

/// Scene-graph node that keeps its last attributes.
#[derive(Debug, Clone, Default)]
pub struct RecordingNode {
    inner: Rc<RefCell<NodeRecord>>,
}

impl RecordingNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> Transform {
        self.inner.borrow().transform
    }

    pub fn position(&self) -> Vec3 {
        self.inner.borrow().transform.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.inner.borrow().transform.rotation
    }

    /// Number of accepted attribute writes so far.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    /// Makes every later write fail with `message`; `None` accepts writes again.
    pub fn refuse_writes(&self, message: Option<&str>) {
        self.inner.borrow_mut().refuse = message.map(str::to_string);
    }

    fn write(
        &self,
        attribute: &'static str,
        apply: impl FnOnce(&mut Transform),
    ) -> Result<(), NodeWriteError> {
        let mut node = self.inner.borrow_mut();
        if let Some(message) = &node.refuse {
            return Err(NodeWriteError::new(attribute, message.clone()));
        }
        apply(&mut node.transform);
        node.writes += 1;
        Ok(())
    }
}

impl SceneGraphNode for RecordingNode {
    fn set_position(&self, position: Vec3) -> Result<(), NodeWriteError> {
        self.write("position", |t| t.position = position)
    }

    fn set_rotation(&self, rotation: Vec3) -> Result<(), NodeWriteError> {
        self.write("rotation", |t| t.rotation = rotation)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingGraph {
    nodes: BTreeMap<String, RecordingNode>,
}

impl RecordingGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut graph = Self::new();
        for id in ids {
            graph.insert(id);
        }
        graph
    }

    pub fn insert(&mut self, id: &str) -> RecordingNode {
        self.nodes.entry(id.to_string()).or_default().clone()
    }

    /// Returns the node without going through [`SceneGraph::node`].
    pub fn get(&self, id: &str) -> Option<&RecordingNode> {
        self.nodes.get(id)
    }

    pub fn snapshot(&self) -> BTreeMap<String, Transform> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.transform()))
            .collect()
    }
}

impl SceneGraph for RecordingGraph {
    type Node = RecordingNode;

    fn node(&self, id: &str) -> Option<Self::Node> {
        self.nodes.get(id).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordingMapView {
    pub centers: Vec<MapCenter>,
}

impl RecordingMapView {
    pub fn center(&self) -> Option<MapCenter> {
        self.centers.last().copied()
    }
}

impl MapView for RecordingMapView {
    fn set_center(&mut self, center: MapCenter) {
        self.centers.push(center);
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingMapRenderer {
    created: Rc<RefCell<usize>>,
    fail_with: Option<MapError>,
}

impl RecordingMapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(err: MapError) -> Self {
        Self {
            created: Rc::default(),
            fail_with: Some(err),
        }
    }

    /// Number of views created so far.
    pub fn created(&self) -> usize {
        *self.created.borrow()
    }
}

impl MapRenderer for RecordingMapRenderer {
    type View = RecordingMapView;

    fn create(&self, center: MapCenter) -> Result<Self::View, MapError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        *self.created.borrow_mut() += 1;
        Ok(RecordingMapView {
            centers: vec![center],
        })
    }
}

#[derive(Debug, Default)]
struct ViewRecord {
    targets: Vec<(GoToTarget, GoToOptions)>,
    intercepted: Vec<InputBinding>,
    pending: VecDeque<oneshot::Sender<Result<(), TransitionError>>>,
    auto_complete: bool,
}

/// Scene view whose transitions stay pending until settled.
///
/// Issuing a new transition aborts every pending one, the way real engines
/// cancel an in-flight camera animation.
#[derive(Debug, Clone, Default)]
pub struct RecordingSceneView {
    inner: Rc<RefCell<ViewRecord>>,
}

impl RecordingSceneView {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view whose transitions complete as soon as they are issued.
    pub fn auto_completing() -> Self {
        let view = Self::new();
        view.inner.borrow_mut().auto_complete = true;
        view
    }

    pub fn targets(&self) -> Vec<(GoToTarget, GoToOptions)> {
        self.inner.borrow().targets.clone()
    }

    pub fn last_target(&self) -> Option<GoToTarget> {
        self.inner.borrow().targets.last().map(|(t, _)| *t)
    }

    pub fn intercepted(&self) -> Vec<InputBinding> {
        self.inner.borrow().intercepted.clone()
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Settles the most recent pending transition. Returns `false` if none.
    pub fn settle_latest(&self, result: Result<(), TransitionError>) -> bool {
        match self.inner.borrow_mut().pending.pop_back() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }

    /// Settles the oldest pending transition. Returns `false` if none.
    pub fn settle_oldest(&self, result: Result<(), TransitionError>) -> bool {
        match self.inner.borrow_mut().pending.pop_front() {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }
}

impl SceneView for RecordingSceneView {
    fn go_to(
        &self,
        target: &GoToTarget,
        options: GoToOptions,
    ) -> LocalBoxFuture<'static, Result<(), TransitionError>> {
        let mut view = self.inner.borrow_mut();
        view.targets.push((*target, options));
        for tx in view.pending.drain(..) {
            let _ = tx.send(Err(TransitionError::aborted()));
        }
        if view.auto_complete {
            return future::ready(Ok(())).boxed_local();
        }

        let (tx, rx) = oneshot::channel();
        view.pending.push_back(tx);
        // A dropped sender means the engine went away mid-flight.
        rx.map(|settled| settled.unwrap_or_else(|_| Err(TransitionError::aborted())))
            .boxed_local()
    }

    fn stop_propagation(&self, binding: InputBinding) {
        self.inner.borrow_mut().intercepted.push(binding);
    }
}

/// How [`RecordingSceneRenderer::construct`] resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructMode {
    Immediate,
    /// Stays pending until [`RecordingSceneRenderer::finish_construct`].
    Deferred,
    Fail(SceneError),
}

#[derive(Debug)]
struct RendererRecord {
    mode: ConstructMode,
    auto_complete: bool,
    params: Vec<SceneViewParams>,
    views: Vec<RecordingSceneView>,
    pending: VecDeque<oneshot::Sender<Result<RecordingSceneView, SceneError>>>,
}

#[derive(Debug, Clone)]
pub struct RecordingSceneRenderer {
    inner: Rc<RefCell<RendererRecord>>,
}

impl RecordingSceneRenderer {
    pub fn new(mode: ConstructMode) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RendererRecord {
                mode,
                auto_complete: false,
                params: Vec::new(),
                views: Vec::new(),
                pending: VecDeque::new(),
            })),
        }
    }

    /// Views built by this renderer complete their transitions immediately.
    pub fn auto_completing(self) -> Self {
        self.inner.borrow_mut().auto_complete = true;
        self
    }

    pub fn constructed_params(&self) -> Vec<SceneViewParams> {
        self.inner.borrow().params.clone()
    }

    /// Views handed out so far, oldest first.
    pub fn views(&self) -> Vec<RecordingSceneView> {
        self.inner.borrow().views.clone()
    }

    pub fn last_view(&self) -> Option<RecordingSceneView> {
        self.inner.borrow().views.last().cloned()
    }

    /// Resolves the oldest deferred construction with a fresh view.
    pub fn finish_construct(&self) -> Option<RecordingSceneView> {
        let tx = self.inner.borrow_mut().pending.pop_front()?;
        let view = self.new_view();
        tx.send(Ok(view.clone())).ok()?;
        Some(view)
    }

    /// Rejects the oldest deferred construction.
    pub fn fail_construct(&self, err: SceneError) -> bool {
        match self.inner.borrow_mut().pending.pop_front() {
            Some(tx) => tx.send(Err(err)).is_ok(),
            None => false,
        }
    }

    fn new_view(&self) -> RecordingSceneView {
        let mut record = self.inner.borrow_mut();
        let view = if record.auto_complete {
            RecordingSceneView::auto_completing()
        } else {
            RecordingSceneView::new()
        };
        record.views.push(view.clone());
        view
    }
}

impl SceneRenderer for RecordingSceneRenderer {
    type View = RecordingSceneView;

    fn construct(
        &self,
        params: &SceneViewParams,
    ) -> LocalBoxFuture<'static, Result<Self::View, SceneError>> {
        let mode = {
            let mut record = self.inner.borrow_mut();
            record.params.push(params.clone());
            record.mode.clone()
        };
        match mode {
            ConstructMode::Immediate => future::ready(Ok(self.new_view())).boxed_local(),
            ConstructMode::Fail(err) => future::ready(Err(err)).boxed_local(),
            ConstructMode::Deferred => {
                let (tx, rx) = oneshot::channel();
                self.inner.borrow_mut().pending.push_back(tx);
                rx.map(|built| {
                    built.unwrap_or_else(|_| {
                        Err(SceneError::Construct("renderer dropped".to_string()))
                    })
                })
                .boxed_local()
            }
        }
    }
}
