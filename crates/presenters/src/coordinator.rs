use std::rc::Rc;

use foundation::{AttributeSource, Pose};
use runtime::{Reporter, Revision, TaskSpawner};
use scene::{MapRenderer, SceneGraph, SceneRenderer};
use tracing::debug;

use crate::config::PresenterConfig;
use crate::map::{MapPresenter, MapState};
use crate::scene_view::{ScenePresenter, SceneState};
use crate::vr::{VrPresenter, VrState};

/// Per-element presenter state, one independent bag per presenter.
#[derive(Debug)]
pub struct LocationContext<M, S, N> {
    pub map: MapState<M>,
    pub scene: SceneState<S>,
    pub vr: VrState<N>,
}

impl<M, S, N> Default for LocationContext<M, S, N> {
    fn default() -> Self {
        Self {
            map: MapState::default(),
            scene: SceneState::default(),
            vr: VrState::default(),
        }
    }
}

type ContextFor<MR, SR, G> = LocationContext<
    <MR as MapRenderer>::View,
    <SR as SceneRenderer>::View,
    <G as SceneGraph>::Node,
>;

/// Drives the three presenters for one mounted location element.
///
/// The pose is parsed once per lifecycle event and handed to Map, Scene and
/// VR in that order. Presenter failures are reported, never returned: the
/// host framework has nothing useful to do with them.
pub struct ViewCoordinator<MR: MapRenderer, SR: SceneRenderer, G: SceneGraph> {
    map: MapPresenter<MR>,
    scene: ScenePresenter<SR>,
    vr: VrPresenter<G>,
    context: ContextFor<MR, SR, G>,
    reporter: Reporter,
    revision: Option<Revision>,
}

impl<MR, SR, G> ViewCoordinator<MR, SR, G>
where
    MR: MapRenderer,
    SR: SceneRenderer,
    G: SceneGraph,
{
    pub fn new(
        map: MR,
        scene: SR,
        graph: G,
        config: PresenterConfig,
        spawner: Rc<dyn TaskSpawner>,
        reporter: Reporter,
    ) -> Self {
        Self {
            map: MapPresenter::new(map),
            scene: ScenePresenter::new(scene, config.scene, spawner, reporter.clone()),
            vr: VrPresenter::new(graph, config.vr),
            context: LocationContext::default(),
            reporter,
            revision: None,
        }
    }

    pub fn context(&self) -> &ContextFor<MR, SR, G> {
        &self.context
    }

    pub fn revision(&self) -> Option<Revision> {
        self.revision
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn map_presenter(&self) -> &MapPresenter<MR> {
        &self.map
    }

    pub fn scene_presenter(&self) -> &ScenePresenter<SR> {
        &self.scene
    }

    pub fn vr_presenter(&self) -> &VrPresenter<G> {
        &self.vr
    }

    /// The element entered the page. Starts from fresh presenter state.
    pub fn mount(&mut self, source: &impl AttributeSource) -> Pose {
        let revision = Revision::MOUNT;
        self.revision = Some(revision);
        self.context = LocationContext::default();
        let pose = self.extract(source, revision);

        let ctx = &mut self.context;
        if let Err(err) = self.map.mount(&mut ctx.map, &pose) {
            self.reporter.error(revision, "map.mount", err.to_string());
        }
        if let Err(err) = self.scene.mount(&mut ctx.scene, &pose, revision) {
            self.reporter.error(revision, "scene.mount", err.to_string());
        }
        if let Err(err) = self.vr.mount(&mut ctx.vr, &pose) {
            self.reporter.error(revision, err.kind(), err.to_string());
        }
        pose
    }

    /// The host re-rendered the element with new attributes.
    pub fn update(&mut self, source: &impl AttributeSource) -> Pose {
        let revision = self.revision.map_or(Revision::new(1), Revision::next);
        self.revision = Some(revision);
        let pose = self.extract(source, revision);

        let ctx = &mut self.context;
        self.map.update(&mut ctx.map, &pose);
        if let Err(err) = self.scene.update(&mut ctx.scene, &pose, revision) {
            self.reporter.error(revision, "scene.go_to", err.to_string());
        }
        if let Err(err) = self.vr.update(&mut ctx.vr, &pose) {
            self.reporter.error(revision, err.kind(), err.to_string());
        }
        pose
    }

    fn extract(&self, source: &impl AttributeSource, revision: Revision) -> Pose {
        let pose = Pose::extract(source);
        if pose.is_degraded() {
            self.reporter
                .warn(revision, "pose", format!("degraded pose attributes: {pose:?}"));
        } else {
            debug!(%revision, ?pose, "pose extracted");
        }
        pose
    }
}
