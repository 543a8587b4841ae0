use std::cell::RefCell;
use std::rc::Rc;

use foundation::Pose;
use futures::FutureExt;
use runtime::{Reporter, Revision, SpawnFailed, TaskSpawner};
use scene::{
    BasemapParams, EnvironmentParams, GeoPosition, GoToOptions, GoToTarget, INTERCEPTED_INPUT,
    SceneRenderer, SceneView, SceneViewParams, TransitionError, UiParams,
};
use tracing::debug;

use crate::config::SceneConfig;

/// How the most recently issued go-to transition ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    Superseded,
    Failed(TransitionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettledTransition {
    /// 1-based sequence number of the transition within this state.
    pub seq: u64,
    pub outcome: TransitionOutcome,
}

#[derive(Debug)]
struct SceneSlot<V> {
    view: Option<Rc<V>>,
    issued: u64,
    latest: Option<SettledTransition>,
}

/// Scene presenter state.
///
/// The slot is shared with the presenter's in-flight tasks: construction
/// fills in the view when it resolves, and each go-to records its outcome
/// if it is still the latest one issued.
#[derive(Debug)]
pub struct SceneState<V> {
    slot: Rc<RefCell<SceneSlot<V>>>,
}

impl<V> Default for SceneState<V> {
    fn default() -> Self {
        Self {
            slot: Rc::new(RefCell::new(SceneSlot {
                view: None,
                issued: 0,
                latest: None,
            })),
        }
    }
}

impl<V> SceneState<V> {
    pub fn view(&self) -> Option<Rc<V>> {
        self.slot.borrow().view.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.slot.borrow().view.is_some()
    }

    /// Number of go-to transitions issued so far.
    pub fn issued(&self) -> u64 {
        self.slot.borrow().issued
    }

    /// Outcome of the latest transition once it has settled.
    pub fn latest_outcome(&self) -> Option<SettledTransition> {
        self.slot.borrow().latest.clone()
    }
}

pub struct ScenePresenter<R> {
    renderer: R,
    config: SceneConfig,
    spawner: Rc<dyn TaskSpawner>,
    reporter: Reporter,
}

impl<R> std::fmt::Debug for ScenePresenter<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenePresenter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<R: SceneRenderer> ScenePresenter<R> {
    pub fn new(
        renderer: R,
        config: SceneConfig,
        spawner: Rc<dyn TaskSpawner>,
        reporter: Reporter,
    ) -> Self {
        Self {
            renderer,
            config,
            spawner,
            reporter,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn params_for(&self, pose: &Pose) -> SceneViewParams {
        let c = &self.config;
        SceneViewParams {
            map: BasemapParams {
                basemap: c.basemap.clone(),
                ground: c.ground.clone(),
                ui: UiParams::default(),
            },
            ui: UiParams::default(),
            environment: EnvironmentParams {
                stars_enabled: c.stars_enabled,
                atmosphere_enabled: c.atmosphere_enabled,
            },
            quality_profile: c.quality_profile.clone(),
            container: c.container.clone(),
            zoom: c.zoom,
            tilt: c.tilt,
            rotation: c.rotation,
            center: position_of(pose),
        }
    }

    pub fn target_for(&self, pose: &Pose) -> GoToTarget {
        GoToTarget {
            position: position_of(pose),
            zoom: self.config.zoom,
            heading: pose.bearing,
            tilt: self.config.tilt,
        }
    }

    /// Starts constructing the view. The state stays unmounted until the
    /// construction task has run on the event loop.
    pub fn mount(
        &self,
        state: &mut SceneState<R::View>,
        pose: &Pose,
        revision: Revision,
    ) -> Result<(), SpawnFailed> {
        let construct = self.renderer.construct(&self.params_for(pose));
        let slot = state.slot.clone();
        let reporter = self.reporter.clone();

        let task = async move {
            match construct.await {
                Ok(view) => {
                    for binding in INTERCEPTED_INPUT {
                        view.stop_propagation(binding);
                    }
                    slot.borrow_mut().view = Some(Rc::new(view));
                    debug!(%revision, "scene view mounted");
                }
                Err(err) => reporter.error(revision, "scene.mount", err.to_string()),
            }
        };
        self.spawner.spawn_task(task.boxed_local())
    }

    /// Retargets the camera without animation. No-op until mounted.
    pub fn update(
        &self,
        state: &mut SceneState<R::View>,
        pose: &Pose,
        revision: Revision,
    ) -> Result<(), SpawnFailed> {
        let Some(view) = state.view() else {
            debug!(%revision, "scene view not mounted; update skipped");
            return Ok(());
        };

        let seq = {
            let mut slot = state.slot.borrow_mut();
            slot.issued += 1;
            slot.issued
        };
        let transition = view.go_to(
            &self.target_for(pose),
            GoToOptions {
                animate: self.config.animate,
            },
        );
        let slot = state.slot.clone();
        let reporter = self.reporter.clone();

        let task = async move {
            let outcome = match transition.await {
                Ok(()) => TransitionOutcome::Completed,
                Err(err) if err.is_abort() => {
                    debug!(%revision, seq, "go-to superseded");
                    TransitionOutcome::Superseded
                }
                Err(err) => {
                    reporter.error(revision, "scene.go_to", err.to_string());
                    TransitionOutcome::Failed(err)
                }
            };
            let mut slot = slot.borrow_mut();
            if slot.issued == seq {
                slot.latest = Some(SettledTransition { seq, outcome });
            }
        };
        self.spawner.spawn_task(task.boxed_local())
    }
}

fn position_of(pose: &Pose) -> GeoPosition {
    GeoPosition {
        latitude: pose.lat,
        longitude: pose.lng,
        z: pose.alt,
    }
}

#[cfg(test)]
mod tests {
    use super::{SceneState, ScenePresenter, SettledTransition, TransitionOutcome};
    use crate::config::SceneConfig;
    use foundation::Pose;
    use futures::executor::LocalPool;
    use pretty_assertions::assert_eq;
    use runtime::{Reporter, Revision};
    use scene::recording::{ConstructMode, RecordingSceneRenderer, RecordingSceneView};
    use scene::{
        BasemapParams, EnvironmentParams, GeoPosition, GoToOptions, GoToTarget,
        INTERCEPTED_INPUT, SceneError, SceneViewParams, TransitionError, UiParams,
    };
    use std::rc::Rc;

    struct Harness {
        pool: LocalPool,
        presenter: ScenePresenter<RecordingSceneRenderer>,
        state: SceneState<RecordingSceneView>,
        reporter: Reporter,
    }

    impl Harness {
        fn new(mode: ConstructMode) -> Self {
            let pool = LocalPool::new();
            let reporter = Reporter::new();
            let presenter = ScenePresenter::new(
                RecordingSceneRenderer::new(mode),
                SceneConfig::default(),
                Rc::new(pool.spawner()),
                reporter.clone(),
            );
            Self {
                pool,
                presenter,
                state: SceneState::default(),
                reporter,
            }
        }

        fn mounted() -> (Self, RecordingSceneView) {
            let mut h = Self::new(ConstructMode::Immediate);
            h.mount(&pose(40.0, -74.0, 10.0, 0.0));
            let view = h.presenter.renderer().last_view().unwrap();
            (h, view)
        }

        fn mount(&mut self, pose: &Pose) {
            self.presenter
                .mount(&mut self.state, pose, Revision::MOUNT)
                .unwrap();
            self.pool.run_until_stalled();
        }

        fn update(&mut self, pose: &Pose) {
            let revision = Revision::new(self.state.issued() + 1);
            self.presenter
                .update(&mut self.state, pose, revision)
                .unwrap();
            self.pool.run_until_stalled();
        }
    }

    fn pose(lat: f64, lng: f64, alt: f64, bearing: f64) -> Pose {
        Pose::new(lat, lng, alt, bearing, 0.0, 0.0)
    }

    #[test]
    fn mount_builds_view_with_fixed_camera() {
        let (h, _) = Harness::mounted();
        let params = h.presenter.renderer().constructed_params();
        assert_eq!(
            params,
            vec![SceneViewParams {
                map: BasemapParams {
                    basemap: "satellite".to_string(),
                    ground: "world-elevation".to_string(),
                    ui: UiParams::default(),
                },
                ui: UiParams::default(),
                environment: EnvironmentParams {
                    stars_enabled: false,
                    atmosphere_enabled: true,
                },
                quality_profile: "low".to_string(),
                container: "view".to_string(),
                zoom: 12.0,
                tilt: 90.0,
                rotation: 0.0,
                center: GeoPosition {
                    latitude: 40.0,
                    longitude: -74.0,
                    z: 10.0,
                },
            }]
        );
        assert!(h.state.is_mounted());
    }

    #[test]
    fn mount_registers_input_interceptors() {
        let (_, view) = Harness::mounted();
        assert_eq!(view.intercepted(), INTERCEPTED_INPUT.to_vec());
    }

    #[test]
    fn update_before_construction_finishes_is_noop() {
        let mut h = Harness::new(ConstructMode::Deferred);
        h.mount(&pose(1.0, 2.0, 3.0, 0.0));
        assert!(!h.state.is_mounted());

        h.update(&pose(5.0, 6.0, 7.0, 45.0));
        assert_eq!(h.state.issued(), 0);

        let view = h.presenter.renderer().finish_construct().unwrap();
        h.pool.run_until_stalled();
        assert!(h.state.is_mounted());
        assert!(view.targets().is_empty());
        assert_eq!(h.reporter.error_count(), 0);
    }

    #[test]
    fn update_cuts_to_pose_with_bearing_as_heading() {
        let (mut h, view) = Harness::mounted();
        h.update(&pose(41.0, -73.5, 250.0, 135.0));
        assert_eq!(
            view.targets(),
            vec![(
                GoToTarget {
                    position: GeoPosition {
                        latitude: 41.0,
                        longitude: -73.5,
                        z: 250.0,
                    },
                    zoom: 12.0,
                    heading: 135.0,
                    tilt: 90.0,
                },
                GoToOptions { animate: false },
            )]
        );
    }

    #[test]
    fn update_reuses_mounted_handle() {
        let (mut h, view) = Harness::mounted();
        let mounted = h.state.view().unwrap();
        h.update(&pose(1.0, 1.0, 1.0, 1.0));
        h.update(&pose(2.0, 2.0, 2.0, 2.0));
        assert_eq!(h.presenter.renderer().constructed_params().len(), 1);
        assert!(Rc::ptr_eq(&mounted, &h.state.view().unwrap()));
        assert_eq!(view.targets().len(), 2);
    }

    #[test]
    fn superseded_transition_is_silent() {
        let (mut h, view) = Harness::mounted();
        h.update(&pose(1.0, 1.0, 1.0, 0.0));
        h.update(&pose(2.0, 2.0, 2.0, 0.0));
        assert!(view.settle_latest(Ok(())));
        h.pool.run_until_stalled();

        assert_eq!(h.reporter.error_count(), 0);
        assert_eq!(
            h.state.latest_outcome(),
            Some(SettledTransition {
                seq: 2,
                outcome: TransitionOutcome::Completed,
            })
        );
    }

    #[test]
    fn explicit_abort_rejection_is_silent() {
        let (mut h, view) = Harness::mounted();
        h.update(&pose(1.0, 1.0, 1.0, 0.0));
        view.settle_latest(Err(TransitionError::from_name(Some("AbortError"), "aborted")));
        h.pool.run_until_stalled();
        assert_eq!(h.reporter.error_count(), 0);
        assert_eq!(
            h.state.latest_outcome().map(|s| s.outcome),
            Some(TransitionOutcome::Superseded)
        );
    }

    #[test]
    fn other_failures_are_reported_once_per_call() {
        let (mut h, view) = Harness::mounted();
        h.update(&pose(1.0, 1.0, 1.0, 0.0));
        view.settle_latest(Err(TransitionError::failed("elevation service down")));
        h.pool.run_until_stalled();
        assert_eq!(h.reporter.error_count(), 1);

        h.update(&pose(2.0, 2.0, 2.0, 0.0));
        view.settle_latest(Err(TransitionError::failed("still down")));
        h.pool.run_until_stalled();
        assert_eq!(h.reporter.error_count(), 2);
        assert_eq!(h.reporter.count_kind("scene.go_to"), 2);

        // The presenter keeps working after failures.
        h.update(&pose(3.0, 3.0, 3.0, 0.0));
        view.settle_latest(Ok(()));
        h.pool.run_until_stalled();
        assert_eq!(h.reporter.error_count(), 2);
        assert_eq!(
            h.state.latest_outcome(),
            Some(SettledTransition {
                seq: 3,
                outcome: TransitionOutcome::Completed,
            })
        );
    }

    #[test]
    fn construction_failure_is_reported_and_updates_stay_noops() {
        let mut h = Harness::new(ConstructMode::Fail(SceneError::ModuleLoad(
            "loader unavailable".to_string(),
        )));
        h.mount(&pose(0.0, 0.0, 0.0, 0.0));
        assert_eq!(h.reporter.count_kind("scene.mount"), 1);
        assert!(!h.state.is_mounted());

        h.update(&pose(1.0, 1.0, 1.0, 0.0));
        assert_eq!(h.state.issued(), 0);
        assert_eq!(h.reporter.error_count(), 1);
    }

    #[test]
    fn nan_pose_reaches_target_without_failing() {
        let (mut h, view) = Harness::mounted();
        h.update(&Pose::nan());
        let target = view.last_target().unwrap();
        assert!(target.position.latitude.is_nan());
        assert!(target.heading.is_nan());
        assert_eq!(target.zoom, 12.0);
        assert_eq!(h.reporter.error_count(), 0);
    }
}
