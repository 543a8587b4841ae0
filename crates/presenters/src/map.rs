use foundation::Pose;
use scene::{MapCenter, MapError, MapRenderer, MapView};
use tracing::debug;

#[derive(Debug)]
pub struct MapState<V> {
    pub view: Option<V>,
}

impl<V> Default for MapState<V> {
    fn default() -> Self {
        Self { view: None }
    }
}

impl<V> MapState<V> {
    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }
}

/// Thin wrapper: the map library handles everything beyond centering.
#[derive(Debug)]
pub struct MapPresenter<R> {
    renderer: R,
}

impl<R: MapRenderer> MapPresenter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn mount(&self, state: &mut MapState<R::View>, pose: &Pose) -> Result<(), MapError> {
        let view = self.renderer.create(center_of(pose))?;
        debug!(lat = pose.lat, lng = pose.lng, "map mounted");
        state.view = Some(view);
        Ok(())
    }

    pub fn update(&self, state: &mut MapState<R::View>, pose: &Pose) {
        if let Some(view) = state.view.as_mut() {
            view.set_center(center_of(pose));
        }
    }
}

fn center_of(pose: &Pose) -> MapCenter {
    MapCenter::new(pose.lat, pose.lng)
}

#[cfg(test)]
mod tests {
    use super::{MapPresenter, MapState};
    use foundation::Pose;
    use scene::recording::RecordingMapRenderer;
    use scene::{MapCenter, MapError};

    #[test]
    fn mount_centers_on_pose() {
        let presenter = MapPresenter::new(RecordingMapRenderer::new());
        let mut state = MapState::default();
        presenter
            .mount(&mut state, &Pose::new(40.0, -74.0, 10.0, 0.0, 0.0, 0.0))
            .unwrap();
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.center(), Some(MapCenter::new(40.0, -74.0)));
    }

    #[test]
    fn update_recenters_without_recreating() {
        let presenter = MapPresenter::new(RecordingMapRenderer::new());
        let mut state = MapState::default();
        presenter
            .mount(&mut state, &Pose::new(1.0, 2.0, 0.0, 0.0, 0.0, 0.0))
            .unwrap();
        presenter.update(&mut state, &Pose::new(3.0, 4.0, 0.0, 0.0, 0.0, 0.0));

        assert_eq!(presenter.renderer().created(), 1);
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.center(), Some(MapCenter::new(3.0, 4.0)));
        assert_eq!(view.centers.len(), 2);
    }

    #[test]
    fn update_before_mount_is_noop() {
        let presenter = MapPresenter::new(RecordingMapRenderer::new());
        let mut state = MapState::default();
        presenter.update(&mut state, &Pose::new(1.0, 2.0, 0.0, 0.0, 0.0, 0.0));
        assert!(!state.is_mounted());
        assert_eq!(presenter.renderer().created(), 0);
    }

    #[test]
    fn failed_create_leaves_state_unmounted() {
        let presenter =
            MapPresenter::new(RecordingMapRenderer::failing(MapError::MissingContainer(
                "map".to_string(),
            )));
        let mut state = MapState::default();
        let err = presenter.mount(&mut state, &Pose::nan()).unwrap_err();
        assert_eq!(err, MapError::MissingContainer("map".to_string()));
        assert!(!state.is_mounted());
    }

    #[test]
    fn nan_pose_is_passed_through() {
        let presenter = MapPresenter::new(RecordingMapRenderer::new());
        let mut state = MapState::default();
        presenter.mount(&mut state, &Pose::nan()).unwrap();
        let center = state.view.as_ref().unwrap().center().unwrap();
        assert!(center.lat.is_nan() && center.lng.is_nan());
    }
}
