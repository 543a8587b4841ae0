//! Bindings to the page's map and scene engines.
//!
//! The page exposes a `posesync` global with `createMap(lat, lng)` and
//! `createSceneView(params)`; the latter resolves to a view object offering
//! `goTo(target, options)` and `on(event, [modifiers], handler)`.

use std::cell::RefCell;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use scene::{
    GoToOptions, GoToTarget, InputBinding, MapCenter, MapError, MapRenderer, MapView,
    SceneError, SceneRenderer, SceneView, SceneViewParams, TransitionError,
};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    pub type JsMap;

    #[wasm_bindgen(catch, js_namespace = posesync, js_name = createMap)]
    fn create_map(lat: f64, lng: f64) -> Result<JsMap, JsValue>;

    #[wasm_bindgen(method, js_name = setCenter)]
    fn set_center(this: &JsMap, lat: f64, lng: f64);

    pub type JsSceneView;

    #[wasm_bindgen(js_namespace = posesync, js_name = createSceneView)]
    fn create_scene_view(params: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = goTo)]
    fn go_to(this: &JsSceneView, target: &JsValue, options: &JsValue) -> js_sys::Promise;

    #[wasm_bindgen(method, js_name = on)]
    fn on(this: &JsSceneView, event: &str, handler: &Closure<dyn FnMut(ViewEvent)>);

    #[wasm_bindgen(method, js_name = on)]
    fn on_with_modifiers(
        this: &JsSceneView,
        event: &str,
        modifiers: &js_sys::Array,
        handler: &Closure<dyn FnMut(ViewEvent)>,
    );

    pub type ViewEvent;

    #[wasm_bindgen(method, js_name = stopPropagation)]
    fn stop_propagation(this: &ViewEvent);
}

/// Hands a serde value to JS as a plain object. Floats stay numbers, `NaN` included.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn describe(err: &JsValue) -> String {
    js_sys::Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{err:?}"))
}

fn classify_rejection(err: JsValue) -> TransitionError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string());
    TransitionError::from_name(name.as_deref(), describe(&err))
}

pub struct JsMapView(JsMap);

impl MapView for JsMapView {
    fn set_center(&mut self, center: MapCenter) {
        self.0.set_center(center.lat, center.lng);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsMapRenderer;

impl MapRenderer for JsMapRenderer {
    type View = JsMapView;

    fn create(&self, center: MapCenter) -> Result<Self::View, MapError> {
        create_map(center.lat, center.lng)
            .map(JsMapView)
            .map_err(|e| MapError::Backend(describe(&e)))
    }
}

/// A constructed scene view plus the input handlers it must keep alive.
pub struct JsSceneViewHandle {
    view: JsSceneView,
    handlers: RefCell<Vec<Closure<dyn FnMut(ViewEvent)>>>,
}

impl SceneView for JsSceneViewHandle {
    fn go_to(
        &self,
        target: &GoToTarget,
        options: GoToOptions,
    ) -> LocalBoxFuture<'static, Result<(), TransitionError>> {
        let promise = match (to_js(target), to_js(&options)) {
            (Ok(target), Ok(options)) => self.view.go_to(&target, &options),
            (Err(e), _) | (_, Err(e)) => {
                let err = TransitionError::failed(describe(&e));
                return futures::future::ready(Err(err)).boxed_local();
            }
        };
        async move {
            JsFuture::from(promise)
                .await
                .map(|_| ())
                .map_err(classify_rejection)
        }
        .boxed_local()
    }

    fn stop_propagation(&self, binding: InputBinding) {
        let handler = Closure::<dyn FnMut(ViewEvent)>::new(|event: ViewEvent| {
            event.stop_propagation();
        });
        let event = binding.event.as_str();
        if binding.modifiers.is_empty() {
            self.view.on(event, &handler);
        } else {
            let modifiers: js_sys::Array = binding
                .modifier_names()
                .into_iter()
                .map(JsValue::from_str)
                .collect();
            self.view.on_with_modifiers(event, &modifiers, &handler);
        }
        self.handlers.borrow_mut().push(handler);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsSceneRenderer;

impl SceneRenderer for JsSceneRenderer {
    type View = JsSceneViewHandle;

    fn construct(
        &self,
        params: &SceneViewParams,
    ) -> LocalBoxFuture<'static, Result<Self::View, SceneError>> {
        let params = match to_js(params) {
            Ok(params) => params,
            Err(e) => {
                let err = SceneError::Construct(describe(&e));
                return futures::future::ready(Err(err)).boxed_local();
            }
        };
        let promise = create_scene_view(&params);
        async move {
            let view = JsFuture::from(promise)
                .await
                .map_err(|e| SceneError::ModuleLoad(describe(&e)))?;
            Ok(JsSceneViewHandle {
                view: view.unchecked_into::<JsSceneView>(),
                handlers: RefCell::new(Vec::new()),
            })
        }
        .boxed_local()
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::to_js;
    use scene::{GeoPosition, GoToOptions, GoToTarget};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn field(obj: &JsValue, name: &str) -> JsValue {
        js_sys::Reflect::get(obj, &JsValue::from_str(name)).unwrap()
    }

    #[wasm_bindgen_test]
    fn nan_target_fields_reach_js_as_nan() {
        let target = GoToTarget {
            position: GeoPosition {
                latitude: f64::NAN,
                longitude: 2.0,
                z: 3.0,
            },
            zoom: 12.0,
            heading: f64::NAN,
            tilt: 90.0,
        };
        let js = to_js(&target).unwrap();

        let position = field(&js, "position");
        assert!(field(&position, "latitude").as_f64().is_some_and(f64::is_nan));
        assert_eq!(field(&position, "longitude").as_f64(), Some(2.0));
        assert!(field(&js, "heading").as_f64().is_some_and(f64::is_nan));
        assert_eq!(field(&js, "tilt").as_f64(), Some(90.0));
    }

    #[wasm_bindgen_test]
    fn options_are_plain_objects() {
        let js = to_js(&GoToOptions { animate: false }).unwrap();
        assert_eq!(field(&js, "animate").as_bool(), Some(false));
    }
}
