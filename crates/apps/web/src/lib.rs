use std::rc::Rc;

use futures::future::LocalBoxFuture;
use presenters::{PresenterConfig, ViewCoordinator};
use runtime::{Event, Reporter, Severity, SpawnFailed, TaskSpawner};
use wasm_bindgen::prelude::*;
use web_sys::Element;

mod dom;
mod engines;

use dom::{DomElement, DomGraph};
use engines::{JsMapRenderer, JsSceneRenderer};

/// Runs tasks on the browser's microtask queue.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserSpawner;

impl TaskSpawner for BrowserSpawner {
    fn spawn_task(&self, task: LocalBoxFuture<'static, ()>) -> Result<(), SpawnFailed> {
        wasm_bindgen_futures::spawn_local(task);
        Ok(())
    }
}

fn console_sink(event: &Event) {
    let line = JsValue::from_str(&format!(
        "[{}] {}: {}",
        event.revision, event.kind, event.message
    ));
    match event.severity {
        Severity::Warn => web_sys::console::warn_1(&line),
        Severity::Error => web_sys::console::error_1(&line),
    }
}

/// Lifecycle hook for one location element.
///
/// The page calls `mounted` once the element is inserted and `updated`
/// whenever it is re-rendered with new `data-*` pose attributes.
#[wasm_bindgen]
pub struct LocationHook {
    coordinator: ViewCoordinator<JsMapRenderer, JsSceneRenderer, DomGraph>,
}

#[wasm_bindgen]
impl LocationHook {
    /// `config_json` may override any presenter setting; omitted keys keep defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<LocationHook, JsValue> {
        console_error_panic_hook::set_once();
        let config = match config_json.as_deref() {
            Some(json) => PresenterConfig::from_json_str(json)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => PresenterConfig::default(),
        };
        let graph =
            DomGraph::from_window().ok_or_else(|| JsValue::from_str("no document available"))?;
        let coordinator = ViewCoordinator::new(
            JsMapRenderer,
            JsSceneRenderer,
            graph,
            config,
            Rc::new(BrowserSpawner),
            Reporter::with_sink(console_sink),
        );
        Ok(LocationHook { coordinator })
    }

    pub fn mounted(&mut self, el: &Element) {
        self.coordinator.mount(&DomElement(el));
    }

    pub fn updated(&mut self, el: &Element) {
        self.coordinator.update(&DomElement(el));
    }

    /// Errors reported since the hook was created.
    #[wasm_bindgen(js_name = errorCount)]
    pub fn error_count(&self) -> usize {
        self.coordinator.reporter().error_count()
    }
}
