//! WebAssembly bindings
//!
//! [`WebDocument`] implements [`Document`] over the live DOM, [`GlobalMermaid`]
//! finds the engine on `window`, and [`install`] wires both to the page's
//! lifecycle events.
//!
//! ```js
//! import init, { install } from "./pkg/mermaid_sync.js";
//!
//! await init();
//! const sync = install(JSON.stringify({ changeEvent: "navigation" }));
//! // Routers that don't fire the event can trigger a pass directly
//! sync.resync();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::anyhow;
use js_sys::{Function, Object, Promise, Reflect, JSON};
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Element;

use crate::core::logging::init_logging;
use crate::core::{
    Capability, DiagramMarker, Document, DomError, Engine, MarkerSelector, RenderConfig,
    SyncConfig, CONVERTED_ATTR, READY_EVENT,
};
use crate::sync::{Signal, SignalListener, SignalQueue, Synchronizer};

/// Set up panic reporting and console logging
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = init_logging(Some("info"), None);
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn js_error(value: JsValue) -> anyhow::Error {
    anyhow!(describe(&value))
}

/// The browser document
pub struct WebDocument {
    document: web_sys::Document,
}

impl WebDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The document of the current window, if there is one
    pub fn current() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn elements_with_any_class(&self, classes: &[&str]) -> Result<Vec<Element>, DomError> {
        let selector = classes
            .iter()
            .map(|class| format!(".{}", class))
            .collect::<Vec<_>>()
            .join(", ");
        let list = self
            .document
            .query_selector_all(&selector)
            .map_err(|e| DomError::query(describe(&e)))?;

        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn replace_with_marker(
        &mut self,
        target: &Element,
        marker: &DiagramMarker,
    ) -> Result<Element, DomError> {
        if !target.is_connected() {
            return Err(DomError::Detached);
        }
        let parent = target.parent_node().ok_or(DomError::Detached)?;
        let mutation = |e: JsValue| DomError::mutation(describe(&e));

        let element = self.document.create_element("div").map_err(mutation)?;
        element.class_list().add_1(&marker.class).map_err(mutation)?;
        element
            .set_attribute(CONVERTED_ATTR, marker.origin.as_str())
            .map_err(mutation)?;
        element.set_text_content(Some(&marker.text));

        parent.replace_child(&element, target).map_err(mutation)?;
        Ok(element)
    }
}

/// Adapter over the engine's JS object
pub struct MermaidJs {
    handle: JsValue,
    document: web_sys::Document,
    config: Option<RenderConfig>,
}

impl MermaidJs {
    pub fn new(handle: JsValue, document: web_sys::Document) -> Self {
        Self {
            handle,
            document,
            config: None,
        }
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.handle, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

impl Engine for MermaidJs {
    fn initialize(&mut self, config: &RenderConfig) -> anyhow::Result<()> {
        let initialize = self
            .method("initialize")
            .ok_or_else(|| anyhow!("engine has no initialize()"))?;
        let options = JSON::parse(&config.to_json()?).map_err(js_error)?;
        initialize.call1(&self.handle, &options).map_err(js_error)?;
        self.config = Some(config.clone());
        Ok(())
    }

    /// Prefer `run({ querySelector })`, fall back to `init(undefined, nodes)`
    fn render(&mut self, selector: &MarkerSelector) -> anyhow::Result<()> {
        let css = selector.css();

        if let Some(run) = self.method("run") {
            let options = Object::new();
            Reflect::set(&options, &JsValue::from_str("querySelector"), &JsValue::from_str(&css))
                .map_err(js_error)?;
            let result = run.call1(&self.handle, &options).map_err(js_error)?;
            if let Ok(promise) = result.dyn_into::<Promise>() {
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(e) = JsFuture::from(promise).await {
                        warn!(error = %describe(&e), "engine rejected render");
                    }
                });
            }
            return Ok(());
        }

        let init = self
            .method("init")
            .ok_or_else(|| anyhow!("engine has neither run() nor init()"))?;
        let nodes = self.document.query_selector_all(&css).map_err(js_error)?;
        init.call2(&self.handle, &JsValue::UNDEFINED, &nodes)
            .map_err(js_error)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mermaid"
    }
}

/// Engine looked up on `window[global]` at every pass
///
/// When the global is swapped for a different object, the new one receives
/// the configuration the old one was initialized with.
pub struct GlobalMermaid {
    global: String,
    engine: Option<MermaidJs>,
}

impl GlobalMermaid {
    pub fn new(global: impl Into<String>) -> Self {
        Self {
            global: global.into(),
            engine: None,
        }
    }
}

impl Capability for GlobalMermaid {
    fn engine(&mut self) -> Option<&mut dyn Engine> {
        let handle = web_sys::window()
            .and_then(|window| Reflect::get(&window, &JsValue::from_str(&self.global)).ok())
            .filter(|handle| !handle.is_undefined() && !handle.is_null());

        let Some(handle) = handle else {
            self.engine = None;
            return None;
        };

        let stale = self
            .engine
            .as_ref()
            .map_or(true, |engine| engine.handle != handle);
        if stale {
            let document = web_sys::window()?.document()?;
            let previous = self.engine.take().and_then(|engine| engine.config);
            let mut engine = MermaidJs::new(handle, document);
            if let Some(config) = previous {
                debug!(global = %self.global, "engine object replaced, carrying configuration over");
                if let Err(e) = engine.initialize(&config) {
                    warn!(error = %e, "failed to configure replacement engine");
                }
            }
            self.engine = Some(engine);
        }

        self.engine.as_mut().map(|engine| engine as &mut dyn Engine)
    }
}

type WebListener = SignalListener<WebDocument, GlobalMermaid>;

/// Listener, queue and pass count shared by every event callback
#[derive(Clone)]
struct Pump {
    listener: Rc<RefCell<WebListener>>,
    queue: SignalQueue,
    passes: Rc<Cell<u64>>,
}

impl Pump {
    /// Queue `signal`, then drain unless a pass is already running
    ///
    /// A signal raised from inside a pass stays queued and is handled by the
    /// drain loop that is already on the stack.
    fn signal(&self, signal: Signal) {
        self.queue.push(signal);
        if let Ok(mut listener) = self.listener.try_borrow_mut() {
            listener.drain(&self.queue);
            self.passes.set(listener.synchronizer().passes());
        }
    }
}

/// Handle returned by [`install`]
#[wasm_bindgen]
pub struct SyncHandle {
    pump: Pump,
}

#[wasm_bindgen]
impl SyncHandle {
    /// Run a content-changed pass now
    pub fn resync(&self) {
        self.pump.signal(Signal::ContentChanged);
    }

    /// Passes started so far
    ///
    /// Updated whenever the signal queue has been drained, so a call made
    /// from inside a pass sees the count from before that drain began.
    pub fn passes(&self) -> u32 {
        u32::try_from(self.pump.passes.get()).unwrap_or(u32::MAX)
    }
}

/// Start synchronizing the current document
///
/// `config` is an optional JSON [`SyncConfig`]. Listens for
/// `DOMContentLoaded` (or runs straight away when the document is already
/// parsed) and for the configured content-change event.
#[wasm_bindgen]
pub fn install(config: Option<String>) -> Result<SyncHandle, JsValue> {
    let config = match config {
        Some(json) => SyncConfig::from_json(&json),
        None => Ok(SyncConfig::default()),
    }
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document in this context"))?;

    let change_event = config.change_event.clone();
    let synchronizer = Synchronizer::new(
        WebDocument::new(document.clone()),
        GlobalMermaid::new(config.engine_global.as_str()),
        config,
    );
    let pump = Pump {
        listener: Rc::new(RefCell::new(SignalListener::new(synchronizer))),
        queue: SignalQueue::new(),
        passes: Rc::new(Cell::new(0)),
    };

    for name in [READY_EVENT, change_event.as_str()] {
        let Some(signal) = Signal::from_event(name, &change_event) else {
            continue;
        };
        let pump = pump.clone();
        let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            pump.signal(signal);
        });
        document.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
        // Listeners live as long as the page
        callback.forget();
    }

    if document.ready_state() != "loading" {
        pump.signal(Signal::Ready);
    }

    info!(%change_event, "diagram synchronization installed");
    Ok(SyncHandle { pump })
}
