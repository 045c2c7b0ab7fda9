//! [`ScrollHost`] over the live document.

use parallax_scroller_core::{ScrollHost, SourceNode};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

pub struct DomHost {
    pub(crate) window: Window,
    document: Document,
    root: HtmlElement,
}

impl DomHost {
    pub fn new(window: Window, document: Document, root: HtmlElement) -> Self {
        Self {
            window,
            document,
            root,
        }
    }

    fn scrolling_element(&self) -> Option<Element> {
        self.document
            .document_element()
            .or_else(|| self.document.body().map(Into::into))
    }

    fn write(element: &HtmlElement, property: &str, value: &str) {
        if let Err(err) = element.style().set_property(property, value) {
            log::warn!("failed to set {property}: {err:?}");
        }
    }
}

fn attributes(element: &Element) -> Vec<(String, String)> {
    let map = element.attributes();
    (0..map.length())
        .filter_map(|i| map.item(i))
        .map(|attr| (attr.name(), attr.value()))
        .collect()
}

impl ScrollHost for DomHost {
    type Handle = HtmlElement;

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_offset(&self) -> f64 {
        let y = self.window.scroll_y().unwrap_or(0.0);
        if y != 0.0 {
            return y;
        }
        self.scrolling_element()
            .map(|el| f64::from(el.scroll_top()))
            .unwrap_or(0.0)
    }

    fn scroll_extent(&self) -> f64 {
        self.scrolling_element()
            .map(|el| f64::from(el.scroll_height()))
            .unwrap_or(0.0)
    }

    fn client_height(&self) -> f64 {
        self.scrolling_element()
            .map(|el| f64::from(el.client_height()))
            .unwrap_or(0.0)
    }

    fn discover(&self, designation_attribute: &str) -> Vec<SourceNode<HtmlElement>> {
        let selector = format!("[{designation_attribute}]");
        let nodes = match self.document.query_selector_all(&selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                log::warn!("invalid selector {selector}: {err:?}");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(|element| {
                let attrs = attributes(&element);
                SourceNode::new(element, attrs)
            })
            .collect()
    }

    fn set_style(&mut self, handle: &HtmlElement, property: &str, value: &str) {
        Self::write(handle, property, value);
    }

    fn set_document_height(&mut self, height: Option<f64>) {
        let Some(body) = self.document.body() else {
            return;
        };
        match height {
            Some(px) => Self::write(&body, "height", &format!("{px}px")),
            None => {
                let _ = body.style().remove_property("height");
            }
        }
    }

    fn prepare_root(&mut self) {
        for (property, value) in [
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
        ] {
            Self::write(&self.root, property, value);
        }
    }
}
