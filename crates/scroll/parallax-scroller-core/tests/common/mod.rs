#![allow(dead_code)]
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use parallax_scroller_core::{Listener, ScrollEvent, ScrollHost, ScrollStage, SourceNode};
use parallax_test_fixtures::Scene;

/// In-memory page: nodes are addressed by index.
#[derive(Debug, Default)]
pub struct MockHost {
    pub viewport_height: f64,
    pub scroll_offset: f64,
    pub nodes: Vec<SourceNode<usize>>,
    pub styles: HashMap<(usize, String), String>,
    pub writes: usize,
    pub document_height: Option<f64>,
    pub root_prepared: bool,
}

impl MockHost {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    pub fn from_scene(scene: &Scene) -> Self {
        let mut host = Self::new(scene.viewport_height);
        for (idx, node) in scene.nodes.iter().enumerate() {
            host.nodes
                .push(SourceNode::new(idx, node.attributes.iter().cloned()));
        }
        host
    }

    pub fn with_node(mut self, attrs: &[(&str, &str)]) -> Self {
        let idx = self.nodes.len();
        self.nodes.push(SourceNode::new(idx, attrs.iter().copied()));
        self
    }

    pub fn style(&self, handle: usize, property: &str) -> Option<&str> {
        self.styles
            .get(&(handle, property.to_string()))
            .map(String::as_str)
    }

    /// Place the scroll offset at `fraction` of the scrollable range.
    pub fn scroll_to_fraction(&mut self, fraction: f64) {
        self.scroll_offset = fraction * (self.scroll_extent() - self.viewport_height);
    }
}

impl ScrollHost for MockHost {
    type Handle = usize;

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn scroll_extent(&self) -> f64 {
        self.document_height
            .unwrap_or(0.0)
            .max(self.viewport_height)
    }

    fn discover(&self, designation_attribute: &str) -> Vec<SourceNode<usize>> {
        self.nodes
            .iter()
            .filter(|n| n.attribute(designation_attribute).is_some())
            .cloned()
            .collect()
    }

    fn set_style(&mut self, handle: &usize, property: &str, value: &str) {
        self.writes += 1;
        self.styles
            .insert((*handle, property.to_string()), value.to_string());
    }

    fn set_document_height(&mut self, height: Option<f64>) {
        self.document_height = height;
    }

    fn prepare_root(&mut self) {
        self.root_prepared = true;
    }
}

pub type Seen = Rc<RefCell<Vec<ScrollEvent>>>;

pub fn recorder() -> (Seen, Option<Box<dyn Listener>>) {
    let seen: Seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener = move |e: &ScrollEvent| sink.borrow_mut().push(e.clone());
    (seen, Some(Box::new(listener)))
}

/// `(checkpoint, stage)` pairs of checkpoint events for `name`, in delivery order.
pub fn checkpoints(seen: &Seen, name: &str) -> Vec<(f64, ScrollStage)> {
    seen.borrow()
        .iter()
        .filter(|e| e.name == name && e.stage != ScrollStage::Init)
        .filter_map(|e| e.checkpoint.map(|c| (c, e.stage)))
        .collect()
}

pub fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn approx_style(host: &MockHost, handle: usize, property: &str, expected: f64) {
    let raw = host
        .style(handle, property)
        .unwrap_or_else(|| panic!("no {property} written for node {handle}"));
    let value: f64 = raw.parse().unwrap_or_else(|_| panic!("{raw} is not numeric"));
    approx(value, expected, 1e-9);
}
