//! Session: owns elements, checkpoint state, listener and driver for one page.
//!
//! Lifecycle:
//! - `init` installs the listener, prepares the root and builds elements;
//! - `frame` runs once per animation frame while the session is active;
//! - `rebuild` re-reads elements after a viewport resize;
//! - `destroy` detaches everything and may be called at any time, repeatedly.

use std::fmt;

use crate::config::{Config, FailurePolicy};
use crate::driver::{page_scroll_fraction, ScrollDriver};
use crate::element::AnimatedElement;
use crate::engine::{CheckpointCache, Engine, FrameContext};
use crate::host::ScrollHost;
use crate::listener::{Listener, NotificationChannel};
use crate::outputs::ScrollEvent;
use crate::Result;

/// Runtime sizing and activity flag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SessionState {
    pub active: bool,
    /// Largest keyframe constant across all elements.
    pub max_constant: f64,
    /// `max_constant * viewport_height` at the last build.
    pub full_view_height: f64,
}

pub struct Session<H> {
    config: Config,
    state: SessionState,
    elements: Vec<AnimatedElement<H>>,
    engine: Engine,
    channel: NotificationChannel,
    driver: ScrollDriver,
}

impl<H> Session<H> {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: SessionState::default(),
            elements: Vec::new(),
            engine: Engine::new(),
            channel: NotificationChannel::new(),
            driver: ScrollDriver::new(),
        }
    }

    /// Like [`Session::new`], continuing from the checkpoints of an earlier session.
    ///
    /// The cache is still cleared on rebuild when `reset_checkpoints_on_rebuild` is set.
    pub fn with_checkpoints(config: Config, checkpoints: CheckpointCache) -> Self {
        Self {
            engine: Engine::with_points(checkpoints),
            ..Self::new(config)
        }
    }

    /// Move the checkpoint cache out, e.g. to seed the next session.
    pub fn take_checkpoints(&mut self) -> CheckpointCache {
        self.engine.take_points()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn elements(&self) -> &[AnimatedElement<H>] {
        &self.elements
    }

    pub fn checkpoints(&self) -> &CheckpointCache {
        self.engine.points()
    }

    /// Forget every element's last scroll point.
    pub fn clear_checkpoints(&mut self) {
        self.engine.points_mut().clear();
    }

    /// Replace the listener; `None` keeps the current one.
    pub fn set_listener(&mut self, listener: Option<Box<dyn Listener>>) {
        self.channel.set_listener(listener);
    }

    /// Deliver an event to the listener, if one is attached.
    pub fn notify(&mut self, event: &ScrollEvent) -> bool {
        self.channel.notify(event)
    }

    /// Start (or restart) the session against `host`.
    pub fn init<T>(&mut self, host: &mut T, listener: Option<Box<dyn Listener>>) -> Result<()>
    where
        T: ScrollHost<Handle = H>,
    {
        self.channel.set_listener(listener);
        host.prepare_root();
        self.rebuild(host)
    }

    /// Rebuild every element from the host's current markup and resize the document.
    ///
    /// Elements are replaced only when the whole build succeeds.
    pub fn rebuild<T>(&mut self, host: &mut T) -> Result<()>
    where
        T: ScrollHost<Handle = H>,
    {
        let attribute = self.config.designation_attribute.clone();
        let mut elements = Vec::new();
        let mut max_constant = 0.0_f64;

        for node in host.discover(&attribute) {
            let Some(name) = node.designation(&attribute).map(str::to_string) else {
                log::debug!("skipping node without a {attribute} name");
                continue;
            };
            self.channel.notify(&ScrollEvent::init(name.as_str()));

            let element = AnimatedElement::build(name, node, &self.config)?;
            for (property, value) in element.initial_styles() {
                host.set_style(&element.handle, property, &value);
            }
            if let Some(max) = element.styles.max_constant() {
                max_constant = max_constant.max(max);
            }
            elements.push(element);
        }

        if self.config.reset_checkpoints_on_rebuild {
            self.engine.points_mut().clear();
        }

        let full_view_height = max_constant * host.viewport_height();
        log::debug!(
            "built {} scroll elements; full view height {full_view_height}px",
            elements.len()
        );

        self.elements = elements;
        self.state = SessionState {
            active: true,
            max_constant,
            full_view_height,
        };
        self.driver.reset();
        host.set_document_height(Some(full_view_height));
        Ok(())
    }

    /// One animation frame. Returns whether another frame should be scheduled.
    ///
    /// Idle frames (unchanged scroll fraction) do no element work.
    pub fn frame<T>(&mut self, host: &mut T) -> Result<bool>
    where
        T: ScrollHost<Handle = H>,
    {
        if !self.state.active {
            return Ok(false);
        }
        let fraction = page_scroll_fraction(
            host.scroll_offset(),
            host.scroll_extent(),
            host.client_height(),
        );
        if self.driver.should_render(fraction) {
            if let Err(err) = self.evaluate(host, fraction) {
                // Fail-fast errors end the loop.
                self.state.active = false;
                return Err(err);
            }
            self.driver.commit(fraction);
        }
        Ok(self.state.active)
    }

    /// Evaluate every element at `fraction` of the full view height.
    pub fn evaluate<T>(&mut self, host: &mut T, fraction: f64) -> Result<()>
    where
        T: ScrollHost<Handle = H>,
    {
        let ctx = FrameContext {
            viewport_height: host.viewport_height(),
            full_view_height: self.state.full_view_height,
        };

        for (index, element) in self.elements.iter().enumerate() {
            let result = self.engine.evaluate(index, element, fraction, ctx).map(|_| ());

            let outputs = self.engine.outputs();
            for change in &outputs.changes {
                host.set_style(&element.handle, &change.property, &change.value);
            }
            for event in &outputs.events {
                self.channel.notify(event);
            }

            if let Err(err) = result {
                match self.config.failure_policy {
                    FailurePolicy::FailFast => return Err(err),
                    FailurePolicy::IsolateElements => {
                        log::warn!("skipping element '{}': {err}", element.name);
                    }
                }
            }
        }
        Ok(())
    }

    /// Tear down: detach the listener, zero the state and drop elements.
    ///
    /// The checkpoint cache survives; use [`Session::clear_checkpoints`] to reset it.
    pub fn destroy<T>(&mut self, host: &mut T)
    where
        T: ScrollHost<Handle = H>,
    {
        self.channel.clear();
        self.state = SessionState::default();
        self.elements.clear();
        self.driver.reset();
        host.set_document_height(None);
    }
}

impl<H> Default for Session<H> {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<H> fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("elements", &self.elements.len())
            .field("channel", &self.channel)
            .field("driver", &self.driver)
            .finish()
    }
}
