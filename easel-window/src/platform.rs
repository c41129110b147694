//! The per-thread platform event loop.
//!
//! `winit` allows one event loop per process and windows can only be
//! created from inside its callbacks. The loop is therefore created lazily
//! by the first thread that opens a window, kept in a thread-local, and
//! driven non-blockingly through `pump_app_events`. Raw events are sorted
//! into one queue per window, which each [`crate::Window`] drains.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::OnceLock;
use std::thread::{self, ThreadId};
use std::time::Duration;

use winit::application::ApplicationHandler;
use winit::error::OsError;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window as WinitWindow, WindowAttributes, WindowId};

use crate::window::WindowError;

/// Thread that owns the event loop.
static OWNER: OnceLock<ThreadId> = OnceLock::new();

thread_local! {
    static PLATFORM: RefCell<Option<Rc<Platform>>> = const { RefCell::new(None) };
}

/// Pending raw events, one queue per registered window.
#[derive(Default)]
pub(crate) struct EventQueues(RefCell<HashMap<WindowId, VecDeque<WindowEvent>>>);

impl EventQueues {
    pub(crate) fn register(&self, id: WindowId) {
        self.0.borrow_mut().entry(id).or_default();
    }

    /// Queue `event`; false if `id` is not registered.
    pub(crate) fn push(&self, id: WindowId, event: WindowEvent) -> bool {
        match self.0.borrow_mut().get_mut(&id) {
            Some(queue) => {
                queue.push_back(event);
                true
            }
            None => false,
        }
    }

    pub(crate) fn pop(&self, id: WindowId) -> Option<WindowEvent> {
        self.0.borrow_mut().get_mut(&id)?.pop_front()
    }

    pub(crate) fn forget(&self, id: WindowId) {
        self.0.borrow_mut().remove(&id);
    }

    #[cfg(test)]
    fn is_registered(&self, id: WindowId) -> bool {
        self.0.borrow().contains_key(&id)
    }

    /// Pass `result` through, dropping the queue of `id` when it failed.
    pub(crate) fn forget_on_err<T>(
        &self,
        id: WindowId,
        result: Result<T, WindowError>,
    ) -> Result<T, WindowError> {
        if result.is_err() {
            self.forget(id);
        }
        result
    }
}

pub(crate) struct Platform {
    event_loop: RefCell<EventLoop<()>>,
    queues: EventQueues,
}

impl Platform {
    /// This thread's platform, created on first use.
    pub(crate) fn current() -> Result<Rc<Platform>, WindowError> {
        let me = thread::current().id();
        if OWNER.get().is_some_and(|owner| *owner != me) {
            return Err(WindowError::EventLoop(
                "the event loop belongs to another thread".into(),
            ));
        }

        PLATFORM.with(|slot| {
            let mut slot = slot.borrow_mut();
            if let Some(platform) = slot.as_ref() {
                return Ok(Rc::clone(platform));
            }
            let platform = Rc::new(Platform {
                event_loop: RefCell::new(build_event_loop()?),
                queues: EventQueues::default(),
            });
            let _ = OWNER.set(me);
            log::info!("Platform event loop created on {:?}", me);
            *slot = Some(Rc::clone(&platform));
            Ok(platform)
        })
    }

    /// Create a window and start queueing its events.
    pub(crate) fn create_window(&self, attrs: WindowAttributes) -> Result<WinitWindow, WindowError> {
        let mut pump = Pump {
            queues: &self.queues,
            request: Some(attrs),
            created: None,
        };
        self.pump_with(&mut pump);
        match pump.created {
            Some(result) => Ok(result?),
            None => Err(WindowError::EventLoop(
                "the event loop did not run; it may have exited".into(),
            )),
        }
    }

    /// Collect whatever the platform has pending, without blocking.
    pub(crate) fn pump(&self) {
        let mut pump = Pump {
            queues: &self.queues,
            request: None,
            created: None,
        };
        self.pump_with(&mut pump);
    }

    pub(crate) fn pop(&self, id: WindowId) -> Option<WindowEvent> {
        self.queues.pop(id)
    }

    /// Stop queueing events for a closed window.
    pub(crate) fn forget(&self, id: WindowId) {
        self.queues.forget(id);
    }

    /// Undo the registration of a window whose setup failed.
    pub(crate) fn forget_on_err<T>(
        &self,
        id: WindowId,
        result: Result<T, WindowError>,
    ) -> Result<T, WindowError> {
        self.queues.forget_on_err(id, result)
    }

    fn pump_with(&self, pump: &mut Pump<'_>) {
        let status = self
            .event_loop
            .borrow_mut()
            .pump_app_events(Some(Duration::ZERO), pump);
        if let PumpStatus::Exit(code) = status {
            log::warn!("Platform event loop exited with code {}", code);
        }
    }
}

fn build_event_loop() -> Result<EventLoop<()>, WindowError> {
    let mut builder = EventLoop::builder();
    // Test harnesses and worker threads are not the process main thread.
    #[cfg(any(target_os = "linux", target_os = "freebsd"))]
    {
        winit::platform::x11::EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
        winit::platform::wayland::EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
    }
    #[cfg(target_os = "windows")]
    winit::platform::windows::EventLoopBuilderExtWindows::with_any_thread(&mut builder, true);

    builder
        .build()
        .map_err(|e| WindowError::EventLoop(e.to_string()))
}

/// Handler for a single pump.
struct Pump<'a> {
    queues: &'a EventQueues,
    request: Option<WindowAttributes>,
    created: Option<Result<WinitWindow, OsError>>,
}

impl Pump<'_> {
    fn create_requested(&mut self, event_loop: &ActiveEventLoop) {
        let Some(attrs) = self.request.take() else {
            return;
        };
        let created = event_loop.create_window(attrs);
        if let Ok(window) = &created {
            self.queues.register(window.id());
        }
        self.created = Some(created);
    }
}

impl ApplicationHandler for Pump<'_> {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        event_loop.set_control_flow(ControlFlow::Poll);
        self.create_requested(event_loop);
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_requested(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if !self.queues.push(id, event) {
            log::debug!("Event for unknown window {:?} dropped", id);
        }
    }
}

// ===================================================================
// Tests
// ===================================================================
