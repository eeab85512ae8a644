//! Panic capture for scenario bodies.
//!
//! A process-wide hook is installed once. On threads that are currently
//! driving a garden it records where the panic was raised (and a backtrace
//! when `RUST_BACKTRACE` enables one) instead of printing, so the frame
//! boundary can report the location in its `F:`/`E:` line. Every other
//! thread falls through to the previously installed hook.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::cell::{Cell, RefCell};
use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use crate::core::classifier::PanicSite;

thread_local! {
    static CAPTURE_DEPTH: Cell<usize> = const { Cell::new(0) };
    static LAST_SITE: RefCell<Option<PanicSite>> = const { RefCell::new(None) };
}

static INSTALL: Once = Once::new();

/// Keeps panic capture enabled on this thread while alive.
#[derive(Debug)]
pub struct CaptureGuard {
    _private: (),
}

impl CaptureGuard {
    pub fn install() -> Self {
        INSTALL.call_once(install_hook);
        CAPTURE_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self { _private: () }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        let _ = CAPTURE_DEPTH.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Take the site recorded for the most recent panic on this thread.
pub fn take_site() -> Option<PanicSite> {
    LAST_SITE
        .try_with(|slot| slot.borrow_mut().take())
        .ok()
        .flatten()
}

fn install_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        let capturing = CAPTURE_DEPTH
            .try_with(|depth| depth.get() > 0)
            .unwrap_or(false);
        if !capturing {
            previous(info);
            return;
        }
        let backtrace = Backtrace::capture();
        let site = PanicSite {
            location: info.location().map(ToString::to_string),
            backtrace: (backtrace.status() == BacktraceStatus::Captured)
                .then(|| backtrace.to_string()),
        };
        let _ = LAST_SITE.try_with(|slot| *slot.borrow_mut() = Some(site));
    }));
}
