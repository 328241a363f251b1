// ── Redraw signalling ──
//
// Producers and command handlers mark panels dirty; the render loop
// waits on the signal, takes the whole dirty set at once and repaints.
// Any number of requests between two frames collapse into one.

use std::sync::atomic::{AtomicU8, Ordering};

use strum::{EnumIter, IntoEnumIterator};
use tokio::sync::Notify;

/// Independently repaintable areas of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Panel {
    Header,
    System,
    Weather,
    Clock,
    Todo,
    Footer,
}

impl Panel {
    const fn bit(self) -> u8 {
        match self {
            Self::Header => 1,
            Self::System => 1 << 1,
            Self::Weather => 1 << 2,
            Self::Clock => 1 << 3,
            Self::Todo => 1 << 4,
            Self::Footer => 1 << 5,
        }
    }
}

/// A set of panels, packed into a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSet(u8);

impl PanelSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Panel::iter().collect()
    }

    pub fn of(panels: &[Panel]) -> Self {
        panels.iter().copied().collect()
    }

    pub fn insert(&mut self, panel: Panel) {
        self.0 |= panel.bit();
    }

    pub fn with(mut self, panel: Panel) -> Self {
        self.insert(panel);
        self
    }

    pub const fn contains(self, panel: Panel) -> bool {
        self.0 & panel.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Panel> {
        Panel::iter().filter(move |p| self.contains(*p))
    }
}

impl FromIterator<Panel> for PanelSet {
    fn from_iter<I: IntoIterator<Item = Panel>>(iter: I) -> Self {
        let mut set = Self::empty();
        for panel in iter {
            set.insert(panel);
        }
        set
    }
}

/// Coalescing dirty-panel signal shared between producers and the
/// render loop.
#[derive(Debug, Default)]
pub struct RedrawSignal {
    pending: AtomicU8,
    notify: Notify,
}

impl RedrawSignal {
    pub fn request(&self, panel: Panel) {
        self.request_all(PanelSet::empty().with(panel));
    }

    pub fn request_all(&self, panels: PanelSet) {
        if panels.is_empty() {
            return;
        }
        self.pending.fetch_or(panels.0, Ordering::AcqRel);
        // notify_one stores a permit when nobody is waiting, so a request
        // made between two waits is never lost.
        self.notify.notify_one();
    }

    /// Take and reset the dirty set.
    pub fn take(&self) -> PanelSet {
        PanelSet(self.pending.swap(0, Ordering::AcqRel))
    }

    /// Resolves once at least one request was made since the last wait.
    pub async fn changed(&self) {
        self.notify.notified().await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn requests_coalesce() {
        let signal = RedrawSignal::default();
        signal.request(Panel::Todo);
        signal.request(Panel::Todo);
        signal.request(Panel::Footer);

        let dirty = signal.take();
        assert_eq!(dirty.iter().collect::<Vec<_>>(), vec![Panel::Todo, Panel::Footer]);
        assert!(signal.take().is_empty());
    }

    #[test]
    fn all_contains_every_panel() {
        let all = PanelSet::all();
        assert!(Panel::iter().all(|p| all.contains(p)));
    }

    #[tokio::test]
    async fn request_before_wait_is_not_lost() {
        let signal = Arc::new(RedrawSignal::default());
        signal.request(Panel::Clock);
        tokio::time::timeout(Duration::from_millis(100), signal.changed())
            .await
            .unwrap();
        assert!(signal.take().contains(Panel::Clock));
    }

    #[tokio::test]
    async fn waiter_wakes_on_request() {
        let signal = Arc::new(RedrawSignal::default());
        let waiter = {
            let signal = Arc::clone(&signal);
            tokio::spawn(async move { signal.changed().await })
        };
        tokio::task::yield_now().await;
        signal.request(Panel::Weather);
        tokio::time::timeout(Duration::from_millis(500), waiter)
            .await
            .unwrap()
            .unwrap();
    }
}
