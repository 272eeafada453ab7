//! Time- and scroll-driven animation: easing curves, repeating tweens,
//! scroll triggers with pinning, and the process-wide setup guard.

pub mod clock;
pub mod ease;
pub mod registry;
pub mod scroll;
pub mod tween;

pub use clock::FrameClock;
pub use ease::Ease;
pub use registry::OneTimeSetup;
pub use scroll::{Anchor, Edge, FadeBinding, Pin, PinPlacement, ScrollRange, TriggerSpec};
pub use tween::{Repeat, Tween};
