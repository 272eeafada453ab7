//! Platform-neutral model of the hero scene. The wasm stage feeds these
//! types into the renderer; nothing here touches the browser.

pub mod color;
pub mod host;
pub mod stars;
pub mod title;

pub use color::Rgb;
pub use host::SceneConfig;
pub use stars::{DriftParams, PositionSink, StarField, StarFieldParams};
pub use title::{FloatingTitle, OpacityTarget, TextMeshHandle, TitleMaterial, TitleParams};
