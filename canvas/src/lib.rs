//! Shape interaction engine for the sketchroom drawing canvas.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of a drawing surface: translating raw pointer, wheel and key
//! events into shape edits, maintaining camera state for pan/zoom, hit-testing
//! shapes under rotation, persisting each room to a blob store, and rendering
//! the scene. The host layer is responsible only for wiring DOM events to the
//! engine and carrying out the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Shape records and the insertion-ordered shape store |
//! | [`storage`] | Blob-store contract and room load/save |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, cursors, input event types and the gesture state machine |
//! | [`style`] | Ambient stroke/fill style |
//! | [`hit`] | Point-in-shape tests and handle layout |
//! | [`render`] | Scene rendering |
//! | [`consts`] | Shared numeric and colour constants |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod hit;
pub mod input;
pub mod render;
pub mod storage;
pub mod style;
