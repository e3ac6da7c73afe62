//! Browser (`wasm32`) implementation of [`bb_dom::HostDocument`].
//!
//! Handles are `web_sys::Node`s. Attributes are assigned as JS properties
//! with `Reflect.set`, so `className`, `htmlFor` and friends behave exactly
//! as they do when set from script. On other targets the crate is empty.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebDocument;
