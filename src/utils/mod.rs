//! Project-specific helpers shared by the page views.

pub mod html;
