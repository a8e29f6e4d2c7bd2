#![doc = "poimosaic public API"]
mod common;
pub mod config;
pub mod mosaic;
pub mod parallel;
mod pipeline;
pub mod route;
pub mod tiles;

#[doc(inline)]
pub use config::{MosaicConfig, ParallelConfig, PoiConfig, Side};

#[doc(inline)]
pub use pipeline::{annotate_mosaic, render_mosaic, MosaicReport};

#[cfg(feature = "download")]
#[doc(inline)]
pub use pipeline::run_mosaic;

#[doc(inline)]
pub use parallel::{run_parallel, ParallelReport};
