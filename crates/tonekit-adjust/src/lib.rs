//! # tonekit-adjust
//!
//! The version-locked hue/saturation operator.
//!
//! # Modules
//!
//! - [`param`] - [`ParamKind`] and [`SliderConfig`]
//! - [`version`] - [`OperationVersion`] and its frozen control lists
//! - [`params`] - [`ParameterSet`] with rounding, change detection and
//!   lock-free [`ParamSnapshot`]s for render threads
//! - [`pipeline`] - [`TransformPipeline`], the render stages derived from
//!   one snapshot
//! - [`operation`] - [`HueSaturationOperation`], tying the above together
//!
//! # Threading
//!
//! ```text
//!  editing thread                     render threads
//!  ──────────────                     ──────────────
//!  HueSaturationOperation             ParamsReader::snapshot()
//!    set_parameter_value(s) ─store──►   (one atomic load)
//!    pipeline()  (memoized)             TransformPipeline::from_snapshot
//!                                       render / render_tiled
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod operation;
pub mod param;
pub mod params;
pub mod pipeline;
pub mod version;

pub use error::{AdjustError, AdjustResult};
pub use operation::HueSaturationOperation;
pub use param::{ParamKind, SliderConfig};
pub use params::{ParamSnapshot, ParamUpdate, ParameterSet, ParamsReader};
pub use pipeline::TransformPipeline;
pub use version::OperationVersion;
