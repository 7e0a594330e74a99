//! The hue/saturation operator.

use std::sync::Arc;

#[allow(unused_imports)]
use tracing::{debug, trace};

use tonekit_core::RgbImage;
use tonekit_ops::{BlendState, Primitives};

use crate::AdjustResult;
use crate::param::{ParamKind, SliderConfig};
use crate::params::{ParamSnapshot, ParamUpdate, ParameterSet, ParamsReader};
use crate::pipeline::TransformPipeline;
use crate::version::OperationVersion;

/// A version-locked hue/saturation operator.
///
/// The editing thread owns the operator and changes its parameters. The
/// derived [`TransformPipeline`] is rebuilt lazily the first time it is
/// asked for after a change, and shared from then on.
///
/// ```rust
/// use tonekit_adjust::{HueSaturationOperation, OperationVersion, ParamKind};
/// use tonekit_core::RgbImage;
/// use tonekit_ops::{BlendState, CpuPrimitives};
///
/// let mut op = HueSaturationOperation::new(OperationVersion::V3);
/// op.set_parameter_value(ParamKind::Saturation, 25.0).unwrap();
///
/// let back = RgbImage::filled(4, 4, [0.6, 0.4, 0.3]);
/// let out = op.render(&CpuPrimitives, &back, &BlendState::default()).unwrap();
/// assert_ne!(out, back);
/// ```
#[derive(Debug)]
pub struct HueSaturationOperation {
    version: OperationVersion,
    params: ParameterSet,
    cached: Option<(u64, Arc<TransformPipeline>)>,
}

impl HueSaturationOperation {
    /// Creates the operator with every control of `version` at its default.
    pub fn new(version: OperationVersion) -> Self {
        let mut params = ParameterSet::new();
        for &kind in version.active_params() {
            params.add_parameter_key(kind);
        }
        debug!(version = version.type_name(), "operation created");
        Self {
            version,
            params,
            cached: None,
        }
    }

    /// The version this operator is locked to.
    pub fn operation_type(&self) -> OperationVersion {
        self.version
    }

    /// Controls in declared order.
    pub fn parameter_keys(&self) -> &[ParamKind] {
        self.params.keys()
    }

    /// Slider configuration of an active control.
    pub fn slider_config(&self, kind: ParamKind) -> Option<&SliderConfig> {
        self.params.slider_config(kind)
    }

    /// Replaces the slider configuration of an active control.
    pub fn configure_parameter(&mut self, kind: ParamKind, config: SliderConfig) -> AdjustResult<()> {
        self.params.configure_parameter(kind, config)
    }

    /// Current value of an active control.
    pub fn value(&self, kind: ParamKind) -> Option<f32> {
        self.params.value(kind)
    }

    /// Sets one control. See [`ParameterSet::set_parameter_value`].
    pub fn set_parameter_value(&mut self, kind: ParamKind, value: f32) -> AdjustResult<ParamUpdate> {
        self.params.set_parameter_value(kind, value)
    }

    /// Sets several controls at once. See [`ParameterSet::set_parameter_values`].
    pub fn set_parameter_values(&mut self, values: &[(ParamKind, f32)]) -> AdjustResult<Vec<ParamUpdate>> {
        self.params.set_parameter_values(values)
    }

    /// Installs the host callback for accepted changes.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: Fn(ParamKind, f32) + Send + Sync + 'static,
    {
        self.params.set_listener(listener);
    }

    /// Whether the default state is a no-op edit. Always true.
    pub fn is_neutral_default(&self) -> bool {
        self.params.is_neutral_default()
    }

    /// Current values.
    pub fn snapshot(&self) -> ParamSnapshot {
        self.params.snapshot()
    }

    /// A handle render threads can take snapshots from.
    pub fn reader(&self) -> ParamsReader {
        self.params.reader()
    }

    /// Returns true if the cached pipeline is out of date.
    pub fn is_stale(&self) -> bool {
        !matches!(&self.cached, Some((rev, _)) if *rev == self.params.revision())
    }

    /// The pipeline for the current values, rebuilt only after a change.
    pub fn pipeline(&mut self) -> Arc<TransformPipeline> {
        let revision = self.params.revision();
        if let Some((rev, pipeline)) = &self.cached {
            if *rev == revision {
                trace!(revision, "pipeline cache hit");
                return Arc::clone(pipeline);
            }
        }
        let pipeline = Arc::new(TransformPipeline::from_snapshot(self.params.snapshot()));
        self.cached = Some((revision, Arc::clone(&pipeline)));
        pipeline
    }

    /// Renders the operator over `back` in one pass.
    pub fn render<P: Primitives + ?Sized>(
        &mut self,
        primitives: &P,
        back: &RgbImage,
        state: &BlendState,
    ) -> AdjustResult<RgbImage> {
        self.pipeline().render(primitives, back, state)
    }

    /// Renders the operator over `back` tile by tile.
    pub fn render_tiled<P: Primitives + ?Sized>(
        &mut self,
        primitives: &P,
        back: &RgbImage,
        state: &BlendState,
        tile_size: u32,
    ) -> AdjustResult<RgbImage> {
        self.pipeline().render_tiled(primitives, back, state, tile_size)
    }
}

impl Default for HueSaturationOperation {
    fn default() -> Self {
        Self::new(OperationVersion::default())
    }
}
