//! Parameter storage with lock-free snapshots.
//!
//! A [`ParameterSet`] is owned by the editing thread, which mutates it
//! through `&mut self`. Render threads never see the set itself; they hold a
//! [`ParamsReader`] and take [`ParamSnapshot`]s from it.
//!
//! All five values are whole numbers in a small range, so they are packed
//! into a single `AtomicU64`:
//!
//! ```text
//!  63    60 59     48 47     36 35     24 23     12 11      0
//! +--------+---------+---------+---------+---------+---------+
//! | unused | contrast| luminos.| vibrance| saturat.|   hue   |
//! +--------+---------+---------+---------+---------+---------+
//!            12-bit two's complement per slot, [-2047, 2047]
//! ```
//!
//! A snapshot is one atomic load, so a reader always sees a set of values
//! that the writer published together. Batched updates go through
//! [`ParameterSet::set_parameter_values`] and are published with a single
//! store.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[allow(unused_imports)]
use tracing::{debug, trace, warn};

use crate::param::{ParamKind, SliderConfig};
use crate::{AdjustError, AdjustResult};

const SLOT_BITS: u32 = 12;
const SLOT_MASK: u64 = (1 << SLOT_BITS) - 1;

/// Largest magnitude a parameter value can take.
pub const MAX_PACKED_VALUE: i16 = 2047;

/// Host callback fired with the rounded value after every accepted change.
pub type ParamListener = Box<dyn Fn(ParamKind, f32) + Send + Sync>;

/// Outcome of a parameter update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    /// The rounded value equals the stored one; nothing happened.
    Unchanged,
    /// The value was stored; carries the rounded value.
    Changed(f32),
    /// The parameter is not part of this set and was ignored.
    Inactive,
}

impl ParamUpdate {
    /// Returns true if the update changed the stored value.
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed(_))
    }
}

/// One consistent set of parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParamSnapshot {
    values: [i16; 5],
}

impl ParamSnapshot {
    /// Every parameter at zero.
    pub const NEUTRAL: Self = Self { values: [0; 5] };

    /// Value of one parameter.
    #[inline]
    pub fn get(&self, kind: ParamKind) -> f32 {
        self.values[kind.index()] as f32
    }

    /// Returns a copy with `kind` set to `value`, rounded to a whole unit.
    ///
    /// Values outside the storable range are clamped to it.
    pub fn with(mut self, kind: ParamKind, value: f32) -> Self {
        let limit = MAX_PACKED_VALUE as f32;
        let v = if value.is_finite() { value.round().clamp(-limit, limit) } else { 0.0 };
        self.values[kind.index()] = v as i16;
        self
    }

    /// Returns true if every parameter is zero.
    pub fn is_neutral(&self) -> bool {
        self.values.iter().all(|&v| v == 0)
    }

    fn pack(&self) -> u64 {
        self.values.iter().enumerate().fold(0u64, |word, (slot, &v)| {
            word | (((v as u64) & SLOT_MASK) << (slot as u32 * SLOT_BITS))
        })
    }

    fn unpack(word: u64) -> Self {
        let mut values = [0i16; 5];
        for (slot, v) in values.iter_mut().enumerate() {
            let raw = ((word >> (slot as u32 * SLOT_BITS)) & SLOT_MASK) as u16;
            // sign-extend from 12 bits
            *v = ((raw << 4) as i16) >> 4;
        }
        Self { values }
    }
}

/// Read handle onto a [`ParameterSet`], cheap to clone and share.
#[derive(Debug, Clone)]
pub struct ParamsReader {
    shared: Arc<AtomicU64>,
}

impl ParamsReader {
    /// Latest published values.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot::unpack(self.shared.load(Ordering::Acquire))
    }
}

/// The registered parameters of one operator and their current values.
pub struct ParameterSet {
    keys: Vec<ParamKind>,
    configs: [Option<SliderConfig>; 5],
    current: ParamSnapshot,
    revision: u64,
    shared: Arc<AtomicU64>,
    listener: Option<ParamListener>,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterSet")
            .field("keys", &self.keys)
            .field("current", &self.current)
            .field("revision", &self.revision)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

impl ParameterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            configs: Default::default(),
            current: ParamSnapshot::NEUTRAL,
            revision: 0,
            shared: Arc::new(AtomicU64::new(ParamSnapshot::NEUTRAL.pack())),
            listener: None,
        }
    }

    /// Registers `kind` with its default slider configuration.
    ///
    /// Registration order is the order [`keys`](Self::keys) reports and has
    /// no effect on rendering. Returns false if `kind` was already
    /// registered.
    pub fn add_parameter_key(&mut self, kind: ParamKind) -> bool {
        if self.is_registered(kind) {
            return false;
        }
        self.keys.push(kind);
        self.configs[kind.index()] = Some(kind.default_config());
        trace!(%kind, "parameter registered");
        true
    }

    /// Replaces the slider configuration of a registered parameter and
    /// resets its value to the new default.
    pub fn configure_parameter(&mut self, kind: ParamKind, config: SliderConfig) -> AdjustResult<()> {
        if !self.is_registered(kind) {
            return Err(AdjustError::UnknownParameter(kind));
        }
        validate_config(kind, &config)?;

        let default = config.round(config.default);
        self.configs[kind.index()] = Some(config);
        let next = self.current.with(kind, default);
        if next != self.current {
            self.publish(next);
        }
        debug!(%kind, default, "parameter configured");
        Ok(())
    }

    /// Registered parameters in registration order.
    pub fn keys(&self) -> &[ParamKind] {
        &self.keys
    }

    /// Returns true if `kind` has been registered.
    pub fn is_registered(&self, kind: ParamKind) -> bool {
        self.configs[kind.index()].is_some()
    }

    /// Slider configuration of a registered parameter.
    pub fn slider_config(&self, kind: ParamKind) -> Option<&SliderConfig> {
        self.configs[kind.index()].as_ref()
    }

    /// Current value of a registered parameter.
    pub fn value(&self, kind: ParamKind) -> Option<f32> {
        self.is_registered(kind).then(|| self.current.get(kind))
    }

    /// Rounds and stores one value.
    ///
    /// The value is rounded to the nearest whole unit and clamped into the
    /// slider range. If that equals the stored value nothing happens.
    /// Otherwise the value is stored, published to readers and passed to
    /// the listener. Unregistered parameters are ignored.
    ///
    /// # Errors
    ///
    /// [`AdjustError::NonFinite`] for NaN or infinite input.
    pub fn set_parameter_value(&mut self, kind: ParamKind, value: f32) -> AdjustResult<ParamUpdate> {
        let (next, update) = self.stage(self.current, kind, value)?;
        if let ParamUpdate::Changed(rounded) = update {
            self.publish(next);
            self.notify(kind, rounded);
        }
        Ok(update)
    }

    /// Rounds and stores several values, publishing them together.
    ///
    /// Readers see either none or all of the changes. Nothing is stored if
    /// any value is non-finite. When a kind appears more than once the last
    /// entry wins, and every entry for that kind reports the same outcome
    /// measured against the values stored before the call. The listener
    /// fires once per changed kind with its final value.
    pub fn set_parameter_values(&mut self, values: &[(ParamKind, f32)]) -> AdjustResult<Vec<ParamUpdate>> {
        let mut last: [Option<f32>; 5] = [None; 5];
        for &(kind, value) in values {
            if !value.is_finite() {
                return Err(AdjustError::NonFinite { kind, value });
            }
            last[kind.index()] = Some(value);
        }

        let mut next = self.current;
        let mut outcome: [Option<ParamUpdate>; 5] = [None; 5];
        for kind in ParamKind::ALL {
            if let Some(value) = last[kind.index()] {
                let (staged, update) = self.stage(next, kind, value)?;
                next = staged;
                outcome[kind.index()] = Some(update);
            }
        }

        if next != self.current {
            self.publish(next);
            for kind in ParamKind::ALL {
                if let Some(ParamUpdate::Changed(rounded)) = outcome[kind.index()] {
                    self.notify(kind, rounded);
                }
            }
        }
        Ok(values
            .iter()
            .map(|&(kind, _)| outcome[kind.index()].unwrap_or(ParamUpdate::Inactive))
            .collect())
    }

    /// Installs the host callback for accepted changes.
    pub fn set_listener<F>(&mut self, listener: F)
    where
        F: Fn(ParamKind, f32) + Send + Sync + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Current values.
    pub fn snapshot(&self) -> ParamSnapshot {
        self.current
    }

    /// A handle render threads can take snapshots from.
    pub fn reader(&self) -> ParamsReader {
        ParamsReader {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Counter bumped on every published change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the all-default state counts as a no-op edit.
    ///
    /// Always true: every parameter defaults to a neutral value.
    pub fn is_neutral_default(&self) -> bool {
        true
    }

    fn stage(&self, base: ParamSnapshot, kind: ParamKind, value: f32) -> AdjustResult<(ParamSnapshot, ParamUpdate)> {
        if !value.is_finite() {
            return Err(AdjustError::NonFinite { kind, value });
        }
        let Some(config) = self.slider_config(kind) else {
            warn!(%kind, value, "ignoring update of inactive parameter");
            return Ok((base, ParamUpdate::Inactive));
        };
        let rounded = config.round(value);
        if rounded == base.get(kind) {
            trace!(%kind, rounded, "parameter unchanged");
            return Ok((base, ParamUpdate::Unchanged));
        }
        Ok((base.with(kind, rounded), ParamUpdate::Changed(rounded)))
    }

    fn publish(&mut self, next: ParamSnapshot) {
        self.current = next;
        self.revision += 1;
        self.shared.store(next.pack(), Ordering::Release);
        debug!(revision = self.revision, values = ?next, "parameters published");
    }

    fn notify(&self, kind: ParamKind, rounded: f32) {
        if let Some(listener) = &self.listener {
            listener(kind, rounded);
        }
    }
}

fn validate_config(kind: ParamKind, config: &SliderConfig) -> AdjustResult<()> {
    let limit = MAX_PACKED_VALUE as f32;
    if ![config.min, config.max, config.default, config.step].iter().all(|v| v.is_finite()) {
        return Err(AdjustError::invalid_config(kind, "values must be finite"));
    }
    if config.min > config.max {
        return Err(AdjustError::invalid_config(
            kind,
            format!("min {} exceeds max {}", config.min, config.max),
        ));
    }
    if config.step <= 0.0 {
        return Err(AdjustError::invalid_config(kind, "step must be positive"));
    }
    if config.min.round() < -limit || config.max.round() > limit {
        return Err(AdjustError::invalid_config(
            kind,
            format!("range [{}, {}] exceeds +/-{}", config.min, config.max, MAX_PACKED_VALUE),
        ));
    }
    if config.min.ceil() > config.max.floor() {
        return Err(AdjustError::invalid_config(
            kind,
            format!("range [{}, {}] holds no whole value", config.min, config.max),
        ));
    }
    if !(config.min..=config.max).contains(&config.default) {
        return Err(AdjustError::invalid_config(kind, "default outside range"));
    }
    Ok(())
}
