//! Settings shared by every frame of a GIF.

use crate::extension::{DisposalMethod, GraphicControl, Loops};

/// What to do with a frame that does not fit on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Fail with [crate::CanvasError::OutOfBounds].
    #[default]
    Reject,
    /// Drop the columns and rows outside of the canvas. A frame with no pixel left on the
    /// canvas is still rejected.
    Crop,
}

/// Encoding settings.
///
/// `delay`, `disposal`, `transparent`, `user_input` and `transparency_flag` are defaults for
/// frames without their own [GraphicControl]: if any is set, such frames get a graphic control
/// extension built from them.
///
/// # Examples
///
/// ```
/// use gifenc::{BoundsPolicy, GifConfig, Loops};
///
/// let config = GifConfig::new()
///     .with_loops(-1)
///     .with_delay(4)
///     .with_bounds(BoundsPolicy::Crop);
///
/// assert_eq!(config.loops, Loops::Infinite);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GifConfig {
    pub loops: Loops,
    /// In hundredths of a second.
    pub delay: Option<u16>,
    pub disposal: Option<DisposalMethod>,
    pub transparent: Option<u8>,
    pub user_input: bool,
    /// Overrides the transparency flag, see [GraphicControl::transparency_flag].
    pub transparency_flag: Option<bool>,
    /// Global color table index of the background.
    pub background: u8,
    /// Bits per primary color of the source, defaults to the global table's bit size.
    pub color_resolution: Option<u8>,
    pub bounds: BoundsPolicy,
}

impl GifConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loops<L: Into<Loops>>(mut self, loops: L) -> Self {
        self.loops = loops.into().normalized();
        self
    }

    pub fn with_delay(mut self, delay: u16) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_disposal(mut self, disposal: DisposalMethod) -> Self {
        self.disposal = Some(disposal);
        self
    }

    pub fn with_transparent(mut self, index: u8) -> Self {
        self.transparent = Some(index);
        self
    }

    pub fn with_user_input(mut self, user_input: bool) -> Self {
        self.user_input = user_input;
        self
    }

    pub fn with_transparency_flag(mut self, flag: bool) -> Self {
        self.transparency_flag = Some(flag);
        self
    }

    pub fn with_background(mut self, index: u8) -> Self {
        self.background = index;
        self
    }

    pub fn with_color_resolution(mut self, bits: u8) -> Self {
        self.color_resolution = Some(bits);
        self
    }

    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    /// Make every field of `control` the default for frames without their own.
    pub(crate) fn set_default_control(&mut self, control: GraphicControl) {
        self.delay = Some(control.delay);
        self.disposal = Some(control.disposal);
        self.transparent = control.transparent;
        self.user_input = control.user_input;
        self.transparency_flag = control.transparency_flag;
    }

    /// Graphic control for frames that have none, if the defaults call for one.
    pub(crate) fn default_control(&self) -> Option<GraphicControl> {
        if self.delay.is_none()
            && self.disposal.is_none()
            && self.transparent.is_none()
            && !self.user_input
            && self.transparency_flag.is_none()
        {
            return None;
        }

        Some(GraphicControl {
            disposal: self.disposal.unwrap_or_default(),
            delay: self.delay.unwrap_or(0),
            transparent: self.transparent,
            user_input: self.user_input,
            transparency_flag: self.transparency_flag,
        })
    }
}
