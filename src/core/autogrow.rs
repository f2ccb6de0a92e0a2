//! # Auto-Growing Inputs
//!
//! Sizing rule for text inputs that grow with their content up to a cap.
//! The algorithm only talks to a [`GrowSurface`], so the same rule drives
//! the terminal composer and is testable with a fake.
//!
//! ```text
//! reset ─► measure natural ─► cap = floor(viewport × fraction)
//!                                   (fallback_cap without viewport)
//!       ─► height = min(natural, cap)
//!       ─► container = height + allowance      (if the policy has one)
//!       ─► compact   = height ≤ threshold      (if the policy has one)
//!       ─► list pad  = (container | cap) + allowance, pinned to bottom
//! ```

/// Sizing constants for one input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrowPolicy {
    /// Share of the viewport height the input may take.
    pub viewport_fraction: f32,
    /// Cap used when the viewport height is unknown.
    pub fallback_cap: u16,
    /// Extra height of the wrapping container beyond the input itself.
    pub container_allowance: Option<u16>,
    /// Heights at or below this are "compact".
    pub compact_threshold: Option<u16>,
    /// Extra bottom padding given to the message list.
    pub list_allowance: Option<u16>,
}

impl GrowPolicy {
    /// Chat composer, in pixels.
    pub const CHAT_COMPOSER: Self = Self {
        viewport_fraction: 0.4,
        fallback_cap: 220,
        container_allowance: Some(24),
        compact_threshold: Some(56),
        list_allowance: Some(28),
    };

    /// Landing search box, in pixels.
    pub const LANDING_SEARCH: Self = Self {
        viewport_fraction: 0.5,
        fallback_cap: 220,
        container_allowance: None,
        compact_threshold: None,
        list_allowance: None,
    };

    /// The same policy in units of `row_px`, rounded to the nearest row.
    /// `container_chrome` rows are added to the container allowance for
    /// decoration the pixel policy has no counterpart for.
    pub const fn in_rows(self, row_px: u16, container_chrome: u16) -> Self {
        const fn rows(px: u16, row_px: u16) -> u16 {
            (px + row_px / 2) / row_px
        }
        const fn opt_rows(px: Option<u16>, row_px: u16, extra: u16) -> Option<u16> {
            match px {
                Some(px) => Some(rows(px, row_px) + extra),
                None => None,
            }
        }

        Self {
            viewport_fraction: self.viewport_fraction,
            fallback_cap: rows(self.fallback_cap, row_px),
            container_allowance: opt_rows(self.container_allowance, row_px, container_chrome),
            compact_threshold: opt_rows(self.compact_threshold, row_px, 0),
            list_allowance: opt_rows(self.list_allowance, row_px, 0),
        }
    }

    pub fn cap(&self, viewport_height: Option<u16>) -> u16 {
        match viewport_height {
            Some(viewport) => (f32::from(viewport) * self.viewport_fraction).floor() as u16,
            None => self.fallback_cap,
        }
    }
}

/// Capabilities an input exposes to the sizing rule.
///
/// Only the first four are required. The hooks default to no-ops so a
/// surface without a container, compact styling or message list still
/// resizes.
pub trait GrowSurface {
    /// Drop any explicit height so `measure` sees the intrinsic size.
    fn reset_height(&mut self);
    /// Natural content height.
    fn measure(&self) -> u16;
    fn viewport_height(&self) -> Option<u16>;
    fn set_height(&mut self, height: u16);

    /// Returns false when there is no container.
    fn set_container_height(&mut self, _height: u16) -> bool {
        false
    }

    fn set_compact(&mut self, _compact: bool) {}

    /// Bottom padding for the message list, which should then be scrolled
    /// to the bottom.
    fn pad_message_list(&mut self, _padding: u16) {}
}

/// What a resize pass decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowOutcome {
    pub height: u16,
    pub cap: u16,
    pub container_height: Option<u16>,
    pub compact: Option<bool>,
    pub list_padding: Option<u16>,
}

/// Resize `surface` according to `policy`.
pub fn resize<S: GrowSurface + ?Sized>(surface: &mut S, policy: &GrowPolicy) -> GrowOutcome {
    surface.reset_height();
    let natural = surface.measure();
    let cap = policy.cap(surface.viewport_height());
    let height = natural.min(cap);
    surface.set_height(height);

    let container_height = policy.container_allowance.and_then(|allowance| {
        let container = height.saturating_add(allowance);
        surface.set_container_height(container).then_some(container)
    });

    let compact = policy.compact_threshold.map(|threshold| {
        let compact = height <= threshold;
        surface.set_compact(compact);
        compact
    });

    let list_padding = policy.list_allowance.map(|allowance| {
        let padding = container_height.unwrap_or(cap).saturating_add(allowance);
        surface.pad_message_list(padding);
        padding
    });

    GrowOutcome {
        height,
        cap,
        container_height,
        compact,
        list_padding,
    }
}
