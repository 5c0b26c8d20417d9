//! Typed texture-slot indices and per-pass collision checking.
//!
//! Bind-slot numbers used to be bare integers threaded through every call;
//! the newtype plus registry makes a double-bind within one pass a
//! construction-time error instead of a silent GPU-side aliasing bug.

use crate::error::GlintError;

/// A texture bind-slot index within a single pass's bind group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureSlot(u32);

impl TextureSlot {
    /// History (previous accumulation frame) texture, sampled by the
    /// pathtrace pass.
    pub const HISTORY: Self = Self(1);
    /// Scene color input for the composite pass.
    pub const SCENE: Self = Self(0);
    /// Bloom chain output sampled by the composite pass.
    pub const BLOOM: Self = Self(1);

    /// Create a slot with an explicit index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw bind-group binding index.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// Tracks which slots a pass has claimed for one draw's bindings.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    claimed: Vec<TextureSlot>,
}

impl SlotRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a slot for the current pass.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::SlotCollision`] if the slot is already claimed.
    pub fn claim(&mut self, slot: TextureSlot) -> Result<(), GlintError> {
        if self.claimed.contains(&slot) {
            return Err(GlintError::SlotCollision(slot));
        }
        self.claimed.push(slot);
        Ok(())
    }

    /// Validate a set of slots all at once (convenience for pass
    /// constructors declaring their sampled inputs).
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::SlotCollision`] on the first duplicate.
    pub fn claim_all(
        &mut self,
        slots: &[TextureSlot],
    ) -> Result<(), GlintError> {
        for &slot in slots {
            self.claim(slot)?;
        }
        Ok(())
    }

    /// Release every claim (end of pass).
    pub fn clear(&mut self) {
        self.claimed.clear();
    }

    /// Number of currently claimed slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Returns `true` if no slots are claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_slots_claim() {
        let mut reg = SlotRegistry::new();
        reg.claim(TextureSlot::SCENE).unwrap();
        reg.claim(TextureSlot::BLOOM).unwrap();
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn duplicate_slot_collides() {
        let mut reg = SlotRegistry::new();
        reg.claim(TextureSlot::SCENE).unwrap();
        let err = reg.claim(TextureSlot::SCENE).unwrap_err();
        assert!(matches!(
            err,
            GlintError::SlotCollision(s) if s == TextureSlot::SCENE
        ));
    }

    #[test]
    fn claim_all_rejects_duplicates_in_batch() {
        let mut reg = SlotRegistry::new();
        let slots = [TextureSlot::new(4), TextureSlot::new(5), TextureSlot::new(4)];
        assert!(reg.claim_all(&slots).is_err());
    }

    #[test]
    fn clear_releases_claims() {
        let mut reg = SlotRegistry::new();
        reg.claim(TextureSlot::HISTORY).unwrap();
        reg.clear();
        assert!(reg.is_empty());
        reg.claim(TextureSlot::HISTORY).unwrap();
    }
}
