//! Capacity-bounded write path shared by every buffer kind.
//!
//! A write either replaces the stored content with the whole payload or fails
//! with [`EchoError::Overflow`] before anything is touched. Bytes between the
//! payload end and the buffer capacity are always zero after a commit.

use crate::error::EchoError;

/// A buffer whose capacity was fixed when its account was allocated.
pub trait EchoTarget {
    /// Maximum number of payload bytes the buffer can hold.
    fn capacity(&self) -> usize;

    /// Currently stored payload.
    fn contents(&self) -> &[u8];

    /// Replaces the stored payload. Callers go through [`write`], which has
    /// already checked `payload.len() <= self.capacity()`.
    fn commit(&mut self, payload: &[u8]);
}

pub fn ensure_fits(capacity: usize, payload_len: usize) -> Result<(), EchoError> {
    if payload_len > capacity {
        return Err(EchoError::Overflow);
    }
    Ok(())
}

pub fn write<T: EchoTarget + ?Sized>(target: &mut T, payload: &[u8]) -> Result<(), EchoError> {
    ensure_fits(target.capacity(), payload.len())?;
    target.commit(payload);
    Ok(())
}

/// Commits `payload` into a fixed region in place, zero-filling the remainder.
pub(crate) fn commit_in_place(region: &mut [u8], len: &mut u64, payload: &[u8]) {
    let (head, tail) = region.split_at_mut(payload.len());
    head.copy_from_slice(payload);
    tail.fill(0);
    *len = payload.len() as u64;
}
