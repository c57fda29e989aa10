//! AtomicFloat

use crate::color::Rgb;
use crate::common::Float;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Implement atomic floating point value using `AtomicU32`.
pub struct AtomicFloat {
    /// Bit representation of floating point value.
    bits: AtomicU32,
}

impl AtomicFloat {
    /// Create a new `AtomicFloat`.
    ///
    /// * `v` - The value.
    pub fn new(v: Float) -> Self {
        Self {
            bits: AtomicU32::new(v.to_bits()),
        }
    }

    /// Add a floating point value.
    ///
    /// * `v` - The value to add.
    pub fn add(&self, v: Float) {
        let mut old_bits = self.bits.load(Ordering::Relaxed);
        loop {
            let new_bits = (Float::from_bits(old_bits) + v).to_bits();
            match self
                .bits
                .compare_exchange_weak(old_bits, new_bits, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(x) => old_bits = x,
            }
        }
    }

    /// Loads the floating point value.
    pub fn load(&self) -> Float {
        Float::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Stores the floating point value.
    ///
    /// * `v` - The value.
    pub fn store(&self, v: Float) {
        self.bits.store(v.to_bits(), Ordering::Release);
    }
}

impl Default for AtomicFloat {
    /// Returns the "default value" for `AtomicFloat`.
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

impl fmt::Debug for AtomicFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.load())
    }
}

/// An `Rgb` whose channels can be accumulated from several threads.
#[derive(Clone, Debug, Default)]
pub struct AtomicRgb {
    channels: [AtomicFloat; 3],
}

impl AtomicRgb {
    /// Loads the color.
    pub fn load(&self) -> Rgb {
        Rgb::new(self.channels[0].load(), self.channels[1].load(), self.channels[2].load())
    }

    /// Stores the color.
    ///
    /// * `c` - The color.
    pub fn store(&self, c: Rgb) {
        for (i, ch) in self.channels.iter().enumerate() {
            ch.store(c[i]);
        }
    }

    /// Adds a color channel-wise.
    ///
    /// * `c` - The color to add.
    pub fn add(&self, c: Rgb) {
        for (i, ch) in self.channels.iter().enumerate() {
            ch.add(c[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_adds_are_not_lost() {
        let f = Arc::new(AtomicFloat::new(0.0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let f = Arc::clone(&f);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        f.add(1.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(f.load(), 4000.0);
    }

    #[test]
    fn rgb_store_and_add() {
        let c = AtomicRgb::default();
        c.store(Rgb::new(1.0, 2.0, 3.0));
        c.add(Rgb::new(0.5, 0.5, 0.5));
        assert_eq!(c.load(), Rgb::new(1.5, 2.5, 3.5));
    }
}
