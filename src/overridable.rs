//! A value that follows a default until it is explicitly overridden.

/// A value that tracks an original default unless overridden.
///
/// Used wherever an object inherits a global default (a font size, a theme
/// color) but may set its own.
///
/// # Example
/// ```
/// use glyphstage::OverridableDefault;
///
/// let mut size = OverridableDefault::new(16);
/// size.set(24);
/// assert!(size.is_overridden());
/// size.reset();
/// assert_eq!(*size.value(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverridableDefault<T> {
    original: T,
    value: T,
    overridden: bool,
}

impl<T: Clone> OverridableDefault<T> {
    /// Start out equal to `original`, not overridden.
    pub fn new(original: T) -> Self {
        Self {
            value: original.clone(),
            original,
            overridden: false,
        }
    }

    /// The effective value.
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// The original default.
    pub const fn original(&self) -> &T {
        &self.original
    }

    /// Whether an explicit value is in effect.
    pub const fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Override the effective value.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.overridden = true;
    }

    /// Drop the override and go back to the original.
    pub fn reset(&mut self) {
        self.value = self.original.clone();
        self.overridden = false;
    }

    /// Change the original default.
    ///
    /// The effective value follows unless an override is in place.
    pub fn change_original(&mut self, original: T) {
        if !self.overridden {
            self.value = original.clone();
        }
        self.original = original;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_and_reset() {
        let mut value = OverridableDefault::new(10);
        assert_eq!(*value.value(), 10);
        assert!(!value.is_overridden());

        value.set(20);
        assert!(value.is_overridden());
        assert_eq!(*value.value(), 20);

        value.reset();
        assert!(!value.is_overridden());
        assert_eq!(*value.value(), 10);
    }

    #[test]
    fn test_change_original_pushes_through() {
        let mut value = OverridableDefault::new(10);
        value.change_original(30);
        assert_eq!(*value.value(), 30);
        assert_eq!(*value.original(), 30);
    }

    #[test]
    fn test_change_original_keeps_override() {
        let mut value = OverridableDefault::new(10);
        value.set(20);
        value.change_original(30);
        assert_eq!(*value.value(), 20);

        value.reset();
        assert_eq!(*value.value(), 30);
    }
}
