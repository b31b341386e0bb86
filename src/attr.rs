//! Construction attributes.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Layout and policy of a ring buffer, fixed for its lifetime.
///
/// Caller-provided storage is not part of the attributes; pass it to
/// [`RingBuffer::with_storage`](crate::RingBuffer::with_storage) instead.
///
/// ```
/// use fixring::RingBufferAttr;
///
/// let attr = RingBufferAttr::from_toml_str(
///     r#"
///     name = "adc samples"
///     item_size = 4
///     override_on_full = true
///     "#,
/// )
/// .unwrap();
/// assert_eq!(attr.item_size, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingBufferAttr {
    /// Diagnostic label
    pub name: Option<String>,
    /// Size of every item in bytes
    pub item_size: usize,
    /// Evict the oldest item instead of failing when full
    pub override_on_full: bool,
}

impl Default for RingBufferAttr {
    fn default() -> Self {
        RingBufferAttr {
            name: None,
            item_size: 1,
            override_on_full: false,
        }
    }
}

impl RingBufferAttr {
    /// Parse attributes from a TOML table; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the diagnostic label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the item size in bytes
    pub fn with_item_size(mut self, item_size: usize) -> Self {
        self.item_size = item_size;
        self
    }

    /// Enable or disable override on full
    pub fn with_override(mut self, override_on_full: bool) -> Self {
        self.override_on_full = override_on_full;
        self
    }
}
