use serde::{Deserialize, Serialize};

/// MACD periods the chart screenshots are expected to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdSettings {
    pub fast: u32,
    pub slow: u32,
    pub signal: u32,
}

impl Default for MacdSettings {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

impl MacdSettings {
    /// Rendered the way chart platforms label the indicator, e.g. `(12, 26, 9)`
    pub fn label(&self) -> String {
        format!("({}, {}, {})", self.fast, self.slow, self.signal)
    }
}
