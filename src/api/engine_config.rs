use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};
use crate::interaction::FilterScheduler;

/// Public engine bootstrap configuration.
///
/// Serializable so dashboard pages can embed it next to their data tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterEngineConfig {
    #[serde(default = "default_text_debounce_ms")]
    pub text_debounce_ms: u64,
    #[serde(default = "default_tab_switch_delay_ms")]
    pub tab_switch_delay_ms: u64,
    #[serde(default = "default_ready_poll_interval_ms")]
    pub ready_poll_interval_ms: u64,
    #[serde(default = "default_ready_max_attempts")]
    pub ready_max_attempts: u32,
    /// Reserved filter variable carrying period presets.
    #[serde(default = "default_period_variable")]
    pub period_variable: String,
    /// Reserved filter variable selecting the displayed metric.
    #[serde(default = "default_metric_variable")]
    pub metric_variable: String,
}

impl Default for FilterEngineConfig {
    fn default() -> Self {
        Self {
            text_debounce_ms: default_text_debounce_ms(),
            tab_switch_delay_ms: default_tab_switch_delay_ms(),
            ready_poll_interval_ms: default_ready_poll_interval_ms(),
            ready_max_attempts: default_ready_max_attempts(),
            period_variable: default_period_variable(),
            metric_variable: default_metric_variable(),
        }
    }
}

impl FilterEngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text_debounce_ms(mut self, millis: u64) -> Self {
        self.text_debounce_ms = millis;
        self
    }

    #[must_use]
    pub fn with_tab_switch_delay_ms(mut self, millis: u64) -> Self {
        self.tab_switch_delay_ms = millis;
        self
    }

    /// Sets the readiness polling cadence and attempt bound.
    #[must_use]
    pub fn with_ready_polling(mut self, interval_ms: u64, max_attempts: u32) -> Self {
        self.ready_poll_interval_ms = interval_ms;
        self.ready_max_attempts = max_attempts;
        self
    }

    #[must_use]
    pub fn with_reserved_variables(
        mut self,
        period_variable: impl Into<String>,
        metric_variable: impl Into<String>,
    ) -> Self {
        self.period_variable = period_variable.into();
        self.metric_variable = metric_variable.into();
        self
    }

    pub fn validate(&self) -> FilterResult<()> {
        if self.text_debounce_ms == 0 {
            return Err(FilterError::InvalidConfig(
                "text debounce must be greater than zero".to_owned(),
            ));
        }
        if self.ready_poll_interval_ms == 0 || self.ready_max_attempts == 0 {
            return Err(FilterError::InvalidConfig(
                "readiness polling needs a positive interval and at least one attempt".to_owned(),
            ));
        }
        if self.period_variable.trim().is_empty() || self.metric_variable.trim().is_empty() {
            return Err(FilterError::InvalidConfig(
                "reserved filter variables must not be empty".to_owned(),
            ));
        }
        if self.period_variable == self.metric_variable {
            return Err(FilterError::InvalidConfig(format!(
                "period and metric variables must differ (both `{}`)",
                self.period_variable
            )));
        }
        Ok(())
    }

    #[must_use]
    pub(crate) fn scheduler(&self) -> FilterScheduler {
        FilterScheduler::new(
            Duration::from_millis(self.text_debounce_ms),
            Duration::from_millis(self.tab_switch_delay_ms),
            Duration::from_millis(self.ready_poll_interval_ms),
            self.ready_max_attempts,
        )
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> FilterResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| FilterError::InvalidConfig(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> FilterResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| FilterError::InvalidConfig(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_text_debounce_ms() -> u64 {
    300
}

fn default_tab_switch_delay_ms() -> u64 {
    100
}

fn default_ready_poll_interval_ms() -> u64 {
    100
}

fn default_ready_max_attempts() -> u32 {
    50
}

fn default_period_variable() -> String {
    "period".to_owned()
}

fn default_metric_variable() -> String {
    "metric".to_owned()
}
