use termcolor::ColorChoice;

use crate::harness::ReportStyle;
use crate::runtime::EvalOptions;

/// Configuration a runner hands to every suite and case it creates.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub eval: EvalOptions,
    pub style: ReportStyle,
    /// `Auto` only colors when stdout is a terminal.
    pub color: ColorChoice,
}

impl HarnessConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.eval.max_depth = max_depth;
        self
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            eval: EvalOptions::default(),
            style: ReportStyle::default(),
            color: ColorChoice::Auto,
        }
    }
}
