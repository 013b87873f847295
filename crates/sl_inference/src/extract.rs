use regex::Regex;
use sl_core::Projection;

/// Pulls a named projection out of free-form analysis text.
pub trait ProjectionExtractor: Send + Sync {
    fn extract(&self, analysis: &str, horizon: &str) -> Projection;
}

/// Matches the literal `Estimated Returns (<horizon>):` label and takes the
/// rest of that line verbatim, or the next non-blank line when the label ends
/// its line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelExtractor;

impl ProjectionExtractor for LabelExtractor {
    fn extract(&self, analysis: &str, horizon: &str) -> Projection {
        let pattern = format!(r"Estimated Returns \({}\):\s*([^\r\n]+)", regex::escape(horizon));
        let Ok(re) = Regex::new(&pattern) else {
            return Projection::Unavailable;
        };

        re.captures(analysis)
            .and_then(|caps| caps.get(1))
            .map(|m| Projection::from(m.as_str().trim()))
            .unwrap_or(Projection::Unavailable)
    }
}

pub fn extract_projection(analysis: &str, horizon: &str) -> Projection {
    LabelExtractor.extract(analysis, horizon)
}
