//! Logger adapter that forwards to `tracing`

use shared::Logger;
use std::collections::HashMap;

/// `Logger` implementation emitting `tracing` events
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

fn render(meta: Option<&HashMap<String, String>>) -> String {
    let Some(meta) = meta else {
        return String::new();
    };
    let mut pairs: Vec<String> = meta.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    pairs.sort();
    pairs.join(" ")
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        tracing::debug!(meta = %render(meta), "{}", message);
    }

    fn info(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        tracing::info!(meta = %render(meta), "{}", message);
    }

    fn warn(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        tracing::warn!(meta = %render(meta), "{}", message);
    }

    fn error(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        tracing::error!(meta = %render(meta), "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_meta_sorted() {
        let mut meta = HashMap::new();
        meta.insert("stage".to_string(), "resolve".to_string());
        meta.insert("records".to_string(), "3".to_string());
        assert_eq!(render(Some(&meta)), "records=3 stage=resolve");
        assert_eq!(render(None), "");
    }
}
