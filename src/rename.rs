use anyhow::Context;
use async_trait::async_trait;
use similar::TextDiff;

// A hashed rename (`app-aaa123.js` -> `app-bbb124.js`) scores ~0.75 on the
// character diff ratio; unrelated chunk paths land well under 0.5.
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

/// Strategy pairing an artifact that disappeared from the build with one
/// that newly appeared, treating them as the same logical artifact.
///
/// Return one of `candidates` to pair `removed_path` with, or `None` to keep
/// it classified as a plain removal. Returning a path outside `candidates`
/// makes the diff engine fail the whole report.
#[async_trait]
pub trait RenameResolver: Send + Sync {
    async fn resolve(&self, removed_path: &str, candidates: &[String]) -> Option<String>;
}

/// Builtin resolver: picks the candidate whose path is most similar to the
/// removed one, as long as the character diff ratio clears the threshold.
/// Hashed filenames (`app-aaa.js` -> `app-bbb.js`) score high; unrelated
/// chunks don't.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityResolver {
    threshold: f32,
}

impl SimilarityResolver {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Default for SimilarityResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

#[async_trait]
impl RenameResolver for SimilarityResolver {
    async fn resolve(&self, removed_path: &str, candidates: &[String]) -> Option<String> {
        let mut best: Option<(&String, f32)> = None;
        for candidate in candidates {
            let ratio = TextDiff::from_chars(removed_path, candidate.as_str()).ratio();
            if ratio < self.threshold {
                continue;
            }
            // Strict comparison keeps the earliest candidate on ties.
            if best.map_or(true, |(_, r)| ratio > r) {
                best = Some((candidate, ratio));
            }
        }
        best.map(|(candidate, _)| candidate.clone())
    }
}

/// Build a resolver from its CLI identifier: `similarity` or
/// `similarity:<threshold>` with a threshold in 0..=1.
pub fn from_strategy(strategy: &str) -> anyhow::Result<Box<dyn RenameResolver>> {
    let (kind, arg) = match strategy.split_once(':') {
        Some((kind, arg)) => (kind, Some(arg)),
        None => (strategy, None),
    };

    match kind {
        "similarity" => {
            let threshold = match arg {
                Some(raw) => raw
                    .parse::<f32>()
                    .with_context(|| format!("invalid similarity threshold: {raw}"))?,
                None => DEFAULT_SIMILARITY_THRESHOLD,
            };
            anyhow::ensure!(
                (0.0..=1.0).contains(&threshold),
                "similarity threshold must be within 0..=1, got {threshold}"
            );
            Ok(Box::new(SimilarityResolver::new(threshold)))
        }
        other => anyhow::bail!("unknown rename strategy: {other}"),
    }
}
