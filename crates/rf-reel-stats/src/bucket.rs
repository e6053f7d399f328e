//! Win buckets — bet-unit-relative partition of the win space

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Ordered partition of non-negative win multiples.
///
/// With edges `e0 < e1 < … < en` the buckets are
/// `0x`, `(0, e0)x`, `[e0, e1)x`, …, `[en-1, en)x`, `en x+`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinBucket {
    edges: Vec<f64>,
}

impl WinBucket {
    /// 0x, <1x, 1–2x, 2–5x, 5–10x, 10–20x, 20–50x, 50–100x, 100x+
    pub fn standard() -> Self {
        Self {
            edges: vec![1.0, 2.0, 5.0, 10.0, 20.0, 50.0, 100.0],
        }
    }

    /// Custom edges; must be positive, finite and strictly increasing
    pub fn with_edges(edges: Vec<f64>) -> Result<Self, StatsError> {
        if let Some(bad) = edges.iter().find(|e| !(**e > 0.0) || !e.is_finite()) {
            return Err(StatsError::InvalidBuckets(format!("edge {bad} is not positive")));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(StatsError::InvalidBuckets(
                "edges are not strictly increasing".into(),
            ));
        }
        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.edges.len() + 2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bucket of a win multiple. Total and monotonic; anything not above
    /// zero (NaN included) lands in the `0x` bucket.
    #[inline]
    pub fn index(&self, multiple: f64) -> usize {
        if !(multiple > 0.0) {
            return 0;
        }
        1 + self.edges.partition_point(|&e| e <= multiple)
    }

    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.len());
        labels.push("0x".to_string());
        let mut lower: Option<f64> = None;
        for &edge in &self.edges {
            labels.push(match lower {
                None => format!("(0,{edge})x"),
                Some(lo) => format!("[{lo},{edge})x"),
            });
            lower = Some(edge);
        }
        labels.push(match lower {
            None => "(0,inf)x".to_string(),
            Some(lo) => format!("{lo}x+"),
        });
        labels
    }
}

impl Default for WinBucket {
    fn default() -> Self {
        Self::standard()
    }
}
