use std::collections::HashMap;

/// Reciprocal-rank-fusion constant (`k` in `1 / (k + rank)`); 60 is the
/// conventional value from the original RRF paper.
pub const RRF_K: f64 = 60.0;

/// Minimum fused score a candidate must clear to survive truncation.
pub const FUSED_SCORE_FLOOR: f64 = 1.0 / 120.0;

/// A candidate's fused rank-based score plus the best individual score any
/// single provider assigned it, kept for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Fused {
    pub id: String,
    pub fused_score: f64,
    pub best_score: f32,
}

/// Reciprocal-rank fusion across up to three independently-ranked lists:
/// `fused_score = Σ 1 / (60 + rank_i)`, summed over every list a candidate
/// appears in (`rank_i` is 1-indexed position).
#[must_use]
pub fn fuse(lists: &[Vec<(String, f32)>]) -> Vec<Fused> {
    let mut fused: HashMap<String, Fused> = HashMap::new();
    for list in lists {
        for (rank, (id, score)) in list.iter().enumerate() {
            let rank = (rank + 1) as f64;
            let contribution = 1.0 / (RRF_K + rank);
            let entry = fused.entry(id.clone()).or_insert_with(|| Fused {
                id: id.clone(),
                fused_score: 0.0,
                best_score: *score,
            });
            entry.fused_score += contribution;
            entry.best_score = entry.best_score.max(*score);
        }
    }
    fused.into_values().collect()
}
