use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{MovieId, UserId, UserPredictions};

/// Substituted when a caller submits an empty favorites list
pub const DEFAULT_FAVORITES: [MovieId; 2] = [64, 463];

/// How many of the closest candidate users contribute recommendations
const TOP_USERS: usize = 2;

/// A candidate user scored against the caller's favorites
///
/// Derived and ephemeral: recomputed on every recommendation request,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarUser {
    pub user_id: UserId,
    pub predictions: Vec<MovieId>,
    /// |favorites ∩ predictions|
    pub common_movies: usize,
    /// common_movies ÷ |favorites|
    pub similarity_score: f64,
}

/// Scores every candidate user by overlap with the favorites set and sorts
/// them best-first.
///
/// Ordering is descending by `(common_movies, similarity_score)`; the sort is
/// stable, so ties keep the prediction-table row order. `favorites` must be
/// non-empty — with an empty list every score degenerates to NaN and the
/// ordering is meaningless, so callers substitute [`DEFAULT_FAVORITES`] first.
pub fn rank_similar_users(
    favorites: &[MovieId],
    table: &[UserPredictions],
) -> Vec<SimilarUser> {
    let wanted: HashSet<MovieId> = favorites.iter().copied().collect();

    let mut ranked: Vec<SimilarUser> = table
        .iter()
        .map(|row| {
            let predicted: HashSet<MovieId> = row.predictions.iter().copied().collect();
            let common_movies = wanted.intersection(&predicted).count();

            SimilarUser {
                user_id: row.user_id,
                predictions: row.predictions.clone(),
                common_movies,
                similarity_score: common_movies as f64 / favorites.len() as f64,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.common_movies.cmp(&a.common_movies).then_with(|| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(Ordering::Equal)
        })
    });

    ranked
}

/// Unions the top candidates' predictions and strips everything the caller
/// already has.
///
/// The result is deduplicated and carries no ranking; order follows the union
/// walk and is not part of the contract. With fewer than two candidates, only
/// the available ones contribute.
pub fn pick_recommendations(ranked: &[SimilarUser], favorites: &[MovieId]) -> Vec<MovieId> {
    let owned: HashSet<MovieId> = favorites.iter().copied().collect();
    let mut seen: HashSet<MovieId> = HashSet::new();
    let mut picks = Vec::new();

    for candidate in ranked.iter().take(TOP_USERS) {
        for &movie_id in &candidate.predictions {
            if !owned.contains(&movie_id) && seen.insert(movie_id) {
                picks.push(movie_id);
            }
        }
    }

    picks
}

/// Full re-ranking pass: score, sort, pick.
pub fn recommend(favorites: &[MovieId], table: &[UserPredictions]) -> Vec<MovieId> {
    let ranked = rank_similar_users(favorites, table);
    pick_recommendations(&ranked, favorites)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_id: UserId, predictions: Vec<MovieId>) -> UserPredictions {
        UserPredictions {
            user_id,
            predictions,
        }
    }

    #[test]
    fn test_rank_scores_overlap_and_ratio() {
        let favorites = vec![1, 2, 3, 4];
        let table = vec![row(10, vec![1, 2, 3, 99]), row(20, vec![4, 98, 97])];

        let ranked = rank_similar_users(&favorites, &table);

        assert_eq!(ranked[0].user_id, 10);
        assert_eq!(ranked[0].common_movies, 3);
        assert_eq!(ranked[0].similarity_score, 0.75);
        assert_eq!(ranked[1].common_movies, 1);
        assert_eq!(ranked[1].similarity_score, 0.25);
    }

    #[test]
    fn test_rank_counts_distinct_overlap() {
        // Duplicate predictions must not inflate the overlap count
        let favorites = vec![5];
        let table = vec![row(10, vec![5, 5, 5])];

        let ranked = rank_similar_users(&favorites, &table);
        assert_eq!(ranked[0].common_movies, 1);
    }

    #[test]
    fn test_rank_ties_keep_row_order() {
        let favorites = vec![1, 2];
        let table = vec![
            row(30, vec![1, 50]),
            row(10, vec![1, 60]),
            row(20, vec![1, 70]),
        ];

        let ranked = rank_similar_users(&favorites, &table);
        let order: Vec<UserId> = ranked.iter().map(|u| u.user_id).collect();
        assert_eq!(order, vec![30, 10, 20]);
    }

    #[test]
    fn test_recommendations_never_include_favorites() {
        let favorites = vec![1, 2, 3];
        let table = vec![
            row(10, vec![1, 2, 40, 41]),
            row(20, vec![3, 42]),
            row(30, vec![1, 2, 3]),
        ];

        let picks = recommend(&favorites, &table);

        assert!(!picks.is_empty());
        for movie_id in &picks {
            assert!(!favorites.contains(movie_id));
        }
    }

    #[test]
    fn test_two_candidates_exhaust_the_table() {
        // Overlaps {3, 1}: the result is the union of both prediction lists
        // minus the favorites, since "top two" covers the whole table
        let favorites = vec![1, 2, 3];
        let table = vec![row(10, vec![1, 2, 3, 40]), row(20, vec![1, 41, 42])];

        let mut picks = recommend(&favorites, &table);
        picks.sort_unstable();

        assert_eq!(picks, vec![40, 41, 42]);
    }

    #[test]
    fn test_only_top_two_candidates_contribute() {
        let favorites = vec![1, 2, 3];
        let table = vec![
            row(10, vec![1, 2, 3, 40]),
            row(20, vec![1, 2, 41]),
            row(30, vec![1, 99]),
        ];

        let picks = recommend(&favorites, &table);

        assert!(picks.contains(&40));
        assert!(picks.contains(&41));
        assert!(!picks.contains(&99));
    }

    #[test]
    fn test_single_candidate_table() {
        let favorites = vec![1];
        let table = vec![row(10, vec![1, 50, 51])];

        let picks = recommend(&favorites, &table);
        assert_eq!(picks, vec![50, 51]);
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let picks = recommend(&[1, 2], &[]);
        assert!(picks.is_empty());
    }

    #[test]
    fn test_duplicate_picks_are_deduplicated() {
        let favorites = vec![1];
        let table = vec![row(10, vec![1, 50, 51]), row(20, vec![1, 50, 52])];

        let picks = recommend(&favorites, &table);

        assert_eq!(picks.iter().filter(|&&m| m == 50).count(), 1);
        assert!(picks.contains(&51));
        assert!(picks.contains(&52));
    }

    #[test]
    fn test_default_favorites_pair() {
        assert_eq!(DEFAULT_FAVORITES, [64, 463]);
    }
}
