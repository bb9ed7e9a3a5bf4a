//! Photo Matcher — scores unused catalog photos against one chapter and claims the best.
//!
//! Scoring is additive over three signals: year proximity, family-name co-occurrence,
//! and keyword overlap. Photos that score zero never win a slot.
//! Every photo returned is recorded in the run's `UsedImageSet` before returning.

use std::collections::HashSet;

use crate::magazine::text_analysis::{extract_keywords, extract_year, KEYWORD_WINDOW};
use crate::models::photo::PhotoMetadata;

// ────────────────────────────────────────────────────────────────────────────
// Used-image registry
// ────────────────────────────────────────────────────────────────────────────

/// Filenames already placed on the cover, in the TOC, or in a chapter during one run.
///
/// Grows monotonically; a filename is inserted at most once and never leaves.
/// One instance per generation run, never shared between runs.
#[derive(Debug, Default, Clone)]
pub struct UsedImageSet {
    filenames: HashSet<String>,
}

impl UsedImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    /// Records a filename. Returns false if it was already claimed.
    pub fn mark_used(&mut self, filename: &str) -> bool {
        if self.filenames.contains(filename) {
            return false;
        }
        self.filenames.insert(filename.to_string())
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

const EXACT_YEAR_POINTS: u32 = 100;
const NEAR_YEAR_POINTS: u32 = 50;
const SAME_ERA_POINTS: u32 = 20;
const NEAR_YEAR_SPAN: u32 = 2;
const SAME_ERA_SPAN: u32 = 5;
const NAME_POINTS: u32 = 30;
const KEYWORD_POINTS: u32 = 5;

/// A photo paired with its score for one chapter. Lives only inside a matching call.
#[derive(Debug, Clone)]
pub struct ScoredCandidate<'a> {
    pub photo: &'a PhotoMetadata,
    pub score: u32,
}

/// Chapter-side inputs, computed once per matching call.
struct ChapterSignals {
    year: Option<i32>,
    combined_lower: String,
    keywords: HashSet<String>,
}

impl ChapterSignals {
    fn new(chapter_title: &str, chapter_text: &str) -> Self {
        let combined = format!("{chapter_title} {chapter_text}");
        Self {
            year: extract_year(chapter_title),
            keywords: extract_keywords(&combined, KEYWORD_WINDOW),
            combined_lower: combined.to_lowercase(),
        }
    }
}

/// Greedy per-chapter photo matcher. Holds only configuration; all run state
/// lives in the `UsedImageSet` passed to each call.
pub struct PhotoMatcher<'a> {
    family_names: &'a [String],
}

impl<'a> PhotoMatcher<'a> {
    pub fn new(family_names: &'a [String]) -> Self {
        Self { family_names }
    }

    /// Scores every unused candidate and returns those with a positive score,
    /// best first. Equal scores keep catalog order.
    pub fn score_candidates<'c>(
        &self,
        chapter_title: &str,
        chapter_text: &str,
        candidates: &'c [PhotoMetadata],
        used: &UsedImageSet,
    ) -> Vec<ScoredCandidate<'c>> {
        let signals = ChapterSignals::new(chapter_title, chapter_text);

        let mut scored: Vec<ScoredCandidate<'c>> = candidates
            .iter()
            .filter(|photo| !used.contains(&photo.filename))
            .map(|photo| ScoredCandidate {
                photo,
                score: self.score_photo(&signals, photo),
            })
            .filter(|c| c.score > 0)
            .collect();

        // Vec::sort_by is stable: ties stay in catalog order.
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Returns up to `max_photos` best-matching unused photos and marks each one used.
    pub fn match_photos(
        &self,
        chapter_title: &str,
        chapter_text: &str,
        candidates: &[PhotoMetadata],
        used: &mut UsedImageSet,
        max_photos: usize,
    ) -> Vec<PhotoMetadata> {
        if max_photos == 0 || candidates.is_empty() {
            return Vec::new();
        }

        let ranked = self.score_candidates(chapter_title, chapter_text, candidates, used);

        let mut selected = Vec::with_capacity(max_photos.min(ranked.len()));
        for candidate in ranked {
            if selected.len() == max_photos {
                break;
            }
            // A catalog listing the same filename twice still yields one claim.
            if used.mark_used(&candidate.photo.filename) {
                selected.push(candidate.photo.clone());
            }
        }
        selected
    }

    fn score_photo(&self, signals: &ChapterSignals, photo: &PhotoMetadata) -> u32 {
        let photo_text = photo.searchable_text();
        year_points(signals.year, photo.year)
            + self.name_points(&signals.combined_lower, &photo_text)
            + keyword_points(&signals.keywords, &photo_text)
    }

    fn name_points(&self, chapter_lower: &str, photo_text: &str) -> u32 {
        self.family_names
            .iter()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| !name.is_empty())
            .filter(|name| photo_text.contains(name.as_str()) && chapter_lower.contains(name.as_str()))
            .count() as u32
            * NAME_POINTS
    }
}

fn year_points(chapter_year: Option<i32>, photo_year: Option<i32>) -> u32 {
    match (chapter_year, photo_year) {
        (Some(c), Some(p)) => match p.abs_diff(c) {
            0 => EXACT_YEAR_POINTS,
            d if d <= NEAR_YEAR_SPAN => NEAR_YEAR_POINTS,
            d if d <= SAME_ERA_SPAN => SAME_ERA_POINTS,
            _ => 0,
        },
        _ => 0,
    }
}

fn keyword_points(keywords: &HashSet<String>, photo_text: &str) -> u32 {
    keywords
        .iter()
        .filter(|kw| photo_text.contains(kw.as_str()))
        .count() as u32
        * KEYWORD_POINTS
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_photo(filename: &str, title: &str, year: Option<i32>, people: &str) -> PhotoMetadata {
        PhotoMetadata {
            id: 0,
            filename: filename.to_string(),
            title: title.to_string(),
            description: String::new(),
            year,
            people: people.to_string(),
            created_at: None,
        }
    }

    // ── year_points ──────────────────────────────────────────────────────────

    #[test]
    fn test_year_points_bands() {
        assert_eq!(year_points(Some(1990), Some(1990)), 100);
        assert_eq!(year_points(Some(1990), Some(1992)), 50);
        assert_eq!(year_points(Some(1990), Some(1988)), 50);
        assert_eq!(year_points(Some(1990), Some(1995)), 20);
        assert_eq!(year_points(Some(1990), Some(1996)), 0);
        assert_eq!(year_points(None, Some(1990)), 0);
        assert_eq!(year_points(Some(1990), None), 0);
    }

    #[test]
    fn test_exact_year_beats_distant_year_by_at_least_80() {
        let photos = vec![
            make_photo("late.jpg", "", Some(1998), ""),
            make_photo("exact.jpg", "", Some(1990), ""),
        ];
        let matcher = PhotoMatcher::new(&[]);
        let used = UsedImageSet::new();
        let ranked = matcher.score_candidates("Chapter (1990s)", "", &photos, &used);

        let exact = ranked.iter().find(|c| c.photo.filename == "exact.jpg").map(|c| c.score);
        let late = ranked
            .iter()
            .find(|c| c.photo.filename == "late.jpg")
            .map(|c| c.score)
            .unwrap_or(0);
        assert!(exact.unwrap() >= late + 80);
        assert_eq!(ranked[0].photo.filename, "exact.jpg");
    }

    // ── name and keyword terms ───────────────────────────────────────────────

    #[test]
    fn test_name_must_appear_on_both_sides() {
        let names = vec!["Mary".to_string()];
        let matcher = PhotoMatcher::new(&names);
        let photos = vec![
            make_photo("tagged.jpg", "", None, "Mary"),
            make_photo("untagged.jpg", "", None, "Bob"),
        ];
        let used = UsedImageSet::new();

        let ranked = matcher.score_candidates("Growing up", "Mary rode a bike", &photos, &used);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].photo.filename, "tagged.jpg");
        // 30 for the shared name plus 5 for "mary" as a keyword
        assert_eq!(ranked[0].score, 35);

        let ranked = matcher.score_candidates("Growing up", "Bob rode a bike", &photos, &used);
        assert!(ranked.is_empty(), "name absent from chapter scores nothing");
    }

    #[test]
    fn test_keyword_overlap_scores_five_each() {
        let matcher = PhotoMatcher::new(&[]);
        let photos = vec![make_photo("lake.jpg", "Lake house dock", None, "")];
        let used = UsedImageSet::new();
        let ranked =
            matcher.score_candidates("Summers", "We swam off the dock at the lake house", &photos, &used);
        // lake, house and dock overlap; "swam" and "summers" do not
        assert_eq!(ranked[0].score, 15);
    }

    #[test]
    fn test_zero_score_photo_is_excluded() {
        let matcher = PhotoMatcher::new(&[]);
        let photos = vec![make_photo("random.jpg", "xyz", None, "")];
        let mut used = UsedImageSet::new();
        let selected = matcher.match_photos("Chapter", "Nothing related", &photos, &mut used, 3);
        assert!(selected.is_empty());
        assert!(used.is_empty());
    }

    // ── ordering and tie-break ───────────────────────────────────────────────

    #[test]
    fn test_equal_scores_keep_catalog_order() {
        let matcher = PhotoMatcher::new(&[]);
        let photos = vec![
            make_photo("first.jpg", "", Some(1970), ""),
            make_photo("second.jpg", "", Some(1970), ""),
            make_photo("third.jpg", "", Some(1970), ""),
        ];
        let mut used = UsedImageSet::new();
        let selected = matcher.match_photos("Years (1970)", "", &photos, &mut used, 2);
        let names: Vec<&str> = selected.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["first.jpg", "second.jpg"]);
    }

    #[test]
    fn test_results_sorted_best_first() {
        let matcher = PhotoMatcher::new(&[]);
        let photos = vec![
            make_photo("era.jpg", "", Some(1974), ""),
            make_photo("exact.jpg", "", Some(1970), ""),
            make_photo("near.jpg", "", Some(1971), ""),
        ];
        let mut used = UsedImageSet::new();
        let selected = matcher.match_photos("Years (1970)", "", &photos, &mut used, 3);
        let names: Vec<&str> = selected.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["exact.jpg", "near.jpg", "era.jpg"]);
    }

    // ── used-set interaction ─────────────────────────────────────────────────

    #[test]
    fn test_match_marks_exactly_returned_photos() {
        let matcher = PhotoMatcher::new(&[]);
        let photos: Vec<PhotoMetadata> = (0..5)
            .map(|i| make_photo(&format!("p{i}.jpg"), "", Some(1980), ""))
            .collect();
        let mut used = UsedImageSet::new();

        let selected = matcher.match_photos("Decade (1980)", "", &photos, &mut used, 3);
        assert_eq!(selected.len(), 3);
        assert_eq!(used.len(), 3, "only the returned photos are claimed");
        assert!(!used.contains("p3.jpg"));
        assert!(!used.contains("p4.jpg"));
    }

    #[test]
    fn test_used_photos_never_returned_again() {
        let matcher = PhotoMatcher::new(&[]);
        let photos: Vec<PhotoMetadata> = (0..4)
            .map(|i| make_photo(&format!("p{i}.jpg"), "", Some(1980), ""))
            .collect();
        let mut used = UsedImageSet::new();

        let first = matcher.match_photos("A (1980)", "", &photos, &mut used, 1);
        let before = used.len();
        let second = matcher.match_photos("B (1980)", "", &photos, &mut used, 2);

        assert_eq!(used.len(), before + second.len());
        assert!(second.iter().all(|p| p.filename != first[0].filename));

        let rest = matcher.match_photos("C (1980)", "", &photos, &mut used, 5);
        assert_eq!(rest.len(), 1);
        let exhausted = matcher.match_photos("D (1980)", "", &photos, &mut used, 5);
        assert!(exhausted.is_empty());
        assert_eq!(used.len(), 4);
    }

    #[test]
    fn test_duplicate_filename_in_catalog_claimed_once() {
        let matcher = PhotoMatcher::new(&[]);
        let photos = vec![
            make_photo("dup.jpg", "", Some(1960), ""),
            make_photo("dup.jpg", "", Some(1960), ""),
        ];
        let mut used = UsedImageSet::new();
        let selected = matcher.match_photos("Era (1960)", "", &photos, &mut used, 3);
        assert_eq!(selected.len(), 1);
        assert_eq!(used.len(), 1);
    }

    #[test]
    fn test_max_zero_claims_nothing() {
        let matcher = PhotoMatcher::new(&[]);
        let photos = vec![make_photo("a.jpg", "", Some(1960), "")];
        let mut used = UsedImageSet::new();
        assert!(matcher
            .match_photos("Era (1960)", "", &photos, &mut used, 0)
            .is_empty());
        assert!(used.is_empty());
    }

    #[test]
    fn test_mark_used_rejects_second_insert() {
        let mut used = UsedImageSet::new();
        assert!(used.mark_used("a.jpg"));
        assert!(!used.mark_used("a.jpg"));
        assert_eq!(used.len(), 1);
    }
}
