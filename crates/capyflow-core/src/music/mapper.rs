//! Free-text mood query -> music mapping.
//!
//! Scoring per keyword, summed over the mapping:
//! - query contains the keyword: +10
//! - each query word contained in the keyword or vice versa: +5
//! - each query word (3+ chars) whose character-set overlap with a 3+ char
//!   keyword exceeds 0.6: +floor(overlap * 3)
//!
//! The strictly highest total wins, so ties go to the earlier table entry.
//! A best score under 5 falls back to the first mapping.

use std::collections::HashSet;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MusicMapping {
    pub keywords: &'static [&'static str],
    pub mood: &'static str,
    pub video_id: &'static str,
    pub description: &'static str,
}

pub const MIN_MATCH_SCORE: u32 = 5;

pub static MUSIC_MAPPINGS: [MusicMapping; 12] = [
    MusicMapping {
        keywords: &["coding", "programming", "work", "productive", "focus", "concentrate"],
        mood: "Deep Focus",
        video_id: "jfKfPfyJRdk",
        description: "Lo-fi beats for deep coding sessions",
    },
    MusicMapping {
        keywords: &["deadline", "urgent", "fast", "intense", "high tempo", "energy"],
        mood: "High Energy",
        video_id: "n61ULEU7CO0",
        description: "High-tempo beats for crunch time",
    },
    MusicMapping {
        keywords: &["rain", "rainy", "storm", "thunder", "cozy"],
        mood: "Rainy Vibes",
        video_id: "q76bMs-NwRk",
        description: "Cozy rain ambience for rainy days",
    },
    MusicMapping {
        keywords: &["sad", "melancholy", "emotional", "chill", "slow"],
        mood: "Melancholic",
        video_id: "4xDzrJKXOOY",
        description: "Slow, emotional melodies",
    },
    MusicMapping {
        keywords: &["jazz", "coffee", "cafe", "morning", "smooth"],
        mood: "Jazz Cafe",
        video_id: "Dx5qFachd3A",
        description: "Smooth jazz for morning coffee",
    },
    MusicMapping {
        keywords: &["night", "late", "midnight", "dark", "ambient"],
        mood: "Midnight Session",
        video_id: "rUxyKA_-grg",
        description: "Ambient sounds for late-night sessions",
    },
    MusicMapping {
        keywords: &["happy", "upbeat", "cheerful", "positive", "morning"],
        mood: "Good Vibes",
        video_id: "2ccaHpy5Ewo",
        description: "Cheerful tunes for a good mood",
    },
    MusicMapping {
        keywords: &["study", "reading", "book", "learn", "academic"],
        mood: "Study Session",
        video_id: "5qap5aO4i9A",
        description: "Calm beats for studying and reading",
    },
    MusicMapping {
        keywords: &["nature", "forest", "birds", "peaceful", "zen"],
        mood: "Nature Sounds",
        video_id: "eKFTSSKCzWA",
        description: "Peaceful nature ambience",
    },
    MusicMapping {
        keywords: &["piano", "classical", "elegant", "soft"],
        mood: "Piano Dreams",
        video_id: "4XJNeDj5d1U",
        description: "Soft piano melodies",
    },
    MusicMapping {
        keywords: &["gaming", "game", "mario", "nintendo", "retro"],
        mood: "Gaming Nostalgia",
        video_id: "UKa2A9sNC_Q",
        description: "Retro gaming soundtracks",
    },
    MusicMapping {
        keywords: &["anime", "japanese", "japan", "kawaii"],
        mood: "Anime Vibes",
        video_id: "WDXPJWIgX-o",
        description: "Japanese-inspired lo-fi",
    },
];

/// Share of distinct characters two strings have in common, relative to the
/// larger character set.
pub fn character_overlap(a: &str, b: &str) -> f64 {
    let set_a: HashSet<char> = a.chars().collect();
    let set_b: HashSet<char> = b.chars().collect();
    let larger = set_a.len().max(set_b.len());
    if larger == 0 {
        return 0.0;
    }
    set_a.intersection(&set_b).count() as f64 / larger as f64
}

/// Score of one mapping against an already lower-cased, trimmed query.
pub fn score_mapping(mapping: &MusicMapping, query: &str) -> u32 {
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut score = 0;
    for keyword in mapping.keywords {
        if query.contains(keyword) {
            score += 10;
        }
        for word in &words {
            if keyword.contains(word) || word.contains(keyword) {
                score += 5;
            }
            if word.chars().count() >= 3 && keyword.chars().count() >= 3 {
                let overlap = character_overlap(word, keyword);
                if overlap > 0.6 {
                    score += (overlap * 3.0).floor() as u32;
                }
            }
        }
    }
    score
}

/// Best mapping for a query. `None` only for a blank query.
pub fn find_best_match(input: &str) -> Option<&'static MusicMapping> {
    let query = input.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<&'static MusicMapping> = None;
    let mut best_score = 0;
    for mapping in MUSIC_MAPPINGS.iter() {
        let score = score_mapping(mapping, &query);
        if score > best_score {
            best_score = score;
            best = Some(mapping);
        }
    }

    if best_score >= MIN_MATCH_SCORE {
        best
    } else {
        Some(&MUSIC_MAPPINGS[0])
    }
}

/// Up to five mappings for a partial query; the first four when blank.
pub fn suggestions(input: &str) -> Vec<&'static MusicMapping> {
    let query = input.trim().to_lowercase();
    if query.is_empty() {
        return MUSIC_MAPPINGS.iter().take(4).collect();
    }
    MUSIC_MAPPINGS
        .iter()
        .filter(|m| {
            m.keywords.iter().any(|k| k.contains(query.as_str()))
                || m.mood.to_lowercase().contains(&query)
                || m.description.to_lowercase().contains(&query)
        })
        .take(5)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn late_night_coding_goes_to_midnight_session() {
        let best = find_best_match("late night coding").unwrap();
        assert_eq!(best.mood, "Midnight Session");
        assert_eq!(score_mapping(&MUSIC_MAPPINGS[5], "late night coding"), 43);
        assert_eq!(score_mapping(&MUSIC_MAPPINGS[0], "late night coding"), 18);
    }

    #[test]
    fn rain_scores_both_rain_keywords() {
        // "rain": +10 contained, +5 word match, +3 full overlap.
        // "rainy": +5 word match, +2 for 4/5 overlap.
        assert_eq!(score_mapping(&MUSIC_MAPPINGS[2], "rain"), 25);
        assert_eq!(find_best_match("  RAIN ").unwrap().mood, "Rainy Vibes");
    }

    #[test]
    fn weak_query_falls_back_to_first_entry() {
        assert_eq!(find_best_match("xyz").unwrap().mood, "Deep Focus");
        assert!(find_best_match("   ").is_none());
    }

    #[test]
    fn overlap_ignores_repeats() {
        assert_eq!(character_overlap("aab", "ab"), 1.0);
        assert_eq!(character_overlap("", ""), 0.0);
        assert!((character_overlap("night", "midnight") - 5.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn suggestions_filter_and_cap() {
        assert_eq!(suggestions("").len(), 4);
        let jazz: Vec<&str> = suggestions("jazz").iter().map(|m| m.mood).collect();
        assert_eq!(jazz, vec!["Jazz Cafe"]);
        let morning: Vec<&str> = suggestions("morning").iter().map(|m| m.mood).collect();
        assert_eq!(morning, vec!["Jazz Cafe", "Good Vibes"]);
        assert!(suggestions("e").len() <= 5);
    }

    #[test]
    fn matcher_is_deterministic() {
        for q in ["late night coding", "cozy rain", "anime study"] {
            assert_eq!(find_best_match(q), find_best_match(q));
        }
    }
}
