use crate::config::ExtractionConfig;
use crate::models::{BoundingBox, WordBox};

/// Find the words printed beneath a photo and join them into a name.
///
/// The search window sits directly below the photo: a word qualifies when its
/// vertical extent lies strictly between the photo's bottom edge and
/// `bottom + text_search_height`, and its horizontal center falls strictly
/// inside the photo's width widened by `text_search_width_tolerance` on each
/// side. All four bounds are exclusive. Qualifying words are ordered left to
/// right, joined with single spaces, and sanitized.
///
/// Returns `None` when no word qualifies. Candidates search the shared index
/// independently, so a word inside two overlapping windows is claimed by
/// both.
pub fn match_words_to_photo(
    photo: &BoundingBox,
    words: &[WordBox],
    config: &ExtractionConfig,
) -> Option<(String, Vec<WordBox>)> {
    let photo_bottom = photo.bottom();
    let search_y_max = photo_bottom + config.text_search_height;
    let search_x_min = photo.x as f32 - config.text_search_width_tolerance as f32;
    let search_x_max = (photo.x + photo.w) as f32 + config.text_search_width_tolerance as f32;

    let mut matched: Vec<WordBox> = words
        .iter()
        .filter(|word| {
            let is_below = word.y > photo_bottom && word.bottom() < search_y_max;
            let center_x = word.center_x();
            let is_aligned = center_x > search_x_min && center_x < search_x_max;
            is_below && is_aligned
        })
        .cloned()
        .collect();

    if matched.is_empty() {
        return None;
    }

    // Stable sort keeps detector order for words sharing an x coordinate.
    matched.sort_by_key(|word| word.x);

    let raw: Vec<&str> = matched.iter().map(|word| word.text.as_str()).collect();
    let full_name = sanitize_name(&raw.join(" "));

    Some((full_name, matched))
}

/// Make a recognized string safe to use as a file name.
///
/// Typical name separators (`_`, `.`, `:`) become spaces, anything that is
/// not an ASCII letter or whitespace is dropped, runs of whitespace collapse
/// to one space, and the result is trimmed. Applying the transformation twice
/// yields the same string as applying it once.
pub fn sanitize_name(raw: &str) -> String {
    let spaced: String = raw
        .chars()
        .map(|c| if matches!(c, '_' | '.' | ':') { ' ' } else { c })
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x: u32, y: u32, w: u32, h: u32) -> WordBox {
        WordBox {
            text: text.to_string(),
            x,
            y,
            w,
            h,
            confidence: 0.9,
        }
    }

    fn photo() -> BoundingBox {
        // bottom = 500; window y in (500, 570), center x in (60, 440)
        BoundingBox::new(100, 100, 300, 400)
    }

    #[test]
    fn words_below_photo_are_matched_left_to_right() {
        let words = vec![
            word("Doe", 160, 520, 40, 20),
            word("Jane", 110, 520, 40, 20),
        ];
        let (name, matched) = match_words_to_photo(&photo(), &words, &ExtractionConfig::default())
            .expect("words in window should match");
        assert_eq!(name, "Jane Doe");
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].text, "Jane");
        assert_eq!(matched[1].text, "Doe");
    }

    #[test]
    fn word_at_photo_bottom_is_excluded() {
        // y == photo bottom: window is exclusive at the lower bound
        let words = vec![word("Jane", 110, 500, 40, 20)];
        assert!(match_words_to_photo(&photo(), &words, &ExtractionConfig::default()).is_none());
    }

    #[test]
    fn word_reaching_window_floor_is_excluded() {
        // y + h == 570 == search_y_max: exclusive
        let words = vec![word("Jane", 110, 550, 40, 20)];
        assert!(match_words_to_photo(&photo(), &words, &ExtractionConfig::default()).is_none());
        // One pixel shorter fits
        let words = vec![word("Jane", 110, 550, 40, 19)];
        assert!(match_words_to_photo(&photo(), &words, &ExtractionConfig::default()).is_some());
    }

    #[test]
    fn word_extending_past_window_floor_is_excluded() {
        // y + h == 571, one pixel past the window
        let words = vec![word("Jane", 110, 541, 40, 30)];
        assert!(match_words_to_photo(&photo(), &words, &ExtractionConfig::default()).is_none());
    }

    #[test]
    fn horizontal_center_outside_tolerance_is_excluded() {
        // center_x = 50 < 60 == search_x_min (exclusive)
        let words = vec![word("Far", 30, 520, 40, 20)];
        assert!(match_words_to_photo(&photo(), &words, &ExtractionConfig::default()).is_none());
        // center_x = 61 is inside
        let words = vec![word("Near", 41, 520, 40, 20)];
        assert!(match_words_to_photo(&photo(), &words, &ExtractionConfig::default()).is_some());
    }

    #[test]
    fn association_is_pure() {
        let words = vec![
            word("Doe", 160, 520, 40, 20),
            word("Jane", 110, 520, 40, 20),
        ];
        let config = ExtractionConfig::default();
        let first = match_words_to_photo(&photo(), &words, &config).unwrap();
        let second = match_words_to_photo(&photo(), &words, &config).unwrap();
        assert_eq!(first.0, second.0);
        let first_texts: Vec<&str> = first.1.iter().map(|w| w.text.as_str()).collect();
        let second_texts: Vec<&str> = second.1.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(first_texts, second_texts);
    }

    #[test]
    fn overlapping_windows_can_claim_the_same_word() {
        let left = BoundingBox::new(100, 100, 300, 400);
        let right = BoundingBox::new(420, 100, 300, 400);
        // center_x = 430: inside (60, 440) and inside (380, 760)
        let words = vec![word("Shared", 410, 520, 40, 20)];
        let config = ExtractionConfig::default();
        assert!(match_words_to_photo(&left, &words, &config).is_some());
        assert!(match_words_to_photo(&right, &words, &config).is_some());
    }

    #[test]
    fn sanitize_replaces_separators_and_strips_symbols() {
        assert_eq!(sanitize_name("jane_doe"), "jane doe");
        assert_eq!(sanitize_name("J.A. Doe:"), "J A Doe");
        assert_eq!(sanitize_name("Jane  Doe 3rd!"), "Jane Doe rd");
    }

    #[test]
    fn sanitize_collapses_and_trims_whitespace() {
        assert_eq!(sanitize_name("  Jane \t Doe  "), "Jane Doe");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let inputs = ["jane_doe", "J.A. Doe:", "  Jane \t Doe 3rd! ", "123", ""];
        for input in inputs {
            let once = sanitize_name(input);
            assert_eq!(sanitize_name(&once), once);
        }
    }

    #[test]
    fn digits_only_words_sanitize_to_empty() {
        assert_eq!(sanitize_name("1234 56"), "");
    }
}
