//! Plain-text rendering of search results and artwork details.

use std::fmt::Write;

use crate::artwork::Artwork;
use crate::engine::SearchResult;

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// First line of a possibly multi-line field (Chicago puts nationality and
/// life dates on a second line of `artist_display`).
fn first_line(s: &str) -> &str {
    s.lines().next().unwrap_or("")
}

/// One line per artwork, under a summary header.
pub fn render_results(result: &SearchResult) -> String {
    let sources: Vec<&str> = result.sources_queried.iter().map(|s| s.as_str()).collect();
    let mut out = format!(
        "{} of {} artworks · page {} · {}\n",
        result.artworks.len(),
        format_number(result.total),
        result.page,
        if sources.is_empty() {
            "no museums".to_string()
        } else {
            sources.join(", ")
        },
    );
    if result.artworks.is_empty() {
        out.push_str("\n   no results\n");
        return out;
    }
    let width = result.artworks.iter().map(|a| a.id.len()).max().unwrap_or(0);
    out.push('\n');
    for artwork in &result.artworks {
        let _ = writeln!(
            out,
            "   {:<width$}  {} · {} ({})",
            artwork.id,
            artwork.title,
            first_line(&artwork.artist),
            artwork.date,
        );
    }
    out
}

/// Every field of one artwork, label-aligned.
pub fn render_artwork(artwork: &Artwork) -> String {
    let mut rows: Vec<(&str, &str)> = vec![
        ("id", artwork.id.as_str()),
        ("title", artwork.title.as_str()),
        ("artist", first_line(&artwork.artist)),
        ("date", artwork.date.as_str()),
        ("medium", artwork.medium.as_str()),
        ("size", artwork.dimensions.as_str()),
        ("image", artwork.image_url.as_str()),
    ];
    for (label, value) in [
        ("department", artwork.department.as_str()),
        ("type", artwork.classification.as_str()),
        ("culture", artwork.culture.as_str()),
        ("origin", artwork.origin.as_str()),
    ] {
        if !value.is_empty() {
            rows.push((label, value));
        }
    }
    for (label, value) in [
        ("gallery", &artwork.gallery),
        ("credit", &artwork.credit_line),
        ("provenance", &artwork.provenance),
    ] {
        if let Some(value) = value {
            rows.push((label, value.as_str()));
        }
    }
    rows.push(("on view", if artwork.is_on_view { "yes" } else { "no" }));

    let mut out = String::new();
    for (label, value) in rows {
        let _ = writeln!(out, "   {label:<10} {value}");
    }
    if !artwork.description.is_empty() {
        let _ = write!(out, "\n   {}\n", artwork.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artwork::Source;
    use crate::museum::mock::artwork;

    #[test]
    fn format_number_small() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
    }

    #[test]
    fn format_number_thousands() {
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(123_456), "123,456");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn results_list_one_line_each() {
        let mut hopper = artwork(Source::Chicago, 111628, "Nighthawks", "1942");
        hopper.artist = "Edward Hopper\nAmerican, 1882–1967".to_string();
        let result = SearchResult {
            artworks: vec![hopper, artwork(Source::Cleveland, 1, "Water Lilies", "1915")],
            total: 12_345,
            page: 2,
            sources_queried: vec![Source::Chicago, Source::Cleveland],
        };
        let text = render_results(&result);
        assert!(text.starts_with("2 of 12,345 artworks · page 2 · chicago, cleveland"));
        assert!(text.contains("chicago-111628  Nighthawks · Edward Hopper (1942)"));
        assert!(!text.contains("American"));
        assert!(text.contains("cleveland-1"));
    }

    #[test]
    fn empty_results_say_so() {
        let result = SearchResult {
            artworks: vec![],
            total: 0,
            page: 1,
            sources_queried: vec![Source::Chicago],
        };
        assert!(render_results(&result).contains("no results"));
    }

    #[test]
    fn artwork_detail_skips_empty_fields() {
        let mut a = artwork(Source::Harvard, 7, "Study", "1900");
        a.gallery = Some("Gallery 1".to_string());
        a.description = "A study.".to_string();
        let text = render_artwork(&a);
        assert!(text.contains("harvard-7"));
        assert!(text.contains("gallery    Gallery 1"));
        assert!(!text.contains("culture"));
        assert!(!text.contains("provenance"));
        assert!(text.contains("on view    no"));
        assert!(text.ends_with("A study.\n"));
    }
}
