//! Presentation helpers for show records.

use chrono::{Datelike, NaiveDate};
use showdeck_api::tmdb::{TmdbCastMember, TmdbTvDetails, TmdbVideo, TvShow, TvShowPage};

/// Image CDN root.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Language whose shows are displayed under their original name by default.
pub const DEFAULT_DISPLAY_LANGUAGE: &str = "en";

/// Cast members shown on a detail page.
pub const CAST_LIMIT: usize = 20;
/// Backdrops shown in a detail page gallery.
pub const GALLERY_LIMIT: usize = 10;
/// Shows listed per related section (recommendations, similar).
pub const RELATED_LIMIT: usize = 10;

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Fields shared by listing records and detail records.
pub trait ShowRecord {
    /// Localized name.
    fn name(&self) -> &str;
    /// Name in the original language.
    fn original_name(&self) -> &str;
    /// ISO 639-1 original language.
    fn original_language(&self) -> &str;
    /// Poster path relative to the image CDN.
    fn poster_path(&self) -> Option<&str>;
    /// Backdrop path relative to the image CDN.
    fn backdrop_path(&self) -> Option<&str>;
    /// First air date, `YYYY-MM-DD`.
    fn first_air_date(&self) -> Option<&str>;
}

macro_rules! impl_show_record {
    ($ty:ty) => {
        impl ShowRecord for $ty {
            fn name(&self) -> &str {
                &self.name
            }
            fn original_name(&self) -> &str {
                &self.original_name
            }
            fn original_language(&self) -> &str {
                &self.original_language
            }
            fn poster_path(&self) -> Option<&str> {
                self.poster_path.as_deref()
            }
            fn backdrop_path(&self) -> Option<&str> {
                self.backdrop_path.as_deref()
            }
            fn first_air_date(&self) -> Option<&str> {
                self.first_air_date.as_deref()
            }
        }
    };
}

impl_show_record!(TvShow);
impl_show_record!(TmdbTvDetails);

/// Image kind, which selects the rendition width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `w500`.
    Poster,
    /// `w1280`.
    Backdrop,
    /// `w185`, for cast profile pictures.
    Avatar,
}

impl ImageKind {
    const fn size(self) -> &'static str {
        match self {
            Self::Poster => "w500",
            Self::Backdrop => "w1280",
            Self::Avatar => "w185",
        }
    }
}

/// Builds an image URL. Empty string when there is no path.
#[must_use]
pub fn image_url(path: Option<&str>, kind: ImageKind, full_size: bool) -> String {
    match path {
        Some(p) if !p.is_empty() => {
            let size = if full_size { "original" } else { kind.size() };
            format!("{IMAGE_BASE_URL}{size}{p}")
        }
        _ => String::new(),
    }
}

/// Original name when the show's original language is `language`,
/// localized name otherwise.
#[must_use]
pub fn display_name<S: ShowRecord>(show: &S, language: &str) -> String {
    if show.original_language() == language {
        show.original_name().to_owned()
    } else {
        show.name().to_owned()
    }
}

/// Human summary such as `"2 Seasons, 13 Episodes"`, or `"No data"`.
#[must_use]
pub fn format_seasons_episodes(seasons: u32, episodes: u32) -> String {
    fn plural(n: u32, word: &str) -> Option<String> {
        match n {
            0 => None,
            1 => Some(format!("1 {word}")),
            n => Some(format!("{n} {word}s")),
        }
    }

    let parts: Vec<String> = [plural(seasons, "Season"), plural(episodes, "Episode")]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        String::from("No data")
    } else {
        parts.join(", ")
    }
}

/// Poster URL for a show.
#[must_use]
pub fn poster_url<S: ShowRecord>(show: &S, full_size: bool) -> String {
    image_url(show.poster_path(), ImageKind::Poster, full_size)
}

/// Backdrop URL for a show.
#[must_use]
pub fn backdrop_url<S: ShowRecord>(show: &S, full_size: bool) -> String {
    image_url(show.backdrop_path(), ImageKind::Backdrop, full_size)
}

/// Year of the first air date. `None` when absent or unparsable.
#[must_use]
pub fn release_year<S: ShowRecord>(show: &S) -> Option<i32> {
    show.first_air_date()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.year())
}

/// Leading cast members, at most [`CAST_LIMIT`].
#[must_use]
pub fn top_cast(details: &TmdbTvDetails) -> &[TmdbCastMember] {
    let cast = details.credits.cast.as_slice();
    cast.get(..CAST_LIMIT).unwrap_or(cast)
}

/// Profile picture URL for a cast member.
#[must_use]
pub fn profile_url(member: &TmdbCastMember) -> String {
    image_url(member.profile_path.as_deref(), ImageKind::Avatar, false)
}

/// First YouTube video whose type is `Trailer`.
#[must_use]
pub fn find_trailer(videos: &[TmdbVideo]) -> Option<&TmdbVideo> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
}

/// Watch URL for a YouTube video.
#[must_use]
pub fn youtube_url(video: &TmdbVideo) -> String {
    format!("{YOUTUBE_WATCH_URL}{}", video.key)
}

/// Backdrop URLs for the gallery, at most [`GALLERY_LIMIT`].
#[must_use]
pub fn gallery_urls(details: &TmdbTvDetails) -> Vec<String> {
    details
        .images
        .backdrops
        .iter()
        .take(GALLERY_LIMIT)
        .map(|image| image_url(Some(&image.file_path), ImageKind::Backdrop, false))
        .collect()
}

/// Leading shows of a related listing, at most [`RELATED_LIMIT`].
/// Empty when the listing was not returned.
#[must_use]
pub fn related_shows(page: Option<&TvShowPage>) -> &[TvShow] {
    let shows = page.map_or_else(Default::default, |p| p.results.as_slice());
    shows.get(..RELATED_LIMIT).unwrap_or(shows)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::test_support::make_show;

    fn details_fixture() -> TmdbTvDetails {
        serde_json::from_str(include_str!("../../../fixtures/tmdb/tv_details_1399.json")).unwrap()
    }

    fn video(key: &str, site: &str, video_type: &str) -> TmdbVideo {
        TmdbVideo {
            id: format!("id-{key}"),
            key: String::from(key),
            name: format!("{video_type} {key}"),
            site: String::from(site),
            video_type: String::from(video_type),
            official: true,
        }
    }

    #[test]
    fn test_display_name_prefers_original_for_matching_language() {
        // Arrange
        let mut show = make_show(1, "Attack on Titan");
        show.original_name = String::from("進撃の巨人");
        show.original_language = String::from("ja");

        // Act & Assert
        assert_eq!(display_name(&show, DEFAULT_DISPLAY_LANGUAGE), "Attack on Titan");
        assert_eq!(display_name(&show, "ja"), "進撃の巨人");
    }

    #[test]
    fn test_format_seasons_episodes() {
        // Arrange
        let cases = [
            (0, 0, "No data"),
            (1, 0, "1 Season"),
            (0, 1, "1 Episode"),
            (2, 0, "2 Seasons"),
            (1, 8, "1 Season, 8 Episodes"),
            (8, 73, "8 Seasons, 73 Episodes"),
        ];

        // Act & Assert
        for (seasons, episodes, expected) in cases {
            assert_eq!(format_seasons_episodes(seasons, episodes), expected);
        }
    }

    #[test]
    fn test_image_urls() {
        // Arrange
        let mut show = make_show(1, "Andor");
        show.backdrop_path = Some(String::from("/bd.jpg"));

        // Act & Assert
        assert_eq!(poster_url(&show, false), "https://image.tmdb.org/t/p/w500/poster.jpg");
        assert_eq!(
            backdrop_url(&show, false),
            "https://image.tmdb.org/t/p/w1280/bd.jpg"
        );
        assert_eq!(
            backdrop_url(&show, true),
            "https://image.tmdb.org/t/p/original/bd.jpg"
        );
    }

    #[test]
    fn test_missing_image_path_gives_empty_url() {
        // Arrange
        let mut show = make_show(1, "Andor");
        show.poster_path = None;

        // Act & Assert
        assert_eq!(poster_url(&show, true), "");
        assert_eq!(image_url(Some(""), ImageKind::Poster, false), "");
    }

    #[test]
    fn test_release_year() {
        // Arrange
        let mut show = make_show(1, "Andor");
        let dated = release_year(&show);
        show.first_air_date = Some(String::from("not-a-date"));
        let invalid = release_year(&show);
        show.first_air_date = None;

        // Act & Assert
        assert_eq!(dated, Some(2020));
        assert_eq!(invalid, None);
        assert_eq!(release_year(&show), None);
    }

    #[test]
    fn test_find_trailer_picks_first_youtube_trailer() {
        // Arrange
        let videos = vec![
            video("teaser", "YouTube", "Teaser"),
            video("vimeo", "Vimeo", "Trailer"),
            video("first", "YouTube", "Trailer"),
            video("second", "YouTube", "Trailer"),
        ];

        // Act
        let trailer = find_trailer(&videos).unwrap();

        // Assert
        assert_eq!(trailer.key, "first");
        assert_eq!(youtube_url(trailer), "https://www.youtube.com/watch?v=first");
    }

    #[test]
    fn test_find_trailer_none_without_youtube_trailer() {
        // Arrange
        let videos = vec![
            video("teaser", "YouTube", "Teaser"),
            video("vimeo", "Vimeo", "Trailer"),
        ];

        // Act & Assert
        assert!(find_trailer(&videos).is_none());
        assert!(find_trailer(&[]).is_none());
    }

    #[test]
    fn test_detail_sections_from_fixture() {
        // Arrange
        let details = details_fixture();

        // Act
        let cast = top_cast(&details);
        let gallery = gallery_urls(&details);
        let recommended = related_shows(details.recommendations.as_ref());
        let similar = related_shows(details.similar.as_ref());
        let trailer = find_trailer(&details.videos.results).unwrap();

        // Assert
        assert_eq!(details.credits.cast.len(), 22);
        assert_eq!(cast.len(), CAST_LIMIT);
        assert_eq!(cast.first().unwrap().name, "Emilia Clarke");
        assert_eq!(gallery.len(), GALLERY_LIMIT);
        assert_eq!(
            gallery.first().unwrap(),
            "https://image.tmdb.org/t/p/w1280/backdrop00.jpg"
        );
        assert_eq!(recommended.len(), RELATED_LIMIT);
        assert_eq!(similar.len(), 3);
        assert_eq!(trailer.name, "Official Series Trailer");
    }

    #[test]
    fn test_related_shows_missing_listing() {
        // Arrange & Act & Assert
        assert!(related_shows(None).is_empty());
    }

    #[test]
    fn test_profile_url() {
        // Arrange
        let details = details_fixture();
        let cast = top_cast(&details);

        // Act & Assert
        assert_eq!(
            profile_url(cast.get(1).unwrap()),
            "https://image.tmdb.org/t/p/w185/profile1.jpg"
        );
        assert_eq!(profile_url(cast.first().unwrap()), "");
    }
}
