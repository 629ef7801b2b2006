//! Movie catalog models.
//!
//! These types mirror the JSON shapes served by the remote catalog. Field
//! names are the catalog's snake_case keys, so the same serde derives decode
//! network responses and encode the persisted favorites blob.
//!
//! Equality is structural over every field. De-duplication by `id` is a
//! policy of [`FavoritesStore`](crate::storage::FavoritesStore), not a
//! property of [`Movie`].

use super::format::{format_currency, format_release_date, format_runtime};
use serde::{Deserialize, Serialize};

/// Image sizes and base URL used to turn a path fragment into an image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Base URL of the image CDN, without a trailing slash.
    pub base_url: String,
    /// Size segment used for posters.
    pub poster_size: String,
    /// Size segment used for backdrops.
    pub backdrop_size: String,
    /// Size segment used for profile pictures and company logos.
    pub profile_size: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            base_url: "https://image.tmdb.org/t/p".to_string(),
            poster_size: "w500".to_string(),
            backdrop_size: "original".to_string(),
            profile_size: "w185".to_string(),
        }
    }
}

impl ImageConfig {
    /// Joins base URL, size segment and path fragment.
    ///
    /// Path fragments from the catalog start with `/`.
    #[must_use]
    pub fn image_url(&self, size: &str, path: &str) -> String {
        format!("{}/{}{}", self.base_url.trim_end_matches('/'), size, path)
    }
}

/// A movie as returned by catalog search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identity. Immutable once fetched.
    pub id: i64,
    pub title: String,
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// ISO date (`yyyy-MM-dd`); empty when the catalog has none.
    #[serde(default)]
    pub release_date: String,
    /// Average rating on a 0–10 scale.
    pub vote_average: f64,
    pub vote_count: u64,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
}

impl Movie {
    /// Full poster URL, or `None` when the movie has no poster.
    #[must_use]
    pub fn poster_url(&self, images: &ImageConfig) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| images.image_url(&images.poster_size, path))
    }

    /// Full backdrop URL, or `None` when the movie has no backdrop.
    #[must_use]
    pub fn backdrop_url(&self, images: &ImageConfig) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| images.image_url(&images.backdrop_size, path))
    }

    /// Budget in dollars, or `"N/A"` when absent or zero.
    #[must_use]
    pub fn formatted_budget(&self) -> String {
        format_currency(self.budget)
    }

    /// Revenue in dollars, or `"N/A"` when absent or zero.
    #[must_use]
    pub fn formatted_revenue(&self) -> String {
        format_currency(self.revenue)
    }

    /// Release date as `dd/MM/yyyy`.
    #[must_use]
    pub fn formatted_release_date(&self) -> String {
        format_release_date(&self.release_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCompany {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    #[serde(default)]
    pub origin_country: Option<String>,
}

impl ProductionCompany {
    /// Full logo URL at the profile size, or `None` when there is no logo.
    #[must_use]
    pub fn logo_url(&self, images: &ImageConfig) -> Option<String> {
        self.logo_path
            .as_deref()
            .map(|path| images.image_url(&images.profile_size, path))
    }
}

/// Full movie record from the get-by-id endpoint.
///
/// A superset of [`Movie`]. Converting to `Movie` drops `runtime`, `genres`
/// and `production_companies`; there is no way back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    pub vote_average: f64,
    pub vote_count: u64,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_companies: Vec<ProductionCompany>,
}

impl MovieDetail {
    /// Projects this detail onto the plain [`Movie`] shape.
    #[must_use]
    pub fn to_movie(&self) -> Movie {
        Movie::from(self)
    }

    /// Runtime as `"2h 16m"`, or `"N/A"`.
    #[must_use]
    pub fn formatted_runtime(&self) -> String {
        format_runtime(self.runtime)
    }

    /// Genre names joined with `", "` in catalog order.
    #[must_use]
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<&MovieDetail> for Movie {
    fn from(detail: &MovieDetail) -> Self {
        Self {
            id: detail.id,
            title: detail.title.clone(),
            original_title: detail.original_title.clone(),
            overview: detail.overview.clone(),
            poster_path: detail.poster_path.clone(),
            backdrop_path: detail.backdrop_path.clone(),
            release_date: detail.release_date.clone(),
            vote_average: detail.vote_average,
            vote_count: detail.vote_count,
            budget: detail.budget,
            revenue: detail.revenue,
        }
    }
}

/// One page of search results.
///
/// `results` keep the catalog's relevance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    /// 1-based page number.
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> MovieDetail {
        MovieDetail {
            id: 603,
            title: "Matrix".into(),
            original_title: "The Matrix".into(),
            overview: "A hacker learns the truth.".into(),
            poster_path: Some("/poster.jpg".into()),
            backdrop_path: None,
            release_date: "1999-03-30".into(),
            vote_average: 8.2,
            vote_count: 24000,
            budget: Some(63_000_000),
            revenue: Some(0),
            runtime: Some(136),
            genres: vec![
                Genre { id: 28, name: "Ação".into() },
                Genre { id: 878, name: "Ficção científica".into() },
            ],
            production_companies: vec![],
        }
    }

    #[test]
    fn detail_projects_to_movie() {
        let detail = detail();
        let movie = detail.to_movie();
        assert_eq!(movie.id, 603);
        assert_eq!(movie.original_title, "The Matrix");
        assert_eq!(movie.budget, Some(63_000_000));
        assert_eq!(detail.genre_names(), "Ação, Ficção científica");
        assert_eq!(detail.formatted_runtime(), "2h 16m");
    }

    #[test]
    fn image_urls_use_configured_sizes() {
        let movie = detail().to_movie();
        let images = ImageConfig::default();
        assert_eq!(
            movie.poster_url(&images).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(movie.backdrop_url(&images), None);
    }

    #[test]
    fn company_logo_uses_profile_size() {
        let images = ImageConfig::default();
        let mut company = ProductionCompany {
            id: 174,
            name: "Warner Bros. Pictures".into(),
            logo_path: Some("/wb.png".into()),
            origin_country: Some("US".into()),
        };
        assert_eq!(
            company.logo_url(&images).as_deref(),
            Some("https://image.tmdb.org/t/p/w185/wb.png")
        );

        company.logo_path = None;
        assert_eq!(company.logo_url(&images), None);
    }

    #[test]
    fn zero_revenue_is_not_available() {
        let movie = detail().to_movie();
        assert_eq!(movie.formatted_budget(), "$63,000,000");
        assert_eq!(movie.formatted_revenue(), "N/A");
        assert_eq!(movie.formatted_release_date(), "30/03/1999");
    }

    #[test]
    fn decodes_catalog_search_page() {
        let json = r#"{
            "page": 1,
            "results": [{
                "id": 268,
                "title": "Batman",
                "original_title": "Batman",
                "overview": "",
                "poster_path": null,
                "backdrop_path": "/b.jpg",
                "release_date": "1989-06-23",
                "vote_average": 7.2,
                "vote_count": 7800,
                "popularity": 40.1
            }],
            "total_pages": 3,
            "total_results": 55
        }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.results[0].budget, None);
        assert_eq!(page.results[0].backdrop_path.as_deref(), Some("/b.jpg"));
    }
}
