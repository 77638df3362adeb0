use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(EpisodeId);

/// Height value SWAPI uses when a character's height was never recorded.
pub const UNKNOWN_HEIGHT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub episode_id: EpisodeId,
    pub title: String,
    pub release_date: NaiveDate,
    #[serde(default)]
    pub opening_crawl: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub characters: Vec<String>,
    pub url: String,
}

impl Film {
    /// Sorts films by release date, oldest first. Films released on the same
    /// day keep the order the API returned them in.
    pub fn sort_by_release(films: &mut [Film]) {
        films.sort_by_key(|film| film.release_date);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub gender: String,
    pub height: String,
    #[serde(default)]
    pub url: String,
}

impl Character {
    pub fn is_height_unknown(&self) -> bool {
        self.height == UNKNOWN_HEIGHT
    }

    /// Height in centimeters, `None` for the `unknown` sentinel and for values
    /// that are not a finite, non-negative number.
    pub fn height_cm(&self) -> Option<f64> {
        if self.is_height_unknown() {
            return None;
        }
        self.height
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|cm| cm.is_finite() && *cm >= 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn film(episode: u32, date: &str) -> Film {
        Film {
            episode_id: EpisodeId(episode),
            title: format!("Episode {episode}"),
            release_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("date"),
            opening_crawl: String::new(),
            director: String::new(),
            producer: String::new(),
            characters: Vec::new(),
            url: format!("http://swapi.test/api/films/{episode}/"),
        }
    }

    #[test]
    fn sorts_films_by_release_date_regardless_of_input_order() {
        let mut films = vec![
            film(6, "1983-05-25"),
            film(4, "1977-05-25"),
            film(5, "1980-05-21"),
        ];
        Film::sort_by_release(&mut films);
        let order: Vec<u32> = films.iter().map(|f| f.episode_id.0).collect();
        assert_eq!(order, vec![4, 5, 6]);
    }

    #[test]
    fn same_day_releases_keep_api_order() {
        let mut films = vec![film(2, "2002-05-16"), film(1, "2002-05-16")];
        Film::sort_by_release(&mut films);
        assert_eq!(films[0].episode_id, EpisodeId(2));
    }

    #[test]
    fn decodes_swapi_film_payload() {
        let raw = r#"{
            "title": "A New Hope",
            "episode_id": 4,
            "opening_crawl": "It is a period of civil war.",
            "director": "George Lucas",
            "producer": "Gary Kurtz, Rick McCallum",
            "release_date": "1977-05-25",
            "characters": ["https://swapi.dev/api/people/1/"],
            "planets": [],
            "url": "https://swapi.dev/api/films/1/"
        }"#;
        let film: Film = serde_json::from_str(raw).expect("decode film");
        assert_eq!(film.episode_id, EpisodeId(4));
        assert_eq!(film.characters.len(), 1);
        assert_eq!(film.release_date.to_string(), "1977-05-25");
    }

    #[test]
    fn rejects_film_with_malformed_release_date() {
        let raw = r#"{"title":"x","episode_id":1,"release_date":"May 1977","url":"u"}"#;
        assert!(serde_json::from_str::<Film>(raw).is_err());
    }

    #[test]
    fn unknown_height_is_not_numeric() {
        let luke = Character {
            name: "Luke Skywalker".into(),
            gender: "male".into(),
            height: "172".into(),
            url: String::new(),
        };
        let unknown = Character {
            height: UNKNOWN_HEIGHT.into(),
            ..luke.clone()
        };
        assert_eq!(luke.height_cm(), Some(172.0));
        assert!(unknown.is_height_unknown());
        assert_eq!(unknown.height_cm(), None);
    }

    #[test]
    fn decimal_heights_are_numeric_but_negative_and_nan_are_not() {
        let base = Character {
            name: "R2-D2".into(),
            gender: "n/a".into(),
            height: "96.5".into(),
            url: String::new(),
        };
        assert_eq!(base.height_cm(), Some(96.5));
        for junk in ["-5", "NaN", "inf", "1e400", "tall"] {
            let row = Character {
                height: junk.into(),
                ..base.clone()
            };
            assert_eq!(row.height_cm(), None, "{junk} should not be numeric");
            assert!(!row.is_height_unknown());
        }
    }
}
