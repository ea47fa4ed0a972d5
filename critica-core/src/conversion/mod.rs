//! Entity to wire DTO mapping.
//!
//! Pure and infallible. Relations that were not loaded convert as empty
//! collections; counts come from [`MediaStats`](critica_model::MediaStats).

use critica_model::{
    Developer, GameDetails, GameGenre, Like, Media, MediaDetails, MovieCrew, MovieCrewRole,
    MovieDetails, Page, Platform, Review, User,
};

use crate::api_types::{
    CrewRoleDto, DeveloperDto, DeveloperSummaryDto, GameDto, GenreDto, LikeDto, MediaDto,
    MediaRefDto, MovieCrewDto, MovieDto, PlatformDto, ReviewDto, UserDto, UserRefDto,
};

pub trait ToDto {
    type Dto;

    fn to_dto(&self) -> Self::Dto;
}

/// Absence maps to absence.
pub fn convert<E: ToDto>(entity: Option<&E>) -> Option<E::Dto> {
    entity.map(ToDto::to_dto)
}

/// Element-wise, preserving order.
pub fn convert_all<E: ToDto>(entities: &[E]) -> Vec<E::Dto> {
    entities.iter().map(ToDto::to_dto).collect()
}

pub fn convert_page<E: ToDto>(page: Page<E>) -> Page<E::Dto> {
    page.map(|entity| entity.to_dto())
}

fn loaded<E: ToDto>(relation: &Option<Vec<E>>) -> Vec<E::Dto> {
    relation.as_deref().map(convert_all).unwrap_or_default()
}

impl ToDto for User {
    type Dto = UserDto;

    fn to_dto(&self) -> UserDto {
        UserDto {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            joined_at: self.joined_at,
            is_active: self.is_active,
        }
    }
}

impl ToDto for Developer {
    type Dto = DeveloperDto;

    fn to_dto(&self) -> DeveloperDto {
        DeveloperDto {
            id: self.id,
            name: self.name.clone(),
            social_links: self.social_links.clone(),
            games: self.games.clone().unwrap_or_default(),
        }
    }
}

impl ToDto for Platform {
    type Dto = PlatformDto;

    fn to_dto(&self) -> PlatformDto {
        PlatformDto {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl ToDto for GameGenre {
    type Dto = GenreDto;

    fn to_dto(&self) -> GenreDto {
        GenreDto {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl ToDto for MovieCrew {
    type Dto = MovieCrewDto;

    fn to_dto(&self) -> MovieCrewDto {
        MovieCrewDto {
            id: self.id,
            name: self.name.clone(),
            birth_date: self.birth_date,
        }
    }
}

impl ToDto for MovieCrewRole {
    type Dto = CrewRoleDto;

    fn to_dto(&self) -> CrewRoleDto {
        CrewRoleDto {
            movie_id: self.key.movie_id,
            crew_id: self.key.crew_id,
            crew_name: self.crew_name.clone(),
            role: self.role,
            character_name: self.character_name.clone(),
        }
    }
}

fn game_dto(media: &Media, game: &GameDetails) -> GameDto {
    GameDto {
        id: media.id,
        title: media.title.clone(),
        release_date: media.release_date,
        description: media.description.clone(),
        price: game.price,
        developer: game.developer.as_ref().map(|dev| DeveloperSummaryDto {
            id: dev.id,
            name: dev.name.clone(),
        }),
        genres: loaded(&game.genres),
        platforms: loaded(&game.platforms),
        like_count: media.stats.likes,
        review_count: media.stats.reviews,
    }
}

fn movie_dto(media: &Media, movie: &MovieDetails) -> MovieDto {
    MovieDto {
        id: media.id,
        title: media.title.clone(),
        release_date: media.release_date,
        description: media.description.clone(),
        producer: movie.producer.clone(),
        actors: movie.actors.iter().cloned().collect(),
        crew: loaded(&movie.crew),
        like_count: media.stats.likes,
        review_count: media.stats.reviews,
    }
}

impl ToDto for Media {
    type Dto = MediaDto;

    fn to_dto(&self) -> MediaDto {
        match &self.details {
            MediaDetails::Game(game) => MediaDto::Game(game_dto(self, game)),
            MediaDetails::Movie(movie) => MediaDto::Movie(movie_dto(self, movie)),
        }
    }
}

impl ToDto for Like {
    type Dto = LikeDto;

    fn to_dto(&self) -> LikeDto {
        LikeDto {
            id: self.id,
            user: UserRefDto {
                id: self.user_id,
                username: self.username.clone(),
            },
            media: MediaRefDto {
                id: self.media_id,
                title: self.media_title.clone(),
                kind: self.media_kind,
            },
            created_at: self.created_at,
        }
    }
}

impl ToDto for Review {
    type Dto = ReviewDto;

    fn to_dto(&self) -> ReviewDto {
        ReviewDto {
            id: self.id,
            user: UserRefDto {
                id: self.user_id,
                username: self.username.clone(),
            },
            media: MediaRefDto {
                id: self.media_id,
                title: self.media_title.clone(),
                kind: self.media_kind,
            },
            score: self.score,
            text: self.text.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;
    use critica_model::{
        CrewId, CrewRole, DeveloperId, DeveloperRef, MediaId, MediaKind, MediaStats,
        MovieCrewKey, PageRequest,
    };
    use rust_decimal::Decimal;

    use super::*;

    fn game(genres: Option<Vec<GameGenre>>) -> Media {
        Media {
            id: MediaId(1),
            title: "zelda".into(),
            release_date: None,
            description: None,
            created_at: Utc::now(),
            stats: MediaStats {
                likes: 3,
                reviews: 1,
            },
            details: MediaDetails::Game(GameDetails {
                price: Decimal::new(5999, 2),
                developer: Some(DeveloperRef {
                    id: DeveloperId(4),
                    name: "nintendo".into(),
                }),
                genres,
                platforms: None,
            }),
        }
    }

    #[test]
    fn absent_entity_converts_to_absent_dto() {
        assert_eq!(convert::<User>(None), None);
    }

    #[test]
    fn unloaded_relations_convert_as_empty() {
        let MediaDto::Game(dto) = game(None).to_dto() else {
            panic!("expected a game");
        };
        assert!(dto.genres.is_empty());
        assert!(dto.platforms.is_empty());
        assert_eq!(dto.like_count, 3);
        assert_eq!(dto.review_count, 1);
        assert_eq!(dto.developer.unwrap().name, "nintendo");
    }

    #[test]
    fn media_dispatches_on_payload() {
        let movie = Media {
            id: MediaId(2),
            title: "heat".into(),
            release_date: None,
            description: None,
            created_at: Utc::now(),
            stats: MediaStats::default(),
            details: MediaDetails::Movie(MovieDetails {
                producer: "art linson".into(),
                actors: BTreeSet::from(["al pacino".to_string()]),
                crew: Some(vec![MovieCrewRole {
                    key: MovieCrewKey::new(MediaId(2), CrewId(9)),
                    crew_name: "michael mann".into(),
                    role: CrewRole::Director,
                    character_name: None,
                }]),
            }),
        };

        let dto = movie.to_dto();
        assert_eq!(dto.kind(), MediaKind::Movie);
        let MediaDto::Movie(movie) = dto else {
            panic!("expected a movie");
        };
        assert_eq!(movie.crew[0].crew_id, CrewId(9));
        assert_eq!(movie.actors, vec!["al pacino".to_string()]);
    }

    #[test]
    fn media_dto_is_tagged_with_kind() {
        let json = serde_json::to_value(game(Some(vec![])).to_dto()).unwrap();
        assert_eq!(json["kind"], "GAME");
        assert_eq!(json["price"], "59.99");
    }

    #[test]
    fn pages_keep_totals() {
        let genres = vec![
            GameGenre {
                id: critica_model::GenreId(1),
                name: "rpg".into(),
            },
            GameGenre {
                id: critica_model::GenreId(2),
                name: "action".into(),
            },
        ];
        let page = convert_page(Page::from_slice(&genres, PageRequest::new(0, 1)));
        assert_eq!(page.content[0].name, "rpg");
        assert_eq!(page.total_pages, 2);
    }
}
