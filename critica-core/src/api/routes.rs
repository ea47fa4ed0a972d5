macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions shared by the server and its clients
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod developers {
        pub const COLLECTION: &str = v1_path!("/developer");
        pub const ITEM: &str = v1_path!("/developer/{id}");
    }

    pub mod platforms {
        pub const COLLECTION: &str = v1_path!("/platform");
        pub const ITEM: &str = v1_path!("/platform/{id}");
    }

    pub mod genres {
        pub const COLLECTION: &str = v1_path!("/game/genre");
        pub const ITEM: &str = v1_path!("/game/genre/{id}");
    }

    pub mod games {
        pub const COLLECTION: &str = v1_path!("/game");
        pub const SEARCH: &str = v1_path!("/game/search");
        pub const ITEM: &str = v1_path!("/game/{id}");
    }

    pub mod movies {
        pub const COLLECTION: &str = v1_path!("/movie");
        pub const SEARCH: &str = v1_path!("/movie/search");
        pub const ITEM: &str = v1_path!("/movie/{id}");
        pub const CREW: &str = v1_path!("/movie/{id}/crew");
        pub const CREW_ITEM: &str = v1_path!("/movie/{id}/crew/{crew_id}");
    }

    pub mod crew {
        pub const COLLECTION: &str = v1_path!("/movie_crew");
        pub const ITEM: &str = v1_path!("/movie_crew/{id}");
    }

    pub mod media {
        pub const ITEM: &str = v1_path!("/media/{id}");
    }

    pub mod likes {
        pub const COLLECTION: &str = v1_path!("/like");
        pub const ITEM: &str = v1_path!("/like/{id}");
        pub const BY_MEDIA: &str = v1_path!("/like/media/{id}");
        pub const BY_USER: &str = v1_path!("/like/user/{id}");
    }

    pub mod reviews {
        pub const COLLECTION: &str = v1_path!("/review");
        pub const SEARCH: &str = v1_path!("/review/search");
        pub const ITEM: &str = v1_path!("/review/{id}");
    }

    pub mod users {
        pub const COLLECTION: &str = v1_path!("/user");
        pub const ITEM: &str = v1_path!("/user/{id}");
    }
}

pub const HEALTH: &str = "/health";

pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }

    /// Replace multiple path parameters in order.
    pub fn replace_params(
        route: &str,
        params: &[(impl AsRef<str>, impl AsRef<str>)],
    ) -> String {
        let mut path = route.to_string();
        for (param, value) in params {
            path = path.replace(param.as_ref(), value.as_ref());
        }
        path
    }

    /// Append query parameters to the provided route.
    pub fn with_query(route: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return route.to_string();
        }

        let mut path =
            String::with_capacity(route.len() + 1 + params.len() * 8);
        path.push_str(route);
        path.push('?');

        for (i, (key, value)) in params.iter().enumerate() {
            if i > 0 {
                path.push('&');
            }
            path.push_str(key);
            path.push('=');
            path.push_str(value);
        }

        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_routes_accept_ids() {
        let path = utils::replace_param(v1::games::ITEM, "{id}", "12");
        assert_eq!(path, "/api/v1/game/12");
    }

    #[test]
    fn nested_crew_route_replaces_both_params() {
        let path = utils::replace_params(
            v1::movies::CREW_ITEM,
            &[("{id}", "4"), ("{crew_id}", "9")],
        );
        assert_eq!(path, "/api/v1/movie/4/crew/9");
    }

    #[test]
    fn search_query_is_appended_in_order() {
        let path = utils::with_query(v1::games::SEARCH, &[("genre", "action"), ("title", "zel")]);
        assert_eq!(path, "/api/v1/game/search?genre=action&title=zel");
    }
}
