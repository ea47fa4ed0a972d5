pub mod filters;

pub use filters::{
    Contains, Filter, FilterBuilder, GameCriterion, GameFilter, GameKey, MovieCriterion,
    MovieFilter, MovieKey, ReviewCriterion, ReviewFilter, ReviewKey, SearchKey,
};
