pub mod auction_house;
pub mod curation;

pub use auction_house::*;
pub use curation::*;
