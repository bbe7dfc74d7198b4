pub mod batch_cancel;
pub mod batch_create;
pub mod batch_settle;
pub mod cancel_auction;
pub mod configure;
pub mod create_auction;
pub mod force_settle;
pub mod initialize_house;
pub mod place_bid;
pub mod recovery;
pub mod settle_auction;
pub mod withdraw;

pub use batch_cancel::*;
pub use batch_create::*;
pub use batch_settle::*;
pub use cancel_auction::*;
pub use configure::*;
pub use create_auction::*;
pub use force_settle::*;
pub use initialize_house::*;
pub use place_bid::*;
pub use recovery::*;
pub use settle_auction::*;
pub use withdraw::*;
