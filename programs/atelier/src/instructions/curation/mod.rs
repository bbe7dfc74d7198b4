pub mod admin;
pub mod approve_delegate;
pub mod batch_bless;
pub mod bless;
pub mod bless_for;
pub mod grant_creator;
pub mod initialize_curation;
pub mod retract_seed;
pub mod select_winner;
pub mod submit_seed;

pub use admin::*;
pub use approve_delegate::*;
pub use batch_bless::*;
pub use bless::*;
pub use bless_for::*;
pub use grant_creator::*;
pub use initialize_curation::*;
pub use retract_seed::*;
pub use select_winner::*;
pub use submit_seed::*;
