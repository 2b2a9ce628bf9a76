//! Share domain entities.

pub mod model;
pub mod view;

pub use model::{NewShare, Share, SharePermission, ShareType};
pub use view::ShareView;
