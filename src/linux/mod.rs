//! Linux scan backend

mod wext;

pub use wext::WextChannel;
