mod structs;

pub use structs::DetailsCache;
