pub mod attraction;
pub mod coordinate;
pub mod emergency;
pub mod geoapify;
pub mod trip;
pub mod user;
