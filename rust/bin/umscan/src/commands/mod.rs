pub mod client;
pub mod context;
pub mod login;
pub mod notebooks;
pub mod resource;
pub mod scan;
