pub mod db;
pub mod ping;
pub mod token;
