pub mod config;
pub mod delay;
pub mod error;
pub mod events;
pub mod store;
pub mod system;
pub mod web;
pub mod tasks {
    pub mod files;
    pub mod slideshow;
    pub mod viewer;
}
