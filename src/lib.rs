pub mod app;
pub mod cache;
pub mod config;
pub mod demo_seeder;
pub mod error;
pub mod pages;
pub mod service;
pub mod models {
    pub mod article;
    pub mod category;
}
pub mod rendering {
    pub mod blocks;
    pub mod html;
}
pub mod store {
    pub mod fallback;
    pub mod remote;
    pub mod snapshot;
    pub mod source;
}
pub mod api {
    pub mod articles;
    pub mod errors;
}
